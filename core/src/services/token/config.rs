//! Fixed issuance defaults for long-lived callers

use sg_shared::config::auth::{DEFAULT_EXPIRATION_SECONDS, DEFAULT_SUBJECT};
use sg_shared::JwtConfig;

use crate::domain::entities::token::SigningKey;
use crate::errors::{TokenError, TokenResult};

/// Subject, key and lifetime applied by
/// [`TokenService::issue_with_defaults`](super::TokenService::issue_with_defaults).
///
/// Immutable once built; share it behind an `Arc` when several tasks issue tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDefaults {
    /// Subject stamped into `sub`
    pub subject: Option<String>,
    /// Key tokens are signed and verified with
    pub signing_key: SigningKey,
    /// Token lifetime in seconds
    pub expiration_seconds: i64,
}

impl TokenDefaults {
    /// Defaults with subject `Authentication` and a one hour lifetime
    pub fn new(signing_key: SigningKey) -> Self {
        Self {
            subject: Some(DEFAULT_SUBJECT.to_string()),
            signing_key,
            expiration_seconds: DEFAULT_EXPIRATION_SECONDS,
        }
    }

    /// Builds defaults from the shared JWT configuration
    ///
    /// # Errors
    ///
    /// * `TokenError::InvalidParameter` - secret is not 32 bytes or lifetime is not positive
    pub fn from_config(config: &JwtConfig) -> TokenResult<Self> {
        if config.expiration_seconds <= 0 {
            return Err(TokenError::invalid_parameter(format!(
                "configured expiration must be positive, got {}",
                config.expiration_seconds
            )));
        }
        if config.is_using_default_secret() {
            tracing::warn!(
                event = "default_signing_secret",
                "Token defaults built from the development signing secret"
            );
        }

        Ok(Self {
            subject: config.subject.clone(),
            signing_key: SigningKey::from_secret(&config.secret)?,
            expiration_seconds: config.expiration_seconds,
        })
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn without_subject(mut self) -> Self {
        self.subject = None;
        self
    }

    pub fn with_signing_key(mut self, signing_key: SigningKey) -> Self {
        self.signing_key = signing_key;
        self
    }

    pub fn with_expiration_seconds(mut self, expiration_seconds: i64) -> Self {
        self.expiration_seconds = expiration_seconds;
        self
    }
}
