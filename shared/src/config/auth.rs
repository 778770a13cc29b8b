//! Token signing configuration

use serde::{Deserialize, Serialize};

/// Secret used when nothing else is configured. Exactly 32 bytes so that a
/// development setup works out of the box.
pub const DEFAULT_SECRET: &str = "sigil-development-secret-key-001";

/// Subject stamped on tokens issued with the configured defaults
pub const DEFAULT_SUBJECT: &str = "Authentication";

/// Default token lifetime (1 hour)
pub const DEFAULT_EXPIRATION_SECONDS: i64 = 60 * 60;

/// JWT signing configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct JwtConfig {
    /// HMAC signing secret, must encode to exactly 32 bytes
    pub secret: String,

    /// Token lifetime in seconds
    #[serde(default = "default_expiration_seconds")]
    pub expiration_seconds: i64,

    /// Subject claim for tokens issued with the defaults
    #[serde(default = "default_subject")]
    pub subject: Option<String>,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_SECRET),
            expiration_seconds: default_expiration_seconds(),
            subject: default_subject(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set token lifetime in seconds
    pub fn with_expiration_seconds(mut self, seconds: i64) -> Self {
        self.expiration_seconds = seconds;
        self
    }

    /// Set token lifetime in minutes
    pub fn with_expiration_minutes(mut self, minutes: i64) -> Self {
        self.expiration_seconds = minutes * 60;
        self
    }

    /// Set or clear the default subject
    pub fn with_subject(mut self, subject: Option<String>) -> Self {
        self.subject = subject;
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }
}

fn default_expiration_seconds() -> i64 {
    DEFAULT_EXPIRATION_SECONDS
}

fn default_subject() -> Option<String> {
    Some(String::from(DEFAULT_SUBJECT))
}
