//! Token entities for HMAC-signed bearer tokens.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::claims::ClaimSet;
use crate::errors::{TokenError, TokenResult};

/// Required signing key length in bytes (HMAC-SHA256 key size)
pub const SIGNING_KEY_LENGTH: usize = 32;

/// Symmetric signing key, exactly [`SIGNING_KEY_LENGTH`] bytes.
///
/// Length is checked on the encoded bytes, so a 32-character string containing
/// multi-byte UTF-8 characters is rejected.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey([u8; SIGNING_KEY_LENGTH]);

impl SigningKey {
    /// Creates a key from raw bytes
    ///
    /// # Errors
    ///
    /// * `TokenError::InvalidParameter` - the slice is not exactly 32 bytes long
    pub fn from_bytes(bytes: &[u8]) -> TokenResult<Self> {
        let key: [u8; SIGNING_KEY_LENGTH] = bytes.try_into().map_err(|_| {
            TokenError::invalid_parameter(format!(
                "signing key must be exactly {} bytes, got {}",
                SIGNING_KEY_LENGTH,
                bytes.len()
            ))
        })?;
        Ok(Self(key))
    }

    /// Creates a key from the UTF-8 encoding of `secret`
    pub fn from_secret(secret: &str) -> TokenResult<Self> {
        Self::from_bytes(secret.as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for SigningKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<&str> for SigningKey {
    type Error = TokenError;

    fn try_from(secret: &str) -> TokenResult<Self> {
        Self::from_secret(secret)
    }
}

impl TryFrom<&[u8]> for SigningKey {
    type Error = TokenError;

    fn try_from(bytes: &[u8]) -> TokenResult<Self> {
        Self::from_bytes(bytes)
    }
}

impl std::str::FromStr for SigningKey {
    type Err = TokenError;

    fn from_str(secret: &str) -> TokenResult<Self> {
        Self::from_secret(secret)
    }
}

// Never print key material
impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}

/// Issued token in compact serialization: `header.payload.signature`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub(crate) fn new(compact: String) -> Self {
        Self(compact)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Token> for String {
    fn from(token: Token) -> Self {
        token.0
    }
}

/// Everything needed to issue one token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuanceRequest {
    /// Subject stamped into `sub`, overriding any caller-supplied value
    pub subject: Option<String>,
    /// Lifetime in seconds, must be positive
    pub expiration_seconds: i64,
    /// Key the token is signed with
    pub signing_key: SigningKey,
    /// Caller claims; `exp` is always replaced
    pub claims: ClaimSet,
}

impl IssuanceRequest {
    /// Creates a request without a subject
    pub fn new(claims: ClaimSet, signing_key: SigningKey, expiration_seconds: i64) -> Self {
        Self {
            subject: None,
            expiration_seconds,
            signing_key,
            claims,
        }
    }

    /// Sets the subject
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }
}
