//! Token error taxonomy
//!
//! Every issuance or verification failure ends in exactly one of these kinds.
//! None of them is retryable.

use thiserror::Error;

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The caller violated a precondition (key length, expiration, empty token)
    #[error("Invalid parameter: {reason}")]
    InvalidParameter { reason: String },

    /// Wrong segment count, undecodable base64 or JSON, unsupported header
    #[error("Malformed token")]
    MalformedToken,

    /// Signature does not match the recomputed value
    #[error("Invalid signature")]
    SignatureInvalid,

    /// Structurally and cryptographically valid but past its deadline
    #[error("Token expired")]
    Expired,
}

impl TokenError {
    /// Shorthand for [`TokenError::InvalidParameter`]
    pub fn invalid_parameter(reason: impl Into<String>) -> Self {
        TokenError::InvalidParameter {
            reason: reason.into(),
        }
    }

    /// Stable code for reporting to external callers.
    ///
    /// Malformed and badly signed tokens share `INVALID_TOKEN` so the caller
    /// cannot learn which check rejected the token.
    pub fn error_code(&self) -> &'static str {
        match self {
            TokenError::InvalidParameter { .. } => "INVALID_PARAMETER",
            TokenError::MalformedToken | TokenError::SignatureInvalid => "INVALID_TOKEN",
            TokenError::Expired => "TOKEN_EXPIRED",
        }
    }

    /// Message safe to hand to an external caller
    pub fn public_message(&self) -> String {
        match self {
            TokenError::MalformedToken | TokenError::SignatureInvalid => {
                String::from("Invalid token")
            }
            other => other.to_string(),
        }
    }

    /// Whether the token itself was rejected, as opposed to the call
    pub fn is_rejection(&self) -> bool {
        !matches!(self, TokenError::InvalidParameter { .. })
    }
}
