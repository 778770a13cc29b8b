//! Domain entities for token issuance and verification.

pub mod claims;
pub mod token;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use claims::{ClaimSet, EXP_CLAIM, SUB_CLAIM};
pub use token::{IssuanceRequest, SigningKey, Token, SIGNING_KEY_LENGTH};
