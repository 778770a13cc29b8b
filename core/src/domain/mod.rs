//! Domain layer containing token entities.

pub mod entities;

// Re-export commonly used domain types
pub use entities::{
    ClaimSet, IssuanceRequest, SigningKey, Token, EXP_CLAIM, SIGNING_KEY_LENGTH, SUB_CLAIM,
};
