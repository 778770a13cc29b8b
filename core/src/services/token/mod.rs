//! Token service module
//!
//! This module handles token issuance and verification:
//! - HS256 signing over the compact `header.payload.signature` format
//! - Expiration enforcement against an injectable clock
//! - Fixed issuance defaults for callers that always use the same key

mod clock;
mod codec;
mod config;
mod service;
pub mod signature;

#[cfg(test)]
mod tests;

pub use clock::{Clock, FixedClock, SystemClock};
pub use codec::{decode_segment, encode_segment, split_token, TokenParts};
pub use config::TokenDefaults;
pub use service::TokenService;
