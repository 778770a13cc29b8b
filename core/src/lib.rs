//! # Sigil Core
//!
//! Issuance and verification of compact, HMAC-signed bearer tokens.
//! This crate contains the token entities, the token service with its codec,
//! signature and clock collaborators, and the error taxonomy.
//!
//! ```
//! use sg_core::{ClaimSet, FixedClock, TokenService};
//!
//! let service = TokenService::with_clock(FixedClock::new(1_700_000_000));
//! let key = "01234567890123456789012345678901";
//! let claims = ClaimSet::new().with("role", "admin");
//!
//! let token = service.issue(&claims, key, 3600, Some("svc")).unwrap();
//! let verified = service.verify(token.as_str(), key).unwrap();
//! assert_eq!(verified.subject(), Some("svc"));
//! ```

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
