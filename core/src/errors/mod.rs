//! Domain-specific error types and error handling.

mod types;

#[cfg(test)]
mod tests;

pub use types::TokenError;

pub type TokenResult<T> = Result<T, TokenError>;
