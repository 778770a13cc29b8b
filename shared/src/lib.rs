//! Shared configuration and logging setup for Sigil
//!
//! This crate provides functionality used across the workspace:
//! - Configuration types and layered loading
//! - Tracing subscriber initialisation

pub mod config;
pub mod telemetry;

// Re-export commonly used items at crate root
pub use config::{AppConfig, Environment, JwtConfig, LogFormat, LoggingConfig};
pub use telemetry::{init_tracing, TelemetryError};
