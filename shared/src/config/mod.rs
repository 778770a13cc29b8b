//! Configuration module
//!
//! - `auth` - token signing defaults (secret, lifetime, subject)
//! - `environment` - environment detection and logging configuration
//!
//! Sources are layered in this order, later ones winning:
//! built-in defaults for the detected environment, the optional
//! `config.<environment>.toml` file, then `SIGIL__*` environment variables
//! (for example `SIGIL__JWT__SECRET`).

pub mod auth;
pub mod environment;

use config::{ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};

pub use auth::JwtConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "SIGIL";

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Token signing configuration
    #[serde(default)]
    pub jwt: JwtConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl AppConfig {
    /// Built-in configuration for an environment
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            environment,
            jwt: JwtConfig::default(),
            logging: LoggingConfig::for_environment(environment),
        }
    }

    /// Load configuration for the environment named by `ENVIRONMENT`.
    ///
    /// `.env.<environment>` and `.env` are read first when present, so they can
    /// feed the environment variable layer.
    pub fn load() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();
        dotenvy::from_filename(environment.env_file()).ok();
        dotenvy::dotenv().ok();

        // The .env files may have changed the environment itself
        Self::load_for(Environment::from_env())
    }

    /// Load configuration for a specific environment
    pub fn load_for(environment: Environment) -> Result<Self, ConfigError> {
        let defaults = Self::for_environment(environment);

        let config: Self = config::Config::builder()
            .add_source(config::Config::try_from(&defaults)?)
            .add_source(File::new(environment.config_file(), FileFormat::Toml).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()?;

        if config.jwt.is_using_default_secret() && config.environment.is_production() {
            tracing::warn!(
                environment = %config.environment,
                event = "default_secret_in_production",
                "Token signing secret is the built-in development default"
            );
        }

        Ok(config)
    }
}
