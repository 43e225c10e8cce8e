//! # configs
//!
//! Typed application settings.
//!
//! Sources, later ones overriding earlier ones:
//! 1. built-in defaults
//! 2. `config/posthub.toml` (optional)
//! 3. environment variables prefixed `POSTHUB__`, nested with `__`
//!    (e.g. `POSTHUB__SERVER__PORT=9000`, `POSTHUB__AUTH__JWT_SECRET=...`)
//!
//! A `.env` file in the working directory is loaded into the environment first.

use std::net::{IpAddr, SocketAddr};

use config::{Config, Environment as EnvSource, File};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

/// Secret used when running in development without one configured.
const DEVELOPMENT_JWT_SECRET: &str = "posthub-development-secret-change-me";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Deployment mode. Only `Development` discloses error internals to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: IpAddr,
    pub port: u16,
}

impl ServerSettings {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[derive(Debug)]
pub struct AuthSettings {
    pub jwt_secret: SecretString,
    pub issuer: String,
    pub audience: String,
    pub token_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// Default `tracing` filter directive; `RUST_LOG` wins when set.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

#[derive(Debug)]
pub struct Settings {
    pub environment: AppEnvironment,
    pub server: ServerSettings,
    pub auth: AuthSettings,
    pub logging: LoggingSettings,
}

/// Shape of the merged sources before secrets are wrapped and checked.
#[derive(Debug, Deserialize)]
struct RawSettings {
    environment: AppEnvironment,
    server: ServerSettings,
    auth: RawAuthSettings,
    logging: LoggingSettings,
}

#[derive(Debug, Deserialize)]
struct RawAuthSettings {
    #[serde(default)]
    jwt_secret: String,
    issuer: String,
    audience: String,
    token_ttl_minutes: i64,
}

impl Settings {
    /// Loads `.env`, then layers defaults, `config/posthub.toml` and `POSTHUB__*`.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_builder(
            Self::defaults()?
                .add_source(File::with_name("config/posthub").required(false))
                .add_source(
                    EnvSource::with_prefix("POSTHUB")
                        .prefix_separator("__")
                        .separator("__")
                        .try_parsing(true),
                ),
        )
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("environment", "production")?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("auth.issuer", "posthub")?
            .set_default("auth.audience", "posthub-clients")?
            .set_default("auth.token_ttl_minutes", 60)?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?)
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        let raw: RawSettings = builder.build()?.try_deserialize()?;
        Self::validate(raw)
    }

    fn validate(raw: RawSettings) -> Result<Self, ConfigError> {
        let RawSettings {
            environment,
            server,
            auth,
            logging,
        } = raw;

        let jwt_secret = if auth.jwt_secret.trim().is_empty() {
            if environment != AppEnvironment::Development {
                return Err(ConfigError::Invalid(
                    "auth.jwt_secret must be set outside development".into(),
                ));
            }
            warn!("auth.jwt_secret not set; using the built-in development secret");
            DEVELOPMENT_JWT_SECRET.to_string()
        } else {
            auth.jwt_secret
        };

        if auth.token_ttl_minutes <= 0 {
            return Err(ConfigError::Invalid(
                "auth.token_ttl_minutes must be positive".into(),
            ));
        }

        Ok(Self {
            environment,
            server,
            auth: AuthSettings {
                jwt_secret: SecretString::from(jwt_secret),
                issuer: auth.issuer,
                audience: auth.audience,
                token_ttl_minutes: auth.token_ttl_minutes,
            },
            logging,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == AppEnvironment::Development
    }
}

impl AuthSettings {
    /// Length of the configured secret, for startup diagnostics without exposing it.
    pub fn secret_len(&self) -> usize {
        self.jwt_secret.expose_secret().len()
    }
}
