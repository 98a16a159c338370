use clap::{Args, Parser, ValueEnum};
use std::path::PathBuf;
use thiserror::Error;

/// Signing secret used when running in development without one configured.
const DEVELOPMENT_JWT_SECRET: &str = "study-assistant-development-secret";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("STUDY_ASSISTANT_JWT_SECRET must be set when running in production")]
    MissingJwtSecret,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Deployment environment; production refuses to start without a signing secret
    #[arg(long, env = "STUDY_ASSISTANT_ENVIRONMENT", value_enum, default_value_t = Environment::Development)]
    pub environment: Environment,

    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub database: DatabaseConfig,

    #[command(flatten)]
    pub auth: AuthConfig,

    #[command(flatten)]
    pub cors: CorsConfig,

    #[command(flatten)]
    pub telemetry: TelemetryConfig,
}

#[derive(Clone, Debug, Args)]
pub struct ServerConfig {
    /// Host to listen on
    #[arg(long, env = "STUDY_ASSISTANT_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "STUDY_ASSISTANT_PORT", default_value_t = 5003)]
    pub port: u16,

    /// Directory holding the built frontend (index.html plus static assets)
    #[arg(long, env = "STUDY_ASSISTANT_FRONTEND_DIR", default_value = "frontpages/build")]
    pub frontend_dir: PathBuf,

    /// Seconds to wait for in-flight requests after a shutdown signal
    #[arg(long, env = "STUDY_ASSISTANT_SHUTDOWN_TIMEOUT_SECS", default_value_t = 10)]
    pub shutdown_timeout_secs: u64,
}

#[derive(Clone, Debug, Args)]
pub struct DatabaseConfig {
    /// Database connection URL
    #[arg(long = "database-url", env = "STUDY_ASSISTANT_DATABASE_URL", default_value = "sqlite://app.db")]
    pub url: String,

    /// Maximum number of pooled connections
    #[arg(long = "database-max-connections", env = "STUDY_ASSISTANT_DATABASE_MAX_CONNECTIONS", default_value_t = 10)]
    pub max_connections: u32,

    /// Seconds to wait for a free connection before failing the request
    #[arg(
        long = "database-acquire-timeout-secs",
        env = "STUDY_ASSISTANT_DATABASE_ACQUIRE_TIMEOUT_SECS",
        default_value_t = 5
    )]
    pub acquire_timeout_secs: u64,
}

#[derive(Clone, Debug, Args)]
pub struct AuthConfig {
    /// Secret key for JWT signing
    #[arg(long, env = "STUDY_ASSISTANT_JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct CorsConfig {
    /// Comma-separated list of origins allowed to call the API ("*" allows any)
    #[arg(long, env = "STUDY_ASSISTANT_CORS_ALLOWED_ORIGINS", default_value = "*", value_delimiter = ',')]
    pub allowed_origins: Vec<String>,
}

#[derive(Clone, Debug, Args)]
pub struct TelemetryConfig {
    /// Log output format
    #[arg(long, env = "STUDY_ASSISTANT_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// OTLP collector endpoint; traces and metrics are only exported when set
    #[arg(long, env = "STUDY_ASSISTANT_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,
}

impl Config {
    #[must_use]
    pub fn load() -> Self {
        Self::parse()
    }

    /// Resolves the token signing secret for the configured environment.
    ///
    /// # Errors
    /// Returns `ConfigError::MissingJwtSecret` in production when no secret is configured.
    pub fn jwt_secret(&self) -> Result<String, ConfigError> {
        match (&self.auth.jwt_secret, self.environment) {
            (Some(secret), _) if !secret.is_empty() => Ok(secret.clone()),
            (_, Environment::Production) => Err(ConfigError::MissingJwtSecret),
            (_, Environment::Development) => {
                tracing::warn!("No JWT secret configured, using the development secret");
                Ok(DEVELOPMENT_JWT_SECRET.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(environment: Environment, jwt_secret: Option<&str>) -> Config {
        let mut config = Config::parse_from(["study-assistant-server"]);
        config.environment = environment;
        config.auth.jwt_secret = jwt_secret.map(str::to_string);
        config
    }

    #[test]
    fn test_explicit_secret_wins() {
        let config = config_with(Environment::Production, Some("s3cret"));
        assert_eq!(config.jwt_secret().unwrap(), "s3cret");
    }

    #[test]
    fn test_production_requires_secret() {
        let config = config_with(Environment::Production, None);
        assert!(matches!(config.jwt_secret(), Err(ConfigError::MissingJwtSecret)));

        let config = config_with(Environment::Production, Some(""));
        assert!(matches!(config.jwt_secret(), Err(ConfigError::MissingJwtSecret)));
    }

    #[test]
    fn test_development_falls_back() {
        let config = config_with(Environment::Development, None);
        assert_eq!(config.jwt_secret().unwrap(), DEVELOPMENT_JWT_SECRET);
    }

    #[test]
    fn test_cors_origins_split_on_commas() {
        let config = Config::parse_from([
            "study-assistant-server",
            "--allowed-origins",
            "http://localhost:3000,https://study.example.com",
        ]);
        assert_eq!(config.cors.allowed_origins, vec!["http://localhost:3000", "https://study.example.com"]);
    }
}
