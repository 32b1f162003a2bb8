//! Configuration from environment variables and CLI flags.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use burger_db::StoreConfig;
use burger_telemetry::TelemetryConfig;
use clap::Parser;
use secrecy::{ExposeSecret, SecretString};

use crate::services::users::AdminSeed;

/// Burger House REST service configuration.
///
/// All values can be set via environment variables or CLI arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "burger-house", about = "Burger House food-ordering REST service")]
pub struct Config {
    /// Listen host
    #[arg(long, env = "BIND_ADDRESS", default_value = "0.0.0.0")]
    pub bind_address: IpAddr,

    /// Listen port
    #[arg(long, env = "PORT", default_value = "5000")]
    pub port: u16,

    /// Extra CORS origins (comma-separated, or "*" for any)
    #[arg(long, env = "CORS_ORIGINS")]
    pub cors_origins: Option<String>,

    /// JWT signing secret
    #[arg(long, env = "JWT_SECRET")]
    pub jwt_secret: SecretString,

    /// MongoDB connection string
    #[arg(long, env = "MONGO_URI")]
    pub mongo_uri: SecretString,

    /// Database name
    #[arg(long, env = "MONGO_DB_NAME", default_value = StoreConfig::DEFAULT_DB_NAME)]
    pub mongo_db_name: String,

    /// Startup connection attempts
    #[arg(long, env = "MONGO_MAX_RETRIES", default_value = "5")]
    pub mongo_max_retries: u32,

    /// Delay between connection attempts in milliseconds
    #[arg(long, env = "MONGO_RETRY_DELAY_MS", default_value = "4000")]
    pub mongo_retry_delay_ms: u64,

    /// Per-attempt server selection timeout in milliseconds
    #[arg(long, env = "MONGO_SERVER_SELECTION_TIMEOUT_MS", default_value = "15000")]
    pub mongo_server_selection_timeout_ms: u64,

    /// Administrator username provisioned at startup
    #[arg(long, env = "ADMIN_USERNAME")]
    pub admin_username: Option<String>,

    /// Administrator email
    #[arg(long, env = "ADMIN_EMAIL")]
    pub admin_email: Option<String>,

    /// Administrator password, hashed before storage
    #[arg(long, env = "ADMIN_PASSWORD")]
    pub admin_password: Option<SecretString>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(long, env = "LOG_LEVEL", default_value = "INFO")]
    pub log_level: String,

    /// Use JSON log format
    #[arg(long, env = "JSON_LOGS", default_value = "false")]
    pub json_logs: bool,
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("JWT_SECRET must not be empty")]
    EmptyJwtSecret,
    #[error("MONGO_URI must not be empty")]
    EmptyMongoUri,
    #[error("MONGO_MAX_RETRIES must be >= 1")]
    InvalidMaxRetries,
    #[error("ADMIN_USERNAME, ADMIN_EMAIL and ADMIN_PASSWORD must be set together")]
    IncompleteAdminSeed,
}

impl Config {
    /// Parse and validate configuration.
    ///
    /// Missing required values make clap print usage and exit.
    ///
    /// # Errors
    /// Fails when a value is out of range.
    pub fn init() -> anyhow::Result<Self> {
        let config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.expose_secret().trim().is_empty() {
            return Err(ConfigError::EmptyJwtSecret);
        }
        if self.mongo_uri.expose_secret().trim().is_empty() {
            return Err(ConfigError::EmptyMongoUri);
        }
        if self.mongo_max_retries == 0 {
            return Err(ConfigError::InvalidMaxRetries);
        }
        let admin_fields = [
            self.admin_username.is_some(),
            self.admin_email.is_some(),
            self.admin_password.is_some(),
        ];
        if admin_fields.contains(&true) && admin_fields.contains(&false) {
            return Err(ConfigError::IncompleteAdminSeed);
        }
        Ok(())
    }

    /// Socket address to listen on.
    #[inline]
    #[must_use]
    pub const fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }

    /// Store settings for the connection loop.
    pub fn store(&self) -> StoreConfig {
        StoreConfig {
            uri: self.mongo_uri.expose_secret().to_string(),
            db_name: self.mongo_db_name.clone(),
            max_retries: self.mongo_max_retries,
            retry_delay: Duration::from_millis(self.mongo_retry_delay_ms),
            server_selection_timeout: Duration::from_millis(self.mongo_server_selection_timeout_ms),
        }
    }

    /// Administrator to provision, when all three admin values are set.
    #[must_use]
    pub fn admin_seed(&self) -> Option<AdminSeed> {
        Some(AdminSeed {
            username: self.admin_username.clone()?,
            email: self.admin_email.clone()?,
            password: self.admin_password.clone()?,
        })
    }

    #[must_use]
    pub fn telemetry(&self) -> TelemetryConfig {
        TelemetryConfig {
            log_level: self.log_level.clone(),
            json_logs: self.json_logs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config, clap::Error> {
        let mut argv = vec!["burger-house"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv)
    }

    fn test_config() -> Config {
        parse(&[
            "--jwt-secret",
            "secret",
            "--mongo-uri",
            "mongodb://localhost:27017",
        ])
        .unwrap()
    }

    #[test]
    fn defaults_match_deployment() {
        let config = test_config();
        assert_eq!(config.port, 5000);
        assert_eq!(config.listen_addr().to_string(), "0.0.0.0:5000");
        assert_eq!(config.mongo_db_name, "burgerDB");
        assert!(!config.json_logs);
        assert!(config.admin_seed().is_none());

        let store = config.store();
        assert_eq!(store.max_retries, 5);
        assert_eq!(store.retry_delay, Duration::from_millis(4000));
        assert_eq!(store.server_selection_timeout, Duration::from_millis(15000));
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn blank_jwt_secret_fails() {
        let mut config = test_config();
        config.jwt_secret = SecretString::from("   ");
        assert!(matches!(config.validate(), Err(ConfigError::EmptyJwtSecret)));
    }

    #[test]
    fn zero_retries_fails() {
        let mut config = test_config();
        config.mongo_max_retries = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidMaxRetries)
        ));
    }

    #[test]
    fn admin_seed_needs_all_three_values() {
        let mut config = test_config();
        config.admin_username = Some("admin".into());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::IncompleteAdminSeed)
        ));

        let config = parse(&[
            "--jwt-secret",
            "secret",
            "--mongo-uri",
            "mongodb://localhost:27017",
            "--admin-username",
            "admin",
            "--admin-email",
            "admin@example.com",
            "--admin-password",
            "admin1234",
        ])
        .unwrap();
        assert!(config.validate().is_ok());

        let seed = config.admin_seed().unwrap();
        assert_eq!(seed.username, "admin");
        assert_eq!(seed.password.expose_secret(), "admin1234");
    }
}
