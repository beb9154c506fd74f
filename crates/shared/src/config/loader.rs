//! Configuration loader.
//!
//! Loads configuration from an optional `.env` file and the process
//! environment, then validates the result.

use std::path::Path;
use std::str::FromStr;

use super::dto::{
    ElasticsearchConfig, GrpcServerConfig, LoggingConfig, RedisBusConfig, ServiceConfigDto,
    SignUpPolicyConfig,
};
use super::error::{ConfigError, Result};
use super::validator::validate_service_config;

/// Default Elasticsearch index for sign-up lead documents.
const DEFAULT_SIGN_UP_INDEX: &str = "data-identity-sign-up";

/// Default key namespace on the job bus.
const DEFAULT_BUS_NAMESPACE: &str = "identity";

/// Configuration loader.
///
/// # Priority
///
/// Values from the `.env` file are loaded into the process environment first,
/// so they take effect for any variable not already set. This allows local
/// development overrides without modifying the system environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    /// Optional path to .env file
    env_file_path: Option<std::path::PathBuf>,
}

impl ConfigLoader {
    pub fn new(env_file_path: Option<std::path::PathBuf>) -> Self {
        Self { env_file_path }
    }

    /// Load and validate the full service configuration.
    ///
    /// # Required environment variables
    ///
    /// - `IDENTITY_GRPC_BIND`: gRPC bind address (e.g. "0.0.0.0:50051")
    /// - `IDENTITY_REDIS_URL`: Redis connection URL for the job bus
    /// - `IDENTITY_ELASTICSEARCH_URL`: Elasticsearch node URL
    ///
    /// # Optional environment variables
    ///
    /// - `IDENTITY_BUS_NAMESPACE`: bus key prefix (default "identity")
    /// - `IDENTITY_BUS_WAIT_TIMEOUT_SECS`: job wait timeout (default 30)
    /// - `IDENTITY_ES_INDEX`: lead index (default "data-identity-sign-up")
    /// - `IDENTITY_ES_REQUEST_TIMEOUT_SECS`: store request timeout (default 10)
    /// - `IDENTITY_SIGN_UP_COOLDOWN_SECS`: repeat-attempt cooldown (default 180)
    /// - `RUST_LOG`: log filter (default "info")
    pub fn load_service_config(&self) -> Result<ServiceConfigDto> {
        if let Some(path) = &self.env_file_path {
            self.load_env_file(path)?;
        }

        let config = ServiceConfigDto::from_env()?;
        validate_service_config(&config)?;

        Ok(config)
    }

    fn load_env_file(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(ConfigError::EnvFileLoad {
                path: path.to_path_buf(),
                source: dotenv::Error::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path.display()),
                )),
            });
        }

        dotenv::from_path(path).map_err(|e| ConfigError::EnvFileLoad {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }
}

impl ServiceConfigDto {
    /// Build the service configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            grpc: GrpcServerConfig::from_env()?,
            bus: RedisBusConfig::from_env()?,
            store: ElasticsearchConfig::from_env()?,
            sign_up: SignUpPolicyConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
        })
    }
}

impl GrpcServerConfig {
    pub fn from_env() -> Result<Self> {
        let raw = required_var("IDENTITY_GRPC_BIND")?;
        let bind_address = raw
            .parse()
            .map_err(|_| ConfigError::InvalidSocketAddr(raw))?;
        Ok(Self { bind_address })
    }
}

impl RedisBusConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            url: required_var("IDENTITY_REDIS_URL")?,
            namespace: optional_var("IDENTITY_BUS_NAMESPACE")
                .unwrap_or_else(|| DEFAULT_BUS_NAMESPACE.to_string()),
            wait_timeout_secs: parse_optional_var("IDENTITY_BUS_WAIT_TIMEOUT_SECS", 30)?,
        })
    }
}

impl ElasticsearchConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            url: required_var("IDENTITY_ELASTICSEARCH_URL")?,
            index: optional_var("IDENTITY_ES_INDEX")
                .unwrap_or_else(|| DEFAULT_SIGN_UP_INDEX.to_string()),
            request_timeout_secs: parse_optional_var("IDENTITY_ES_REQUEST_TIMEOUT_SECS", 10)?,
        })
    }
}

impl SignUpPolicyConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            cooldown_secs: parse_optional_var("IDENTITY_SIGN_UP_COOLDOWN_SECS", 180)?,
        })
    }
}

impl LoggingConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            level: optional_var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn required_var(var: &str) -> Result<String> {
    std::env::var(var).map_err(|_| ConfigError::MissingRequired {
        var: var.to_string(),
    })
}

fn optional_var(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.is_empty())
}

fn parse_optional_var<T: FromStr>(var: &str, default: T) -> Result<T> {
    match optional_var(var) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
            var: var.to_string(),
            value: raw,
        }),
    }
}
