//! Configuration validation.
//!
//! Cross-field checks that run after loading, before any connection is
//! opened. Catching a bad URL here beats a confusing connect error later.

use super::dto::ServiceConfigDto;
use super::error::{ConfigError, Result};

/// Validate a loaded service configuration.
pub fn validate_service_config(config: &ServiceConfigDto) -> Result<()> {
    if !config.bus.url.starts_with("redis://") && !config.bus.url.starts_with("rediss://") {
        return Err(ConfigError::InvalidUrl(format!(
            "IDENTITY_REDIS_URL must be a redis:// or rediss:// URL, got {}",
            config.bus.url
        )));
    }

    if !config.store.url.starts_with("http://") && !config.store.url.starts_with("https://") {
        return Err(ConfigError::InvalidUrl(format!(
            "IDENTITY_ELASTICSEARCH_URL must be an http(s) URL, got {}",
            config.store.url
        )));
    }

    if config.bus.namespace.is_empty() {
        return Err(ConfigError::Validation(
            "IDENTITY_BUS_NAMESPACE must not be empty".to_string(),
        ));
    }

    if config.store.index.is_empty() {
        return Err(ConfigError::Validation(
            "IDENTITY_ES_INDEX must not be empty".to_string(),
        ));
    }

    if config.bus.wait_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "IDENTITY_BUS_WAIT_TIMEOUT_SECS must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::dto::*;

    fn valid_config() -> ServiceConfigDto {
        ServiceConfigDto {
            grpc: GrpcServerConfig {
                bind_address: "127.0.0.1:50051".parse().unwrap(),
            },
            bus: RedisBusConfig {
                url: "redis://localhost:6379".to_string(),
                namespace: "identity".to_string(),
                wait_timeout_secs: 30,
            },
            store: ElasticsearchConfig {
                url: "http://localhost:9200".to_string(),
                index: "data-identity-sign-up".to_string(),
                request_timeout_secs: 10,
            },
            sign_up: SignUpPolicyConfig { cooldown_secs: 180 },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }

    #[test]
    fn accepts_valid_config() {
        assert!(validate_service_config(&valid_config()).is_ok());
    }

    #[test]
    fn rejects_non_redis_bus_url() {
        let mut config = valid_config();
        config.bus.url = "http://localhost:6379".to_string();
        assert!(matches!(
            validate_service_config(&config),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn rejects_zero_wait_timeout() {
        let mut config = valid_config();
        config.bus.wait_timeout_secs = 0;
        assert!(matches!(
            validate_service_config(&config),
            Err(ConfigError::Validation(_))
        ));
    }
}
