//! Service configuration.
//!
//! Configuration is loaded once at startup from the environment (optionally
//! seeded from a `.env` file), validated, and passed to services as immutable
//! DTOs. No component reads the environment after startup.

mod dto;
mod error;
mod loader;
mod validator;

pub use dto::{
    ElasticsearchConfig, GrpcServerConfig, LoggingConfig, RedisBusConfig, ServiceConfigDto,
    SignUpPolicyConfig,
};
pub use error::{ConfigError, Result};
pub use loader::ConfigLoader;
pub use validator::validate_service_config;
