//! Configuration DTOs.
//!
//! Immutable configuration objects loaded once at startup and passed to
//! services via dependency injection.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Top-level configuration for the sign-up gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfigDto {
    /// gRPC server configuration
    pub grpc: GrpcServerConfig,

    /// Redis job-bus configuration
    pub bus: RedisBusConfig,

    /// Elasticsearch document-store configuration
    pub store: ElasticsearchConfig,

    /// Sign-up business-rule configuration
    pub sign_up: SignUpPolicyConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// gRPC server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrpcServerConfig {
    /// Bind address for the gRPC server (e.g. "0.0.0.0:50051")
    pub bind_address: SocketAddr,
}

/// Redis job-bus configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisBusConfig {
    /// Redis connection URL (e.g. "redis://localhost:6379")
    pub url: String,

    /// Key namespace prefix for job hashes, streams and signal channels
    pub namespace: String,

    /// How long a dispatched job may take before the wait rejects with a
    /// timeout (seconds)
    pub wait_timeout_secs: u64,
}

impl RedisBusConfig {
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }
}

/// Elasticsearch document-store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElasticsearchConfig {
    /// Base URL of the Elasticsearch node (e.g. "http://localhost:9200")
    pub url: String,

    /// Index holding sign-up lead documents
    pub index: String,

    /// Per-request timeout (seconds)
    pub request_timeout_secs: u64,
}

/// Sign-up business-rule configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpPolicyConfig {
    /// Minimum elapsed time between repeat sign-up attempts for the same
    /// lead (seconds). Default 180.
    pub cooldown_secs: u64,
}

impl SignUpPolicyConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log filter directive, same syntax as `RUST_LOG` (default "info")
    pub level: String,
}
