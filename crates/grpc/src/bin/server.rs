//! Identity sign-up gateway server.
//!
//! Wires the Redis job bus and the Elasticsearch store behind the two use
//! cases and serves the `SignUpService` until interrupted.

use identity_application::{SignUpLeadUseCase, ValidateSignUpUseCase};
use identity_domain::jobs::JobProducer;
use identity_domain::validation::SchemaRegistry;
use identity_grpc::{interceptors, SignUpServiceImpl};
use identity_infrastructure::{ElasticsearchSignUpStore, RedisJobBus};
use identity_proto::SignUpServiceServer;
use identity_shared::config::{ConfigLoader, ServiceConfigDto};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::new(None).load_service_config()?;
    setup_logging(&config);

    info!(
        bind = %config.grpc.bind_address,
        bus = %config.bus.url,
        store = %config.store.url,
        index = %config.store.index,
        "starting identity sign-up gateway"
    );

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.store.request_timeout_secs))
        .build()?;
    let store = Arc::new(ElasticsearchSignUpStore::new(http, &config.store));

    let bus = RedisJobBus::connect(&config.bus).await?;
    let producer = JobProducer::new(Arc::new(bus));
    let schemas = Arc::new(SchemaRegistry::new());

    let service = SignUpServiceImpl::new(
        SignUpLeadUseCase::new(
            store.clone(),
            producer.clone(),
            schemas.clone(),
            config.sign_up.cooldown(),
        ),
        ValidateSignUpUseCase::new(store, producer, schemas),
    );

    tonic::transport::Server::builder()
        .add_service(SignUpServiceServer::with_interceptor(
            service,
            interceptors::correlation,
        ))
        .serve_with_shutdown(config.grpc.bind_address, shutdown_signal())
        .await?;

    info!("identity sign-up gateway stopped");
    Ok(())
}

fn setup_logging(config: &ServiceConfigDto) {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_target(true)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("tracing subscriber was already set");
    }
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(stream) => stream,
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                let _ = ctrl_c.await;
                return;
            }
        };
        tokio::select! {
            _ = ctrl_c => {}
            _ = sigterm.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        let _ = ctrl_c.await;
    }

    info!("shutdown signal received, draining in-flight calls");
}
