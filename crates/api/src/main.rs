//! Vendors service entry point: REST and gRPC servers over one store.

use std::sync::Arc;

use api::AppState;
use api::auth::JwtAuthenticator;
use api::config::Config;
use api::server::{ServeError, run_until_stopped};
use domain::VendorService;
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use vendor_store::{InMemoryVendorStore, PostgresVendorStore, VendorStore};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

async fn wait_for_shutdown(mut rx: watch::Receiver<bool>) {
    let _ = rx.wait_for(|stop| *stop).await;
}

/// Runs both servers until a shutdown signal arrives or one of them fails.
async fn serve<S: VendorStore + 'static>(
    store: S,
    config: Config,
    metrics_handle: PrometheusHandle,
) -> Result<(), ServeError> {
    let authenticator = Arc::new(JwtAuthenticator::new(config.jwt_secret.as_bytes()));
    let state = Arc::new(AppState::new(VendorService::new(store), authenticator));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let shutdown_tx = Arc::new(shutdown_tx);
    let signal_tx = Arc::clone(&shutdown_tx);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = signal_tx.send(true);
    });

    let app = api::create_app(state.clone(), metrics_handle, config.request_timeout());
    let addr = config.addr().expect("invalid HOST for REST bind address");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind address");
    tracing::info!(%addr, "starting REST server");
    let rest = axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown(shutdown_rx.clone()));

    let grpc_addr = config
        .grpc_addr()
        .expect("invalid HOST for gRPC bind address");
    tracing::info!(%grpc_addr, "starting gRPC server");
    let grpc = tonic::transport::Server::builder()
        .timeout(config.request_timeout())
        .add_service(api::create_grpc_service(state))
        .serve_with_shutdown(grpc_addr, wait_for_shutdown(shutdown_rx));

    run_until_stopped(rest, grpc, &shutdown_tx).await
}

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.uses_dev_secret() {
        tracing::warn!("JWT_SECRET not set, using the development secret");
    }

    // 2. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Pick the store and serve
    let result = match config.database_url.clone() {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(&url)
                .await
                .expect("failed to connect to database");
            let store = PostgresVendorStore::new(pool);
            store
                .run_migrations()
                .await
                .expect("failed to run migrations");
            serve(store, config, metrics_handle).await
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using the in-memory store");
            serve(InMemoryVendorStore::new(), config, metrics_handle).await
        }
    };

    if let Err(err) = result {
        tracing::error!(error = %err, "servers stopped after a failure");
        std::process::exit(1);
    }
    tracing::info!("servers shut down gracefully");
}
