//! REST and gRPC transports for the vendors service.
//!
//! Both transports share one [`AppState`]: the vendor service plus the
//! authenticator. Logging goes through `tracing`, counters through the
//! Prometheus recorder exposed at `/metrics`.

pub mod auth;
pub mod config;
pub mod error;
pub mod grpc;
pub mod routes;
pub mod server;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::{get, post};
use domain::VendorService;
use metrics_exporter_prometheus::PrometheusHandle;
use tonic::service::interceptor::InterceptedService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use vendor_store::VendorStore;

use auth::Authenticator;
use grpc::{AuthInterceptor, VendorsGrpcService, VendorsServiceServer};

/// Shared application state accessible from all handlers.
pub struct AppState<S: VendorStore> {
    pub service: VendorService<S>,
    pub authenticator: Arc<dyn Authenticator>,
}

impl<S: VendorStore> AppState<S> {
    pub fn new(service: VendorService<S>, authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            service,
            authenticator,
        }
    }
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: VendorStore + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
    request_timeout: Duration,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    let api = Router::new()
        .route(
            "/vendors",
            get(routes::vendors::list::<S>).post(routes::vendors::create::<S>),
        )
        .route(
            "/vendors/by-code/{code}",
            get(routes::vendors::get_by_code::<S>),
        )
        .route(
            "/vendors/{id}",
            get(routes::vendors::get::<S>)
                .put(routes::vendors::update::<S>)
                .delete(routes::vendors::delete::<S>),
        )
        .route(
            "/vendors/{id}/activate",
            post(routes::vendors::activate::<S>),
        )
        .route(
            "/vendors/{id}/deactivate",
            post(routes::vendors::deactivate::<S>),
        )
        .route(
            "/vendors/{id}/validate",
            get(routes::vendors::validate::<S>),
        )
        .route(
            "/vendors/{id}/balance",
            post(routes::vendors::update_balance::<S>),
        )
        .route(
            "/vendors/{id}/contacts",
            get(routes::contacts::list::<S>).post(routes::contacts::add::<S>),
        )
        .route("/payment-terms", get(routes::payment_terms::list::<S>));

    Router::new()
        .route("/health", get(routes::health::check))
        .nest("/api/v1", api)
        .with_state(state)
        .merge(metrics_router)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Wraps the gRPC service in the authentication interceptor.
pub fn create_grpc_service<S: VendorStore + 'static>(
    state: Arc<AppState<S>>,
) -> InterceptedService<VendorsServiceServer<VendorsGrpcService<S>>, AuthInterceptor> {
    let interceptor = AuthInterceptor::new(state.authenticator.clone());
    VendorsServiceServer::with_interceptor(VendorsGrpcService::new(state), interceptor)
}
