//! Bearer-token interceptor for every gRPC call.

use std::sync::Arc;

use tonic::service::Interceptor;
use tonic::{Request, Status};

use super::status::from_auth;
use crate::auth::{AuthError, Authenticator, Caller, bearer_token};

/// Authenticates the `authorization` metadata and stores the resulting
/// [`Caller`] in the request extensions.
#[derive(Clone)]
pub struct AuthInterceptor {
    authenticator: Arc<dyn Authenticator>,
}

impl AuthInterceptor {
    pub fn new(authenticator: Arc<dyn Authenticator>) -> Self {
        Self { authenticator }
    }

    fn caller(&self, request: &Request<()>) -> Result<Caller, AuthError> {
        let value = request
            .metadata()
            .get("authorization")
            .ok_or(AuthError::Missing)?
            .to_str()
            .map_err(|_| AuthError::MalformedHeader)?;
        self.authenticator.authenticate(bearer_token(value)?)
    }
}

impl Interceptor for AuthInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        let caller = self.caller(&request).map_err(|e| {
            metrics::counter!("auth_rejections_total", "transport" => "grpc").increment(1);
            tracing::warn!(error = %e, "rejected gRPC call");
            from_auth(e)
        })?;
        request.extensions_mut().insert(caller);
        Ok(request)
    }
}

/// Returns the caller attached by [`AuthInterceptor`].
pub fn caller<T>(request: &Request<T>) -> Result<Caller, Status> {
    request
        .extensions()
        .get::<Caller>()
        .copied()
        .ok_or_else(|| from_auth(AuthError::Missing))
}
