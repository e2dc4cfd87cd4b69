//! REST handlers and the request-parsing helpers they share.

pub mod contacts;
pub mod health;
pub mod metrics;
pub mod payment_terms;
pub mod vendors;

use axum::http::{HeaderMap, header};
use common::{EntityId, UserId, VendorId};
use serde::Deserialize;
use vendor_store::VendorStore;

use crate::AppState;
use crate::auth::{AuthError, bearer_token};
use crate::error::ApiError;

/// `?entity_id=` scope carried by single-vendor requests.
#[derive(Debug, Deserialize)]
pub struct EntityScope {
    pub entity_id: Option<String>,
}

pub(crate) fn parse_vendor_id(raw: &str) -> Result<VendorId, ApiError> {
    VendorId::parse(raw).map_err(|e| ApiError::BadRequest(format!("invalid vendor id: {e}")))
}

pub(crate) fn parse_entity_id(raw: Option<&str>) -> Result<EntityId, ApiError> {
    let raw = raw
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("entity_id is required".to_string()))?;
    EntityId::parse(raw).map_err(|e| ApiError::BadRequest(format!("invalid entity id: {e}")))
}

/// Resolves the optional bearer token into the acting user.
///
/// Requests without an `Authorization` header proceed anonymously. A header
/// that is present must carry a valid token for `entity_id`.
pub(crate) fn identify<S: VendorStore>(
    state: &AppState<S>,
    headers: &HeaderMap,
    entity_id: Option<EntityId>,
) -> Result<Option<UserId>, ApiError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let caller = value
        .to_str()
        .map_err(|_| AuthError::MalformedHeader)
        .and_then(bearer_token)
        .and_then(|token| state.authenticator.authenticate(token))
        .inspect_err(|e| {
            ::metrics::counter!("auth_rejections_total", "transport" => "rest").increment(1);
            tracing::warn!(error = %e, "rejected bearer token");
        })?;

    if let Some(entity_id) = entity_id {
        caller.authorize(entity_id)?;
    }
    Ok(Some(caller.user_id))
}
