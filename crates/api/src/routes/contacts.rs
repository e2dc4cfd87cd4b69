//! Vendor contact endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use domain::AddVendorContact;
use serde::Serialize;
use vendor_store::{VendorContact, VendorStore};

use super::{EntityScope, identify, parse_entity_id, parse_vendor_id};
use crate::AppState;
use crate::error::ApiError;

#[derive(Serialize)]
pub struct ContactsResponse {
    pub contacts: Vec<VendorContact>,
}

/// GET /api/v1/vendors/{id}/contacts: primary contact first.
#[tracing::instrument(skip(state, headers))]
pub async fn list<S: VendorStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<ContactsResponse>, ApiError> {
    let vendor_id = parse_vendor_id(&id)?;
    identify(&state, &headers, None)?;

    let contacts = state.service.get_vendor_contacts(vendor_id).await?;
    Ok(Json(ContactsResponse { contacts }))
}

/// POST /api/v1/vendors/{id}/contacts?entity_id=
///
/// The vendor must belong to `entity_id`.
#[tracing::instrument(skip(state, headers, cmd))]
pub async fn add<S: VendorStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(scope): Query<EntityScope>,
    Json(mut cmd): Json<AddVendorContact>,
) -> Result<(StatusCode, Json<VendorContact>), ApiError> {
    let vendor_id = parse_vendor_id(&id)?;
    let entity_id = parse_entity_id(scope.entity_id.as_deref())?;
    identify(&state, &headers, Some(entity_id))?;

    state.service.get_vendor(vendor_id, entity_id).await?;

    cmd.vendor_id = vendor_id;
    let contact = state.service.add_vendor_contact(cmd).await?;
    Ok((StatusCode::CREATED, Json(contact)))
}
