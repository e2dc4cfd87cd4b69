//! Vendor CRUD, lifecycle, validation and balance endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use common::Pagination;
use domain::{CreateVendor, ListVendors, UpdateVendor, VendorDetails};
use serde::{Deserialize, Serialize};
use vendor_store::{Vendor, VendorStore};

use super::{EntityScope, identify, parse_entity_id, parse_vendor_id};
use crate::AppState;
use crate::error::ApiError;

// -- Request types --

#[derive(Debug, Deserialize)]
pub struct ListVendorsParams {
    pub entity_id: Option<String>,
    pub status: Option<String>,
    pub vendor_type: Option<String>,
    pub active_only: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

/// Body of `POST /api/v1/vendors`. A `status` field, if sent, is ignored.
#[derive(Debug, Deserialize)]
pub struct CreateVendorRequest {
    pub entity_id: String,
    #[serde(flatten)]
    pub details: VendorDetails,
}

#[derive(Debug, Deserialize)]
pub struct UpdateVendorRequest {
    pub entity_id: String,
    pub status: String,
    #[serde(flatten)]
    pub details: VendorDetails,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBalanceRequest {
    pub entity_id: String,
    pub amount: i64,
}

// -- Response types --

#[derive(Serialize)]
pub struct ListVendorsResponse {
    pub vendors: Vec<Vendor>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

#[derive(Serialize)]
pub struct ValidateVendorResponse {
    pub valid: bool,
    pub message: String,
}

#[derive(Serialize)]
pub struct BalanceResponse {
    pub status: &'static str,
    pub current_balance: i64,
}

// -- Handlers --

/// GET /api/v1/vendors: one page of an entity's vendors.
#[tracing::instrument(skip(state, headers))]
pub async fn list<S: VendorStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Query(params): Query<ListVendorsParams>,
) -> Result<Json<ListVendorsResponse>, ApiError> {
    let entity_id = parse_entity_id(params.entity_id.as_deref())?;
    identify(&state, &headers, Some(entity_id))?;

    // Unparseable numbers fall back to the defaults, like absent ones.
    let page = params.page.and_then(|p| p.parse().ok());
    let page_size = params.page_size.and_then(|s| s.parse().ok());

    let result = state
        .service
        .list_vendors(ListVendors {
            entity_id,
            status: params.status,
            vendor_type: params.vendor_type,
            active_only: params.active_only.as_deref() == Some("true"),
            pagination: Pagination::new(page, page_size),
        })
        .await?;

    Ok(Json(ListVendorsResponse {
        vendors: result.vendors,
        total: result.total,
        page: result.page,
        page_size: result.page_size,
    }))
}

/// POST /api/v1/vendors: register a vendor pending approval.
#[tracing::instrument(skip(state, headers, req))]
pub async fn create<S: VendorStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Json(req): Json<CreateVendorRequest>,
) -> Result<(StatusCode, Json<Vendor>), ApiError> {
    let entity_id = parse_entity_id(Some(&req.entity_id))?;
    let created_by = identify(&state, &headers, Some(entity_id))?;

    let vendor = state
        .service
        .create_vendor(CreateVendor {
            entity_id,
            details: req.details,
            created_by,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(vendor)))
}

/// GET /api/v1/vendors/{id}
#[tracing::instrument(skip(state, headers))]
pub async fn get<S: VendorStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(scope): Query<EntityScope>,
) -> Result<Json<Vendor>, ApiError> {
    let id = parse_vendor_id(&id)?;
    let entity_id = parse_entity_id(scope.entity_id.as_deref())?;
    identify(&state, &headers, Some(entity_id))?;

    Ok(Json(state.service.get_vendor(id, entity_id).await?))
}

/// GET /api/v1/vendors/by-code/{code}
#[tracing::instrument(skip(state, headers))]
pub async fn get_by_code<S: VendorStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(code): Path<String>,
    Query(scope): Query<EntityScope>,
) -> Result<Json<Vendor>, ApiError> {
    let entity_id = parse_entity_id(scope.entity_id.as_deref())?;
    identify(&state, &headers, Some(entity_id))?;

    Ok(Json(
        state.service.get_vendor_by_code(entity_id, &code).await?,
    ))
}

/// PUT /api/v1/vendors/{id}: full replacement of the editable fields.
#[tracing::instrument(skip(state, headers, req))]
pub async fn update<S: VendorStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<UpdateVendorRequest>,
) -> Result<Json<Vendor>, ApiError> {
    let id = parse_vendor_id(&id)?;
    let entity_id = parse_entity_id(Some(&req.entity_id))?;
    let updated_by = identify(&state, &headers, Some(entity_id))?;

    let vendor = state
        .service
        .update_vendor(UpdateVendor {
            id,
            entity_id,
            status: req.status,
            details: req.details,
            updated_by,
        })
        .await?;

    Ok(Json(vendor))
}

/// DELETE /api/v1/vendors/{id}
#[tracing::instrument(skip(state, headers))]
pub async fn delete<S: VendorStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(scope): Query<EntityScope>,
) -> Result<StatusCode, ApiError> {
    let id = parse_vendor_id(&id)?;
    let entity_id = parse_entity_id(scope.entity_id.as_deref())?;
    identify(&state, &headers, Some(entity_id))?;

    state.service.delete_vendor(id, entity_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/vendors/{id}/activate
#[tracing::instrument(skip(state, headers))]
pub async fn activate<S: VendorStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(scope): Query<EntityScope>,
) -> Result<Json<Vendor>, ApiError> {
    let id = parse_vendor_id(&id)?;
    let entity_id = parse_entity_id(scope.entity_id.as_deref())?;
    let actor = identify(&state, &headers, Some(entity_id))?;

    Ok(Json(
        state.service.activate_vendor(id, entity_id, actor).await?,
    ))
}

/// POST /api/v1/vendors/{id}/deactivate
#[tracing::instrument(skip(state, headers))]
pub async fn deactivate<S: VendorStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(scope): Query<EntityScope>,
) -> Result<Json<Vendor>, ApiError> {
    let id = parse_vendor_id(&id)?;
    let entity_id = parse_entity_id(scope.entity_id.as_deref())?;
    let actor = identify(&state, &headers, Some(entity_id))?;

    Ok(Json(
        state.service.deactivate_vendor(id, entity_id, actor).await?,
    ))
}

/// GET /api/v1/vendors/{id}/validate: whether invoices may be raised.
#[tracing::instrument(skip(state, headers))]
pub async fn validate<S: VendorStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(scope): Query<EntityScope>,
) -> Result<Json<ValidateVendorResponse>, ApiError> {
    let id = parse_vendor_id(&id)?;
    let entity_id = parse_entity_id(scope.entity_id.as_deref())?;
    identify(&state, &headers, Some(entity_id))?;

    let result = state.service.validate_vendor(id, entity_id).await?;
    Ok(Json(ValidateVendorResponse {
        valid: result.is_valid,
        message: result.reason,
    }))
}

/// POST /api/v1/vendors/{id}/balance: apply a signed delta.
#[tracing::instrument(skip(state, headers, req))]
pub async fn update_balance<S: VendorStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<UpdateBalanceRequest>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let id = parse_vendor_id(&id)?;
    let entity_id = parse_entity_id(Some(&req.entity_id))?;
    identify(&state, &headers, Some(entity_id))?;

    let current_balance = state
        .service
        .update_balance(id, entity_id, req.amount)
        .await?;

    Ok(Json(BalanceResponse {
        status: "updated",
        current_balance,
    }))
}
