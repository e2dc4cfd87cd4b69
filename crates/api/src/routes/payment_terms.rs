//! Payment-terms catalog endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use serde::Serialize;
use vendor_store::{PaymentTerm, VendorStore};

use super::identify;
use crate::AppState;
use crate::error::ApiError;

#[derive(Serialize)]
pub struct PaymentTermsResponse {
    pub payment_terms: Vec<PaymentTerm>,
}

/// GET /api/v1/payment-terms: active terms by ascending net days.
#[tracing::instrument(skip(state, headers))]
pub async fn list<S: VendorStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<Json<PaymentTermsResponse>, ApiError> {
    identify(&state, &headers, None)?;

    let payment_terms = state.service.get_payment_terms().await?;
    Ok(Json(PaymentTermsResponse { payment_terms }))
}
