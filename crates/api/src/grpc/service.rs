//! `VendorsService` implementation over the shared [`AppState`].

use std::sync::Arc;

use common::{EntityId, Pagination};
use domain::{CreateVendor, ListVendors, UpdateVendor};
use tonic::{Request, Response, Status};
use vendor_store::VendorStore;

use super::convert::{self, entity_id, vendor_id};
use super::interceptor::caller;
use super::proto::{self, vendors_service_server::VendorsService};
use super::status::{from_auth, from_domain};
use crate::AppState;
use crate::auth::Caller;

/// gRPC adapter. Expects [`super::AuthInterceptor`] in front of it.
pub struct VendorsGrpcService<S: VendorStore> {
    state: Arc<AppState<S>>,
}

impl<S: VendorStore> VendorsGrpcService<S> {
    pub fn new(state: Arc<AppState<S>>) -> Self {
        Self { state }
    }
}

/// Parses the request's entity and checks it against the caller's.
fn scope(caller: &Caller, raw: &str) -> Result<EntityId, Status> {
    let entity_id = entity_id(raw)?;
    caller.authorize(entity_id).map_err(from_auth)?;
    Ok(entity_id)
}

fn ok(message: &str) -> Response<proto::OperationResponse> {
    Response::new(proto::OperationResponse {
        success: true,
        message: message.to_string(),
    })
}

#[tonic::async_trait]
impl<S: VendorStore + 'static> VendorsService for VendorsGrpcService<S> {
    #[tracing::instrument(skip(self, request))]
    async fn create_vendor(
        &self,
        request: Request<proto::CreateVendorRequest>,
    ) -> Result<Response<proto::CreateVendorResponse>, Status> {
        let caller = caller(&request)?;
        let req = request.into_inner();
        let entity_id = scope(&caller, &req.entity_id)?;

        let vendor = self
            .state
            .service
            .create_vendor(CreateVendor {
                entity_id,
                details: convert::details_from_proto(req.details)?,
                created_by: Some(caller.user_id),
            })
            .await
            .map_err(from_domain)?;

        Ok(Response::new(proto::CreateVendorResponse {
            vendor: Some(convert::vendor_to_proto(vendor)),
        }))
    }

    #[tracing::instrument(skip(self, request))]
    async fn get_vendor(
        &self,
        request: Request<proto::GetVendorRequest>,
    ) -> Result<Response<proto::GetVendorResponse>, Status> {
        let caller = caller(&request)?;
        let req = request.into_inner();
        let entity_id = scope(&caller, &req.entity_id)?;

        let vendor = self
            .state
            .service
            .get_vendor(vendor_id(&req.id)?, entity_id)
            .await
            .map_err(from_domain)?;

        Ok(Response::new(proto::GetVendorResponse {
            vendor: Some(convert::vendor_to_proto(vendor)),
        }))
    }

    #[tracing::instrument(skip(self, request))]
    async fn get_vendor_by_code(
        &self,
        request: Request<proto::GetVendorByCodeRequest>,
    ) -> Result<Response<proto::GetVendorResponse>, Status> {
        let caller = caller(&request)?;
        let req = request.into_inner();
        let entity_id = scope(&caller, &req.entity_id)?;

        let vendor = self
            .state
            .service
            .get_vendor_by_code(entity_id, &req.vendor_code)
            .await
            .map_err(from_domain)?;

        Ok(Response::new(proto::GetVendorResponse {
            vendor: Some(convert::vendor_to_proto(vendor)),
        }))
    }

    #[tracing::instrument(skip(self, request))]
    async fn update_vendor(
        &self,
        request: Request<proto::UpdateVendorRequest>,
    ) -> Result<Response<proto::UpdateVendorResponse>, Status> {
        let caller = caller(&request)?;
        let req = request.into_inner();
        let entity_id = scope(&caller, &req.entity_id)?;

        let vendor = self
            .state
            .service
            .update_vendor(UpdateVendor {
                id: vendor_id(&req.id)?,
                entity_id,
                status: req.status,
                details: convert::details_from_proto(req.details)?,
                updated_by: Some(caller.user_id),
            })
            .await
            .map_err(from_domain)?;

        Ok(Response::new(proto::UpdateVendorResponse {
            vendor: Some(convert::vendor_to_proto(vendor)),
        }))
    }

    #[tracing::instrument(skip(self, request))]
    async fn delete_vendor(
        &self,
        request: Request<proto::DeleteVendorRequest>,
    ) -> Result<Response<proto::OperationResponse>, Status> {
        let caller = caller(&request)?;
        let req = request.into_inner();
        let entity_id = scope(&caller, &req.entity_id)?;

        self.state
            .service
            .delete_vendor(vendor_id(&req.id)?, entity_id)
            .await
            .map_err(from_domain)?;

        Ok(ok("vendor deleted successfully"))
    }

    #[tracing::instrument(skip(self, request))]
    async fn list_vendors(
        &self,
        request: Request<proto::ListVendorsRequest>,
    ) -> Result<Response<proto::ListVendorsResponse>, Status> {
        let caller = caller(&request)?;
        let req = request.into_inner();
        let entity_id = scope(&caller, &req.entity_id)?;

        let page = self
            .state
            .service
            .list_vendors(ListVendors {
                entity_id,
                status: req.status,
                vendor_type: req.vendor_type,
                active_only: req.active_only,
                pagination: Pagination::new(Some(req.page.into()), Some(req.page_size.into())),
            })
            .await
            .map_err(from_domain)?;

        Ok(Response::new(proto::ListVendorsResponse {
            vendors: page
                .vendors
                .into_iter()
                .map(convert::vendor_to_proto)
                .collect(),
            total: i64::try_from(page.total).unwrap_or(i64::MAX),
            page: i32::try_from(page.page).unwrap_or(i32::MAX),
            page_size: i32::try_from(page.page_size).unwrap_or(i32::MAX),
        }))
    }

    #[tracing::instrument(skip(self, request))]
    async fn activate_vendor(
        &self,
        request: Request<proto::VendorStatusRequest>,
    ) -> Result<Response<proto::OperationResponse>, Status> {
        let caller = caller(&request)?;
        let req = request.into_inner();
        let entity_id = scope(&caller, &req.entity_id)?;

        self.state
            .service
            .activate_vendor(vendor_id(&req.id)?, entity_id, Some(caller.user_id))
            .await
            .map_err(from_domain)?;

        Ok(ok("vendor activated successfully"))
    }

    #[tracing::instrument(skip(self, request))]
    async fn deactivate_vendor(
        &self,
        request: Request<proto::VendorStatusRequest>,
    ) -> Result<Response<proto::OperationResponse>, Status> {
        let caller = caller(&request)?;
        let req = request.into_inner();
        let entity_id = scope(&caller, &req.entity_id)?;

        self.state
            .service
            .deactivate_vendor(vendor_id(&req.id)?, entity_id, Some(caller.user_id))
            .await
            .map_err(from_domain)?;

        Ok(ok("vendor deactivated successfully"))
    }

    #[tracing::instrument(skip(self, request))]
    async fn validate_vendor(
        &self,
        request: Request<proto::ValidateVendorRequest>,
    ) -> Result<Response<proto::ValidateVendorResponse>, Status> {
        let caller = caller(&request)?;
        let req = request.into_inner();
        let entity_id = scope(&caller, &req.entity_id)?;

        let result = self
            .state
            .service
            .validate_vendor(vendor_id(&req.id)?, entity_id)
            .await
            .map_err(from_domain)?;

        Ok(Response::new(proto::ValidateVendorResponse {
            valid: result.is_valid,
            message: result.reason,
        }))
    }

    #[tracing::instrument(skip(self, request))]
    async fn update_balance(
        &self,
        request: Request<proto::UpdateBalanceRequest>,
    ) -> Result<Response<proto::UpdateBalanceResponse>, Status> {
        let caller = caller(&request)?;
        let req = request.into_inner();
        let entity_id = scope(&caller, &req.entity_id)?;

        let current_balance = self
            .state
            .service
            .update_balance(vendor_id(&req.id)?, entity_id, req.amount)
            .await
            .map_err(from_domain)?;

        Ok(Response::new(proto::UpdateBalanceResponse { current_balance }))
    }

    #[tracing::instrument(skip(self, request))]
    async fn add_vendor_contact(
        &self,
        request: Request<proto::AddVendorContactRequest>,
    ) -> Result<Response<proto::AddVendorContactResponse>, Status> {
        let caller = caller(&request)?;
        let req = request.into_inner();
        let entity_id = scope(&caller, &req.entity_id)?;
        let vendor_id = vendor_id(&req.vendor_id)?;

        // The vendor must belong to the caller's entity.
        self.state
            .service
            .get_vendor(vendor_id, entity_id)
            .await
            .map_err(from_domain)?;

        let contact = self
            .state
            .service
            .add_vendor_contact(convert::contact_from_proto(vendor_id, req))
            .await
            .map_err(from_domain)?;

        Ok(Response::new(proto::AddVendorContactResponse {
            contact: Some(convert::contact_to_proto(contact)),
        }))
    }

    #[tracing::instrument(skip(self, request))]
    async fn get_vendor_contacts(
        &self,
        request: Request<proto::GetVendorContactsRequest>,
    ) -> Result<Response<proto::GetVendorContactsResponse>, Status> {
        caller(&request)?;
        let req = request.into_inner();

        let contacts = self
            .state
            .service
            .get_vendor_contacts(vendor_id(&req.vendor_id)?)
            .await
            .map_err(from_domain)?;

        Ok(Response::new(proto::GetVendorContactsResponse {
            contacts: contacts.into_iter().map(convert::contact_to_proto).collect(),
        }))
    }

    #[tracing::instrument(skip(self, request))]
    async fn list_payment_terms(
        &self,
        request: Request<proto::ListPaymentTermsRequest>,
    ) -> Result<Response<proto::ListPaymentTermsResponse>, Status> {
        caller(&request)?;

        let terms = self
            .state
            .service
            .get_payment_terms()
            .await
            .map_err(from_domain)?;

        Ok(Response::new(proto::ListPaymentTermsResponse {
            payment_terms: terms
                .into_iter()
                .map(convert::payment_term_to_proto)
                .collect(),
        }))
    }
}
