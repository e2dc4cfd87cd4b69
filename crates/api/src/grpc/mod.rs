//! gRPC transport: `vendors.v1.VendorsService`.

pub mod convert;
pub mod interceptor;
pub mod service;
pub mod status;

/// Generated protobuf messages and service stubs.
pub mod proto {
    tonic::include_proto!("vendors.v1");
}

pub use interceptor::AuthInterceptor;
pub use proto::vendors_service_server::{VendorsService, VendorsServiceServer};
pub use service::VendorsGrpcService;
