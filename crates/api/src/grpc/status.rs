//! Mapping from domain and auth errors to gRPC status codes.

use domain::{DomainError, ErrorKind};
use tonic::Status;
use tracing::error;

use crate::auth::AuthError;

pub fn from_domain(err: DomainError) -> Status {
    match err.kind() {
        ErrorKind::NotFound => Status::not_found(err.to_string()),
        ErrorKind::AlreadyExists => Status::already_exists(err.to_string()),
        ErrorKind::InvalidInput => Status::invalid_argument(err.to_string()),
        ErrorKind::FailedPrecondition => Status::failed_precondition(err.to_string()),
        ErrorKind::Internal => {
            error!(error = %err, "internal error");
            Status::internal("internal error")
        }
    }
}

pub fn from_auth(err: AuthError) -> Status {
    match err {
        AuthError::EntityMismatch => Status::permission_denied(err.to_string()),
        AuthError::Missing | AuthError::MalformedHeader | AuthError::InvalidToken(_) => {
            Status::unauthenticated("authentication required")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::VendorId;
    use tonic::Code;
    use vendor_store::StoreError;

    #[test]
    fn domain_kinds_get_distinct_codes() {
        let cases = [
            (
                DomainError::NotFound {
                    resource: "vendor",
                    key: "x".to_string(),
                },
                Code::NotFound,
            ),
            (
                DomainError::AlreadyExists {
                    resource: "vendor",
                    key: "V001".to_string(),
                },
                Code::AlreadyExists,
            ),
            (
                DomainError::InvalidInput {
                    field: "currency",
                    reason: "currency must be 3-letter ISO code".to_string(),
                },
                Code::InvalidArgument,
            ),
            (
                DomainError::OpenObligations {
                    vendor_id: VendorId::new(),
                },
                Code::FailedPrecondition,
            ),
            (
                DomainError::Store {
                    context: "load vendor",
                    source: StoreError::InvalidColumn {
                        column: "status",
                        value: "archived".to_string(),
                    },
                },
                Code::Internal,
            ),
        ];

        for (err, code) in cases {
            assert_eq!(from_domain(err).code(), code);
        }
    }

    #[test]
    fn internal_details_are_hidden() {
        let status = from_domain(DomainError::Obligations("connection refused".to_string()));
        assert_eq!(status.message(), "internal error");
    }

    #[test]
    fn auth_errors_split_by_cause() {
        assert_eq!(from_auth(AuthError::Missing).code(), Code::Unauthenticated);
        let denied = from_auth(AuthError::EntityMismatch);
        assert_eq!(denied.code(), Code::PermissionDenied);
        assert_eq!(denied.message(), "access denied: entity mismatch");
    }
}
