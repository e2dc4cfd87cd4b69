//! Domain error types.

use common::VendorId;
use thiserror::Error;
use vendor_store::StoreError;

/// Coarse classification of a [`DomainError`], used by the transports to
/// pick a wire status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    InvalidInput,
    FailedPrecondition,
    Internal,
}

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No row matched the key within the caller's entity.
    #[error("{resource} not found: {key}")]
    NotFound { resource: &'static str, key: String },

    /// A uniqueness rule rejected the write.
    #[error("{resource} already exists: {key}")]
    AlreadyExists { resource: &'static str, key: String },

    /// A field failed validation.
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    /// The vendor still has invoices or payments in flight.
    #[error("vendor {vendor_id} has open obligations")]
    OpenObligations { vendor_id: VendorId },

    /// A check, foreign-key or column-width rule rejected the write.
    #[error("constraint violated: {0}")]
    Constraint(StoreError),

    /// The obligations collaborator could not answer.
    #[error("obligations check failed: {0}")]
    Obligations(String),

    /// Any other store failure.
    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        #[source]
        source: StoreError,
    },
}

impl DomainError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        DomainError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn vendor_not_found(key: impl ToString) -> Self {
        DomainError::NotFound {
            resource: "vendor",
            key: key.to_string(),
        }
    }

    /// Wraps a store failure, keeping constraint rejections distinguishable.
    pub(crate) fn store(context: &'static str, source: StoreError) -> Self {
        match source {
            StoreError::CheckViolation { .. }
            | StoreError::ForeignKeyViolation { .. }
            | StoreError::ValueTooLong { .. } => DomainError::Constraint(source),
            source => DomainError::Store { context, source },
        }
    }

    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::NotFound { .. } => ErrorKind::NotFound,
            DomainError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            DomainError::InvalidInput { .. } => ErrorKind::InvalidInput,
            DomainError::OpenObligations { .. } | DomainError::Constraint(_) => {
                ErrorKind::FailedPrecondition
            }
            DomainError::Obligations(_) | DomainError::Store { .. } => ErrorKind::Internal,
        }
    }

    /// Returns the offending field for validation errors.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            DomainError::InvalidInput { field, .. } => Some(field),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_errors_are_preconditions() {
        let err = DomainError::store(
            "adjust balance",
            StoreError::CheckViolation {
                constraint: "chk_vendors_current_balance".to_string(),
            },
        );
        assert_eq!(err.kind(), ErrorKind::FailedPrecondition);
        assert!(err.to_string().contains("chk_vendors_current_balance"));
    }

    #[test]
    fn other_store_errors_are_internal_with_context() {
        let err = DomainError::store(
            "load vendor",
            StoreError::InvalidColumn {
                column: "status",
                value: "archived".to_string(),
            },
        );
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(err.to_string().starts_with("load vendor: "));
    }

    #[test]
    fn store_width_rejections_are_preconditions() {
        let err = DomainError::store("create vendor", StoreError::ValueTooLong { column: None });
        assert_eq!(err.kind(), ErrorKind::FailedPrecondition);
    }

    #[test]
    fn invalid_input_carries_field() {
        let err = DomainError::invalid("currency", "currency must be 3-letter ISO code");
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(err.field(), Some("currency"));
        assert_eq!(
            err.to_string(),
            "invalid currency: currency must be 3-letter ISO code"
        );
    }
}
