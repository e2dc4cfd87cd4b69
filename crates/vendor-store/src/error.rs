use sqlx::error::ErrorKind;
use thiserror::Error;

/// Names of the constraints declared by the schema migration.
///
/// The in-memory store reports the same names so callers can match on them
/// regardless of backend.
pub mod constraints {
    pub const VENDOR_ENTITY_CODE: &str = "uq_vendors_entity_code";
    pub const VENDOR_CURRENT_BALANCE: &str = "chk_vendors_current_balance";
    pub const VENDOR_CREDIT_LIMIT: &str = "chk_vendors_credit_limit";
    pub const VENDOR_COUNTRY: &str = "chk_vendors_country";
    pub const VENDOR_CURRENCY: &str = "chk_vendors_currency";
    pub const CONTACT_TYPE_EMAIL: &str = "uq_vendor_contacts_type_email";
    pub const CONTACT_VENDOR: &str = "fk_vendor_contacts_vendor";
}

/// Errors that can occur when interacting with the vendor store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// A check constraint rejected the write.
    #[error("Check constraint violated: {constraint}")]
    CheckViolation { constraint: String },

    /// A foreign key constraint rejected the write.
    #[error("Foreign key constraint violated: {constraint}")]
    ForeignKeyViolation { constraint: String },

    /// A text value was wider than its column.
    #[error("Value too long for column {}", .column.as_deref().unwrap_or("unknown"))]
    ValueTooLong { column: Option<String> },

    /// A column held a value this crate cannot represent.
    #[error("Invalid value '{value}' in column {column}")]
    InvalidColumn { column: &'static str, value: String },

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    /// Returns true if a unique constraint rejected the write.
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StoreError::UniqueViolation { .. })
    }

    /// Returns the violated constraint name, if this is a constraint error.
    pub fn constraint(&self) -> Option<&str> {
        match self {
            StoreError::UniqueViolation { constraint }
            | StoreError::CheckViolation { constraint }
            | StoreError::ForeignKeyViolation { constraint } => Some(constraint),
            _ => None,
        }
    }
}

/// SQLSTATE for `string_data_right_truncation`.
const STRING_DATA_RIGHT_TRUNCATION: &str = "22001";

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.code().as_deref() == Some(STRING_DATA_RIGHT_TRUNCATION) {
                return StoreError::ValueTooLong { column: None };
            }
            let constraint = db_err.constraint().unwrap_or_default().to_string();
            match db_err.kind() {
                ErrorKind::UniqueViolation => return StoreError::UniqueViolation { constraint },
                ErrorKind::CheckViolation => return StoreError::CheckViolation { constraint },
                ErrorKind::ForeignKeyViolation => {
                    return StoreError::ForeignKeyViolation { constraint };
                }
                _ => {}
            }
        }
        StoreError::Database(err)
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_is_exposed_for_constraint_errors() {
        let err = StoreError::CheckViolation {
            constraint: constraints::VENDOR_CURRENT_BALANCE.to_string(),
        };
        assert_eq!(err.constraint(), Some("chk_vendors_current_balance"));
        assert!(!err.is_unique_violation());
    }

    #[test]
    fn value_too_long_names_its_column_when_known() {
        let err = StoreError::ValueTooLong {
            column: Some("vendor_name".to_string()),
        };
        assert_eq!(err.to_string(), "Value too long for column vendor_name");
        assert_eq!(err.constraint(), None);

        let err = StoreError::ValueTooLong { column: None };
        assert_eq!(err.to_string(), "Value too long for column unknown");
    }

    #[test]
    fn non_database_sqlx_errors_stay_opaque() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Database(_)));
        assert_eq!(err.constraint(), None);
    }
}
