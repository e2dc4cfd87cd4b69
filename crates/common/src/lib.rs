//! Shared identifiers, enumerations and paging rules used by every crate of the
//! vendors service.

pub mod enums;
pub mod pagination;
pub mod types;

pub use enums::{ContactType, ParseEnumError, PaymentMethod, VendorStatus, VendorType};
pub use pagination::Pagination;
pub use types::{ContactId, EntityId, UserId, VendorId};
