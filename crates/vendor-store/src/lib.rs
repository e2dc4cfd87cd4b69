//! Storage boundary for vendor master data.
//!
//! The [`VendorStore`] trait is the only way the domain layer touches
//! persistent state. Two implementations are provided: [`PostgresVendorStore`]
//! for production and [`InMemoryVendorStore`], which enforces the same
//! constraints, for tests and local development.

pub mod catalog;
pub mod error;
pub mod memory;
pub mod model;
pub mod postgres;
pub mod query;
pub mod store;

pub use common::{
    ContactId, ContactType, EntityId, PaymentMethod, UserId, VendorId, VendorStatus, VendorType,
};
pub use error::{Result, StoreError, constraints};
pub use memory::InMemoryVendorStore;
pub use model::{NewVendor, NewVendorContact, PaymentTerm, Vendor, VendorContact, VendorProfile};
pub use postgres::PostgresVendorStore;
pub use query::VendorQuery;
pub use store::VendorStore;
