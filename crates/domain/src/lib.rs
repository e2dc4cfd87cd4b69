//! Domain layer for vendor master data.
//!
//! This crate holds the rules that decide whether a vendor mutation is
//! admissible:
//! - field normalization and enumerated-value checks
//! - vendor-code uniqueness within an entity
//! - the invoice-eligibility gate and balance adjustments
//! - the open-obligations hook consulted before a vendor is retired

pub mod commands;
pub mod error;
pub mod obligations;
pub mod service;
pub mod validation;

pub use commands::{
    AddVendorContact, CreateVendor, ListVendors, UpdateVendor, VendorDetails, VendorPage,
    VendorValidation,
};
pub use error::{DomainError, ErrorKind};
pub use obligations::{InMemoryObligations, NoOpenObligations, ObligationsCheck};
pub use service::VendorService;
