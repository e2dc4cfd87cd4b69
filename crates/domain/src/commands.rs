//! Vendor commands and their results.

use common::{EntityId, Pagination, UserId, VendorId};
use serde::{Deserialize, Serialize};
use vendor_store::Vendor;

/// Caller-supplied vendor fields, before normalization.
///
/// Enumerated fields are free text here; they are case-folded and checked
/// against their value sets by the service. Create and update both carry the
/// full set, there is no partial update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VendorDetails {
    pub vendor_code: String,
    pub vendor_name: String,
    pub legal_name: Option<String>,
    pub vendor_type: String,

    pub tax_id: Option<String>,
    #[serde(default)]
    pub is_tax_exempt: bool,
    #[serde(default)]
    pub is_1099_vendor: bool,

    pub email: Option<String>,
    pub phone: Option<String>,
    pub fax: Option<String>,
    pub website: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state_province: Option<String>,
    pub postal_code: Option<String>,
    pub country: String,

    pub payment_terms: String,
    pub payment_method: Option<String>,
    pub currency: String,
    pub credit_limit: Option<i64>,

    pub bank_name: Option<String>,
    pub bank_account_number: Option<String>,
    pub bank_routing_number: Option<String>,
    pub swift_code: Option<String>,
    pub iban: Option<String>,

    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Command to register a new vendor. It always starts pending approval.
#[derive(Debug, Clone)]
pub struct CreateVendor {
    pub entity_id: EntityId,
    pub details: VendorDetails,
    pub created_by: Option<UserId>,
}

/// Command to replace every editable field of a vendor.
#[derive(Debug, Clone)]
pub struct UpdateVendor {
    pub id: VendorId,
    pub entity_id: EntityId,
    /// One of the vendor status labels, any case.
    pub status: String,
    pub details: VendorDetails,
    pub updated_by: Option<UserId>,
}

/// Query for one page of an entity's vendors.
#[derive(Debug, Clone)]
pub struct ListVendors {
    pub entity_id: EntityId,
    pub status: Option<String>,
    pub vendor_type: Option<String>,
    /// Overrides `status` with `active` when set.
    pub active_only: bool,
    pub pagination: Pagination,
}

impl ListVendors {
    /// Lists every vendor of the entity, first page.
    pub fn for_entity(entity_id: EntityId) -> Self {
        Self {
            entity_id,
            status: None,
            vendor_type: None,
            active_only: false,
            pagination: Pagination::default(),
        }
    }
}

/// One page of vendors plus the size of the whole filtered set.
#[derive(Debug, Clone)]
pub struct VendorPage {
    pub vendors: Vec<Vendor>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

/// Command to attach a contact person to a vendor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddVendorContact {
    #[serde(skip)]
    pub vendor_id: VendorId,
    pub contact_type: String,
    pub first_name: String,
    pub last_name: String,
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
    pub notes: Option<String>,
}

/// Outcome of the invoice-eligibility gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VendorValidation {
    pub is_valid: bool,
    /// Empty when valid.
    pub reason: String,
}

impl VendorValidation {
    pub(crate) fn valid() -> Self {
        Self {
            is_valid: true,
            reason: String::new(),
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            reason: reason.into(),
        }
    }
}
