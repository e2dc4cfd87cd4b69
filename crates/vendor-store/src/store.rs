use async_trait::async_trait;
use common::{EntityId, UserId, VendorId, VendorStatus};

use crate::{
    NewVendor, NewVendorContact, PaymentTerm, Result, Vendor, VendorContact, VendorProfile,
    VendorQuery,
};

/// Persistence boundary for vendors, contacts and payment terms.
///
/// Every vendor lookup that takes an [`EntityId`] is scoped to it: a vendor
/// owned by another entity behaves exactly like a missing one. Constraint
/// violations surface as the matching [`crate::StoreError`] variant carrying
/// the constraint name.
///
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait VendorStore: Send + Sync {
    /// Inserts a vendor with a zero balance and returns the stored row.
    async fn create_vendor(&self, vendor: NewVendor) -> Result<Vendor>;

    /// Fetches a vendor by id within an entity.
    async fn get_vendor(&self, id: VendorId, entity_id: EntityId) -> Result<Option<Vendor>>;

    /// Fetches a vendor by its (already normalized) code within an entity.
    async fn get_vendor_by_code(&self, entity_id: EntityId, code: &str)
    -> Result<Option<Vendor>>;

    /// Replaces the profile and status of a vendor, stamping `updated_at`.
    ///
    /// Returns `None` if no vendor matches `(id, entity_id)`.
    async fn update_vendor(
        &self,
        id: VendorId,
        entity_id: EntityId,
        status: VendorStatus,
        profile: VendorProfile,
        updated_by: Option<UserId>,
    ) -> Result<Option<Vendor>>;

    /// Deletes a vendor and its contacts. Returns false if nothing matched.
    async fn delete_vendor(&self, id: VendorId, entity_id: EntityId) -> Result<bool>;

    /// Returns one page of vendors ordered by name, plus the total number of
    /// vendors matching the filters.
    async fn list_vendors(&self, query: VendorQuery) -> Result<(Vec<Vendor>, u64)>;

    /// Atomically adds `delta` to the balance and returns the new value.
    ///
    /// Returns `None` if no vendor matches. A result below zero is rejected
    /// with a check violation and leaves the balance untouched.
    async fn adjust_balance(
        &self,
        id: VendorId,
        entity_id: EntityId,
        delta: i64,
    ) -> Result<Option<i64>>;

    /// Inserts a contact for an existing vendor.
    async fn add_contact(&self, contact: NewVendorContact) -> Result<VendorContact>;

    /// Lists contacts of a vendor, primary contacts first, then by name.
    async fn list_contacts(&self, vendor_id: VendorId) -> Result<Vec<VendorContact>>;

    /// Lists active payment terms ordered by net days, then code.
    async fn list_active_payment_terms(&self) -> Result<Vec<PaymentTerm>>;
}
