//! Vendor service: validation, uniqueness and balance rules over a
//! [`VendorStore`].

use std::sync::Arc;

use common::{EntityId, Pagination, UserId, VendorId, VendorStatus};
use vendor_store::{
    NewVendor, NewVendorContact, PaymentTerm, StoreError, Vendor, VendorContact, VendorQuery,
    VendorStore,
};

use crate::commands::{
    AddVendorContact, CreateVendor, ListVendors, UpdateVendor, VendorPage, VendorValidation,
};
use crate::error::DomainError;
use crate::obligations::{NoOpenObligations, ObligationsCheck};
use crate::validation::{
    check_width, normalize_code, normalize_profile, parse_contact_type, parse_status,
    parse_vendor_type,
};

/// Service for managing vendors.
///
/// Code uniqueness is pre-checked for a friendlier error, but the store's
/// unique constraint is authoritative: a violation it reports is turned into
/// the same [`DomainError::AlreadyExists`].
pub struct VendorService<S: VendorStore> {
    store: S,
    obligations: Arc<dyn ObligationsCheck>,
}

impl<S: VendorStore> VendorService<S> {
    /// Creates a service that never finds open obligations.
    pub fn new(store: S) -> Self {
        Self::with_obligations(store, Arc::new(NoOpenObligations))
    }

    /// Creates a service consulting `obligations` before delete and deactivate.
    pub fn with_obligations(store: S, obligations: Arc<dyn ObligationsCheck>) -> Self {
        Self { store, obligations }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Registers a vendor in `pending_approval` with a zero balance.
    #[tracing::instrument(skip(self, cmd), fields(entity_id = %cmd.entity_id))]
    pub async fn create_vendor(&self, cmd: CreateVendor) -> Result<Vendor, DomainError> {
        let code = normalize_code(&cmd.details.vendor_code);
        self.ensure_code_free(cmd.entity_id, &code).await?;

        let vendor_type = parse_vendor_type(&cmd.details.vendor_type)?;
        let profile = normalize_profile(cmd.details, vendor_type)?;

        let vendor = self
            .store
            .create_vendor(NewVendor {
                entity_id: cmd.entity_id,
                status: VendorStatus::PendingApproval,
                profile,
                created_by: cmd.created_by,
            })
            .await
            .map_err(|e| vendor_write_error("create vendor", e, &code))?;

        metrics::counter!("vendors_created_total").increment(1);
        tracing::info!(
            vendor_id = %vendor.id,
            vendor_code = %vendor.profile.vendor_code,
            entity_id = %vendor.entity_id,
            "vendor created"
        );

        Ok(vendor)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_vendor(&self, id: VendorId, entity_id: EntityId) -> Result<Vendor, DomainError> {
        self.load(id, entity_id).await
    }

    /// Looks a vendor up by code, case-insensitively.
    #[tracing::instrument(skip(self))]
    pub async fn get_vendor_by_code(
        &self,
        entity_id: EntityId,
        code: &str,
    ) -> Result<Vendor, DomainError> {
        let code = normalize_code(code);
        self.store
            .get_vendor_by_code(entity_id, &code)
            .await
            .map_err(|e| DomainError::store("load vendor by code", e))?
            .ok_or_else(|| DomainError::vendor_not_found(code))
    }

    /// Replaces every editable field of a vendor. The balance is untouched.
    #[tracing::instrument(skip(self, cmd), fields(vendor_id = %cmd.id, entity_id = %cmd.entity_id))]
    pub async fn update_vendor(&self, cmd: UpdateVendor) -> Result<Vendor, DomainError> {
        let existing = self.load(cmd.id, cmd.entity_id).await?;

        let code = normalize_code(&cmd.details.vendor_code);
        if code != existing.profile.vendor_code {
            self.ensure_code_free(cmd.entity_id, &code).await?;
        }

        let vendor_type = parse_vendor_type(&cmd.details.vendor_type)?;
        let status = parse_status(&cmd.status)?;
        let profile = normalize_profile(cmd.details, vendor_type)?;

        let vendor = self
            .store
            .update_vendor(cmd.id, cmd.entity_id, status, profile, cmd.updated_by)
            .await
            .map_err(|e| vendor_write_error("update vendor", e, &code))?
            .ok_or_else(|| DomainError::vendor_not_found(cmd.id))?;

        metrics::counter!("vendors_updated_total").increment(1);
        tracing::info!(
            vendor_id = %vendor.id,
            vendor_code = %vendor.profile.vendor_code,
            "vendor updated"
        );

        Ok(vendor)
    }

    /// Deletes a vendor together with its contacts and documents.
    #[tracing::instrument(skip(self))]
    pub async fn delete_vendor(&self, id: VendorId, entity_id: EntityId) -> Result<(), DomainError> {
        self.ensure_no_obligations(id, entity_id).await?;

        let deleted = self
            .store
            .delete_vendor(id, entity_id)
            .await
            .map_err(|e| DomainError::store("delete vendor", e))?;
        if !deleted {
            return Err(DomainError::vendor_not_found(id));
        }

        metrics::counter!("vendors_deleted_total").increment(1);
        tracing::info!(vendor_id = %id, entity_id = %entity_id, "vendor deleted");

        Ok(())
    }

    /// Returns one page of vendors ordered by name.
    #[tracing::instrument(skip(self))]
    pub async fn list_vendors(&self, query: ListVendors) -> Result<VendorPage, DomainError> {
        let mut store_query = VendorQuery::for_entity(query.entity_id);

        if query.active_only {
            store_query = store_query.status(VendorStatus::Active);
        } else if let Some(status) = non_empty(query.status.as_deref()) {
            store_query = store_query.status(parse_status(status)?);
        }
        if let Some(vendor_type) = non_empty(query.vendor_type.as_deref()) {
            store_query = store_query.vendor_type(parse_vendor_type(vendor_type)?);
        }

        let Pagination { page, page_size } = query.pagination;
        let offset = u64::from(page.saturating_sub(1)) * u64::from(page_size);
        store_query = store_query.limit(page_size).offset(offset);

        let (vendors, total) = self
            .store
            .list_vendors(store_query)
            .await
            .map_err(|e| DomainError::store("list vendors", e))?;

        Ok(VendorPage {
            vendors,
            total,
            page,
            page_size,
        })
    }

    #[tracing::instrument(skip(self))]
    pub async fn activate_vendor(
        &self,
        id: VendorId,
        entity_id: EntityId,
        actor: Option<UserId>,
    ) -> Result<Vendor, DomainError> {
        self.set_status(id, entity_id, VendorStatus::Active, actor)
            .await
    }

    /// Sets a vendor inactive, unless it still has open obligations.
    #[tracing::instrument(skip(self))]
    pub async fn deactivate_vendor(
        &self,
        id: VendorId,
        entity_id: EntityId,
        actor: Option<UserId>,
    ) -> Result<Vendor, DomainError> {
        self.set_status(id, entity_id, VendorStatus::Inactive, actor)
            .await
    }

    /// Decides whether new invoices may be raised against a vendor.
    ///
    /// Never fails for business reasons; an unknown vendor is reported as
    /// invalid rather than as an error.
    #[tracing::instrument(skip(self))]
    pub async fn validate_vendor(
        &self,
        id: VendorId,
        entity_id: EntityId,
    ) -> Result<VendorValidation, DomainError> {
        let Some(vendor) = self
            .store
            .get_vendor(id, entity_id)
            .await
            .map_err(|e| DomainError::store("load vendor", e))?
        else {
            return Ok(VendorValidation::invalid("vendor not found"));
        };

        if vendor.status != VendorStatus::Active {
            return Ok(VendorValidation::invalid(format!(
                "vendor status is '{}', must be active",
                vendor.status
            )));
        }

        if let Some(limit) = vendor.profile.credit_limit
            && vendor.current_balance >= limit
        {
            return Ok(VendorValidation::invalid(format!(
                "vendor has exceeded credit limit: balance={}, limit={}",
                vendor.current_balance, limit
            )));
        }

        Ok(VendorValidation::valid())
    }

    /// Adds a signed delta to the vendor's balance and returns the new
    /// balance. A delta that would make it negative is rejected by the store.
    #[tracing::instrument(skip(self))]
    pub async fn update_balance(
        &self,
        id: VendorId,
        entity_id: EntityId,
        amount: i64,
    ) -> Result<i64, DomainError> {
        let balance = self
            .store
            .adjust_balance(id, entity_id, amount)
            .await
            .map_err(|e| DomainError::store("adjust vendor balance", e))?
            .ok_or_else(|| DomainError::vendor_not_found(id))?;

        metrics::counter!("vendor_balance_adjustments_total").increment(1);
        tracing::info!(vendor_id = %id, amount, balance, "vendor balance adjusted");

        Ok(balance)
    }

    /// Attaches a contact. The vendor's existence is left to the store.
    #[tracing::instrument(skip(self, cmd), fields(vendor_id = %cmd.vendor_id))]
    pub async fn add_vendor_contact(
        &self,
        cmd: AddVendorContact,
    ) -> Result<VendorContact, DomainError> {
        let contact_type = parse_contact_type(&cmd.contact_type)?;
        let key = match &cmd.email {
            Some(email) => format!("{contact_type} {email}"),
            None => contact_type.to_string(),
        };

        let contact = NewVendorContact {
            vendor_id: cmd.vendor_id,
            contact_type,
            first_name: cmd.first_name,
            last_name: cmd.last_name,
            title: cmd.title,
            email: cmd.email,
            phone: cmd.phone,
            mobile: cmd.mobile,
            is_primary: cmd.is_primary,
            notes: cmd.notes,
        };
        check_width(contact.oversized_column())?;

        let contact = self
            .store
            .add_contact(contact)
            .await
            .map_err(|e| match e {
                e if e.is_unique_violation() => DomainError::AlreadyExists {
                    resource: "vendor_contact",
                    key,
                },
                e => DomainError::store("add vendor contact", e),
            })?;

        metrics::counter!("vendor_contacts_added_total").increment(1);
        tracing::info!(
            vendor_id = %contact.vendor_id,
            contact_id = %contact.id,
            "vendor contact added"
        );

        Ok(contact)
    }

    /// Lists contacts, primary first then by name.
    #[tracing::instrument(skip(self))]
    pub async fn get_vendor_contacts(
        &self,
        vendor_id: VendorId,
    ) -> Result<Vec<VendorContact>, DomainError> {
        self.store
            .list_contacts(vendor_id)
            .await
            .map_err(|e| DomainError::store("list vendor contacts", e))
    }

    /// Lists active payment terms by ascending net days.
    #[tracing::instrument(skip(self))]
    pub async fn get_payment_terms(&self) -> Result<Vec<PaymentTerm>, DomainError> {
        self.store
            .list_active_payment_terms()
            .await
            .map_err(|e| DomainError::store("list payment terms", e))
    }

    async fn load(&self, id: VendorId, entity_id: EntityId) -> Result<Vendor, DomainError> {
        self.store
            .get_vendor(id, entity_id)
            .await
            .map_err(|e| DomainError::store("load vendor", e))?
            .ok_or_else(|| DomainError::vendor_not_found(id))
    }

    async fn ensure_code_free(&self, entity_id: EntityId, code: &str) -> Result<(), DomainError> {
        let existing = self
            .store
            .get_vendor_by_code(entity_id, code)
            .await
            .map_err(|e| DomainError::store("check vendor code", e))?;
        match existing {
            Some(_) => Err(vendor_exists(code)),
            None => Ok(()),
        }
    }

    async fn ensure_no_obligations(
        &self,
        id: VendorId,
        entity_id: EntityId,
    ) -> Result<(), DomainError> {
        if self.obligations.has_open_obligations(id, entity_id).await? {
            tracing::warn!(vendor_id = %id, "vendor has open obligations");
            return Err(DomainError::OpenObligations { vendor_id: id });
        }
        Ok(())
    }

    async fn set_status(
        &self,
        id: VendorId,
        entity_id: EntityId,
        status: VendorStatus,
        actor: Option<UserId>,
    ) -> Result<Vendor, DomainError> {
        let existing = self.load(id, entity_id).await?;
        if status == VendorStatus::Inactive {
            self.ensure_no_obligations(id, entity_id).await?;
        }

        let code = existing.profile.vendor_code.clone();
        let vendor = self
            .store
            .update_vendor(id, entity_id, status, existing.profile, actor)
            .await
            .map_err(|e| vendor_write_error("update vendor status", e, &code))?
            .ok_or_else(|| DomainError::vendor_not_found(id))?;

        metrics::counter!("vendors_updated_total").increment(1);
        tracing::info!(
            vendor_id = %id,
            entity_id = %entity_id,
            status = %vendor.status,
            "vendor status changed"
        );

        Ok(vendor)
    }
}

fn vendor_exists(code: &str) -> DomainError {
    DomainError::AlreadyExists {
        resource: "vendor",
        key: code.to_string(),
    }
}

fn vendor_write_error(context: &'static str, err: StoreError, code: &str) -> DomainError {
    if err.is_unique_violation() {
        vendor_exists(code)
    } else {
        DomainError::store(context, err)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
