use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::{ContactId, EntityId, UserId, VendorId, VendorStatus};
use tokio::sync::RwLock;

use crate::{
    NewVendor, NewVendorContact, PaymentTerm, Result, StoreError, Vendor, VendorContact,
    VendorProfile, VendorQuery, catalog::seeded_payment_terms, constraints, store::VendorStore,
};

#[derive(Default)]
struct Tables {
    vendors: HashMap<VendorId, Vendor>,
    contacts: Vec<VendorContact>,
}

/// In-memory vendor store for tests and local development.
///
/// Enforces the same named constraints as the PostgreSQL schema, including
/// the cascade from vendors to their contacts.
#[derive(Clone)]
pub struct InMemoryVendorStore {
    tables: Arc<RwLock<Tables>>,
    payment_terms: Arc<Vec<PaymentTerm>>,
}

impl Default for InMemoryVendorStore {
    fn default() -> Self {
        Self {
            tables: Arc::default(),
            payment_terms: Arc::new(seeded_payment_terms()),
        }
    }
}

impl InMemoryVendorStore {
    /// Creates an empty store with the seeded payment-term catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of vendors stored.
    pub async fn vendor_count(&self) -> usize {
        self.tables.read().await.vendors.len()
    }

    /// Returns the total number of contacts stored.
    pub async fn contact_count(&self) -> usize {
        self.tables.read().await.contacts.len()
    }

    /// Clears all vendors and contacts. The catalog is kept.
    pub async fn clear(&self) {
        let mut tables = self.tables.write().await;
        tables.vendors.clear();
        tables.contacts.clear();
    }
}

fn value_too_long(column: &str) -> StoreError {
    StoreError::ValueTooLong {
        column: Some(column.to_string()),
    }
}

fn check_profile(profile: &VendorProfile) -> Result<()> {
    if let Some((column, _)) = profile.oversized_column() {
        return Err(value_too_long(column));
    }

    let violated = if profile.credit_limit.is_some_and(|limit| limit < 0) {
        Some(constraints::VENDOR_CREDIT_LIMIT)
    } else if profile.country.chars().count() != 2 {
        Some(constraints::VENDOR_COUNTRY)
    } else if profile.currency.chars().count() != 3 {
        Some(constraints::VENDOR_CURRENCY)
    } else {
        None
    };

    match violated {
        Some(name) => Err(StoreError::CheckViolation {
            constraint: name.to_string(),
        }),
        None => Ok(()),
    }
}

fn code_taken(
    tables: &Tables,
    entity_id: EntityId,
    code: &str,
    except: Option<VendorId>,
) -> bool {
    tables.vendors.values().any(|v| {
        v.entity_id == entity_id && v.profile.vendor_code == code && Some(v.id) != except
    })
}

fn unique_code_violation() -> StoreError {
    StoreError::UniqueViolation {
        constraint: constraints::VENDOR_ENTITY_CODE.to_string(),
    }
}

#[async_trait]
impl VendorStore for InMemoryVendorStore {
    async fn create_vendor(&self, vendor: NewVendor) -> Result<Vendor> {
        check_profile(&vendor.profile)?;

        let mut tables = self.tables.write().await;
        if code_taken(&tables, vendor.entity_id, &vendor.profile.vendor_code, None) {
            return Err(unique_code_violation());
        }

        let now = Utc::now();
        let stored = Vendor {
            id: VendorId::new(),
            entity_id: vendor.entity_id,
            status: vendor.status,
            profile: vendor.profile,
            current_balance: 0,
            created_by: vendor.created_by,
            created_at: now,
            updated_by: None,
            updated_at: now,
        };
        tables.vendors.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get_vendor(&self, id: VendorId, entity_id: EntityId) -> Result<Option<Vendor>> {
        let tables = self.tables.read().await;
        Ok(tables
            .vendors
            .get(&id)
            .filter(|v| v.entity_id == entity_id)
            .cloned())
    }

    async fn get_vendor_by_code(
        &self,
        entity_id: EntityId,
        code: &str,
    ) -> Result<Option<Vendor>> {
        let tables = self.tables.read().await;
        Ok(tables
            .vendors
            .values()
            .find(|v| v.entity_id == entity_id && v.profile.vendor_code == code)
            .cloned())
    }

    async fn update_vendor(
        &self,
        id: VendorId,
        entity_id: EntityId,
        status: VendorStatus,
        profile: VendorProfile,
        updated_by: Option<UserId>,
    ) -> Result<Option<Vendor>> {
        check_profile(&profile)?;

        let mut tables = self.tables.write().await;
        match tables.vendors.get(&id) {
            Some(v) if v.entity_id == entity_id => {}
            _ => return Ok(None),
        }
        if code_taken(&tables, entity_id, &profile.vendor_code, Some(id)) {
            return Err(unique_code_violation());
        }

        let Some(vendor) = tables.vendors.get_mut(&id) else {
            return Ok(None);
        };
        vendor.status = status;
        vendor.profile = profile;
        vendor.updated_by = updated_by;
        vendor.updated_at = Utc::now();
        Ok(Some(vendor.clone()))
    }

    async fn delete_vendor(&self, id: VendorId, entity_id: EntityId) -> Result<bool> {
        let mut tables = self.tables.write().await;
        match tables.vendors.get(&id) {
            Some(v) if v.entity_id == entity_id => {}
            _ => return Ok(false),
        }
        tables.vendors.remove(&id);
        tables.contacts.retain(|c| c.vendor_id != id);
        Ok(true)
    }

    async fn list_vendors(&self, query: VendorQuery) -> Result<(Vec<Vendor>, u64)> {
        let tables = self.tables.read().await;
        let mut vendors: Vec<_> = tables
            .vendors
            .values()
            .filter(|v| {
                if v.entity_id != query.entity_id {
                    return false;
                }
                if let Some(status) = query.status
                    && v.status != status
                {
                    return false;
                }
                if let Some(vendor_type) = query.vendor_type
                    && v.profile.vendor_type != vendor_type
                {
                    return false;
                }
                true
            })
            .cloned()
            .collect();

        vendors.sort_by(|a, b| {
            a.profile
                .vendor_name
                .cmp(&b.profile.vendor_name)
                .then_with(|| a.profile.vendor_code.cmp(&b.profile.vendor_code))
        });

        let total = vendors.len() as u64;
        let offset = usize::try_from(query.offset.unwrap_or(0)).unwrap_or(usize::MAX);
        let limit = query.limit.map_or(usize::MAX, |l| l as usize);
        let page = vendors.into_iter().skip(offset).take(limit).collect();

        Ok((page, total))
    }

    async fn adjust_balance(
        &self,
        id: VendorId,
        entity_id: EntityId,
        delta: i64,
    ) -> Result<Option<i64>> {
        let mut tables = self.tables.write().await;
        let Some(vendor) = tables
            .vendors
            .get_mut(&id)
            .filter(|v| v.entity_id == entity_id)
        else {
            return Ok(None);
        };

        // Overflow and negative results both fail the balance check.
        let balance = vendor
            .current_balance
            .checked_add(delta)
            .filter(|b| *b >= 0)
            .ok_or_else(|| StoreError::CheckViolation {
                constraint: constraints::VENDOR_CURRENT_BALANCE.to_string(),
            })?;

        vendor.current_balance = balance;
        vendor.updated_at = Utc::now();
        Ok(Some(balance))
    }

    async fn add_contact(&self, contact: NewVendorContact) -> Result<VendorContact> {
        if let Some((column, _)) = contact.oversized_column() {
            return Err(value_too_long(column));
        }

        let mut tables = self.tables.write().await;
        if !tables.vendors.contains_key(&contact.vendor_id) {
            return Err(StoreError::ForeignKeyViolation {
                constraint: constraints::CONTACT_VENDOR.to_string(),
            });
        }

        // NULL emails never collide, as in SQL.
        if let Some(email) = &contact.email {
            let duplicate = tables.contacts.iter().any(|c| {
                c.vendor_id == contact.vendor_id
                    && c.contact_type == contact.contact_type
                    && c.email.as_ref() == Some(email)
            });
            if duplicate {
                return Err(StoreError::UniqueViolation {
                    constraint: constraints::CONTACT_TYPE_EMAIL.to_string(),
                });
            }
        }

        let now = Utc::now();
        let stored = VendorContact {
            id: ContactId::new(),
            vendor_id: contact.vendor_id,
            contact_type: contact.contact_type,
            first_name: contact.first_name,
            last_name: contact.last_name,
            title: contact.title,
            email: contact.email,
            phone: contact.phone,
            mobile: contact.mobile,
            is_primary: contact.is_primary,
            notes: contact.notes,
            created_at: now,
            updated_at: now,
        };
        tables.contacts.push(stored.clone());
        Ok(stored)
    }

    async fn list_contacts(&self, vendor_id: VendorId) -> Result<Vec<VendorContact>> {
        let tables = self.tables.read().await;
        let mut contacts: Vec<_> = tables
            .contacts
            .iter()
            .filter(|c| c.vendor_id == vendor_id)
            .cloned()
            .collect();
        contacts.sort_by(|a, b| {
            b.is_primary
                .cmp(&a.is_primary)
                .then_with(|| a.first_name.cmp(&b.first_name))
                .then_with(|| a.last_name.cmp(&b.last_name))
        });
        Ok(contacts)
    }

    async fn list_active_payment_terms(&self) -> Result<Vec<PaymentTerm>> {
        let mut terms: Vec<_> = self
            .payment_terms
            .iter()
            .filter(|t| t.is_active)
            .cloned()
            .collect();
        terms.sort_by(|a, b| a.net_days.cmp(&b.net_days).then_with(|| a.code.cmp(&b.code)));
        Ok(terms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{ContactType, VendorType};

    fn profile(code: &str, name: &str) -> VendorProfile {
        VendorProfile {
            vendor_code: code.to_string(),
            vendor_name: name.to_string(),
            legal_name: None,
            vendor_type: VendorType::Supplier,
            tax_id: None,
            is_tax_exempt: false,
            is_1099_vendor: false,
            email: None,
            phone: None,
            fax: None,
            website: None,
            address_line1: None,
            address_line2: None,
            city: None,
            state_province: None,
            postal_code: None,
            country: "US".to_string(),
            payment_terms: "NET30".to_string(),
            payment_method: None,
            currency: "USD".to_string(),
            credit_limit: None,
            bank_name: None,
            bank_account_number: None,
            bank_routing_number: None,
            swift_code: None,
            iban: None,
            notes: None,
            tags: Vec::new(),
        }
    }

    fn new_vendor(entity_id: EntityId, code: &str, name: &str) -> NewVendor {
        NewVendor {
            entity_id,
            status: VendorStatus::PendingApproval,
            profile: profile(code, name),
            created_by: None,
        }
    }

    fn new_contact(vendor_id: VendorId, first: &str, email: Option<&str>) -> NewVendorContact {
        NewVendorContact {
            vendor_id,
            contact_type: ContactType::Billing,
            first_name: first.to_string(),
            last_name: "Smith".to_string(),
            title: None,
            email: email.map(str::to_string),
            phone: None,
            mobile: None,
            is_primary: false,
            notes: None,
        }
    }

    #[tokio::test]
    async fn create_and_get_vendor() {
        let store = InMemoryVendorStore::new();
        let entity = EntityId::new();

        let created = store
            .create_vendor(new_vendor(entity, "ACME", "Acme Corp"))
            .await
            .unwrap();
        assert_eq!(created.current_balance, 0);
        assert_eq!(created.status, VendorStatus::PendingApproval);

        let fetched = store.get_vendor(created.id, entity).await.unwrap();
        assert_eq!(fetched, Some(created.clone()));

        let by_code = store.get_vendor_by_code(entity, "ACME").await.unwrap();
        assert_eq!(by_code.map(|v| v.id), Some(created.id));
    }

    #[tokio::test]
    async fn vendors_are_scoped_to_entity() {
        let store = InMemoryVendorStore::new();
        let entity = EntityId::new();
        let other = EntityId::new();

        let created = store
            .create_vendor(new_vendor(entity, "ACME", "Acme Corp"))
            .await
            .unwrap();

        assert!(store.get_vendor(created.id, other).await.unwrap().is_none());
        assert!(!store.delete_vendor(created.id, other).await.unwrap());
        assert!(
            store
                .adjust_balance(created.id, other, 10)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn duplicate_code_in_same_entity_is_rejected() {
        let store = InMemoryVendorStore::new();
        let entity = EntityId::new();

        store
            .create_vendor(new_vendor(entity, "ACME", "Acme Corp"))
            .await
            .unwrap();
        let err = store
            .create_vendor(new_vendor(entity, "ACME", "Other"))
            .await
            .unwrap_err();
        assert_eq!(err.constraint(), Some(constraints::VENDOR_ENTITY_CODE));

        // Same code is fine in another entity.
        store
            .create_vendor(new_vendor(EntityId::new(), "ACME", "Acme Corp"))
            .await
            .unwrap();
        assert_eq!(store.vendor_count().await, 2);
    }

    #[tokio::test]
    async fn check_constraints_are_enforced() {
        let store = InMemoryVendorStore::new();
        let mut vendor = new_vendor(EntityId::new(), "ACME", "Acme Corp");
        vendor.profile.currency = "US".to_string();

        let err = store.create_vendor(vendor).await.unwrap_err();
        assert!(matches!(err, StoreError::CheckViolation { .. }));
        assert_eq!(err.constraint(), Some(constraints::VENDOR_CURRENCY));
    }

    #[tokio::test]
    async fn oversized_values_are_rejected() {
        let store = InMemoryVendorStore::new();
        let mut vendor = new_vendor(EntityId::new(), "ACME", "Acme Corp");
        vendor.profile.swift_code = Some("X".repeat(21));

        let err = store.create_vendor(vendor).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::ValueTooLong { column: Some(ref c) } if c == "swift_code"
        ));
        assert_eq!(store.vendor_count().await, 0);

        let created = store
            .create_vendor(new_vendor(EntityId::new(), "ACME", "Acme Corp"))
            .await
            .unwrap();
        let mut contact = new_contact(created.id, "Ann", None);
        contact.last_name = "L".repeat(101);
        let err = store.add_contact(contact).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::ValueTooLong { column: Some(ref c) } if c == "last_name"
        ));
        assert_eq!(store.contact_count().await, 0);
    }

    #[tokio::test]
    async fn update_replaces_profile_but_not_balance() {
        let store = InMemoryVendorStore::new();
        let entity = EntityId::new();
        let created = store
            .create_vendor(new_vendor(entity, "ACME", "Acme Corp"))
            .await
            .unwrap();
        store.adjust_balance(created.id, entity, 500).await.unwrap();

        let user = UserId::new();
        let updated = store
            .update_vendor(
                created.id,
                entity,
                VendorStatus::Active,
                profile("ACME", "Acme Holdings"),
                Some(user),
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.profile.vendor_name, "Acme Holdings");
        assert_eq!(updated.status, VendorStatus::Active);
        assert_eq!(updated.current_balance, 500);
        assert_eq!(updated.updated_by, Some(user));
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn update_to_taken_code_is_rejected() {
        let store = InMemoryVendorStore::new();
        let entity = EntityId::new();
        store
            .create_vendor(new_vendor(entity, "ACME", "Acme Corp"))
            .await
            .unwrap();
        let second = store
            .create_vendor(new_vendor(entity, "GLOBEX", "Globex"))
            .await
            .unwrap();

        let err = store
            .update_vendor(
                second.id,
                entity,
                VendorStatus::Active,
                profile("ACME", "Globex"),
                None,
            )
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn update_missing_vendor_returns_none() {
        let store = InMemoryVendorStore::new();
        let result = store
            .update_vendor(
                VendorId::new(),
                EntityId::new(),
                VendorStatus::Active,
                profile("ACME", "Acme"),
                None,
            )
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn balance_cannot_go_negative() {
        let store = InMemoryVendorStore::new();
        let entity = EntityId::new();
        let created = store
            .create_vendor(new_vendor(entity, "ACME", "Acme Corp"))
            .await
            .unwrap();

        assert_eq!(
            store.adjust_balance(created.id, entity, 100).await.unwrap(),
            Some(100)
        );
        assert_eq!(
            store.adjust_balance(created.id, entity, -40).await.unwrap(),
            Some(60)
        );

        let err = store
            .adjust_balance(created.id, entity, -61)
            .await
            .unwrap_err();
        assert_eq!(err.constraint(), Some(constraints::VENDOR_CURRENT_BALANCE));

        let vendor = store.get_vendor(created.id, entity).await.unwrap().unwrap();
        assert_eq!(vendor.current_balance, 60);
    }

    #[tokio::test]
    async fn balance_overflow_fails_the_balance_check() {
        let store = InMemoryVendorStore::new();
        let entity = EntityId::new();
        let created = store
            .create_vendor(new_vendor(entity, "ACME", "Acme Corp"))
            .await
            .unwrap();

        store.adjust_balance(created.id, entity, i64::MAX).await.unwrap();
        let err = store
            .adjust_balance(created.id, entity, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::CheckViolation { .. }));
        assert_eq!(err.constraint(), Some(constraints::VENDOR_CURRENT_BALANCE));

        let vendor = store.get_vendor(created.id, entity).await.unwrap().unwrap();
        assert_eq!(vendor.current_balance, i64::MAX);
    }

    #[tokio::test]
    async fn list_filters_orders_and_pages() {
        let store = InMemoryVendorStore::new();
        let entity = EntityId::new();

        for (code, name) in [("C", "Charlie"), ("A", "Alpha"), ("B", "Bravo")] {
            store
                .create_vendor(new_vendor(entity, code, name))
                .await
                .unwrap();
        }
        let mut utility = new_vendor(entity, "D", "Delta");
        utility.profile.vendor_type = VendorType::Utility;
        utility.status = VendorStatus::Active;
        store.create_vendor(utility).await.unwrap();
        store
            .create_vendor(new_vendor(EntityId::new(), "E", "Echo"))
            .await
            .unwrap();

        let (all, total) = store
            .list_vendors(VendorQuery::for_entity(entity))
            .await
            .unwrap();
        assert_eq!(total, 4);
        let names: Vec<_> = all.iter().map(|v| v.profile.vendor_name.as_str()).collect();
        assert_eq!(names, ["Alpha", "Bravo", "Charlie", "Delta"]);

        let (page, total) = store
            .list_vendors(VendorQuery::for_entity(entity).limit(2).offset(2))
            .await
            .unwrap();
        assert_eq!(total, 4);
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].profile.vendor_name, "Charlie");

        let (active, total) = store
            .list_vendors(VendorQuery::for_entity(entity).status(VendorStatus::Active))
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(active[0].profile.vendor_code, "D");

        let (suppliers, _) = store
            .list_vendors(VendorQuery::for_entity(entity).vendor_type(VendorType::Supplier))
            .await
            .unwrap();
        assert_eq!(suppliers.len(), 3);
    }

    #[tokio::test]
    async fn contact_requires_existing_vendor() {
        let store = InMemoryVendorStore::new();
        let err = store
            .add_contact(new_contact(VendorId::new(), "Ann", None))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn contact_email_is_unique_per_vendor_and_type() {
        let store = InMemoryVendorStore::new();
        let entity = EntityId::new();
        let vendor = store
            .create_vendor(new_vendor(entity, "ACME", "Acme Corp"))
            .await
            .unwrap();

        store
            .add_contact(new_contact(vendor.id, "Ann", Some("ap@acme.com")))
            .await
            .unwrap();
        let err = store
            .add_contact(new_contact(vendor.id, "Bob", Some("ap@acme.com")))
            .await
            .unwrap_err();
        assert_eq!(err.constraint(), Some(constraints::CONTACT_TYPE_EMAIL));

        // Missing emails never conflict.
        store
            .add_contact(new_contact(vendor.id, "Cat", None))
            .await
            .unwrap();
        store
            .add_contact(new_contact(vendor.id, "Dan", None))
            .await
            .unwrap();
        assert_eq!(store.contact_count().await, 3);
    }

    #[tokio::test]
    async fn contacts_list_primary_first() {
        let store = InMemoryVendorStore::new();
        let entity = EntityId::new();
        let vendor = store
            .create_vendor(new_vendor(entity, "ACME", "Acme Corp"))
            .await
            .unwrap();

        store
            .add_contact(new_contact(vendor.id, "Zed", None))
            .await
            .unwrap();
        store
            .add_contact(new_contact(vendor.id, "Amy", None))
            .await
            .unwrap();
        let mut primary = new_contact(vendor.id, "Mia", None);
        primary.is_primary = true;
        store.add_contact(primary).await.unwrap();

        let contacts = store.list_contacts(vendor.id).await.unwrap();
        let names: Vec<_> = contacts.iter().map(|c| c.first_name.as_str()).collect();
        assert_eq!(names, ["Mia", "Amy", "Zed"]);
    }

    #[tokio::test]
    async fn delete_cascades_to_contacts() {
        let store = InMemoryVendorStore::new();
        let entity = EntityId::new();
        let vendor = store
            .create_vendor(new_vendor(entity, "ACME", "Acme Corp"))
            .await
            .unwrap();
        store
            .add_contact(new_contact(vendor.id, "Ann", None))
            .await
            .unwrap();

        assert!(store.delete_vendor(vendor.id, entity).await.unwrap());
        assert!(!store.delete_vendor(vendor.id, entity).await.unwrap());
        assert_eq!(store.contact_count().await, 0);
        assert!(store.list_contacts(vendor.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn payment_terms_ordered_by_net_days() {
        let store = InMemoryVendorStore::new();
        let terms = store.list_active_payment_terms().await.unwrap();

        assert_eq!(terms.len(), 8);
        let codes: Vec<_> = terms.iter().map(|t| t.code.as_str()).collect();
        assert_eq!(
            codes,
            ["CIA", "COD", "DUE", "1/10N30", "2/10N30", "NET30", "NET60", "NET90"]
        );
    }

    #[tokio::test]
    async fn clear_keeps_catalog() {
        let store = InMemoryVendorStore::new();
        store
            .create_vendor(new_vendor(EntityId::new(), "ACME", "Acme"))
            .await
            .unwrap();
        store.clear().await;

        assert_eq!(store.vendor_count().await, 0);
        assert_eq!(store.list_active_payment_terms().await.unwrap().len(), 8);
    }
}
