//! Row models for the four vendor tables.

use chrono::{DateTime, Utc};
use common::{
    ContactId, ContactType, EntityId, PaymentMethod, UserId, VendorId, VendorStatus, VendorType,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The caller-editable part of a vendor record.
///
/// Updates replace this block as a whole. Enumerated fields are already
/// typed and text fields already normalized by the time a profile reaches the
/// store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorProfile {
    pub vendor_code: String,
    pub vendor_name: String,
    pub legal_name: Option<String>,
    pub vendor_type: VendorType,

    pub tax_id: Option<String>,
    pub is_tax_exempt: bool,
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
    pub payment_method: Option<PaymentMethod>,
    pub currency: String,
    /// Smallest currency unit. `None` means no limit.
    pub credit_limit: Option<i64>,

    pub bank_name: Option<String>,
    pub bank_account_number: Option<String>,
    pub bank_routing_number: Option<String>,
    pub swift_code: Option<String>,
    pub iban: Option<String>,

    pub notes: Option<String>,
    pub tags: Vec<String>,
}

impl VendorProfile {
    /// Returns the first text column whose value is wider than the schema
    /// allows, with that width in characters. Country and currency have
    /// exact widths and are checked separately.
    pub fn oversized_column(&self) -> Option<(&'static str, usize)> {
        first_oversized(&[
            ("vendor_code", Some(self.vendor_code.as_str()), 50),
            ("vendor_name", Some(self.vendor_name.as_str()), 255),
            ("legal_name", self.legal_name.as_deref(), 255),
            ("tax_id", self.tax_id.as_deref(), 50),
            ("email", self.email.as_deref(), 255),
            ("phone", self.phone.as_deref(), 50),
            ("fax", self.fax.as_deref(), 50),
            ("website", self.website.as_deref(), 255),
            ("address_line1", self.address_line1.as_deref(), 255),
            ("address_line2", self.address_line2.as_deref(), 255),
            ("city", self.city.as_deref(), 100),
            ("state_province", self.state_province.as_deref(), 100),
            ("postal_code", self.postal_code.as_deref(), 20),
            ("payment_terms", Some(self.payment_terms.as_str()), 50),
            ("bank_name", self.bank_name.as_deref(), 255),
            ("bank_account_number", self.bank_account_number.as_deref(), 100),
            ("bank_routing_number", self.bank_routing_number.as_deref(), 100),
            ("swift_code", self.swift_code.as_deref(), 20),
            ("iban", self.iban.as_deref(), 50),
        ])
    }
}

/// A persisted vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: VendorId,
    pub entity_id: EntityId,
    pub status: VendorStatus,
    #[serde(flatten)]
    pub profile: VendorProfile,
    /// Smallest currency unit, never negative.
    pub current_balance: i64,
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<UserId>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a vendor. The store assigns id, balance and timestamps.
#[derive(Debug, Clone)]
pub struct NewVendor {
    pub entity_id: EntityId,
    pub status: VendorStatus,
    pub profile: VendorProfile,
    pub created_by: Option<UserId>,
}

/// A contact person belonging to a vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorContact {
    pub id: ContactId,
    pub vendor_id: VendorId,
    pub contact_type: ContactType,
    pub first_name: String,
    pub last_name: String,
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub is_primary: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a contact.
#[derive(Debug, Clone)]
pub struct NewVendorContact {
    pub vendor_id: VendorId,
    pub contact_type: ContactType,
    pub first_name: String,
    pub last_name: String,
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub is_primary: bool,
    pub notes: Option<String>,
}

impl NewVendorContact {
    /// Returns the first text column whose value is wider than the schema
    /// allows, with that width in characters.
    pub fn oversized_column(&self) -> Option<(&'static str, usize)> {
        first_oversized(&[
            ("first_name", Some(self.first_name.as_str()), 100),
            ("last_name", Some(self.last_name.as_str()), 100),
            ("title", self.title.as_deref(), 100),
            ("email", self.email.as_deref(), 255),
            ("phone", self.phone.as_deref(), 50),
            ("mobile", self.mobile.as_deref(), 50),
        ])
    }
}

fn first_oversized(
    columns: &[(&'static str, Option<&str>, usize)],
) -> Option<(&'static str, usize)> {
    for &(column, value, max) in columns {
        if value.is_some_and(|v| v.chars().count() > max) {
            return Some((column, max));
        }
    }
    None
}

/// Reference entry describing when an invoice is due and any early-payment
/// discount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentTerm {
    pub id: Uuid,
    pub code: String,
    pub description: String,
    pub net_days: i32,
    pub discount_percent: Option<f64>,
    pub discount_days: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_serializes_profile_inline() {
        let now = Utc::now();
        let vendor = Vendor {
            id: VendorId::new(),
            entity_id: EntityId::new(),
            status: VendorStatus::Active,
            profile: VendorProfile {
                vendor_code: "ACME".to_string(),
                vendor_name: "Acme Corp".to_string(),
                legal_name: None,
                vendor_type: VendorType::ServiceProvider,
                tax_id: None,
                is_tax_exempt: false,
                is_1099_vendor: true,
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
                payment_method: Some(PaymentMethod::Ach),
                currency: "USD".to_string(),
                credit_limit: Some(100_000),
                bank_name: None,
                bank_account_number: None,
                bank_routing_number: None,
                swift_code: None,
                iban: None,
                notes: None,
                tags: vec!["preferred".to_string()],
            },
            current_balance: 0,
            created_by: None,
            created_at: now,
            updated_by: None,
            updated_at: now,
        };

        let json = serde_json::to_value(&vendor).unwrap();
        assert_eq!(json["vendor_code"], "ACME");
        assert_eq!(json["vendor_type"], "service_provider");
        assert_eq!(json["status"], "active");
        assert_eq!(json["payment_method"], "ach");
        assert_eq!(json["credit_limit"], 100_000);
        assert!(json.get("profile").is_none());

        let back: Vendor = serde_json::from_value(json).unwrap();
        assert_eq!(back, vendor);
    }

    #[test]
    fn column_widths_count_characters() {
        let contact = |first_name: String, phone: Option<String>| NewVendorContact {
            vendor_id: VendorId::new(),
            contact_type: ContactType::Billing,
            first_name,
            last_name: "Jones".to_string(),
            title: None,
            email: None,
            phone,
            mobile: None,
            is_primary: false,
            notes: Some("n".repeat(10_000)),
        };

        assert_eq!(contact("é".repeat(100), None).oversized_column(), None);
        assert_eq!(
            contact("é".repeat(101), None).oversized_column(),
            Some(("first_name", 100))
        );
        assert_eq!(
            contact("Ann".to_string(), Some("5".repeat(51))).oversized_column(),
            Some(("phone", 50))
        );
    }
}
