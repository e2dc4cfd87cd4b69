//! Conversions between protobuf messages and domain/store types.

use chrono::{DateTime, Utc};
use common::{EntityId, VendorId};
use domain::{AddVendorContact, VendorDetails};
use prost_types::Timestamp;
use tonic::Status;
use vendor_store::{PaymentTerm, Vendor, VendorContact, VendorProfile};

use super::proto;

pub fn timestamp(dt: DateTime<Utc>) -> Timestamp {
    Timestamp {
        seconds: dt.timestamp(),
        nanos: dt.timestamp_subsec_nanos() as i32,
    }
}

pub fn vendor_id(raw: &str) -> Result<VendorId, Status> {
    VendorId::parse(raw).map_err(|_| Status::invalid_argument(format!("invalid vendor id: {raw}")))
}

pub fn entity_id(raw: &str) -> Result<EntityId, Status> {
    EntityId::parse(raw).map_err(|_| Status::invalid_argument(format!("invalid entity id: {raw}")))
}

pub fn details_from_proto(details: Option<proto::VendorDetails>) -> Result<VendorDetails, Status> {
    let d = details.ok_or_else(|| Status::invalid_argument("vendor details are required"))?;
    Ok(VendorDetails {
        vendor_code: d.vendor_code,
        vendor_name: d.vendor_name,
        legal_name: d.legal_name,
        vendor_type: d.vendor_type,
        tax_id: d.tax_id,
        is_tax_exempt: d.is_tax_exempt,
        is_1099_vendor: d.is_1099_vendor,
        email: d.email,
        phone: d.phone,
        fax: d.fax,
        website: d.website,
        address_line1: d.address_line1,
        address_line2: d.address_line2,
        city: d.city,
        state_province: d.state_province,
        postal_code: d.postal_code,
        country: d.country,
        payment_terms: d.payment_terms,
        payment_method: d.payment_method,
        currency: d.currency,
        credit_limit: d.credit_limit,
        bank_name: d.bank_name,
        bank_account_number: d.bank_account_number,
        bank_routing_number: d.bank_routing_number,
        swift_code: d.swift_code,
        iban: d.iban,
        notes: d.notes,
        tags: d.tags,
    })
}

fn details_to_proto(p: VendorProfile) -> proto::VendorDetails {
    proto::VendorDetails {
        vendor_code: p.vendor_code,
        vendor_name: p.vendor_name,
        legal_name: p.legal_name,
        vendor_type: p.vendor_type.to_string(),
        tax_id: p.tax_id,
        is_tax_exempt: p.is_tax_exempt,
        is_1099_vendor: p.is_1099_vendor,
        email: p.email,
        phone: p.phone,
        fax: p.fax,
        website: p.website,
        address_line1: p.address_line1,
        address_line2: p.address_line2,
        city: p.city,
        state_province: p.state_province,
        postal_code: p.postal_code,
        country: p.country,
        payment_terms: p.payment_terms,
        payment_method: p.payment_method.map(|m| m.to_string()),
        currency: p.currency,
        credit_limit: p.credit_limit,
        bank_name: p.bank_name,
        bank_account_number: p.bank_account_number,
        bank_routing_number: p.bank_routing_number,
        swift_code: p.swift_code,
        iban: p.iban,
        notes: p.notes,
        tags: p.tags,
    }
}

pub fn vendor_to_proto(v: Vendor) -> proto::Vendor {
    proto::Vendor {
        id: v.id.to_string(),
        entity_id: v.entity_id.to_string(),
        status: v.status.to_string(),
        details: Some(details_to_proto(v.profile)),
        current_balance: v.current_balance,
        created_by: v.created_by.map(|u| u.to_string()),
        created_at: Some(timestamp(v.created_at)),
        updated_by: v.updated_by.map(|u| u.to_string()),
        updated_at: Some(timestamp(v.updated_at)),
    }
}

pub fn contact_to_proto(c: VendorContact) -> proto::VendorContact {
    proto::VendorContact {
        id: c.id.to_string(),
        vendor_id: c.vendor_id.to_string(),
        contact_type: c.contact_type.to_string(),
        first_name: c.first_name,
        last_name: c.last_name,
        title: c.title,
        email: c.email,
        phone: c.phone,
        mobile: c.mobile,
        is_primary: c.is_primary,
        notes: c.notes,
        created_at: Some(timestamp(c.created_at)),
        updated_at: Some(timestamp(c.updated_at)),
    }
}

pub fn contact_from_proto(vendor_id: VendorId, req: proto::AddVendorContactRequest) -> AddVendorContact {
    AddVendorContact {
        vendor_id,
        contact_type: req.contact_type,
        first_name: req.first_name,
        last_name: req.last_name,
        title: req.title,
        email: req.email,
        phone: req.phone,
        mobile: req.mobile,
        is_primary: req.is_primary,
        notes: req.notes,
    }
}

pub fn payment_term_to_proto(t: PaymentTerm) -> proto::PaymentTerm {
    proto::PaymentTerm {
        id: t.id.to_string(),
        code: t.code,
        description: t.description,
        net_days: t.net_days,
        discount_percent: t.discount_percent,
        discount_days: t.discount_days,
        is_active: t.is_active,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_details_are_invalid() {
        let status = details_from_proto(None).unwrap_err();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);
    }

    #[test]
    fn bad_ids_are_invalid_arguments() {
        assert_eq!(vendor_id("nope").unwrap_err().code(), tonic::Code::InvalidArgument);
        assert_eq!(entity_id("").unwrap_err().code(), tonic::Code::InvalidArgument);
    }

    #[test]
    fn timestamp_keeps_subsecond_precision() {
        let dt = DateTime::from_timestamp(1_700_000_000, 250_000_000).unwrap();
        let ts = timestamp(dt);
        assert_eq!(ts.seconds, 1_700_000_000);
        assert_eq!(ts.nanos, 250_000_000);
    }

    #[test]
    fn payment_term_discount_survives() {
        let term = vendor_store::catalog::seeded_payment_terms()
            .into_iter()
            .find(|t| t.code == "2/10N30")
            .unwrap();
        let proto = payment_term_to_proto(term);
        assert_eq!(proto.discount_percent, Some(2.0));
        assert_eq!(proto.discount_days, Some(10));
        assert_eq!(proto.net_days, 30);
    }
}
