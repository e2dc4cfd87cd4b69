//! Field normalization and validation rules for vendor writes.
//!
//! Enumerated values are lower-cased before matching; codes are upper-cased.
//! Lengths are counted in characters, matching `char_length` in the schema.

use std::str::FromStr;

use common::{ContactType, PaymentMethod, VendorStatus, VendorType};
use vendor_store::VendorProfile;

use crate::commands::VendorDetails;
use crate::error::DomainError;

fn parse_lowercase<T: FromStr>(
    field: &'static str,
    raw: &str,
    reason: &'static str,
) -> Result<T, DomainError> {
    raw.to_lowercase()
        .parse()
        .map_err(|_| DomainError::invalid(field, reason))
}

pub fn parse_vendor_type(raw: &str) -> Result<VendorType, DomainError> {
    parse_lowercase("vendor_type", raw, "invalid vendor type")
}

pub fn parse_status(raw: &str) -> Result<VendorStatus, DomainError> {
    parse_lowercase("status", raw, "invalid vendor status")
}

pub fn parse_contact_type(raw: &str) -> Result<ContactType, DomainError> {
    parse_lowercase("contact_type", raw, "invalid contact type")
}

pub fn parse_payment_method(raw: Option<&str>) -> Result<Option<PaymentMethod>, DomainError> {
    raw.map(|m| parse_lowercase("payment_method", m, "invalid payment method"))
        .transpose()
}

/// Upper-cases a vendor code.
pub fn normalize_code(raw: &str) -> String {
    raw.to_uppercase()
}

pub fn normalize_currency(raw: &str) -> Result<String, DomainError> {
    if raw.chars().count() != 3 {
        return Err(DomainError::invalid(
            "currency",
            "currency must be 3-letter ISO code",
        ));
    }
    Ok(raw.to_uppercase())
}

pub fn normalize_country(raw: &str) -> Result<String, DomainError> {
    if raw.chars().count() != 2 {
        return Err(DomainError::invalid(
            "country",
            "country must be 2-letter ISO code",
        ));
    }
    Ok(raw.to_uppercase())
}

pub fn check_credit_limit(limit: Option<i64>) -> Result<Option<i64>, DomainError> {
    match limit {
        Some(l) if l < 0 => Err(DomainError::invalid(
            "credit_limit",
            "credit limit cannot be negative",
        )),
        other => Ok(other),
    }
}

/// Rejects a value wider than its column.
pub fn check_width(oversized: Option<(&'static str, usize)>) -> Result<(), DomainError> {
    match oversized {
        Some((field, max)) => Err(DomainError::invalid(
            field,
            format!("{field} must be at most {max} characters"),
        )),
        None => Ok(()),
    }
}

/// Validates the remaining fields and builds the stored profile.
///
/// `vendor_type` is parsed by the caller so create and update can order it
/// ahead of their own checks. Remaining checks run in this order: currency,
/// country, credit limit, payment method, column widths.
pub fn normalize_profile(
    details: VendorDetails,
    vendor_type: VendorType,
) -> Result<VendorProfile, DomainError> {
    let currency = normalize_currency(&details.currency)?;
    let country = normalize_country(&details.country)?;
    let credit_limit = check_credit_limit(details.credit_limit)?;
    let payment_method = parse_payment_method(details.payment_method.as_deref())?;

    let profile = VendorProfile {
        vendor_code: normalize_code(&details.vendor_code),
        vendor_name: details.vendor_name,
        legal_name: details.legal_name,
        vendor_type,
        tax_id: details.tax_id,
        is_tax_exempt: details.is_tax_exempt,
        is_1099_vendor: details.is_1099_vendor,
        email: details.email,
        phone: details.phone,
        fax: details.fax,
        website: details.website,
        address_line1: details.address_line1,
        address_line2: details.address_line2,
        city: details.city,
        state_province: details.state_province,
        postal_code: details.postal_code,
        country,
        payment_terms: details.payment_terms,
        payment_method,
        currency,
        credit_limit,
        bank_name: details.bank_name,
        bank_account_number: details.bank_account_number,
        bank_routing_number: details.bank_routing_number,
        swift_code: details.swift_code,
        iban: details.iban,
        notes: details.notes,
        tags: details.tags,
    };
    check_width(profile.oversized_column())?;

    Ok(profile)
}
