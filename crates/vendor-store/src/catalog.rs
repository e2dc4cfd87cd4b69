//! The payment-term catalog seeded by the schema migration.

use chrono::Utc;
use uuid::Uuid;

use crate::PaymentTerm;

/// `(code, description, net_days, discount_percent, discount_days)`
pub const SEEDED_PAYMENT_TERMS: &[(&str, &str, i32, Option<f64>, Option<i32>)] = &[
    ("NET30", "Net 30 days", 30, None, None),
    ("NET60", "Net 60 days", 60, None, None),
    ("NET90", "Net 90 days", 90, None, None),
    (
        "2/10N30",
        "2% discount if paid within 10 days, net 30",
        30,
        Some(2.0),
        Some(10),
    ),
    (
        "1/10N30",
        "1% discount if paid within 10 days, net 30",
        30,
        Some(1.0),
        Some(10),
    ),
    ("DUE", "Due on receipt", 0, None, None),
    ("COD", "Cash on delivery", 0, None, None),
    ("CIA", "Cash in advance", 0, None, None),
];

/// Materializes the seeded catalog as active rows.
pub fn seeded_payment_terms() -> Vec<PaymentTerm> {
    let now = Utc::now();
    SEEDED_PAYMENT_TERMS
        .iter()
        .map(
            |&(code, description, net_days, discount_percent, discount_days)| PaymentTerm {
                id: Uuid::new_v4(),
                code: code.to_string(),
                description: description.to_string(),
                net_days,
                discount_percent,
                discount_days,
                is_active: true,
                created_at: now,
            },
        )
        .collect()
}
