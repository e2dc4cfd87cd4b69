//! Closed value sets stored as PostgreSQL enum types.
//!
//! Every enum round-trips through its lower-snake-case text form, which is
//! also the database label and the wire representation. Parsing is exact;
//! callers decide whether to case-fold first.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Text did not name a member of the enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind}: '{value}'")]
pub struct ParseEnumError {
    /// Name of the enumeration, e.g. `vendor_type`.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident as $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident => $label:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            /// Every member, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// Returns the lower-snake-case label.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok($name::$variant),)+
                    other => Err(ParseEnumError {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

string_enum! {
    /// Classification of a vendor.
    VendorType as "vendor_type" {
        Supplier => "supplier",
        Contractor => "contractor",
        ServiceProvider => "service_provider",
        Consultant => "consultant",
        Utility => "utility",
    }
}

string_enum! {
    /// Lifecycle status of a vendor.
    ///
    /// New vendors always start in `PendingApproval`; only `Active` vendors may
    /// receive invoices.
    VendorStatus as "vendor_status" {
        PendingApproval => "pending_approval",
        Active => "active",
        Inactive => "inactive",
        Suspended => "suspended",
    }
}

string_enum! {
    /// How a vendor is paid.
    PaymentMethod as "payment_method" {
        Check => "check",
        Ach => "ach",
        Wire => "wire",
        CreditCard => "credit_card",
        Cash => "cash",
    }
}

string_enum! {
    /// Role of a vendor contact person.
    ContactType as "contact_type" {
        Primary => "primary",
        Billing => "billing",
        Shipping => "shipping",
        Technical => "technical",
        Other => "other",
    }
}

impl Default for VendorStatus {
    fn default() -> Self {
        VendorStatus::PendingApproval
    }
}
