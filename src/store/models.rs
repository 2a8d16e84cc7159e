//! Domain records held by the data store

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A customer owning licenses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: u64,
    /// External customer number, unique
    pub customer_number: String,
    pub name: String,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub notes: Option<String>,
}

/// A licensable product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub category: Option<String>,
    pub manufacturer: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseStatus {
    Active,
    Expired,
    Cancelled,
}

impl LicenseStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(LicenseStatus::Active),
            "expired" => Some(LicenseStatus::Expired),
            "cancelled" => Some(LicenseStatus::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for LicenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LicenseStatus::Active => write!(f, "active"),
            LicenseStatus::Expired => write!(f, "expired"),
            LicenseStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A license linking a customer to a product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct License {
    pub id: u64,
    pub customer_id: u64,
    pub product_id: u64,
    pub license_key: Option<String>,
    pub seats: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Billing interval, free text (monthly, yearly, ...)
    pub interval: Option<String>,
    /// Free text so the currency stays open
    pub price: Option<String>,
    pub status: Option<LicenseStatus>,
    pub notes: Option<String>,
}

/// License plus the customer and product names it references,
/// as the list and detail views want it
#[derive(Debug, Clone, Serialize)]
pub struct LicenseView {
    #[serde(flatten)]
    pub license: License,
    pub customer_name: String,
    pub product_name: String,
}

/// Fields for creating or fully updating a customer
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub customer_number: String,
    pub name: String,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub notes: Option<String>,
}

/// Fields for creating or fully updating a product
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub category: Option<String>,
    pub manufacturer: Option<String>,
    pub notes: Option<String>,
}

/// Fields for creating or fully updating a license
#[derive(Debug, Clone)]
pub struct NewLicense {
    pub customer_id: u64,
    pub product_id: u64,
    pub license_key: Option<String>,
    pub seats: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub interval: Option<String>,
    pub price: Option<String>,
    pub status: Option<LicenseStatus>,
    pub notes: Option<String>,
}

/// Fields for creating a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: crate::auth::UserRole,
    pub active: bool,
}

/// End-date window selector for the license list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiring {
    /// Ends within the next N days (and has not ended yet)
    Within(u32),
    /// Already past its end date
    Expired,
}

impl Expiring {
    /// Parse the query-string form; anything unrecognized means no filter
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "30" => Some(Expiring::Within(30)),
            "60" => Some(Expiring::Within(60)),
            "90" => Some(Expiring::Within(90)),
            "expired" => Some(Expiring::Expired),
            _ => None,
        }
    }
}

/// Combined license list filter; all set fields must match
#[derive(Debug, Clone, Default)]
pub struct LicenseFilter {
    pub expiring: Option<Expiring>,
    pub status: Option<LicenseStatus>,
    pub customer_id: Option<u64>,
    pub product_id: Option<u64>,
    pub q: Option<String>,
}

/// Dashboard counters
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub customers_count: usize,
    pub licenses_active: usize,
    pub licenses_expiring_30: usize,
    pub licenses_expiring_90: usize,
}
