//! Business owner (household business) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::AccountSummary;

/// Operating status of a household business
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusinessStatus {
    Active,
    Inactive,
    Suspended,
}

impl BusinessStatus {
    /// Value accepted by the `status` list filter
    pub fn as_filter(self) -> &'static str {
        match self {
            BusinessStatus::Active => "active",
            BusinessStatus::Inactive => "inactive",
            BusinessStatus::Suspended => "suspended",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub ward: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zip_code: Option<String>,
}

impl Address {
    /// Single-line address, skipping blank parts
    pub fn one_line(&self) -> String {
        [&self.street, &self.ward, &self.district, &self.city]
            .into_iter()
            .filter(|part| !part.trim().is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Link to the external EasyInvoice account. Credentials are not kept.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EasyInvoiceInfo {
    #[serde(default)]
    pub account: Option<String>,
    /// Tax code registered with EasyInvoice
    #[serde(default)]
    pub mst: Option<String>,
    #[serde(default)]
    pub serial: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    License,
    TaxCertificate,
    IdCard,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessDocument {
    pub name: String,
    pub url: String,
    pub upload_date: String,
    pub document_type: DocumentType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminBusinessOwner {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "userId")]
    pub account: Option<AccountSummary>,
    pub business_name: String,
    #[serde(default)]
    pub business_type: String,
    /// Mã số thuế
    #[serde(default)]
    pub tax_code: Option<String>,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub established_date: Option<String>,
    #[serde(default)]
    pub employee_count: u32,
    #[serde(default)]
    pub annual_revenue: Option<f64>,
    pub business_status: BusinessStatus,
    #[serde(default)]
    pub tax_type: Option<String>,
    #[serde(default, rename = "tax_filing_frequency")]
    pub tax_filing_frequency: Option<u32>,
    #[serde(default)]
    pub easy_invoice_info: Option<EasyInvoiceInfo>,
    #[serde(default)]
    pub documents: Vec<BusinessDocument>,
    #[serde(default)]
    pub verification_date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
