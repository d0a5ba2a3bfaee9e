//! Invoice models
//!
//! Field names follow the Vietnamese e-invoice schema used by the backend
//! (`nb*` = seller, `nm*` = buyer, `tgt*` = totals). Amounts are stored
//! values; nothing here computes tax.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Invoice processing status, as used by the `status` list filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceStatus {
    /// Hợp lệ
    Valid,
    /// Chưa xử lý
    Unprocessed,
    /// Đã hủy
    Cancelled,
}

impl InvoiceStatus {
    pub fn as_filter(self) -> &'static str {
        match self {
            InvoiceStatus::Valid => "1",
            InvoiceStatus::Unprocessed => "2",
            InvoiceStatus::Cancelled => "3",
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(InvoiceStatus::Valid),
            2 => Some(InvoiceStatus::Unprocessed),
            3 => Some(InvoiceStatus::Cancelled),
            _ => None,
        }
    }
}

/// Purchase (input) invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminInvoiceIn {
    #[serde(rename = "_id")]
    pub id: String,
    pub owner_id: String,
    /// Seller tax code
    #[serde(default)]
    pub nbmst: Option<String>,
    /// Template number
    #[serde(default)]
    pub khmshdon: Option<i64>,
    /// Series symbol
    #[serde(default)]
    pub khhdon: Option<String>,
    /// Invoice number
    #[serde(default)]
    pub shdon: Option<i64>,
    /// Seller name
    #[serde(default)]
    pub nbten: Option<String>,
    #[serde(default)]
    pub nbdchi: Option<String>,
    #[serde(default)]
    pub nbsdthoai: Option<String>,
    #[serde(default)]
    pub nbdctdtu: Option<String>,
    #[serde(default)]
    pub nbwebsite: Option<String>,
    /// Buyer tax code
    #[serde(default)]
    pub nmmst: Option<String>,
    #[serde(default)]
    pub nmten: Option<String>,
    #[serde(default)]
    pub nmdchi: Option<String>,
    #[serde(default)]
    pub nmsdthoai: Option<String>,
    /// Issue date
    #[serde(default)]
    pub tdlap: Option<String>,
    /// Total payable
    #[serde(default)]
    pub tgtttbso: Option<f64>,
    /// Total before tax
    #[serde(default)]
    pub tgtcthue: Option<f64>,
    /// Total tax
    #[serde(default)]
    pub tgtthue: Option<f64>,
    /// Total payable, in words
    #[serde(default)]
    pub tgtttbchu: Option<String>,
    #[serde(default)]
    pub htttoan: Option<String>,
    #[serde(default)]
    pub dvtte: Option<String>,
    #[serde(default)]
    pub mhdon: Option<String>,
    #[serde(default)]
    pub thdon: Option<String>,
    #[serde(default)]
    pub tthai: Option<i64>,
    #[serde(default)]
    pub hthdon: Option<i64>,
    /// Line items, passed through untouched
    #[serde(default)]
    pub hdhhdvu: Vec<serde_json::Value>,
    #[serde(default)]
    pub gchu: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AdminInvoiceIn {
    pub fn status(&self) -> Option<InvoiceStatus> {
        self.tthai.and_then(InvoiceStatus::from_code)
    }
}

/// Sales (output) invoice. The backend stores most scalars as strings here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOutputInvoice {
    #[serde(rename = "_id")]
    pub id: String,
    pub business_owner_id: String,
    #[serde(default)]
    pub nbmst: Option<String>,
    #[serde(default)]
    pub khmshdon: Option<String>,
    #[serde(default)]
    pub khhdon: Option<String>,
    #[serde(default)]
    pub shdon: Option<String>,
    #[serde(default)]
    pub nbten: Option<String>,
    #[serde(default)]
    pub nbdchi: Option<String>,
    #[serde(default)]
    pub nmmst: Option<String>,
    #[serde(default)]
    pub nmten: Option<String>,
    #[serde(default)]
    pub nmdchi: Option<String>,
    #[serde(default)]
    pub tdlap: Option<String>,
    #[serde(default)]
    pub tgtttbso: Option<String>,
    #[serde(default)]
    pub tgtcthue: Option<String>,
    #[serde(default)]
    pub tgtthue: Option<String>,
    #[serde(default)]
    pub tgtttbchu: Option<String>,
    #[serde(default)]
    pub mhdon: Option<String>,
    #[serde(default)]
    pub thdon: Option<String>,
    #[serde(default)]
    pub ncnhat: Option<String>,
    #[serde(default)]
    pub tthai: Option<String>,
    #[serde(default)]
    pub hthdon: Option<String>,
    /// VAT total as recorded by the backend
    #[serde(default, rename = "totalGTGT")]
    pub total_gtgt: Option<f64>,
    /// Personal income tax total as recorded by the backend
    #[serde(default, rename = "totalTNCN")]
    pub total_tncn: Option<f64>,
    #[serde(default)]
    pub hdhhdvu: Vec<serde_json::Value>,
    #[serde(default)]
    pub gchu: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AdminOutputInvoice {
    pub fn status(&self) -> Option<InvoiceStatus> {
        self.tthai
            .as_deref()
            .and_then(|code| code.trim().parse().ok())
            .and_then(InvoiceStatus::from_code)
    }
}
