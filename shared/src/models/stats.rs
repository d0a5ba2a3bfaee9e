//! Statistics models

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStats {
    pub total_users: u64,
    pub total_business_owners: u64,
    pub total_accountants: u64,
    pub total_invoices: u64,
    pub new_users_this_month: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxPeriodKind {
    Month,
    Quarter,
    Year,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxPeriod {
    #[serde(rename = "type")]
    pub kind: TaxPeriodKind,
    pub year: i32,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub quarter: Option<u32>,
    pub start_date: String,
    pub end_date: String,
}

/// Aggregates reported by the backend for one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxTotals {
    #[serde(rename = "totalGTGT")]
    pub total_gtgt: f64,
    #[serde(rename = "totalTNCN")]
    pub total_tncn: f64,
    pub total_tax: f64,
    pub total_revenue: f64,
    pub invoice_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxStatistics {
    pub period: TaxPeriod,
    pub statistics: TaxTotals,
}

/// Query for `GET /admin/business-owners/{id}/tax-statistics`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxStatisticsQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<TaxPeriodKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quarter: Option<u32>,
}

impl TaxStatisticsQuery {
    pub fn month(year: i32, month: u32) -> Self {
        Self {
            period: Some(TaxPeriodKind::Month),
            year: Some(year),
            month: Some(month),
            quarter: None,
        }
    }

    pub fn quarter(year: i32, quarter: u32) -> Self {
        Self {
            period: Some(TaxPeriodKind::Quarter),
            year: Some(year),
            month: None,
            quarter: Some(quarter),
        }
    }

    pub fn year(year: i32) -> Self {
        Self {
            period: Some(TaxPeriodKind::Year),
            year: Some(year),
            month: None,
            quarter: None,
        }
    }

    /// Query string pairs; unset fields are omitted
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(period) = self.period {
            let value = match period {
                TaxPeriodKind::Month => "month",
                TaxPeriodKind::Quarter => "quarter",
                TaxPeriodKind::Year => "year",
            };
            pairs.push(("period".to_string(), value.to_string()));
        }
        if let Some(year) = self.year {
            pairs.push(("year".to_string(), year.to_string()));
        }
        if let Some(month) = self.month {
            pairs.push(("month".to_string(), month.to_string()));
        }
        if let Some(quarter) = self.quarter {
            pairs.push(("quarter".to_string(), quarter.to_string()));
        }
        pairs
    }
}
