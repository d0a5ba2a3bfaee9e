//! Accountant model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::AccountSummary;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminAccountant {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "userId")]
    pub account: AccountSummary,
    #[serde(default)]
    pub certifications: Vec<String>,
    /// Years of experience
    #[serde(default)]
    pub experience: Option<u32>,
    #[serde(default)]
    pub specialization: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
