//! Storage (inventory) item model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Inventory classification. Stored as an integer by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum StorageCategory {
    /// Chưa phân loại
    #[default]
    Unset,
    /// Nguyên liệu
    RawMaterial,
    /// Hàng hóa
    Goods,
}

impl StorageCategory {
    /// Value accepted by the `category` list filter
    pub fn as_filter(self) -> &'static str {
        match self {
            StorageCategory::Unset => "0",
            StorageCategory::RawMaterial => "1",
            StorageCategory::Goods => "2",
        }
    }
}

impl From<StorageCategory> for u8 {
    fn from(category: StorageCategory) -> Self {
        match category {
            StorageCategory::Unset => 0,
            StorageCategory::RawMaterial => 1,
            StorageCategory::Goods => 2,
        }
    }
}

impl TryFrom<u8> for StorageCategory {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(StorageCategory::Unset),
            1 => Ok(StorageCategory::RawMaterial),
            2 => Ok(StorageCategory::Goods),
            other => Err(format!("unknown storage category {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionSource {
    #[serde(default)]
    pub item_quantity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionTarget {
    #[serde(default)]
    pub item_name: Option<String>,
    #[serde(default)]
    pub item_quantity: Option<f64>,
}

/// Unit conversion rule (one stocked unit split into sellable items)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionUnit {
    #[serde(default)]
    pub from: Option<ConversionSource>,
    #[serde(default)]
    pub to: Vec<ConversionTarget>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStorageItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub business_owner_id: String,
    pub name: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub stock: f64,
    #[serde(default)]
    pub price: f64,
    #[serde(default, rename = "imageURL")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sync_status: bool,
    #[serde(default)]
    pub category: StorageCategory,
    /// Item nature code from the e-invoice catalogue
    #[serde(default)]
    pub tchat: i32,
    #[serde(default)]
    pub conversion_unit: Option<ConversionUnit>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trips_as_integer() {
        let category: StorageCategory = serde_json::from_str("2").unwrap();
        assert_eq!(category, StorageCategory::Goods);
        assert_eq!(serde_json::to_string(&StorageCategory::RawMaterial).unwrap(), "1");
        assert!(serde_json::from_str::<StorageCategory>("7").is_err());
    }
}
