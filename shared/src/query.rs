//! List query descriptor
//!
//! Parameters sent to every paginated list endpoint: page, limit, sort
//! field and direction, free-text search and categorical filters.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default page size used by the admin list views.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("invalid sort order: {0} (expected 1 or -1)")]
    InvalidSortOrder(i64),

    #[error("unknown filter dimension: {0}")]
    UnknownFilter(String),
}

/// Sort direction. Serialized as `1` / `-1` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl SortOrder {
    pub fn as_i64(self) -> i64 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }

    /// The opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    fn as_param(self) -> &'static str {
        match self {
            SortOrder::Ascending => "1",
            SortOrder::Descending => "-1",
        }
    }
}

impl From<SortOrder> for i64 {
    fn from(order: SortOrder) -> Self {
        order.as_i64()
    }
}

impl TryFrom<i64> for SortOrder {
    type Error = QueryError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SortOrder::Ascending),
            -1 => Ok(SortOrder::Descending),
            other => Err(QueryError::InvalidSortOrder(other)),
        }
    }
}

/// A view-specific sortable column.
///
/// Each list view declares its own enum of sortable fields; `as_str` yields
/// the backend field name sent as `sortBy`.
pub trait SortKey: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    fn as_str(&self) -> &'static str;
}

/// Categorical filter dimensions understood by the list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FilterDimension {
    #[serde(rename = "status")]
    Status,
    #[serde(rename = "category")]
    Category,
    #[serde(rename = "isActive")]
    IsActive,
}

impl FilterDimension {
    /// Query parameter name.
    pub fn as_str(self) -> &'static str {
        match self {
            FilterDimension::Status => "status",
            FilterDimension::Category => "category",
            FilterDimension::IsActive => "isActive",
        }
    }
}

impl fmt::Display for FilterDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterDimension {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "status" => Ok(FilterDimension::Status),
            "category" => Ok(FilterDimension::Category),
            "isActive" => Ok(FilterDimension::IsActive),
            other => Err(QueryError::UnknownFilter(other.to_string())),
        }
    }
}

/// A normalized filter value.
///
/// The select boxes of the dashboard offer an "all" option; it and blank
/// input both normalize to the empty string, which means "no filter".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterValue(String);

impl FilterValue {
    /// Sentinel used by the UI for "every value".
    pub const ALL: &'static str = "all";

    pub fn normalize(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case(Self::ALL) {
            Self(String::new())
        } else {
            Self(trimmed.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Query descriptor sent to a list endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDescriptor {
    /// 1-based page number
    pub page: u32,
    /// Page size
    pub limit: u32,
    pub sort_by: String,
    pub sort_order: SortOrder,
    /// Free-text search, empty means no search
    pub search: String,
    /// Non-empty categorical filters only
    pub filters: BTreeMap<FilterDimension, String>,
}

impl QueryDescriptor {
    pub fn new(sort_by: impl SortKey, limit: u32) -> Self {
        Self {
            page: 1,
            limit,
            sort_by: sort_by.as_str().to_string(),
            sort_order: SortOrder::Descending,
            search: String::new(),
            filters: BTreeMap::new(),
        }
    }

    /// Current value of a filter, empty when unset.
    pub fn filter(&self, dimension: FilterDimension) -> &str {
        self.filters.get(&dimension).map(String::as_str).unwrap_or("")
    }

    /// Sets a filter. Empty values remove the dimension.
    pub fn set_filter(&mut self, dimension: FilterDimension, value: FilterValue) {
        if value.is_empty() {
            self.filters.remove(&dimension);
        } else {
            self.filters.insert(dimension, value.into_inner());
        }
    }

    /// Query string pairs in the order the backend documents them.
    ///
    /// `search` is always present (possibly empty); empty filters are omitted.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
            ("sortBy".to_string(), self.sort_by.clone()),
            ("sortOrder".to_string(), self.sort_order.as_param().to_string()),
            ("search".to_string(), self.search.clone()),
        ];
        pairs.extend(
            self.filters
                .iter()
                .filter(|(_, value)| !value.is_empty())
                .map(|(dimension, value)| (dimension.as_str().to_string(), value.clone())),
        );
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Field {
        CreatedAt,
    }

    impl SortKey for Field {
        fn as_str(&self) -> &'static str {
            match self {
                Field::CreatedAt => "createdAt",
            }
        }
    }

    #[test]
    fn sort_order_wire_format() {
        assert_eq!(serde_json::to_string(&SortOrder::Ascending).unwrap(), "1");
        assert_eq!(serde_json::to_string(&SortOrder::Descending).unwrap(), "-1");
        let parsed: SortOrder = serde_json::from_str("-1").unwrap();
        assert_eq!(parsed, SortOrder::Descending);
        assert!(serde_json::from_str::<SortOrder>("0").is_err());
    }

    #[test]
    fn toggling_twice_is_identity() {
        for order in [SortOrder::Ascending, SortOrder::Descending] {
            assert_eq!(order.toggled().toggled(), order);
            assert_ne!(order.toggled(), order);
        }
    }

    #[test]
    fn all_sentinel_normalizes_to_empty() {
        assert!(FilterValue::normalize("all").is_empty());
        assert!(FilterValue::normalize(" ALL ").is_empty());
        assert!(FilterValue::normalize("").is_empty());
        assert_eq!(FilterValue::normalize(" 2 ").as_str(), "2");
    }

    #[test]
    fn default_descriptor_pairs() {
        let query = QueryDescriptor::new(Field::CreatedAt, 10);
        assert_eq!(
            query.to_query_pairs(),
            vec![
                ("page".to_string(), "1".to_string()),
                ("limit".to_string(), "10".to_string()),
                ("sortBy".to_string(), "createdAt".to_string()),
                ("sortOrder".to_string(), "-1".to_string()),
                ("search".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn empty_filter_equals_absent_filter() {
        let mut with_empty = QueryDescriptor::new(Field::CreatedAt, 10);
        with_empty.set_filter(FilterDimension::Status, FilterValue::normalize("3"));
        with_empty.set_filter(FilterDimension::Status, FilterValue::normalize("all"));

        let untouched = QueryDescriptor::new(Field::CreatedAt, 10);
        assert_eq!(with_empty, untouched);
        assert_eq!(with_empty.filter(FilterDimension::Status), "");
    }

    #[test]
    fn filters_are_rendered_with_wire_names() {
        let mut query = QueryDescriptor::new(Field::CreatedAt, 10);
        query.set_filter(FilterDimension::IsActive, FilterValue::normalize("true"));
        query.set_filter(FilterDimension::Category, FilterValue::normalize("Đồ uống"));

        let pairs = query.to_query_pairs();
        assert!(pairs.contains(&("isActive".to_string(), "true".to_string())));
        assert!(pairs.contains(&("category".to_string(), "Đồ uống".to_string())));
    }

    #[test]
    fn filter_dimension_parses_wire_names() {
        assert_eq!("isActive".parse::<FilterDimension>(), Ok(FilterDimension::IsActive));
        assert!("is_active".parse::<FilterDimension>().is_err());
    }
}
