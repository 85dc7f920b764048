//! Pagination data types
//!
//! Two cursor representations share one contract: offset counters
//! (`page`, `page_size`, `total`) and an opaque `after` token.

use crate::errors::{ProcedureError, RestrictionError};
use crate::kwargs::KwargsValidator;
use crate::restriction::{Restriction, Restrictions};
use crate::traits::executor::Row;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Contract shared by every cursor representation
pub trait PaginationCursor {
    /// Field used as the resume token
    fn cursor_key(&self) -> &'static str;

    fn has_more(&self) -> bool;

    /// Value to send as `cursor_key` to fetch the next page
    fn after(&self) -> Value;
}

#[derive(Debug, Clone, Deserialize)]
struct RawOffsetPagination {
    #[serde(default = "default_page")]
    page: i64,
    #[serde(default = "default_page_size")]
    page_size: i64,
    total: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    10
}

/// Offset pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawOffsetPagination")]
pub struct OffsetPagination {
    page: i64,
    page_size: i64,
    total: i64,
}

impl OffsetPagination {
    const ENTITY: &'static str = "Pagination";

    pub fn new(page: i64, page_size: i64, total: i64) -> Result<Self, RestrictionError> {
        if page < 1 {
            return Err(RestrictionError::new(format!("page must be >= 1, got {}", page)));
        }
        if page_size < 1 {
            return Err(RestrictionError::new(format!(
                "page_size must be >= 1, got {}",
                page_size
            )));
        }
        if total < 0 {
            return Err(RestrictionError::new(format!("total must be >= 0, got {}", total)));
        }
        if page.checked_mul(page_size).is_none() || page.checked_add(1).is_none() {
            return Err(RestrictionError::new(format!(
                "page {} of size {} is out of range",
                page, page_size
            )));
        }
        Ok(Self {
            page,
            page_size,
            total,
        })
    }

    pub fn restrictions() -> Restrictions {
        Restrictions::new()
            .field("page", Restriction::int().with_default(default_page()))
            .field("page_size", Restriction::int().with_default(default_page_size()))
            .field("total", Restriction::int())
    }

    /// Build from the metadata row returned as the second result set
    pub fn from_row(row: &Row) -> Result<Self, ProcedureError> {
        let restrictions = Self::restrictions();
        let extra = Restrictions::new();
        let values = KwargsValidator::new(Self::ENTITY, &restrictions, &extra)
            .validate(["page", "page_size", "total"], row)?;

        let number = |index: usize| -> Result<i64, ProcedureError> {
            let (name, value) = &values[index];
            value.as_i64().ok_or_else(|| {
                ProcedureError::validation(
                    Self::ENTITY,
                    name,
                    RestrictionError::new(format!("{} is out of range", value)),
                )
            })
        };

        Self::new(number(0)?, number(1)?, number(2)?)
            .map_err(|e| ProcedureError::validation(Self::ENTITY, "pagination", e))
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    pub fn total(&self) -> i64 {
        self.total
    }
}

impl TryFrom<RawOffsetPagination> for OffsetPagination {
    type Error = RestrictionError;

    fn try_from(raw: RawOffsetPagination) -> Result<Self, Self::Error> {
        Self::new(raw.page, raw.page_size, raw.total)
    }
}

impl PaginationCursor for OffsetPagination {
    fn cursor_key(&self) -> &'static str {
        "page"
    }

    fn has_more(&self) -> bool {
        self.page * self.page_size < self.total
    }

    fn after(&self) -> Value {
        Value::from(self.page + 1)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RawInfiniteScroll {
    #[serde(default)]
    after: Option<Value>,
    has_more: bool,
}

/// Cursor ("infinite scroll") pagination metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawInfiniteScroll")]
pub struct InfiniteScroll {
    after: Option<Value>,
    has_more: bool,
}

impl InfiniteScroll {
    /// `after` must be present whenever `has_more` is true
    pub fn new(after: Option<Value>, has_more: bool) -> Result<Self, RestrictionError> {
        let after = after.filter(|value| !value.is_null());
        if has_more && after.is_none() {
            return Err(RestrictionError::new(
                "after is required when has_more is true",
            ));
        }
        Ok(Self { after, has_more })
    }

    /// Last page of a traversal
    pub fn exhausted() -> Self {
        Self {
            after: None,
            has_more: false,
        }
    }

    pub fn after_value(&self) -> Option<&Value> {
        self.after.as_ref()
    }
}

impl TryFrom<RawInfiniteScroll> for InfiniteScroll {
    type Error = RestrictionError;

    fn try_from(raw: RawInfiniteScroll) -> Result<Self, Self::Error> {
        Self::new(raw.after, raw.has_more)
    }
}

impl PaginationCursor for InfiniteScroll {
    fn cursor_key(&self) -> &'static str {
        "after"
    }

    fn has_more(&self) -> bool {
        self.has_more
    }

    fn after(&self) -> Value {
        self.after.clone().unwrap_or(Value::Null)
    }
}

/// Pagination metadata of a page, one of the recognized representations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cursor {
    Pagination(OffsetPagination),
    InfiniteScroll(InfiniteScroll),
}

impl PaginationCursor for Cursor {
    fn cursor_key(&self) -> &'static str {
        match self {
            Cursor::Pagination(p) => p.cursor_key(),
            Cursor::InfiniteScroll(s) => s.cursor_key(),
        }
    }

    fn has_more(&self) -> bool {
        match self {
            Cursor::Pagination(p) => p.has_more(),
            Cursor::InfiniteScroll(s) => s.has_more(),
        }
    }

    fn after(&self) -> Value {
        match self {
            Cursor::Pagination(p) => p.after(),
            Cursor::InfiniteScroll(s) => s.after(),
        }
    }
}

impl From<OffsetPagination> for Cursor {
    fn from(p: OffsetPagination) -> Self {
        Cursor::Pagination(p)
    }
}

impl From<InfiniteScroll> for Cursor {
    fn from(s: InfiniteScroll) -> Self {
        Cursor::InfiniteScroll(s)
    }
}

/// One batch of entities plus its pagination metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Cursor,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, pagination: impl Into<Cursor>) -> Self {
        Self {
            data,
            pagination: pagination.into(),
        }
    }

    pub fn has_more(&self) -> bool {
        self.pagination.has_more()
    }

    pub fn after(&self) -> Value {
        self.pagination.after()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_offset_has_more_and_after() {
        let p = OffsetPagination::new(1, 10, 11).unwrap();
        assert!(p.has_more());
        assert_eq!(p.after(), json!(2));
        assert_eq!(p.cursor_key(), "page");

        let last = OffsetPagination::new(2, 10, 11).unwrap();
        assert!(!last.has_more());

        let exact = OffsetPagination::new(1, 10, 10).unwrap();
        assert!(!exact.has_more());
    }

    #[test]
    fn test_offset_from_row_applies_defaults() {
        let p = OffsetPagination::from_row(&row(json!({"total": 3}))).unwrap();
        assert_eq!((p.page(), p.page_size(), p.total()), (1, 10, 3));

        assert!(OffsetPagination::from_row(&row(json!({"page": 1}))).is_err());
        assert!(OffsetPagination::from_row(&row(json!({"page": 0, "total": 1}))).is_err());
        assert!(OffsetPagination::from_row(&row(json!({"total": "many"}))).is_err());
    }

    #[test]
    fn test_offset_rejects_overflowing_page() {
        assert!(OffsetPagination::new(i64::MAX / 2, 10, 5).is_err());
        assert!(OffsetPagination::new(i64::MAX, 1, 5).is_err());

        let err = OffsetPagination::from_row(&row(json!({"page": i64::MAX / 2, "page_size": 10, "total": 5})))
            .unwrap_err();
        assert!(matches!(err, ProcedureError::Validation { .. }));
    }

    #[test]
    fn test_infinite_scroll_invariant() {
        assert!(InfiniteScroll::new(None, true).is_err());
        assert!(InfiniteScroll::new(Some(Value::Null), true).is_err());

        let last = InfiniteScroll::new(None, false).unwrap();
        assert!(!last.has_more());
        assert_eq!(last.after(), Value::Null);

        let more = InfiniteScroll::new(Some(json!(5)), true).unwrap();
        assert_eq!(more.after(), json!(5));
        assert_eq!(more.cursor_key(), "after");
    }

    #[test]
    fn test_infinite_scroll_deserialize_enforces_invariant() {
        assert!(serde_json::from_value::<InfiniteScroll>(json!({"after": null, "has_more": true})).is_err());
        assert!(serde_json::from_value::<InfiniteScroll>(json!({"has_more": false})).is_ok());
    }

    #[test]
    fn test_page_serializes_as_data_and_pagination() {
        let page = Page::new(vec![json!({"id": 1})], OffsetPagination::new(1, 10, 11).unwrap());
        assert_eq!(
            serde_json::to_value(&page).unwrap(),
            json!({
                "data": [{"id": 1}],
                "pagination": {"page": 1, "page_size": 10, "total": 11}
            })
        );

        let scroll = Page::<Value>::new(vec![], InfiniteScroll::exhausted());
        assert_eq!(
            serde_json::to_value(&scroll).unwrap()["pagination"],
            json!({"after": null, "has_more": false})
        );
    }

    #[test]
    fn test_cursor_deserializes_either_variant() {
        let offset: Cursor = serde_json::from_value(json!({"page": 2, "page_size": 5, "total": 11})).unwrap();
        assert!(matches!(offset, Cursor::Pagination(_)));
        assert!(offset.has_more());

        let scroll: Cursor = serde_json::from_value(json!({"after": 7, "has_more": true})).unwrap();
        assert!(matches!(scroll, Cursor::InfiniteScroll(_)));
        assert_eq!(scroll.after(), json!(7));
    }
}
