//! Keyset pagination over `(created_at, id)`.
//!
//! A cursor is the URL-safe base64 form of `{"c": <rfc3339>, "i": <id>}` and
//! names a position in the list, not an offset. Lists are ordered newest
//! first; `forward` moves toward older rows and `backward` toward newer ones.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Page size used when the request gives none.
pub const DEFAULT_PAGE_LIMIT: i64 = 50;

/// Largest page size a request may ask for.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Opaque position marker for the admin application list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ApplicationCursor {
    #[serde(rename = "c")]
    pub created_at: Timestamp,
    #[serde(rename = "i")]
    pub id: DbId,
}

/// Wire form with every field optional, so a missing key is reported as
/// such rather than as a generic parse failure.
#[derive(Deserialize)]
struct RawCursor {
    c: Option<Timestamp>,
    i: Option<DbId>,
}

impl ApplicationCursor {
    pub fn new(created_at: Timestamp, id: DbId) -> Self {
        Self { created_at, id }
    }

    pub fn encode(&self) -> String {
        // Serializing a timestamp and an integer cannot fail.
        let json = serde_json::to_vec(self).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    /// Parse a cursor string. Trailing `=` padding is tolerated.
    pub fn decode(encoded: &str) -> Result<Self, CoreError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(encoded.trim_end_matches('='))
            .map_err(|_| CoreError::Validation("invalid cursor encoding".to_string()))?;

        let raw: RawCursor = serde_json::from_slice(&bytes)
            .map_err(|_| CoreError::Validation("invalid cursor format".to_string()))?;

        match (raw.c, raw.i) {
            (Some(created_at), Some(id)) => Ok(Self { created_at, id }),
            _ => Err(CoreError::Validation(
                "invalid cursor: missing fields".to_string(),
            )),
        }
    }
}

/// Traversal direction relative to a cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageDirection {
    #[default]
    Forward,
    Backward,
}

impl PageDirection {
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "forward" => Ok(Self::Forward),
            "backward" => Ok(Self::Backward),
            _ => Err(CoreError::Validation(
                "direction must be 'forward' or 'backward'".to_string(),
            )),
        }
    }
}

/// Resolve a requested page size, defaulting when absent.
pub fn validate_page_limit(limit: Option<i64>) -> Result<i64, CoreError> {
    match limit {
        None => Ok(DEFAULT_PAGE_LIMIT),
        Some(n) if (1..=MAX_PAGE_LIMIT).contains(&n) => Ok(n),
        Some(_) => Err(CoreError::Validation(format!(
            "limit must be between 1 and {MAX_PAGE_LIMIT}"
        ))),
    }
}

/// One page of results plus the cursors to move away from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_cursor: Option<String>,
    pub has_more: bool,
}

/// Turn an over-fetched row set into a page.
///
/// `rows` is the result of a `LIMIT limit + 1` query in query order (newest
/// first for forward, oldest first for backward). The extra row only signals
/// that more rows exist in the traversal direction and is dropped. Backward
/// pages are reversed so every page reads newest first.
///
/// Cursor rules:
/// - forward: `next` from the last item when more rows exist, `prev` from the
///   first item when the request carried a cursor.
/// - backward: `next` from the last item always, `prev` from the first item
///   when more rows exist.
pub fn assemble_page<T>(
    mut rows: Vec<T>,
    limit: usize,
    direction: PageDirection,
    had_cursor: bool,
    key: impl Fn(&T) -> ApplicationCursor,
) -> Page<T> {
    let has_more = rows.len() > limit;
    rows.truncate(limit);

    if direction == PageDirection::Backward {
        rows.reverse();
    }

    let first = rows.first().map(|r| key(r).encode());
    let last = rows.last().map(|r| key(r).encode());

    let (next_cursor, prev_cursor) = match direction {
        PageDirection::Forward => (
            last.filter(|_| has_more),
            first.filter(|_| had_cursor),
        ),
        PageDirection::Backward => (last, first.filter(|_| has_more)),
    };

    Page {
        items: rows,
        next_cursor,
        prev_cursor,
        has_more,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    fn ts(secs: i64) -> Timestamp {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn key(row: &(Timestamp, DbId)) -> ApplicationCursor {
        ApplicationCursor::new(row.0, row.1)
    }

    #[test]
    fn cursor_round_trips() {
        let cursor = ApplicationCursor::new(ts(5), 42);
        let encoded = cursor.encode();
        assert!(!encoded.contains('='));
        assert_eq!(ApplicationCursor::decode(&encoded).unwrap(), cursor);
    }

    #[test]
    fn padded_cursor_is_accepted() {
        let cursor = ApplicationCursor::new(ts(1), 7);
        let padded = base64::engine::general_purpose::URL_SAFE
            .encode(serde_json::to_vec(&cursor).unwrap());
        assert_eq!(ApplicationCursor::decode(&padded).unwrap(), cursor);
    }

    #[test]
    fn bad_encoding_rejected() {
        let err = ApplicationCursor::decode("not base64!!").unwrap_err();
        assert!(err.to_string().contains("invalid cursor encoding"));
    }

    #[test]
    fn bad_json_rejected() {
        let encoded = URL_SAFE_NO_PAD.encode(b"{not json");
        let err = ApplicationCursor::decode(&encoded).unwrap_err();
        assert!(err.to_string().contains("invalid cursor format"));
    }

    #[test]
    fn missing_fields_rejected() {
        let encoded = URL_SAFE_NO_PAD.encode(br#"{"i": 3}"#);
        let err = ApplicationCursor::decode(&encoded).unwrap_err();
        assert!(err.to_string().contains("missing fields"));
    }

    #[test]
    fn direction_parses() {
        assert_eq!(PageDirection::parse("forward").unwrap(), PageDirection::Forward);
        assert_eq!(PageDirection::parse("backward").unwrap(), PageDirection::Backward);
        assert_matches!(PageDirection::parse("sideways"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn limit_defaults_and_bounds() {
        assert_eq!(validate_page_limit(None).unwrap(), DEFAULT_PAGE_LIMIT);
        assert_eq!(validate_page_limit(Some(1)).unwrap(), 1);
        assert_eq!(validate_page_limit(Some(100)).unwrap(), 100);
        assert!(validate_page_limit(Some(0)).is_err());
        assert!(validate_page_limit(Some(101)).is_err());
    }

    #[test]
    fn first_forward_page_has_next_only() {
        let rows = vec![(ts(3), 3), (ts(2), 2), (ts(1), 1)];
        let page = assemble_page(rows, 2, PageDirection::Forward, false, key);
        assert_eq!(page.items, vec![(ts(3), 3), (ts(2), 2)]);
        assert!(page.has_more);
        assert_eq!(
            page.next_cursor.as_deref().map(ApplicationCursor::decode).unwrap().unwrap(),
            ApplicationCursor::new(ts(2), 2)
        );
        assert!(page.prev_cursor.is_none());
    }

    #[test]
    fn last_forward_page_with_cursor_has_prev_only() {
        let rows = vec![(ts(1), 1)];
        let page = assemble_page(rows, 2, PageDirection::Forward, true, key);
        assert!(!page.has_more);
        assert!(page.next_cursor.is_none());
        assert_eq!(
            page.prev_cursor.as_deref().map(ApplicationCursor::decode).unwrap().unwrap(),
            ApplicationCursor::new(ts(1), 1)
        );
    }

    #[test]
    fn backward_page_is_reversed() {
        // Backward queries return oldest first.
        let rows = vec![(ts(2), 2), (ts(3), 3), (ts(4), 4)];
        let page = assemble_page(rows, 2, PageDirection::Backward, true, key);
        assert_eq!(page.items, vec![(ts(3), 3), (ts(2), 2)]);
        assert!(page.has_more);
        assert_eq!(
            page.next_cursor.as_deref().map(ApplicationCursor::decode).unwrap().unwrap(),
            ApplicationCursor::new(ts(2), 2)
        );
        assert_eq!(
            page.prev_cursor.as_deref().map(ApplicationCursor::decode).unwrap().unwrap(),
            ApplicationCursor::new(ts(3), 3)
        );
    }

    #[test]
    fn backward_page_at_head_has_no_prev() {
        let rows = vec![(ts(5), 5)];
        let page = assemble_page(rows, 2, PageDirection::Backward, true, key);
        assert!(page.next_cursor.is_some());
        assert!(page.prev_cursor.is_none());
    }

    #[test]
    fn empty_page_has_no_cursors() {
        let page = assemble_page(Vec::<(Timestamp, DbId)>::new(), 10, PageDirection::Forward, true, key);
        assert!(page.items.is_empty());
        assert!(!page.has_more);
        assert!(page.next_cursor.is_none());
        assert!(page.prev_cursor.is_none());
    }
}
