//! Page/limit resolution and page metadata.
//!
//! Pages are 1-based. `skip = (page - 1) * limit` and
//! `total_pages = ceil(total_items / limit)`.

use serde::Serialize;

use crate::error::CoreError;
use crate::filter::ParseMode;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Page used when `page` is missing or invalid.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when `limit` is missing or invalid.
pub const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Largest page size served; larger requests are clamped.
pub const MAX_PAGE_LIMIT: i64 = 500;

/// Raw pagination query parameters (`?page=&limit=`).
///
/// Kept as strings so non-numeric input can fall back to defaults instead of
/// failing extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Configured page size bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBounds {
    pub default_limit: i64,
    pub max_limit: i64,
}

impl Default for PageBounds {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_PAGE_LIMIT,
            max_limit: MAX_PAGE_LIMIT,
        }
    }
}

// ---------------------------------------------------------------------------
// PageRequest
// ---------------------------------------------------------------------------

/// A validated page window. Both `page` and `limit` are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    limit: i64,
}

impl PageRequest {
    pub fn new(page: i64, limit: i64) -> Result<Self, CoreError> {
        if page < 1 {
            return Err(CoreError::Validation(format!("page must be >= 1, got {page}")));
        }
        if limit < 1 {
            return Err(CoreError::Validation(format!("limit must be >= 1, got {limit}")));
        }
        Ok(Self { page, limit })
    }

    /// Resolve raw parameters into a page window.
    ///
    /// Missing, zero or negative values fall back to the defaults, and
    /// `limit` is clamped to `bounds.max_limit`. Non-numeric values fall back
    /// as well unless `mode` is [`ParseMode::Strict`].
    pub fn resolve(
        params: &PageParams,
        bounds: &PageBounds,
        mode: ParseMode,
    ) -> Result<Self, CoreError> {
        let page = parse_positive("page", params.page.as_deref(), mode)?.unwrap_or(DEFAULT_PAGE);
        let limit = parse_positive("limit", params.limit.as_deref(), mode)?
            .unwrap_or(bounds.default_limit)
            .min(bounds.max_limit)
            .max(1);

        Ok(Self { page, limit })
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Number of matching records to skip before the window starts.
    pub fn skip(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Parse an optional positive integer. Values below 1 read as absent.
fn parse_positive(
    name: &str,
    raw: Option<&str>,
    mode: ParseMode,
) -> Result<Option<i64>, CoreError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    match raw.parse::<i64>() {
        Ok(v) if v >= 1 => Ok(Some(v)),
        Ok(_) => Ok(None),
        Err(_) if mode == ParseMode::Strict => Err(CoreError::Validation(format!(
            "{name} must be an integer, got '{raw}'"
        ))),
        Err(_) => {
            tracing::debug!(param = name, value = raw, "Ignoring non-numeric pagination value");
            Ok(None)
        }
    }
}

// ---------------------------------------------------------------------------
// PageResult
// ---------------------------------------------------------------------------

/// Number of pages needed to hold `total_items` at `limit` per page.
///
/// Returns 0 when there is nothing to page or `limit` is not positive.
pub fn total_pages(total_items: i64, limit: i64) -> i64 {
    if limit <= 0 || total_items <= 0 {
        return 0;
    }
    total_items / limit + i64::from(total_items % limit != 0)
}

/// One page of results plus metadata, serialized as
/// `{ "data", "currentPage", "totalPages", "totalItems", "limit" }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    #[serde(rename = "data")]
    pub items: Vec<T>,
    pub current_page: i64,
    pub total_pages: i64,
    pub total_items: i64,
    pub limit: i64,
}

impl<T> PageResult<T> {
    pub fn new(items: Vec<T>, request: &PageRequest, total_items: i64) -> Self {
        Self {
            items,
            current_page: request.page(),
            total_pages: total_pages(total_items, request.limit()),
            total_items,
            limit: request.limit(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn raw(page: Option<&str>, limit: Option<&str>) -> PageParams {
        PageParams {
            page: page.map(String::from),
            limit: limit.map(String::from),
        }
    }

    fn resolve(page: Option<&str>, limit: Option<&str>) -> PageRequest {
        PageRequest::resolve(&raw(page, limit), &PageBounds::default(), ParseMode::Lenient)
            .unwrap()
    }

    // -- resolve -------------------------------------------------------------

    #[test]
    fn missing_values_use_defaults() {
        let req = resolve(None, None);
        assert_eq!(req.page(), 1);
        assert_eq!(req.limit(), 20);
        assert_eq!(req.skip(), 0);
    }

    #[test]
    fn zero_limit_falls_back_to_default() {
        assert_eq!(resolve(None, Some("0")).limit(), 20);
    }

    #[test]
    fn negative_and_zero_page_fall_back_to_first_page() {
        assert_eq!(resolve(Some("0"), None).page(), 1);
        assert_eq!(resolve(Some("-3"), None).page(), 1);
    }

    #[test]
    fn non_numeric_values_fall_back_in_lenient_mode() {
        let req = resolve(Some("two"), Some("lots"));
        assert_eq!(req.page(), 1);
        assert_eq!(req.limit(), 20);
    }

    #[test]
    fn non_numeric_values_rejected_in_strict_mode() {
        let result =
            PageRequest::resolve(&raw(Some("two"), None), &PageBounds::default(), ParseMode::Strict);
        assert_matches!(result, Err(CoreError::Validation(msg)) if msg.contains("page"));
    }

    #[test]
    fn limit_is_clamped_to_max() {
        assert_eq!(resolve(None, Some("100000")).limit(), MAX_PAGE_LIMIT);
    }

    #[test]
    fn custom_bounds_are_respected() {
        let bounds = PageBounds {
            default_limit: 5,
            max_limit: 10,
        };
        let dflt = PageRequest::resolve(&raw(None, None), &bounds, ParseMode::Lenient).unwrap();
        let big = PageRequest::resolve(&raw(None, Some("50")), &bounds, ParseMode::Lenient).unwrap();
        assert_eq!(dflt.limit(), 5);
        assert_eq!(big.limit(), 10);
    }

    #[test]
    fn skip_is_page_minus_one_times_limit() {
        for (page, limit) in [(1, 20), (2, 20), (3, 7), (10, 1)] {
            let req = PageRequest::new(page, limit).unwrap();
            assert_eq!(req.skip(), (page - 1) * limit);
        }
    }

    #[test]
    fn skip_saturates_on_overflow() {
        let req = PageRequest::new(i64::MAX, 500).unwrap();
        assert_eq!(req.skip(), i64::MAX);
    }

    #[test]
    fn new_rejects_non_positive_values() {
        assert_matches!(PageRequest::new(0, 10), Err(CoreError::Validation(_)));
        assert_matches!(PageRequest::new(1, 0), Err(CoreError::Validation(_)));
    }

    // -- total_pages ---------------------------------------------------------

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 20), 0);
        assert_eq!(total_pages(1, 20), 1);
        assert_eq!(total_pages(20, 20), 1);
        assert_eq!(total_pages(21, 20), 2);
        assert_eq!(total_pages(2, 10), 1);
    }

    #[test]
    fn total_pages_guards_zero_limit() {
        assert_eq!(total_pages(10, 0), 0);
    }

    // -- PageResult ----------------------------------------------------------

    #[test]
    fn page_result_serializes_camel_case_envelope() {
        let req = PageRequest::new(2, 2).unwrap();
        let page = PageResult::new(vec![1, 2], &req, 5);
        let json = serde_json::to_value(&page).unwrap();

        assert_eq!(json["data"], serde_json::json!([1, 2]));
        assert_eq!(json["currentPage"], 2);
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["totalItems"], 5);
        assert_eq!(json["limit"], 2);
    }
}
