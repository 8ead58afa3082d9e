//! Query string handling for the listing endpoint.
//!
//! The query is extracted as raw key/value pairs so repeated parameters can be
//! resolved here instead of failing deserialization.

use placement_core::error::CoreError;
use placement_core::filter::{FilterField, ParseMode, PlacementFilterParams};
use placement_core::pagination::PageParams;

/// Pagination and filter parameters of one listing request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    pub page: PageParams,
    pub filters: PlacementFilterParams,
}

impl ListingQuery {
    /// Sort raw query pairs into pagination and filter parameters.
    ///
    /// - Repeated filter parameters accumulate, as if their values had been
    ///   comma-joined.
    /// - A repeated `page` or `limit` keeps its first value. In
    ///   [`ParseMode::Strict`] it is rejected instead.
    /// - Unknown parameters are ignored.
    pub fn from_pairs<I, K, V>(pairs: I, mode: ParseMode) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = ListingQuery::default();

        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                "page" => set_once(&mut query.page.page, key, value, mode)?,
                "limit" => set_once(&mut query.page.limit, key, value, mode)?,
                _ => {
                    if let Some(field) = FilterField::from_param(key) {
                        query.filters.append(field, value);
                    }
                }
            }
        }

        Ok(query)
    }
}

fn set_once(
    slot: &mut Option<String>,
    name: &str,
    value: &str,
    mode: ParseMode,
) -> Result<(), CoreError> {
    if slot.is_none() {
        *slot = Some(value.to_string());
        return Ok(());
    }
    if mode == ParseMode::Strict {
        return Err(CoreError::Validation(format!(
            "{name} must be given at most once"
        )));
    }
    tracing::debug!(param = name, value, "Ignoring repeated pagination parameter");
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn pairs(raw: &[(&'static str, &'static str)]) -> Vec<(&'static str, &'static str)> {
        raw.to_vec()
    }

    #[test]
    fn splits_pagination_from_filters() {
        let query = ListingQuery::from_pairs(
            pairs(&[("page", "2"), ("limit", "5"), ("site_id", "7"), ("colour", "blue")]),
            ParseMode::Lenient,
        )
        .unwrap();

        assert_eq!(query.page.page.as_deref(), Some("2"));
        assert_eq!(query.page.limit.as_deref(), Some("5"));
        assert_eq!(query.filters.get(FilterField::SiteId), Some("7"));
        assert_eq!(query.filters.get(FilterField::ZoneId), None);
    }

    #[test]
    fn repeated_page_keeps_first_value_in_lenient_mode() {
        let query = ListingQuery::from_pairs(
            pairs(&[("page", "1"), ("page", "2"), ("limit", "x"), ("limit", "3")]),
            ParseMode::Lenient,
        )
        .unwrap();

        assert_eq!(query.page.page.as_deref(), Some("1"));
        assert_eq!(query.page.limit.as_deref(), Some("x"));
    }

    #[test]
    fn repeated_page_is_rejected_in_strict_mode() {
        let result = ListingQuery::from_pairs(
            pairs(&[("limit", "10"), ("limit", "20")]),
            ParseMode::Strict,
        );

        assert_matches!(result, Err(CoreError::Validation(msg)) if msg.contains("limit"));
    }

    #[test]
    fn repeated_filter_values_accumulate() {
        let query = ListingQuery::from_pairs(
            pairs(&[("site_id", "1"), ("placement_type", "banner"), ("site_id", "2")]),
            ParseMode::Strict,
        )
        .unwrap();

        assert_eq!(query.filters.get(FilterField::SiteId), Some("1,2"));
        assert_eq!(query.filters.get(FilterField::PlacementType), Some("banner"));
    }
}
