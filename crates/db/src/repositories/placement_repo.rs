//! Repository for the `placements` table.

use placement_core::filter::{FieldConstraint, FieldKind, FieldValue, FilterField, FilterPredicate};
use sqlx::PgPool;

use crate::models::placement::{NewPlacement, PlacementRecord, PlacementSummary};

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

/// Column list for `placements` SELECT queries.
const COLUMNS: &str = "\
    id, placement_id, placement_name, placement_status_id, \
    placement_display_status_id, placement_type_id, placement_type, \
    placement_type_status_id, fold, zone_id, zone_name, zone_status_id, \
    zone_display_status_id, site_id, site_name, site_url, site_status_id, \
    site_display_status_id, publisher_id, publisher_name, tag_type_id, \
    tag_type, placement_tag_type, primary_size_id, primary_size, status_id, \
    placement_identifier, appnexus, placement_created_at, placement_modified_at";

/// Column list for listing queries, matching [`PlacementSummary`].
const SUMMARY_COLUMNS: &str = "\
    placement_id, placement_name, publisher_id, site_id, status_id, \
    placement_type, primary_size";

/// Column list for INSERT (excludes auto-generated `id`).
const INSERT_COLUMNS: &str = "\
    placement_id, placement_name, placement_status_id, \
    placement_display_status_id, placement_type_id, placement_type, \
    placement_type_status_id, fold, zone_id, zone_name, zone_status_id, \
    zone_display_status_id, site_id, site_name, site_url, site_status_id, \
    site_display_status_id, publisher_id, publisher_name, tag_type_id, \
    tag_type, placement_tag_type, primary_size_id, primary_size, status_id, \
    placement_identifier, appnexus, placement_created_at, placement_modified_at";

/// Number of columns in [`INSERT_COLUMNS`].
const INSERT_COLUMN_COUNT: u32 = 29;

/// Stable page order; `id` breaks ties between duplicate placement ids.
const ORDER_BY: &str = "ORDER BY placement_id ASC NULLS LAST, id ASC";

// ---------------------------------------------------------------------------
// PlacementRepo
// ---------------------------------------------------------------------------

/// Provides insert and filtered listing operations for placements.
pub struct PlacementRepo;

impl PlacementRepo {
    /// Insert a placement, returning the stored row.
    pub async fn create(pool: &PgPool, input: &NewPlacement) -> Result<PlacementRecord, sqlx::Error> {
        let placeholders: Vec<String> = (1..=INSERT_COLUMN_COUNT).map(|i| format!("${i}")).collect();
        let query = format!(
            "INSERT INTO placements ({INSERT_COLUMNS}) VALUES ({}) RETURNING {COLUMNS}",
            placeholders.join(", ")
        );

        sqlx::query_as::<_, PlacementRecord>(&query)
            .bind(input.placement_id)
            .bind(&input.placement_name)
            .bind(input.placement_status_id)
            .bind(input.placement_display_status_id)
            .bind(input.placement_type_id)
            .bind(&input.placement_type)
            .bind(input.placement_type_status_id)
            .bind(input.fold)
            .bind(input.zone_id)
            .bind(&input.zone_name)
            .bind(input.zone_status_id)
            .bind(input.zone_display_status_id)
            .bind(input.site_id)
            .bind(&input.site_name)
            .bind(&input.site_url)
            .bind(input.site_status_id)
            .bind(input.site_display_status_id)
            .bind(input.publisher_id)
            .bind(&input.publisher_name)
            .bind(input.tag_type_id)
            .bind(&input.tag_type)
            .bind(&input.placement_tag_type)
            .bind(input.primary_size_id)
            .bind(&input.primary_size)
            .bind(input.status_id)
            .bind(&input.placement_identifier)
            .bind(input.appnexus)
            .bind(input.placement_created_at)
            .bind(input.placement_modified_at)
            .fetch_one(pool)
            .await
    }

    /// List placement summaries matching the predicate, one window at a time.
    pub async fn list(
        pool: &PgPool,
        predicate: &FilterPredicate,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<PlacementSummary>, sqlx::Error> {
        let (where_clause, bind_values, bind_idx) = build_placement_filter(predicate);

        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM placements {where_clause} {ORDER_BY} \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );

        let q = bind_placement_values(sqlx::query_as::<_, PlacementSummary>(&query), &bind_values);
        q.bind(limit).bind(skip).fetch_all(pool).await
    }

    /// Count placements matching the predicate (for pagination metadata).
    pub async fn count(pool: &PgPool, predicate: &FilterPredicate) -> Result<i64, sqlx::Error> {
        let (where_clause, bind_values, _) = build_placement_filter(predicate);

        let query = format!("SELECT COUNT(*)::BIGINT AS count FROM placements {where_clause}");

        let q = bind_placement_values_scalar(sqlx::query_scalar::<_, i64>(&query), &bind_values);
        q.fetch_one(pool).await
    }
}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built placement queries.
#[derive(Debug, Clone, PartialEq)]
enum BindValue {
    BigInt(i64),
    Text(String),
    BigIntArray(Vec<i64>),
    TextArray(Vec<String>),
}

/// Build a WHERE clause and bind values from a filter predicate.
///
/// Returns `(where_clause, bind_values, next_bind_index)`.
/// The `where_clause` is empty if the predicate is empty, or starts with `WHERE `.
fn build_placement_filter(predicate: &FilterPredicate) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    for (field, constraint) in predicate.iter() {
        match render_condition(field, constraint, bind_idx) {
            Some((condition, value)) => {
                conditions.push(condition);
                bind_idx += 1;
                bind_values.push(value);
            }
            None => conditions.push("FALSE".to_string()),
        }
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}

/// Render one constraint as a condition using placeholder `$idx`.
///
/// Returns `None` when the constraint can never match (empty value set, or
/// values of the wrong type for the column), which the caller renders as
/// `FALSE`.
fn render_condition(
    field: FilterField,
    constraint: &FieldConstraint,
    idx: u32,
) -> Option<(String, BindValue)> {
    let column = field.column();

    match (field.kind(), constraint) {
        (FieldKind::Integer, FieldConstraint::Exact(FieldValue::Int(v))) => {
            Some((format!("{column} = ${idx}"), BindValue::BigInt(*v)))
        }
        (FieldKind::Text, FieldConstraint::Exact(FieldValue::Text(v))) => {
            Some((format!("{column} = ${idx}"), BindValue::Text(v.clone())))
        }
        (FieldKind::Integer, FieldConstraint::AnyOf(values)) => {
            let ints: Vec<i64> = values
                .iter()
                .filter_map(|v| match v {
                    FieldValue::Int(i) => Some(*i),
                    FieldValue::Text(_) => None,
                })
                .collect();
            (!ints.is_empty())
                .then(|| (format!("{column} = ANY(${idx})"), BindValue::BigIntArray(ints)))
        }
        (FieldKind::Text, FieldConstraint::AnyOf(values)) => {
            let texts: Vec<String> = values
                .iter()
                .filter_map(|v| match v {
                    FieldValue::Text(t) => Some(t.clone()),
                    FieldValue::Int(_) => None,
                })
                .collect();
            (!texts.is_empty())
                .then(|| (format!("{column} = ANY(${idx})"), BindValue::TextArray(texts)))
        }
        (FieldKind::Text, FieldConstraint::Pattern(p)) => Some((
            format!("{column} ILIKE ${idx}"),
            BindValue::Text(like_pattern(p)),
        )),
        (FieldKind::Text, FieldConstraint::MatchesAnyPattern(patterns)) if !patterns.is_empty() => {
            Some((
                format!("{column} ILIKE ANY(${idx})"),
                BindValue::TextArray(patterns.iter().map(|p| like_pattern(p)).collect()),
            ))
        }
        _ => None,
    }
}

/// Wrap a literal substring as an ILIKE pattern, escaping `\`, `%` and `_`.
fn like_pattern(literal: &str) -> String {
    let mut escaped = String::with_capacity(literal.len() + 2);
    escaped.push('%');
    for c in literal.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_placement_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::BigIntArray(v) => q = q.bind(v.clone()),
            BindValue::TextArray(v) => q = q.bind(v.clone()),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
fn bind_placement_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::BigIntArray(v) => q = q.bind(v.clone()),
            BindValue::TextArray(v) => q = q.bind(v.clone()),
        }
    }
    q
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use placement_core::filter::{build_predicate, ParseMode, PlacementFilterParams};

    use super::*;

    fn predicate_for(params: PlacementFilterParams) -> FilterPredicate {
        build_predicate(&params, ParseMode::Lenient).unwrap()
    }

    #[test]
    fn empty_predicate_renders_no_where_clause() {
        let (clause, binds, next) = build_placement_filter(&FilterPredicate::new());
        assert_eq!(clause, "");
        assert!(binds.is_empty());
        assert_eq!(next, 1);
    }

    #[test]
    fn single_integer_renders_equality() {
        let predicate = predicate_for(PlacementFilterParams {
            site_id: Some("5".into()),
            ..Default::default()
        });
        let (clause, binds, next) = build_placement_filter(&predicate);

        assert_eq!(clause, "WHERE site_id = $1");
        assert_eq!(binds, vec![BindValue::BigInt(5)]);
        assert_eq!(next, 2);
    }

    #[test]
    fn integer_set_renders_any_array() {
        let predicate = predicate_for(PlacementFilterParams {
            site_id: Some("5,7".into()),
            ..Default::default()
        });
        let (clause, binds, _) = build_placement_filter(&predicate);

        assert_eq!(clause, "WHERE site_id = ANY($1)");
        assert_eq!(binds, vec![BindValue::BigIntArray(vec![5, 7])]);
    }

    #[test]
    fn text_filters_render_escaped_ilike() {
        let predicate = predicate_for(PlacementFilterParams {
            placement_name: Some("50%_off".into()),
            primary_size: Some("300x250,728x90".into()),
            ..Default::default()
        });
        let (clause, binds, next) = build_placement_filter(&predicate);

        assert_eq!(
            clause,
            "WHERE placement_name ILIKE $1 AND primary_size ILIKE ANY($2)"
        );
        assert_eq!(
            binds,
            vec![
                BindValue::Text("%50\\%\\_off%".into()),
                BindValue::TextArray(vec!["%300x250%".into(), "%728x90%".into()]),
            ]
        );
        assert_eq!(next, 3);
    }

    #[test]
    fn unsatisfiable_constraint_renders_false_without_bind() {
        let predicate = predicate_for(PlacementFilterParams {
            placement_id: Some("abc".into()),
            status_id: Some("2".into()),
            ..Default::default()
        });
        let (clause, binds, next) = build_placement_filter(&predicate);

        assert_eq!(clause, "WHERE FALSE AND status_id = $1");
        assert_eq!(binds, vec![BindValue::BigInt(2)]);
        assert_eq!(next, 2);
    }

    #[test]
    fn exact_text_constraints_render_equality() {
        let mut predicate = FilterPredicate::new();
        predicate.insert(
            FilterField::TagType,
            FieldConstraint::Exact(FieldValue::Text("js".into())),
        );
        predicate.insert(
            FilterField::PrimarySize,
            FieldConstraint::AnyOf(vec![
                FieldValue::Text("300x250".into()),
                FieldValue::Text("728x90".into()),
            ]),
        );
        let (clause, binds, _) = build_placement_filter(&predicate);

        assert_eq!(clause, "WHERE tag_type = $1 AND primary_size = ANY($2)");
        assert_eq!(
            binds,
            vec![
                BindValue::Text("js".into()),
                BindValue::TextArray(vec!["300x250".into(), "728x90".into()]),
            ]
        );
    }

    #[test]
    fn mismatched_value_types_render_false() {
        let mut predicate = FilterPredicate::new();
        predicate.insert(
            FilterField::SiteId,
            FieldConstraint::Exact(FieldValue::Text("one".into())),
        );
        predicate.insert(
            FilterField::PlacementType,
            FieldConstraint::AnyOf(vec![FieldValue::Int(3)]),
        );
        let (clause, binds, next) = build_placement_filter(&predicate);

        assert_eq!(clause, "WHERE FALSE AND FALSE");
        assert!(binds.is_empty());
        assert_eq!(next, 1);
    }

    #[test]
    fn like_pattern_escapes_backslash() {
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }
}
