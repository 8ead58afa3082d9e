//! Filter construction for placement listings.
//!
//! Raw query-string values are turned into a typed [`FilterPredicate`]: a map
//! from each recognized [`FilterField`] to a [`FieldConstraint`]. A field
//! missing from the map is unconstrained. Store backends translate the
//! predicate into their own query language (SQL `WHERE` clause, in-memory
//! evaluation) and must honour the matching rules documented on
//! [`FieldConstraint::matches`].

use std::collections::BTreeMap;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// How a filter field is parsed and matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Comma-separated base-10 integers, matched exactly.
    Integer,
    /// Comma-separated strings, matched as case-insensitive substrings.
    Text,
}

/// The closed set of query parameters that produce filter constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterField {
    PlacementId,
    PlacementName,
    PlacementStatusId,
    PlacementType,
    ZoneId,
    SiteId,
    PublisherId,
    TagType,
    PrimarySize,
    StatusId,
}

impl FilterField {
    /// Every recognized field, in the order constraints are built.
    pub const ALL: [FilterField; 10] = [
        FilterField::PlacementId,
        FilterField::PlacementName,
        FilterField::PlacementStatusId,
        FilterField::PlacementType,
        FilterField::ZoneId,
        FilterField::SiteId,
        FilterField::PublisherId,
        FilterField::TagType,
        FilterField::PrimarySize,
        FilterField::StatusId,
    ];

    /// Query parameter name, which is also the column name in the store.
    pub fn column(self) -> &'static str {
        match self {
            FilterField::PlacementId => "placement_id",
            FilterField::PlacementName => "placement_name",
            FilterField::PlacementStatusId => "placement_status_id",
            FilterField::PlacementType => "placement_type",
            FilterField::ZoneId => "zone_id",
            FilterField::SiteId => "site_id",
            FilterField::PublisherId => "publisher_id",
            FilterField::TagType => "tag_type",
            FilterField::PrimarySize => "primary_size",
            FilterField::StatusId => "status_id",
        }
    }

    /// The field named by a query parameter, if it is a filter parameter.
    pub fn from_param(name: &str) -> Option<FilterField> {
        FilterField::ALL.into_iter().find(|f| f.column() == name)
    }

    pub fn kind(self) -> FieldKind {
        match self {
            FilterField::PlacementName
            | FilterField::PlacementType
            | FilterField::TagType
            | FilterField::PrimarySize => FieldKind::Text,
            _ => FieldKind::Integer,
        }
    }
}

// ---------------------------------------------------------------------------
// Constraints
// ---------------------------------------------------------------------------

/// A single comparable value inside a constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Int(i64),
    Text(String),
}

/// Borrowed view of a record's value for one field, used during evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRef<'a> {
    Int(Option<i64>),
    Text(Option<&'a str>),
}

/// Constraint placed on one field of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldConstraint {
    /// Field equals the value.
    Exact(FieldValue),
    /// Field equals any of the values. An empty set matches nothing.
    AnyOf(Vec<FieldValue>),
    /// Field contains the pattern, ignoring case.
    Pattern(String),
    /// Field contains at least one of the patterns, ignoring case.
    MatchesAnyPattern(Vec<String>),
}

impl FieldConstraint {
    /// Evaluate the constraint against a record value.
    ///
    /// - A missing (`NULL`) value never matches.
    /// - Integers only compare with integers, text only with text.
    /// - Patterns are literal substrings compared case-insensitively; no
    ///   wildcard or regex syntax is interpreted.
    ///
    /// Case folding here is Unicode `to_lowercase`. Postgres `ILIKE` folds by
    /// the database collation, so non-ASCII text may compare differently
    /// between the in-memory and Postgres stores.
    pub fn matches(&self, value: FieldRef<'_>) -> bool {
        match self {
            FieldConstraint::Exact(expected) => value_equals(expected, value),
            FieldConstraint::AnyOf(values) => values.iter().any(|v| value_equals(v, value)),
            FieldConstraint::Pattern(pattern) => contains_ignore_case(value, pattern),
            FieldConstraint::MatchesAnyPattern(patterns) => {
                patterns.iter().any(|p| contains_ignore_case(value, p))
            }
        }
    }
}

fn value_equals(expected: &FieldValue, value: FieldRef<'_>) -> bool {
    match (expected, value) {
        (FieldValue::Int(e), FieldRef::Int(Some(v))) => *e == v,
        (FieldValue::Text(e), FieldRef::Text(Some(v))) => e == v,
        _ => false,
    }
}

fn contains_ignore_case(value: FieldRef<'_>, pattern: &str) -> bool {
    match value {
        FieldRef::Text(Some(v)) => v.to_lowercase().contains(&pattern.to_lowercase()),
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Predicate
// ---------------------------------------------------------------------------

/// Per-request mapping of fields to constraints. All constraints must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPredicate {
    constraints: BTreeMap<FilterField, FieldConstraint>,
}

impl FilterPredicate {
    /// An empty predicate, matching every record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the constraint for a field, replacing any previous one.
    pub fn insert(&mut self, field: FilterField, constraint: FieldConstraint) {
        self.constraints.insert(field, constraint);
    }

    pub fn get(&self, field: FilterField) -> Option<&FieldConstraint> {
        self.constraints.get(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Iterate constraints in field order.
    pub fn iter(&self) -> impl Iterator<Item = (FilterField, &FieldConstraint)> {
        self.constraints.iter().map(|(f, c)| (*f, c))
    }

    /// Evaluate every constraint, resolving record values through `value_of`.
    pub fn matches<'a, F>(&self, mut value_of: F) -> bool
    where
        F: FnMut(FilterField) -> FieldRef<'a>,
    {
        self.iter()
            .all(|(field, constraint)| constraint.matches(value_of(field)))
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// How malformed integer tokens are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// Discard the token. A field left with no valid token matches nothing.
    #[default]
    Lenient,
    /// Reject the request with [`CoreError::Validation`].
    Strict,
}

/// Raw filter query parameters (`?site_id=1,2&placement_type=banner`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementFilterParams {
    pub placement_id: Option<String>,
    pub placement_name: Option<String>,
    pub placement_status_id: Option<String>,
    pub placement_type: Option<String>,
    pub zone_id: Option<String>,
    pub site_id: Option<String>,
    pub publisher_id: Option<String>,
    pub tag_type: Option<String>,
    pub primary_size: Option<String>,
    pub status_id: Option<String>,
}

impl PlacementFilterParams {
    /// Raw value for a field, if the parameter was supplied.
    pub fn get(&self, field: FilterField) -> Option<&str> {
        let raw = match field {
            FilterField::PlacementId => &self.placement_id,
            FilterField::PlacementName => &self.placement_name,
            FilterField::PlacementStatusId => &self.placement_status_id,
            FilterField::PlacementType => &self.placement_type,
            FilterField::ZoneId => &self.zone_id,
            FilterField::SiteId => &self.site_id,
            FilterField::PublisherId => &self.publisher_id,
            FilterField::TagType => &self.tag_type,
            FilterField::PrimarySize => &self.primary_size,
            FilterField::StatusId => &self.status_id,
        };
        raw.as_deref()
    }

    /// Add a raw value for a field. A repeated parameter extends the
    /// existing value list, so `site_id=1&site_id=2` reads as `site_id=1,2`.
    pub fn append(&mut self, field: FilterField, raw: &str) {
        let slot = match field {
            FilterField::PlacementId => &mut self.placement_id,
            FilterField::PlacementName => &mut self.placement_name,
            FilterField::PlacementStatusId => &mut self.placement_status_id,
            FilterField::PlacementType => &mut self.placement_type,
            FilterField::ZoneId => &mut self.zone_id,
            FilterField::SiteId => &mut self.site_id,
            FilterField::PublisherId => &mut self.publisher_id,
            FilterField::TagType => &mut self.tag_type,
            FilterField::PrimarySize => &mut self.primary_size,
            FilterField::StatusId => &mut self.status_id,
        };
        *slot = Some(match slot.take() {
            Some(existing) => format!("{existing},{raw}"),
            None => raw.to_string(),
        });
    }
}

/// Split a comma-separated parameter into trimmed, non-empty tokens.
pub fn split_values(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Build the predicate for a set of raw filter parameters.
///
/// One token yields [`FieldConstraint::Exact`] (integers) or
/// [`FieldConstraint::Pattern`] (text); several yield
/// [`FieldConstraint::AnyOf`] or [`FieldConstraint::MatchesAnyPattern`].
/// Absent or blank parameters add no constraint.
pub fn build_predicate(
    params: &PlacementFilterParams,
    mode: ParseMode,
) -> Result<FilterPredicate, CoreError> {
    let mut predicate = FilterPredicate::new();

    for field in FilterField::ALL {
        let Some(raw) = params.get(field) else {
            continue;
        };
        let tokens = split_values(raw);
        if tokens.is_empty() {
            continue;
        }

        let constraint = match field.kind() {
            FieldKind::Integer => integer_constraint(field, &tokens, mode)?,
            FieldKind::Text => text_constraint(&tokens),
        };
        predicate.insert(field, constraint);
    }

    Ok(predicate)
}

fn integer_constraint(
    field: FilterField,
    tokens: &[&str],
    mode: ParseMode,
) -> Result<FieldConstraint, CoreError> {
    let mut values = Vec::with_capacity(tokens.len());

    for token in tokens {
        match token.parse::<i64>() {
            Ok(v) => values.push(FieldValue::Int(v)),
            Err(_) if mode == ParseMode::Strict => {
                return Err(CoreError::Validation(format!(
                    "{} must be a comma-separated list of integers, got '{token}'",
                    field.column()
                )));
            }
            Err(_) => {
                tracing::debug!(field = field.column(), token, "Discarding non-numeric filter token");
            }
        }
    }

    if values.len() == 1 {
        Ok(FieldConstraint::Exact(values.remove(0)))
    } else {
        Ok(FieldConstraint::AnyOf(values))
    }
}

fn text_constraint(tokens: &[&str]) -> FieldConstraint {
    match tokens {
        [single] => FieldConstraint::Pattern((*single).to_string()),
        many => FieldConstraint::MatchesAnyPattern(many.iter().map(|t| (*t).to_string()).collect()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
