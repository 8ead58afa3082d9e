//! Placement entity model and DTOs.
//!
//! A placement is one ad-serving inventory slot together with denormalized
//! zone, site, publisher and size metadata. Rows are read-only snapshots as
//! far as the API is concerned.

use placement_core::filter::{FieldRef, FilterField};
use placement_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A placement row from the `placements` table.
///
/// Not serialized to clients; listings return [`PlacementSummary`].
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct PlacementRecord {
    pub id: DbId,
    pub placement_id: Option<i64>,
    pub placement_name: Option<String>,
    pub placement_status_id: Option<i64>,
    pub placement_display_status_id: Option<i64>,
    pub placement_type_id: Option<i64>,
    pub placement_type: Option<String>,
    pub placement_type_status_id: Option<i64>,
    pub fold: Option<i64>,
    pub zone_id: Option<i64>,
    pub zone_name: Option<String>,
    pub zone_status_id: Option<i64>,
    pub zone_display_status_id: Option<i64>,
    pub site_id: Option<i64>,
    pub site_name: Option<String>,
    pub site_url: Option<String>,
    pub site_status_id: Option<i64>,
    pub site_display_status_id: Option<i64>,
    pub publisher_id: Option<i64>,
    pub publisher_name: Option<String>,
    pub tag_type_id: Option<i64>,
    pub tag_type: Option<String>,
    pub placement_tag_type: Option<String>,
    pub primary_size_id: Option<i64>,
    pub primary_size: Option<String>,
    pub status_id: Option<i64>,
    pub placement_identifier: Option<String>,
    pub appnexus: Option<i64>,
    pub placement_created_at: Option<Timestamp>,
    pub placement_modified_at: Option<Timestamp>,
}

impl PlacementRecord {
    /// The record's value for a filterable field.
    pub fn field_ref(&self, field: FilterField) -> FieldRef<'_> {
        match field {
            FilterField::PlacementId => FieldRef::Int(self.placement_id),
            FilterField::PlacementName => FieldRef::Text(self.placement_name.as_deref()),
            FilterField::PlacementStatusId => FieldRef::Int(self.placement_status_id),
            FilterField::PlacementType => FieldRef::Text(self.placement_type.as_deref()),
            FilterField::ZoneId => FieldRef::Int(self.zone_id),
            FilterField::SiteId => FieldRef::Int(self.site_id),
            FilterField::PublisherId => FieldRef::Int(self.publisher_id),
            FilterField::TagType => FieldRef::Text(self.tag_type.as_deref()),
            FilterField::PrimarySize => FieldRef::Text(self.primary_size.as_deref()),
            FilterField::StatusId => FieldRef::Int(self.status_id),
        }
    }

    /// Build the stored row for a DTO under the given surrogate key.
    pub fn from_new(id: DbId, input: &NewPlacement) -> Self {
        let input = input.clone();
        Self {
            id,
            placement_id: input.placement_id,
            placement_name: input.placement_name,
            placement_status_id: input.placement_status_id,
            placement_display_status_id: input.placement_display_status_id,
            placement_type_id: input.placement_type_id,
            placement_type: input.placement_type,
            placement_type_status_id: input.placement_type_status_id,
            fold: input.fold,
            zone_id: input.zone_id,
            zone_name: input.zone_name,
            zone_status_id: input.zone_status_id,
            zone_display_status_id: input.zone_display_status_id,
            site_id: input.site_id,
            site_name: input.site_name,
            site_url: input.site_url,
            site_status_id: input.site_status_id,
            site_display_status_id: input.site_display_status_id,
            publisher_id: input.publisher_id,
            publisher_name: input.publisher_name,
            tag_type_id: input.tag_type_id,
            tag_type: input.tag_type,
            placement_tag_type: input.placement_tag_type,
            primary_size_id: input.primary_size_id,
            primary_size: input.primary_size,
            status_id: input.status_id,
            placement_identifier: input.placement_identifier,
            appnexus: input.appnexus,
            placement_created_at: input.placement_created_at,
            placement_modified_at: input.placement_modified_at,
        }
    }
}

/// Listing projection of a placement: identity, ownership and the filtered
/// descriptive fields. The surrogate `id` stays internal to the store.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct PlacementSummary {
    pub placement_id: Option<i64>,
    pub placement_name: Option<String>,
    pub publisher_id: Option<i64>,
    pub site_id: Option<i64>,
    pub status_id: Option<i64>,
    pub placement_type: Option<String>,
    pub primary_size: Option<String>,
}

impl From<&PlacementRecord> for PlacementSummary {
    fn from(record: &PlacementRecord) -> Self {
        Self {
            placement_id: record.placement_id,
            placement_name: record.placement_name.clone(),
            publisher_id: record.publisher_id,
            site_id: record.site_id,
            status_id: record.status_id,
            placement_type: record.placement_type.clone(),
            primary_size: record.primary_size.clone(),
        }
    }
}

/// DTO for inserting a placement. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPlacement {
    pub placement_id: Option<i64>,
    pub placement_name: Option<String>,
    pub placement_status_id: Option<i64>,
    pub placement_display_status_id: Option<i64>,
    pub placement_type_id: Option<i64>,
    pub placement_type: Option<String>,
    pub placement_type_status_id: Option<i64>,
    pub fold: Option<i64>,
    pub zone_id: Option<i64>,
    pub zone_name: Option<String>,
    pub zone_status_id: Option<i64>,
    pub zone_display_status_id: Option<i64>,
    pub site_id: Option<i64>,
    pub site_name: Option<String>,
    pub site_url: Option<String>,
    pub site_status_id: Option<i64>,
    pub site_display_status_id: Option<i64>,
    pub publisher_id: Option<i64>,
    pub publisher_name: Option<String>,
    pub tag_type_id: Option<i64>,
    pub tag_type: Option<String>,
    pub placement_tag_type: Option<String>,
    pub primary_size_id: Option<i64>,
    pub primary_size: Option<String>,
    pub status_id: Option<i64>,
    pub placement_identifier: Option<String>,
    pub appnexus: Option<i64>,
    pub placement_created_at: Option<Timestamp>,
    pub placement_modified_at: Option<Timestamp>,
}
