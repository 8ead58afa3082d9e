//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&PgPool` as the first argument.

pub mod placement_repo;

pub use placement_repo::PlacementRepo;
