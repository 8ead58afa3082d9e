//! Placement listing domain: filter predicates, page math and shared types.
//!
//! This crate performs no I/O. The `db` crate evaluates predicates against a
//! record store and the `api` crate wires both into HTTP handlers.

pub mod error;
pub mod filter;
pub mod pagination;
pub mod types;
