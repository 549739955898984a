//! Workspace data model: ordered tabs holding ordered notes.
//!
//! # Responsibility
//! - Define the in-memory source of truth rendered by any presentation layer.
//! - Keep ordering rules (append, remove, move-not-swap) in one primitive.
//!
//! # Invariants
//! - Tab names are unique in a workspace; note titles are unique in a tab.
//! - Order is never inferred from hashing; it lives in `OrderedMap`.

pub mod error;
pub mod note;
pub mod ordered_map;
pub mod tab;
pub mod workspace;
