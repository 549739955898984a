//! Use-case services over the workspace model.
//!
//! # Responsibility
//! - Pair model commands with durable persistence (write-through).
//!
//! # Invariants
//! - Services never bypass model validation.

pub mod notes_service;
