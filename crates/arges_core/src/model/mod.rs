//! Domain model for the book/author catalog.
//!
//! # Responsibility
//! - Define entity records, the link record, and identifier generation.
//!
//! # Invariants
//! - Every entity is identified by a stable, opaque `EntityId`.
//! - Entities are owned by the entity store; links only reference them.

pub mod book;
pub mod id;
pub mod link;
