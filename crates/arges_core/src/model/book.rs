//! Book and Author entity records.
//!
//! # Responsibility
//! - Define the two entity shapes owned by the entity store.
//!
//! # Invariants
//! - `id` is assigned once at creation and never changes.
//! - Records never embed their related entities; relations are resolved
//!   on read through the relationship index.

use crate::model::id::EntityId;
use serde::{Deserialize, Serialize};

/// Identifier of a stored book.
pub type BookId = EntityId;

/// Identifier of a stored author.
pub type AuthorId = EntityId;

/// A book entry in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
}

impl Book {
    /// Builds a record for an already assigned identifier.
    pub fn with_id(id: BookId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

/// An author entry in the catalog.
///
/// Authors are only created as a side effect of adding a book and are never
/// removed, even when no book references them anymore.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    pub name: String,
}

impl Author {
    /// Builds a record for an already assigned identifier.
    pub fn with_id(id: AuthorId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
