//! Entity identifiers and their generators.
//!
//! # Responsibility
//! - Define the opaque identifier shared by books and authors.
//! - Provide the generator seam used when the store creates entities.
//!
//! # Invariants
//! - Generated identifiers are never nil and never repeat within one
//!   generator instance.

use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Opaque, globally unique identifier for every stored entity.
pub type EntityId = Uuid;

/// Source of fresh entity identifiers.
///
/// Implementations must be safe to share between threads because the
/// service that owns them is.
pub trait IdGenerator: Send + Sync {
    /// Returns an identifier that has not been handed out before.
    fn next_id(&self) -> EntityId;
}

/// Production generator backed by random (v4) UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> EntityId {
        Uuid::new_v4()
    }
}

/// Deterministic generator yielding `Uuid::from_u128(1)`, `(2)`, ...
///
/// Used by tests and reproducible demos where ids must be predictable.
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    last: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> EntityId {
        let next = self.last.fetch_add(1, Ordering::Relaxed) + 1;
        Uuid::from_u128(u128::from(next))
    }
}
