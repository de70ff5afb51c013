//! Core catalog logic for Arges.
//! Books and authors joined through an explicit link table, kept mutually
//! consistent by a single owning service.

pub mod api;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;
pub mod service;

pub use api::{
    execute, ApiError, AuthorSelection, AuthorView, BookSelection, BookView, Request, Response,
};
pub use logging::{default_log_level, init_logging, logging_status, LogSettings};
pub use model::book::{Author, AuthorId, Book, BookId};
pub use model::id::{EntityId, IdGenerator, SequentialIdGenerator, UuidGenerator};
pub use model::link::Link;
pub use repo::entity_store::{EntityStore, SqliteEntityStore};
pub use repo::relationship_index::{RelationshipIndex, SqliteRelationshipIndex};
pub use repo::{RepoError, RepoResult};
pub use seed::{load_sample_catalog, SampleCatalog, SAMPLE_BOOKS};
pub use service::data_service::{DataService, ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
