//! Repository layer over the catalog tables.
//!
//! # Responsibility
//! - Define the entity store and relationship index contracts.
//! - Keep SQL details out of the service layer.
//!
//! # Invariants
//! - Lookups report absence as `Ok(None)` or an empty collection, never as
//!   an error.
//! - Read paths reject unparsable persisted identifiers instead of masking
//!   them.

use crate::db::DbError;
use crate::model::id::EntityId;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod entity_store;
pub mod relationship_index;

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage-level failure from a repository call.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted catalog data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn parse_entity_id(value: &str, column: &str) -> RepoResult<EntityId> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid id value `{value}` in {column}")))
}
