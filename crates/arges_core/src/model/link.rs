//! Book-to-author link record.

use crate::model::book::{AuthorId, BookId};
use serde::{Deserialize, Serialize};

/// Directed edge recording which author a book belongs to.
///
/// Many links may share one `author_id`. A book is expected to have at most
/// one link; the table itself does not enforce this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    pub book_id: BookId,
    pub author_id: AuthorId,
}
