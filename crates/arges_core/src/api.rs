//! Request boundary for the four catalog operations.
//!
//! # Responsibility
//! - Model `books`, `authors`, `addBook` and `removeBook` requests.
//! - Reject missing mandatory arguments before the service runs.
//! - Resolve nested `author` / `books` fields only when they are selected.
//!
//! # Invariants
//! - A rejected request never reaches the service.
//! - An unselected nested field is omitted from output; a selected author
//!   that cannot be resolved is `null`.
//! - `removeBook` with an id that is not exactly the form `books` returns
//!   matches nothing and returns `null`.

use crate::model::book::{Author, AuthorId, Book, BookId};
use crate::model::id::IdGenerator;
use crate::service::data_service::{DataService, ServiceError, ServiceResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Nested fields requested on a book.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BookSelection {
    #[serde(default)]
    pub author: Option<AuthorSelection>,
}

/// Nested fields requested on an author.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AuthorSelection {
    #[serde(default)]
    pub books: Option<Box<BookSelection>>,
}

impl BookSelection {
    /// Selects `author` with no further nesting.
    pub fn with_author() -> Self {
        Self {
            author: Some(AuthorSelection::default()),
        }
    }
}

impl AuthorSelection {
    /// Selects `books` with no further nesting.
    pub fn with_books() -> Self {
        Self {
            books: Some(Box::default()),
        }
    }
}

/// One catalog operation as received from a caller.
///
/// Mandatory arguments are optional here so that their absence can be
/// reported instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Request {
    Books {
        #[serde(default)]
        select: BookSelection,
    },
    Authors {
        #[serde(default)]
        select: AuthorSelection,
    },
    AddBook {
        title: Option<String>,
        author: Option<String>,
        #[serde(default)]
        select: BookSelection,
    },
    RemoveBook {
        id: Option<String>,
        #[serde(default)]
        select: BookSelection,
    },
}

impl Request {
    /// Parses a JSON request such as `{"op":"addBook","title":"T","author":"A"}`.
    pub fn from_json(input: &str) -> Result<Self, ApiError> {
        serde_json::from_str(input).map_err(|err| ApiError::MalformedRequest(err.to_string()))
    }

    /// Operation name as exposed to callers.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Books { .. } => "books",
            Self::Authors { .. } => "authors",
            Self::AddBook { .. } => "addBook",
            Self::RemoveBook { .. } => "removeBook",
        }
    }
}

/// Book as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookView {
    pub id: BookId,
    pub title: String,
    /// Outer `None`: not selected. `Some(None)`: selected, no author.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Option<Box<AuthorView>>>,
}

/// Author as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorView {
    pub id: AuthorId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub books: Option<Vec<BookView>>,
}

/// Result of one executed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Books(Vec<BookView>),
    Authors(Vec<AuthorView>),
    AddBook(Option<BookView>),
    RemoveBook(Option<BookView>),
}

impl Response {
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Books(_) => "books",
            Self::Authors(_) => "authors",
            Self::AddBook(_) => "addBook",
            Self::RemoveBook(_) => "removeBook",
        }
    }

    /// Wraps the payload under its operation name, e.g. `{"books": [...]}`.
    pub fn to_json(&self) -> serde_json::Result<Value> {
        let mut data = Map::new();
        data.insert(self.operation().to_string(), serde_json::to_value(self)?);
        Ok(Value::Object(data))
    }
}

/// Errors surfaced by [`execute`].
#[derive(Debug)]
pub enum ApiError {
    /// Request text is not a valid request document.
    MalformedRequest(String),
    /// A mandatory argument was not supplied.
    MissingArgument {
        operation: &'static str,
        argument: &'static str,
    },
    /// The service failed while executing a valid request.
    Service(ServiceError),
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedRequest(details) => write!(f, "malformed request: {details}"),
            Self::MissingArgument {
                operation,
                argument,
            } => write!(
                f,
                "missing required argument `{argument}` for `{operation}`"
            ),
            Self::Service(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Service(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

/// Validates `request` and runs it against `service`.
pub fn execute<G: IdGenerator>(
    service: &DataService<G>,
    request: Request,
) -> Result<Response, ApiError> {
    match request {
        Request::Books { select } => {
            let views = service
                .list_books()?
                .into_iter()
                .map(|book| book_view(service, book, &select))
                .collect::<ServiceResult<Vec<_>>>()?;
            Ok(Response::Books(views))
        }
        Request::Authors { select } => {
            let views = service
                .list_authors()?
                .into_iter()
                .map(|author| author_view(service, author, &select))
                .collect::<ServiceResult<Vec<_>>>()?;
            Ok(Response::Authors(views))
        }
        Request::AddBook {
            title,
            author,
            select,
        } => {
            let title = require("addBook", "title", title)?;
            let author = require("addBook", "author", author)?;
            let book = service.add_book(&title, &author)?;
            Ok(Response::AddBook(Some(book_view(service, book, &select)?)))
        }
        Request::RemoveBook { id, select } => {
            let id = require("removeBook", "id", id)?;
            let Some(book_id) = parse_book_id(&id) else {
                return Ok(Response::RemoveBook(None));
            };
            let removed = service
                .remove_book(book_id)?
                .map(|book| book_view(service, book, &select))
                .transpose()?;
            Ok(Response::RemoveBook(removed))
        }
    }
}

// Only the canonical spelling returned by `books` names a book; other
// spellings `Uuid::parse_str` accepts (simple, braced, urn, uppercase) match
// nothing.
fn parse_book_id(id: &str) -> Option<BookId> {
    let book_id = Uuid::parse_str(id).ok()?;
    (book_id.hyphenated().to_string() == id).then_some(book_id)
}

fn require(
    operation: &'static str,
    argument: &'static str,
    value: Option<String>,
) -> Result<String, ApiError> {
    value.ok_or(ApiError::MissingArgument {
        operation,
        argument,
    })
}

fn book_view<G: IdGenerator>(
    service: &DataService<G>,
    book: Book,
    select: &BookSelection,
) -> ServiceResult<BookView> {
    let author = match &select.author {
        Some(author_select) => Some(
            service
                .resolve_author(&book)?
                .map(|author| author_view(service, author, author_select).map(Box::new))
                .transpose()?,
        ),
        None => None,
    };
    Ok(BookView {
        id: book.id,
        title: book.title,
        author,
    })
}

fn author_view<G: IdGenerator>(
    service: &DataService<G>,
    author: Author,
    select: &AuthorSelection,
) -> ServiceResult<AuthorView> {
    let books = match &select.books {
        Some(book_select) => Some(
            service
                .resolve_books(&author)?
                .into_iter()
                .map(|book| book_view(service, book, book_select))
                .collect::<ServiceResult<Vec<_>>>()?,
        ),
        None => None,
    };
    Ok(AuthorView {
        id: author.id,
        name: author.name,
        books,
    })
}
