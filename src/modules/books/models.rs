use serde::{Deserialize, Serialize};
use shelf_db::{Book, BookId};
use thiserror::Error;

/// Answer to `DELETE /api/books`, whatever the store reported.
pub const COMPLETE_DELETE_SUCCESSFUL: &str = "complete delete successful";

/// Answer to a successful `DELETE /api/books/{id}`.
pub const DELETE_SUCCESSFUL: &str = "delete successful";

/// Failure payloads of the book routes. The `Display` text is the exact
/// string sent to clients.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum BookFailure {
    #[error("missing required field title")]
    MissingTitle,
    #[error("missing required field comment")]
    MissingComment,
    #[error("no book exists")]
    NotFound,
}

/// List view entry.
#[derive(Debug, Clone, Serialize)]
pub struct BookSummary {
    #[serde(rename = "_id")]
    pub id: BookId,
    pub title: String,
    pub commentcount: usize,
}

impl From<Book> for BookSummary {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            commentcount: book.comments.len(),
        }
    }
}

/// Response to a successful create.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedBook {
    #[serde(rename = "_id")]
    pub id: BookId,
    pub title: String,
}

impl From<Book> for CreatedBook {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
        }
    }
}

/// Detail view with the full comment sequence.
#[derive(Debug, Clone, Serialize)]
pub struct BookDetail {
    #[serde(rename = "_id")]
    pub id: BookId,
    pub title: String,
    pub comments: Vec<String>,
}

impl From<Book> for BookDetail {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            comments: book.comments,
        }
    }
}

/// Request body for creating a book.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewBook {
    pub title: Option<String>,
}

impl NewBook {
    /// The title, if one was sent and is not empty.
    pub fn title(self) -> Option<String> {
        self.title.filter(|title| !title.is_empty())
    }
}

/// Request body for commenting on a book.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewComment {
    pub comment: Option<String>,
}

impl NewComment {
    /// The comment, if one was sent and is not empty.
    pub fn comment(self) -> Option<String> {
        self.comment.filter(|comment| !comment.is_empty())
    }
}
