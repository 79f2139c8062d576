//! Document store access for shelf.
//!
//! [`BookStore`] is the seam every handler talks to. Two backends implement it:
//! [`mongo::MongoStore`] for a real MongoDB deployment and
//! [`memory::InMemoryStore`] for local runs and tests. [`connect`] picks one
//! from the configured endpoint scheme.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use serde::{Serialize, Serializer};
use shelf_kernel::settings::DatabaseSettings;
use thiserror::Error;

pub mod memory;
pub mod module;
pub mod mongo;

pub use memory::InMemoryStore;
pub use module::StoreModule;
pub use mongo::MongoStore;

/// Errors raised by a document store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unsupported store endpoint '{0}'; expected mongodb://, mongodb+srv:// or memory://")]
    UnsupportedEndpoint(String),

    #[error("mongodb error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// A path segment that is not a 24-digit hex object id.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("malformed book id '{0}'")]
pub struct InvalidBookId(pub String);

/// Store-generated identifier of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BookId(ObjectId);

impl BookId {
    /// Fresh identifier; unique per process and time-ordered.
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl From<ObjectId> for BookId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl FromStr for BookId {
    type Err = InvalidBookId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s)
            .map(Self)
            .map_err(|_| InvalidBookId(s.to_string()))
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

// Plain hex on the wire, not the `{"$oid": ..}` extended JSON form.
impl Serialize for BookId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A stored book document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub comments: Vec<String>,
}

impl Book {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: BookId::generate(),
            title: title.into(),
            comments: Vec::new(),
        }
    }
}

/// Operations the books routes need from a document store.
///
/// Counts returned by `push_comment`, `delete_by_id` and `delete_all` are the
/// number of documents the store reports as modified or removed.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Short backend label used in logs.
    fn backend(&self) -> &'static str;

    /// Round-trip to the store to verify it is reachable.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Insert a book with no comments and return it with its new id.
    async fn insert_one(&self, title: &str) -> Result<Book, StoreError>;

    async fn find_all(&self) -> Result<Vec<Book>, StoreError>;

    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>, StoreError>;

    /// Append `comment` to the book's comment sequence.
    async fn push_comment(&self, id: BookId, comment: &str) -> Result<u64, StoreError>;

    async fn delete_by_id(&self, id: BookId) -> Result<u64, StoreError>;

    async fn delete_all(&self) -> Result<u64, StoreError>;
}

/// Shared handle to whichever backend the process was configured with.
pub type SharedStore = Arc<dyn BookStore>;

/// Open the store named by `settings.endpoint`.
pub async fn connect(settings: &DatabaseSettings) -> Result<SharedStore, StoreError> {
    let endpoint = settings.endpoint.as_str();

    if endpoint.starts_with("memory://") {
        tracing::info!(target: "shelf-db", "using in-memory book store");
        return Ok(Arc::new(InMemoryStore::new()));
    }

    if endpoint.starts_with("mongodb://") || endpoint.starts_with("mongodb+srv://") {
        let store = MongoStore::connect(endpoint, &settings.database, &settings.collection).await?;
        tracing::info!(
            target: "shelf-db",
            database = %settings.database,
            collection = %settings.collection,
            "connected mongodb book store"
        );
        return Ok(Arc::new(store));
    }

    Err(StoreError::UnsupportedEndpoint(settings.endpoint.clone()))
}
