//! MongoDB-backed book store.

use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};

use crate::{Book, BookId, BookStore, StoreError};

/// Document layout inside the `books` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BookRecord {
    #[serde(rename = "_id")]
    id: ObjectId,
    title: String,
    #[serde(default)]
    comments: Vec<String>,
}

impl From<BookRecord> for Book {
    fn from(record: BookRecord) -> Self {
        Book {
            id: record.id.into(),
            title: record.title,
            comments: record.comments,
        }
    }
}

pub struct MongoStore {
    client: Client,
    database: String,
    books: Collection<BookRecord>,
}

impl MongoStore {
    /// Build a client for `uri`. The driver connects lazily; call
    /// [`BookStore::ping`] to verify the deployment is reachable.
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri).await?;
        let books = client.database(database).collection::<BookRecord>(collection);

        Ok(Self {
            client,
            database: database.to_string(),
            books,
        })
    }
}

/// A ping reply counts only when the server reports `ok: 1`.
fn ping_acknowledged(reply: &Document) -> Result<(), StoreError> {
    let ok = match reply.get("ok") {
        Some(Bson::Double(value)) => *value == 1.0,
        Some(Bson::Int32(value)) => *value == 1,
        Some(Bson::Int64(value)) => *value == 1,
        _ => false,
    };
    if ok {
        Ok(())
    } else {
        Err(StoreError::Unavailable(format!("ping answered {}", reply)))
    }
}

#[async_trait]
impl BookStore for MongoStore {
    fn backend(&self) -> &'static str {
        "mongodb"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let reply = self
            .client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .await?;
        ping_acknowledged(&reply)
    }

    async fn insert_one(&self, title: &str) -> Result<Book, StoreError> {
        let record = BookRecord {
            id: ObjectId::new(),
            title: title.to_string(),
            comments: Vec::new(),
        };
        self.books.insert_one(&record).await?;
        Ok(record.into())
    }

    async fn find_all(&self) -> Result<Vec<Book>, StoreError> {
        let mut cursor = self.books.find(doc! {}).await?;
        let mut books = Vec::new();
        while cursor.advance().await? {
            books.push(cursor.deserialize_current()?.into());
        }
        Ok(books)
    }

    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>, StoreError> {
        let record = self
            .books
            .find_one(doc! { "_id": id.object_id() })
            .await?;
        Ok(record.map(Book::from))
    }

    async fn push_comment(&self, id: BookId, comment: &str) -> Result<u64, StoreError> {
        let result = self
            .books
            .update_one(
                doc! { "_id": id.object_id() },
                doc! { "$push": { "comments": comment } },
            )
            .await?;
        Ok(result.modified_count)
    }

    async fn delete_by_id(&self, id: BookId) -> Result<u64, StoreError> {
        let result = self
            .books
            .delete_one(doc! { "_id": id.object_id() })
            .await?;
        Ok(result.deleted_count)
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let result = self.books.delete_many(doc! {}).await?;
        Ok(result.deleted_count)
    }
}
