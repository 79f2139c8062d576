//! In-process book store backed by an async-aware `RwLock`.
//!
//! Documents are kept in insertion order, which is the order `find_all`
//! reports them in.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{Book, BookId, BookStore, StoreError};

#[derive(Debug, Default)]
pub struct InMemoryStore {
    books: RwLock<Vec<Book>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for InMemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn insert_one(&self, title: &str) -> Result<Book, StoreError> {
        let book = Book::new(title);
        self.books.write().await.push(book.clone());
        Ok(book)
    }

    async fn find_all(&self) -> Result<Vec<Book>, StoreError> {
        Ok(self.books.read().await.clone())
    }

    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>, StoreError> {
        let books = self.books.read().await;
        Ok(books.iter().find(|book| book.id == id).cloned())
    }

    async fn push_comment(&self, id: BookId, comment: &str) -> Result<u64, StoreError> {
        let mut books = self.books.write().await;
        match books.iter_mut().find(|book| book.id == id) {
            Some(book) => {
                book.comments.push(comment.to_string());
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_by_id(&self, id: BookId) -> Result<u64, StoreError> {
        let mut books = self.books.write().await;
        let before = books.len();
        books.retain(|book| book.id != id);
        Ok((before - books.len()) as u64)
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let mut books = self.books.write().await;
        let removed = books.len() as u64;
        books.clear();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_then_find_by_id() {
        let store = InMemoryStore::new();
        let created = store.insert_one("Faux Book 1").await.unwrap();

        let found = store.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.title, "Faux Book 1");
        assert!(found.comments.is_empty());
    }

    #[tokio::test]
    async fn find_all_keeps_insertion_order() {
        let store = InMemoryStore::new();
        store.insert_one("first").await.unwrap();
        store.insert_one("second").await.unwrap();
        store.insert_one("third").await.unwrap();

        let titles: Vec<String> = store
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|book| book.title)
            .collect();
        assert_eq!(titles, ["first", "second", "third"]);
    }

    #[tokio::test]
    async fn push_comment_appends_in_order() {
        let store = InMemoryStore::new();
        let book = store.insert_one("Dune").await.unwrap();

        assert_eq!(store.push_comment(book.id, "one").await.unwrap(), 1);
        assert_eq!(store.push_comment(book.id, "two").await.unwrap(), 1);

        let found = store.find_by_id(book.id).await.unwrap().unwrap();
        assert_eq!(found.comments, ["one", "two"]);
    }

    #[tokio::test]
    async fn push_comment_on_unknown_id_modifies_nothing() {
        let store = InMemoryStore::new();
        store.insert_one("Dune").await.unwrap();

        let modified = store
            .push_comment(BookId::generate(), "orphan")
            .await
            .unwrap();
        assert_eq!(modified, 0);
    }

    #[tokio::test]
    async fn delete_by_id_removes_only_that_book() {
        let store = InMemoryStore::new();
        let keep = store.insert_one("keep").await.unwrap();
        let gone = store.insert_one("drop").await.unwrap();

        assert_eq!(store.delete_by_id(gone.id).await.unwrap(), 1);
        assert_eq!(store.delete_by_id(gone.id).await.unwrap(), 0);
        assert!(store.find_by_id(gone.id).await.unwrap().is_none());
        assert!(store.find_by_id(keep.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn delete_all_empties_the_store() {
        let store = InMemoryStore::new();
        store.insert_one("a").await.unwrap();
        store.insert_one("b").await.unwrap();

        assert_eq!(store.delete_all().await.unwrap(), 2);
        assert_eq!(store.delete_all().await.unwrap(), 0);
        assert!(store.find_all().await.unwrap().is_empty());
    }
}
