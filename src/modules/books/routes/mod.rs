//! HTTP handlers for `/api/books`.
//!
//! Every handler answers `200 OK`; see [`shelf_http::reply`]. Store failures
//! are logged here and folded into the route's canned failure payload.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use shelf_db::{BookId, BookStore, SharedStore, StoreError};
use shelf_http::{Payload, Reply};

use super::models::{
    BookDetail, BookFailure, BookSummary, CreatedBook, NewBook, NewComment,
    COMPLETE_DELETE_SUCCESSFUL, DELETE_SUCCESSFUL,
};

/// Routes relative to the module mount point.
pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route(
            "/",
            get(list_books).post(create_book).delete(delete_all_books),
        )
        .route("/{id}", get(get_book).post(add_comment).delete(delete_book))
        .with_state(store)
}

async fn list_books(State(store): State<SharedStore>) -> Json<Vec<BookSummary>> {
    match store.find_all().await {
        Ok(books) => Json(books.into_iter().map(BookSummary::from).collect()),
        Err(err) => {
            tracing::error!(error = %err, "listing books failed, answering with an empty list");
            Json(Vec::new())
        }
    }
}

async fn create_book(
    State(store): State<SharedStore>,
    Payload(body): Payload<NewBook>,
) -> Reply<CreatedBook> {
    insert(store.as_ref(), body).await.into()
}

async fn delete_all_books(State(store): State<SharedStore>) -> Reply<()> {
    match store.delete_all().await {
        Ok(removed) => tracing::info!(removed, "all books deleted"),
        // Clients are always told the purge succeeded.
        Err(err) => tracing::error!(error = %err, "deleting all books failed"),
    }
    Reply::message(COMPLETE_DELETE_SUCCESSFUL)
}

async fn get_book(
    State(store): State<SharedStore>,
    Path(raw_id): Path<String>,
) -> Reply<BookDetail> {
    find(store.as_ref(), &raw_id).await.into()
}

async fn add_comment(
    State(store): State<SharedStore>,
    Path(raw_id): Path<String>,
    Payload(body): Payload<NewComment>,
) -> Reply<BookDetail> {
    comment_on(store.as_ref(), &raw_id, body).await.into()
}

async fn delete_book(State(store): State<SharedStore>, Path(raw_id): Path<String>) -> Reply<()> {
    match remove(store.as_ref(), &raw_id).await {
        Ok(()) => Reply::message(DELETE_SUCCESSFUL),
        Err(failure) => Reply::message(failure),
    }
}

async fn insert(store: &dyn BookStore, body: NewBook) -> Result<CreatedBook, BookFailure> {
    let title = body.title().ok_or(BookFailure::MissingTitle)?;

    let book = store
        .insert_one(&title)
        .await
        .map_err(|err| logged(BookFailure::MissingTitle, "insert", &err))?;

    tracing::info!(book_id = %book.id, "book created");
    Ok(book.into())
}

async fn find(store: &dyn BookStore, raw_id: &str) -> Result<BookDetail, BookFailure> {
    let id = parse_id(raw_id)?;

    store
        .find_by_id(id)
        .await
        .map_err(|err| logged(BookFailure::NotFound, "find", &err))?
        .map(BookDetail::from)
        .ok_or(BookFailure::NotFound)
}

async fn comment_on(
    store: &dyn BookStore,
    raw_id: &str,
    body: NewComment,
) -> Result<BookDetail, BookFailure> {
    let comment = body.comment().ok_or(BookFailure::MissingComment)?;
    let id = parse_id(raw_id)?;

    let modified = store
        .push_comment(id, &comment)
        .await
        .map_err(|err| logged(BookFailure::NotFound, "push comment", &err))?;
    if modified == 0 {
        return Err(BookFailure::NotFound);
    }
    tracing::info!(book_id = %id, "comment added");

    // The book may have been deleted between the update and this read.
    store
        .find_by_id(id)
        .await
        .map_err(|err| logged(BookFailure::NotFound, "find", &err))?
        .map(BookDetail::from)
        .ok_or(BookFailure::NotFound)
}

async fn remove(store: &dyn BookStore, raw_id: &str) -> Result<(), BookFailure> {
    let id = parse_id(raw_id)?;

    let deleted = store
        .delete_by_id(id)
        .await
        .map_err(|err| logged(BookFailure::NotFound, "delete", &err))?;
    if deleted == 0 {
        return Err(BookFailure::NotFound);
    }

    tracing::info!(book_id = %id, "book deleted");
    Ok(())
}

/// Malformed ids are reported exactly like unknown ones.
fn parse_id(raw_id: &str) -> Result<BookId, BookFailure> {
    raw_id.parse().map_err(|err| {
        tracing::debug!(error = %err, "rejecting book id");
        BookFailure::NotFound
    })
}

fn logged(failure: BookFailure, operation: &'static str, err: &StoreError) -> BookFailure {
    tracing::error!(operation, error = %err, "book store call failed");
    failure
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_db::InMemoryStore;

    #[test]
    fn parse_id_maps_garbage_to_not_found() {
        assert_eq!(parse_id("garbage"), Err(BookFailure::NotFound));
        assert!(parse_id("5f665eb46e296f6b9b6a504d").is_ok());
    }

    #[tokio::test]
    async fn comment_is_checked_before_id() {
        let store = InMemoryStore::new();
        let result = comment_on(&store, "garbage", NewComment::default()).await;
        assert_eq!(result.unwrap_err(), BookFailure::MissingComment);
    }

    #[tokio::test]
    async fn comment_on_malformed_id_is_not_found() {
        let store = InMemoryStore::new();
        let body = NewComment {
            comment: Some("fab".to_string()),
        };
        let result = comment_on(&store, "garbage", body).await;
        assert_eq!(result.unwrap_err(), BookFailure::NotFound);
    }

    #[tokio::test]
    async fn remove_twice_reports_not_found() {
        let store = InMemoryStore::new();
        let book = store.insert_one("Dune").await.unwrap();
        let raw_id = book.id.to_string();

        assert_eq!(remove(&store, &raw_id).await, Ok(()));
        assert_eq!(remove(&store, &raw_id).await, Err(BookFailure::NotFound));
    }
}
