//! Response convention for the book routes.
//!
//! Every outcome is answered with `200 OK`. Clients tell success from failure
//! by the payload shape: a JSON object or array on success, a bare JSON
//! string describing what went wrong (or what was done) otherwise.

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Handler result carrying either a data payload or a message string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply<T> {
    Data(T),
    Message(String),
}

impl<T> Reply<T> {
    pub fn message(text: impl fmt::Display) -> Self {
        Reply::Message(text.to_string())
    }
}

impl<T, E: fmt::Display> From<Result<T, E>> for Reply<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Reply::Data(data),
            Err(failure) => Reply::message(failure),
        }
    }
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        match self {
            Reply::Data(data) => (StatusCode::OK, Json(data)).into_response(),
            Reply::Message(text) => (StatusCode::OK, Json(text)).into_response(),
        }
    }
}
