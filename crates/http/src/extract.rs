//! Lenient body extractor.

use std::convert::Infallible;

use axum::{
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, HeaderMap},
    Form, Json,
};
use serde::de::DeserializeOwned;

/// Request body decoded from JSON or an urlencoded form, chosen by
/// `Content-Type`.
///
/// Never rejects: a missing, unsupported or unparseable body yields
/// `T::default()`, so handlers see the fields as absent and answer with
/// their own "missing required field" message.
#[derive(Debug, Clone, Default)]
pub struct Payload<T>(pub T);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Other,
}

impl BodyKind {
    fn of(headers: &HeaderMap) -> Self {
        let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
            return BodyKind::Other;
        };
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if mime == "application/x-www-form-urlencoded" {
            BodyKind::Form
        } else if mime == "application/json" || mime.ends_with("+json") {
            BodyKind::Json
        } else {
            BodyKind::Other
        }
    }
}

impl<S, T> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned + Default + Send,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let parsed = match BodyKind::of(req.headers()) {
            BodyKind::Json => Json::<T>::from_request(req, state)
                .await
                .map(|Json(value)| value)
                .map_err(|rejection| rejection.body_text()),
            BodyKind::Form => Form::<T>::from_request(req, state)
                .await
                .map(|Form(value)| value)
                .map_err(|rejection| rejection.body_text()),
            BodyKind::Other => return Ok(Payload(T::default())),
        };

        match parsed {
            Ok(value) => Ok(Payload(value)),
            Err(reason) => {
                tracing::debug!(%reason, "unreadable request body, treating fields as absent");
                Ok(Payload(T::default()))
            }
        }
    }
}
