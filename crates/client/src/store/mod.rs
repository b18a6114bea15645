//! REST clients for the remote document store.
//!
//! The store is json-server shaped: plain collection endpoints with
//! ad-hoc field-equality filters, create with server-assigned ids, and
//! whole-document replace on `PUT`. No transactions, no partial updates,
//! no optimistic-concurrency tokens.
//!
//! # Endpoints consumed
//!
//! - `GET /users`, `GET /users?email=...`, `GET /users/{id}`
//! - `POST /users`, `PUT /users/{id}`, `DELETE /users/{id}`
//! - `GET /products`, `GET /products/{id}` (read-only)

mod cache;
mod catalog;
mod directory;

pub use catalog::CatalogClient;
pub use directory::UserDirectoryClient;

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors that can occur when talking to the remote store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store has no record at the requested id.
    #[error("not found: {0}")]
    NotFound(String),

    /// The store answered with a non-success status.
    #[error("store returned status {status}")]
    Status {
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// The response body was not the expected JSON.
    #[error("JSON decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Read a response body and decode it, with status handling.
///
/// Takes the body as text first so decode failures and error statuses can
/// be logged with the payload that caused them.
pub(crate) async fn decode_response<T: DeserializeOwned>(
    response: reqwest::Response,
    context: &str,
) -> Result<T, StoreError> {
    let status = response.status();
    let body = response.text().await?;

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(StoreError::NotFound(context.to_owned()));
    }

    if !status.is_success() {
        tracing::error!(
            status = %status,
            context,
            body = %body.chars().take(500).collect::<String>(),
            "store returned non-success status"
        );
        return Err(StoreError::Status {
            status: status.as_u16(),
            body,
        });
    }

    Ok(serde_json::from_str(&body)?)
}

/// Check a response where only the status matters (e.g. `DELETE`).
pub(crate) async fn check_response(
    response: reqwest::Response,
    context: &str,
) -> Result<(), StoreError> {
    let status = response.status();

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(StoreError::NotFound(context.to_owned()));
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::error!(status = %status, context, "store returned non-success status");
        return Err(StoreError::Status {
            status: status.as_u16(),
            body,
        });
    }

    Ok(())
}
