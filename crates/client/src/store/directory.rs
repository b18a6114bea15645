//! User directory client.
//!
//! Query, create, and replace operations against the remote user
//! collection. `replace` is the only write primitive the ledgers have:
//! the whole document goes over the wire every time, and the last writer
//! wins on the whole document.

use cartwheel_core::{Email, NewUserRecord, UserId, UserRecord};

use crate::config::ClientConfig;

use super::{StoreError, check_response, decode_response};

/// Client for the remote user collection.
#[derive(Debug, Clone)]
pub struct UserDirectoryClient {
    client: reqwest::Client,
    base: String,
}

impl UserDirectoryClient {
    /// Create a new directory client.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base: config.endpoint_base(),
        }
    }

    /// Fetch the full user collection.
    ///
    /// Used by admin flows and by the duplicate-email pre-check; there is
    /// no pagination in the store's contract.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the request or decode fails.
    pub async fn list(&self) -> Result<Vec<UserRecord>, StoreError> {
        let response = self
            .client
            .get(format!("{}/users", self.base))
            .send()
            .await?;
        decode_response(response, "users").await
    }

    /// Fetch the records whose email equals the given one.
    ///
    /// The store has no unique constraint on emails, so this can return
    /// more than one record; login uses the first match.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the request or decode fails.
    pub async fn find_by_email(&self, email: &Email) -> Result<Vec<UserRecord>, StoreError> {
        let response = self
            .client
            .get(format!("{}/users", self.base))
            .query(&[("email", email.as_str())])
            .send()
            .await?;
        decode_response(response, email.as_str()).await
    }

    /// Fetch a single record by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no record has this id.
    pub async fn get(&self, id: &UserId) -> Result<UserRecord, StoreError> {
        let response = self
            .client
            .get(format!("{}/users/{id}", self.base))
            .send()
            .await?;
        decode_response(response, id.as_str()).await
    }

    /// Create a record; the store assigns the id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the request or decode fails.
    pub async fn create(&self, user: &NewUserRecord) -> Result<UserRecord, StoreError> {
        let response = self
            .client
            .post(format!("{}/users", self.base))
            .json(user)
            .send()
            .await?;
        decode_response(response, user.email.as_str()).await
    }

    /// Replace a record whole. Response is the stored document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the record vanished, or any
    /// other [`StoreError`] on request/decode failure.
    pub async fn replace(&self, user: &UserRecord) -> Result<UserRecord, StoreError> {
        let response = self
            .client
            .put(format!("{}/users/{}", self.base, user.id))
            .json(user)
            .send()
            .await?;
        decode_response(response, user.id.as_str()).await
    }

    /// Delete a record (admin user management only; the ledgers never
    /// delete documents).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no record has this id.
    pub async fn delete(&self, id: &UserId) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(format!("{}/users/{id}", self.base))
            .send()
            .await?;
        check_response(response, id.as_str()).await
    }
}
