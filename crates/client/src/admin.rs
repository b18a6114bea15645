//! Admin flows over other users' documents.
//!
//! Orders live inside their owner's `UserRecord`, so every admin
//! operation is: scan the user collection, locate the owning document,
//! rewrite the one field, and replace that user's document whole. The
//! admin's own session is never involved.

use thiserror::Error;

use cartwheel_core::{Email, Order, OrderStatus, UserId, UserRecord};

use crate::store::{StoreError, UserDirectoryClient};

/// Errors raised by admin flows.
#[derive(Debug, Error)]
pub enum AdminError {
    /// No user's history contains the target order.
    #[error("no user owns order {0}")]
    RecordNotFound(String),

    /// The directory call failed.
    #[error("user directory error: {0}")]
    Directory(#[from] StoreError),
}

/// One order joined with its owner's identity, for the admin feed.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order: Order,
    pub user_id: UserId,
    pub user_name: String,
    pub user_email: Email,
}

/// Admin console client.
#[derive(Debug, Clone)]
pub struct AdminClient {
    directory: UserDirectoryClient,
}

impl AdminClient {
    /// Create an admin client.
    #[must_use]
    pub const fn new(directory: UserDirectoryClient) -> Self {
        Self { directory }
    }

    /// The full user collection.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Directory`] on store failure.
    pub async fn list_users(&self) -> Result<Vec<UserRecord>, AdminError> {
        Ok(self.directory.list().await?)
    }

    /// Every order across every user, newest first, each joined with its
    /// owner's identity.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Directory`] on store failure.
    pub async fn all_orders(&self) -> Result<Vec<PlacedOrder>, AdminError> {
        let users = self.directory.list().await?;

        let mut rows: Vec<PlacedOrder> = users
            .into_iter()
            .flat_map(|user| {
                let user_id = user.id;
                let user_name = user.name;
                let user_email = user.email;
                user.orders.into_iter().map(move |order| PlacedOrder {
                    order,
                    user_id: user_id.clone(),
                    user_name: user_name.clone(),
                    user_email: user_email.clone(),
                })
            })
            .collect();

        rows.sort_by(|a, b| b.order.created_at.cmp(&a.order.created_at));
        Ok(rows)
    }

    /// Set the status of one order, wherever it lives.
    ///
    /// Any status may be set from any other status - the lack of a
    /// transition graph is the manual-override capability support staff
    /// rely on. Only the matching order's status changes; every other
    /// field of the owner's document is written back as read.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::RecordNotFound`] if no user owns the order,
    /// or [`AdminError::Directory`] on store failure.
    pub async fn update_order_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<Order, AdminError> {
        let users = self.directory.list().await?;
        let Some(mut owner) = users
            .into_iter()
            .find(|u| u.orders.iter().any(|o| o.order_id == order_id))
        else {
            return Err(AdminError::RecordNotFound(order_id.to_owned()));
        };

        for order in &mut owner.orders {
            if order.order_id == order_id {
                order.order_status = status;
            }
        }

        let stored = self.directory.replace(&owner).await?;
        tracing::info!(order = order_id, %status, user = %stored.id, "order status updated");

        stored
            .orders
            .into_iter()
            .find(|o| o.order_id == order_id)
            .ok_or_else(|| AdminError::RecordNotFound(order_id.to_owned()))
    }

    /// Block or unblock an account. A blocked account fails login, and
    /// any live session for it is logged out by its suspension watch
    /// within one polling interval.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Directory`] on store failure (including
    /// not-found).
    pub async fn set_blocked(
        &self,
        user_id: &UserId,
        blocked: bool,
    ) -> Result<UserRecord, AdminError> {
        let mut user = self.directory.get(user_id).await?;
        user.is_block = blocked;
        let stored = self.directory.replace(&user).await?;
        tracing::info!(user = %user_id, blocked, "account block flag updated");
        Ok(stored)
    }

    /// Delete an account's document outright.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Directory`] on store failure.
    pub async fn delete_user(&self, user_id: &UserId) -> Result<(), AdminError> {
        self.directory.delete(user_id).await?;
        tracing::info!(user = %user_id, "account deleted");
        Ok(())
    }
}
