//! Identity session: the authoritative holder of "who is signed in".
//!
//! The session owns the in-memory `UserRecord` snapshot for the active
//! account. Everything else derives from it: the ledgers re-derive their
//! working lists whenever the snapshot changes (via [`IdentitySession::subscribe`]),
//! and the durable [`SessionCache`] mirrors it across restarts and
//! contexts.
//!
//! Two background tasks run per session handle:
//!
//! - the **suspension watch**: while a user is active, their record is
//!   re-fetched on a fixed interval; if an admin has set `isBlock`, the
//!   session force-logs-out and emits [`SessionEvent::Suspended`]. Fetch
//!   failures are logged and swallowed - a flaky network must not log
//!   anyone out.
//! - the **cache listener**: mirrors slot changes made by *other*
//!   contexts (another handle logging in or out over the same cache).
//!
//! Both tasks hold only a weak reference to the session and stop when it
//! is dropped, so repeated login/logout cycles do not accumulate timers.

mod cache;

pub use cache::{CacheError, CacheEvent, SessionCache};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use cartwheel_core::{Email, NewUserRecord, UserRecord};

use crate::config::ClientConfig;
use crate::store::{StoreError, UserDirectoryClient};

/// Capacity of the side-event broadcast.
const EVENT_CAPACITY: usize = 16;

/// Errors raised by register and login.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A record with this email already exists (advisory pre-check; the
    /// store itself enforces nothing).
    #[error("an account with this email already exists")]
    DuplicateAccount,

    /// No record matches this email.
    #[error("no account found for this email")]
    AccountNotFound,

    /// The stored password does not match.
    #[error("password is incorrect")]
    InvalidCredentials,

    /// The account is blocked server-side.
    #[error("this account has been blocked by an admin")]
    AccountSuspended,

    /// The directory call itself failed.
    #[error("user directory error: {0}")]
    Directory(#[from] StoreError),
}

/// Side events for the UI layer (toasts, redirects). The snapshot itself
/// travels on the watch channel from [`IdentitySession::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn,
    SignedOut,
    /// The suspension watch found `isBlock` set and forced a logout.
    Suspended,
}

/// Cloneable handle to the session state.
///
/// Construct one per context (the browser-tab analogue); handles sharing
/// a [`SessionCache`] mirror each other's sign-ins and sign-outs.
/// Requires a tokio runtime (background tasks are spawned on creation).
#[derive(Clone)]
pub struct IdentitySession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    directory: UserDirectoryClient,
    cache: SessionCache,
    origin: u64,
    poll_interval: Duration,
    current: watch::Sender<Option<UserRecord>>,
    events: broadcast::Sender<SessionEvent>,
    watcher: Mutex<Option<JoinHandle<()>>>,
}

impl IdentitySession {
    /// Create a session over a directory client and a cache slot.
    ///
    /// If the cache already holds a snapshot (a previous context signed
    /// in), the session resumes it and the suspension watch starts
    /// immediately.
    #[must_use]
    pub fn new(
        directory: UserDirectoryClient,
        cache: SessionCache,
        poll_interval: Duration,
    ) -> Self {
        let origin = cache.allocate_origin();
        let initial = cache.get();
        let (current, _) = watch::channel(initial);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        let session = Self {
            inner: Arc::new(SessionInner {
                directory,
                cache,
                origin,
                poll_interval,
                current,
                events,
                watcher: Mutex::new(None),
            }),
        };

        if session.current_user().is_some() {
            SessionInner::spawn_watcher(&session.inner);
        }
        session.spawn_cache_listener();
        session
    }

    /// Convenience constructor from a [`ClientConfig`].
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            UserDirectoryClient::new(config),
            SessionCache::new(config.session_file.clone()),
            config.poll_interval,
        )
    }

    /// The current snapshot, if a user is signed in.
    #[must_use]
    pub fn current_user(&self) -> Option<UserRecord> {
        self.inner.current.borrow().clone()
    }

    /// Subscribe to snapshot changes. Ledgers re-derive from this.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<UserRecord>> {
        self.inner.current.subscribe()
    }

    /// Subscribe to side events (sign-in, sign-out, suspension).
    #[must_use]
    pub fn events(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    /// Register a new account and activate it.
    ///
    /// The duplicate check is a query-then-create: two registrations
    /// racing on the same email can both pass the check, because the
    /// store has no unique constraint to catch the second create.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::DuplicateAccount`] if a record with this
    /// email already exists, or [`AuthError::Directory`] on store
    /// failure.
    pub async fn register(
        &self,
        name: &str,
        email: &Email,
        password: &str,
    ) -> Result<UserRecord, AuthError> {
        let existing = self.inner.directory.find_by_email(email).await?;
        if !existing.is_empty() {
            return Err(AuthError::DuplicateAccount);
        }

        let record = NewUserRecord::registration(name, email.clone(), password);
        let created = self.inner.directory.create(&record).await?;

        tracing::info!(user = %created.id, "account created");
        self.activate(created.clone());
        Ok(created)
    }

    /// Log in with an email and password.
    ///
    /// On success the record is re-fetched by id so the session starts
    /// from the freshest copy, then activated.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::AccountNotFound`], [`AuthError::InvalidCredentials`],
    /// or [`AuthError::AccountSuspended`] per the credential checks, or
    /// [`AuthError::Directory`] on store failure.
    pub async fn login(&self, email: &Email, password: &str) -> Result<UserRecord, AuthError> {
        let matches = self.inner.directory.find_by_email(email).await?;
        let Some(found) = matches.into_iter().next() else {
            return Err(AuthError::AccountNotFound);
        };

        if found.password != password {
            return Err(AuthError::InvalidCredentials);
        }

        if found.is_block {
            return Err(AuthError::AccountSuspended);
        }

        let fresh = self.inner.directory.get(&found.id).await?;

        tracing::info!(user = %fresh.id, role = ?fresh.role, "logged in");
        self.activate(fresh.clone());
        Ok(fresh)
    }

    /// Clear the session. Idempotent; emits [`SessionEvent::SignedOut`]
    /// only when a user was actually signed in.
    pub fn logout(&self) {
        self.inner.stop_watcher();

        let had_user = self.inner.current.send_replace(None).is_some();
        if had_user {
            if let Err(e) = self.inner.cache.remove(self.inner.origin) {
                tracing::warn!(error = %e, "failed to clear session cache");
            }
            let _ = self.inner.events.send(SessionEvent::SignedOut);
            tracing::info!("logged out");
        }
    }

    /// Push a server-confirmed snapshot back into the session.
    ///
    /// The resync entry point for the ledgers: call this only with the
    /// record the store returned from a confirmed persist, never with a
    /// locally-mutated copy.
    pub fn apply_update(&self, user: UserRecord) {
        if let Err(e) = self.inner.cache.save(self.inner.origin, &user) {
            tracing::warn!(error = %e, "failed to mirror snapshot to session cache");
        }
        self.inner.current.send_replace(Some(user));
    }

    /// Activate a freshly fetched record: snapshot, cache, watch, event.
    fn activate(&self, user: UserRecord) {
        self.inner.stop_watcher();

        if let Err(e) = self.inner.cache.save(self.inner.origin, &user) {
            tracing::warn!(error = %e, "failed to mirror snapshot to session cache");
        }
        self.inner.current.send_replace(Some(user));

        SessionInner::spawn_watcher(&self.inner);
        let _ = self.inner.events.send(SessionEvent::SignedIn);
    }

    /// Mirror slot changes made by other contexts over the same cache.
    fn spawn_cache_listener(&self) {
        let weak = Arc::downgrade(&self.inner);
        let mut rx = self.inner.cache.subscribe();

        tokio::spawn(async move {
            loop {
                let event = match rx.recv().await {
                    Ok(event) => event,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "session cache events lagged");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => return,
                };

                let Some(inner) = weak.upgrade() else { return };
                if event.origin == inner.origin {
                    continue;
                }

                match event.user {
                    Some(user) => {
                        tracing::debug!(user = %user.id, "adopting session from another context");
                        let was_inactive = inner.current.borrow().is_none();
                        inner.current.send_replace(Some(user));
                        if was_inactive {
                            SessionInner::spawn_watcher(&inner);
                        }
                    }
                    None => {
                        tracing::debug!("another context signed out; mirroring");
                        inner.stop_watcher();
                        inner.current.send_replace(None);
                        let _ = inner.events.send(SessionEvent::SignedOut);
                    }
                }
            }
        });
    }
}

impl SessionInner {
    fn watcher_slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.watcher.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn stop_watcher(&self) {
        if let Some(handle) = self.watcher_slot().take() {
            handle.abort();
        }
    }

    /// Start the suspension watch for the currently active user.
    ///
    /// The first check runs immediately, then every `poll_interval`. The
    /// task exits on its own when the session empties or is suspended.
    fn spawn_watcher(inner: &Arc<Self>) {
        let weak = Arc::downgrade(inner);
        let poll_interval = inner.poll_interval;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let Some(inner) = weak.upgrade() else { return };
                let Some(id) = inner.current.borrow().as_ref().map(|u| u.id.clone()) else {
                    return;
                };

                match inner.directory.get(&id).await {
                    Ok(fresh) if fresh.is_block => {
                        tracing::info!(user = %id, "account blocked server-side, forcing logout");
                        inner.current.send_replace(None);
                        if let Err(e) = inner.cache.remove(inner.origin) {
                            tracing::warn!(error = %e, "failed to clear session cache");
                        }
                        let _ = inner.events.send(SessionEvent::Suspended);
                        // Drop our own handle without aborting ourselves.
                        drop(inner.watcher_slot().take());
                        return;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        // Availability over freshness: never log out on a
                        // failed check.
                        tracing::warn!(user = %id, error = %e, "user status check failed");
                    }
                }
            }
        });

        if let Some(old) = inner.watcher_slot().replace(handle) {
            old.abort();
        }
    }
}

impl Drop for SessionInner {
    fn drop(&mut self) {
        if let Ok(mut slot) = self.watcher.lock()
            && let Some(handle) = slot.take()
        {
            handle.abort();
        }
    }
}
