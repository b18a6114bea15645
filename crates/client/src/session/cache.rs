//! Durable session cache.
//!
//! A single JSON slot on disk holding the current user snapshot, plus an
//! in-process change broadcast. The cache is a passive mirror of the
//! identity session: it survives restarts so a new process (or another
//! session handle over the same file) can resume, but it is never treated
//! as a source of truth.
//!
//! Every session handle allocates an `origin` token and tags its own
//! writes with it; handles skip events carrying their own origin, so
//! notifications are only ever delivered *across* contexts - the same
//! rule browsers apply to storage events between tabs.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tokio::sync::broadcast;

use cartwheel_core::UserRecord;

/// Capacity of the change broadcast; events beyond this lag.
const EVENT_CAPACITY: usize = 16;

/// Errors writing the session slot. Reads never error: a missing or
/// unreadable slot reads as "no session".
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("session cache I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("session cache encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A change to the cached slot, tagged with the writer's origin.
#[derive(Debug, Clone)]
pub struct CacheEvent {
    /// Token of the session handle that wrote the slot.
    pub origin: u64,
    /// The new slot value; `None` means the slot was cleared.
    pub user: Option<UserRecord>,
}

/// Durable single-slot store for the current user snapshot.
#[derive(Clone)]
pub struct SessionCache {
    inner: Arc<CacheInner>,
}

struct CacheInner {
    path: PathBuf,
    events: broadcast::Sender<CacheEvent>,
    origins: AtomicU64,
}

impl SessionCache {
    /// Create a cache over the given slot path. The file need not exist.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(CacheInner {
                path: path.into(),
                events,
                origins: AtomicU64::new(0),
            }),
        }
    }

    /// Allocate a fresh origin token for a session handle.
    pub fn allocate_origin(&self) -> u64 {
        self.inner.origins.fetch_add(1, Ordering::Relaxed)
    }

    /// Read the cached snapshot.
    ///
    /// Tolerant by contract: a missing slot, an unreadable file, or
    /// invalid JSON all read as `None` rather than an error.
    #[must_use]
    pub fn get(&self) -> Option<UserRecord> {
        let data = fs::read_to_string(&self.inner.path).ok()?;
        match serde_json::from_str(&data) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(
                    path = %self.inner.path.display(),
                    error = %e,
                    "ignoring invalid session cache contents"
                );
                None
            }
        }
    }

    /// Write the snapshot and notify other contexts.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the slot cannot be written.
    pub fn save(&self, origin: u64, user: &UserRecord) -> Result<(), CacheError> {
        if let Some(parent) = self.inner.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.inner.path, serde_json::to_vec(user)?)?;

        let _ = self.inner.events.send(CacheEvent {
            origin,
            user: Some(user.clone()),
        });
        Ok(())
    }

    /// Clear the slot and notify other contexts. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the slot exists but cannot be removed.
    pub fn remove(&self, origin: u64) -> Result<(), CacheError> {
        match fs::remove_file(&self.inner.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let _ = self.inner.events.send(CacheEvent { origin, user: None });
        Ok(())
    }

    /// Subscribe to slot changes (all origins; filter on delivery).
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.inner.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use cartwheel_core::{Email, Role, UserId};

    use super::*;

    fn user() -> UserRecord {
        UserRecord {
            id: UserId::new("u1"),
            name: "Asha".to_owned(),
            email: Email::parse("asha@example.com").unwrap(),
            password: "secret12".to_owned(),
            role: Role::User,
            is_block: false,
            created_at: Utc::now(),
            cart: Vec::new(),
            wishlist: Vec::new(),
            orders: Vec::new(),
        }
    }

    #[test]
    fn test_missing_slot_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SessionCache::new(dir.path().join("session.json"));
        assert!(cache.get().is_none());
    }

    #[test]
    fn test_invalid_contents_read_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "undefined").unwrap();

        let cache = SessionCache::new(path);
        assert!(cache.get().is_none());
    }

    #[test]
    fn test_save_get_remove_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SessionCache::new(dir.path().join("session.json"));
        let origin = cache.allocate_origin();

        cache.save(origin, &user()).unwrap();
        assert_eq!(cache.get().unwrap().id, UserId::new("u1"));

        cache.remove(origin).unwrap();
        assert!(cache.get().is_none());
        // Removing an already-clear slot is fine.
        cache.remove(origin).unwrap();
    }

    #[tokio::test]
    async fn test_events_carry_origin() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SessionCache::new(dir.path().join("session.json"));
        let writer = cache.allocate_origin();
        let mut rx = cache.subscribe();

        cache.save(writer, &user()).unwrap();
        let event = rx.recv().await.unwrap();
        assert_eq!(event.origin, writer);
        assert!(event.user.is_some());

        cache.remove(writer).unwrap();
        let event = rx.recv().await.unwrap();
        assert!(event.user.is_none());
    }
}
