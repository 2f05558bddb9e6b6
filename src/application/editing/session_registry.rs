//! Process-local store of open edit sessions.
//!
//! Each session sits behind its own async mutex: requests against one
//! session run one at a time while other sessions proceed independently.
//! Sessions not used for longer than the idle TTL are treated as gone.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use uuid::Uuid;

use crate::domain::sales::{EditSession, SalesError};

pub type SharedEditSession = Arc<Mutex<EditSession>>;

struct Slot {
  session: SharedEditSession,
  last_seen: Instant,
}

pub struct EditSessionRegistry {
  sessions: RwLock<HashMap<Uuid, Slot>>,
  idle_ttl: Duration,
}

impl EditSessionRegistry {
  pub fn new(idle_ttl: Duration) -> Self {
    Self {
      sessions: RwLock::new(HashMap::new()),
      idle_ttl,
    }
  }

  pub async fn insert(&self, session: EditSession) -> SharedEditSession {
    let id = session.id();
    let shared = Arc::new(Mutex::new(session));
    self.sessions.write().await.insert(
      id,
      Slot {
        session: shared.clone(),
        last_seen: Instant::now(),
      },
    );
    shared
  }

  /// Looks up a live session and marks it as used.
  pub async fn get(&self, id: Uuid) -> Result<SharedEditSession, SalesError> {
    let mut sessions = self.sessions.write().await;
    let now = Instant::now();

    let Some(slot) = sessions.get_mut(&id) else {
      return Err(SalesError::EditSessionNotFound(id));
    };
    if !self.is_expired(slot, now) {
      slot.last_seen = now;
      return Ok(slot.session.clone());
    }

    sessions.remove(&id);
    tracing::debug!(session_id = %id, "Dropped expired edit session");
    Err(SalesError::EditSessionNotFound(id))
  }

  /// Locks a live session for exclusive use.
  ///
  /// Fails with `EditSessionNotFound` when the session was saved, cancelled
  /// or purged while the caller waited for the lock.
  pub async fn lock(&self, id: Uuid) -> Result<OwnedMutexGuard<EditSession>, SalesError> {
    let shared = self.get(id).await?;
    let guard = shared.clone().lock_owned().await;

    let still_registered = self
      .sessions
      .read()
      .await
      .get(&id)
      .is_some_and(|slot| Arc::ptr_eq(&slot.session, &shared));
    if !still_registered {
      return Err(SalesError::EditSessionNotFound(id));
    }
    Ok(guard)
  }

  pub async fn remove(&self, id: Uuid) -> Result<(), SalesError> {
    self
      .sessions
      .write()
      .await
      .remove(&id)
      .map(|_| ())
      .ok_or(SalesError::EditSessionNotFound(id))
  }

  /// Drops every idle session and returns how many were dropped.
  pub async fn purge_expired(&self) -> usize {
    let mut sessions = self.sessions.write().await;
    let now = Instant::now();
    let before = sessions.len();
    sessions.retain(|_, slot| !self.is_expired(slot, now));
    before - sessions.len()
  }

  pub async fn len(&self) -> usize {
    self.sessions.read().await.len()
  }

  pub async fn is_empty(&self) -> bool {
    self.sessions.read().await.is_empty()
  }

  /// Starts a background task purging idle sessions every `interval`.
  pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
    let registry = Arc::clone(self);
    tokio::spawn(async move {
      let mut ticker = tokio::time::interval(interval);
      loop {
        ticker.tick().await;
        let purged = registry.purge_expired().await;
        if purged > 0 {
          tracing::info!(purged, "Purged idle edit sessions");
        }
      }
    })
  }

  fn is_expired(&self, slot: &Slot, now: Instant) -> bool {
    now.duration_since(slot.last_seen) >= self.idle_ttl
  }
}
