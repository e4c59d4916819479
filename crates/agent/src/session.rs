//! Session State Store
//!
//! Per-caller dialogue state, owned by the service and torn down with it.
//!
//! Each caller maps to an entry holding its [`ConversationState`] behind an
//! async mutex. A turn holds that mutex from the moment it reads the pending
//! slot until its reply is built (including any order lookup), so turns for
//! the same caller are serialized while different callers never contend.
//!
//! The store is bounded: entries idle for longer than the idle timeout are
//! evicted by a background task, and inserting a new caller at capacity first
//! evicts expired entries, then the least recently active idle one. Entries in
//! use by a turn are never evicted.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::sync::{watch, MutexGuard};

use support_bot_config::{constants::sessions, SessionConfig};
use support_bot_core::{ConversationState, PendingIntent};

/// Which state slot a message belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SessionKey {
    /// Identified caller (or the shared anonymous sentinel)
    Caller(String),
    /// Anonymous request with its own throwaway state
    Ephemeral,
}

impl SessionKey {
    /// Resolve the key for a caller id; blank ids count as absent
    pub fn resolve(caller_id: Option<&str>, share_anonymous: bool) -> Self {
        match caller_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => Self::Caller(id.to_string()),
            None if share_anonymous => Self::Caller(sessions::ANONYMOUS_KEY.to_string()),
            None => Self::Ephemeral,
        }
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Caller(id) => f.write_str(id),
            Self::Ephemeral => f.write_str("<ephemeral>"),
        }
    }
}

struct SessionEntry {
    state: tokio::sync::Mutex<ConversationState>,
    last_activity: Mutex<Instant>,
}

impl SessionEntry {
    fn new() -> Self {
        Self {
            state: tokio::sync::Mutex::new(ConversationState::new()),
            last_activity: Mutex::new(Instant::now()),
        }
    }

    fn touch(&self) {
        *self.last_activity.lock() = Instant::now();
    }

    fn idle_for(&self) -> Duration {
        self.last_activity.lock().elapsed()
    }
}

/// Checked-out state of one caller
#[derive(Clone)]
pub struct SessionHandle {
    entry: Arc<SessionEntry>,
}

impl SessionHandle {
    fn detached() -> Self {
        Self {
            entry: Arc::new(SessionEntry::new()),
        }
    }

    /// Lock the caller's state for the duration of a turn
    pub async fn lock(&self) -> MutexGuard<'_, ConversationState> {
        self.entry.state.lock().await
    }
}

/// Entry is in use when anything besides the map holds it
fn in_use(entry: &Arc<SessionEntry>) -> bool {
    Arc::strong_count(entry) > 1
}

/// Session State Store
pub struct SessionStore {
    sessions: DashMap<String, Arc<SessionEntry>>,
    max_sessions: usize,
    idle_timeout: Duration,
    cleanup_interval: Duration,
}

impl SessionStore {
    /// Create a store with default timeouts
    pub fn new(max_sessions: usize) -> Self {
        Self::with_config(
            max_sessions,
            Duration::from_secs(sessions::DEFAULT_IDLE_TIMEOUT_SECS),
            Duration::from_secs(sessions::DEFAULT_CLEANUP_INTERVAL_SECS),
        )
    }

    /// Create a store with custom timeout and cleanup interval
    pub fn with_config(
        max_sessions: usize,
        idle_timeout: Duration,
        cleanup_interval: Duration,
    ) -> Self {
        Self {
            sessions: DashMap::new(),
            max_sessions: max_sessions.max(1),
            idle_timeout,
            cleanup_interval,
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::with_config(
            config.max_sessions,
            Duration::from_secs(config.idle_timeout_seconds),
            Duration::from_secs(config.cleanup_interval_seconds),
        )
    }

    /// Start a background task that periodically evicts idle callers.
    ///
    /// Returns a shutdown sender; send `true` to stop the task.
    pub fn start_cleanup_task(self: &Arc<Self>) -> watch::Sender<bool> {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let store = Arc::clone(self);
        let interval = store.cleanup_interval;

        tokio::spawn(async move {
            let mut interval_timer = tokio::time::interval(interval);
            interval_timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = interval_timer.tick() => {
                        let removed = store.cleanup_expired();
                        if removed > 0 {
                            tracing::info!(
                                "Session cleanup: removed {} idle callers ({} remaining)",
                                removed,
                                store.len()
                            );
                        }
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            tracing::info!("Session cleanup task shutting down");
                            break;
                        }
                    }
                }
            }
        });

        shutdown_tx
    }

    /// Get the handle for a key, creating state on first contact.
    ///
    /// Ephemeral keys get a fresh state that is never stored.
    pub fn checkout(&self, key: &SessionKey) -> SessionHandle {
        match key {
            SessionKey::Caller(id) => self.get_or_create(id),
            SessionKey::Ephemeral => SessionHandle::detached(),
        }
    }

    /// Get the handle for a caller, creating `None` state on first contact
    pub fn get_or_create(&self, id: &str) -> SessionHandle {
        if let Some(entry) = self.sessions.get(id) {
            entry.touch();
            return SessionHandle {
                entry: Arc::clone(entry.value()),
            };
        }

        if self.sessions.len() >= self.max_sessions {
            self.make_room();
        }

        let entry = Arc::clone(
            self.sessions
                .entry(id.to_string())
                .or_insert_with(|| {
                    tracing::debug!(caller = %id, "Created conversation state");
                    Arc::new(SessionEntry::new())
                })
                .value(),
        );
        entry.touch();
        SessionHandle { entry }
    }

    /// Open a slot for a caller
    pub async fn set_pending(&self, id: &str, intent: PendingIntent) {
        let handle = self.get_or_create(id);
        handle.lock().await.set_pending(intent);
    }

    /// Close any open slot for a caller
    pub async fn clear_pending(&self, id: &str) {
        let handle = self.get_or_create(id);
        handle.lock().await.clear_pending();
    }

    /// Current slot of a known caller, `None` if the caller is not tracked
    pub async fn pending(&self, id: &str) -> Option<PendingIntent> {
        let entry = self.sessions.get(id).map(|e| Arc::clone(e.value()))?;
        let pending = entry.state.lock().await.pending();
        Some(pending)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sessions.contains_key(id)
    }

    /// Number of tracked callers
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    /// Evict callers idle longer than the idle timeout; returns how many
    pub fn cleanup_expired(&self) -> usize {
        let timeout = self.idle_timeout;
        let before = self.sessions.len();
        self.sessions
            .retain(|_, entry| in_use(entry) || entry.idle_for() <= timeout);
        let removed = before.saturating_sub(self.sessions.len());
        if removed > 0 {
            metrics::counter!("support_bot_sessions_evicted_total", "reason" => "idle")
                .increment(removed as u64);
        }
        removed
    }

    /// Free one slot at capacity: expired entries first, then the least
    /// recently active idle caller
    fn make_room(&self) {
        if self.cleanup_expired() > 0 && self.sessions.len() < self.max_sessions {
            return;
        }

        let oldest = self
            .sessions
            .iter()
            .filter(|e| !in_use(e.value()))
            .max_by_key(|e| e.value().idle_for())
            .map(|e| e.key().clone());

        match oldest {
            Some(id) => {
                if self.sessions.remove_if(&id, |_, e| !in_use(e)).is_some() {
                    metrics::counter!("support_bot_sessions_evicted_total", "reason" => "capacity")
                        .increment(1);
                    tracing::debug!(caller = %id, "Evicted least recently active caller");
                }
            }
            None => {
                tracing::warn!(
                    max = self.max_sessions,
                    "Session store full and every caller is mid-turn; admitting over capacity"
                );
            }
        }
    }
}
