//! # Per-User Navigation Sessions
//!
//! Transient state the bot keeps for each user: the message id of the
//! screen currently shown (so it can be replaced on the next step) and the
//! category the user is browsing. Sessions are created lazily on first
//! interaction, never persisted, and evicted once idle past a TTL.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use teloxide::types::{MessageId, UserId};
use tracing::info;

use crate::catalog::Category;
use crate::periodic::PeriodicTask;

/// How often the sweeper looks for idle sessions.
const SWEEP_PERIOD: Duration = Duration::from_secs(15 * 60);

/// Navigation state for one user.
#[derive(Debug, Clone)]
pub struct Session {
    /// Message id of the screen currently shown, if any.
    pub last_message_id: Option<MessageId>,
    /// Category the user most recently opened, if any.
    pub current_category: Option<Category>,
    /// Last interaction time, used for idle eviction.
    last_seen: Instant,
}

impl Session {
    fn new() -> Self {
        Self {
            last_message_id: None,
            current_category: None,
            last_seen: Instant::now(),
        }
    }
}

/// Table of live sessions keyed by user id.
///
/// Every method takes the lock for one short critical section; callers get
/// values out, never guards.
#[derive(Debug, Default)]
pub struct SessionTable {
    sessions: Mutex<HashMap<UserId, Session>>,
}

impl SessionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the user's session, created on first contact. Refreshes
    /// the idle timestamp.
    pub fn get_or_create(&self, user_id: UserId) -> Session {
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions.entry(user_id).or_insert_with(Session::new);
        session.last_seen = Instant::now();
        session.clone()
    }

    /// Category the user most recently opened.
    pub fn current_category(&self, user_id: UserId) -> Option<Category> {
        self.sessions
            .lock()
            .unwrap()
            .get(&user_id)
            .and_then(|session| session.current_category)
    }

    /// Remember which category the user is browsing.
    pub fn set_category(&self, user_id: UserId, category: Category) {
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions.entry(user_id).or_insert_with(Session::new);
        session.current_category = Some(category);
        session.last_seen = Instant::now();
    }

    /// Track the message id of the screen just sent to the user.
    pub fn set_last_message(&self, user_id: UserId, message_id: MessageId) {
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions.entry(user_id).or_insert_with(Session::new);
        session.last_message_id = Some(message_id);
        session.last_seen = Instant::now();
    }

    /// Take the tracked screen message id, clearing it in the same lock
    /// scope. The caller attempts the deletion afterwards; the cleared
    /// state stands whether or not that deletion succeeds.
    pub fn take_last_message(&self, user_id: UserId) -> Option<MessageId> {
        self.sessions
            .lock()
            .unwrap()
            .get_mut(&user_id)
            .and_then(|session| session.last_message_id.take())
    }

    /// Drop sessions idle for `max_idle` or longer. Returns the number of
    /// evicted sessions.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|_, session| session.last_seen.elapsed() < max_idle);
        before - sessions.len()
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Spawn the background sweeper that evicts sessions idle past `max_idle`.
pub fn spawn_sweeper(sessions: Arc<SessionTable>, max_idle: Duration) -> PeriodicTask {
    PeriodicTask::spawn("session-sweep", SWEEP_PERIOD, move || {
        let sessions = sessions.clone();
        async move {
            let evicted = sessions.evict_idle(max_idle);
            if evicted > 0 {
                info!(evicted, remaining = sessions.len(), "Evicted idle sessions");
            }
        }
    })
}
