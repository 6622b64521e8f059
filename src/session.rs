use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;
use rand::RngCore;
use tracing::{debug, info};

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "blog_session";

/// How long a session lives before the sweep may remove it.
pub const SESSION_LIFETIME: TimeDelta = TimeDelta::hours(1);

#[derive(Clone, Debug)]
pub struct Session {
    pub created_at: DateTime<Utc>,
}

/// In-memory bearer tokens for the admin console. Lost on restart.
///
/// Expiry is enforced only by [`SessionRegistry::sweep`]; a token past its
/// lifetime stays valid until the next sweep runs.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, Session>>,
    lifetime: TimeDelta,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(SESSION_LIFETIME)
    }
}

impl SessionRegistry {
    pub fn new(lifetime: TimeDelta) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            lifetime,
        }
    }

    /// Start a session and return its token: 256 random bits, hex-encoded.
    pub fn create(&self) -> String {
        self.create_at(Utc::now())
    }

    pub fn create_at(&self, created_at: DateTime<Utc>) -> String {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let token = hex::encode(bytes);
        self.sessions.lock().insert(token.clone(), Session { created_at });
        debug!("session created");
        token
    }

    /// Presence only; age is not checked here.
    pub fn validate(&self, token: &str) -> bool {
        self.sessions.lock().contains_key(token)
    }

    /// Remove a session. Unknown tokens are ignored.
    pub fn destroy(&self, token: &str) {
        if self.sessions.lock().remove(token).is_some() {
            debug!("session destroyed");
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every session older than the lifetime. Returns how many went.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Utc::now())
    }

    pub fn sweep_at(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.lock();
        let before = sessions.len();
        sessions.retain(|_, s| now - s.created_at <= self.lifetime);
        before - sessions.len()
    }
}

/// Sweep `registry` every `interval` for as long as the runtime lives.
pub fn start_sweep_task(
    registry: Arc<SessionRegistry>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let removed = registry.sweep();
            if removed > 0 {
                info!(removed, "expired sessions swept");
            }
        }
    })
}
