// ABOUTME: Registry of issued admin tokens and revoked token ids
// ABOUTME: Logout revokes a token's jti until it would have expired anyway

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionData {
    pub username: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionData>>>,
    revoked: Arc<RwLock<HashMap<String, i64>>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            revoked: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn create_session(&self, jti: &str, username: &str, issued_at: i64, expires_at: i64) {
        let session_data = SessionData {
            username: username.to_string(),
            issued_at,
            expires_at,
        };

        if let Ok(mut sessions) = self.sessions.write() {
            sessions.insert(jti.to_string(), session_data);
        }
    }

    pub fn get_session(&self, jti: &str) -> Option<SessionData> {
        if let Ok(sessions) = self.sessions.read() {
            sessions.get(jti).cloned()
        } else {
            None
        }
    }

    /// Forgets the session and refuses its token until `expires_at`.
    pub fn revoke(&self, jti: &str, expires_at: i64) {
        if let Ok(mut sessions) = self.sessions.write() {
            sessions.remove(jti);
        }
        if let Ok(mut revoked) = self.revoked.write() {
            revoked.insert(jti.to_string(), expires_at);
        }
    }

    pub fn is_revoked(&self, jti: &str) -> bool {
        self.revoked
            .read()
            .map(|revoked| revoked.contains_key(jti))
            .unwrap_or(false)
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }

    /// Drops sessions and revocations whose tokens expired before `now`.
    pub fn cleanup_expired_sessions(&self, now: i64) {
        if let Ok(mut sessions) = self.sessions.write() {
            sessions.retain(|_, session| session.expires_at > now);
        }
        if let Ok(mut revoked) = self.revoked.write() {
            revoked.retain(|_, expires_at| *expires_at > now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revoke_removes_session() {
        let store = SessionStore::new();
        store.create_session("jti-1", "admin", 100, 200);
        assert_eq!(store.get_session("jti-1").unwrap().username, "admin");

        store.revoke("jti-1", 200);
        assert!(store.get_session("jti-1").is_none());
        assert!(store.is_revoked("jti-1"));
        assert!(!store.is_revoked("jti-2"));
    }

    #[test]
    fn test_cleanup_prunes_expired_entries() {
        let store = SessionStore::new();
        store.create_session("old", "admin", 0, 50);
        store.create_session("fresh", "admin", 0, 500);
        store.revoke("gone", 50);
        store.revoke("kept", 500);

        store.cleanup_expired_sessions(100);

        assert_eq!(store.active_sessions(), 1);
        assert!(store.get_session("fresh").is_some());
        assert!(!store.is_revoked("gone"));
        assert!(store.is_revoked("kept"));
    }
}
