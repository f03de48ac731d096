use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use crate::models::users::Role;

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session_id";

/// Resolved identity behind a session token.
#[derive(Debug, Clone)]
pub struct SessionData {
    pub user_id: i32,
    pub username: String,
    pub role: Role,
}

/// Server-side session store: opaque UUIDv4 token -> identity + role.
/// Injected as `web::Data` so nothing holds it as a process-wide global.
/// The lock is never held across an await point.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionData>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new session and return its token.
    pub fn create(&self, user_id: i32, username: &str, role: Role) -> String {
        let token = Uuid::new_v4().to_string();
        let data = SessionData {
            user_id,
            username: username.to_string(),
            role,
        };
        self.sessions
            .write()
            .expect("session store lock poisoned")
            .insert(token.clone(), data);
        token
    }

    pub fn get(&self, token: &str) -> Option<SessionData> {
        self.sessions
            .read()
            .expect("session store lock poisoned")
            .get(token)
            .cloned()
    }

    /// Remove one session (logout). Returns the identity it carried, if any.
    pub fn remove(&self, token: &str) -> Option<SessionData> {
        self.sessions
            .write()
            .expect("session store lock poisoned")
            .remove(token)
    }

    /// Revoke every session of a user (account deletion).
    pub fn remove_user(&self, user_id: i32) {
        self.sessions
            .write()
            .expect("session store lock poisoned")
            .retain(|_, data| data.user_id != user_id);
    }
}
