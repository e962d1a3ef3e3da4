use std::sync::RwLock;

use ahash::AHashMap;
use uuid::Uuid;

use crate::error::{ServerError, ServerResult};

/// Session id -> logged-in account
#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: RwLock<AHashMap<String, String>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session for `account` and return its fresh id
    pub fn create(&self, account: &str) -> ServerResult<String> {
        let id = Uuid::new_v4().to_string();
        self.sessions
            .write()
            .map_err(|_| poisoned())?
            .insert(id.clone(), account.to_string());
        Ok(id)
    }

    /// Account bound to a session id
    pub fn find(&self, id: &str) -> ServerResult<Option<String>> {
        Ok(self.sessions.read().map_err(|_| poisoned())?.get(id).cloned())
    }

    /// Close a session; returns whether it existed
    pub fn remove(&self, id: &str) -> ServerResult<bool> {
        Ok(self
            .sessions
            .write()
            .map_err(|_| poisoned())?
            .remove(id)
            .is_some())
    }
}

fn poisoned() -> ServerError {
    ServerError::Handler("session store lock poisoned".to_string())
}
