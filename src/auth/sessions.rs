use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// In-process session store: opaque token → username.
///
/// Sessions live only as long as the process; a restart logs everyone out,
/// which is fine for a single-operator tool.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<String, String>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session for `username` and return the fresh token.
    pub fn create(&self, username: &str) -> String {
        let token = Uuid::new_v4().to_string();
        if let Ok(mut sessions) = self.inner.lock() {
            sessions.insert(token.clone(), username.to_string());
        }
        token
    }

    /// Resolve a token to its username, if the session is live.
    pub fn resolve(&self, token: &str) -> Option<String> {
        self.inner.lock().ok()?.get(token).cloned()
    }

    pub fn revoke(&self, token: &str) {
        if let Ok(mut sessions) = self.inner.lock() {
            sessions.remove(token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_resolve_revoke() {
        let store = SessionStore::new();
        let token = store.create("admin");
        assert_eq!(store.resolve(&token).as_deref(), Some("admin"));

        store.revoke(&token);
        assert_eq!(store.resolve(&token), None);
    }

    #[test]
    fn unknown_token_resolves_to_none() {
        let store = SessionStore::new();
        assert_eq!(store.resolve("bogus"), None);
    }
}
