use super::persistence::KeyValueStore;
use crate::domain::{Session, StorageResult, User};

pub const TOKEN_KEY: &str = "authToken";
pub const USER_KEY: &str = "user";

/// Auth token plus cached profile, kept in a [`KeyValueStore`].
///
/// The token and the user are written and cleared together. Token freshness
/// is never checked here; the server rejects stale tokens on next use.
pub struct SessionStore {
    store: Box<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn get(&self) -> Session {
        Session {
            token: self.token(),
            user: self.user(),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY).filter(|token| !token.is_empty())
    }

    pub fn user(&self) -> Option<User> {
        let raw = self.store.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable cached user");
                None
            }
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.token().is_some()
    }

    pub fn set_auth(&mut self, token: &str, user: &User) -> StorageResult<()> {
        let user_json = serde_json::to_string(user)?;
        self.store.set_many(&[(TOKEN_KEY, token), (USER_KEY, &user_json)])
    }

    /// Replaces the cached profile, keeping the token.
    pub fn set_user(&mut self, user: &User) -> StorageResult<()> {
        let user_json = serde_json::to_string(user)?;
        self.store.set(USER_KEY, &user_json)
    }

    pub fn clear(&mut self) -> StorageResult<()> {
        self.store.remove_many(&[TOKEN_KEY, USER_KEY])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::{FileStore, MemoryStore};

    fn amy() -> User {
        User {
            full_name: "Amy".to_string(),
            email: "a@b.com".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_session() {
        let session = SessionStore::new(Box::new(MemoryStore::default()));
        assert!(!session.is_logged_in());
        assert_eq!(session.get(), Session::default());
    }

    #[test]
    fn test_set_auth_and_clear() {
        let mut session = SessionStore::new(Box::new(MemoryStore::default()));
        session.set_auth("T", &amy()).unwrap();

        assert!(session.is_logged_in());
        let stored = session.get();
        assert_eq!(stored.token.as_deref(), Some("T"));
        assert_eq!(stored.user.unwrap().full_name, "Amy");

        session.clear().unwrap();
        assert!(!session.is_logged_in());
        assert_eq!(session.get(), Session::default());
    }

    #[test]
    fn test_corrupt_user_reads_as_absent() {
        let mut store = MemoryStore::default();
        store.set(TOKEN_KEY, "T").unwrap();
        store.set(USER_KEY, "{broken").unwrap();
        let session = SessionStore::new(Box::new(store));

        assert!(session.is_logged_in());
        assert!(session.user().is_none());
    }

    #[test]
    fn test_failed_write_keeps_token_and_user_together() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let mut session = SessionStore::new(Box::new(FileStore::open(&path).unwrap()));
        std::fs::create_dir(&path).unwrap();

        assert!(session.set_auth("T", &amy()).is_err());
        assert!(!session.is_logged_in());
        assert!(session.user().is_none());

        std::fs::remove_dir(&path).unwrap();
        session.set_auth("T", &amy()).unwrap();
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        assert!(session.clear().is_err());
        assert!(session.is_logged_in());
        assert_eq!(session.user(), Some(amy()));
    }

    #[test]
    fn test_session_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut session = SessionStore::new(Box::new(FileStore::open(&path).unwrap()));
        session.set_auth("T", &amy()).unwrap();

        let reloaded = SessionStore::new(Box::new(FileStore::open(&path).unwrap()));
        assert_eq!(reloaded.token().as_deref(), Some("T"));
        assert_eq!(reloaded.user(), Some(amy()));
    }
}
