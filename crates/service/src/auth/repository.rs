use async_trait::async_trait;
use chrono::Duration;
use uuid::Uuid;

use super::domain::{AuthDriver, Credentials, SessionRecord};
use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_driver_by_username(&self, username: &str) -> Result<Option<AuthDriver>, AuthError>;
    async fn get_credentials(&self, driver_id: Uuid) -> Result<Option<Credentials>, AuthError>;

    async fn create_session(&self, driver_id: Uuid, ttl: Duration) -> Result<SessionRecord, AuthError>;
    /// Only sessions that have not expired.
    async fn find_session(&self, session_id: Uuid) -> Result<Option<SessionRecord>, AuthError>;
    async fn delete_session(&self, session_id: Uuid) -> Result<(), AuthError>;
    /// Drop every expired session, returning how many went.
    async fn purge_expired_sessions(&self) -> Result<u64, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Mutex, MutexGuard};

    use chrono::Utc;

    #[derive(Default)]
    pub struct MockAuthRepository {
        drivers: Mutex<HashMap<String, AuthDriver>>, // key: username
        creds: Mutex<HashMap<Uuid, Credentials>>,    // key: driver_id
        sessions: Mutex<HashMap<Uuid, SessionRecord>>,
    }

    fn lock<T>(m: &Mutex<T>) -> Result<MutexGuard<'_, T>, AuthError> {
        m.lock().map_err(|_| AuthError::Repository("mock lock poisoned".into()))
    }

    impl MockAuthRepository {
        /// Seed a driver with an already hashed password.
        pub fn insert_driver(&self, username: &str, password_hash: String) -> Result<AuthDriver, AuthError> {
            let driver = AuthDriver { id: Uuid::new_v4(), username: username.to_string(), is_staff: false };
            lock(&self.drivers)?.insert(username.to_string(), driver.clone());
            let c = Credentials { driver_id: driver.id, password_hash, password_algorithm: "argon2".into() };
            lock(&self.creds)?.insert(driver.id, c);
            Ok(driver)
        }

        pub fn session_count(&self) -> usize {
            self.sessions.lock().map(|s| s.len()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_driver_by_username(&self, username: &str) -> Result<Option<AuthDriver>, AuthError> {
            Ok(lock(&self.drivers)?.get(username).cloned())
        }

        async fn get_credentials(&self, driver_id: Uuid) -> Result<Option<Credentials>, AuthError> {
            Ok(lock(&self.creds)?.get(&driver_id).cloned())
        }

        async fn create_session(&self, driver_id: Uuid, ttl: Duration) -> Result<SessionRecord, AuthError> {
            let s = SessionRecord { id: Uuid::new_v4(), driver_id, expires_at: Utc::now() + ttl };
            lock(&self.sessions)?.insert(s.id, s.clone());
            Ok(s)
        }

        async fn find_session(&self, session_id: Uuid) -> Result<Option<SessionRecord>, AuthError> {
            let sessions = lock(&self.sessions)?;
            Ok(sessions.get(&session_id).filter(|s| s.expires_at > Utc::now()).cloned())
        }

        async fn delete_session(&self, session_id: Uuid) -> Result<(), AuthError> {
            lock(&self.sessions)?.remove(&session_id);
            Ok(())
        }

        async fn purge_expired_sessions(&self) -> Result<u64, AuthError> {
            let mut sessions = lock(&self.sessions)?;
            let before = sessions.len();
            let now = Utc::now();
            sessions.retain(|_, s| s.expires_at > now);
            Ok((before - sessions.len()) as u64)
        }
    }
}
