use chrono::{Duration, Utc};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::domain::{AuthDriver, Credentials, SessionRecord};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

fn session_record(s: models::session::Model) -> SessionRecord {
    SessionRecord { id: s.id, driver_id: s.driver_id, expires_at: s.expires_at.with_timezone(&Utc) }
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_driver_by_username(&self, username: &str) -> Result<Option<AuthDriver>, AuthError> {
        let res = models::driver::find_by_username(&self.db, username).await?;
        Ok(res.map(|d| AuthDriver { id: d.id, username: d.username, is_staff: d.is_staff }))
    }

    async fn get_credentials(&self, driver_id: Uuid) -> Result<Option<Credentials>, AuthError> {
        let res = models::driver_credentials::find_by_driver(&self.db, driver_id).await?;
        Ok(res.map(|c| Credentials { driver_id: c.driver_id, password_hash: c.password_hash, password_algorithm: c.password_algorithm }))
    }

    async fn create_session(&self, driver_id: Uuid, ttl: Duration) -> Result<SessionRecord, AuthError> {
        let s = models::session::create(&self.db, driver_id, ttl).await?;
        Ok(session_record(s))
    }

    async fn find_session(&self, session_id: Uuid) -> Result<Option<SessionRecord>, AuthError> {
        let s = models::session::find_active(&self.db, session_id).await?;
        Ok(s.map(session_record))
    }

    async fn delete_session(&self, session_id: Uuid) -> Result<(), AuthError> {
        models::session::delete(&self.db, session_id).await?;
        Ok(())
    }

    async fn purge_expired_sessions(&self) -> Result<u64, AuthError> {
        Ok(models::session::purge_expired(&self.db).await?)
    }
}
