use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::domain::{AuthSession, Claims, CurrentDriver, LoginInput};
use super::errors::AuthError;
use super::password;
use super::repository::AuthRepository;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub session_ttl: Duration,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>, session_ttl_hours: i64) -> Self {
        Self { jwt_secret: jwt_secret.into(), session_ttl: Duration::hours(session_ttl_hours) }
    }
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Check the password, open a session and issue a token that points at it.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::{domain::LoginInput, password::hash_password};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// repo.insert_driver("john", hash_password("Passw0rd").unwrap()).unwrap();
    /// let svc = AuthService::new(repo, AuthConfig::new("secret", 12));
    /// let session = tokio_test::block_on(svc.login(LoginInput { username: "john".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.driver.username, "john");
    /// assert!(!session.token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        if input.username.trim().is_empty() || input.password.is_empty() {
            return Err(AuthError::Validation("username and password are required".into()));
        }
        let driver = self.repo
            .find_driver_by_username(input.username.trim())
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let cred = self.repo
            .get_credentials(driver.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        if !password::verify_password(&input.password, &cred.password_hash)? {
            debug!(driver_id = %driver.id, "password mismatch");
            return Err(AuthError::Unauthorized);
        }

        let purged = self.repo.purge_expired_sessions().await?;
        if purged > 0 {
            debug!(purged, "expired sessions removed");
        }
        let session = self.repo.create_session(driver.id, self.cfg.session_ttl).await?;
        let claims = Claims {
            sub: driver.username.clone(),
            uid: driver.id.to_string(),
            sid: session.id.to_string(),
            exp: session.expires_at.timestamp().max(0) as usize,
        };
        let token = encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()))
            .map_err(|e| AuthError::TokenError(e.to_string()))?;

        info!(driver_id = %driver.id, session_id = %session.id, "driver_logged_in");
        Ok(AuthSession { driver, session_id: session.id, token, expires_at: session.expires_at })
    }

    /// Resolve a token to the driver and live session it names.
    pub async fn authenticate(&self, token: &str) -> Result<CurrentDriver, AuthError> {
        let claims = self.decode_claims(token)?;
        let (driver_id, session_id) = match (Uuid::parse_str(&claims.uid), Uuid::parse_str(&claims.sid)) {
            (Ok(d), Ok(s)) => (d, s),
            _ => return Err(AuthError::TokenError("malformed subject ids".into())),
        };
        match self.repo.find_session(session_id).await? {
            Some(s) if s.driver_id == driver_id => Ok(CurrentDriver { driver_id, session_id }),
            _ => Err(AuthError::Unauthorized),
        }
    }

    /// End the session behind `token`. Unknown or invalid tokens are ignored.
    #[instrument(skip(self, token))]
    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        let Ok(claims) = self.decode_claims(token) else { return Ok(()) };
        if let Ok(session_id) = Uuid::parse_str(&claims.sid) {
            self.repo.delete_session(session_id).await?;
            info!(session_id = %session_id, "driver_logged_out");
        }
        Ok(())
    }

    fn decode_claims(&self, token: &str) -> Result<Claims, AuthError> {
        let key = DecodingKey::from_secret(self.cfg.jwt_secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        decode::<Claims>(token, &key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                warn!(err = %e, "token validation failed");
                AuthError::TokenError(e.to_string())
            })
    }
}
