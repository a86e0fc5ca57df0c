use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use axum_extra::extract::WithRejection;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use common::query::login_redirect;
use service::auth::{
    domain::LoginInput,
    errors::AuthError,
    repo::seaorm::SeaOrmAuthRepository,
    service::{AuthConfig, AuthService},
};

use crate::errors::{JsonApiError, JsonBody};

pub const AUTH_COOKIE: &str = "auth_token";

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
    pub session_ttl_hours: i64,
    pub login_url: String,
}

impl From<&configs::AuthConfig> for ServerAuthConfig {
    fn from(cfg: &configs::AuthConfig) -> Self {
        Self {
            jwt_secret: cfg.jwt_secret.clone(),
            session_ttl_hours: cfg.session_ttl_hours,
            login_url: cfg.login_url.clone(),
        }
    }
}

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: ServerAuthConfig,
}

impl ServerState {
    pub fn auth_service(&self) -> AuthService<SeaOrmAuthRepository> {
        let repo = Arc::new(SeaOrmAuthRepository { db: self.db.clone() });
        AuthService::new(repo, AuthConfig::new(self.auth.jwt_secret.clone(), self.auth.session_ttl_hours))
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LoginQuery {
    /// where to go after logging in
    pub next: Option<String>,
}

#[derive(Serialize)]
pub struct LoginOutput { pub driver_id: Uuid, pub username: String, pub token: String, pub redirect_to: String }

/// Only local absolute paths are followed after login.
fn safe_next(next: Option<String>) -> String {
    match next {
        Some(n) if n.starts_with('/') && !n.starts_with("//") => n,
        _ => "/".to_string(),
    }
}

/// Bearer header first, then the auth cookie.
fn token_from(headers: &HeaderMap, jar: &CookieJar) -> Option<String> {
    if let Some(h) = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        return h.strip_prefix("Bearer ").map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
    }
    jar.get(AUTH_COOKIE).map(|c| c.value().to_string()).filter(|t| !t.is_empty())
}

#[utoipa::path(post, path = "/accounts/login", tag = "auth", params(LoginQuery), request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged in, cookie set"), (status = 400, description = "Missing username or password"), (status = 401, description = "Invalid credentials")))]
pub async fn login(
    State(state): State<ServerState>,
    Query(q): Query<LoginQuery>,
    jar: CookieJar,
    WithRejection(Json(input), _): JsonBody<LoginInput>,
) -> Result<(CookieJar, Json<LoginOutput>), JsonApiError> {
    let session = state.auth_service().login(input).await.map_err(|e| match e {
        AuthError::Validation(msg) => JsonApiError::new(StatusCode::BAD_REQUEST, "validation failed", Some(msg)),
        AuthError::Unauthorized | AuthError::NotFound => {
            JsonApiError::new(StatusCode::UNAUTHORIZED, "invalid credentials", None)
        }
        other => {
            warn!(code = other.code(), err = %other, "login failed");
            JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal error", None)
        }
    })?;

    let mut cookie = Cookie::new(AUTH_COOKIE, session.token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    let out = LoginOutput {
        driver_id: session.driver.id,
        username: session.driver.username,
        token: session.token,
        redirect_to: safe_next(q.next),
    };
    Ok((jar.add(cookie), Json(out)))
}

#[utoipa::path(post, path = "/accounts/logout", tag = "auth", responses((status = 204, description = "Session ended, cookie cleared")))]
pub async fn logout(State(state): State<ServerState>, headers: HeaderMap, jar: CookieJar) -> (CookieJar, StatusCode) {
    if let Some(token) = token_from(&headers, &jar) {
        if let Err(e) = state.auth_service().logout(&token).await {
            warn!(code = e.code(), err = %e, "logout failed");
        }
    }
    (jar.remove(Cookie::from(AUTH_COOKIE)), StatusCode::NO_CONTENT)
}

/// Route layer for everything behind login. Anonymous or stale callers are
/// sent to the login page with the original path and query as `next`; the
/// resolved `CurrentDriver` is stored in request extensions.
pub async fn require_login(State(state): State<ServerState>, mut req: Request, next: Next) -> Response {
    let jar = CookieJar::from_headers(req.headers());
    let current = match token_from(req.headers(), &jar) {
        Some(token) => state.auth_service().authenticate(&token).await.ok(),
        None => None,
    };
    match current {
        Some(current) => {
            req.extensions_mut().insert(current);
            next.run(req).await
        }
        None => {
            debug!(path = %req.uri().path(), "anonymous request redirected to login");
            redirect_to_login(&state.auth.login_url, req.uri())
        }
    }
}

pub fn redirect_to_login(login_url: &str, uri: &axum::http::Uri) -> Response {
    let location = login_redirect(login_url, uri.path(), uri.query());
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_must_be_a_local_path() {
        assert_eq!(safe_next(Some("/cars?page=2".into())), "/cars?page=2");
        assert_eq!(safe_next(Some("//evil.example".into())), "/");
        assert_eq!(safe_next(Some("https://evil.example".into())), "/");
        assert_eq!(safe_next(None), "/");
    }

    #[test]
    fn bearer_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer abc".parse().unwrap());
        headers.insert(header::COOKIE, "auth_token=xyz".parse().unwrap());
        let jar = CookieJar::from_headers(&headers);
        assert_eq!(token_from(&headers, &jar).as_deref(), Some("abc"));

        headers.remove(header::AUTHORIZATION);
        assert_eq!(token_from(&headers, &jar).as_deref(), Some("xyz"));
    }
}
