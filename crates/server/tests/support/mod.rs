#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use service::driver_service::{self, DriverCreateForm};

pub const PASSWORD: &str = "Passw0rd!";

pub struct TestApp {
    pub app: Router,
    pub db: DatabaseConnection,
    pub token: String,
    pub driver_id: Uuid,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers.get(header::LOCATION).and_then(|v| v.to_str().ok())
    }
}

pub fn auth_config() -> configs::AuthConfig {
    configs::AuthConfig { jwt_secret: "test-secret".into(), ..Default::default() }
}

/// Fresh database, one driver `admin` with a password, and a logged-in token for them.
pub async fn spawn_app() -> anyhow::Result<TestApp> {
    let db = models::db::connect_ephemeral().await?;
    let app = server::startup::app(db.clone(), &auth_config());

    let form = DriverCreateForm {
        username: "admin".into(),
        password1: PASSWORD.into(),
        password2: PASSWORD.into(),
        license_number: "ADM00001".into(),
        first_name: "Ada".into(),
        last_name: "Admin".into(),
        email: String::new(),
    };
    let admin = driver_service::create_driver(&db, form).await?;

    let resp = send(&app, json_request("POST", "/accounts/login", None, json!({"username": "admin", "password": PASSWORD}))).await?;
    assert_eq!(resp.status, StatusCode::OK, "login failed: {}", resp.body);
    let token = resp.body["token"].as_str().unwrap_or_default().to_string();
    Ok(TestApp { app, db, token, driver_id: admin.driver.id })
}

pub async fn send(app: &Router, req: Request<Body>) -> anyhow::Result<TestResponse> {
    let resp = app.clone().oneshot(req).await?;
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
    Ok(TestResponse { status, headers, body })
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut b = Request::builder().method("GET").uri(uri);
    if let Some(t) = token {
        b = b.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    b.body(Body::empty()).expect("request")
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut b = Request::builder().method(method).uri(uri).header(header::CONTENT_TYPE, "application/json");
    if let Some(t) = token {
        b = b.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    b.body(Body::from(body.to_string())).expect("request")
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut b = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        b = b.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    b.body(Body::empty()).expect("request")
}
