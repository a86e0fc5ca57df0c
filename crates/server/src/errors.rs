use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::WithRejection;
use models::errors::{FieldErrors, NON_FIELD_ERRORS};
use serde::Serialize;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

/// JSON error body: `{"error": ..., "detail": ..., "fields": {...}}`.
#[derive(Debug, Serialize)]
pub struct JsonApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: impl Into<String>, detail: Option<String>) -> Self {
        Self { status, error: error.into(), detail, fields: None }
    }

    pub fn with_fields(status: StatusCode, error: impl Into<String>, fields: FieldErrors) -> Self {
        Self { status, error: error.into(), detail: None, fields: Some(fields) }
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(fields) => Self::with_fields(StatusCode::BAD_REQUEST, "validation failed", fields),
            ServiceError::Conflict(fields) => Self::with_fields(StatusCode::BAD_REQUEST, "constraint violation", fields),
            ServiceError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, "not found", Some(msg)),
            ServiceError::Unauthenticated => Self::new(StatusCode::UNAUTHORIZED, "authentication required", None),
            ServiceError::Db(msg) | ServiceError::Internal(msg) => {
                error!(error = %msg, "request failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal error", None)
            }
        }
    }
}

/// JSON request body whose parse failures answer like any other form error.
pub type JsonBody<T> = WithRejection<Json<T>, JsonApiError>;

impl From<JsonRejection> for JsonApiError {
    fn from(rejection: JsonRejection) -> Self {
        let fields = FieldErrors::single(NON_FIELD_ERRORS, rejection.body_text());
        Self::with_fields(StatusCode::BAD_REQUEST, "validation failed", fields)
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request_with_fields() {
        let err: JsonApiError = ServiceError::Validation(FieldErrors::single("name", "This field is required.")).into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        let body = serde_json::to_value(&err).unwrap();
        assert_eq!(body["fields"]["name"][0], "This field is required.");
        assert!(body.get("detail").is_none());
    }

    #[test]
    fn db_errors_hide_details() {
        let err: JsonApiError = ServiceError::Db("connection reset".into()).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(serde_json::to_value(&err).unwrap()["error"], "internal error");
    }
}
