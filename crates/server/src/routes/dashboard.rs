use axum::{
    extract::State,
    http::Uri,
    response::{IntoResponse, Response},
    Extension, Json,
};

use service::auth::domain::CurrentDriver;
use service::dashboard;
use service::errors::ServiceError;

use crate::{errors::JsonApiError, routes::auth::{redirect_to_login, ServerState}};

#[utoipa::path(
    get, path = "/", tag = "dashboard",
    responses((status = 200, description = "Entity counts and this session's visit number"), (status = 302, description = "Login required"))
)]
pub async fn index(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentDriver>,
    uri: Uri,
) -> Result<Response, JsonApiError> {
    match dashboard::snapshot(&state.db, current.session_id).await {
        Ok(snapshot) => Ok(Json(snapshot).into_response()),
        // session vanished between the login check and here
        Err(ServiceError::Unauthenticated) => Ok(redirect_to_login(&state.auth.login_url, &uri)),
        Err(e) => Err(e.into()),
    }
}
