use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use models::driver;
use service::driver_service::{self, DriverCreateForm, DriverDetail, LicenseUpdateForm};
use service::search::{ListPage, ListQuery};

use crate::{errors::{JsonApiError, JsonBody}, routes::auth::ServerState};

#[utoipa::path(
    get, path = "/drivers", tag = "drivers",
    params(crate::openapi::ListParams),
    responses((status = 200, description = "One page of drivers, searched by username"), (status = 302, description = "Login required"))
)]
pub async fn list(
    State(state): State<ServerState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ListPage<driver::Model>>, JsonApiError> {
    Ok(Json(driver_service::list_drivers(&state.db, &ListQuery::from_pairs(pairs)).await?))
}

#[utoipa::path(
    post, path = "/drivers", tag = "drivers",
    request_body = crate::openapi::DriverCreateRequest,
    responses((status = 201, description = "Created; Location is the driver page"), (status = 400, description = "Field errors"))
)]
pub async fn create(State(state): State<ServerState>, WithRejection(Json(form), _): JsonBody<DriverCreateForm>) -> Result<impl IntoResponse, JsonApiError> {
    let created = driver_service::create_driver(&state.db, form).await?;
    let location = created.url.clone();
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(created)))
}

#[utoipa::path(
    get, path = "/drivers/{id}", tag = "drivers",
    params(("id" = Uuid, Path, description = "Driver id")),
    responses((status = 200, description = "Driver with cars and their manufacturers"), (status = 404, description = "Not Found"))
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<DriverDetail>, JsonApiError> {
    Ok(Json(driver_service::get_driver(&state.db, id).await?))
}

#[utoipa::path(
    put, path = "/drivers/{id}", tag = "drivers",
    params(("id" = Uuid, Path, description = "Driver id")),
    request_body = crate::openapi::LicenseUpdateRequest,
    responses((status = 200, description = "License updated"), (status = 400, description = "Field errors"), (status = 404, description = "Not Found"))
)]
pub async fn update_license(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    WithRejection(Json(form), _): JsonBody<LicenseUpdateForm>,
) -> Result<Json<DriverDetail>, JsonApiError> {
    Ok(Json(driver_service::update_license(&state.db, id, form).await?))
}

#[utoipa::path(
    delete, path = "/drivers/{id}", tag = "drivers",
    params(("id" = Uuid, Path, description = "Driver id")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    driver_service::delete_driver(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
