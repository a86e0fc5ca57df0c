use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use models::manufacturer;
use service::manufacturer_service::{self, ManufacturerInput};
use service::search::{ListPage, ListQuery};

use crate::{errors::{JsonApiError, JsonBody}, routes::auth::ServerState};

#[utoipa::path(
    get, path = "/manufacturers", tag = "manufacturers",
    params(crate::openapi::ListParams),
    responses((status = 200, description = "One page of manufacturers, searched by name"), (status = 302, description = "Login required"))
)]
pub async fn list(
    State(state): State<ServerState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ListPage<manufacturer::Model>>, JsonApiError> {
    let page = manufacturer_service::list_manufacturers(&state.db, &ListQuery::from_pairs(pairs)).await?;
    Ok(Json(page))
}

#[utoipa::path(
    post, path = "/manufacturers", tag = "manufacturers",
    request_body = crate::openapi::ManufacturerRequest,
    responses((status = 201, description = "Created"), (status = 400, description = "Field errors"))
)]
pub async fn create(
    State(state): State<ServerState>,
    WithRejection(Json(input), _): JsonBody<ManufacturerInput>,
) -> Result<impl IntoResponse, JsonApiError> {
    let created = manufacturer_service::create_manufacturer(&state.db, input).await?;
    let location = format!("/manufacturers/{}", created.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(created)))
}

#[utoipa::path(
    get, path = "/manufacturers/{id}", tag = "manufacturers",
    params(("id" = Uuid, Path, description = "Manufacturer id")),
    responses((status = 200, description = "Found"), (status = 404, description = "Not Found"))
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<manufacturer::Model>, JsonApiError> {
    Ok(Json(manufacturer_service::get_manufacturer(&state.db, id).await?))
}

#[utoipa::path(
    put, path = "/manufacturers/{id}", tag = "manufacturers",
    params(("id" = Uuid, Path, description = "Manufacturer id")),
    request_body = crate::openapi::ManufacturerRequest,
    responses((status = 200, description = "Updated"), (status = 400, description = "Field errors"), (status = 404, description = "Not Found"))
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    WithRejection(Json(input), _): JsonBody<ManufacturerInput>,
) -> Result<Json<manufacturer::Model>, JsonApiError> {
    Ok(Json(manufacturer_service::update_manufacturer(&state.db, id, input).await?))
}

#[utoipa::path(
    delete, path = "/manufacturers/{id}", tag = "manufacturers",
    params(("id" = Uuid, Path, description = "Manufacturer id")),
    responses((status = 204, description = "Deleted with its cars"), (status = 404, description = "Not Found"))
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    manufacturer_service::delete_manufacturer(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
