use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use service::assignment;
use service::auth::domain::CurrentDriver;
use service::car_service::{self, CarDetail, CarInput, CarRow};
use service::search::{ListPage, ListQuery};

use crate::{errors::{JsonApiError, JsonBody}, routes::auth::ServerState};

#[utoipa::path(
    get, path = "/cars", tag = "cars",
    params(crate::openapi::ListParams),
    responses((status = 200, description = "One page of cars with manufacturers, searched by model"), (status = 302, description = "Login required"))
)]
pub async fn list(
    State(state): State<ServerState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ListPage<CarRow>>, JsonApiError> {
    Ok(Json(car_service::list_cars(&state.db, &ListQuery::from_pairs(pairs)).await?))
}

#[utoipa::path(
    post, path = "/cars", tag = "cars",
    request_body = crate::openapi::CarRequest,
    responses((status = 201, description = "Created"), (status = 400, description = "Field errors"))
)]
pub async fn create(State(state): State<ServerState>, WithRejection(Json(input), _): JsonBody<CarInput>) -> Result<impl IntoResponse, JsonApiError> {
    let created = car_service::create_car(&state.db, input).await?;
    let location = format!("/cars/{}", created.car.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(created)))
}

#[utoipa::path(
    get, path = "/cars/{id}", tag = "cars",
    params(("id" = Uuid, Path, description = "Car id")),
    responses((status = 200, description = "Car with manufacturer and drivers"), (status = 404, description = "Not Found"))
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<CarDetail>, JsonApiError> {
    Ok(Json(car_service::get_car(&state.db, id).await?))
}

#[utoipa::path(
    put, path = "/cars/{id}", tag = "cars",
    params(("id" = Uuid, Path, description = "Car id")),
    request_body = crate::openapi::CarRequest,
    responses((status = 200, description = "Updated"), (status = 400, description = "Field errors"), (status = 404, description = "Not Found"))
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    WithRejection(Json(input), _): JsonBody<CarInput>,
) -> Result<Json<CarDetail>, JsonApiError> {
    Ok(Json(car_service::update_car(&state.db, id, input).await?))
}

#[utoipa::path(
    delete, path = "/cars/{id}", tag = "cars",
    params(("id" = Uuid, Path, description = "Car id")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    car_service::delete_car(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add or remove the calling driver on the car, then send them to the car page.
#[utoipa::path(
    get, path = "/cars/{id}/toggle-assign", tag = "cars",
    params(("id" = Uuid, Path, description = "Car id")),
    responses((status = 303, description = "Toggled; Location is the car detail"), (status = 404, description = "Not Found"))
)]
pub async fn toggle_assign(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentDriver>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, JsonApiError> {
    let new_state = assignment::toggle(&state.db, current.driver_id, id).await?;
    let location = format!("/cars/{id}");
    Ok((StatusCode::SEE_OTHER, [(header::LOCATION, location)], Json(serde_json::json!({ "state": new_state }))))
}
