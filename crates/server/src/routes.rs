use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;

pub mod auth;
pub mod cars;
pub mod dashboard;
pub mod drivers;
pub mod manufacturers;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: public auth and docs routes, everything else behind login
pub fn build_router(cors: CorsLayer, state: auth::ServerState) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/accounts/login", post(auth::login))
        .route("/accounts/logout", post(auth::logout));

    let protected = Router::new()
        .route("/", get(dashboard::index))
        .route("/manufacturers", get(manufacturers::list).post(manufacturers::create))
        .route(
            "/manufacturers/:id",
            get(manufacturers::get).put(manufacturers::update).delete(manufacturers::delete),
        )
        .route("/cars", get(cars::list).post(cars::create))
        .route("/cars/:id", get(cars::get).put(cars::update).delete(cars::delete))
        .route("/cars/:id/toggle-assign", get(cars::toggle_assign))
        .route("/drivers", get(drivers::list).post(drivers::create))
        .route(
            "/drivers/:id",
            get(drivers::get).put(drivers::update_license).delete(drivers::delete),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_login));

    public
        .merge(protected)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
