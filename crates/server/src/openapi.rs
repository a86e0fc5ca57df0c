use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(utoipa::ToSchema)]
pub struct LoginRequest { pub username: String, pub password: String }

#[derive(utoipa::ToSchema)]
pub struct ManufacturerRequest { pub name: String, pub country: String }

#[derive(utoipa::ToSchema)]
pub struct CarRequest {
    pub model: String,
    pub manufacturer_id: Uuid,
    /// replaces the driver set when present
    pub drivers: Option<Vec<Uuid>>,
}

#[derive(utoipa::ToSchema)]
pub struct DriverCreateRequest {
    pub username: String,
    pub password1: String,
    pub password2: String,
    /// three uppercase letters then five digits, e.g. `ABC12345`
    pub license_number: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

#[derive(utoipa::ToSchema)]
pub struct LicenseUpdateRequest { pub license_number: String }

/// Query parameters shared by every list endpoint; others are echoed back as hidden params.
#[derive(utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// case-insensitive substring filter
    pub search: Option<String>,
    /// 1-based page number or `last`; out of range pages are clamped
    pub page: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::dashboard::index,
        crate::routes::manufacturers::list,
        crate::routes::manufacturers::create,
        crate::routes::manufacturers::get,
        crate::routes::manufacturers::update,
        crate::routes::manufacturers::delete,
        crate::routes::cars::list,
        crate::routes::cars::create,
        crate::routes::cars::get,
        crate::routes::cars::update,
        crate::routes::cars::delete,
        crate::routes::cars::toggle_assign,
        crate::routes::drivers::list,
        crate::routes::drivers::create,
        crate::routes::drivers::get,
        crate::routes::drivers::update_license,
        crate::routes::drivers::delete,
    ),
    components(
        schemas(
            HealthResponse,
            LoginRequest,
            ManufacturerRequest,
            CarRequest,
            DriverCreateRequest,
            LicenseUpdateRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "dashboard"),
        (name = "manufacturers"),
        (name = "cars"),
        (name = "drivers")
    )
)]
pub struct ApiDoc;
