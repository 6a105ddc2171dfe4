use crate::{
    abstract_trait::promo::DynPromoService,
    domain::{
        requests::promo::{ApplyPromoRequest, CreatePromoCodeRequest},
        response::promo::{PromoCodeResponse, PromoDiscountResponse},
    },
    middleware::{
        jwt::{auth_middleware, require_admin},
        validate::SimpleValidatedJson,
    },
    state::AppState,
};
use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use shared::{domain::ApiResponse, errors::HttpError};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/promo-codes",
    tag = "Promo",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All promo codes", body = ApiResponse<Vec<PromoCodeResponse>>),
        (status = 403, description = "Admin only")
    )
)]
pub async fn get_promo_codes(
    Extension(service): Extension<DynPromoService>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_all().await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/promo-codes",
    tag = "Promo",
    security(("bearer_auth" = [])),
    request_body = CreatePromoCodeRequest,
    responses(
        (status = 201, description = "Promo code created", body = ApiResponse<PromoCodeResponse>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Code already exists")
    )
)]
pub async fn create_promo_code(
    Extension(service): Extension<DynPromoService>,
    SimpleValidatedJson(body): SimpleValidatedJson<CreatePromoCodeRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.create_promo(&body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/promo-codes/apply",
    tag = "Promo",
    security(("bearer_auth" = [])),
    request_body = ApplyPromoRequest,
    responses(
        (status = 200, description = "Discount preview", body = ApiResponse<PromoDiscountResponse>),
        (status = 400, description = "Invalid, expired or ineligible code")
    )
)]
pub async fn apply_promo_code(
    Extension(service): Extension<DynPromoService>,
    SimpleValidatedJson(body): SimpleValidatedJson<ApplyPromoRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.apply_promo(&body).await?;
    Ok(Json(response))
}

pub fn promo_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    let customer = OpenApiRouter::new()
        .route("/api/promo-codes/apply", post(apply_promo_code))
        .route_layer(middleware::from_fn(auth_middleware));

    let admin = OpenApiRouter::new()
        .route("/api/promo-codes", get(get_promo_codes).post(create_promo_code))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn(auth_middleware));

    customer
        .merge(admin)
        .layer(Extension(app_state.di_container.promo_service.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
}
