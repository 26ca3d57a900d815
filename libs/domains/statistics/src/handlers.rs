use axum::{
    Router, extract::State, middleware::from_fn_with_state, response::IntoResponse, routing::get,
};
use axum_helpers::{
    ApiResponse, Authorized, JwtAuth, Message, Staff,
    errors::responses::{ForbiddenResponse, InternalServerErrorResponse, UnauthorizedResponse},
    require_auth,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::StatisticsResult;
use crate::models::{EntityCounts, MonthlySales, Statistics};
use crate::repository::StatisticsRepository;
use crate::service::StatisticsService;

#[derive(OpenApi)]
#[openapi(
    paths(get_statistics),
    components(
        schemas(Statistics, EntityCounts, MonthlySales, Message),
        responses(UnauthorizedResponse, ForbiddenResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = "Statistics", description = "Staff dashboard counts and monthly sales")
    )
)]
pub struct ApiDoc;

type SharedService<R> = Arc<StatisticsService<R>>;

/// `GET /statistics`, merged into the admins router
pub fn router<R: StatisticsRepository + 'static>(
    service: StatisticsService<R>,
    auth: JwtAuth,
) -> Router {
    Router::new()
        .route("/statistics", get(get_statistics))
        .route_layer(from_fn_with_state(auth, require_auth))
        .with_state(Arc::new(service))
}

#[utoipa::path(
    get,
    path = "/statistics",
    tag = "Statistics",
    responses(
        (status = 200, description = "Entity counts and the six-month sales rollup", body = Statistics),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_statistics<R: StatisticsRepository>(
    State(service): State<SharedService<R>>,
    _caller: Authorized<Staff>,
) -> StatisticsResult<impl IntoResponse> {
    let statistics = service.overview().await?;
    Ok(ApiResponse::data(statistics))
}
