use super::shutdown::wait_for_signal;
use crate::errors::handlers::not_found;
use crate::http::{cors_layer_from_env, security_headers};
use axum::{Router, middleware};
use core_config::server::ServerConfig;
use std::io;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;
use utoipa_redoc::{Redoc, Servable as RedocServable};
use utoipa_scalar::{Scalar, Servable as ScalarServable};
use utoipa_swagger_ui::SwaggerUi;

const OPENAPI_JSON: &str = "/api-docs/openapi.json";

/// Mount `apis` under `/api` next to the documentation viewers
/// (`/swagger-ui`, `/redoc`, `/rapidoc`, `/scalar`) and wrap everything in
/// tracing, security headers, CORS and compression. Unknown paths get the
/// bilingual 404 envelope.
///
/// Fails when `CORS_ALLOWED_ORIGIN` is missing or malformed.
pub fn build_router<T>(apis: Router) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    let docs = T::openapi();
    let trace = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Ok(Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url(OPENAPI_JSON, docs.clone()))
        .merge(Redoc::with_url("/redoc", docs.clone()))
        .merge(RapiDoc::new(OPENAPI_JSON).path("/rapidoc"))
        .merge(Scalar::with_url("/scalar", docs))
        .nest("/api", apis)
        .fallback(not_found)
        .layer(trace)
        .layer(middleware::from_fn(security_headers))
        .layer(cors_layer_from_env()?)
        .layer(CompressionLayer::new()))
}

/// Serve until a shutdown signal arrives, then give `cleanup` at most
/// `grace` to release resources.
pub async fn serve<F>(
    router: Router,
    server: &ServerConfig,
    grace: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()>,
{
    let listener = tokio::net::TcpListener::bind(server.address()).await?;
    info!(address = %listener.local_addr()?, "Listening");

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let signal = wait_for_signal().await;
            info!(%signal, "Shutdown requested, draining connections");
        })
        .await;

    if tokio::time::timeout(grace, cleanup).await.is_err() {
        warn!(?grace, "Cleanup did not finish in time");
    }
    served
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode, routing::get};
    use tower::ServiceExt;

    #[derive(OpenApi)]
    #[openapi(info(title = "souq-test"))]
    struct TestDoc;

    fn router(apis: Router) -> Router {
        temp_env::with_var("CORS_ALLOWED_ORIGIN", Some("*"), || {
            build_router::<TestDoc>(apis)
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_api_routes_live_under_api_prefix() {
        let app = router(Router::new().route("/products", get(|| async { "[]" })));

        let nested = app
            .clone()
            .oneshot(Request::get("/api/products").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(nested.status(), StatusCode::OK);
        assert_eq!(nested.headers()["x-content-type-options"], "nosniff");

        let bare = app
            .oneshot(Request::get("/products").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(bare.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let response = router(Router::new())
            .oneshot(Request::get(OPENAPI_JSON).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
