//! REST API layer: route handlers, DTOs, OpenAPI documents, and router
//! composition for both HTTP servers.

pub mod dto;
pub mod handlers;
pub mod openapi;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::app_state::{ConvertState, RelayState};
use crate::ws::handler::ws_handler;

/// Headroom for multipart boundaries and headers on top of the file cap.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Builds the relay server: REST endpoints plus the WebSocket upgrade on
/// `/` and `/ws`.
pub fn relay_router(state: RelayState, max_body_bytes: usize) -> Router {
    let router = Router::new()
        .merge(handlers::system::routes())
        .merge(handlers::document::routes())
        .route("/", get(ws_handler))
        .route("/ws", get(ws_handler))
        .layer(DefaultBodyLimit::max(max_body_bytes));

    with_api_docs(router, openapi::RelayApiDoc::openapi())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Builds the conversion server.
pub fn convert_router(state: ConvertState) -> Router {
    let body_limit = state
        .max_upload_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);
    let router = handlers::convert::routes().layer(DefaultBodyLimit::max(body_limit));

    with_api_docs(router, openapi::ConvertApiDoc::openapi())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves Swagger UI at `/swagger-ui` and the OpenAPI document at
/// `/api-docs/openapi.json`.
#[cfg(feature = "swagger-ui")]
fn with_api_docs<S>(router: Router<S>, doc: utoipa::openapi::OpenApi) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.merge(utoipa_swagger_ui::SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", doc))
}

/// Serves the OpenAPI document at `/api-docs/openapi.json`.
#[cfg(not(feature = "swagger-ui"))]
fn with_api_docs<S>(router: Router<S>, doc: utoipa::openapi::OpenApi) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route(
        "/api-docs/openapi.json",
        get(move || {
            let doc = doc.clone();
            async move { axum::Json(doc) }
        }),
    )
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::convert::DocxConverter;
    use crate::service::{ConversionService, RelayService};

    fn relay() -> Router {
        relay_router(
            RelayState {
                relay_service: Arc::new(RelayService::new(Duration::from_secs(1))),
            },
            1024,
        )
    }

    #[tokio::test]
    async fn health_without_client_reports_disconnected() {
        let request = Request::get("/api/health").body(Body::empty());
        let Ok(request) = request else {
            panic!("request build failed");
        };
        let Ok(response) = relay().oneshot(request).await else {
            panic!("router failed");
        };
        assert_eq!(response.status(), StatusCode::OK);

        let Ok(bytes) = to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body read failed");
        };
        let Ok(body) = serde_json::from_slice::<serde_json::Value>(&bytes) else {
            panic!("body is not json");
        };
        assert_eq!(body["connected"], false);
    }

    #[tokio::test]
    async fn connectivity_is_checked_before_the_body() {
        let request = Request::post("/api/document")
            .header("content-type", "application/json")
            .body(Body::from(vec![b' '; 4096]));
        let Ok(request) = request else {
            panic!("request build failed");
        };
        let Ok(response) = relay().oneshot(request).await else {
            panic!("router failed");
        };
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn convert_router_serves_its_own_api_doc() {
        let Ok(service) = ConversionService::new(Arc::new(DocxConverter::new())) else {
            panic!("service construction failed");
        };
        let app = convert_router(ConvertState {
            conversion_service: Arc::new(service),
            max_upload_bytes: 1024,
        });
        let Ok(request) = Request::get("/api-docs/openapi.json").body(Body::empty()) else {
            panic!("request build failed");
        };
        let Ok(response) = app.oneshot(request).await else {
            panic!("router failed");
        };
        assert_eq!(response.status(), StatusCode::OK);
    }
}
