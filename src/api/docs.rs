use axum::{routing::get, Json, Router};
use utoipa::OpenApi;
use utoipa_swagger_ui::{Config, SwaggerUi, Url};

use crate::domain::RouteTable;

use super::routes::aggregated_document_path;

/// Document name linked from the UI for every route
pub const UI_SERVICE_VERSION: &str = "v1";

/// Path of the gateway's own API document
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Swagger Gateway",
        description = "Aggregated API documentation for services behind the reverse proxy"
    ),
    paths(
        crate::api::handlers::health::health_handler,
        crate::api::handlers::swagger_docs::aggregated_document_handler
    ),
    components(schemas(crate::api::handlers::health::HealthResponse)),
    tags(
        (name = "health", description = "Liveness and readiness"),
        (name = "documentation", description = "Aggregated backend API documents")
    )
)]
pub struct ApiDoc;

/// One entry of the documentation UI's document selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiEndpoint {
    pub name: String,
    pub url: String,
}

/// UI entries for every route, in route-table order.
///
/// Each entry links the `v1` document regardless of which documents the
/// backend actually publishes.
pub fn ui_endpoints(route_table: &RouteTable) -> Vec<UiEndpoint> {
    route_table
        .routes()
        .iter()
        .map(|route| UiEndpoint {
            name: format!("{} API", route.id),
            url: aggregated_document_path(&route.id, UI_SERVICE_VERSION),
        })
        .collect()
}

/// Interactive documentation UI served under `ui_path`
pub fn swagger_ui_router<S>(ui_path: &str, endpoints: &[UiEndpoint]) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    // The UI keeps its urls for the lifetime of the process.
    let urls: Vec<Url<'static>> = endpoints
        .iter()
        .map(|endpoint| {
            let name: &'static str = Box::leak(endpoint.name.clone().into_boxed_str());
            let url: &'static str = Box::leak(endpoint.url.clone().into_boxed_str());
            Url::new(name, url)
        })
        .collect();

    SwaggerUi::new(ui_path.to_string()).config(Config::new(urls)).into()
}

/// Serves the gateway's own OpenAPI document
pub fn openapi_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route(OPENAPI_JSON_PATH, get(|| async { Json(ApiDoc::openapi()) }))
}
