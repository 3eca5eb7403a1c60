use std::collections::HashSet;
use std::sync::Arc;

use axum::{extract::Request, routing::get, Router};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::domain::{Route, RouteTable};
use crate::errors::{Error, Result};
use crate::services::SwaggerAggregator;

use super::{
    docs,
    handlers::{aggregated_document_handler, health_handler, RouteDocsState},
};

/// Concrete path of the aggregated document of `service` for `route_id`
pub fn aggregated_document_path(route_id: &str, service: &str) -> String {
    format!("/swagger-json/{}/swagger/{}/swagger.json", route_id, service)
}

/// Route template of the aggregated document endpoint for `route_id`
fn aggregated_document_template(route_id: &str) -> String {
    aggregated_document_path(route_id, "{service}")
}

/// One registered documentation endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocsEndpoint {
    pub route_id: String,
    pub template: String,
}

/// Documentation endpoints resolved from the route table at startup.
///
/// Every route gets exactly one endpoint; the table is folded into the router
/// once and never changes afterwards.
#[derive(Debug, Clone, Default)]
pub struct EndpointTable {
    endpoints: Vec<DocsEndpoint>,
}

impl EndpointTable {
    pub fn from_route_table(route_table: &RouteTable) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut endpoints = Vec::with_capacity(route_table.routes().len());

        for route in route_table.routes() {
            if !Route::is_valid_id(&route.id) {
                return Err(Error::validation_field(
                    format!("Route id '{}' cannot be used as a path segment", route.id),
                    "reverse_proxy.routes",
                ));
            }
            if !seen.insert(route.id.as_str()) {
                return Err(Error::validation_field(
                    format!("Route id '{}' is registered twice", route.id),
                    "reverse_proxy.routes",
                ));
            }

            endpoints.push(DocsEndpoint {
                route_id: route.id.clone(),
                template: aggregated_document_template(&route.id),
            });
        }

        Ok(Self { endpoints })
    }

    pub fn endpoints(&self) -> &[DocsEndpoint] {
        &self.endpoints
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Bind every endpoint to its own handler context
    pub fn into_router(self, aggregator: Arc<SwaggerAggregator>) -> Router {
        self.endpoints.into_iter().fold(Router::new(), |router, endpoint| {
            debug!(
                route_id = %endpoint.route_id,
                path = %endpoint.template,
                "Registering docs endpoint"
            );
            let state = RouteDocsState {
                route_id: Arc::from(endpoint.route_id),
                aggregator: aggregator.clone(),
            };
            router.merge(
                Router::new()
                    .route(&endpoint.template, get(aggregated_document_handler))
                    .with_state(state),
            )
        })
    }
}

/// Build the gateway router.
///
/// Health and the gateway's own API document are always served. Aggregated
/// documents and the UI are mounted only when documentation is enabled for
/// the configured environment.
pub fn build_router(aggregator: Arc<SwaggerAggregator>, config: &AppConfig) -> Result<Router> {
    let mut router = Router::new()
        .route("/health", get(health_handler))
        .with_state(aggregator.clone())
        .merge(docs::openapi_router());

    if config.docs_enabled() {
        let endpoints = EndpointTable::from_route_table(aggregator.route_table())?;
        let ui_entries = docs::ui_endpoints(aggregator.route_table());
        info!(
            endpoints = endpoints.len(),
            ui_path = %config.aggregator.ui_path,
            "Mounting aggregated documentation"
        );

        router = router
            .merge(endpoints.into_router(aggregator))
            .merge(docs::swagger_ui_router(&config.aggregator.ui_path, &ui_entries));
    } else {
        info!(environment = %config.environment, "Aggregated documentation disabled");
    }

    Ok(router.layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
        crate::request_span!(request.method(), request.uri().path())
    })))
}
