//! Shared helpers for gateway integration tests

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use swagger_gateway::{
    api::build_router,
    config::{AppConfig, ClusterConfig, DestinationConfig, RouteConfig},
    startup::build_aggregator,
    Environment, SwaggerAggregator,
};
use tower::ServiceExt;

pub struct TestGateway {
    pub router: Router,
    pub aggregator: Arc<SwaggerAggregator>,
}

impl TestGateway {
    pub fn new(config: AppConfig) -> Self {
        let aggregator = build_aggregator(&config).expect("build aggregator");
        let router = build_router(aggregator.clone(), &config).expect("build router");
        Self { router, aggregator }
    }

    /// Issue a GET request and collect status, content type and body text
    pub async fn get(&self, uri: &str) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("router response");

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");

        TestResponse {
            status,
            content_type,
            body: String::from_utf8(bytes.to_vec()).expect("utf-8 body"),
        }
    }
}

#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("JSON body")
    }
}

/// Development configuration with no routes
pub fn dev_config() -> AppConfig {
    AppConfig { environment: Environment::Development, ..Default::default() }
}

/// Add a route bound to `cluster_id`, optionally stripping `prefix`
pub fn add_route(config: &mut AppConfig, route_id: &str, cluster_id: &str, prefix: Option<&str>) {
    let transforms = prefix
        .map(|prefix| vec![BTreeMap::from([("PathRemovePrefix".to_string(), prefix.to_string())])])
        .unwrap_or_default();

    config.reverse_proxy.routes.insert(
        route_id.to_string(),
        RouteConfig { cluster_id: cluster_id.to_string(), route_match: None, transforms },
    );
}

/// Add a cluster with the given destination addresses
pub fn add_cluster(config: &mut AppConfig, cluster_id: &str, addresses: &[String]) {
    let destinations = addresses
        .iter()
        .enumerate()
        .map(|(i, address)| (format!("d{}", i), DestinationConfig { address: address.clone() }))
        .collect();

    config.reverse_proxy.clusters.insert(cluster_id.to_string(), ClusterConfig { destinations });
}

pub fn document_uri(route_id: &str, service: &str) -> String {
    format!("/swagger-json/{}/swagger/{}/swagger.json", route_id, service)
}
