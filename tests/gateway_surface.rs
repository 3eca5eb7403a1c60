//! Integration tests for health, the gateway's own API document, the
//! documentation UI and environment gating

mod common;

use axum::http::StatusCode;
use swagger_gateway::{AppConfig, Environment};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{add_cluster, add_route, dev_config, document_uri, TestGateway};

fn config_with_routes(environment: Environment) -> AppConfig {
    let mut config = AppConfig { environment, ..dev_config() };
    add_route(&mut config, "orders", "orders-cluster", Some("/orders"));
    add_route(&mut config, "billing", "billing-cluster", None);
    add_cluster(&mut config, "orders-cluster", &[]);
    config
}

#[tokio::test]
async fn health_reports_routes_and_cache() {
    let gateway = TestGateway::new(config_with_routes(Environment::Development));

    let response = gateway.get("/health").await;
    assert_eq!(response.status, StatusCode::OK);

    let body = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], swagger_gateway::VERSION);
    assert_eq!(body["routes"], 2);
    assert_eq!(body["cached_documents"], 0);
}

#[tokio::test]
async fn gateway_openapi_document_is_served() {
    let gateway = TestGateway::new(dev_config());

    let response = gateway.get("/api-docs/openapi.json").await;
    assert_eq!(response.status, StatusCode::OK);

    let document = response.json();
    assert!(document["paths"]["/health"].is_object());
    assert!(document["paths"]["/swagger-json/{route_id}/swagger/{service}/swagger.json"]
        .is_object());
}

#[tokio::test]
async fn ui_lists_every_route_with_v1_document() {
    let gateway = TestGateway::new(config_with_routes(Environment::Development));

    let index = gateway.get("/swagger/").await;
    assert_eq!(index.status, StatusCode::OK);

    let initializer = gateway.get("/swagger/swagger-initializer.js").await;
    assert_eq!(initializer.status, StatusCode::OK);
    for (name, url) in [
        ("orders API", "/swagger-json/orders/swagger/v1/swagger.json"),
        ("billing API", "/swagger-json/billing/swagger/v1/swagger.json"),
    ] {
        assert!(initializer.body.contains(name), "missing UI entry {}", name);
        assert!(initializer.body.contains(url), "missing UI url {}", url);
    }
}

#[tokio::test]
async fn custom_ui_path_is_honoured() {
    let mut config = config_with_routes(Environment::Development);
    config.aggregator.ui_path = "/docs".to_string();
    let gateway = TestGateway::new(config);

    assert_eq!(gateway.get("/docs/").await.status, StatusCode::OK);
    assert_eq!(gateway.get("/swagger/").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn documentation_is_hidden_outside_development() {
    for environment in [Environment::Staging, Environment::Production] {
        let gateway = TestGateway::new(config_with_routes(environment));

        assert_eq!(gateway.get(&document_uri("orders", "v1")).await.status, StatusCode::NOT_FOUND);
        assert_eq!(gateway.get("/swagger/").await.status, StatusCode::NOT_FOUND);
        assert_eq!(gateway.get("/health").await.status, StatusCode::OK);
    }
}

#[tokio::test]
async fn documentation_can_be_enabled_in_every_environment() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&backend)
        .await;

    let mut config = AppConfig { environment: Environment::Production, ..dev_config() };
    config.aggregator.enabled_in_all_environments = true;
    add_route(&mut config, "orders", "orders-cluster", None);
    add_cluster(&mut config, "orders-cluster", &[backend.uri()]);
    let gateway = TestGateway::new(config);

    let response = gateway.get(&document_uri("orders", "v1")).await;
    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(gateway.get("/swagger/").await.status, StatusCode::OK);
}
