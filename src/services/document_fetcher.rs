//! Raw API document retrieval from backend destinations
//!
//! A [`DocumentSource`] returns the unparsed document text served by one
//! destination. The HTTP implementation requests
//! `{address}/swagger/{service}/swagger.json` and treats any transport failure
//! or non-success status as a fetch failure. There are no retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::error::FetchError;
use crate::config::AggregatorConfig;
use crate::domain::Destination;
use crate::errors::{Error, Result};

/// Source of raw backend documents
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetch the raw document of `service` from `destination`
    async fn fetch(
        &self,
        destination: &Destination,
        service: &str,
    ) -> std::result::Result<String, FetchError>;
}

/// HTTP client settings for document requests
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Overall request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(100), connect_timeout: Duration::from_secs(10) }
    }
}

impl From<&AggregatorConfig> for FetcherConfig {
    fn from(config: &AggregatorConfig) -> Self {
        Self { timeout: config.fetch_timeout(), connect_timeout: config.connect_timeout() }
    }
}

/// [`DocumentSource`] backed by `reqwest`
#[derive(Debug, Clone)]
pub struct HttpDocumentFetcher {
    client: Client,
}

impl HttpDocumentFetcher {
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| Error::transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Wrap an existing client, sharing its connection pool
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

/// Parse a destination address into an HTTP(S) base URL.
pub fn base_url(address: &str) -> std::result::Result<Url, FetchError> {
    let invalid = |reason: String| FetchError::InvalidAddress {
        address: address.to_string(),
        reason,
    };

    let url = Url::parse(address.trim_end_matches('/')).map_err(|e| invalid(e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(invalid("address cannot be used as a base URL".to_string()));
    }
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    Ok(url)
}

/// Build the upstream document URL for `service` on a destination address.
///
/// A trailing `/` on the address is dropped and `service` is encoded as exactly
/// one path segment.
pub fn document_url(address: &str, service: &str) -> std::result::Result<Url, FetchError> {
    let mut url = base_url(address)?;
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().extend(["swagger", service, "swagger.json"]);
    }
    Ok(url)
}

#[async_trait]
impl DocumentSource for HttpDocumentFetcher {
    async fn fetch(
        &self,
        destination: &Destination,
        service: &str,
    ) -> std::result::Result<String, FetchError> {
        let url = document_url(&destination.address, service)?;
        debug!(destination = %destination.name, url = %url, "Fetching backend document");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Transport { url: url.to_string(), source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url: url.to_string(), status: status.as_u16() });
        }

        response
            .text()
            .await
            .map_err(|source| FetchError::Transport { url: url.to_string(), source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn builds_document_url() {
        let url = document_url("http://orders:8080", "v1").unwrap();
        assert_eq!(url.as_str(), "http://orders:8080/swagger/v1/swagger.json");
    }

    #[test]
    fn trims_trailing_slash_and_keeps_base_path() {
        let url = document_url("http://orders:8080/", "v2").unwrap();
        assert_eq!(url.as_str(), "http://orders:8080/swagger/v2/swagger.json");

        let url = document_url("http://gateway/orders/", "v1").unwrap();
        assert_eq!(url.as_str(), "http://gateway/orders/swagger/v1/swagger.json");
    }

    #[test]
    fn service_stays_one_segment() {
        let url = document_url("http://orders:8080", "../admin/x").unwrap();
        assert_eq!(url.path(), "/swagger/..%2Fadmin%2Fx/swagger.json");
    }

    #[test]
    fn rejects_invalid_address() {
        assert!(matches!(
            document_url("not a url", "v1"),
            Err(FetchError::InvalidAddress { .. })
        ));
        assert!(matches!(
            document_url("mailto:ops@example.com", "v1"),
            Err(FetchError::InvalidAddress { .. })
        ));
        assert!(matches!(
            document_url("ftp://orders/docs", "v1"),
            Err(FetchError::InvalidAddress { .. })
        ));
    }

    #[tokio::test]
    async fn fetches_document_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/swagger/v1/swagger.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"paths":{}}"#))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpDocumentFetcher::new(&FetcherConfig::default()).unwrap();
        let text = fetcher.fetch(&Destination::new("d1", server.uri()), "v1").await.unwrap();
        assert_eq!(text, r#"{"paths":{}}"#);
    }

    #[tokio::test]
    async fn non_success_status_is_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = HttpDocumentFetcher::new(&FetcherConfig::default()).unwrap();
        let error = fetcher.fetch(&Destination::new("d1", server.uri()), "v9").await.unwrap_err();
        assert!(matches!(error, FetchError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn unreachable_destination_is_a_transport_failure() {
        let fetcher = HttpDocumentFetcher::new(&FetcherConfig {
            timeout: Duration::from_secs(2),
            connect_timeout: Duration::from_secs(1),
        })
        .unwrap();
        let error =
            fetcher.fetch(&Destination::new("d1", "http://127.0.0.1:1"), "v1").await.unwrap_err();
        assert!(matches!(error, FetchError::Transport { .. }));
    }
}
