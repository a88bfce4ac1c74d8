//! Manifest Loader
//!
//! One-shot HTTP fetch of the manifest document. Every fetch is
//! independent: no retries, no caching, no shared state between calls.

use reqwest::{Client, StatusCode};
use thiserror::Error;

use super::model::Manifest;
use crate::config::ManifestConfig;

/// Errors raised while fetching or decoding the manifest
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest resource does not exist (HTTP 404)
    #[error("Manifest not found. Run the manifest update script to generate it.")]
    NotFound,

    /// Any other non-success HTTP status
    #[error("Failed to fetch manifest: {status}")]
    Http { status: u16 },

    /// Transport-level failure (DNS, connect, timeout)
    #[error("Network error fetching manifest: {0}")]
    Network(#[from] reqwest::Error),

    /// The body was not valid JSON
    #[error("Invalid manifest JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Fetches the manifest from its configured URL
pub struct ManifestLoader {
    client: Client,
    url: String,
}

impl ManifestLoader {
    /// Create a loader for the given manifest configuration
    pub fn new(config: &ManifestConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            url: config.url(),
        }
    }

    /// The URL this loader fetches from
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and decode the manifest.
    ///
    /// A 404 maps to [`ManifestError::NotFound`], any other non-success
    /// status to [`ManifestError::Http`] carrying the code. The body is
    /// decoded leniently: shape problems inside `messages` degrade rather
    /// than fail (see [`Manifest::from_value`]).
    pub async fn fetch(&self) -> Result<Manifest, ManifestError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            if status == StatusCode::NOT_FOUND {
                return Err(ManifestError::NotFound);
            }
            return Err(ManifestError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let manifest = Manifest::from_slice(&body)?;

        tracing::debug!(
            url = %self.url,
            messages = manifest.messages.len(),
            "Fetched manifest"
        );

        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};
    use std::net::SocketAddr;

    /// Serve a fixed response at the manifest path on an ephemeral port
    async fn serve_fixture(status: StatusCode, body: &'static str) -> SocketAddr {
        let app = Router::new().route(
            "/messages/manifest.json",
            get(move || async move { (status, body) }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        addr
    }

    fn loader_for(addr: SocketAddr) -> ManifestLoader {
        ManifestLoader::new(&ManifestConfig {
            base_url: format!("http://{}", addr),
            ..Default::default()
        })
    }

    #[test]
    fn test_url_resolves_path_against_base() {
        let loader = ManifestLoader::new(&ManifestConfig {
            base_url: "http://example.org/".to_string(),
            ..Default::default()
        });
        assert_eq!(loader.url(), "http://example.org/messages/manifest.json");
    }

    #[tokio::test]
    async fn test_fetch_ok() {
        let addr = serve_fixture(
            StatusCode::OK,
            r#"{"messages": [{"author": "Ada", "message": "hi", "filename": "ada.json"}]}"#,
        )
        .await;

        let manifest = loader_for(addr).fetch().await.unwrap();
        assert_eq!(manifest.messages.len(), 1);
        assert_eq!(manifest.messages[0].author.as_deref(), Some("Ada"));
    }

    #[tokio::test]
    async fn test_fetch_404_is_not_found() {
        let addr = serve_fixture(StatusCode::NOT_FOUND, "gone").await;

        let err = loader_for(addr).fetch().await.unwrap_err();
        assert!(matches!(err, ManifestError::NotFound));
        assert!(err.to_string().contains("generate"));
    }

    #[tokio::test]
    async fn test_fetch_500_carries_status() {
        let addr = serve_fixture(StatusCode::INTERNAL_SERVER_ERROR, "boom").await;

        let err = loader_for(addr).fetch().await.unwrap_err();
        assert!(matches!(err, ManifestError::Http { status: 500 }));
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_fetch_malformed_body_is_parse_error() {
        let addr = serve_fixture(StatusCode::OK, "this is not json").await;

        let err = loader_for(addr).fetch().await.unwrap_err();
        assert!(matches!(err, ManifestError::Parse(_)));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_is_network_error() {
        // Bind and drop to get a port nothing listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = loader_for(addr).fetch().await.unwrap_err();
        assert!(matches!(err, ManifestError::Network(_)));
    }
}
