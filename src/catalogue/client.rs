//! Catalogue API client
//!
//! Issues the single GET that loads the catalogue. Callers get an empty list
//! on any failure; the reason is only logged.

use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

use super::GameRecord;
use crate::config::{parse_bool_value, Config};

#[cfg(test)]
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Catalogue fetch errors
#[derive(Error, Debug)]
pub enum CatalogueError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP error! status: {status}")]
    Status { status: u16 },

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// HTTP client for the catalogue endpoint
#[derive(Debug, Clone)]
pub struct CatalogueClient {
    client: Client,
    url: String,
}

impl CatalogueClient {
    /// Create a client from config values and environment overrides.
    pub fn from_config(config: &Config) -> Self {
        let url = std::env::var("CATALOGUE_BROWSER_API_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| config.api.catalogue_url.clone());

        let timeout_seconds = std::env::var("CATALOGUE_BROWSER_API_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or_else(|| config.api.timeout_seconds.max(1));

        let verify_ssl = std::env::var("CATALOGUE_BROWSER_API_VERIFY_SSL")
            .ok()
            .and_then(|value| parse_bool_value(&value))
            .unwrap_or(config.api.verify_ssl);

        Self::with_settings(url, timeout_seconds, verify_ssl)
    }

    /// Create with a custom endpoint
    #[cfg(test)]
    pub fn with_url(url: impl Into<String>) -> Self {
        Self::with_settings(url.into(), DEFAULT_TIMEOUT_SECONDS, true)
    }

    fn with_settings(url: String, timeout_seconds: u64, verify_ssl: bool) -> Self {
        let timeout = Duration::from_secs(timeout_seconds.max(1));
        let client = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(!verify_ssl)
            .build()
            .unwrap_or_else(|_| Client::new());

        CatalogueClient {
            client,
            url: url.trim().to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the catalogue, surfacing the failure reason.
    pub async fn try_fetch(&self) -> Result<Vec<GameRecord>, CatalogueError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogueError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let records: Vec<GameRecord> = serde_json::from_slice(&body)?;
        Ok(records)
    }

    /// Fetch the catalogue. Any failure degrades to an empty list.
    pub async fn fetch_catalogue(&self) -> Vec<GameRecord> {
        match self.try_fetch().await {
            Ok(records) => {
                tracing::info!(count = records.len(), url = %self.url, "catalogue loaded");
                records
            }
            Err(err) => {
                tracing::error!(error = %err, url = %self.url, "Failed to fetch games");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use std::net::SocketAddr;
    use tokio::net::TcpListener;

    async fn spawn_server(app: Router) -> (SocketAddr, tokio::task::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        (addr, handle)
    }

    #[test]
    fn test_custom_url_is_trimmed() {
        let client = CatalogueClient::with_url("  https://api.example.com/games ");
        assert_eq!(client.url(), "https://api.example.com/games");
    }

    #[tokio::test]
    async fn fetch_decodes_catalogue_array() {
        let app = Router::new().route(
            "/api/games",
            get(|| async {
                (
                    [(axum::http::header::CONTENT_TYPE, "application/json")],
                    r#"[
                        {"appid": "100", "name": "Alpha", "downloads": 5, "requires_membership": true,
                         "online_supported": "Yes", "bypass_supported": "No", "primary_genre": null},
                        {"appid": "200", "name": "Beta", "downloads": 10}
                    ]"#,
                )
            }),
        );
        let (addr, handle) = spawn_server(app).await;

        let client = CatalogueClient::with_url(format!("http://{addr}/api/games"));
        let records = client.fetch_catalogue().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].appid, "100");
        assert!(records[0].is_online_supported());
        assert_eq!(records[1].downloads, 10);

        handle.abort();
    }

    #[tokio::test]
    async fn non_success_status_yields_empty_catalogue() {
        let app = Router::new().route(
            "/api/games",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
        );
        let (addr, handle) = spawn_server(app).await;

        let client = CatalogueClient::with_url(format!("http://{addr}/api/games"));
        let err = client.try_fetch().await.unwrap_err();
        assert!(matches!(err, CatalogueError::Status { status: 503 }));
        assert!(client.fetch_catalogue().await.is_empty());

        handle.abort();
    }

    #[tokio::test]
    async fn malformed_body_yields_empty_catalogue() {
        let app = Router::new().route("/api/games", get(|| async { r#"{"games": []}"# }));
        let (addr, handle) = spawn_server(app).await;

        let client = CatalogueClient::with_url(format!("http://{addr}/api/games"));
        assert!(matches!(
            client.try_fetch().await,
            Err(CatalogueError::Decode(_))
        ));
        assert!(client.fetch_catalogue().await.is_empty());

        handle.abort();
    }

    #[tokio::test]
    async fn unreachable_host_yields_empty_catalogue() {
        // Bind then drop to get a port with nothing listening.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = CatalogueClient::with_url(format!("http://{addr}/api/games"));
        assert!(matches!(
            client.try_fetch().await,
            Err(CatalogueError::Network(_))
        ));
        assert!(client.fetch_catalogue().await.is_empty());
    }
}
