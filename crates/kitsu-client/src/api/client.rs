//! Kitsu catalog client. One best-effort GET per call, no retries.

use super::types::{AnimeResource, ResourceDocument};
use super::CatalogSource;
use crate::error::FetchError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use shared::config::CatalogConfig;
use shared::CatalogRecord;
use tracing::{debug, info, warn};

/// JSON:API media type Kitsu expects in the Accept header
pub const JSON_API_MEDIA_TYPE: &str = "application/vnd.api+json";

/// Kitsu anime catalog client
#[derive(Debug, Clone)]
pub struct KitsuClient {
    /// HTTP client
    client: Client,
    /// Base URL for the Kitsu API, without trailing slash
    base_url: String,
    /// Server-side result cap per request
    result_limit: u32,
}

impl KitsuClient {
    /// Create a new Kitsu client
    pub fn new(base_url: impl Into<String>, result_limit: u32) -> Result<Self> {
        let user_agent = format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self::with_http_client(client, base_url, result_limit))
    }

    /// Create a client around an existing HTTP client
    pub fn with_http_client(client: Client, base_url: impl Into<String>, result_limit: u32) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            result_limit,
        }
    }

    /// Create a client from the `[catalog]` config section
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        Self::new(config.base_url.clone(), config.result_limit)
    }

    pub fn result_limit(&self) -> u32 {
        self.result_limit
    }

    fn anime_url(&self) -> String {
        format!("{}/anime", self.base_url)
    }

    /// Query parameters for one catalog request.
    ///
    /// A blank term requests the unfiltered first page.
    fn query_params(&self, search_term: Option<&str>) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(2);
        if let Some(term) = search_term.map(str::trim).filter(|t| !t.is_empty()) {
            params.push(("filter[text]", term.to_string()));
        }
        params.push(("page[limit]", self.result_limit.to_string()));
        params
    }

    /// Fetch the first page of anime, optionally matching a free-text search
    pub async fn search_anime(
        &self,
        search_term: Option<&str>,
    ) -> Result<Vec<CatalogRecord>, FetchError> {
        let url = self.anime_url();
        let params = self.query_params(search_term);

        debug!(url = %url, params = ?params, "Making catalog request");

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, JSON_API_MEDIA_TYPE)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "Request error");
                FetchError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            warn!(
                url = %url,
                status = %status,
                error = %error_text,
                "Request failed"
            );
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(FetchError::from)?;

        let document: ResourceDocument<AnimeResource> = serde_json::from_slice(&body)
            .map_err(|e| {
                warn!(url = %url, error = %e, "Failed to parse response");
                FetchError::from(e)
            })?;

        let records: Vec<CatalogRecord> = document
            .into_data()
            .into_iter()
            .map(CatalogRecord::from)
            .collect();

        info!(
            search = search_term.unwrap_or(""),
            records = records.len(),
            "Catalog fetched"
        );

        Ok(records)
    }
}

#[async_trait]
impl CatalogSource for KitsuClient {
    async fn fetch_catalog(
        &self,
        search_term: Option<&str>,
    ) -> Result<Vec<CatalogRecord>, FetchError> {
        self.search_anime(search_term).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve one canned HTTP response and hand back the raw request text
    async fn serve_once(status_line: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/vnd.api+json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).to_string()
        });

        (format!("http://{}", addr), handle)
    }

    /// Client for the loopback test server, bypassing any proxy settings
    fn local_client(base_url: String) -> KitsuClient {
        let http = Client::builder().no_proxy().build().unwrap();
        KitsuClient::with_http_client(http, base_url, 20)
    }

    #[test]
    fn test_client_creation() {
        let client = KitsuClient::new("https://kitsu.io/api/edge/", 20).unwrap();
        assert_eq!(client.anime_url(), "https://kitsu.io/api/edge/anime");
        assert_eq!(client.result_limit(), 20);
    }

    #[test]
    fn test_query_params() {
        let client = KitsuClient::new("https://kitsu.io/api/edge", 20).unwrap();

        let params = client.query_params(Some("  naruto "));
        assert_eq!(
            params,
            vec![("filter[text]", "naruto".to_string()), ("page[limit]", "20".to_string())]
        );

        assert_eq!(client.query_params(Some("   ")), vec![("page[limit]", "20".to_string())]);
        assert_eq!(client.query_params(None), vec![("page[limit]", "20".to_string())]);
    }

    #[tokio::test]
    async fn test_search_sends_single_jsonapi_request() {
        let body = r#"{"data":[{"id":"11","type":"anime","attributes":{"canonicalTitle":"Naruto","status":"finished"}}]}"#;
        let (base_url, server) = serve_once("200 OK", body).await;

        let client = local_client(base_url);
        let records = client.fetch_catalog(Some("naruto")).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "11");

        let request = server.await.unwrap().to_lowercase();
        assert!(request.starts_with("get /anime?"));
        assert!(request.contains("naruto"));
        assert!(request.contains("page%5blimit%5d=20"));
        assert!(request.contains("accept: application/vnd.api+json"));
    }

    #[tokio::test]
    async fn test_empty_result_is_success() {
        let (base_url, server) = serve_once("200 OK", r#"{"data":[]}"#).await;

        let client = local_client(base_url);
        let records = client.fetch_catalog(None).await.unwrap();
        assert!(records.is_empty());

        let request = server.await.unwrap().to_lowercase();
        assert!(!request.contains("filter%5btext%5d"));
    }

    #[tokio::test]
    async fn test_server_error_maps_to_status() {
        let (base_url, server) = serve_once("500 Internal Server Error", "boom").await;

        let client = local_client(base_url);
        let err = client.fetch_catalog(None).await.unwrap_err();
        assert_eq!(err, FetchError::HttpStatus(500));
        assert!(err.to_string().contains("500"));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let (base_url, server) = serve_once("200 OK", "<html>not json</html>").await;

        let client = local_client(base_url);
        let err = client.fetch_catalog(None).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // Reserve a port, then free it so nothing is listening
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = local_client(format!("http://{}", addr));
        let err = client.fetch_catalog(Some("bebop")).await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));
    }
}
