//! HTTP client implementation

use std::time::Duration;

use reqwest::{header, Client, Method, RequestBuilder, Response, StatusCode};
use tracing::{debug, warn};
use url::Url;

use crate::errors::DeployError;

/// Header carrying the per-target API key
pub const API_KEY_HEADER: &str = "X-API-Key";

/// HTTP client for the extension platform
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client
    ///
    /// `accept_invalid_certs` relaxes TLS validation for development
    /// environments and is fixed for the lifetime of the client.
    pub fn new(base_url: &str, accept_invalid_certs: bool) -> Result<Self, DeployError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| {
            DeployError::ConfigError(format!("Invalid base URL {}: {}", base_url, e))
        })?;

        if accept_invalid_certs {
            warn!("TLS certificate validation is disabled (--dev)");
        }

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an endpoint URL with query parameters
    pub(crate) fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, DeployError> {
        let raw = format!("{}{}", self.base_url, path);
        let url = if query.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, query)
        };
        url.map_err(|e| DeployError::Internal(format!("Invalid URL {}: {}", raw, e)))
    }

    /// Start a request carrying the base headers
    ///
    /// JSON content type is only set for metadata calls; multipart calls let
    /// the form set its own boundary header.
    pub(crate) fn request(
        &self,
        method: Method,
        url: Url,
        api_key: &str,
        json_body: bool,
    ) -> RequestBuilder {
        debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method, url)
            .header(API_KEY_HEADER, api_key)
            .header(header::ACCEPT, "application/json");

        if json_body {
            request = request.header(header::CONTENT_TYPE, "application/json");
        }
        request
    }
}

/// Status and body of an unexpected response
pub(crate) async fn failure_parts(response: Response) -> (StatusCode, String) {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    (status, body)
}
