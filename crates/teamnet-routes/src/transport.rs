//! HTTP collaborator used by the route client
//!
//! The client only builds paths and bodies. Sending them, authentication and
//! timeouts are the job of an [`ApiTransport`] so tests can swap in a fake.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};

use crate::config::ResolvedApiConfig;
use crate::envelope::error_message;
use crate::error::TransportError;

/// Executes one API call and returns the raw response body
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Send `body` (JSON, if any) to `path`, which is relative to the API root
    /// and may carry a query string
    ///
    /// Non-success statuses must be reported as errors, never as a body.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<Vec<u8>, TransportError>;
}

/// [`ApiTransport`] backed by `reqwest` with bearer-token authentication
pub struct HttpTransport {
    client: Client,
    base_url: String,
    api_token: String,
}

impl HttpTransport {
    pub fn new(config: &ResolvedApiConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self::with_client(client, &config.base_url, &config.api_token))
    }

    /// Use a preconfigured `reqwest` client
    pub fn with_client(client: Client, base_url: &str, api_token: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> Result<reqwest::Url, TransportError> {
        let url = format!("{}{}", self.base_url, path);
        reqwest::Url::parse(&url).map_err(|e| TransportError::InvalidUrl {
            url,
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<Vec<u8>, TransportError> {
        let url = self.url_for(path)?;
        tracing::debug!(%method, %url, "Sending API request");

        let mut request = self
            .client
            .request(method.clone(), url)
            .bearer_auth(&self.api_token);
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = error_message(&bytes)
                .unwrap_or_else(|| String::from_utf8_lossy(&bytes).trim().to_string());
            tracing::debug!(%method, path, status = status.as_u16(), "API request failed");
            return Err(TransportError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let transport =
            HttpTransport::with_client(Client::new(), "https://api.example.com/client/v4/", "tok");
        assert_eq!(transport.base_url(), "https://api.example.com/client/v4");

        let url = transport
            .url_for("/accounts/acc/teamnet/routes/network/10.0.0.0%2F8")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/client/v4/accounts/acc/teamnet/routes/network/10.0.0.0%2F8"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let transport = HttpTransport::with_client(Client::new(), "not a url", "tok");
        let result = transport.url_for("/accounts");
        assert!(matches!(result, Err(TransportError::InvalidUrl { .. })));
    }
}
