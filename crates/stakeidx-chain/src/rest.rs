//! REST access to the node/proxy API.
//!
//! Every endpoint answers with the same envelope: an opaque `data` payload,
//! an `error` string that is empty on success, and a `code`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ChainError;

/// Credentials for the REST API. Empty credentials send no auth header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiCredentials {
    pub username: String,
    pub password: String,
}

impl ApiCredentials {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.username.is_empty() && self.password.is_empty()
    }
}

/// Generic API response envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenericApiResponse {
    pub data: serde_json::Value,
    pub error: String,
    pub code: String,
}

/// GET access to the REST API.
#[async_trait]
pub trait RestClient: Send + Sync {
    async fn call_get_rest_endpoint(
        &self,
        path: &str,
        credentials: &ApiCredentials,
    ) -> Result<GenericApiResponse, ChainError>;
}

/// reqwest-backed [`RestClient`].
#[derive(Debug, Clone)]
pub struct HttpRestClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Use a preconfigured client (timeouts, proxies, ...).
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, path: &str, credentials: &ApiCredentials) -> reqwest::RequestBuilder {
        let request = self.client.get(self.url(path));
        if credentials.is_empty() {
            request
        } else {
            request.basic_auth(&credentials.username, Some(&credentials.password))
        }
    }
}

#[async_trait]
impl RestClient for HttpRestClient {
    async fn call_get_rest_endpoint(
        &self,
        path: &str,
        credentials: &ApiCredentials,
    ) -> Result<GenericApiResponse, ChainError> {
        tracing::debug!("GET {}{}", self.base_url, path);

        let start = std::time::Instant::now();
        let response = self.request(path, credentials).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        tracing::debug!(
            "{} answered HTTP {} ({} bytes) in {:?}",
            path,
            status,
            body.len(),
            start.elapsed()
        );

        // Error responses usually still carry the envelope; keep its message.
        match serde_json::from_slice::<GenericApiResponse>(&body) {
            Ok(envelope) if status.is_success() || !envelope.error.is_empty() => Ok(envelope),
            Ok(_) => Err(ChainError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            }),
            Err(e) if status.is_success() => Err(ChainError::Decode(e)),
            Err(_) => Err(ChainError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_credentials() {
        assert!(ApiCredentials::empty().is_empty());
        assert!(!ApiCredentials::new("user", "").is_empty());
    }

    #[test]
    fn test_url_joining() {
        let client = HttpRestClient::new("http://localhost:8079/");
        assert_eq!(
            client.url("/network/status/4294967295"),
            "http://localhost:8079/network/status/4294967295"
        );
        let client = HttpRestClient::new("http://localhost:8079");
        assert_eq!(
            client.url("network/config"),
            "http://localhost:8079/network/config"
        );
    }

    #[test]
    fn test_no_auth_header_for_empty_credentials() {
        let client = HttpRestClient::new("http://localhost:8079");
        let request = client
            .request("/network/status/1", &ApiCredentials::empty())
            .build()
            .unwrap();
        assert!(request.headers().get(reqwest::header::AUTHORIZATION).is_none());
    }

    #[test]
    fn test_basic_auth_header() {
        let client = HttpRestClient::new("http://localhost:8079");
        let request = client
            .request("/network/status/1", &ApiCredentials::new("user", "pass"))
            .build()
            .unwrap();
        // base64("user:pass")
        assert_eq!(
            request.headers()[reqwest::header::AUTHORIZATION],
            "Basic dXNlcjpwYXNz"
        );
    }

    #[test]
    fn test_envelope_defaults() {
        let envelope: GenericApiResponse = serde_json::from_str(r#"{"code":"successful"}"#).unwrap();
        assert!(envelope.data.is_null());
        assert!(envelope.error.is_empty());
        assert_eq!(envelope.code, "successful");
    }
}
