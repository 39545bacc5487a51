//! HTTP client abstraction for testability

use std::time::Duration;

use async_trait::async_trait;

/// Header name/value pairs attached to a request
pub type Headers = Vec<(String, String)>;

/// HTTP response from a request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstraction over HTTP client for dependency injection
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait HttpClient: Send + Sync {
    /// Send a GET request with the given headers
    async fn get(&self, url: &str, headers: &[(String, String)]) -> crate::Result<HttpResponse>;

    /// Send a POST request with a JSON body
    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &serde_json::Value,
    ) -> crate::Result<HttpResponse>;
}

/// Production HTTP client using reqwest
#[derive(Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Build a client whose requests give up after `timeout`
    pub fn with_timeout(timeout: Duration) -> crate::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| crate::PanelError::Http(format!("Building HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    fn apply_headers(
        mut request: reqwest::RequestBuilder,
        headers: &[(String, String)],
    ) -> reqwest::RequestBuilder {
        request = request.header("Accept", "application/json");
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }
        request
    }
}

async fn read_response(
    method: &str,
    url: &str,
    response: reqwest::Response,
) -> crate::Result<HttpResponse> {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|e| crate::PanelError::Http(format!("Reading response body: {}", e)))?;

    tracing::debug!("{} {} -> {} ({} bytes)", method, url, status, body.len());
    Ok(HttpResponse { status, body })
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str, headers: &[(String, String)]) -> crate::Result<HttpResponse> {
        tracing::debug!("GET {}", url);
        let response = Self::apply_headers(self.client.get(url), headers)
            .send()
            .await
            .map_err(|e| crate::PanelError::Http(format!("GET {} failed: {}", url, e)))?;

        read_response("GET", url, response).await
    }

    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &serde_json::Value,
    ) -> crate::Result<HttpResponse> {
        tracing::debug!("POST {}", url);
        let response = Self::apply_headers(self.client.post(url), headers)
            .json(body)
            .send()
            .await
            .map_err(|e| crate::PanelError::Http(format!("POST {} failed: {}", url, e)))?;

        read_response("POST", url, response).await
    }
}
