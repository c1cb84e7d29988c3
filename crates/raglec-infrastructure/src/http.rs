//! HTTP transport for the query and feedback endpoints.

use async_trait::async_trait;
use raglec_core::error::{RaglecError, Result};
use raglec_core::transport::{
    FeedbackRequest, FeedbackResponse, FeedbackTransport, QueryRequest, QueryResponse,
    QueryTransport,
};
use reqwest::Client;
use std::time::Duration;

const QUERY_PATH: &str = "/api/query";
const FEEDBACK_PATH: &str = "/api/feedback";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the backend's two JSON endpoints.
///
/// A non-2xx status, a connection failure, or an unparsable body all map to
/// `Transport` errors. There is no retry policy; retries are the caller's
/// decision.
#[derive(Clone)]
pub struct HttpApiClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpApiClient {
    /// Creates a client against `base_url` (scheme + host, no trailing
    /// path) with the default request timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the per-request timeout. A timed-out request surfaces as a
    /// transport failure like any other.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl QueryTransport for HttpApiClient {
    async fn query(&self, request: QueryRequest) -> Result<QueryResponse> {
        let response = self
            .client
            .post(self.endpoint(QUERY_PATH))
            .json(&request)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| RaglecError::transport(format!("query request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(RaglecError::transport(format!(
                "query endpoint error ({}): {}",
                status, body
            )));
        }

        response
            .json::<QueryResponse>()
            .await
            .map_err(|e| RaglecError::transport(format!("failed to parse query response: {}", e)))
    }
}

#[async_trait]
impl FeedbackTransport for HttpApiClient {
    async fn send_feedback(&self, request: FeedbackRequest) -> Result<FeedbackResponse> {
        let response = self
            .client
            .post(self.endpoint(FEEDBACK_PATH))
            .json(&request)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| RaglecError::transport(format!("feedback request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(RaglecError::transport(format!(
                "feedback endpoint error ({}): {}",
                status, body
            )));
        }

        response.json::<FeedbackResponse>().await.map_err(|e| {
            RaglecError::transport(format!("failed to parse feedback response: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_cleanly() {
        let client = HttpApiClient::new("https://example.com");
        assert_eq!(client.endpoint(QUERY_PATH), "https://example.com/api/query");

        let with_slash = HttpApiClient::new("https://example.com/");
        assert_eq!(
            with_slash.endpoint(FEEDBACK_PATH),
            "https://example.com/api/feedback"
        );
    }
}
