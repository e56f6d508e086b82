use crate::config::RatingsConfig;
use axum::http::{header::COOKIE, HeaderMap, HeaderValue, StatusCode};
use bytes::Bytes;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Inbound headers forwarded to the ratings backend, in order.
pub const PROPAGATED_HEADERS: &[&str] = &[
    "x-request-id",
    "x-ot-span-context",
    "x-datadog-trace-id",
    "x-datadog-parent-id",
    "x-datadog-sampling-priority",
    "traceparent",
    "tracestate",
    "x-cloud-trace-context",
    "grpc-trace-bin",
    "x-b3-traceid",
    "x-b3-spanid",
    "x-b3-parentspanid",
    "x-b3-sampled",
    "x-b3-flags",
    "end-user",
    "user-agent",
];

#[derive(Debug, Error)]
pub enum RatingsError {
    #[error("Ratings request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Ratings backend returned status {0}")]
    Status(StatusCode),

    #[error("Failed to read ratings body: {0}")]
    Body(#[source] reqwest::Error),
}

/// HTTP client for the ratings backend.
pub struct RatingsClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl RatingsClient {
    pub fn new(base_url: impl Into<String>, client: reqwest::Client, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            timeout,
        }
    }

    /// Client for the configured backend, or `None` when ratings are disabled.
    pub fn from_config(config: &RatingsConfig, client: reqwest::Client) -> Option<Self> {
        config
            .enabled
            .then(|| Self::new(config.base_url(), client, config.timeout()))
    }

    /// Build the backend request for `product_id`.
    ///
    /// Each propagated header is sent as a separate `Cookie` entry rather than
    /// under its own name; absent headers still produce an empty entry. This
    /// mirrors the deployed behaviour and is pending confirmation upstream.
    fn request(&self, product_id: i64, inbound: &HeaderMap) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.base_url, product_id);
        let mut request = self.client.get(url).timeout(self.timeout);

        for name in PROPAGATED_HEADERS {
            let value = inbound
                .get(*name)
                .cloned()
                .unwrap_or_else(|| HeaderValue::from_static(""));
            request = request.header(COOKIE, value);
        }

        request
    }

    pub async fn try_fetch(
        &self,
        product_id: i64,
        inbound: &HeaderMap,
    ) -> Result<Bytes, RatingsError> {
        let response = self
            .request(product_id, inbound)
            .send()
            .await
            .map_err(RatingsError::Request)?;

        if response.status() != StatusCode::OK {
            return Err(RatingsError::Status(response.status()));
        }

        response.bytes().await.map_err(RatingsError::Body)
    }

    /// Fetch the raw ratings body, or an empty body on any failure.
    pub async fn fetch(&self, product_id: i64, inbound: &HeaderMap) -> Bytes {
        match self.try_fetch(product_id, inbound).await {
            Ok(body) => {
                debug!(product_id, bytes = body.len(), "Fetched ratings");
                body
            }
            Err(e) => {
                warn!(product_id, error = %e, "Ratings unavailable");
                Bytes::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(base_url: String, timeout: Duration) -> RatingsClient {
        RatingsClient::new(base_url, reqwest::Client::new(), timeout)
    }

    #[test]
    fn from_config_uses_configured_url_and_timeout() {
        let mut config = RatingsConfig {
            enabled: true,
            ..RatingsConfig::default()
        };
        let client = RatingsClient::from_config(&config, reqwest::Client::new()).unwrap();
        assert_eq!(client.base_url, "http://ratings:9080/ratings");
        assert_eq!(client.timeout, Duration::from_millis(10000));

        config.star_color = "red".to_string();
        config.services_domain = "prod".to_string();
        let client = RatingsClient::from_config(&config, reqwest::Client::new()).unwrap();
        assert_eq!(client.base_url, "http://ratings.prod:9080/ratings");
        assert_eq!(client.timeout, Duration::from_millis(2500));

        config.enabled = false;
        assert!(RatingsClient::from_config(&config, reqwest::Client::new()).is_none());
    }

    #[test]
    fn headers_are_propagated_as_cookie_entries() {
        let client = client_for("http://ratings:9080/ratings".into(), Duration::from_secs(1));
        let mut inbound = HeaderMap::new();
        inbound.insert("x-request-id", HeaderValue::from_static("req-42"));
        inbound.insert("user-agent", HeaderValue::from_static("curl/8.0"));
        inbound.insert("x-unrelated", HeaderValue::from_static("dropped"));

        let request = client.request(7, &inbound).build().unwrap();

        assert_eq!(request.url().as_str(), "http://ratings:9080/ratings/7");
        assert_eq!(request.timeout(), Some(&Duration::from_secs(1)));
        assert!(request.headers().get("x-request-id").is_none());
        assert!(request.headers().get("x-unrelated").is_none());

        let cookies: Vec<&str> = request
            .headers()
            .get_all(COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect();
        assert_eq!(cookies.len(), PROPAGATED_HEADERS.len());
        assert_eq!(cookies.first(), Some(&"req-42"));
        assert_eq!(cookies.last(), Some(&"curl/8.0"));
        assert!(cookies[1..cookies.len() - 1].iter().all(|v| v.is_empty()));
    }

    #[tokio::test]
    async fn fetch_returns_body_on_success() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/ratings/3");
                then.status(200)
                    .json_body(json!({"id": 3, "ratings": {"Reviewer1": 5, "Reviewer2": 4}}));
            })
            .await;

        let client = client_for(server.url("/ratings"), Duration::from_secs(2));
        let body = client.fetch(3, &HeaderMap::new()).await;

        mock.assert_async().await;
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["ratings"]["Reviewer1"], 5);
    }

    #[tokio::test]
    async fn non_200_is_a_status_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/ratings/1");
                then.status(503).body("unavailable");
            })
            .await;

        let client = client_for(server.url("/ratings"), Duration::from_secs(2));
        let result = client.try_fetch(1, &HeaderMap::new()).await;
        assert!(matches!(
            result,
            Err(RatingsError::Status(StatusCode::SERVICE_UNAVAILABLE))
        ));
        assert!(client.fetch(1, &HeaderMap::new()).await.is_empty());
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_request_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = client_for(
            format!("http://127.0.0.1:{}/ratings", port),
            Duration::from_secs(2),
        );
        let result = client.try_fetch(1, &HeaderMap::new()).await;
        assert!(matches!(result, Err(RatingsError::Request(_))));
    }

    #[tokio::test]
    async fn slow_backend_times_out() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/ratings/1");
                then.status(200)
                    .delay(Duration::from_millis(1500))
                    .json_body(json!({"ratings": {"Reviewer1": 1, "Reviewer2": 1}}));
            })
            .await;

        let client = client_for(server.url("/ratings"), Duration::from_millis(200));
        match client.try_fetch(1, &HeaderMap::new()).await {
            Err(RatingsError::Request(e)) => assert!(e.is_timeout()),
            other => panic!("expected timeout, got {:?}", other),
        }
    }
}
