//! Internal HTTP client for the control API.

use crate::{
    ConsoleError, ConsoleResult,
    config::{ApiConfig, RateLimitConfig},
    core::domain::{error::ValidationError, value_object::ApiBaseUrl},
    dashboard::application::response::action_reply::{ActionReply, ErrorBody},
};
use governor::{DefaultDirectRateLimiter, Quota};
use reqwest::{
    Client, Method,
    header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Internal HTTP client that knows the API base URL and turns responses
/// into [`ConsoleResult`]s.
///
/// Non-2xx answers become [`ConsoleError::Api`] carrying the JSON `detail`
/// field when one is present; transport failures become
/// [`ConsoleError::Connection`]. No request is retried and no timeout is
/// applied beyond the transport's own.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http_client: Client,
    base_url: ApiBaseUrl,
    rate_limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl ApiClient {
    /// Creates a new `ApiClient`.
    ///
    /// # Errors
    /// Returns `ConsoleError::Validation` for a bad base URL or rate limit and
    /// `ConsoleError::Connection` if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> ConsoleResult<Self> {
        let base_url = ApiBaseUrl::new(config.base_url.clone())?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http_client = Client::builder()
            .default_headers(default_headers)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| ConsoleError::Connection(e.to_string()))?;

        let rate_limiter = config
            .rate_limit
            .as_ref()
            .map(build_rate_limiter)
            .transpose()?;

        Ok(Self {
            http_client,
            base_url,
            rate_limiter,
        })
    }

    /// Returns the API root every path is joined onto.
    pub fn base_url(&self) -> &ApiBaseUrl {
        &self.base_url
    }

    /// Performs a GET request and parses the JSON body.
    pub async fn get_json<T>(&self, path: &str, query: &[(&str, String)]) -> ConsoleResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .execute_request(Method::GET, path, query, None::<&()>)
            .await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ConsoleError::Connection(format!("Failed to parse response: {}", e)))
    }

    /// Performs a GET request and returns the body verbatim.
    pub async fn get_text(&self, path: &str, query: &[(&str, String)]) -> ConsoleResult<String> {
        let response = self
            .execute_request(Method::GET, path, query, None::<&()>)
            .await?;
        response
            .text()
            .await
            .map_err(|e| ConsoleError::Connection(format!("Failed to read response: {}", e)))
    }

    /// Performs a POST request with a JSON body.
    pub async fn post_json<B>(&self, path: &str, body: &B) -> ConsoleResult<ActionReply>
    where
        B: serde::Serialize,
    {
        let response = self
            .execute_request(Method::POST, path, &[], Some(body))
            .await?;
        Self::parse_reply(response).await
    }

    /// Performs a POST request without a body.
    pub async fn post_empty(&self, path: &str) -> ConsoleResult<ActionReply> {
        let response = self
            .execute_request(Method::POST, path, &[], None::<&()>)
            .await?;
        Self::parse_reply(response).await
    }

    /// Sends one request and maps the status code.
    async fn execute_request<B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> ConsoleResult<reqwest::Response>
    where
        B: serde::Serialize,
    {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }

        let url = self.build_url(path, query)?;
        tracing::debug!(method = %method, url = %url, "Sending control API request");

        let mut req_builder = self
            .http_client
            .request(method.clone(), url.as_str())
            .header(CONTENT_TYPE, "application/json");

        if let Some(body) = body {
            req_builder = req_builder.json(body);
        }

        let response = req_builder.send().await.map_err(|e| {
            tracing::debug!(method = %method, path, error = %e, "Control API request failed");
            ConsoleError::Connection(format!("HTTP request failed: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|b| b.detail_text());
            tracing::debug!(
                method = %method,
                path,
                status = status.as_u16(),
                detail = detail.as_deref().unwrap_or(""),
                "Control API returned an error"
            );
            return Err(ConsoleError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        Ok(response)
    }

    fn build_url(&self, path: &str, query: &[(&str, String)]) -> ConsoleResult<url::Url> {
        let mut url = url::Url::parse(&self.base_url.join(path))
            .map_err(|e| ConsoleError::Connection(format!("Invalid request URL: {}", e)))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Success bodies that are not JSON are accepted as an empty reply.
    async fn parse_reply(response: reqwest::Response) -> ConsoleResult<ActionReply> {
        let text = response
            .text()
            .await
            .map_err(|e| ConsoleError::Connection(format!("Failed to read response: {}", e)))?;
        Ok(serde_json::from_str(&text).unwrap_or_default())
    }
}

fn build_rate_limiter(rl: &RateLimitConfig) -> ConsoleResult<Arc<DefaultDirectRateLimiter>> {
    let per_second = NonZeroU32::new(rl.requests_per_second).ok_or_else(|| {
        ValidationError::Field {
            field: "requests_per_second".to_string(),
            message: "Rate limit must be greater than 0".to_string(),
        }
    })?;
    let burst = NonZeroU32::new(rl.burst_size).ok_or_else(|| ValidationError::Field {
        field: "burst_size".to_string(),
        message: "Burst size must be greater than 0".to_string(),
    })?;
    let quota = Quota::per_second(per_second).allow_burst(burst);
    Ok(Arc::new(DefaultDirectRateLimiter::direct(quota)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, method, path, query_param},
    };

    fn create_test_client(server_url: &str) -> ApiClient {
        let config = ApiConfig {
            base_url: format!("{}/api", server_url),
            ..Default::default()
        };
        ApiClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_get_json_success() {
        let mock_server = MockServer::start().await;
        let client = create_test_client(&mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/api/list-models/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"models": ["a.gguf"]})),
            )
            .mount(&mock_server)
            .await;

        let result: serde_json::Value = client.get_json("/list-models/", &[]).await.unwrap();
        assert_eq!(result["models"][0], "a.gguf");
    }

    #[tokio::test]
    async fn test_get_text_with_query() {
        let mock_server = MockServer::start().await;
        let client = create_test_client(&mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/api/llm-logs/"))
            .and(query_param("external_port", "1339"))
            .respond_with(ResponseTemplate::new(200).set_body_string("line 1\n  line 2\n"))
            .mount(&mock_server)
            .await;

        let text = client
            .get_text("/llm-logs/", &[("external_port", "1339".to_string())])
            .await
            .unwrap();
        assert_eq!(text, "line 1\n  line 2\n");
    }

    #[tokio::test]
    async fn test_error_detail_is_extracted() {
        let mock_server = MockServer::start().await;
        let client = create_test_client(&mock_server.uri());

        Mock::given(method("POST"))
            .and(path("/api/update-allowlist/"))
            .and(body_json(serde_json::json!({"allowlist": "10.0.0.1"})))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(serde_json::json!({"detail": "bad format"})),
            )
            .mount(&mock_server)
            .await;

        let result = client
            .post_json(
                "/update-allowlist/",
                &serde_json::json!({"allowlist": "10.0.0.1"}),
            )
            .await;
        match result {
            Err(ConsoleError::Api { status, detail }) => {
                assert_eq!(status, 400);
                assert_eq!(detail.as_deref(), Some("bad format"));
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_without_json_has_no_detail() {
        let mock_server = MockServer::start().await;
        let client = create_test_client(&mock_server.uri());

        Mock::given(method("POST"))
            .and(path("/api/restart-nginx/"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&mock_server)
            .await;

        let err = client.post_empty("/restart-nginx/").await.unwrap_err();
        assert!(matches!(
            err,
            ConsoleError::Api {
                status: 502,
                detail: None
            }
        ));
        assert_eq!(err.detail_or_generic(), "Server responded with status: 502");
    }

    #[tokio::test]
    async fn test_non_json_success_body_is_accepted() {
        let mock_server = MockServer::start().await;
        let client = create_test_client(&mock_server.uri());

        Mock::given(method("POST"))
            .and(path("/api/stop-server/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&mock_server)
            .await;

        let reply = client.post_empty("/stop-server/").await.unwrap();
        assert_eq!(reply, ActionReply::default());
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_connection_error() {
        // Port 9 (discard) is assumed closed on test hosts.
        let client = create_test_client("http://127.0.0.1:9");
        let err = client.get_text("/logs/", &[]).await.unwrap_err();
        assert!(err.is_network());
    }

    #[test]
    fn test_zero_rate_limit_is_rejected() {
        let config = ApiConfig {
            rate_limit: Some(RateLimitConfig {
                requests_per_second: 0,
                burst_size: 1,
            }),
            ..Default::default()
        };
        assert!(matches!(
            ApiClient::new(&config),
            Err(ConsoleError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_rate_limiting_delays_requests() {
        use std::time::{Duration, Instant};

        let mock_server = MockServer::start().await;
        let config = ApiConfig {
            base_url: format!("{}/api", mock_server.uri()),
            rate_limit: Some(RateLimitConfig {
                requests_per_second: 2,
                burst_size: 2,
            }),
            ..Default::default()
        };
        let client = ApiClient::new(&config).unwrap();

        Mock::given(method("GET"))
            .and(path("/api/stats/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(4)
            .mount(&mock_server)
            .await;

        let start = Instant::now();
        let (a, b) = tokio::join!(
            client.get_json::<serde_json::Value>("/stats/", &[]),
            client.get_json::<serde_json::Value>("/stats/", &[])
        );
        a.unwrap();
        b.unwrap();
        assert!(start.elapsed() < Duration::from_millis(500));

        let start = Instant::now();
        let (c, d) = tokio::join!(
            client.get_json::<serde_json::Value>("/stats/", &[]),
            client.get_json::<serde_json::Value>("/stats/", &[])
        );
        c.unwrap();
        d.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(900));
    }
}
