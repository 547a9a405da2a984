use crate::config::toml_config::TomlConfig;
use crate::domain::graphql::{GraphQLRequest, GraphQLResponse};
use crate::domain::ports::GraphQLClient;
use crate::utils::error::{PcaError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// 以 HTTP POST 傳送 GraphQL 請求的 client
#[derive(Debug, Clone)]
pub struct HttpGraphQLClient {
    client: reqwest::Client,
    endpoint: String,
    headers: HashMap<String, String>,
    bearer_token: Option<String>,
    timeout: Duration,
}

impl HttpGraphQLClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            headers: HashMap::new(),
            bearer_token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn from_config(config: &TomlConfig) -> Result<Self> {
        let mut client = Self::new(config.endpoint()?).with_timeout(config.timeout());
        if let Some(headers) = &config.client.headers {
            for (name, value) in headers {
                client = client.with_header(name, value);
            }
        }
        if let Some(token) = &config.client.bearer_token {
            client = client.with_bearer_token(token);
        }
        Ok(client)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send(&self, request: &GraphQLRequest) -> Result<GraphQLResponse> {
        let mut http_request = self
            .client
            .post(&self.endpoint)
            .timeout(request.timeout.unwrap_or(self.timeout))
            .json(request);

        for (name, value) in &self.headers {
            http_request = http_request.header(name, value);
        }
        if let Some(token) = &self.bearer_token {
            http_request = http_request.bearer_auth(token);
        }

        let response = http_request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("❌ Content service returned HTTP {}", status.as_u16());
            return Err(PcaError::HttpStatusError {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<GraphQLResponse>().await?)
    }
}

#[async_trait]
impl GraphQLClient for HttpGraphQLClient {
    async fn execute(&self, request: &GraphQLRequest, cancel: &CancellationToken) -> Result<GraphQLResponse> {
        if cancel.is_cancelled() {
            return Err(PcaError::Cancelled);
        }
        tracing::debug!(
            "POST {} ({})",
            self.endpoint,
            request
                .operation_name
                .as_deref()
                .or(request.template.as_deref())
                .unwrap_or("anonymous")
        );

        tokio::select! {
            _ = cancel.cancelled() => Err(PcaError::Cancelled),
            response = self.send(request) => response,
        }
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_posts_request_body_with_headers() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/cd/api")
                .header("authorization", "Bearer secret")
                .header("x-preview-session", "abc")
                .json_body(json!({"query": "query { x }", "variables": {"a": 1}}));
            then.status(200).json_body(json!({"data": {"x": 1}}));
        });

        let client = HttpGraphQLClient::new(server.url("/cd/api"))
            .with_bearer_token("secret")
            .with_header("x-preview-session", "abc");
        let mut request = GraphQLRequest::new("query { x }");
        request.variables.insert("a".to_string(), json!(1));

        let response = client.execute(&request, &CancellationToken::new()).await.unwrap();
        mock.assert();
        assert_eq!(response.data, Some(json!({"x": 1})));
    }

    #[tokio::test]
    async fn test_non_success_status_keeps_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/cd/api");
            then.status(401).body("unauthorized");
        });

        let client = HttpGraphQLClient::new(server.url("/cd/api"));
        let err = client
            .execute(&GraphQLRequest::new("query { x }"), &CancellationToken::new())
            .await
            .unwrap_err();
        match err {
            PcaError::HttpStatusError { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "unauthorized");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cancelled_before_send() {
        let client = HttpGraphQLClient::new("http://127.0.0.1:9/unused");
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = client
            .execute(&GraphQLRequest::new("query { x }"), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, PcaError::Cancelled));
    }

    #[tokio::test]
    async fn test_request_timeout_overrides_client_timeout() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/slow");
            then.status(200)
                .delay(Duration::from_millis(500))
                .json_body(json!({"data": {}}));
        });

        let client = HttpGraphQLClient::new(server.url("/slow")).with_timeout(Duration::from_secs(10));
        let mut request = GraphQLRequest::new("query { x }");
        request.timeout = Some(Duration::from_millis(50));

        let err = client.execute(&request, &CancellationToken::new()).await.unwrap_err();
        match err {
            PcaError::ApiError(e) => assert!(e.is_timeout()),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
