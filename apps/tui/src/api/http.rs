use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use super::transport::{ApiRequest, Method, Transport};
use crate::domain::Operation;
use crate::error::TrendsError;

/// reqwest-backed fetch client with a hard per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(30))
            .user_agent(concat!("trends-explorer/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, operation: Operation) -> String {
        format!("{}{}", self.base_url, operation.path())
    }

    fn translate(&self, operation: Operation, err: &reqwest::Error) -> TrendsError {
        if err.is_timeout() {
            return TrendsError::Timeout {
                operation,
                after: self.timeout,
            };
        }

        TrendsError::Transport {
            operation,
            status: err.status().map(|status| status.as_u16()),
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, TrendsError> {
        let operation = request.operation;
        let url = self.url_for(operation);
        debug!(operation = operation.as_str(), %url, "sending request");

        let builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        let builder = builder.query(&request.query);
        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|err| self.translate(operation, &err))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| self.translate(operation, &err))?;

        if !status.is_success() {
            let err = error_from_status(operation, status.as_u16(), &body);
            warn!(operation = operation.as_str(), status = status.as_u16(), "request failed");
            return Err(err);
        }

        serde_json::from_slice(&body)
            .map_err(|err| TrendsError::data_integrity(operation, format!("invalid JSON: {err}")))
    }
}

/// Non-2xx responses carry `{ "error": "..." }` when the backend produced them.
pub fn error_from_status(operation: Operation, status: u16, body: &[u8]) -> TrendsError {
    let message = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|value| value.get("error").and_then(Value::as_str).map(str::to_string))
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| {
            StatusCode::from_u16(status)
                .ok()
                .and_then(|code| code.canonical_reason())
                .unwrap_or("Unknown error")
                .to_string()
        });

    TrendsError::Transport {
        operation,
        status: Some(status),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_body_becomes_the_message() {
        let err = error_from_status(
            Operation::Search,
            500,
            br#"{"error": "Failed to fetch trends data"}"#,
        );
        assert_eq!(
            err,
            TrendsError::Transport {
                operation: Operation::Search,
                status: Some(500),
                message: "Failed to fetch trends data".to_string(),
            }
        );
    }

    #[test]
    fn missing_body_falls_back_to_reason_phrase() {
        let err = error_from_status(Operation::Trending, 404, b"<html>not found</html>");
        assert_eq!(
            err.to_string(),
            "Trending searches request failed (HTTP 404): Not Found"
        );
        assert_eq!(
            err.user_message(),
            "Trending searches failed (HTTP 404): Not Found. Please try again."
        );
    }

    #[test]
    fn url_joins_base_and_operation_path() {
        let transport =
            HttpTransport::new("http://localhost:5555/api/trends/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            transport.url_for(Operation::Countries),
            "http://localhost:5555/api/trends/countries"
        );
    }
}
