use async_trait::async_trait;
use serde_json::Value;

use crate::domain::Operation;
use crate::error::TrendsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One backend call. The path comes from the operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub operation: Operation,
    pub method: Method,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub const fn get(operation: Operation) -> Self {
        Self {
            operation,
            method: Method::Get,
            query: Vec::new(),
            body: None,
        }
    }

    pub const fn post(operation: Operation, body: Value) -> Self {
        Self {
            operation,
            method: Method::Post,
            query: Vec::new(),
            body: Some(body),
        }
    }

    #[must_use]
    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Fetch client seam. Implementations return the decoded JSON body of a 2xx
/// response and translate everything else into a `TrendsError`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<Value, TrendsError>;
}
