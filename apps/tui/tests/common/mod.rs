#![allow(dead_code, clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Notify;

use trends_explorer::api::{ApiRequest, Transport, TrendsGateway};
use trends_explorer::domain::Operation;
use trends_explorer::TrendsError;

/// Canned backend: one response per operation, every request recorded.
#[derive(Default)]
pub struct MockBackend {
    responses: Mutex<HashMap<Operation, Result<Value, TrendsError>>>,
    requests: Mutex<Vec<ApiRequest>>,
    calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request waits for `gate.notify_one()` before answering.
    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn respond(self, operation: Operation, response: Result<Value, TrendsError>) -> Self {
        self.responses.lock().unwrap().insert(operation, response);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn calls_for(&self, operation: Operation) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|request| request.operation == operation)
            .count()
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockBackend {
    async fn send(&self, request: ApiRequest) -> Result<Value, TrendsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let operation = request.operation;
        self.requests.lock().unwrap().push(request);

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        self.responses
            .lock()
            .unwrap()
            .get(&operation)
            .cloned()
            .unwrap_or_else(|| {
                Err(TrendsError::Transport {
                    operation,
                    status: Some(404),
                    message: "no canned response".to_string(),
                })
            })
    }
}

pub fn gateway_with(backend: &Arc<MockBackend>) -> TrendsGateway {
    TrendsGateway::new(Arc::clone(backend) as Arc<dyn Transport>)
}

pub fn search_body() -> Value {
    json!({
        "keyword": "ai",
        "geo": "US",
        "timeframe": "today 12-m",
        "timestamp": "2025-03-01T12:00:00",
        "interest_over_time": [
            {"date": "2025-01-01", "value": 10},
            {"date": "2025-02-01", "value": 90}
        ],
        "interest_by_region": [
            {"geoCode": "US", "geoName": "United States", "value": 100},
            {"geoCode": "BR", "geoName": "Brazil", "value": 35}
        ],
        "related_queries": {
            "top": [{"query": "chatgpt", "value": 100}],
            "rising": [{"query": "ai agents", "value": "Breakout"}]
        }
    })
}

pub fn trending_body(geo: &str) -> Value {
    json!({
        "geo": geo,
        "country": "United States",
        "timestamp": "2025-03-01T12:00:00",
        "trending_searches": [
            {"rank": 1, "query": "eclipse"},
            {"rank": 2, "query": "election results"}
        ]
    })
}

pub fn compare_body() -> Value {
    json!({
        "keywords": ["rust", "go"],
        "geo": "",
        "timeframe": "today 12-m",
        "timestamp": "2025-03-01T12:00:00",
        "comparison_data": [
            {"date": "2025-01-01", "rust": 40, "go": 60},
            {"date": "2025-02-01", "rust": 55, "go": 50}
        ]
    })
}

/// Square outlines standing in for real borders.
pub const SQUARES: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature",
     "properties": {"ISO_A2": "US", "NAME": "United States"},
     "geometry": {"type": "Polygon", "coordinates": [[[-120,30],[-80,30],[-80,50],[-120,50],[-120,30]]]}},
    {"type": "Feature",
     "properties": {"ISO_A2": "BR", "NAME": "Brazil"},
     "geometry": {"type": "Polygon", "coordinates": [[[-70,-30],[-40,-30],[-40,0],[-70,0],[-70,-30]]]}},
    {"type": "Feature",
     "properties": {"ISO_A2": "AQ", "NAME": "Antarctica"},
     "geometry": {"type": "Polygon", "coordinates": [[[100,-10],[110,-10],[110,0],[100,0],[100,-10]]]}}
  ]
}"#;
