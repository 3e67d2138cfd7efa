use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::api::TrendsGateway;
use crate::config::TopologyConfig;
use crate::domain::{
    CompareQuery, ComparisonResult, CountryList, HealthStatus, Suggestions, TrendingSnapshot,
    TrendsQuery, TrendsResult,
};
use crate::error::{MapError, TrendsError};
use crate::map::{load_topology, WorldTopology};

/// Completion of a background task, applied on the UI loop.
#[derive(Debug)]
pub enum AppEvent {
    /// `generation` is the controller's search generation when the request started.
    SearchFinished {
        generation: u64,
        result: Result<Arc<TrendsResult>, TrendsError>,
    },
    CompareFinished {
        generation: u64,
        result: Result<Arc<ComparisonResult>, TrendsError>,
    },
    TrendingFinished {
        geo: String,
        result: Result<Arc<TrendingSnapshot>, TrendsError>,
    },
    SuggestionsFinished {
        keyword: String,
        suggestions: Arc<Suggestions>,
    },
    CountriesLoaded(Arc<CountryList>),
    HealthChecked(Option<HealthStatus>),
    TopologyLoaded(Result<WorldTopology, MapError>),
}

impl AppEvent {
    pub const fn search_generation(&self) -> Option<u64> {
        match self {
            Self::SearchFinished { generation, .. } | Self::CompareFinished { generation, .. } => {
                Some(*generation)
            }
            _ => None,
        }
    }
}

fn deliver(tx: &UnboundedSender<AppEvent>, event: AppEvent) {
    if tx.send(event).is_err() {
        debug!("event loop gone, dropping task result");
    }
}

pub fn spawn_search(
    gateway: Arc<TrendsGateway>,
    tx: UnboundedSender<AppEvent>,
    query: TrendsQuery,
    generation: u64,
) {
    tokio::spawn(async move {
        let result = gateway.search_query(&query).await;
        deliver(&tx, AppEvent::SearchFinished { generation, result });
    });
}

pub fn spawn_compare(
    gateway: Arc<TrendsGateway>,
    tx: UnboundedSender<AppEvent>,
    query: CompareQuery,
    generation: u64,
) {
    tokio::spawn(async move {
        let result = gateway
            .compare(query.keywords(), query.geo(), query.timeframe())
            .await;
        deliver(&tx, AppEvent::CompareFinished { generation, result });
    });
}

pub fn spawn_trending(gateway: Arc<TrendsGateway>, tx: UnboundedSender<AppEvent>, geo: String) {
    tokio::spawn(async move {
        let result = gateway.trending_searches(&geo).await;
        deliver(&tx, AppEvent::TrendingFinished { geo, result });
    });
}

pub fn spawn_suggestions(
    gateway: Arc<TrendsGateway>,
    tx: UnboundedSender<AppEvent>,
    keyword: String,
) {
    tokio::spawn(async move {
        let suggestions = gateway.suggestions(&keyword).await;
        deliver(
            &tx,
            AppEvent::SuggestionsFinished {
                keyword,
                suggestions,
            },
        );
    });
}

pub fn spawn_countries(gateway: Arc<TrendsGateway>, tx: UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let countries = gateway.countries().await;
        deliver(&tx, AppEvent::CountriesLoaded(countries));
    });
}

pub fn spawn_health(gateway: Arc<TrendsGateway>, tx: UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let health = gateway.health().await;
        deliver(&tx, AppEvent::HealthChecked(health));
    });
}

pub fn spawn_topology_load(
    tx: UnboundedSender<AppEvent>,
    config: TopologyConfig,
    timeout: Duration,
) {
    tokio::spawn(async move {
        let result = match reqwest::Client::builder().timeout(timeout).build() {
            Ok(client) => load_topology(&client, &config.primary, config.fallback.as_ref()).await,
            Err(err) => Err(MapError::Fetch {
                source_name: config.primary.describe(),
                message: err.to_string(),
            }),
        };
        deliver(&tx, AppEvent::TopologyLoaded(result));
    });
}
