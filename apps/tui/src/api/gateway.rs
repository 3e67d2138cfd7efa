use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::transport::{ApiRequest, Transport};
use crate::cache::{CacheStats, ResponseCache};
use crate::domain::{
    normalize_geo, CompareQuery, ComparisonResult, CountryList, HealthStatus, Operation,
    Suggestions, TrendingSnapshot, TrendsQuery, TrendsResult, DEFAULT_TRENDING_GEO,
};
use crate::error::TrendsError;

/// Max-age per cached operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub search: Duration,
    pub compare: Duration,
    pub trending: Duration,
    pub suggestions: Duration,
    pub countries: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            search: Duration::from_secs(5 * 60),
            compare: Duration::from_secs(5 * 60),
            trending: Duration::from_secs(10 * 60),
            suggestions: Duration::from_secs(15 * 60),
            countries: Duration::from_secs(24 * 60 * 60),
        }
    }
}

impl CachePolicy {
    pub const fn max_age(&self, operation: Operation) -> Duration {
        match operation {
            Operation::Search => self.search,
            Operation::Compare => self.compare,
            Operation::Trending => self.trending,
            Operation::Suggestions => self.suggestions,
            Operation::Countries => self.countries,
            Operation::Health => Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone)]
enum Payload {
    Search(Arc<TrendsResult>),
    Trending(Arc<TrendingSnapshot>),
    Suggestions(Arc<Suggestions>),
    Countries(Arc<CountryList>),
    Compare(Arc<ComparisonResult>),
}

/// A response type the gateway can cache and sanity-check before decoding.
trait Cacheable: DeserializeOwned {
    const OPERATION: Operation;

    fn into_payload(value: Arc<Self>) -> Payload;

    fn from_payload(payload: Payload) -> Option<Arc<Self>>;

    fn check(_raw: &Value) -> Result<(), String> {
        Ok(())
    }
}

fn require_array(raw: &Value, field: &str) -> Result<(), String> {
    if raw.get(field).is_some_and(Value::is_array) {
        Ok(())
    } else {
        Err(format!("missing `{field}` array"))
    }
}

impl Cacheable for TrendsResult {
    const OPERATION: Operation = Operation::Search;

    fn into_payload(value: Arc<Self>) -> Payload {
        Payload::Search(value)
    }

    fn from_payload(payload: Payload) -> Option<Arc<Self>> {
        match payload {
            Payload::Search(value) => Some(value),
            _ => None,
        }
    }

    fn check(raw: &Value) -> Result<(), String> {
        let keyword = raw.get("keyword").and_then(Value::as_str).unwrap_or("");
        if keyword.trim().is_empty() {
            return Err("missing `keyword`".to_string());
        }
        if require_array(raw, "interest_over_time").is_err()
            && require_array(raw, "interest_by_region").is_err()
        {
            return Err("missing both `interest_over_time` and `interest_by_region`".to_string());
        }
        Ok(())
    }
}

impl Cacheable for TrendingSnapshot {
    const OPERATION: Operation = Operation::Trending;

    fn into_payload(value: Arc<Self>) -> Payload {
        Payload::Trending(value)
    }

    fn from_payload(payload: Payload) -> Option<Arc<Self>> {
        match payload {
            Payload::Trending(value) => Some(value),
            _ => None,
        }
    }

    fn check(raw: &Value) -> Result<(), String> {
        require_array(raw, "trending_searches")
    }
}

impl Cacheable for Suggestions {
    const OPERATION: Operation = Operation::Suggestions;

    fn into_payload(value: Arc<Self>) -> Payload {
        Payload::Suggestions(value)
    }

    fn from_payload(payload: Payload) -> Option<Arc<Self>> {
        match payload {
            Payload::Suggestions(value) => Some(value),
            _ => None,
        }
    }

    fn check(raw: &Value) -> Result<(), String> {
        require_array(raw, "suggestions")
    }
}

impl Cacheable for CountryList {
    const OPERATION: Operation = Operation::Countries;

    fn into_payload(value: Arc<Self>) -> Payload {
        Payload::Countries(value)
    }

    fn from_payload(payload: Payload) -> Option<Arc<Self>> {
        match payload {
            Payload::Countries(value) => Some(value),
            _ => None,
        }
    }

    fn check(raw: &Value) -> Result<(), String> {
        require_array(raw, "countries")
    }
}

impl Cacheable for ComparisonResult {
    const OPERATION: Operation = Operation::Compare;

    fn into_payload(value: Arc<Self>) -> Payload {
        Payload::Compare(value)
    }

    fn from_payload(payload: Payload) -> Option<Arc<Self>> {
        match payload {
            Payload::Compare(value) => Some(value),
            _ => None,
        }
    }

    fn check(raw: &Value) -> Result<(), String> {
        require_array(raw, "comparison_data")?;
        require_array(raw, "keywords")
    }
}

/// Single point of contact with the trends backend.
///
/// Every operation checks the response cache first, then calls the
/// transport and stores what comes back. `suggestions`, `countries` and
/// `health` never fail; the rest propagate [`TrendsError`].
pub struct TrendsGateway {
    transport: Arc<dyn Transport>,
    cache: ResponseCache<Payload>,
    policy: CachePolicy,
}

impl TrendsGateway {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_policy(transport, CachePolicy::default())
    }

    pub fn with_policy(transport: Arc<dyn Transport>, policy: CachePolicy) -> Self {
        Self {
            transport,
            cache: ResponseCache::new(),
            policy,
        }
    }

    pub async fn health(&self) -> Option<HealthStatus> {
        let raw = match self.transport.send(ApiRequest::get(Operation::Health)).await {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "health check failed");
                return None;
            }
        };

        serde_json::from_value(raw)
            .map_err(|err| warn!(error = %err, "health response was malformed"))
            .ok()
    }

    pub async fn search(
        &self,
        keyword: &str,
        geo: &str,
        timeframe: &str,
    ) -> Result<Arc<TrendsResult>, TrendsError> {
        let query = TrendsQuery::new(keyword, geo, timeframe)?;
        self.search_query(&query).await
    }

    pub async fn search_query(&self, query: &TrendsQuery) -> Result<Arc<TrendsResult>, TrendsError> {
        let request = ApiRequest::get(Operation::Search).with_query(query.query_params());
        self.fetch(query.cache_key(), request).await
    }

    /// Empty or unrecognized `geo` falls back to the default trending country.
    pub async fn trending_searches(&self, geo: &str) -> Result<Arc<TrendingSnapshot>, TrendsError> {
        let geo = match normalize_geo(geo) {
            geo if geo.is_empty() => DEFAULT_TRENDING_GEO.to_string(),
            geo => geo,
        };
        let key = format!("{}_{geo}", Operation::Trending.as_str());
        let request =
            ApiRequest::get(Operation::Trending).with_query(vec![("geo".to_string(), geo)]);
        self.fetch(key, request).await
    }

    pub async fn suggestions(&self, keyword: &str) -> Arc<Suggestions> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Arc::new(Suggestions::default());
        }

        let key = format!("{}_{keyword}", Operation::Suggestions.as_str());
        let request = ApiRequest::get(Operation::Suggestions)
            .with_query(vec![("keyword".to_string(), keyword.to_string())]);

        match self.fetch(key, request).await {
            Ok(suggestions) => suggestions,
            Err(err) => {
                warn!(error = %err, keyword, "suggestions unavailable");
                Arc::new(Suggestions {
                    keyword: keyword.to_string(),
                    suggestions: Vec::new(),
                })
            }
        }
    }

    pub async fn countries(&self) -> Arc<CountryList> {
        let request = ApiRequest::get(Operation::Countries);
        match self
            .fetch(Operation::Countries.as_str().to_string(), request)
            .await
        {
            Ok(countries) => countries,
            Err(err) => {
                warn!(error = %err, "country list unavailable");
                Arc::new(CountryList::default())
            }
        }
    }

    /// Keyword order is part of the cache key.
    pub async fn compare<S: AsRef<str> + Sync>(
        &self,
        keywords: &[S],
        geo: &str,
        timeframe: &str,
    ) -> Result<Arc<ComparisonResult>, TrendsError> {
        let query = CompareQuery::new(keywords, geo, timeframe)?;
        let request = ApiRequest::post(Operation::Compare, query.body());
        self.fetch(query.cache_key(), request).await
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
        debug!("response cache cleared");
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    async fn fetch<T: Cacheable>(
        &self,
        key: String,
        request: ApiRequest,
    ) -> Result<Arc<T>, TrendsError> {
        let operation = T::OPERATION;
        let max_age = self.policy.max_age(operation);

        if let Some(hit) = self.cache.get(&key, max_age).and_then(T::from_payload) {
            debug!(operation = operation.as_str(), %key, "cache hit");
            return Ok(hit);
        }
        debug!(operation = operation.as_str(), %key, "cache miss");

        let raw = self.transport.send(request).await?;
        T::check(&raw).map_err(|message| TrendsError::data_integrity(operation, message))?;
        let value: T = serde_json::from_value(raw)
            .map_err(|err| TrendsError::data_integrity(operation, err.to_string()))?;

        let value = Arc::new(value);
        self.cache.set(key, T::into_payload(Arc::clone(&value)));
        Ok(value)
    }
}
