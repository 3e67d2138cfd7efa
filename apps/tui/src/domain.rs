use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::countries;
use crate::error::TrendsError;

pub const DEFAULT_TIMEFRAME: &str = "today 12-m";
pub const DEFAULT_TRENDING_GEO: &str = "US";
pub const MIN_COMPARE_KEYWORDS: usize = 2;
pub const MAX_COMPARE_KEYWORDS: usize = 5;

/// Backend operations, used for cache keys, logging and error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Health,
    Search,
    Trending,
    Suggestions,
    Countries,
    Compare,
}

impl Operation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Search => "search",
            Self::Trending => "trending",
            Self::Suggestions => "suggestions",
            Self::Countries => "countries",
            Self::Compare => "compare",
        }
    }

    pub const fn path(self) -> &'static str {
        match self {
            Self::Health => "/health",
            Self::Search => "/search",
            Self::Trending => "/trending",
            Self::Suggestions => "/suggestions",
            Self::Countries => "/countries",
            Self::Compare => "/compare",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Health => "Health check",
            Self::Search => "Search",
            Self::Trending => "Trending searches",
            Self::Suggestions => "Suggestions",
            Self::Countries => "Country list",
            Self::Compare => "Compare",
        }
    }
}

/// Uppercased ISO alpha-2 code, or empty (worldwide) when the input is not
/// an assigned one.
pub fn normalize_geo(geo: &str) -> String {
    let geo = geo.trim().to_ascii_uppercase();
    if countries::is_recognized_code(&geo) {
        geo
    } else {
        String::new()
    }
}

pub fn normalize_timeframe(timeframe: &str) -> String {
    let timeframe = timeframe.trim();
    if timeframe.is_empty() {
        DEFAULT_TIMEFRAME.to_string()
    } else {
        timeframe.to_string()
    }
}

/// A validated single-keyword search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendsQuery {
    keyword: String,
    geo: String,
    timeframe: String,
}

impl TrendsQuery {
    pub fn new(keyword: &str, geo: &str, timeframe: &str) -> Result<Self, TrendsError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(TrendsError::validation("keyword", "a keyword is required"));
        }

        Ok(Self {
            keyword: keyword.to_string(),
            geo: normalize_geo(geo),
            timeframe: normalize_timeframe(timeframe),
        })
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn geo(&self) -> &str {
        &self.geo
    }

    pub fn timeframe(&self) -> &str {
        &self.timeframe
    }

    pub fn cache_key(&self) -> String {
        format!(
            "{}_{}_{}_{}",
            Operation::Search.as_str(),
            self.keyword,
            self.geo,
            self.timeframe
        )
    }

    pub fn query_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("keyword".to_string(), self.keyword.clone()),
            ("timeframe".to_string(), self.timeframe.clone()),
        ];
        if !self.geo.is_empty() {
            params.push(("geo".to_string(), self.geo.clone()));
        }
        params
    }
}

/// A validated multi-keyword comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareQuery {
    keywords: Vec<String>,
    geo: String,
    timeframe: String,
}

impl CompareQuery {
    pub fn new<S: AsRef<str>>(
        keywords: &[S],
        geo: &str,
        timeframe: &str,
    ) -> Result<Self, TrendsError> {
        if keywords.len() < MIN_COMPARE_KEYWORDS {
            return Err(TrendsError::validation(
                "keywords",
                format!("at least {MIN_COMPARE_KEYWORDS} keywords are required for comparison"),
            ));
        }
        if keywords.len() > MAX_COMPARE_KEYWORDS {
            return Err(TrendsError::validation(
                "keywords",
                format!("at most {MAX_COMPARE_KEYWORDS} keywords can be compared"),
            ));
        }

        let keywords = keywords
            .iter()
            .enumerate()
            .map(|(index, keyword)| {
                let keyword = keyword.as_ref().trim();
                if keyword.is_empty() {
                    Err(TrendsError::validation(
                        "keywords",
                        format!("keyword {} is empty", index + 1),
                    ))
                } else {
                    Ok(keyword.to_string())
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            keywords,
            geo: normalize_geo(geo),
            timeframe: normalize_timeframe(timeframe),
        })
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn geo(&self) -> &str {
        &self.geo
    }

    pub fn timeframe(&self) -> &str {
        &self.timeframe
    }

    pub fn cache_key(&self) -> String {
        format!(
            "{}_{}_{}_{}",
            Operation::Compare.as_str(),
            self.keywords.join("|"),
            self.geo,
            self.timeframe
        )
    }

    pub fn body(&self) -> serde_json::Value {
        let mut body = serde_json::json!({
            "keywords": self.keywords,
            "timeframe": self.timeframe,
        });
        if !self.geo.is_empty() {
            body["geo"] = serde_json::Value::String(self.geo.clone());
        }
        body
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePoint {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionInterest {
    #[serde(rename = "geoCode", default)]
    pub geo_code: String,
    #[serde(rename = "geoName", default)]
    pub geo_name: String,
    #[serde(default)]
    pub value: u32,
}

/// Related-query scores arrive as numbers or as labels such as "Breakout".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    Number(i64),
    Text(String),
}

impl Default for QueryValue {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => write!(f, "{value}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedQuery {
    pub query: String,
    #[serde(default)]
    pub value: QueryValue,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedQueries {
    #[serde(default)]
    pub top: Vec<RelatedQuery>,
    #[serde(default)]
    pub rising: Vec<RelatedQuery>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendsResult {
    pub keyword: String,
    #[serde(default)]
    pub geo: String,
    #[serde(default)]
    pub timeframe: Option<String>,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub interest_over_time: Vec<TimePoint>,
    #[serde(default)]
    pub interest_by_region: Vec<RegionInterest>,
    #[serde(default)]
    pub related_queries: RelatedQueries,
}

impl TrendsResult {
    pub fn region_value(&self, code: &str) -> Option<u32> {
        self.interest_by_region
            .iter()
            .find(|region| region.geo_code == code)
            .map(|region| region.value)
    }

    /// Regions with a value of at least one, highest first.
    pub fn top_regions(&self, limit: usize) -> Vec<&RegionInterest> {
        let mut regions = self
            .interest_by_region
            .iter()
            .filter(|region| region.value >= 1)
            .collect::<Vec<_>>();
        regions.sort_by(|a, b| b.value.cmp(&a.value));
        regions.truncate(limit);
        regions
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendingSearch {
    pub rank: u32,
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendingSnapshot {
    #[serde(default)]
    pub geo: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub timestamp: String,
    pub trending_searches: Vec<TrendingSearch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(default)]
    pub mid: String,
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestions {
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryList {
    #[serde(default)]
    pub countries: Vec<Country>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonPoint {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(flatten)]
    pub values: BTreeMap<String, u32>,
}

impl ComparisonPoint {
    pub fn value_for(&self, keyword: &str) -> u32 {
        self.values.get(keyword).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub keywords: Vec<String>,
    #[serde(default)]
    pub geo: String,
    #[serde(default)]
    pub timeframe: Option<String>,
    #[serde(default)]
    pub timestamp: String,
    pub comparison_data: Vec<ComparisonPoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub service: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_trims_keyword_and_normalizes_geo() {
        let query = TrendsQuery::new("  ai ", " us", "").unwrap();
        assert_eq!(query.keyword(), "ai");
        assert_eq!(query.geo(), "US");
        assert_eq!(query.timeframe(), DEFAULT_TIMEFRAME);
        assert_eq!(query.cache_key(), "search_ai_US_today 12-m");
    }

    #[test]
    fn unrecognized_geo_is_dropped() {
        let query = TrendsQuery::new("ai", "United States", "today 3-m").unwrap();
        assert_eq!(query.geo(), "");
        assert!(query
            .query_params()
            .iter()
            .all(|(name, _)| name.as_str() != "geo"));

        let query = TrendsQuery::new("ai", "zz", "").unwrap();
        assert_eq!(query.cache_key(), "search_ai__today 12-m");

        let query = CompareQuery::new(&["a", "b"], "ZZ", "").unwrap();
        assert_eq!(query.geo(), "");
    }

    #[test]
    fn blank_keyword_is_rejected() {
        for keyword in ["", "   "] {
            let err = TrendsQuery::new(keyword, "US", DEFAULT_TIMEFRAME).unwrap_err();
            assert!(matches!(err, TrendsError::Validation { field: "keyword", .. }));
        }
    }

    #[test]
    fn compare_keyword_count_is_bounded() {
        assert!(CompareQuery::new(&["a"], "", DEFAULT_TIMEFRAME).is_err());
        assert!(CompareQuery::new(&["a", "b", "c", "d", "e", "f"], "", DEFAULT_TIMEFRAME).is_err());
        assert!(CompareQuery::new(&["a", " "], "", DEFAULT_TIMEFRAME).is_err());

        let query = CompareQuery::new(&["a", "b"], "gb", DEFAULT_TIMEFRAME).unwrap();
        assert_eq!(query.cache_key(), "compare_a|b_GB_today 12-m");
        assert_eq!(query.body()["geo"], "GB");
    }

    #[test]
    fn related_query_values_accept_numbers_and_labels() {
        let queries: RelatedQueries = serde_json::from_str(
            r#"{"top":[{"query":"ml","value":"50"},{"query":"gpt","value":100}],
                "rising":[{"query":"agents","value":"Breakout","link":"/x"}]}"#,
        )
        .unwrap();

        assert_eq!(queries.top[0].value.to_string(), "50");
        assert_eq!(queries.top[1].value, QueryValue::Number(100));
        assert_eq!(queries.rising[0].value.to_string(), "Breakout");
    }

    #[test]
    fn comparison_points_flatten_keyword_columns() {
        let point: ComparisonPoint =
            serde_json::from_str(r#"{"date":"2025-01-01","rust":40,"go":25}"#).unwrap();
        assert_eq!(point.value_for("rust"), 40);
        assert_eq!(point.value_for("zig"), 0);
    }

    #[test]
    fn top_regions_skips_zero_values_and_sorts_descending() {
        let result = TrendsResult {
            keyword: "ai".to_string(),
            geo: String::new(),
            timeframe: None,
            timestamp: String::new(),
            interest_over_time: Vec::new(),
            interest_by_region: vec![
                RegionInterest {
                    geo_code: "GB".to_string(),
                    geo_name: "United Kingdom".to_string(),
                    value: 40,
                },
                RegionInterest {
                    geo_code: "FR".to_string(),
                    geo_name: "France".to_string(),
                    value: 0,
                },
                RegionInterest {
                    geo_code: "US".to_string(),
                    geo_name: "United States".to_string(),
                    value: 100,
                },
            ],
            related_queries: RelatedQueries::default(),
        };

        let top = result.top_regions(15);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].geo_code, "US");
        assert_eq!(result.region_value("GB"), Some(40));
        assert_eq!(result.region_value("DE"), None);
    }
}
