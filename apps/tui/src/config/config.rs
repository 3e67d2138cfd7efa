use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::map::TopologySource;

pub const DEFAULT_API_URL: &str = "http://localhost:5555/api/trends";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_TOPOLOGY_URL: &str =
    "https://raw.githubusercontent.com/nvkelso/natural-earth-vector/master/geojson/ne_110m_admin_0_countries.geojson";
pub const DEFAULT_TOPOLOGY_FALLBACK_URL: &str =
    "https://cdn.jsdelivr.net/gh/nvkelso/natural-earth-vector@master/geojson/ne_110m_admin_0_countries.geojson";
pub const DEFAULT_LOG_FILE: &str = "trends-explorer.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Searches always run against the country picked on the map.
    MapOnly,
    SearchAndMap,
}

impl SelectionMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MapOnly => "map-only",
            Self::SearchAndMap => "search-and-map",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "map-only" | "map_only" | "map" => Some(Self::MapOnly),
            "search-and-map" | "search_and_map" | "search" => Some(Self::SearchAndMap),
            _ => None,
        }
    }
}

/// Feature switches for the single controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub mode: SelectionMode,
    pub quick_search: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            mode: SelectionMode::SearchAndMap,
            quick_search: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologyConfig {
    pub primary: TopologySource,
    pub fallback: Option<TopologySource>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub filter: String,
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_url: String,
    pub timeout: Duration,
    pub topology: TopologyConfig,
    pub log: LogConfig,
    pub capabilities: Capabilities,
    /// Problems found while reading settings, reported once logging is up.
    pub warnings: Vec<String>,
}

/// Loads `.env`, then reads settings from the process environment.
pub fn init_app_config() -> AppConfig {
    dotenv().ok();
    AppConfig::from_lookup(|key| env::var(key).ok())
}

impl AppConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut warnings = Vec::new();

        let api_url = get("TRENDS_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout_secs = match get("TRENDS_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    warnings.push(format!(
                        "TRENDS_TIMEOUT_SECS={raw} is not a positive number, using {DEFAULT_TIMEOUT_SECS}"
                    ));
                    DEFAULT_TIMEOUT_SECS
                }
            },
            None => DEFAULT_TIMEOUT_SECS,
        };

        let primary = match (get("TRENDS_TOPOLOGY_PATH"), get("TRENDS_TOPOLOGY_URL")) {
            (Some(path), _) => TopologySource::File(PathBuf::from(path)),
            (None, Some(url)) => TopologySource::Url(url),
            (None, None) => TopologySource::Url(DEFAULT_TOPOLOGY_URL.to_string()),
        };
        let fallback = get("TRENDS_TOPOLOGY_FALLBACK_URL")
            .map_or_else(
                || Some(TopologySource::Url(DEFAULT_TOPOLOGY_FALLBACK_URL.to_string())),
                |url| match url.trim() {
                    "none" | "off" => None,
                    url => Some(TopologySource::Url(url.to_string())),
                },
            )
            .filter(|fallback| *fallback != primary);

        let debug = get("DEBUG").is_some_and(|value| is_truthy(&value));
        let filter = get("TRENDS_LOG").unwrap_or_else(|| {
            if debug {
                "debug".to_string()
            } else {
                "warn".to_string()
            }
        });

        let mode = match get("TRENDS_SELECTION_MODE") {
            Some(raw) => SelectionMode::parse(&raw).unwrap_or_else(|| {
                warnings.push(format!("unknown TRENDS_SELECTION_MODE={raw}, using search-and-map"));
                SelectionMode::SearchAndMap
            }),
            None => SelectionMode::SearchAndMap,
        };
        let quick_search = get("TRENDS_QUICK_SEARCH").map_or(true, |value| is_truthy(&value));

        Self {
            api_url,
            timeout: Duration::from_secs(timeout_secs),
            topology: TopologyConfig { primary, fallback },
            log: LogConfig {
                filter,
                file: get("TRENDS_LOG_FILE").map(PathBuf::from),
            },
            capabilities: Capabilities { mode, quick_search },
            warnings,
        }
    }
}

fn is_truthy(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}
