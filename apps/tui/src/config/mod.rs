#[allow(clippy::module_inception)]
mod config;

pub use config::{
    init_app_config, AppConfig, Capabilities, LogConfig, SelectionMode, TopologyConfig,
    DEFAULT_API_URL, DEFAULT_LOG_FILE, DEFAULT_TIMEOUT_SECS, DEFAULT_TOPOLOGY_FALLBACK_URL,
    DEFAULT_TOPOLOGY_URL,
};
