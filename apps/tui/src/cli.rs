use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "trends-explorer", version, about = "World Trends Explorer")]
pub struct CliArgs {
    /// Print results and exit instead of starting the dashboard
    #[arg(long)]
    pub headless: bool,

    /// Print headless output as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Override the backend base URL
    #[arg(long = "api-url", value_name = "URL")]
    pub api_url: Option<String>,

    /// Override the request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// World topology GeoJSON, as a file path or http(s) URL
    #[arg(long, value_name = "PATH|URL")]
    pub topology: Option<String>,

    /// Write logs to this file
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<String>,

    /// Only search within the country picked on the map
    #[arg(long = "map-only")]
    pub map_only: bool,

    /// Hide the quick-search shortcuts
    #[arg(long = "no-quick-search")]
    pub no_quick_search: bool,

    /// Headless: keyword to search
    #[arg(long, value_name = "KEYWORD")]
    pub keyword: Option<String>,

    /// Headless: country code for --keyword or --compare
    #[arg(long, value_name = "CODE", default_value = "")]
    pub geo: String,

    /// Headless: timeframe for --keyword or --compare
    #[arg(long, value_name = "RANGE", default_value = crate::domain::DEFAULT_TIMEFRAME)]
    pub timeframe: String,

    /// Headless: print trending searches for a country
    #[arg(long, value_name = "CODE")]
    pub trending: Option<String>,

    /// Headless: compare 2 to 5 comma separated keywords
    #[arg(long, value_name = "A,B,...", value_delimiter = ',')]
    pub compare: Vec<String>,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(url) = &self.api_url {
            std::env::set_var("TRENDS_API_URL", url);
        }
        if let Some(timeout) = self.timeout {
            std::env::set_var("TRENDS_TIMEOUT_SECS", timeout.to_string());
        }
        if let Some(topology) = &self.topology {
            if topology.starts_with("http://") || topology.starts_with("https://") {
                std::env::set_var("TRENDS_TOPOLOGY_URL", topology);
                std::env::remove_var("TRENDS_TOPOLOGY_PATH");
            } else {
                std::env::set_var("TRENDS_TOPOLOGY_PATH", topology);
            }
        }
        if let Some(path) = &self.log_file {
            std::env::set_var("TRENDS_LOG_FILE", path);
        }
        if self.map_only {
            std::env::set_var("TRENDS_SELECTION_MODE", "map-only");
        }
        if self.no_quick_search {
            std::env::set_var("TRENDS_QUICK_SEARCH", "0");
        }
        if self.debug {
            std::env::set_var("DEBUG", "1");
        }
    }

    /// A specific headless query was requested.
    pub fn has_query(&self) -> bool {
        self.keyword.is_some() || self.trending.is_some() || !self.compare.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn parses_headless_compare() {
        let args = CliArgs::parse_from([
            "trends-explorer",
            "--headless",
            "--compare",
            "rust,go,zig",
            "--geo",
            "DE",
        ]);
        assert!(args.headless);
        assert_eq!(args.compare, vec!["rust", "go", "zig"]);
        assert_eq!(args.geo, "DE");
        assert_eq!(args.timeframe, "today 12-m");
        assert!(args.has_query());
    }

    #[test]
    fn help_mentions_flags() {
        let help = CliArgs::command().render_help().to_string();
        assert!(help.contains("--api-url"));
        assert!(help.contains("--map-only"));
    }
}
