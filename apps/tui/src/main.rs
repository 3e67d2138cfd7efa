use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use tracing::{info, warn};

use trends_explorer::api::{HttpTransport, TrendsGateway};
use trends_explorer::app::App;
use trends_explorer::chart::ChartRenderer;
use trends_explorer::cli::CliArgs;
use trends_explorer::config::{init_app_config, DEFAULT_LOG_FILE};
use trends_explorer::logging::{init_logging, LogTarget};
use trends_explorer::map::ChoroplethMap;
use trends_explorer::{event, terminal};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();
    let config = init_app_config();

    let headless = args.headless || args.has_query() || !is_terminal();

    // Logging to stderr would draw over the dashboard.
    let log_target = match (&config.log.file, headless) {
        (Some(path), _) => LogTarget::File(path.clone()),
        (None, true) => LogTarget::Stderr,
        (None, false) => LogTarget::File(PathBuf::from(DEFAULT_LOG_FILE)),
    };
    init_logging(&config.log.filter, &log_target)?;
    for warning in &config.warnings {
        warn!("{warning}");
    }
    info!(api_url = %config.api_url, timeout = ?config.timeout, headless, "starting");

    let transport = HttpTransport::new(&config.api_url, config.timeout)?;
    let gateway = Arc::new(TrendsGateway::new(Arc::new(transport)));

    if headless {
        return event::run_headless(&gateway, &args).await;
    }

    let mut app = App::new(
        Arc::clone(&gateway),
        ChoroplethMap::new(),
        ChartRenderer::new(),
        config.capabilities,
    );
    app.start_background_loads();
    app.load_map(config.topology.clone(), config.timeout);

    let mut terminal = terminal::setup()?;
    let result = event::run(&mut terminal, &mut app).await;
    terminal::cleanup(true, true);

    result
}

fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
