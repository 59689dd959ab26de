mod app;
mod config;
mod effects;
mod logging;
mod ui;

use anyhow::Context;
use log::LevelFilter;
use research_logging::research_info;

use crate::Args;

pub(crate) fn run_app(args: Args) -> anyhow::Result<()> {
    let mut config = config::AppConfig::load_or_default(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(endpoint) = args.endpoint {
        config.endpoint = endpoint;
    }

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logging::initialize(config.log, level);
    research_info!(
        "Starting research client (config {:?}, found={})",
        args.config,
        args.config.exists()
    );

    app::run(config)
}
