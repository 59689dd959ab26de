mod platform;

use std::path::PathBuf;

use clap::Parser;

/// Ask the web research service from the terminal.
#[derive(Debug, Parser)]
#[command(name = "research", version)]
pub(crate) struct Args {
    /// RON configuration file; defaults apply when it does not exist.
    #[arg(long, default_value = "research.ron")]
    pub(crate) config: PathBuf,
    /// Override the research service endpoint.
    #[arg(long)]
    pub(crate) endpoint: Option<String>,
    /// Log at debug level.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

fn main() -> anyhow::Result<()> {
    platform::run_app(Args::parse())
}
