mod config;
mod platform;

use anyhow::Context;
use clap::Parser;
use idea_logging::idea_info;

fn main() -> anyhow::Result<()> {
    let cli = config::Cli::parse();
    let config = config::resolve(cli).context("invalid configuration")?;

    idea_logging::initialize(&config.logging);
    idea_info!("Streaming ideas from {}", config.endpoint);

    let outcome = platform::run_app(&config)?;
    idea_info!(
        "View finished: {} fragment(s), {}",
        outcome.fragment_count,
        if outcome.had_content {
            "content shown"
        } else {
            "placeholder shown"
        }
    );
    Ok(())
}
