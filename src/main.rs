use anyhow::Context;
use clap::Parser;
use hearth::{Cli, HearthApp};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Cli::parse().into_config();
    log::info!(
        "Starting {} scene with {} rain drops",
        config.scene.label(),
        config.rain_drops
    );

    HearthApp::new(config)
        .context("failed to start")?
        .run()
        .context("event loop stopped with an error")
}
