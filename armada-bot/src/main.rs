use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use armada_core::config::Config;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "armada-bot")]
#[command(about = "Collision-aware navigation and targeting bot for turn-based space skirmishes")]
struct Cli {
    /// Bot name reported to the game engine
    #[arg(long, default_value = "armada")]
    name: String,
    /// JSON file overriding the default tunables
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the effective configuration as JSON and exit
    #[arg(long, default_value_t = false)]
    dump_config: bool,
}

fn main() -> Result<()> {
    // Stdout carries the wire protocol; logs go to stderr.
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };

    if cli.dump_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let summary =
        armada_bot::runner::run(&mut stdin.lock(), &mut stdout.lock(), &config, &cli.name)?;
    log::info!(
        "game over: player {} sent {} commands over {} turns",
        summary.player_id,
        summary.commands_sent,
        summary.turns
    );
    Ok(())
}
