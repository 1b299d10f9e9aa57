use clap::Parser;
use eyre::{Context, Result};
use log::info;
use std::fs;

mod agents;
mod cli;
mod commands;
mod config;
mod gemini;
mod store;
mod ui;

use cli::{Cli, Commands};
use config::{Config, LogLevel};

fn setup_logging(log_level: &LogLevel) -> Result<()> {
    // The terminal belongs to the chat UI, so logs go to a file
    let log_dir = Config::data_dir().join("logs");
    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("multibot.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // RUST_LOG env var takes precedence, otherwise use config log_level
    let mut builder = env_logger::Builder::new();

    if std::env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else {
        builder.filter_level(log_level.as_filter());
    }

    builder.target(env_logger::Target::Pipe(target)).init();

    info!("Logging initialized, writing to: {}", log_file.display());
    info!(
        "Log level: {} (from {})",
        log_level.as_filter(),
        if std::env::var("RUST_LOG").is_ok() { "RUST_LOG env" } else { "config" }
    );
    Ok(())
}

fn run(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        // No subcommand means chat, the thing this tool exists for
        None | Some(Commands::Chat) => commands::chat::run(&config),
        Some(Commands::History { action }) => commands::history::run(action, &config),
        Some(Commands::Bugs { format }) => commands::snippets::bugs(cli::OutputFormat::resolve(format), &config),
        Some(Commands::Codes { format }) => commands::snippets::codes(cli::OutputFormat::resolve(format), &config),
        Some(Commands::Doctor) => commands::doctor::run(&config),
        Some(Commands::Config { action }) => commands::config::run(action, &config),
        Some(Commands::Completions { shell }) => commands::completions::run(shell),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration (before logging, so log messages in Config::load are silent)
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(&config.log_level).context("Failed to setup logging")?;

    info!("Starting multibot with config from: {:?}", cli.config);

    run(cli, config).context("Command failed")?;

    Ok(())
}
