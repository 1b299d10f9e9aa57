//! Diagnose multibot setup issues

use colored::*;
use eyre::Result;

use crate::config::Config;
use crate::store::{BugStore, ChatLog, CodeStore, LoadOutcome};

pub fn run(config: &Config) -> Result<()> {
    println!("{}", "MultiBot Doctor".bold());
    println!("{}", "═".repeat(50));
    println!();

    let mut issues = 0;

    // Check config file
    let config_file = Config::config_dir().join("multibot.yaml");
    if config_file.exists() {
        println!("{} Config file: {}", "✓".green(), config_file.display());
    } else {
        println!("{} Config file missing: {}", "⚠".yellow(), config_file.display());
        println!("  Defaults are in effect; create it to customize");
    }

    // Check data directory
    let data_dir = config.data_path();
    if data_dir.exists() {
        println!("{} Data directory: {}", "✓".green(), data_dir.display());
    } else {
        println!("{} Data directory missing: {}", "⚠".yellow(), data_dir.display());
        println!("  It will be created on the first save");
    }

    println!();

    // Check collection health
    println!("{}", "Collections:".bold());
    let log = ChatLog::new(&data_dir);
    issues += report_collection("chat_history.json", log.load());
    issues += report_collection("bug_history.json", BugStore::new(&data_dir).load());
    issues += report_collection("saved_codes.json", CodeStore::new(&data_dir).load());

    println!();

    // Check credentials
    println!("{}", "Credentials:".bold());
    let var = &config.generation.api_key_env;
    if std::env::var(var).map(|v| !v.trim().is_empty()).unwrap_or(false) {
        println!("  {} {} is set", "✓".green(), var);
    } else if Config::config_dir().join(".env").exists() {
        println!("  {} {} not set, but a .env file exists", "⚠".yellow(), var);
    } else {
        println!("  {} {} is not set", "✗".red(), var);
        println!("    Export it or run {} to be prompted", "multibot chat".cyan());
        issues += 1;
    }
    println!("  Model: {}", config.generation.model);

    println!();

    // Check speech support
    println!("{}", "Speech:".bold());
    if config.speech.enabled {
        let candidates: Vec<String> = match &config.speech.command {
            Some(cmd) => vec![cmd.clone()],
            None => ["say", "espeak-ng", "espeak"].iter().map(|s| s.to_string()).collect(),
        };
        match candidates.iter().find(|c| which::which(c).is_ok()) {
            Some(found) => println!("  {} TTS binary: {}", "✓".green(), found),
            None => {
                println!("  {} No TTS binary found ({})", "⚠".yellow(), candidates.join(", "));
                println!("    Replies will be printed but not spoken");
            }
        }
    } else {
        println!("  {} disabled", "-".dimmed());
    }

    println!();

    // Summary
    println!("{}", "═".repeat(50));
    if issues == 0 {
        println!("{} All checks passed!", "✓".green().bold());
    } else {
        println!("{} {} issue(s) found", "⚠".yellow().bold(), issues);
    }

    Ok(())
}

fn report_collection<T>(name: &str, outcome: LoadOutcome<T>) -> usize {
    match outcome {
        LoadOutcome::Loaded(records) => {
            println!("  {} {} ({} records)", "✓".green(), name, records.len());
            0
        }
        LoadOutcome::Missing => {
            println!("  {} {} (not created yet)", "-".dimmed(), name);
            0
        }
        LoadOutcome::Corrupt => {
            println!("  {} {} is corrupt", "✗".red(), name);
            println!("    It will be replaced on the next save; move it aside to keep the raw bytes");
            1
        }
    }
}
