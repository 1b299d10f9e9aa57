//! List recorded bugs and saved code snippets

use colored::*;
use eyre::Result;

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::store::{BugStore, CodeStore, LoadOutcome};
use crate::ui;

pub fn bugs(format: OutputFormat, config: &Config) -> Result<()> {
    let store = BugStore::new(&config.data_path());
    let bugs = records_or_warn(store.load(), "bug history");

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&bugs)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&bugs)?),
        OutputFormat::Text => {
            if bugs.is_empty() {
                println!("No bugs recorded yet.");
                return Ok(());
            }
            println!("{}", format!("{} recorded bugs:", bugs.len()).bold());
            for (i, bug) in bugs.iter().rev().enumerate() {
                println!();
                println!("{}", format!("--- Bug #{} ---", i + 1).cyan().bold());
                println!("📅 {}  💻 {}", bug.date, bug.language);
                println!("⚠️ {}: {}", bug.error_type, bug.mistake);
                if !bug.explanation.is_empty() {
                    println!("💡 {}", bug.explanation);
                }
            }
        }
    }

    Ok(())
}

pub fn codes(format: OutputFormat, config: &Config) -> Result<()> {
    let store = CodeStore::new(&config.data_path());
    let codes = records_or_warn(store.load(), "saved codes");

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&codes)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&codes)?),
        OutputFormat::Text => {
            if codes.is_empty() {
                println!("No saved codes yet.");
                return Ok(());
            }
            println!("{}", format!("{} saved snippets:", codes.len()).bold());
            for (i, snippet) in codes.iter().rev().enumerate() {
                println!();
                println!("{}", format!("--- Snippet #{} ---", i + 1).green().bold());
                println!("📅 {}  💻 {}  📝 {}", snippet.date, snippet.language, snippet.description);
                println!("{}", snippet.code);
            }
        }
    }

    Ok(())
}

fn records_or_warn<T>(outcome: LoadOutcome<T>, what: &str) -> Vec<T> {
    if outcome.is_corrupt() {
        ui::print_warning(&format!(
            "The {} file is corrupt; treating it as empty. It will be replaced on the next save.",
            what
        ));
    }
    outcome.records()
}
