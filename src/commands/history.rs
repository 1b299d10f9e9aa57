//! Query and manage saved conversations

use colored::*;
use eyre::{Result, bail};

use crate::cli::{HistoryAction, OutputFormat};
use crate::config::Config;
use crate::store::{ChatLog, Role, Session};
use crate::ui::{self, Console};

pub fn run(action: HistoryAction, config: &Config) -> Result<()> {
    let log = ChatLog::new(&config.data_path());

    match action {
        HistoryAction::List { format } => list(OutputFormat::resolve(format), &log),
        HistoryAction::Show { index, format } => show(index, OutputFormat::resolve(format), &log),
        HistoryAction::Clear { force } => clear(force, &log),
    }
}

/// Load sessions newest-first, warning if the file was corrupt
fn load_sessions(log: &ChatLog) -> Vec<Session> {
    let outcome = log.load();
    if outcome.is_corrupt() {
        ui::print_warning(&format!(
            "{} is corrupt; treating history as empty. It will be replaced on the next save.",
            log.path().display()
        ));
    }
    let mut sessions = outcome.records();
    sessions.reverse();
    sessions
}

fn list(format: OutputFormat, log: &ChatLog) -> Result<()> {
    let sessions = load_sessions(log);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&sessions)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&sessions)?),
        OutputFormat::Text => {
            if sessions.is_empty() {
                println!("No saved conversations.");
                return Ok(());
            }
            println!("{}", format!("{} saved conversations:", sessions.len()).bold());
            for (i, session) in sessions.iter().enumerate() {
                println!(
                    "  [{}] {} {} {} ({} messages)",
                    i + 1,
                    session.timestamp.dimmed(),
                    format!("({})", session.module).cyan(),
                    session.title,
                    session.messages.len(),
                );
            }
        }
    }

    Ok(())
}

fn show(index: usize, format: OutputFormat, log: &ChatLog) -> Result<()> {
    let sessions = load_sessions(log);

    if index == 0 || index > sessions.len() {
        bail!("no conversation #{} (have {})", index, sessions.len());
    }
    let session = &sessions[index - 1];

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(session)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(session)?),
        OutputFormat::Text => {
            ui::rule(&format!("{} — {}", session.module, session.title));
            println!("{}", format!("Recorded {}", session.timestamp).dimmed());
            println!();
            for message in &session.messages {
                match message.role {
                    Role::User => ui::print_user(&message.text),
                    Role::Model => ui::print_bot(&session.module, &message.text),
                }
            }
        }
    }

    Ok(())
}

fn clear(force: bool, log: &ChatLog) -> Result<()> {
    if !force {
        let mut console = Console::stdin();
        ui::print_warning("This will permanently delete ALL saved conversations.");
        let Some(answer) = console.read_line("Type 'yes' to confirm:")? else {
            println!("Cancelled.");
            return Ok(());
        };
        if answer.to_lowercase() != "yes" {
            println!("Cancelled.");
            return Ok(());
        }
    }

    log.clear()?;
    ui::print_success("All conversations deleted.");
    Ok(())
}
