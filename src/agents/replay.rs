//! Conversation Replay - browse and re-read saved sessions

use colored::*;
use eyre::Result;

use crate::store::{ChatLog, Role, Session};
use crate::ui::{self, Console};

/// Run the replay browser until the user backs out
pub fn run(console: &mut Console, log: &ChatLog) -> Result<()> {
    loop {
        ui::banner("Conversation Replay", "Revisit your past sessions 🎬");

        let outcome = log.load();
        if outcome.is_corrupt() {
            ui::print_warning(
                "Chat history file is corrupt; showing an empty list. It will be replaced on the next save.",
            );
        }
        let mut sessions = outcome.records();
        sessions.reverse(); // newest first

        if sessions.is_empty() {
            println!("📭 No saved conversations yet.");
            return Ok(());
        }

        println!("{}", format!("Found {} saved conversations:", sessions.len()).bold());
        for (i, session) in sessions.iter().enumerate() {
            println!(
                "  [{}] {} {} {}",
                i + 1,
                session.timestamp.dimmed(),
                format!("({})", session.module).cyan(),
                session.title,
            );
        }
        ui::print_hint("(Enter a number to replay, 'clear' to delete all, 'exit' to go back)");

        let Some(choice) = console.read_line("▸ Choice:")? else {
            return Ok(());
        };

        match choice.to_lowercase().as_str() {
            "" => continue,
            "exit" | "back" | "0" => return Ok(()),
            "clear" => {
                ui::print_warning("This will permanently delete ALL saved conversations.");
                let Some(answer) = console.read_line("Type 'yes' to confirm:")? else {
                    return Ok(());
                };
                if answer.to_lowercase() == "yes" {
                    log.clear()?;
                    ui::print_success("All conversations deleted.");
                    return Ok(());
                }
                println!("Cancelled.");
            }
            other => match other.parse::<usize>() {
                Ok(n) if n >= 1 && n <= sessions.len() => {
                    replay_session(console, &sessions[n - 1])?;
                }
                _ => ui::print_error("Invalid choice. Please try again."),
            },
        }
    }
}

fn replay_session(console: &mut Console, session: &Session) -> Result<()> {
    ui::rule(&format!("{} — {}", session.module, session.title));
    println!("{}", format!("Recorded {}", session.timestamp).dimmed());
    println!();

    for message in &session.messages {
        match message.role {
            Role::User => ui::print_user(&message.text),
            Role::Model => ui::print_bot(&session.module, &message.text),
        }
    }

    console.read_line("\nPress Enter to return...")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Message;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn seeded_log(temp: &TempDir) -> ChatLog {
        let log = ChatLog::new(temp.path());
        log.save(
            "Study Buddy",
            vec![Message::user("hello"), Message::model("hi there")],
            Some("First"),
        )
        .unwrap();
        log.save(
            "Time Travel",
            vec![Message::user("warp"), Message::model("Pranam")],
            Some("Second"),
        )
        .unwrap();
        log
    }

    fn run_with(input: &str, log: &ChatLog) {
        let mut console = Console::with_reader(Cursor::new(input.to_string()));
        run(&mut console, log).unwrap();
    }

    #[test]
    fn test_replay_then_exit_leaves_sessions_intact() {
        let temp = TempDir::new().unwrap();
        let log = seeded_log(&temp);

        // replay newest, Enter to return, then exit
        run_with("1\n\nexit\n", &log);
        assert_eq!(log.load().records().len(), 2);
    }

    #[test]
    fn test_clear_requires_typed_yes() {
        let temp = TempDir::new().unwrap();
        let log = seeded_log(&temp);

        run_with("clear\nno\nexit\n", &log);
        assert_eq!(log.load().records().len(), 2);

        run_with("clear\nyes\n", &log);
        assert!(log.load().records().is_empty());
    }

    #[test]
    fn test_empty_history_returns_immediately() {
        let temp = TempDir::new().unwrap();
        let log = ChatLog::new(temp.path());

        // No input needed: the browser bails before the prompt
        run_with("", &log);
    }

    #[test]
    fn test_out_of_range_choice_reprompts() {
        let temp = TempDir::new().unwrap();
        let log = seeded_log(&temp);

        run_with("99\nexit\n", &log);
        assert_eq!(log.load().records().len(), 2);
    }
}
