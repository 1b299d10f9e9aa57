//! Terminal input/output helpers
//!
//! All user-facing text goes through here so the agents stay free of
//! formatting concerns. Input is read through `Console`, which wraps any
//! `BufRead` so interaction loops can be driven from a script in tests.

use colored::*;
use eyre::{Context, Result};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::Command;

use crate::config::SpeechConfig;

/// Line-oriented input source for the interactive loops
pub struct Console {
    input: Box<dyn BufRead>,
}

impl Console {
    /// Console reading from the process stdin
    pub fn stdin() -> Self {
        Self {
            input: Box::new(BufReader::new(std::io::stdin())),
        }
    }

    /// Console reading from an arbitrary reader (scripted input in tests)
    pub fn with_reader<R: BufRead + 'static>(reader: R) -> Self {
        Self {
            input: Box::new(reader),
        }
    }

    /// Prompt and read one trimmed line. Returns None on end of input,
    /// which every caller treats as `exit`.
    pub fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        if !prompt.is_empty() {
            print!("{} ", prompt);
            std::io::stdout().flush().ok();
        }

        let mut line = String::new();
        let n = self.input.read_line(&mut line).context("Failed to read input")?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Yes/no confirmation; EOF and anything but y/yes count as no
    pub fn confirm(&mut self, prompt: &str) -> Result<bool> {
        let answer = self.read_line(prompt)?.unwrap_or_default().to_lowercase();
        Ok(matches!(answer.as_str(), "y" | "yes"))
    }

    /// Read lines until a lone `END`, preserving indentation.
    /// Returns None on EOF before any content.
    pub fn read_multiline(&mut self, prompt: &str) -> Result<Option<String>> {
        println!("{}", prompt.bold());
        println!("{}", "(Type 'END' on a new line to finish)".dimmed());

        let mut lines = Vec::new();
        loop {
            print!("{} ", ">".dimmed());
            std::io::stdout().flush().ok();

            let mut line = String::new();
            let n = self.input.read_line(&mut line).context("Failed to read input")?;
            if n == 0 {
                if lines.is_empty() {
                    return Ok(None);
                }
                break;
            }
            let line = line.trim_end_matches(['\n', '\r']);
            if line.trim() == "END" {
                break;
            }
            lines.push(line.to_string());
        }
        Ok(Some(lines.join("\n")))
    }
}

/// Rule width follows the terminal, clamped so panels stay readable
fn rule_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(72)
        .min(72)
}

pub fn rule(label: &str) {
    let width = rule_width();
    if label.is_empty() {
        println!("{}", "─".repeat(width).dimmed());
        return;
    }
    let pad = width.saturating_sub(label.len() + 6) / 2;
    println!("{} {} {}", "─".repeat(pad).dimmed(), label.cyan().bold(), "─".repeat(pad).dimmed());
}

pub fn clear_screen() {
    // ANSI clear + cursor home
    print!("\x1b[2J\x1b[H");
    std::io::stdout().flush().ok();
}

pub fn banner(name: &str, tagline: &str) {
    println!();
    rule("");
    println!("  {}", name.cyan().bold());
    println!("  {}", tagline.dimmed());
    rule("");
}

pub fn print_user(text: &str) {
    println!();
    println!("{} {}", "You ▸".green().bold(), text);
}

pub fn print_bot(title: &str, text: &str) {
    println!();
    println!("{}", format!("{} ▸", title).magenta().bold());
    for line in text.lines() {
        println!("  {}", line);
    }
    println!();
}

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

pub fn print_warning(msg: &str) {
    // stderr, so warnings never pollute piped JSON/YAML output
    eprintln!("{} {}", "⚠".yellow(), msg);
}

pub fn print_hint(msg: &str) {
    println!("{}", msg.dimmed().italic());
}

/// Spoken-reply capability handed to the interaction loops.
/// The default is silent; a command-backed voice is wired up only when
/// speech is enabled in config and a TTS binary is actually present.
pub trait Voice {
    fn speak(&self, text: &str);
}

/// No-op voice
pub struct Silent;

impl Voice for Silent {
    fn speak(&self, _text: &str) {}
}

/// Voice backed by a local TTS binary (`say` on macOS, `espeak` elsewhere)
pub struct CommandVoice {
    program: PathBuf,
}

impl CommandVoice {
    fn probe(config: &SpeechConfig) -> Option<PathBuf> {
        if let Some(cmd) = &config.command {
            return which::which(cmd).ok();
        }
        ["say", "espeak-ng", "espeak"]
            .iter()
            .find_map(|candidate| which::which(candidate).ok())
    }
}

impl Voice for CommandVoice {
    fn speak(&self, text: &str) {
        // Best effort only; a missing or failing binary never disturbs the chat
        match Command::new(&self.program).arg(text).status() {
            Ok(status) if status.success() => {}
            Ok(status) => log::warn!("TTS command exited with {}", status),
            Err(e) => log::warn!("TTS command failed: {}", e),
        }
    }
}

/// Build the voice capability for this run
pub fn voice_from_config(config: &SpeechConfig) -> Box<dyn Voice> {
    if !config.enabled {
        return Box::new(Silent);
    }
    match CommandVoice::probe(config) {
        Some(program) => {
            log::info!("Speech enabled via {}", program.display());
            Box::new(CommandVoice { program })
        }
        None => {
            log::warn!("Speech enabled in config but no TTS binary found");
            Box::new(Silent)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_line_trims() {
        let mut console = Console::with_reader(Cursor::new("  hello world  \n"));
        let line = console.read_line("").unwrap();
        assert_eq!(line, Some("hello world".to_string()));
    }

    #[test]
    fn test_read_line_eof() {
        let mut console = Console::with_reader(Cursor::new(""));
        assert_eq!(console.read_line("").unwrap(), None);
    }

    #[test]
    fn test_confirm_accepts_y_and_yes() {
        let mut console = Console::with_reader(Cursor::new("y\nyes\nno\n"));
        assert!(console.confirm("?").unwrap());
        assert!(console.confirm("?").unwrap());
        assert!(!console.confirm("?").unwrap());
    }

    #[test]
    fn test_confirm_eof_is_no() {
        let mut console = Console::with_reader(Cursor::new(""));
        assert!(!console.confirm("?").unwrap());
    }

    #[test]
    fn test_read_multiline_until_end() {
        let mut console = Console::with_reader(Cursor::new("fn main() {\n    body();\n}\nEND\n"));
        let code = console.read_multiline("Paste code:").unwrap();
        assert_eq!(code, Some("fn main() {\n    body();\n}".to_string()));
    }

    #[test]
    fn test_read_multiline_eof_before_content() {
        let mut console = Console::with_reader(Cursor::new(""));
        assert_eq!(console.read_multiline("Paste code:").unwrap(), None);
    }

    #[test]
    fn test_silent_voice_is_noop() {
        Silent.speak("nothing happens");
    }
}
