//! Saved chat sessions
//!
//! One JSON array in `chat_history.json`. Sessions are append-only once
//! written; the only destructive operation is clearing the whole file.

use chrono::Local;
use eyre::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::{LoadOutcome, load_collection, write_collection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// One saved transcript of one interaction with one agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Creation instant, RFC 3339
    pub id: String,
    /// Display form of the creation instant
    pub timestamp: String,
    /// Agent the session belongs to
    pub module: String,
    pub title: String,
    pub messages: Vec<Message>,
}

/// Store for saved chat sessions
pub struct ChatLog {
    path: PathBuf,
}

impl ChatLog {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join("chat_history.json"),
        }
    }

    /// Append one session. An empty transcript is a no-op. When no title is
    /// given the first user message becomes the title, truncated to 30 chars.
    pub fn save(&self, module: &str, messages: Vec<Message>, title: Option<&str>) -> Result<()> {
        if messages.is_empty() {
            return Ok(());
        }

        let outcome = self.load();
        if outcome.is_corrupt() {
            log::warn!("chat history was corrupt; starting a fresh collection");
        }
        let mut sessions = outcome.records();

        let now = Local::now();
        let title = match title {
            Some(t) if !t.trim().is_empty() => t.trim().to_string(),
            _ => default_title(&messages),
        };

        sessions.push(Session {
            id: now.to_rfc3339(),
            timestamp: now.format("%Y-%m-%d %H:%M").to_string(),
            module: module.to_string(),
            title,
            messages,
        });

        write_collection(&self.path, &sessions)
    }

    pub fn load(&self) -> LoadOutcome<Session> {
        load_collection(&self.path)
    }

    /// Delete all saved sessions
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn default_title(messages: &[Message]) -> String {
    let first = messages
        .iter()
        .find(|m| m.role == Role::User)
        .map(|m| m.text.as_str())
        .unwrap_or("No Title");

    if first.chars().count() > 30 {
        let head: String = first.chars().take(30).collect();
        format!("{}...", head)
    } else {
        first.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_appends_one_record_and_preserves_prior() {
        let temp = TempDir::new().unwrap();
        let log = ChatLog::new(temp.path());

        log.save("Study Buddy", vec![Message::user("hi"), Message::model("hello")], None)
            .unwrap();

        let before = log.load().records();
        assert_eq!(before.len(), 1);
        let first_json = serde_json::to_string(&before[0]).unwrap();

        log.save("Lingua Link", vec![Message::user("aur batao")], Some("Chat"))
            .unwrap();

        let after = log.load().records();
        assert_eq!(after.len(), 2);
        assert_eq!(serde_json::to_string(&after[0]).unwrap(), first_json);
    }

    #[test]
    fn test_coding_session_roundtrip() {
        let temp = TempDir::new().unwrap();
        let log = ChatLog::new(temp.path());

        let messages = vec![Message::user("debug this"), Message::model("fixed it")];
        log.save("Code Made Easy", messages, Some("Coding Session")).unwrap();

        let sessions = log.load().records();
        let last = sessions.last().unwrap();
        assert_eq!(last.module, "Code Made Easy");
        assert_eq!(last.title, "Coding Session");
        assert_eq!(last.messages.len(), 2);
    }

    #[test]
    fn test_empty_transcript_is_noop() {
        let temp = TempDir::new().unwrap();
        let log = ChatLog::new(temp.path());

        log.save("Study Buddy", Vec::new(), None).unwrap();
        assert!(matches!(log.load(), LoadOutcome::Missing));
    }

    #[test]
    fn test_default_title_truncates_first_user_message() {
        let messages = vec![
            Message::model("greeting first"),
            Message::user("this message is considerably longer than thirty characters"),
        ];
        let title = default_title(&messages);
        assert_eq!(title.chars().count(), 33);
        assert!(title.ends_with("..."));
        assert!(title.starts_with("this message"));
    }

    #[test]
    fn test_default_title_short_message_kept_whole() {
        let messages = vec![Message::user("short one")];
        assert_eq!(default_title(&messages), "short one");
    }

    #[test]
    fn test_blank_title_falls_back_to_default() {
        let temp = TempDir::new().unwrap();
        let log = ChatLog::new(temp.path());

        log.save("Time Travel", vec![Message::user("what year is it")], Some("   "))
            .unwrap();
        assert_eq!(log.load().records()[0].title, "what year is it");
    }

    #[test]
    fn test_corrupt_history_loads_empty_and_is_tagged() {
        let temp = TempDir::new().unwrap();
        let log = ChatLog::new(temp.path());
        std::fs::write(log.path(), "[{ broken").unwrap();

        let outcome = log.load();
        assert!(outcome.is_corrupt());
        assert!(outcome.records().is_empty());
    }

    #[test]
    fn test_clear_removes_file() {
        let temp = TempDir::new().unwrap();
        let log = ChatLog::new(temp.path());

        log.save("Study Buddy", vec![Message::user("hi")], None).unwrap();
        log.clear().unwrap();
        assert!(matches!(log.load(), LoadOutcome::Missing));
        // Clearing twice is fine
        log.clear().unwrap();
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Message::user("x")).unwrap();
        assert_eq!(json, r#"{"role":"user","text":"x"}"#);
    }
}
