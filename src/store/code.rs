//! Bug history and saved code snippets for Code Made Easy
//!
//! Both collections are append-only lists; records are never edited or
//! removed individually.

use chrono::Local;
use eyre::Result;
use lazy_regex::regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::{LoadOutcome, load_collection, write_collection};

/// One detected issue, extracted from a debugger analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BugRecord {
    pub date: String,
    pub language: String,
    pub error_type: String,
    pub mistake: String,
    pub wrong_code: String,
    pub correct_code: String,
    pub explanation: String,
}

/// One snippet saved from the generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedCode {
    pub date: String,
    pub language: String,
    pub code: String,
    pub description: String,
}

impl SavedCode {
    pub fn new(language: &str, code: &str, description: &str) -> Self {
        Self {
            date: Local::now().format("%Y-%m-%d").to_string(),
            language: language.to_string(),
            code: code.to_string(),
            description: description.to_string(),
        }
    }
}

/// Store for bug records (`bug_history.json`)
pub struct BugStore {
    path: PathBuf,
}

impl BugStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join("bug_history.json"),
        }
    }

    pub fn add_all(&self, records: Vec<BugRecord>) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        let mut bugs = self.load().records();
        bugs.extend(records);
        write_collection(&self.path, &bugs)
    }

    pub fn load(&self) -> LoadOutcome<BugRecord> {
        load_collection(&self.path)
    }
}

/// Store for saved snippets (`saved_codes.json`)
pub struct CodeStore {
    path: PathBuf,
}

impl CodeStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join("saved_codes.json"),
        }
    }

    pub fn add(&self, snippet: SavedCode) -> Result<()> {
        let mut codes = self.load().records();
        codes.push(snippet);
        write_collection(&self.path, &codes)
    }

    pub fn load(&self) -> LoadOutcome<SavedCode> {
        load_collection(&self.path)
    }
}

/// Best-effort extraction of bug records from the debugger's strict reply
/// format. An analysis that does not follow the format yields no records;
/// the transcript still shows the full reply either way.
pub fn bugs_from_analysis(language: &str, wrong_code: &str, analysis: &str) -> Vec<BugRecord> {
    let date = Local::now().format("%Y-%m-%d").to_string();

    let correct_code = first_code_block(analysis).unwrap_or_default();
    let explanation = fixes_section(analysis);

    let mut records = Vec::new();
    let mut in_errors = false;
    for line in analysis.lines() {
        let trimmed = line.trim();
        if trimmed.contains("Errors Found") {
            in_errors = true;
            continue;
        }
        if in_errors {
            if let Some(caps) = regex!(r"^\d+\.\s*(.+)$").captures(trimmed) {
                let body = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
                let (error_type, mistake) = split_error_line(body);
                records.push(BugRecord {
                    date: date.clone(),
                    language: language.to_string(),
                    error_type,
                    mistake,
                    wrong_code: wrong_code.to_string(),
                    correct_code: correct_code.clone(),
                    explanation: explanation.clone(),
                });
            } else if !trimmed.is_empty() {
                // Next section started
                in_errors = false;
            }
        }
    }

    records
}

/// "Error type – short reason" into its two halves; the whole line becomes
/// the type when no separator is present
fn split_error_line(line: &str) -> (String, String) {
    for sep in ["–", " - ", ":"] {
        if let Some((kind, reason)) = line.split_once(sep) {
            return (kind.trim().to_string(), reason.trim().to_string());
        }
    }
    (line.trim().to_string(), String::new())
}

/// Contents of the first fenced code block, if any
fn first_code_block(text: &str) -> Option<String> {
    let caps = regex!(r"```[a-zA-Z0-9+#_-]*\n((?s).*?)```").captures(text)?;
    Some(caps.get(1)?.as_str().trim_end().to_string())
}

/// Bullet lines under the "Fixes" heading, joined
fn fixes_section(text: &str) -> String {
    let mut in_fixes = false;
    let mut fixes = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.contains("Fixes") {
            in_fixes = true;
            continue;
        }
        if in_fixes {
            if let Some(item) = trimmed.strip_prefix("- ") {
                fixes.push(item.trim().to_string());
            } else if !trimmed.is_empty() {
                break;
            }
        }
    }
    fixes.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const ANALYSIS: &str = "❌ Errors Found\n\
        1. TypeError – mixing str and int\n\
        2. IndexError – off-by-one in loop bound\n\
        \n\
        🛠️ Fixes\n\
        - Cast n to str before concatenation\n\
        - Use range(len(xs))\n\
        \n\
        ✅ Corrected Code\n\
        ```python\n\
        print(\"total: \" + str(n))\n\
        ```\n";

    #[test]
    fn test_parse_analysis_into_records() {
        let records = bugs_from_analysis("Python", "print('total: ' + n)", ANALYSIS);
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].error_type, "TypeError");
        assert_eq!(records[0].mistake, "mixing str and int");
        assert_eq!(records[0].language, "Python");
        assert_eq!(records[0].wrong_code, "print('total: ' + n)");
        assert_eq!(records[0].correct_code, "print(\"total: \" + str(n))");
        assert!(records[0].explanation.contains("Cast n to str"));

        assert_eq!(records[1].error_type, "IndexError");
    }

    #[test]
    fn test_freeform_analysis_yields_nothing() {
        let records = bugs_from_analysis("Rust", "fn main(){}", "Looks fine to me, nice code!");
        assert!(records.is_empty());
    }

    #[test]
    fn test_split_error_line_without_separator() {
        let (kind, reason) = split_error_line("SyntaxError");
        assert_eq!(kind, "SyntaxError");
        assert!(reason.is_empty());
    }

    #[test]
    fn test_bug_store_appends() {
        let temp = TempDir::new().unwrap();
        let store = BugStore::new(temp.path());

        let records = bugs_from_analysis("Python", "x", ANALYSIS);
        store.add_all(records).unwrap();
        store
            .add_all(bugs_from_analysis("Python", "y", ANALYSIS))
            .unwrap();

        assert_eq!(store.load().records().len(), 4);
    }

    #[test]
    fn test_bug_store_empty_batch_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let store = BugStore::new(temp.path());
        store.add_all(Vec::new()).unwrap();
        assert!(matches!(store.load(), LoadOutcome::Missing));
    }

    #[test]
    fn test_code_store_roundtrip() {
        let temp = TempDir::new().unwrap();
        let store = CodeStore::new(temp.path());

        store.add(SavedCode::new("Python", "print(1)", "one-liner")).unwrap();
        let codes = store.load().records();
        assert_eq!(codes.len(), 1);
        assert_eq!(codes[0].description, "one-liner");
    }

    #[test]
    fn test_corrupt_bug_history_loads_empty() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("bug_history.json"), "no").unwrap();
        let store = BugStore::new(temp.path());
        assert!(store.load().is_corrupt());
    }
}
