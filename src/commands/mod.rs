pub mod chat;
pub mod completions;
pub mod config;
pub mod doctor;
pub mod history;
pub mod snippets;
