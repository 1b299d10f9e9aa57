//! Gemini generation client
//!
//! One synchronous call-and-return boundary to the generateContent REST
//! endpoint. Conversation state is the full turn history, replayed on every
//! request. Transport, quota, and safety failures all surface as one error
//! path; callers show them inline and keep their loop running.

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};

/// One piece of a turn (text only; this client never sends media)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

/// One conversation turn as the API sees it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![Part { text: text.into() }],
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: "model".to_string(),
            parts: vec![Part { text: text.into() }],
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: &'a [Content],
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

/// Seam between the interaction loops and the hosted service, so agents can
/// be exercised against a scripted generator in tests.
pub trait Generator {
    /// Produce the next model turn for the given conversation
    fn generate(&self, contents: &[Content]) -> Result<String>;
}

/// Client for the hosted Gemini API
pub struct GeminiClient {
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self { api_key, model }
    }

    /// One-word round trip to verify the key works before entering the menu
    pub fn ping(&self) -> Result<()> {
        self.generate(&[Content::user("Say 'ready' in one word.")])
            .map(|_| ())
    }
}

impl Generator for GeminiClient {
    fn generate(&self, contents: &[Content]) -> Result<String> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        );

        let request_body =
            serde_json::to_string(&GenerateRequest { contents }).context("Failed to serialize request")?;

        log::debug!("Calling Gemini model {} with {} turns", self.model, contents.len());

        let mut response = ureq::post(&url)
            .header("Content-Type", "application/json")
            .send(request_body.as_bytes())
            .context("Failed to call Gemini API")?;

        let response_body = response
            .body_mut()
            .read_to_string()
            .context("Failed to read response")?;

        parse_reply(&response_body)
    }
}

/// Pull the reply text out of a generateContent response body
fn parse_reply(body: &str) -> Result<String> {
    let response: GenerateResponse = serde_json::from_str(body).context("Failed to parse Gemini response")?;

    let text = response
        .candidates
        .first()
        .map(|c| {
            c.content
                .parts
                .iter()
                .map(|p| p.text.as_str())
                .collect::<Vec<_>>()
                .join("")
        })
        .filter(|t| !t.is_empty())
        .ok_or_else(|| eyre::eyre!("No text in Gemini response"))?;

    Ok(text.trim().to_string())
}

/// A running conversation against a generator
pub struct Chat<'a> {
    generator: &'a dyn Generator,
    history: Vec<Content>,
}

impl<'a> Chat<'a> {
    /// Fresh conversation with no prior turns
    pub fn new(generator: &'a dyn Generator) -> Self {
        Self {
            generator,
            history: Vec::new(),
        }
    }

    /// Conversation primed with a system prompt and a canned acknowledgment,
    /// the way the personas establish their identity before the first turn
    pub fn primed(generator: &'a dyn Generator, system_prompt: &str, ack: &str) -> Self {
        Self {
            generator,
            history: vec![Content::user(system_prompt), Content::model(ack)],
        }
    }

    /// Send one user message and record both sides of the exchange.
    /// On failure the user turn is withdrawn so the history stays a valid
    /// alternating sequence.
    pub fn send(&mut self, text: &str) -> Result<String> {
        self.history.push(Content::user(text));
        match self.generator.generate(&self.history) {
            Ok(reply) => {
                self.history.push(Content::model(reply.clone()));
                Ok(reply)
            }
            Err(e) => {
                self.history.pop();
                Err(e)
            }
        }
    }

    pub fn history(&self) -> &[Content] {
        &self.history
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[test]
    fn test_request_shape() {
        let contents = vec![Content::user("hi")];
        let body = serde_json::to_string(&GenerateRequest { contents: &contents }).unwrap();
        assert_eq!(body, r#"{"contents":[{"role":"user","parts":[{"text":"hi"}]}]}"#);
    }

    #[test]
    fn test_parse_reply() {
        let body = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "Hello "}, {"text": "there"}]}}
            ]
        }"#;
        assert_eq!(parse_reply(body).unwrap(), "Hello there");
    }

    #[test]
    fn test_parse_reply_no_candidates() {
        assert!(parse_reply(r#"{"candidates": []}"#).is_err());
    }

    #[test]
    fn test_parse_reply_malformed() {
        assert!(parse_reply("not json").is_err());
    }

    #[test]
    fn test_chat_records_both_sides() {
        let generator = ScriptedGenerator::new(&["reply one"]);
        let mut chat = Chat::new(&generator);
        let reply = chat.send("hello").unwrap();
        assert_eq!(reply, "reply one");
        assert_eq!(chat.history().len(), 2);
        assert_eq!(chat.history()[0].role, "user");
        assert_eq!(chat.history()[1].role, "model");
    }

    #[test]
    fn test_chat_withdraws_turn_on_error() {
        let generator = FailingGenerator;
        let mut chat = Chat::new(&generator);
        assert!(chat.send("hello").is_err());
        assert!(chat.history().is_empty());
    }

    #[test]
    fn test_primed_chat_keeps_primer() {
        let generator = ScriptedGenerator::new(&["ok"]);
        let mut chat = Chat::primed(&generator, "You are a pirate.", "Arr, understood.");
        chat.send("hello").unwrap();
        assert_eq!(chat.history().len(), 4);
        assert_eq!(chat.history()[0].parts[0].text, "You are a pirate.");
    }
}
