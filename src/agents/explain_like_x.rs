//! Explain Like X - creative explanation engine
//!
//! Two-stage input: first the topic, then the style to explain it in.
//! Each explanation runs on a fresh primed chat so styles never bleed into
//! each other.

use eyre::Result;
use rand::seq::SliceRandom;

use super::convo::{LoopCtx, Persona, Transition};
use crate::gemini::{Chat, Generator};
use crate::ui;

const SYSTEM_PROMPT: &str = r#"SYSTEM PROMPT: CREATIVE EXPLANATION ENGINE
You are an Explanation Engine specialized in explaining topics through creative, context-specific styles and personas.
Your task is to explain a given Topic using a specified Style or Perspective so naturally that it feels like the explanation truly comes from someone who embodies that style.

INPUT FORMAT YOU WILL RECEIVE
Topic: The subject that needs to be explained
Style: The persona, perspective, tone, or framing to explain from

CORE INSTRUCTIONS (MANDATORY)
Explain the Topic strictly through the lens of the requested Style.
Fully adapt your Tone, Vocabulary, Metaphors, Examples, Sentence structure to match the Style.

Do NOT explain, describe, or reference the Style itself — only use it implicitly.
Use analogies, storytelling, imagery, or framing that the Style would naturally use.

If the Style implies simplicity (e.g., "explain like I'm five"):
- Avoid jargon
- Use very simple words and short sentences

If the Style implies a character, profession, or persona:
- Fully adopt that voice
- Think and speak as they would

Never mention prompts or instructions.
OUTPUT REQUIREMENTS
The explanation must feel authentic, not mechanical.
It should sound like it was created by someone who genuinely lives in or embodies the requested Style.
"#;

const STYLES: &[&str] = &[
    "A 5-year-old child",
    "A Grumpy Old Man",
    "A Pirate Captain",
    "Shakespeare",
    "A Gen Z TikToker",
    "A Gordon Ramsay-style Chef",
    "A Caveman",
    "A Cyberpunk Hacker",
    "A Harry Potter Wizard",
    "A Stand-up Comedian",
    "A Noir Detective",
    "A Sci-Fi AI",
];

pub struct ExplainLikeX<'a> {
    generator: &'a dyn Generator,
    topic: String,
    style: String,
}

impl<'a> ExplainLikeX<'a> {
    pub fn new(generator: &'a dyn Generator) -> Self {
        Self {
            generator,
            topic: String::new(),
            style: String::new(),
        }
    }

    fn pick_style(&mut self, ctx: &mut LoopCtx) -> Result<Option<String>> {
        println!();
        println!("🎭 Choose a Style or Persona:");
        let mut rng = rand::thread_rng();
        let suggestions: Vec<&str> = STYLES.choose_multiple(&mut rng, 4).copied().collect();
        ui::print_hint(&format!("Suggestions: {}", suggestions.join(", ")));
        ui::print_hint("(Or type 'random' for a surprise!)");

        let Some(style) = ctx.console.read_line("▸")? else {
            return Ok(None);
        };

        let style = if style.is_empty() {
            let fallback = "A 5-year-old child";
            println!("Defaulting to: {}", fallback);
            fallback.to_string()
        } else if style.to_lowercase() == "random" {
            let surprise = STYLES.choose(&mut rng).copied().unwrap_or("A 5-year-old child");
            println!("🎲 Random Style: {}", surprise);
            surprise.to_string()
        } else {
            style
        };

        Ok(Some(style))
    }
}

impl Persona for ExplainLikeX<'_> {
    fn module(&self) -> &'static str {
        "Explain Like X"
    }

    fn tagline(&self) -> &'static str {
        "Any Topic • Any Persona • Unlimited Creativity 🎭"
    }

    fn speaker(&self) -> String {
        if self.style.is_empty() {
            "Explanation Engine".to_string()
        } else {
            self.style.clone()
        }
    }

    fn keywords(&self) -> &'static [(&'static str, Transition)] {
        &[("quit", Transition::Exit), ("menu", Transition::Exit)]
    }

    fn ask(&self) -> Option<&'static str> {
        Some("📝 What topic do you want explained?")
    }

    fn default_title(&self) -> String {
        "Explanations".to_string()
    }

    fn gather(&mut self, input: String, ctx: &mut LoopCtx) -> Result<Option<String>> {
        let Some(style) = self.pick_style(ctx)? else {
            return Ok(None);
        };
        self.topic = input;
        self.style = style;
        Ok(Some(format!("Explain '{}' as '{}'", self.topic, self.style)))
    }

    fn respond(&mut self, _request: &str) -> Result<String> {
        let mut chat = Chat::primed(
            self.generator,
            SYSTEM_PROMPT,
            "Understood. I am ready to act as the Creative Explanation Engine.",
        );
        chat.send(&format!("Topic: {}\nStyle: {}\n", self.topic, self.style))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::convo::run_loop;
    use crate::gemini::testing::ScriptedGenerator;
    use crate::store::ChatLog;
    use crate::ui::{Console, Silent};
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn test_topic_and_style_flow_saved_as_one_request() {
        let temp = TempDir::new().unwrap();
        let log = ChatLog::new(temp.path());
        let generator = ScriptedGenerator::new(&["Arr, gravity be the sea's pull!"]);

        let mut engine = ExplainLikeX::new(&generator);
        let mut console = Console::with_reader(Cursor::new("gravity\nA Pirate Captain\nexit\ny\n\n".to_string()));
        run_loop(&mut engine, &mut console, &Silent, &log).unwrap();

        let sessions = log.load().records();
        assert_eq!(sessions[0].messages[0].text, "Explain 'gravity' as 'A Pirate Captain'");
        assert_eq!(sessions[0].messages[1].text, "Arr, gravity be the sea's pull!");
        assert_eq!(generator.call_count(), 1);
    }

    #[test]
    fn test_eof_during_style_discards_turn() {
        let temp = TempDir::new().unwrap();
        let log = ChatLog::new(temp.path());
        let generator = ScriptedGenerator::new(&[]);

        let mut engine = ExplainLikeX::new(&generator);
        let mut console = Console::with_reader(Cursor::new("gravity\n".to_string()));
        run_loop(&mut engine, &mut console, &Silent, &log).unwrap();

        assert_eq!(generator.call_count(), 0);
        assert!(log.load().records().is_empty());
    }

    #[test]
    fn test_empty_style_defaults() {
        let temp = TempDir::new().unwrap();
        let log = ChatLog::new(temp.path());
        let generator = ScriptedGenerator::new(&["simple words"]);

        let mut engine = ExplainLikeX::new(&generator);
        let mut console = Console::with_reader(Cursor::new("rainbows\n\nexit\nn\n".to_string()));
        run_loop(&mut engine, &mut console, &Silent, &log).unwrap();

        assert_eq!(engine.style, "A 5-year-old child");
    }
}
