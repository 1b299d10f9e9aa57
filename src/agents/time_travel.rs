//! Time Travel Chat - conversations with an Indian citizen of any year
//!
//! The year is asked up front and substituted into the system prompt; the
//! chat is re-primed on every `warp`. Arrival greetings are recorded in the
//! transcript like any other model turn.

use eyre::Result;

use super::convo::{LoopCtx, Persona, Transition, VerbOutcome};
use crate::gemini::{Chat, Generator};
use crate::store::Message;
use crate::ui;

const SYSTEM_PROMPT_TEMPLATE: &str = r#"SYSTEM PROMPT: TIME TRAVEL BOT - INDIA CONTEXT
You are a person living in the INDIAN SUBCONTINENT (Bharat/Hindustan) in the year {YEAR}.
Your identity, knowledge, and worldview are strictly limited to what an Indian person would know in {YEAR}.

LOCATION:
- You are in INDIA.
- Refer to the land as "Bharatvarsh", "Hindustan", "British India", or "India" depending on the era.

LANGUAGE STYLE:
- Speak in a mix of English and Hindi (Roman Script/Hinglish).
- TONE: Maintain the FORMAL language and dignity of that particular time.
- VOCABULARY: Use era-specific terms.
  - Ancient: Sanskrit influence (Pranam, Arya, Dharma, Mitra).
  - Medieval/Mughal: Urdu/Persian influence (Salam, Huzoor, Saltanat).
  - British Raj: "Angrez", "Company Bahadur", "Swaraj", "Azadi".
  - Post-Independence: "Sarkar", "Desh", "Public".
- Do NOT use modern Gen-Z slang (no "bro", "chill", "vibes").

ERA BEHAVIOR MODIFIERS:
- Ancient (Before 1200 AD): Discuss Dharma, Philosophy, Kings (Mauryas, Guptas), and Scriptures.
- Medieval (1200-1750): Discuss the Courts, Art, Invaders, and Bhakti/Sufi movements.
- British Era (1757-1947): Discuss the struggle for freedom, exploitation, Railways, or Loyalty to the Crown (depending on persona).
- Post-1947: Discuss Nation Building, Politics, Cinema, Cricket.
- Future (2025+): Discuss India as a Superpower, Space Missions, Technocracy.

ABSOLUTE RULES:
1. You DO NOT know the future.
2. You believe {YEAR} is the present.
3. Your perspective is strictly INDIAN.
4. If asked about foreign events, interpret them through Indian news/rumors of that time.

active_year: {YEAR}
"#;

pub struct TimeTravel<'a> {
    generator: &'a dyn Generator,
    chat: Option<Chat<'a>>,
    year: Option<String>,
}

impl<'a> TimeTravel<'a> {
    pub fn new(generator: &'a dyn Generator) -> Self {
        Self {
            generator,
            chat: None,
            year: None,
        }
    }

    fn set_year(&mut self, year: &str) {
        let prompt = SYSTEM_PROMPT_TEMPLATE.replace("{YEAR}", year);
        let ack = format!("Pranam. I understand. I am living in India in the year {}.", year);
        self.chat = Some(Chat::primed(self.generator, &prompt, &ack));
        self.year = Some(year.to_string());
    }

    /// Prompt for a year, travel there, and show the arrival greeting.
    /// Returns false when the user backs out instead.
    fn travel(&mut self, ctx: &mut LoopCtx) -> Result<bool> {
        loop {
            ui::print_hint("(Type 'exit' to return)");
            let Some(year) = ctx.console.read_line("📅 Enter a Year (e.g. 1857, 1947, 300 BC):")? else {
                return Ok(false);
            };
            if year.is_empty() {
                continue;
            }
            if matches!(year.to_lowercase().as_str(), "exit" | "quit" | "back") {
                return Ok(false);
            }

            self.set_year(&year);
            ui::print_success(&format!("Arrived in {} (India)!", year));

            let opener = format!("Pranam! What is happening in India in {}?", year);
            match self.respond(&opener) {
                Ok(greeting) => {
                    ui::print_bot(&self.speaker(), &greeting);
                    ctx.transcript.push(Message::model(&greeting));
                    ctx.voice.speak(&greeting);
                }
                Err(e) => {
                    log::warn!("Time Travel arrival greeting failed: {:#}", e);
                    ui::print_warning("The citizen is silent for now; ask them something.");
                }
            }
            return Ok(true);
        }
    }
}

impl Persona for TimeTravel<'_> {
    fn module(&self) -> &'static str {
        "Time Travel"
    }

    fn tagline(&self) -> &'static str {
        "India Through The Ages 🇮🇳 • Ancient → Modern → Future"
    }

    fn speaker(&self) -> String {
        match &self.year {
            Some(year) => format!("Citizen of {}", year),
            None => "Citizen".to_string(),
        }
    }

    fn keywords(&self) -> &'static [(&'static str, Transition)] {
        &[
            ("quit", Transition::Exit),
            ("bye", Transition::Exit),
            ("warp", Transition::Verb("warp")),
        ]
    }

    fn hint(&self) -> &'static str {
        "(Type 'warp' to change year, 'exit' to quit)"
    }

    fn default_title(&self) -> String {
        match &self.year {
            Some(year) => format!("Journey to {}", year),
            None => "Journey".to_string(),
        }
    }

    fn on_start(&mut self, ctx: &mut LoopCtx) -> Result<bool> {
        self.travel(ctx)
    }

    fn respond(&mut self, request: &str) -> Result<String> {
        match self.chat.as_mut() {
            Some(chat) => chat.send(request),
            None => eyre::bail!("no year set"),
        }
    }

    fn on_verb(&mut self, verb: &str, ctx: &mut LoopCtx) -> Result<VerbOutcome> {
        if verb == "warp" {
            // Backing out of a warp keeps the current year and session
            self.travel(ctx)?;
        }
        Ok(VerbOutcome::Stay)
    }
}
