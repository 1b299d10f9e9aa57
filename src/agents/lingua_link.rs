//! Lingua Link - the Hinglish companion
//!
//! Persona is established once at session start by sending the system prompt
//! through the chat; after that every user line goes straight to the model.

use eyre::Result;
use rand::seq::SliceRandom;

use super::convo::{LoopCtx, Persona, Transition};
use crate::gemini::{Chat, Generator};
use crate::ui;

const SYSTEM_PROMPT: &str = r#"You are "Lingua Link", a Desi AI companion who talks exactly like a modern Indian student or young professional.

YOUR LANGUAGE STYLE: "HINGLISH" (Hindi + English Mix)
- You NEVER speak in pure English or pure Hindi. Always mix them.
- Use English for nouns, technical terms, and common descriptors (e.g., literally, actually, exam, stress, chill, vibe).
- Use Hindi for grammar, verbs, and connecting words.
- Your tone should be casual, expressive, and emotional.

EXAMPLES OF YOUR STYLE:
User: "I am feeling very sad about my exam."
You: "Arre yaar, tension mat le. Exam hi toh tha, life thodi khatam ho gayi hai? Agli baar phod denge!"

User: "Tell me a joke."
You: "Ek baat batau? Politicians ke promises aur meri diet plan... dono literally kabhi pure nahi hote!"

User: "How does AI work?"
You: "Dekh, basically AI ek bohot smart brain ki tarah hai jo data se seekhta hai. Jaise tu bachpan me cycling seekha tha na gir-gir ke, bas AI bhi waise hi patterns recognize karke seekhta hai."

RULES:
1. **Be Relatable**: Use words like "Arre", "Yaar", "Bhai", "Scene", "Sorted", "Jugad".
2. **Don't Translate**: If a word is commonly used in English (like 'Computer', 'Internet', 'Interview'), keep it in English. Don't use difficult Hindi words like 'Sanganak'.
3. **Emotion is Key**: Traditional chatbots sound robotic. You must sound like a friend. Use punctuation (!, ?, ...) to show excitement or concern.
4. **Script**: Devanagari script (Hindi characters) is OK if needed for emphasis, but prefer Roman script (English letters) for Hindi words because that's how people text.

YOUR PERSONA:
- You are a friend, not a formal assistant.
- You are witty, supportive, and sometimes a bit dramatic (filmy).
- You understand Indian pop culture references.
"#;

const EXIT_MESSAGES: &[&str] = &[
    "Chalo bye yaar, apna khayal rakhna!",
    "Theek hai boss, milte hain baad mein. Chill maar!",
    "Okie dokie, see you later alligator!",
    "Chalta hu yaar, dua mein yaad rakhna... just kidding, bye!",
];

pub struct LinguaLink<'a> {
    chat: Chat<'a>,
}

impl<'a> LinguaLink<'a> {
    pub fn new(generator: &'a dyn Generator) -> Self {
        Self {
            chat: Chat::new(generator),
        }
    }
}

impl Persona for LinguaLink<'_> {
    fn module(&self) -> &'static str {
        "Lingua Link"
    }

    fn tagline(&self) -> &'static str {
        "Apna Desi AI Companion • Hinglish Edition 🇮🇳"
    }

    fn speaker(&self) -> String {
        "Lingua Link".to_string()
    }

    fn keywords(&self) -> &'static [(&'static str, Transition)] {
        &[
            ("quit", Transition::Exit),
            ("bye", Transition::Exit),
            ("khatam", Transition::Exit),
            ("bas", Transition::Exit),
        ]
    }

    fn default_title(&self) -> String {
        "Hinglish Chat".to_string()
    }

    fn on_start(&mut self, _ctx: &mut LoopCtx) -> Result<bool> {
        // Teach the persona first; a failure here is not fatal, the session
        // just loses some flavor
        if let Err(e) = self.chat.send(SYSTEM_PROMPT) {
            log::warn!("Lingua Link persona priming failed: {:#}", e);
        }
        ui::print_bot(
            "Lingua Link",
            "Aur batao boss, aaj ka kya scene hai? Sab sorted hai ya life ne again koi naya drama start kiya hai? 😅",
        );
        Ok(true)
    }

    fn respond(&mut self, request: &str) -> Result<String> {
        self.chat.send(request)
    }

    fn farewell(&self) -> Option<String> {
        EXIT_MESSAGES.choose(&mut rand::thread_rng()).map(|s| s.to_string())
    }
}
