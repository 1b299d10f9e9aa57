//! Future Simulator - decision impact analysis

use eyre::Result;

use super::convo::{Persona, Transition};
use crate::gemini::{Chat, Generator};

const SYSTEM_PROMPT: &str = r#"You are FUTURE SIMULATOR, an advanced AI designed to help humans analyze major life decisions.
Your goal is to provide a balanced, realistic, and structured breakdown of potential outcomes for any decision the user is considering.

YOUR TASK:
When the user inputs a decision (e.g., "Should I drop out of college to start a startup?"), you must analyze it and generate three distinct scenarios:

1. 🌟 BEST CASE SCENARIO
   - The optimistic outcome where everything goes right.
   - High reward, success, and positive impact.

2. ⚠️ WORST CASE SCENARIO
   - The pessimistic outcome where things go wrong.
   - Risks, failure, and negative consequences.

3. ⚖️ REALISTIC / AVERAGE CASE SCENARIO
   - The most likely outcome.
   - A mix of ups and downs, steady progress, or moderate change.

STRUCTURE OF RESPONSE:
For each scenario, provide:
- **Short-term Outcome (0-1 Year)**: immediate effects
- **Long-term Outcome (3-5+ Years)**: lasting impact

ADDITIONAL SECTIONS:
- **🔍 Risk vs Reward Analysis**: A brief summary comparison.
- **💡 Critical Questions**: 2-3 questions the user should ask themselves before deciding.

TONE & STYLE:
- Objective, analytical, yet supportive.
- Do not make the decision for the user.
- Focus on possibilities and probabilities.
- Use clear formatting with emojis for readability.
"#;

pub struct FutureSimulator<'a> {
    chat: Chat<'a>,
}

impl<'a> FutureSimulator<'a> {
    pub fn new(generator: &'a dyn Generator) -> Self {
        Self {
            chat: Chat::primed(generator, SYSTEM_PROMPT, "Understood. I am ready to simulate future scenarios."),
        }
    }
}

impl Persona for FutureSimulator<'_> {
    fn module(&self) -> &'static str {
        "Future Simulator"
    }

    fn tagline(&self) -> &'static str {
        "See Tomorrow Today • Analyze Your Decisions 🔮"
    }

    fn speaker(&self) -> String {
        "Projected Outcomes".to_string()
    }

    fn keywords(&self) -> &'static [(&'static str, Transition)] {
        &[("quit", Transition::Exit), ("menu", Transition::Exit)]
    }

    fn ask(&self) -> Option<&'static str> {
        Some("🤔 What decision acts as the turning point?")
    }

    fn default_title(&self) -> String {
        "Simulation".to_string()
    }

    fn respond(&mut self, request: &str) -> Result<String> {
        self.chat.send(&format!("Decision to analyze: {}", request))
    }
}
