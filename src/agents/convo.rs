//! Shared interaction loop for the chat personas
//!
//! Every chat agent used to duplicate the same read/keyword/respond/save
//! cycle. Here it is once: a persona supplies its keyword table, prompt
//! construction, and any feature verbs; the loop owns the transcript, the
//! inline error display, and the save-on-exit prompt.

use colored::*;
use eyre::Result;

use crate::store::{ChatLog, Message};
use crate::ui::{self, Console, Voice};

/// What a reserved keyword does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Leave the loop (offering to save first)
    Exit,
    /// Clear the screen and re-show the banner
    Clear,
    /// Persona-specific verb, handled by `Persona::on_verb`
    Verb(&'static str),
}

/// Keywords every persona honors
pub const COMMON_KEYWORDS: &[(&str, Transition)] = &[
    ("exit", Transition::Exit),
    ("back", Transition::Exit),
    ("clear", Transition::Clear),
    ("cls", Transition::Clear),
];

fn lookup(table: &[(&str, Transition)], input: &str) -> Option<Transition> {
    COMMON_KEYWORDS
        .iter()
        .chain(table.iter())
        .find(|(kw, _)| *kw == input)
        .map(|(_, t)| *t)
}

/// Outcome of a persona verb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbOutcome {
    Stay,
    Exit,
}

/// Everything a persona callback may touch besides itself
pub struct LoopCtx<'c> {
    pub console: &'c mut Console,
    pub voice: &'c dyn Voice,
    /// Messages recorded for the session transcript
    pub transcript: Vec<Message>,
}

/// One chat persona driven by the shared loop
pub trait Persona {
    /// Module name used in saved sessions and the banner
    fn module(&self) -> &'static str;

    /// Banner tagline
    fn tagline(&self) -> &'static str;

    /// Panel title for model replies
    fn speaker(&self) -> String;

    /// Reserved keywords beyond the common set
    fn keywords(&self) -> &'static [(&'static str, Transition)] {
        &[]
    }

    /// Hint line shown above the input prompt
    fn hint(&self) -> &'static str {
        "(Type 'exit' to go back)"
    }

    /// Question printed before each input read, for personas that ask one
    fn ask(&self) -> Option<&'static str> {
        None
    }

    /// Title used when the user saves without naming the session
    fn default_title(&self) -> String;

    /// One-time setup before the loop; returning false aborts to the menu
    fn on_start(&mut self, ctx: &mut LoopCtx) -> Result<bool> {
        let _ = ctx;
        Ok(true)
    }

    /// Turn raw input into the request sent to the model, possibly prompting
    /// for more (e.g. a style to explain in). None discards the turn.
    fn gather(&mut self, input: String, ctx: &mut LoopCtx) -> Result<Option<String>> {
        let _ = ctx;
        Ok(Some(input))
    }

    /// Produce the model reply for one gathered request
    fn respond(&mut self, request: &str) -> Result<String>;

    /// Handle a persona verb
    fn on_verb(&mut self, verb: &str, ctx: &mut LoopCtx) -> Result<VerbOutcome> {
        let _ = (verb, ctx);
        Ok(VerbOutcome::Stay)
    }

    /// Final line printed when leaving
    fn farewell(&self) -> Option<String> {
        None
    }
}

/// Drive one persona until it exits, then offer to save the transcript
pub fn run_loop(persona: &mut dyn Persona, console: &mut Console, voice: &dyn Voice, log: &ChatLog) -> Result<()> {
    ui::banner(persona.module(), persona.tagline());

    let mut ctx = LoopCtx {
        console,
        voice,
        transcript: Vec::new(),
    };

    if !persona.on_start(&mut ctx)? {
        return Ok(());
    }

    loop {
        if let Some(question) = persona.ask() {
            println!();
            println!("{}", question.cyan().bold());
        }
        ui::print_hint(persona.hint());

        let Some(input) = ctx.console.read_line("▸")? else {
            // End of input unwinds like `exit`
            break;
        };
        if input.is_empty() {
            continue;
        }

        match lookup(persona.keywords(), &input.to_lowercase()) {
            Some(Transition::Exit) => break,
            Some(Transition::Clear) => {
                ui::clear_screen();
                ui::banner(persona.module(), persona.tagline());
                continue;
            }
            Some(Transition::Verb(verb)) => match persona.on_verb(verb, &mut ctx)? {
                VerbOutcome::Stay => continue,
                VerbOutcome::Exit => break,
            },
            None => {}
        }

        let Some(request) = persona.gather(input, &mut ctx)? else {
            continue;
        };

        ctx.transcript.push(Message::user(&request));
        ui::print_user(&request);

        let reply = match persona.respond(&request) {
            Ok(reply) => reply,
            Err(e) => {
                // Transport, quota, and safety failures all land here; the
                // loop keeps running and the failure rides in the transcript
                log::warn!("{}: generation failed: {:#}", persona.module(), e);
                format!("⚠️ Sorry, I ran into an error: {e}\nPlease try again.")
            }
        };

        ui::print_bot(&persona.speaker(), &reply);
        ctx.transcript.push(Message::model(&reply));
        ctx.voice.speak(&reply);
    }

    if let Some(farewell) = persona.farewell() {
        ui::print_bot(&persona.speaker(), &farewell);
    }

    offer_save(persona, &mut ctx, log)
}

fn offer_save(persona: &dyn Persona, ctx: &mut LoopCtx, log: &ChatLog) -> Result<()> {
    if ctx.transcript.is_empty() {
        return Ok(());
    }

    ui::rule("Session Ended");
    if !ctx.console.confirm("💾 Save conversation? (y/n):")? {
        return Ok(());
    }

    let title = ctx.console.read_line("   Title:")?.unwrap_or_default();
    let title = if title.is_empty() { persona.default_title() } else { title };

    log.save(persona.module(), std::mem::take(&mut ctx.transcript), Some(&title))?;
    ui::print_success("Conversation saved!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::testing::{FailingGenerator, ScriptedGenerator};
    use crate::gemini::{Chat, Generator};
    use crate::store::Role;
    use crate::ui::Silent;
    use std::io::Cursor;
    use tempfile::TempDir;

    struct EchoPersona<'a> {
        chat: Chat<'a>,
        verbs_seen: Vec<String>,
    }

    impl<'a> EchoPersona<'a> {
        fn new(generator: &'a dyn Generator) -> Self {
            Self {
                chat: Chat::new(generator),
                verbs_seen: Vec::new(),
            }
        }
    }

    impl Persona for EchoPersona<'_> {
        fn module(&self) -> &'static str {
            "Echo"
        }
        fn tagline(&self) -> &'static str {
            "testing persona"
        }
        fn speaker(&self) -> String {
            "Echo".to_string()
        }
        fn keywords(&self) -> &'static [(&'static str, Transition)] {
            &[("status", Transition::Verb("status"))]
        }
        fn default_title(&self) -> String {
            "Echo Session".to_string()
        }
        fn respond(&mut self, request: &str) -> Result<String> {
            self.chat.send(request)
        }
        fn on_verb(&mut self, verb: &str, _ctx: &mut LoopCtx) -> Result<VerbOutcome> {
            self.verbs_seen.push(verb.to_string());
            Ok(VerbOutcome::Stay)
        }
    }

    fn run_with<'a>(input: &str, generator: &'a dyn Generator, log: &ChatLog) -> EchoPersona<'a> {
        let mut persona = EchoPersona::new(generator);
        let mut console = Console::with_reader(Cursor::new(input.to_string()));
        run_loop(&mut persona, &mut console, &Silent, log).unwrap();
        persona
    }

    #[test]
    fn test_exit_never_calls_generator() {
        let temp = TempDir::new().unwrap();
        let log = ChatLog::new(temp.path());
        let generator = ScriptedGenerator::new(&[]);

        run_with("exit\n", &generator, &log);
        assert_eq!(generator.call_count(), 0);

        run_with("back\n", &generator, &log);
        assert_eq!(generator.call_count(), 0);
    }

    #[test]
    fn test_empty_input_does_not_advance_state() {
        let temp = TempDir::new().unwrap();
        let log = ChatLog::new(temp.path());
        let generator = ScriptedGenerator::new(&[]);

        run_with("\n\n   \nexit\n", &generator, &log);
        assert_eq!(generator.call_count(), 0);
        assert!(log.load().records().is_empty());
    }

    #[test]
    fn test_eof_unwinds_like_exit() {
        let temp = TempDir::new().unwrap();
        let log = ChatLog::new(temp.path());
        let generator = ScriptedGenerator::new(&[]);

        run_with("", &generator, &log);
        assert_eq!(generator.call_count(), 0);
    }

    #[test]
    fn test_turn_then_save_with_title() {
        let temp = TempDir::new().unwrap();
        let log = ChatLog::new(temp.path());
        let generator = ScriptedGenerator::new(&["hi back"]);

        run_with("hello\nexit\ny\nMy Chat\n", &generator, &log);
        assert_eq!(generator.call_count(), 1);

        let sessions = log.load().records();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].module, "Echo");
        assert_eq!(sessions[0].title, "My Chat");
        assert_eq!(sessions[0].messages.len(), 2);
        assert_eq!(sessions[0].messages[0].role, Role::User);
        assert_eq!(sessions[0].messages[1].text, "hi back");
    }

    #[test]
    fn test_save_declined_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let log = ChatLog::new(temp.path());
        let generator = ScriptedGenerator::new(&["hi back"]);

        run_with("hello\nexit\nn\n", &generator, &log);
        assert!(log.load().records().is_empty());
    }

    #[test]
    fn test_blank_title_uses_persona_default() {
        let temp = TempDir::new().unwrap();
        let log = ChatLog::new(temp.path());
        let generator = ScriptedGenerator::new(&["hi back"]);

        run_with("hello\nexit\ny\n\n", &generator, &log);
        assert_eq!(log.load().records()[0].title, "Echo Session");
    }

    #[test]
    fn test_generation_error_is_inline_and_loop_continues() {
        let temp = TempDir::new().unwrap();
        let log = ChatLog::new(temp.path());
        let generator = FailingGenerator;

        run_with("hello\nexit\ny\n\n", &generator, &log);

        let sessions = log.load().records();
        assert_eq!(sessions[0].messages.len(), 2);
        assert!(sessions[0].messages[1].text.contains("error"));
    }

    #[test]
    fn test_verb_dispatch_without_generation() {
        let temp = TempDir::new().unwrap();
        let log = ChatLog::new(temp.path());
        let generator = ScriptedGenerator::new(&[]);

        let persona = run_with("status\nSTATUS\nexit\n", &generator, &log);
        assert_eq!(persona.verbs_seen, vec!["status", "status"]);
        assert_eq!(generator.call_count(), 0);
    }

    #[test]
    fn test_keyword_case_insensitive_exit() {
        let temp = TempDir::new().unwrap();
        let log = ChatLog::new(temp.path());
        let generator = ScriptedGenerator::new(&[]);

        run_with("EXIT\n", &generator, &log);
        assert_eq!(generator.call_count(), 0);
    }
}
