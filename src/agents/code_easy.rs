//! Code Made Easy - debugger, generator, and rater behind one submenu
//!
//! Unlike the chat personas this is menu-driven, so it owns its loop instead
//! of going through `convo::run_loop`. The three tools share one session
//! transcript; the save prompt fires once, on the way back to the main menu.

use colored::*;
use eyre::Result;
use std::path::Path;

use crate::gemini::{Chat, Generator};
use crate::store::{BugStore, ChatLog, CodeStore, Message, SavedCode, bugs_from_analysis};
use crate::ui::{self, Console, Voice};

const DEBUGGER_PROMPT: &str = r#"You are a strict senior code reviewer.
You do not write essays.
You follow output formats exactly.
If the task is code-related, code comes first.

🔹 MODE 1: DEBUG CODE
🎯 Output Goal
Help the user fix code fast, not teach theory.

✅ FORMAT (STRICT)
❌ Errors Found
1. Error type – short reason
2. Error type – short reason

🛠️ Fixes
- Fix 1
- Fix 2

✅ Corrected Code
```language
<ONLY CODE HERE>
```

❌ No long explanations
❌ No theory
❌ No motivational text
"#;

const GENERATOR_PROMPT: &str = r#"You are a strict senior code reviewer.
You do not write essays.
You follow output formats exactly.
Code comes first.

🔹 MODE 2: GENERATE CODE

### 🎯 Output Goal
**CODE FIRST. EVERYTHING ELSE OPTIONAL.**

### ✅ FORMAT (ULTRA STRICT)

```python
<CODE ONLY – 80% of response>
```

🧪 Want changes?
Say: "modify"
Say: "optimize"
Say: "add comments"

❌ No explanation unless user asks
❌ Code must dominate response
"#;

const RATER_PROMPT: &str = r#"You are a strict senior code reviewer.
You do not write essays.
You follow output formats exactly.

🔹 MODE 3: RATE / REVIEW CODE

### 🎯 Output Goal
Pure evaluation. No fluff.

### ✅ FORMAT (STRICT)

📊 Code Rating
Score: X / 10

🟢 Strengths
Point 1
Point 2

🔴 Improvements Needed
Point 1
Point 2

🚫 NOT Recommended For
Use case 1

❌ No rewriting code
❌ No tutorials
"#;

const MODULE: &str = "Code Made Easy";

struct CodeMadeEasy<'a> {
    debugger: Chat<'a>,
    generator: Chat<'a>,
    rater: Chat<'a>,
    bug_store: BugStore,
    code_store: CodeStore,
    transcript: Vec<Message>,
}

/// Run the Code Made Easy submenu until the user backs out
pub fn run(
    generator: &dyn Generator,
    console: &mut Console,
    voice: &dyn Voice,
    log: &ChatLog,
    data_dir: &Path,
) -> Result<()> {
    let mut app = CodeMadeEasy {
        debugger: Chat::new(generator),
        generator: Chat::new(generator),
        rater: Chat::new(generator),
        bug_store: BugStore::new(data_dir),
        code_store: CodeStore::new(data_dir),
        transcript: Vec::new(),
    };

    loop {
        ui::banner(MODULE, "Debug • Generate • Optimize • Like a Pro 💪");
        println!("  [1] 🐛 AI Code Debugger     {}", "Find and fix bugs instantly".dimmed());
        println!("  [2] ⚡ AI Code Generator    {}", "Turn ideas into code".dimmed());
        println!("  [3] ⭐ Rate My Programme    {}", "Get quality scores and feedback".dimmed());
        println!("  [4] 📜 View Bug History     {}", "Review past mistakes".dimmed());
        println!("  [5] 💾 View Saved Codes     {}", "Access your generated snippets".dimmed());
        println!("  [0] 🔙 Back to Main Menu");

        let Some(choice) = console.read_line("▸ Choice:")? else {
            break;
        };

        match choice.to_lowercase().as_str() {
            "1" => app.run_debugger(console, voice)?,
            "2" => app.run_generator(console, voice)?,
            "3" => app.run_rater(console)?,
            "4" => app.view_bug_history(console)?,
            "5" => app.view_saved_codes(console)?,
            "0" | "exit" | "back" => break,
            "" => continue,
            _ => ui::print_error("Invalid choice. Please try again."),
        }
    }

    offer_save(&mut app, console, log)
}

fn offer_save(app: &mut CodeMadeEasy, console: &mut Console, log: &ChatLog) -> Result<()> {
    if app.transcript.is_empty() {
        return Ok(());
    }
    if !console.confirm("💾 Save coding session? (y/n):")? {
        return Ok(());
    }
    let title = console.read_line("   Title:")?.unwrap_or_default();
    let title = if title.is_empty() { "Coding Session".to_string() } else { title };
    log.save(MODULE, std::mem::take(&mut app.transcript), Some(&title))?;
    ui::print_success("Saved!");
    Ok(())
}

/// One call, errors flattened into the reply text (spec: every failure kind
/// rides the same inline path)
fn send_or_inline(chat: &mut Chat, prompt: &str, doing: &str) -> String {
    match chat.send(prompt) {
        Ok(reply) => reply,
        Err(e) => {
            log::warn!("{} failed: {:#}", doing, e);
            format!("⚠️ Error {}: {e}\nPlease try again.", doing)
        }
    }
}

impl CodeMadeEasy<'_> {
    fn record(&mut self, context: &str, user_text: &str, bot_text: &str) {
        self.transcript.push(Message::user(format!("[{}] {}", context, user_text)));
        self.transcript.push(Message::model(bot_text));
    }

    fn run_debugger(&mut self, console: &mut Console, _voice: &dyn Voice) -> Result<()> {
        ui::rule("AI Code Debugger");

        let Some(language) = console.read_line("Language (or 'exit'):")? else {
            return Ok(());
        };
        if language.is_empty() || matches!(language.to_lowercase().as_str(), "exit" | "back") {
            return Ok(());
        }

        let Some(code) = console.read_multiline("Paste your broken code below:")? else {
            return Ok(());
        };
        if code.trim().is_empty() {
            ui::print_error("No code provided.");
            return Ok(());
        }

        let prompt = format!(
            "{}\n\nLANGUAGE: {}\n\nUSER'S CODE TO DEBUG:\n```{}\n{}\n```\n\nPlease analyze this code thoroughly and help the user understand and fix any issues.",
            DEBUGGER_PROMPT, language, language, code
        );

        println!("🔍 Analyzing code for bugs...");
        let analysis = send_or_inline(&mut self.debugger, &prompt, "analyzing code");

        let bugs = bugs_from_analysis(&language, &code, &analysis);
        if !bugs.is_empty() {
            let count = bugs.len();
            self.bug_store.add_all(bugs)?;
            ui::print_success(&format!("Recorded {} bug(s) in your history.", count));
        }

        ui::print_bot("Debugger AI", &analysis);
        self.record("Debugger", &code, &analysis);
        Ok(())
    }

    fn run_generator(&mut self, console: &mut Console, voice: &dyn Voice) -> Result<()> {
        'request: loop {
            ui::rule("AI Code Generator");
            println!("{}", "Describe what you want to build:".bold());
            ui::print_hint("Example: 'Create a Python script that scrapes headlines from news.com'");
            ui::print_hint("(Type 'exit' to go back)");

            let Some(request) = console.read_line("📝 Request:")? else {
                return Ok(());
            };
            if request.is_empty() || matches!(request.to_lowercase().as_str(), "exit" | "back") {
                return Ok(());
            }

            let language = console
                .read_line("💻 Target Language (default: Python):")?
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| "Python".to_string());

            let prompt = format!(
                "{}\n\nTARGET LANGUAGE: {}\n\nUSER'S REQUEST:\n{}\n\nPlease generate complete, working code that fulfills this request.",
                GENERATOR_PROMPT, language, request
            );

            println!("⚡ Generating {} code...", language);
            let mut result = require_code_block(send_or_inline(&mut self.generator, &prompt, "generating code"));

            ui::print_bot("Generator AI", &result);
            voice.speak(&result);
            self.record(&format!("Generator ({})", language), &request, &result);

            loop {
                ui::rule("Options");
                println!("[1] Refine  [2] Explain  [3] New Request  [4] 💾 Save Code  [0] Done");

                let Some(action) = console.read_line("👉 Next:")? else {
                    return Ok(());
                };

                match action.to_lowercase().as_str() {
                    "0" | "done" | "exit" => return Ok(()),
                    "3" | "new" => continue 'request,
                    "4" | "save" => {
                        let Some(desc) = console.read_line("Enter Description for Code:")? else {
                            return Ok(());
                        };
                        if !desc.is_empty() {
                            // The full reply is saved; extracting just the
                            // fenced block would drop the model's usage notes
                            self.code_store.add(SavedCode::new(&language, &result, &desc))?;
                            ui::print_success("Code saved successfully!");
                        }
                    }
                    a if a == "1" || a.starts_with("refine") => {
                        let Some(feedback) = console.read_line("What should I change?")? else {
                            return Ok(());
                        };
                        if feedback.is_empty() {
                            continue;
                        }
                        let prompt = format!(
                            "The user wants to modify the previously generated code.\n\nUSER'S FEEDBACK/REQUEST:\n{}\n\nPlease update the code based on this feedback.",
                            feedback
                        );
                        println!("⚡ Refining code...");
                        result = send_or_inline(&mut self.generator, &prompt, "refining code");
                        ui::print_bot("Generator AI", &result);
                        voice.speak(&result);
                        self.record("Refinement", &feedback, &result);
                    }
                    a if a == "2" || a.starts_with("explain") => {
                        let Some(question) = console.read_line("What's confusing?")? else {
                            return Ok(());
                        };
                        if question.is_empty() {
                            continue;
                        }
                        let prompt = format!(
                            "The user has a question about the code you just generated.\n\nUSER'S QUESTION:\n{}\n\nPlease answer in a beginner-friendly way with examples if helpful.",
                            question
                        );
                        println!("🤖 Explaining...");
                        let answer = send_or_inline(&mut self.generator, &prompt, "explaining code");
                        ui::print_bot("Generator AI", &answer);
                        voice.speak(&answer);
                        self.record("Explanation", &question, &answer);
                    }
                    _ => {}
                }
            }
        }
    }

    fn run_rater(&mut self, console: &mut Console) -> Result<()> {
        'review: loop {
            ui::rule("Rate My Programme");

            let Some(language) = console.read_line("💻 Programming Language (or 'exit'):")? else {
                return Ok(());
            };
            if language.is_empty() || matches!(language.to_lowercase().as_str(), "exit" | "back") {
                return Ok(());
            }

            let Some(code) = console.read_multiline("Paste your code:")? else {
                return Ok(());
            };
            if code.trim().is_empty() {
                return Ok(());
            }

            let prompt = format!(
                "{}\n\nLANGUAGE: {}\n\nCODE TO REVIEW:\n```{}\n{}\n```\n\nPlease provide a detailed rating and review based on the criteria.",
                RATER_PROMPT, language, language, code
            );

            println!("⭐ Reviewing code quality...");
            let review = send_or_inline(&mut self.rater, &prompt, "rating code");
            ui::print_bot("Code Reviewer", &review);
            self.record(&format!("Rating ({})", language), &code, &review);

            loop {
                ui::rule("Options");
                println!("[1] Ask Question  [2] New Review  [0] Done");

                let Some(action) = console.read_line("👉 Next:")? else {
                    return Ok(());
                };

                match action.to_lowercase().as_str() {
                    "0" | "done" | "exit" => return Ok(()),
                    "2" | "new" => continue 'review,
                    a if a == "1" || a == "ask" => {
                        let Some(question) = console.read_line("Ask about the rating:")? else {
                            return Ok(());
                        };
                        if question.is_empty() {
                            continue;
                        }
                        let prompt = format!(
                            "The user has a follow-up question about the code review you just provided.\n\nQUESTION: {}\n\nPlease answer clearly based on the code analysis.",
                            question
                        );
                        println!("🤖 Answering...");
                        let answer = send_or_inline(&mut self.rater, &prompt, "answering");
                        ui::print_bot("Code Reviewer", &answer);
                        self.record("Rating Q&A", &question, &answer);
                    }
                    _ => {}
                }
            }
        }
    }

    fn view_bug_history(&self, console: &mut Console) -> Result<()> {
        ui::rule("Bug History");

        let outcome = self.bug_store.load();
        if outcome.is_corrupt() {
            ui::print_warning("Bug history file is corrupt; showing an empty list. It will be replaced on the next save.");
        }
        let bugs = outcome.records();

        if bugs.is_empty() {
            println!("📭 No bugs recorded yet. Start debugging to build your history!");
        } else {
            println!("{}", format!("📜 Found {} bug reports:", bugs.len()).bold());
            for (i, bug) in bugs.iter().rev().enumerate() {
                println!();
                println!("{}", format!("--- Bug #{} ---", i + 1).cyan().bold());
                println!("📅 Date: {}", bug.date);
                println!("💻 Language: {}", bug.language);
                println!("⚠️ Error Type: {}", bug.error_type);
                println!("❌ Mistake: {}", bug.mistake);
                if !bug.correct_code.is_empty() {
                    println!("✅ Correct Code:");
                    for line in bug.correct_code.lines() {
                        println!("   {}", line);
                    }
                }
                if !bug.explanation.is_empty() {
                    println!("💡 Explanation: {}", bug.explanation);
                }
            }
        }

        console.read_line("\nPress Enter to return...")?;
        Ok(())
    }

    fn view_saved_codes(&self, console: &mut Console) -> Result<()> {
        ui::rule("Saved Codes");

        let outcome = self.code_store.load();
        if outcome.is_corrupt() {
            ui::print_warning("Saved codes file is corrupt; showing an empty list. It will be replaced on the next save.");
        }
        let codes = outcome.records();

        if codes.is_empty() {
            println!("📭 No saved codes yet. Generate some code to save it!");
        } else {
            println!("{}", format!("💾 Found {} saved snippets:", codes.len()).bold());
            for (i, snippet) in codes.iter().rev().enumerate() {
                println!();
                println!("{}", format!("--- Snippet #{} ---", i + 1).green().bold());
                println!("Date: {}", snippet.date);
                println!("Language: {}", snippet.language);
                println!("Description: {}", snippet.description);
                ui::print_bot(&format!("Snippet {}", i + 1), &snippet.code);
            }
        }

        console.read_line("\nPress Enter to return...")?;
        Ok(())
    }
}

/// The generator contract is code-first: refuse replies with no fenced block
/// and strip any prose before the first one
fn require_code_block(reply: String) -> String {
    if reply.starts_with("⚠️") {
        // Inline error, pass through untouched
        return reply;
    }
    match reply.find("```") {
        Some(idx) => reply[idx..].to_string(),
        None => "⚠️ Error: The AI failed to generate a code block. Please try again.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::testing::{FailingGenerator, ScriptedGenerator};
    use crate::ui::Silent;
    use std::io::Cursor;
    use tempfile::TempDir;

    const ANALYSIS: &str = "❌ Errors Found\n1. TypeError – str plus int\n\n🛠️ Fixes\n- cast it\n\n✅ Corrected Code\n```python\nprint(str(n))\n```";

    fn run_flow(input: &str, generator: &dyn Generator, data_dir: &std::path::Path, log: &ChatLog) {
        let mut console = Console::with_reader(Cursor::new(input.to_string()));
        run(generator, &mut console, &Silent, log, data_dir).unwrap();
    }

    #[test]
    fn test_debugger_records_bugs_and_session() {
        let temp = TempDir::new().unwrap();
        let log = ChatLog::new(temp.path());
        let generator = ScriptedGenerator::new(&[ANALYSIS]);

        // debugger -> Python -> code -> back to menu -> exit -> save with default title
        run_flow("1\nPython\nprint(n)\nEND\n0\ny\n\n", &generator, temp.path(), &log);

        let bugs = BugStore::new(temp.path()).load().records();
        assert_eq!(bugs.len(), 1);
        assert_eq!(bugs[0].error_type, "TypeError");
        assert_eq!(bugs[0].wrong_code, "print(n)");

        let sessions = log.load().records();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].module, "Code Made Easy");
        assert_eq!(sessions[0].title, "Coding Session");
        assert_eq!(sessions[0].messages.len(), 2);
        assert!(sessions[0].messages[0].text.starts_with("[Debugger]"));
    }

    #[test]
    fn test_debugger_exit_at_language_prompt() {
        let temp = TempDir::new().unwrap();
        let log = ChatLog::new(temp.path());
        let generator = ScriptedGenerator::new(&[]);

        run_flow("1\nexit\n0\n", &generator, temp.path(), &log);
        assert_eq!(generator.call_count(), 0);
        assert!(log.load().records().is_empty());
    }

    #[test]
    fn test_generator_save_snippet() {
        let temp = TempDir::new().unwrap();
        let log = ChatLog::new(temp.path());
        let generator = ScriptedGenerator::new(&["```python\nprint(1)\n```"]);

        run_flow(
            "2\na one liner\nPython\n4\nprints one\n0\n0\nn\n",
            &generator,
            temp.path(),
            &log,
        );

        let codes = CodeStore::new(temp.path()).load().records();
        assert_eq!(codes.len(), 1);
        assert_eq!(codes[0].language, "Python");
        assert_eq!(codes[0].description, "prints one");
        assert!(codes[0].code.contains("print(1)"));
    }

    #[test]
    fn test_generator_inline_error_keeps_menu_alive() {
        let temp = TempDir::new().unwrap();
        let log = ChatLog::new(temp.path());
        let generator = FailingGenerator;

        run_flow("2\nsomething\n\n0\n0\nn\n", &generator, temp.path(), &log);
        // No snippets, no bugs, no panic
        assert!(CodeStore::new(temp.path()).load().records().is_empty());
    }

    #[test]
    fn test_require_code_block_strips_preamble() {
        let reply = "Sure, here you go:\n```rust\nfn main() {}\n```".to_string();
        assert!(require_code_block(reply).starts_with("```rust"));
    }

    #[test]
    fn test_require_code_block_rejects_prose() {
        let fixed = require_code_block("I recommend using a loop.".to_string());
        assert!(fixed.contains("failed to generate a code block"));
    }

    #[test]
    fn test_empty_code_after_end_does_not_call_model() {
        let temp = TempDir::new().unwrap();
        let log = ChatLog::new(temp.path());
        let generator = ScriptedGenerator::new(&[]);

        run_flow("1\nPython\nEND\n0\n", &generator, temp.path(), &log);
        assert_eq!(generator.call_count(), 0);
    }
}
