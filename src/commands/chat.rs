//! Interactive agent menu, the default command

use colored::*;
use eyre::{Context, Result, bail};
use indexmap::IndexMap;
use std::fs;

use crate::agents::{
    code_easy, convo, explain_like_x::ExplainLikeX, future_sim::FutureSimulator, lingua_link::LinguaLink, replay,
    study_buddy::StudyBuddy, time_travel::TimeTravel,
};
use crate::config::Config;
use crate::gemini::GeminiClient;
use crate::store::ChatLog;
use crate::ui::{self, Console};

pub fn run(config: &Config) -> Result<()> {
    let mut console = Console::stdin();

    let api_key = resolve_api_key(config, &mut console)?;
    let client = GeminiClient::new(api_key, config.generation.model.clone());

    println!("🔌 Connecting to {}...", config.generation.model);
    client
        .ping()
        .context("Could not reach the generation API. Check your key and network, then try again")?;
    ui::print_success("Connected.");

    let voice = ui::voice_from_config(&config.speech);
    let data_dir = config.data_path();
    let log = ChatLog::new(&data_dir);

    let menu: IndexMap<&str, (&str, &str)> = IndexMap::from([
        ("1", ("📚 Study Buddy", "Your academic mentor and career guide")),
        ("2", ("🗣️ Lingua Link", "Hinglish language practice partner")),
        ("3", ("💻 Code Made Easy", "Debug, generate, and rate code")),
        ("4", ("⏳ Time Travel", "Talk to the past (and future)")),
        ("5", ("🔮 Future Simulator", "Play out your decisions")),
        ("6", ("🎭 Explain Like X", "Any topic, any voice")),
        ("7", ("🎬 Conversation Replay", "Revisit saved sessions")),
    ]);

    loop {
        ui::banner("MultiBot", "One terminal, many minds 🤖");
        for (key, (name, tagline)) in &menu {
            println!("  [{}] {:<24} {}", key, name, tagline.dimmed());
        }
        println!("  [0] 👋 Exit");

        let Some(choice) = console.read_line("▸ Choose an agent:")? else {
            break;
        };

        let outcome = match choice.to_lowercase().as_str() {
            "1" => {
                let mut persona = StudyBuddy::new(&client);
                convo::run_loop(&mut persona, &mut console, voice.as_ref(), &log)
            }
            "2" => {
                let mut persona = LinguaLink::new(&client);
                convo::run_loop(&mut persona, &mut console, voice.as_ref(), &log)
            }
            "3" => code_easy::run(&client, &mut console, voice.as_ref(), &log, &data_dir),
            "4" => {
                let mut persona = TimeTravel::new(&client);
                convo::run_loop(&mut persona, &mut console, voice.as_ref(), &log)
            }
            "5" => {
                let mut persona = FutureSimulator::new(&client);
                convo::run_loop(&mut persona, &mut console, voice.as_ref(), &log)
            }
            "6" => {
                let mut persona = ExplainLikeX::new(&client);
                convo::run_loop(&mut persona, &mut console, voice.as_ref(), &log)
            }
            "7" => replay::run(&mut console, &log),
            "0" | "exit" | "quit" => break,
            "" => continue,
            other => {
                ui::print_error(&format!("'{}' is not on the menu. Pick 0-7.", other));
                continue;
            }
        };

        // An agent crashing should never take the menu down with it
        if let Err(e) = outcome {
            log::error!("agent failed: {:#}", e);
            ui::print_error(&format!("That agent hit a problem: {e}"));
        }
    }

    println!("👋 Bye! Your conversations are safe in {}", data_dir.display());
    Ok(())
}

/// Find the API key: environment first, then the .env file next to the
/// config, then ask
fn resolve_api_key(config: &Config, console: &mut Console) -> Result<String> {
    let var = &config.generation.api_key_env;

    if let Ok(key) = std::env::var(var)
        && !key.trim().is_empty()
    {
        return Ok(key.trim().to_string());
    }

    let dotenv = Config::config_dir().join(".env");
    if let Some(key) = key_from_dotenv(&dotenv, var) {
        log::info!("using API key from {}", dotenv.display());
        return Ok(key);
    }

    ui::print_warning(&format!("{} is not set.", var));
    let Some(key) = console.read_line("🔑 Paste your Gemini API key:")? else {
        bail!("no API key provided");
    };
    if key.is_empty() {
        bail!("no API key provided");
    }

    if console.confirm(&format!("Save it to {} for next time? (y/n):", dotenv.display()))? {
        if let Some(parent) = dotenv.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        fs::write(&dotenv, format!("{}={}\n", var, key)).context("Failed to write .env file")?;
        ui::print_success("Saved.");
    }

    Ok(key)
}

fn key_from_dotenv(path: &std::path::Path, var: &str) -> Option<String> {
    let contents = fs::read_to_string(path).ok()?;
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((name, value)) = line.split_once('=')
            && name.trim() == var
        {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}
