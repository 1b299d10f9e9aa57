//! Show the effective configuration

use colored::*;
use eyre::Result;

use crate::cli::{ConfigAction, OutputFormat};
use crate::config::Config;

pub fn run(action: ConfigAction, config: &Config) -> Result<()> {
    match action {
        ConfigAction::Show { format } => show(OutputFormat::resolve(format), config),
    }
}

fn show(format: OutputFormat, config: &Config) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(config)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(config)?),
        OutputFormat::Text => {
            println!("{}", "Configuration".bold());
            println!("  Config dir:  {}", Config::config_dir().display());
            println!("  Data dir:    {}", config.data_path().display());
            println!("  Model:       {}", config.generation.model);
            println!("  Key env var: {}", config.generation.api_key_env);
            println!(
                "  Speech:      {}",
                if config.speech.enabled {
                    config.speech.command.as_deref().unwrap_or("auto").to_string()
                } else {
                    "disabled".to_string()
                }
            );
            println!("  Log level:   {}", config.log_level.as_filter());
        }
    }

    Ok(())
}
