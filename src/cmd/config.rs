//! Configuration view and validation commands — `recap config`.

use anyhow::Result;

use super::super::{Cli, ConfigCommands};

pub fn cmd_config(
    project_dir: &std::path::Path,
    cli: &Cli,
    command: Option<ConfigCommands>,
) -> Result<()> {
    use recap::completion::API_KEY_ENV;
    use recap::recap_config::{RecapConfig, RecapToml};

    let config = RecapConfig::with_cli_args(
        project_dir.to_path_buf(),
        cli.model.clone(),
        cli.base_history_length,
    )?;
    let config_path = config.config_path();

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("Recap Configuration");
            println!("===================");
            println!();

            if config_path.exists() {
                println!("Config file: {}", config_path.display());
            } else {
                println!("No recap.toml found at {}", config_path.display());
                println!("Using default configuration.");
            }
            println!();

            let toml = &config.toml;
            println!("[model]");
            println!("  name = \"{}\"", toml.model.name);
            println!("  base_url = \"{}\"", toml.model.base_url);
            println!("  max_tokens = {}", toml.model.max_tokens);
            println!("  temperature = {}", toml.model.temperature);
            println!("  timeout_secs = {}", toml.model.timeout_secs);
            println!();
            println!("[history]");
            println!(
                "  base_history_length = {}",
                toml.history.base_history_length
            );
            println!();

            println!("Effective values (with env/CLI overrides):");
            println!("  model = \"{}\"", config.model_name());
            println!("  base_url = \"{}\"", config.base_url());
            println!("  base_history_length = {}", config.base_history_length()?);
            println!(
                "  {} = {}",
                API_KEY_ENV,
                if config.api_key().is_some() {
                    "set"
                } else {
                    "not set"
                }
            );
            println!();
        }
        Some(ConfigCommands::Validate) => {
            println!();
            println!("Validating configuration...");
            println!();

            if !config_path.exists() {
                println!("No recap.toml found. Using defaults (valid).");
                return Ok(());
            }

            let warnings = config.toml.validate();
            if warnings.is_empty() {
                println!("Configuration is valid.");
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init) => {
            if config_path.exists() {
                println!("recap.toml already exists at {}", config_path.display());
                println!("Delete it first if you want to recreate it.");
                return Ok(());
            }

            if !project_dir.exists() {
                std::fs::create_dir_all(project_dir)?;
            }

            RecapToml::default().save(&config_path)?;

            println!("Created recap.toml at {}", config_path.display());
            println!();
            println!("You can now customize:");
            println!("  - [model] name, base_url, max_tokens, temperature, timeout_secs");
            println!("  - [history] base_history_length");
            println!();
            println!("Set {} in the environment or a .env file.", API_KEY_ENV);
            println!();
        }
    }

    Ok(())
}
