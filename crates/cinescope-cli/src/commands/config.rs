use super::prompts;
use crate::output::Output;
use cinescope_config::Config;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use serde_json::json;
use std::path::Path;

pub async fn run_config(cmd: crate::ConfigCommands, config_path: &Path, output: &Output) -> Result<()> {
    match cmd {
        crate::ConfigCommands::Show => show_config(config_path, output),
        crate::ConfigCommands::Init { force } => init_config(config_path, force, output),
    }
}

fn section_table(title: &str, rows: &[(&str, String)]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![Cell::new(title).fg(Color::Cyan).add_attribute(Attribute::Bold)]);
    for (key, value) in rows {
        table.add_row(vec![Cell::new(key), Cell::new(value)]);
    }
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

fn show_config(config_path: &Path, output: &Output) -> Result<()> {
    let exists = config_path.exists();
    let config = Config::load_or_default(config_path)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_path.display(), e))?;
    let valid = config.validate();

    if output.is_json() {
        output.json(&json!({
            "path": config_path.display().to_string(),
            "exists": exists,
            "valid": valid.is_ok(),
            "config": serde_json::to_value(&config)?,
        }));
        return Ok(());
    }
    if output.is_quiet() {
        return Ok(());
    }

    println!("\n{}", "Configuration".bright_cyan().bold());
    let location = if exists {
        config_path.display().to_string()
    } else {
        format!("{} (not found, using defaults)", config_path.display())
    };
    println!("{}", section_table("Config File", &[("Path", location)]));

    println!(
        "{}",
        section_table(
            "Service",
            &[
                ("Base URL", config.api.base_url.clone()),
                ("Timeout", format!("{}s", config.api.timeout_seconds)),
            ],
        )
    );
    println!(
        "{}",
        section_table("Search", &[("Debounce", format!("{}ms", config.search.debounce_ms))])
    );
    println!(
        "{}",
        section_table("Display", &[("Image base URL", config.display.image_base_url.clone())])
    );
    println!(
        "{}",
        section_table(
            "Logging",
            &[
                ("Level", config.logging.level.clone()),
                (
                    "File",
                    config
                        .logging
                        .file
                        .as_ref()
                        .map(|path| path.display().to_string())
                        .unwrap_or_else(|| "stderr".to_string()),
                ),
            ],
        )
    );

    match valid {
        Ok(()) => output.success("Configuration is valid"),
        Err(e) => output.warn(format!("Configuration is invalid: {}", e)),
    }
    Ok(())
}

fn init_config(config_path: &Path, force: bool, output: &Output) -> Result<()> {
    if config_path.exists() && !force {
        let overwrite = prompts::prompt_yes_no(
            &format!("{} already exists. Overwrite with defaults?", config_path.display()),
            Some(false),
        )?;
        if !overwrite {
            output.info("Left the existing configuration untouched");
            return Ok(());
        }
    }

    Config::default()
        .save_to_file(config_path)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to write {}: {}", config_path.display(), e))?;
    output.success(format!("Wrote default configuration to {}", config_path.display()));
    Ok(())
}
