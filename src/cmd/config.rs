use std::io::{self, Write};

use clap::{Args, Subcommand};

use crate::config::{StoredConfig, config_file_path};
use crate::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Run the interactive configuration wizard.
    Init,
    /// Show the stored configuration (secrets masked).
    Show,
}

pub fn run(command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(),
        ConfigCommand::Show => run_show(),
    }
}

fn run_init() -> AppResult<()> {
    let mut cfg = StoredConfig::load()?;

    println!("Configuring labctl.");
    println!("Press Enter to keep the current value, '-' to clear it.");
    println!("Secrets are stored in the local config file; protect your filesystem accordingly.");
    println!();

    apply_prompt(
        "GitLab base URL (e.g., https://gitlab.example.com)",
        &mut cfg.base_url,
        false,
    )?;
    apply_prompt("GitLab group id", &mut cfg.group_id, false)?;
    apply_prompt("GitLab access token", &mut cfg.token, true)?;
    apply_prompt(
        "Custom template name (the 'no defaults' choice)",
        &mut cfg.custom_template,
        false,
    )?;
    apply_bool_prompt("Squash commits on merge", &mut cfg.squash_commits)?;
    apply_bool_prompt(
        "Delete source branch after merge",
        &mut cfg.delete_branch_after_merge,
    )?;
    apply_prompt(
        "Developer email (filters commit summaries)",
        &mut cfg.developer_email,
        false,
    )?;
    apply_prompt("Incident project id", &mut cfg.incident_project_id, false)?;
    apply_prompt("OpenAI API key", &mut cfg.openai_api_key, true)?;
    apply_prompt("OpenAI model", &mut cfg.openai_model, false)?;

    cfg.save()?;

    let path = config_file_path()?;
    println!("\nConfiguration saved to {}", path.display());
    println!("Templates, reviewers and production mappings are edited in that file directly.");
    Ok(())
}

fn run_show() -> AppResult<()> {
    let cfg = StoredConfig::load()?;
    let path = config_file_path()?;

    println!("Configuration file: {}", path.display());
    println!("GitLab base URL: {}", display_value(&cfg.base_url));
    println!("Group id: {}", display_value(&cfg.group_id));
    println!("Access token: {}", mask_secret(&cfg.token));
    println!("Custom template: {}", display_value(&cfg.custom_template));
    println!("Squash commits: {}", cfg.squash_commits);
    println!("Delete branch after merge: {}", cfg.delete_branch_after_merge);
    println!("Developer email: {}", display_value(&cfg.developer_email));
    println!(
        "Incident project id: {}",
        display_value(&cfg.incident_project_id)
    );
    println!("OpenAI API key: {}", mask_secret(&cfg.openai_api_key));
    println!("OpenAI model: {}", display_value(&cfg.openai_model));
    println!("Templates: {}", cfg.templates.len());
    println!("Reviewers: {}", cfg.reviewers.len());
    println!("Production mappings: {}", cfg.production_mappings.len());

    Ok(())
}

fn apply_prompt(field: &str, target: &mut Option<String>, secret: bool) -> AppResult<()> {
    match prompt(field, target.as_deref(), secret)? {
        PromptAction::Keep => {}
        PromptAction::Clear => *target = None,
        PromptAction::Set(value) => *target = Some(value),
    }
    Ok(())
}

fn apply_bool_prompt(field: &str, target: &mut bool) -> AppResult<()> {
    let current = if *target { "true" } else { "false" };
    match prompt(&format!("{field} (true/false)"), Some(current), false)? {
        PromptAction::Keep => {}
        PromptAction::Clear => *target = false,
        PromptAction::Set(value) => *target = value.eq_ignore_ascii_case("true"),
    }
    Ok(())
}

fn prompt(field: &str, current: Option<&str>, secret: bool) -> AppResult<PromptAction> {
    let mut stdout = io::stdout();

    match (current, secret) {
        (Some(_), true) => write!(stdout, "{field} [****] (Enter to keep, '-' to clear): ")?,
        (Some(value), false) => {
            write!(stdout, "{field} [{value}] (Enter to keep, '-' to clear): ")?
        }
        (None, _) => write!(stdout, "{field} (Enter to skip): ")?,
    }
    stdout.flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let trimmed = input.trim();

    if trimmed.is_empty() {
        Ok(PromptAction::Keep)
    } else if trimmed == "-" {
        Ok(PromptAction::Clear)
    } else {
        Ok(PromptAction::Set(trimmed.to_string()))
    }
}

fn display_value(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<not set>".to_string())
}

fn mask_secret(value: &Option<String>) -> String {
    match value {
        Some(token) if token.len() > 6 => {
            let prefix = &token[..3];
            let suffix = &token[token.len() - 3..];
            format!("{prefix}***{suffix}")
        }
        Some(token) if !token.is_empty() => "***".to_string(),
        _ => "<not set>".to_string(),
    }
}

enum PromptAction {
    Keep,
    Clear,
    Set(String),
}
