use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, MultiSelect, Select};

use crate::error::{AppError, AppResult};
use crate::services::PromptService;

/// dialoguer-backed prompts. Aborting a prompt (Esc/Ctrl-C) surfaces
/// as an error and ends the run.
pub struct TerminalPrompt {
    theme: ColorfulTheme,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptService for TerminalPrompt {
    fn input(&self, message: &str) -> AppResult<String> {
        Input::with_theme(&self.theme)
            .with_prompt(message)
            .allow_empty(true)
            .interact_text()
            .map_err(|err| AppError::Io(std::io::Error::other(format!("prompt aborted: {err}"))))
    }

    fn select(&self, message: &str, choices: &[String]) -> AppResult<String> {
        if choices.is_empty() {
            return Err(AppError::Configuration(format!(
                "nothing to choose from for: {message}"
            )));
        }
        let index = Select::with_theme(&self.theme)
            .with_prompt(message)
            .items(choices)
            .default(0)
            .interact()
            .map_err(|err| AppError::Io(std::io::Error::other(format!("prompt aborted: {err}"))))?;
        Ok(choices[index].clone())
    }

    fn multi_select(&self, message: &str, choices: &[String]) -> AppResult<Vec<String>> {
        if choices.is_empty() {
            return Ok(Vec::new());
        }
        let indices = MultiSelect::with_theme(&self.theme)
            .with_prompt(message)
            .items(choices)
            .interact()
            .map_err(|err| AppError::Io(std::io::Error::other(format!("prompt aborted: {err}"))))?;
        Ok(indices.into_iter().map(|i| choices[i].clone()).collect())
    }
}
