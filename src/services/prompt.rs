use crate::error::AppResult;

/// Interactive terminal prompts. Kept behind a trait so workflows can
/// be driven by scripted answers in tests.
pub trait PromptService: Send + Sync {
    /// Free-text input; an empty answer is returned as an empty string.
    fn input(&self, message: &str) -> AppResult<String>;

    /// Single choice from a list; returns the chosen entry.
    fn select(&self, message: &str, choices: &[String]) -> AppResult<String>;

    /// Multiple choice; returns the chosen entries, possibly empty.
    fn multi_select(&self, message: &str, choices: &[String]) -> AppResult<Vec<String>>;
}
