use async_trait::async_trait;

use crate::error::AppResult;

/// Optional AI assistance. Both operations are best-effort extras;
/// callers report failures and carry on.
#[async_trait]
pub trait LanguageModelService: Send + Sync {
    /// Condense raw `git log` lines into a short, organized summary.
    async fn summarize_commits(&self, commits: &str) -> AppResult<String>;

    /// Review a merge-request diff and produce reviewer notes.
    async fn review_diff(&self, diff: &str) -> AppResult<String>;
}
