use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::AppResult;

/// Local repository facts the workflows need. Backed by `git`
/// shell-outs; calls fail when the working directory is not inside a
/// repository with an `origin` remote.
#[async_trait]
pub trait VersionControlService: Send + Sync {
    /// Name of the default branch on origin, e.g. `main`.
    async fn main_branch(&self) -> AppResult<String>;

    async fn current_branch(&self) -> AppResult<String>;

    /// `origin` remote URL, used to resolve the platform project and
    /// to build web links. `None` outside a repository.
    async fn remote_url(&self) -> AppResult<Option<String>>;

    /// Commit lines since the given date, `<date> - <email> - <subject>`
    /// per line, oldest first as git emits them.
    async fn recent_commits(&self, since: NaiveDate) -> AppResult<Vec<String>>;
}
