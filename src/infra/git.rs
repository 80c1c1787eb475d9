use std::path::PathBuf;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::process::Command;

use crate::error::{AppError, AppResult};
use crate::services::VersionControlService;

pub struct GitCli {
    workspace_root: PathBuf,
}

impl GitCli {
    pub fn new(workspace_root: PathBuf) -> Self {
        Self { workspace_root }
    }

    async fn run(&self, args: &[&str]) -> AppResult<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workspace_root)
            .output()
            .await
            .map_err(|err| AppError::VersionControl(format!("failed to run git: {err}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::VersionControl(format!(
                "git {} failed: {}",
                args.first().unwrap_or(&""),
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl VersionControlService for GitCli {
    async fn main_branch(&self) -> AppResult<String> {
        let symbolic_ref = self.run(&["symbolic-ref", "refs/remotes/origin/HEAD"]).await?;
        symbolic_ref
            .strip_prefix("refs/remotes/origin/")
            .map(str::to_string)
            .ok_or_else(|| {
                AppError::VersionControl(format!(
                    "unexpected symbolic ref for origin/HEAD: {symbolic_ref}"
                ))
            })
    }

    async fn current_branch(&self) -> AppResult<String> {
        self.run(&["rev-parse", "--abbrev-ref", "HEAD"]).await
    }

    async fn remote_url(&self) -> AppResult<Option<String>> {
        match self.run(&["remote", "get-url", "origin"]).await {
            Ok(url) if !url.is_empty() => Ok(Some(url)),
            Ok(_) => Ok(None),
            // No remote or not a repository is a valid "absent" answer
            // here; callers fall back to asking for a project id.
            Err(_) => Ok(None),
        }
    }

    async fn recent_commits(&self, since: NaiveDate) -> AppResult<Vec<String>> {
        let since_arg = format!("--since={since}");
        let output = self
            .run(&[
                "log",
                &since_arg,
                "--format=%ad - %ae - %s",
                "--date=short",
            ])
            .await?;

        Ok(output
            .lines()
            .map(str::to_string)
            .filter(|line| !line.is_empty())
            .collect())
    }
}
