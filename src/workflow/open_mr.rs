use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::workflow::project;

/// Opens the current branch's merge request in the browser.
pub async fn run(ctx: &AppContext) -> AppResult<()> {
    let project_id = project::resolve_project_id(ctx).await?;
    let branch = ctx.version_control.current_branch().await?;
    let merge_request = ctx
        .platform
        .merge_request_for_branch(&project_id, &branch)
        .await?
        .ok_or_else(|| {
            AppError::Platform(format!("no merge request found for branch {branch}"))
        })?;

    let remote = ctx
        .version_control
        .remote_url()
        .await?
        .ok_or_else(|| {
            AppError::VersionControl("not inside a repository with an origin remote".to_string())
        })?;
    let url = merge_request_url(&ctx.config.base_url, &remote, merge_request.iid)?;

    open::that(&url)?;
    println!("Opened {url}");
    Ok(())
}

/// Builds the merge-request web URL from the platform base URL and
/// the repository path embedded in the origin remote.
fn merge_request_url(base_url: &str, remote: &str, mr_iid: u64) -> AppResult<String> {
    let path = repo_path(remote).ok_or_else(|| {
        AppError::VersionControl(format!("could not read a repository path from '{remote}'"))
    })?;
    Ok(format!("{base_url}/{path}/-/merge_requests/{mr_iid}"))
}

/// `git@host:group/repo.git` or `https://host/group/repo.git` ->
/// `group/repo`.
fn repo_path(remote: &str) -> Option<String> {
    let trimmed = remote.trim().strip_suffix(".git").unwrap_or(remote.trim());

    if let Some(rest) = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
    {
        let (_, path) = rest.split_once('/')?;
        return Some(path.to_string());
    }

    let (_, path) = trimmed.split_once(':')?;
    Some(path.trim_start_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_url_from_ssh_remote() {
        let url = merge_request_url(
            "https://gitlab.example.com",
            "git@gitlab.example.com:group/repo.git",
            12,
        )
        .unwrap();
        assert_eq!(
            url,
            "https://gitlab.example.com/group/repo/-/merge_requests/12"
        );
    }

    #[test]
    fn builds_url_from_https_remote() {
        let url = merge_request_url(
            "https://gitlab.example.com",
            "https://gitlab.example.com/group/sub/repo.git",
            3,
        )
        .unwrap();
        assert_eq!(
            url,
            "https://gitlab.example.com/group/sub/repo/-/merge_requests/3"
        );
    }

    #[test]
    fn unparseable_remote_is_an_error() {
        assert!(merge_request_url("https://x", "not-a-remote", 1).is_err());
    }
}
