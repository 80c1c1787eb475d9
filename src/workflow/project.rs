use crate::context::AppContext;
use crate::error::{AppError, AppResult};

/// Resolves the platform project id for the current working
/// directory: match the origin remote against the user's projects, or
/// fall back to asking for an id when there is no usable remote.
pub async fn resolve_project_id(ctx: &AppContext) -> AppResult<String> {
    if let Some(remote) = ctx.version_control.remote_url().await? {
        let search = search_term(&remote);
        let projects = ctx.platform.list_projects(&search).await?;
        if let Some(project) = projects
            .iter()
            .find(|project| project.ssh_url_to_repo.as_deref() == Some(remote.as_str()))
        {
            return Ok(project.id.to_string());
        }
    }

    let entered = ctx.prompt.input("Please enter the ID of your GitLab project")?;
    let entered = entered.trim();
    if entered.is_empty() {
        return Err(AppError::Configuration(
            "no project id provided and none could be derived from the repository".to_string(),
        ));
    }
    Ok(entered.to_string())
}

/// Repository name used to narrow the project search, e.g.
/// `git@host:group/repo.git` -> `repo`.
fn search_term(remote: &str) -> String {
    remote
        .rsplit('/')
        .next()
        .unwrap_or(remote)
        .split('.')
        .next()
        .unwrap_or(remote)
        .to_string()
}
