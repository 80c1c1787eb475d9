use crate::context::AppContext;
use crate::domain::branch::BranchName;
use crate::domain::issue::{CreatedIssue, IssueDraft};
use crate::domain::merge_request::{MergeRequestDraft, closes_description};
use crate::domain::schedule::{Epic, Iteration};
use crate::domain::template::IssueSettings;
use crate::error::AppResult;
use crate::services::PromptService;

/// One invocation of the creation workflow. Multiple project ids mean
/// fan-out: the same issue is created in each project, sequentially,
/// with the time estimate split between them.
#[derive(Debug, Clone)]
pub struct CreateIssueRequest {
    pub title: String,
    pub project_ids: Vec<String>,
    pub milestone_id: Option<u64>,
    pub epic: Option<Epic>,
    pub iteration: Option<Iteration>,
    pub settings: IssueSettings,
    pub only_issue: bool,
}

/// Creates the issue(s) and, unless suppressed, a branch and merge
/// request per issue. Platform failures propagate immediately; there
/// is no rollback, so an issue created before a later step fails
/// stays created.
pub async fn run(ctx: &AppContext, request: CreateIssueRequest) -> AppResult<Vec<CreatedIssue>> {
    let estimate = prompt_estimated_minutes(ctx.prompt.as_ref())?;
    let share = split_estimate(estimate, request.project_ids.len());
    let settings = match share {
        Some(minutes) => request.settings.with_estimated_time(minutes),
        None => request.settings.clone(),
    };

    let mut created = Vec::with_capacity(request.project_ids.len());
    for project_id in &request.project_ids {
        created.push(create_for_project(ctx, project_id, &request, &settings).await?);
    }
    Ok(created)
}

async fn create_for_project(
    ctx: &AppContext,
    project_id: &str,
    request: &CreateIssueRequest,
    settings: &IssueSettings,
) -> AppResult<CreatedIssue> {
    let draft = IssueDraft {
        title: request.title.clone(),
        milestone_id: request.milestone_id,
        epic: request.epic.clone(),
        iteration: request.iteration.clone(),
        settings: settings.clone(),
    };

    let issue = ctx.platform.create_issue(project_id, &draft).await?;
    println!("Issue #{}: {} created.", issue.iid, issue.title);

    if request.only_issue {
        return Ok(issue);
    }

    let main_branch = ctx.version_control.main_branch().await?;
    let branch_name = BranchName::for_issue(issue.iid, &issue.title);
    let branch = ctx
        .platform
        .create_branch(project_id, &branch_name, &main_branch, issue.iid)
        .await?;

    let mr_draft = MergeRequestDraft {
        title: issue.title.clone(),
        description: closes_description(issue.iid),
        source_branch: branch.name.clone(),
        target_branch: main_branch,
        issue_iid: issue.iid,
        labels: settings.labels.clone(),
        milestone_id: request.milestone_id,
        squash: ctx.config.squash_commits,
        remove_source_branch: ctx.config.delete_branch_after_merge,
    };
    let merge_request = ctx.platform.create_merge_request(project_id, &mr_draft).await?;
    println!(
        "Merge request #{}: {} created.",
        merge_request.iid, merge_request.title
    );

    println!("Run:");
    println!("         git fetch origin");
    println!(
        "         git checkout -b '{0}' 'origin/{0}'",
        merge_request.source_branch
    );
    println!("to switch to new branch.");

    Ok(issue)
}

/// Asks for an optional estimate in minutes. Empty input means no
/// estimate; anything that is not purely digits is rejected and asked
/// again, never turned into an error.
fn prompt_estimated_minutes(prompt: &dyn PromptService) -> AppResult<Option<u32>> {
    loop {
        let raw = prompt.input("Estimated time to complete this issue (in minutes, optional)")?;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if trimmed.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(minutes) = trimmed.parse::<u32>() {
                return Ok(Some(minutes));
            }
        }
        println!("Please enter a whole number of minutes, or leave empty to skip.");
    }
}

/// Splits the total estimate evenly across the target projects.
/// Integer division: the remainder is dropped, and a share that rounds
/// down to zero counts as no estimate.
fn split_estimate(total: Option<u32>, target_count: usize) -> Option<u32> {
    let minutes = total?;
    let count = target_count.max(1) as u32;
    let share = minutes / count;
    (share > 0).then_some(share)
}
