use crate::context::AppContext;
use crate::domain::merge_request::MergeRequest;
use crate::error::{AppError, AppResult};
use crate::services::PromptService;
use crate::workflow::{project, selection};

#[derive(Debug, Clone, Default)]
pub struct ReviewOptions {
    pub auto_merge: bool,
    pub select_reviewers: bool,
    pub ai: bool,
}

/// Hands the current branch's merge request over for review: track
/// the time actually spent, assign reviewers, optionally post an AI
/// review and arm auto-merge.
pub async fn run(ctx: &AppContext, options: ReviewOptions) -> AppResult<()> {
    let project_id = project::resolve_project_id(ctx).await?;
    let branch = ctx.version_control.current_branch().await?;
    let merge_request = ctx
        .platform
        .merge_request_for_branch(&project_id, &branch)
        .await?
        .ok_or_else(|| {
            AppError::Platform(format!("no merge request found for branch {branch}"))
        })?;

    // Time tracking is a courtesy step; a failure here should not keep
    // the review itself from going out.
    if let Err(err) = track_issue_time(ctx, &project_id, &merge_request).await {
        println!("Error tracking issue time: {err}");
    }

    let reviewers = if options.select_reviewers {
        selection::choose_reviewers(ctx).await?
    } else {
        ctx.config.reviewers.clone()
    };
    ctx.platform
        .update_reviewers(&project_id, merge_request.iid, &reviewers)
        .await?;

    if options.ai {
        match ai_review(ctx, &project_id, merge_request.iid).await {
            Ok(()) => println!("AI review posted to merge request."),
            Err(err) => println!("AI review skipped: {err}"),
        }
    }

    if options.auto_merge {
        ctx.platform
            .enable_auto_merge(&project_id, merge_request.iid)
            .await?;
        println!("Merge request will merge when the pipeline succeeds.");
    }

    Ok(())
}

async fn track_issue_time(
    ctx: &AppContext,
    project_id: &str,
    merge_request: &MergeRequest,
) -> AppResult<()> {
    let Some(issue_iid) = merge_request.closed_issue_iid() else {
        println!("Merge request description names no issue; skipping time tracking.");
        return Ok(());
    };

    let minutes = prompt_spent_minutes(ctx.prompt.as_ref())?;
    ctx.platform
        .add_spent_time(project_id, issue_iid, minutes)
        .await?;
    println!("Added {minutes} minutes to issue {issue_iid} time tracking.");
    Ok(())
}

/// Unlike the optional estimate at creation time, spent time is
/// required here; empty or non-numeric input is asked again.
fn prompt_spent_minutes(prompt: &dyn PromptService) -> AppResult<u32> {
    loop {
        let raw = prompt.input("How many minutes did you actually spend on this issue?")?;
        let trimmed = raw.trim();
        if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(minutes) = trimmed.parse::<u32>() {
                return Ok(minutes);
            }
        }
        println!("Please enter a whole number of minutes.");
    }
}

async fn ai_review(ctx: &AppContext, project_id: &str, mr_iid: u64) -> AppResult<()> {
    let diff = ctx.platform.merge_request_diff(project_id, mr_iid).await?;
    if diff.trim().is_empty() {
        return Err(AppError::Platform("merge request has no changes".to_string()));
    }
    let review = ctx.language_model.review_diff(&diff).await?;
    ctx.platform
        .post_merge_request_note(project_id, mr_iid, &review)
        .await
}
