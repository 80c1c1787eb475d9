use crate::context::AppContext;
use crate::domain::issue::IssueDraft;
use crate::domain::template::{IssueSettings, IssueType};
use crate::error::{AppError, AppResult};
use crate::workflow::selection;

/// Logs an incident after the fact: a closed issue in the incident
/// project, labelled, attached to the active iteration, with the time
/// it cost already booked.
pub async fn run(ctx: &AppContext, text: &str, minutes: u32) -> AppResult<()> {
    let project_id = ctx.config.incident_project_id.clone().ok_or_else(|| {
        AppError::Configuration(
            "incident_project_id is not configured; run `labctl config init` to set it"
                .to_string(),
        )
    })?;

    let mut labels = vec!["incident".to_string(), "report".to_string()];
    if let Some(department) = selection::choose_group_label(ctx, "Department").await? {
        labels.push(department);
    }

    let iteration = selection::current_iteration(ctx).await?;

    let draft = IssueDraft {
        title: format!("Incident Report: {text}"),
        milestone_id: None,
        epic: None,
        iteration,
        settings: IssueSettings {
            labels,
            issue_type: IssueType::Incident,
            weight: None,
            estimated_time: None,
        },
    };

    let issue = ctx.platform.create_issue(&project_id, &draft).await?;
    ctx.platform.close_issue(&project_id, issue.iid).await?;
    println!("Incident issue #{} created successfully.", issue.iid);
    println!("Title: {}", issue.title);

    ctx.platform
        .add_spent_time(&project_id, issue.iid, minutes)
        .await?;
    println!("Added {minutes} minutes to issue time tracking.");

    Ok(())
}
