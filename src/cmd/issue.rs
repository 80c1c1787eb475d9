use crate::context::AppContext;
use crate::domain::issue::CreatedIssue;
use crate::domain::template::ResolvedTemplate;
use crate::error::{AppError, AppResult};
use crate::workflow::create_issue::{self, CreateIssueRequest};
use crate::workflow::{project, selection};

#[derive(Debug, Clone)]
pub struct IssueCommandArgs {
    pub title: String,
    pub project_id: Option<String>,
    pub manual_milestone: bool,
    pub no_milestone: bool,
    pub no_iteration: bool,
    pub no_epic: bool,
    pub only_issue: bool,
}

/// Gathers the template, selections and target projects, then hands
/// off to the creation workflow.
pub async fn run(ctx: &AppContext, args: IssueCommandArgs) -> AppResult<Vec<CreatedIssue>> {
    let choices = ctx.config.template_choices();
    let chosen = ctx.prompt.select("Select template", &choices)?;
    let resolved = ctx.config.resolve_template(&chosen).ok_or_else(|| {
        AppError::Configuration(format!("no template settings found for '{chosen}'"))
    })?;
    if resolved == ResolvedTemplate::Custom {
        println!("No template defaults; the issue is built from your selections only.");
    }

    let project_ids = match resolved.project_ids() {
        Some(ids) => {
            if args.project_id.is_some() {
                println!("NOTE: template project ids take precedence over --project-id.");
            }
            ids
        }
        None => match args.project_id.clone() {
            Some(id) => vec![id],
            None => vec![project::resolve_project_id(ctx).await?],
        },
    };

    let milestone_id = if args.no_milestone {
        None
    } else {
        selection::resolve_milestone(ctx, args.manual_milestone)
            .await?
            .map(|milestone| milestone.id)
    };

    let iteration = if args.no_iteration {
        None
    } else {
        selection::resolve_iteration(ctx, true).await?
    };

    let epic = if args.no_epic {
        None
    } else {
        selection::resolve_epic(ctx).await?
    };

    let request = CreateIssueRequest {
        title: args.title,
        project_ids,
        milestone_id,
        epic,
        iteration,
        settings: resolved.settings(),
        only_issue: resolved.only_issue() || args.only_issue,
    };
    create_issue::run(ctx, request).await
}
