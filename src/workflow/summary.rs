use chrono::{Duration, Local};

use crate::context::AppContext;
use crate::error::AppResult;

/// Prints the developer's commits from the last two weeks, optionally
/// condensed by the language model.
pub async fn run(ctx: &AppContext, ai: bool) -> AppResult<()> {
    let since = Local::now().date_naive() - Duration::weeks(2);
    let lines = ctx.version_control.recent_commits(since).await?;
    let commits = filter_commits(lines, ctx.config.developer_email.as_deref());

    if commits.is_empty() {
        println!("No commits found.");
        return Ok(());
    }

    if !ai {
        for line in &commits {
            println!("{line}");
        }
        return Ok(());
    }

    match ctx.language_model.summarize_commits(&commits.join("\n")).await {
        Ok(summary) => {
            println!("AI summary of recent changes:\n");
            println!("{summary}");
        }
        Err(err) => println!("AI summary skipped: {err}"),
    }
    Ok(())
}

/// Drops merge commits and, when a developer email is configured,
/// keeps only that developer's commits.
fn filter_commits(lines: Vec<String>, developer_email: Option<&str>) -> Vec<String> {
    lines
        .into_iter()
        .filter(|line| !line.contains("Merge branch"))
        .filter(|line| developer_email.is_none_or(|email| line.contains(email)))
        .collect()
}
