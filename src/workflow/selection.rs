use chrono::Local;

use crate::context::AppContext;
use crate::domain::schedule::{Epic, Iteration, Milestone, active_item};
use crate::error::AppResult;

/// Milestone for the new issue: manual pick by title, or the milestone
/// whose window covers today. No active milestone is a valid "none".
pub async fn resolve_milestone(ctx: &AppContext, manual: bool) -> AppResult<Option<Milestone>> {
    if manual {
        let milestones = ctx.platform.list_milestones().await?;
        return pick_milestone(ctx, milestones);
    }
    current_milestone(ctx).await
}

pub async fn current_milestone(ctx: &AppContext) -> AppResult<Option<Milestone>> {
    let milestones = ctx.platform.list_milestones().await?;
    let today = Local::now().date_naive();
    Ok(active_item(&milestones, today).cloned())
}

fn pick_milestone(
    ctx: &AppContext,
    milestones: Vec<Milestone>,
) -> AppResult<Option<Milestone>> {
    if milestones.is_empty() {
        return Ok(None);
    }
    let titles: Vec<String> = milestones.iter().map(|m| m.title.clone()).collect();
    let chosen = ctx.prompt.select("Select milestone", &titles)?;
    Ok(milestones.into_iter().find(|m| m.title == chosen))
}

/// Iteration for the new issue, labelled by its date window.
pub async fn resolve_iteration(ctx: &AppContext, manual: bool) -> AppResult<Option<Iteration>> {
    if manual {
        let iterations = ctx.platform.list_iterations().await?;
        return pick_iteration(ctx, iterations);
    }
    current_iteration(ctx).await
}

pub async fn current_iteration(ctx: &AppContext) -> AppResult<Option<Iteration>> {
    let iterations = ctx.platform.list_iterations().await?;
    let today = Local::now().date_naive();
    Ok(active_item(&iterations, today).cloned())
}

fn pick_iteration(
    ctx: &AppContext,
    iterations: Vec<Iteration>,
) -> AppResult<Option<Iteration>> {
    if iterations.is_empty() {
        return Ok(None);
    }
    let labels: Vec<String> = iterations.iter().map(Iteration::display_label).collect();
    let chosen = ctx.prompt.select("Select iteration", &labels)?;
    Ok(iterations
        .into_iter()
        .find(|iteration| iteration.display_label() == chosen))
}

/// Epic for the new issue. The list can be long, so the user narrows
/// it with a free-text search first; no match means no epic.
pub async fn resolve_epic(ctx: &AppContext) -> AppResult<Option<Epic>> {
    let epics = ctx.platform.list_epics().await?;
    if epics.is_empty() {
        return Ok(None);
    }

    let query = ctx.prompt.input("Search epic")?;
    let query = query.trim().to_lowercase();
    let filtered: Vec<&Epic> = epics
        .iter()
        .filter(|epic| query.is_empty() || epic.title.to_lowercase().contains(&query))
        .collect();
    if filtered.is_empty() {
        println!("No epics match '{query}'.");
        return Ok(None);
    }

    let titles: Vec<String> = filtered.iter().map(|epic| epic.title.clone()).collect();
    let chosen = ctx.prompt.select("Select epic", &titles)?;
    Ok(filtered
        .into_iter()
        .find(|epic| epic.title == chosen)
        .cloned())
}

/// Reviewer ids for a merge request, multi-picked from the configured
/// pool. Display names come from the platform; a failed lookup falls
/// back to the raw id so the pick never blocks on a missing user.
pub async fn choose_reviewers(ctx: &AppContext) -> AppResult<Vec<u64>> {
    let mut choices = Vec::with_capacity(ctx.config.reviewers.len());
    for &reviewer_id in &ctx.config.reviewers {
        let label = match ctx.platform.get_user(reviewer_id).await {
            Ok(user) => user.display_name(),
            Err(_) => reviewer_id.to_string(),
        };
        choices.push((label, reviewer_id));
    }

    let labels: Vec<String> = choices.iter().map(|(label, _)| label.clone()).collect();
    let picked = ctx.prompt.multi_select("Select reviewers", &labels)?;
    Ok(choices
        .into_iter()
        .filter(|(label, _)| picked.contains(label))
        .map(|(_, id)| id)
        .collect())
}

/// One group label picked from a searched subset, e.g. the department
/// label attached to incident reports.
pub async fn choose_group_label(ctx: &AppContext, search: &str) -> AppResult<Option<String>> {
    let labels = ctx.platform.list_group_labels(search).await?;
    if labels.is_empty() {
        return Ok(None);
    }
    let mut names: Vec<String> = labels.into_iter().map(|label| label.name).collect();
    names.sort();
    let chosen = ctx.prompt.select("Select a department label", &names)?;
    Ok(Some(chosen))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use super::*;
    use crate::services::platform::{Label, User};
    use crate::workflow::testing::{FakePlatform, FakeVcs, ScriptedPrompt, test_context};

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn manual_milestone_maps_title_back_to_record() {
        let platform = Arc::new(FakePlatform {
            milestones: vec![
                Milestone {
                    id: 1,
                    title: "Sprint 1".to_string(),
                    start_date: None,
                    due_date: None,
                },
                Milestone {
                    id: 2,
                    title: "Sprint 2".to_string(),
                    start_date: None,
                    due_date: None,
                },
            ],
            ..FakePlatform::default()
        });
        let prompt = Arc::new(ScriptedPrompt::default());
        prompt.push_selection("Sprint 2");
        let ctx = test_context(platform, Arc::new(FakeVcs::default()), prompt);

        let milestone = resolve_milestone(&ctx, true).await.unwrap().unwrap();
        assert_eq!(milestone.id, 2);
    }

    #[tokio::test]
    async fn manual_iteration_uses_the_window_label() {
        let platform = Arc::new(FakePlatform {
            iterations: vec![
                Iteration {
                    id: 1,
                    start_date: Some(day("2025-01-01")),
                    due_date: Some(day("2025-01-14")),
                },
                Iteration {
                    id: 2,
                    start_date: Some(day("2025-01-15")),
                    due_date: Some(day("2025-01-28")),
                },
            ],
            ..FakePlatform::default()
        });
        let prompt = Arc::new(ScriptedPrompt::default());
        prompt.push_selection("2025-01-15 - 2025-01-28");
        let ctx = test_context(platform, Arc::new(FakeVcs::default()), prompt);

        let iteration = resolve_iteration(&ctx, true).await.unwrap().unwrap();
        assert_eq!(iteration.id, 2);
    }

    #[tokio::test]
    async fn epic_search_filters_case_insensitively() {
        let platform = Arc::new(FakePlatform {
            epics: vec![
                Epic {
                    id: 1,
                    title: "Payments revamp".to_string(),
                },
                Epic {
                    id: 2,
                    title: "Search improvements".to_string(),
                },
            ],
            ..FakePlatform::default()
        });
        let prompt = Arc::new(ScriptedPrompt::with_inputs(&["PAY"]));
        prompt.push_selection("Payments revamp");
        let ctx = test_context(platform, Arc::new(FakeVcs::default()), prompt);

        let epic = resolve_epic(&ctx).await.unwrap().unwrap();
        assert_eq!(epic.id, 1);
    }

    #[tokio::test]
    async fn epic_search_with_no_match_is_absent() {
        let platform = Arc::new(FakePlatform {
            epics: vec![Epic {
                id: 1,
                title: "Payments revamp".to_string(),
            }],
            ..FakePlatform::default()
        });
        let prompt = Arc::new(ScriptedPrompt::with_inputs(&["frontend"]));
        let ctx = test_context(platform, Arc::new(FakeVcs::default()), prompt);

        assert!(resolve_epic(&ctx).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn no_milestones_resolve_to_none_without_prompting() {
        let platform = Arc::new(FakePlatform::default());
        let ctx = test_context(
            platform,
            Arc::new(FakeVcs::default()),
            Arc::new(ScriptedPrompt::default()),
        );

        assert!(resolve_milestone(&ctx, true).await.unwrap().is_none());
        assert!(resolve_milestone(&ctx, false).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn reviewer_pick_maps_display_names_to_ids() {
        let platform = Arc::new(FakePlatform {
            users: vec![User {
                id: 7,
                name: "Ada Lovelace".to_string(),
                username: "ada".to_string(),
            }],
            ..FakePlatform::default()
        });
        let prompt = Arc::new(ScriptedPrompt::default());
        // Reviewer 8 has no user record and falls back to the raw id.
        prompt
            .multi_selections
            .lock()
            .unwrap()
            .push_back(vec!["Ada Lovelace (ada)".to_string(), "8".to_string()]);
        let ctx = test_context(platform, Arc::new(FakeVcs::default()), prompt);

        let reviewers = choose_reviewers(&ctx).await.unwrap();
        assert_eq!(reviewers, vec![7, 8]);
    }

    #[tokio::test]
    async fn group_label_choices_are_sorted() {
        let platform = Arc::new(FakePlatform {
            labels: vec![
                Label {
                    name: "Dept::Z".to_string(),
                },
                Label {
                    name: "Dept::A".to_string(),
                },
            ],
            ..FakePlatform::default()
        });
        let prompt = Arc::new(ScriptedPrompt::default());
        let ctx = test_context(platform, Arc::new(FakeVcs::default()), prompt);

        // Scripted prompt falls back to the first choice, which must be
        // the alphabetically first label.
        let label = choose_group_label(&ctx, "Dept").await.unwrap().unwrap();
        assert_eq!(label, "Dept::A");
    }
}
