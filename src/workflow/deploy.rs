use chrono::Utc;

use crate::config::ProductionMapping;
use crate::context::AppContext;
use crate::domain::pipeline::{ProductionDeploy, humanize_age};
use crate::error::AppResult;
use crate::services::PlatformService;
use crate::workflow::project;

/// Shows the last successful production deployment of the current
/// project, located via the configured per-project pipeline mapping.
pub async fn run(ctx: &AppContext) -> AppResult<()> {
    let project_id = project::resolve_project_id(ctx).await?;

    let Some(mapping) = ctx.config.production_mappings.get(&project_id) else {
        println!(
            "No production mapping configured for project {project_id}; \
             add it under production_mappings in the config file."
        );
        return Ok(());
    };

    // Outside a repository there is no origin/HEAD to ask; fall back
    // to the usual default branch name.
    let ref_name = match ctx.version_control.main_branch().await {
        Ok(branch) => branch,
        Err(_) => "main".to_string(),
    };

    match find_last_deploy(ctx.platform.as_ref(), &project_id, &ref_name, mapping).await? {
        Some(deploy) => print_deploy(&deploy),
        None => println!("No production deployment found."),
    }
    Ok(())
}

/// Walks pipelines newest-first and returns the first one containing
/// a successful job that matches the production mapping.
pub async fn find_last_deploy(
    platform: &dyn PlatformService,
    project_id: &str,
    ref_name: &str,
    mapping: &ProductionMapping,
) -> AppResult<Option<ProductionDeploy>> {
    for pipeline in platform.list_pipelines(project_id, ref_name).await? {
        let jobs = platform.list_pipeline_jobs(project_id, pipeline.id).await?;
        if let Some(job) = jobs.into_iter().find(|job| job.matches_production(mapping)) {
            return Ok(Some(ProductionDeploy { pipeline, job }));
        }
    }
    Ok(None)
}

fn print_deploy(deploy: &ProductionDeploy) {
    let pipeline = &deploy.pipeline;
    let job = &deploy.job;

    println!("Last production deployment:");
    println!("   Pipeline: #{} - {}", pipeline.id, pipeline.status);
    println!("   Job: {} ({})", job.name, job.status);
    println!("   Branch/Tag: {}", pipeline.ref_name);
    println!("   Started: {}", stamp(job.started_at));
    println!("   Finished: {}", stamp(job.finished_at));
    match job.duration {
        Some(seconds) => println!("   Duration: {seconds:.0} seconds"),
        None => println!("   Duration: N/A"),
    }
    println!("   Commit: {}", &pipeline.sha[..pipeline.sha.len().min(8)]);
    println!("   URL: {}", pipeline.web_url);
    if let Some(finished_at) = job.finished_at {
        println!("   {}", humanize_age(finished_at, Utc::now()));
    }
}

fn stamp(value: Option<chrono::DateTime<Utc>>) -> String {
    value
        .map(|v| v.to_rfc3339())
        .unwrap_or_else(|| "N/A".to_string())
}
