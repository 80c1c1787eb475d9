use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::config::ProductionMapping;

#[derive(Debug, Clone, Deserialize)]
pub struct Pipeline {
    pub id: u64,
    pub status: String,
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub sha: String,
    pub web_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineJob {
    pub name: String,
    pub stage: String,
    pub status: String,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration: Option<f64>,
}

impl PipelineJob {
    /// Whether this successful job is the production deployment the
    /// mapping describes, by stage or by job name.
    pub fn matches_production(&self, mapping: &ProductionMapping) -> bool {
        if !self.status.eq_ignore_ascii_case("success") {
            return false;
        }
        let stage_hit = mapping
            .stage
            .as_deref()
            .is_some_and(|stage| self.stage.eq_ignore_ascii_case(stage));
        let job_hit = mapping
            .job
            .as_deref()
            .is_some_and(|job| self.name.eq_ignore_ascii_case(job));
        stage_hit || job_hit
    }
}

/// A pipeline paired with the job inside it that performed the
/// production deployment.
#[derive(Debug, Clone)]
pub struct ProductionDeploy {
    pub pipeline: Pipeline,
    pub job: PipelineJob,
}

/// "3 days ago" style rendering for the deploy summary.
pub fn humanize_age(finished_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(finished_at);
    if elapsed.num_days() > 0 {
        format!("{} days ago", elapsed.num_days())
    } else if elapsed.num_hours() > 0 {
        format!("{} hours ago", elapsed.num_hours())
    } else {
        format!("{} minutes ago", elapsed.num_minutes().max(0))
    }
}
