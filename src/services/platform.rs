use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::branch::{BranchName, CreatedBranch};
use crate::domain::issue::{CreatedIssue, IssueDraft};
use crate::domain::merge_request::{MergeRequest, MergeRequestDraft};
use crate::domain::pipeline::{Pipeline, PipelineJob};
use crate::domain::schedule::{Epic, Iteration, Milestone};
use crate::error::AppResult;

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub username: String,
}

impl User {
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.username)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub id: u64,
    #[serde(default)]
    pub ssh_url_to_repo: Option<String>,
}

/// Remote platform capability set. Every call is a blocking round
/// trip: no retries, no timeouts, failures surface as `AppError` and
/// abort whatever workflow is running.
#[async_trait]
pub trait PlatformService: Send + Sync {
    async fn create_issue(&self, project_id: &str, draft: &IssueDraft) -> AppResult<CreatedIssue>;

    async fn create_branch(
        &self,
        project_id: &str,
        name: &BranchName,
        ref_branch: &str,
        issue_iid: u64,
    ) -> AppResult<CreatedBranch>;

    async fn create_merge_request(
        &self,
        project_id: &str,
        draft: &MergeRequestDraft,
    ) -> AppResult<MergeRequest>;

    async fn list_milestones(&self) -> AppResult<Vec<Milestone>>;
    async fn list_iterations(&self) -> AppResult<Vec<Iteration>>;
    async fn list_epics(&self) -> AppResult<Vec<Epic>>;
    async fn list_group_labels(&self, search: &str) -> AppResult<Vec<Label>>;

    async fn current_user(&self) -> AppResult<User>;
    async fn get_user(&self, id: u64) -> AppResult<User>;
    async fn list_projects(&self, search: &str) -> AppResult<Vec<Project>>;

    async fn merge_request_for_branch(
        &self,
        project_id: &str,
        branch: &str,
    ) -> AppResult<Option<MergeRequest>>;

    async fn update_reviewers(
        &self,
        project_id: &str,
        mr_iid: u64,
        reviewer_ids: &[u64],
    ) -> AppResult<()>;

    async fn enable_auto_merge(&self, project_id: &str, mr_iid: u64) -> AppResult<()>;

    async fn add_spent_time(&self, project_id: &str, issue_iid: u64, minutes: u32)
    -> AppResult<()>;

    async fn close_issue(&self, project_id: &str, issue_iid: u64) -> AppResult<()>;

    async fn merge_request_diff(&self, project_id: &str, mr_iid: u64) -> AppResult<String>;

    async fn post_merge_request_note(
        &self,
        project_id: &str,
        mr_iid: u64,
        body: &str,
    ) -> AppResult<()>;

    async fn list_pipelines(&self, project_id: &str, ref_name: &str) -> AppResult<Vec<Pipeline>>;
    async fn list_pipeline_jobs(
        &self,
        project_id: &str,
        pipeline_id: u64,
    ) -> AppResult<Vec<PipelineJob>>;
}
