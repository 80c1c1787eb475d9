//! Hand-written fakes for driving workflows in tests. The platform
//! fake records every call it receives so tests can assert on call
//! order and payloads.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::config::{AppConfig, StoredConfig};
use crate::context::AppContext;
use crate::domain::branch::{BranchName, CreatedBranch};
use crate::domain::issue::{CreatedIssue, IssueDraft};
use crate::domain::merge_request::{MergeRequest, MergeRequestDraft};
use crate::domain::pipeline::{Pipeline, PipelineJob};
use crate::domain::schedule::{Epic, Iteration, Milestone};
use crate::domain::template::Template;
use crate::error::{AppError, AppResult};
use crate::services::platform::{Label, Project, User};
use crate::services::{
    LanguageModelService, PlatformService, PromptService, VersionControlService,
};

/// One recorded platform interaction, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformCall {
    CreateIssue {
        project_id: String,
        title: String,
        labels: Vec<String>,
        issue_type: String,
        weight: Option<u32>,
        estimated_time: Option<u32>,
        milestone_id: Option<u64>,
        epic_id: Option<u64>,
        iteration_id: Option<u64>,
    },
    CreateBranch {
        project_id: String,
        name: String,
        ref_branch: String,
        issue_iid: u64,
    },
    CreateMergeRequest {
        project_id: String,
        source_branch: String,
        target_branch: String,
        description: String,
        labels: Vec<String>,
        milestone_id: Option<u64>,
        squash: bool,
        remove_source_branch: bool,
    },
    UpdateReviewers {
        mr_iid: u64,
        reviewer_ids: Vec<u64>,
    },
    EnableAutoMerge {
        mr_iid: u64,
    },
    AddSpentTime {
        issue_iid: u64,
        minutes: u32,
    },
    CloseIssue {
        issue_iid: u64,
    },
    PostNote {
        mr_iid: u64,
        body: String,
    },
}

#[derive(Default)]
pub struct FakePlatform {
    pub calls: Mutex<Vec<PlatformCall>>,
    pub fail_create_branch: bool,
    pub milestones: Vec<Milestone>,
    pub iterations: Vec<Iteration>,
    pub epics: Vec<Epic>,
    pub labels: Vec<Label>,
    pub users: Vec<User>,
    pub projects: Vec<Project>,
    pub merge_requests: Vec<MergeRequest>,
    pub pipelines: Vec<Pipeline>,
    pub jobs: Mutex<Vec<(u64, Vec<PipelineJob>)>>,
    pub next_iid: Mutex<u64>,
}

impl FakePlatform {
    pub fn recorded(&self) -> Vec<PlatformCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: PlatformCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl PlatformService for FakePlatform {
    async fn create_issue(&self, project_id: &str, draft: &IssueDraft) -> AppResult<CreatedIssue> {
        self.record(PlatformCall::CreateIssue {
            project_id: project_id.to_string(),
            title: draft.title.clone(),
            labels: draft.settings.labels.clone(),
            issue_type: draft.settings.issue_type.as_str().to_string(),
            weight: draft.settings.weight,
            estimated_time: draft.settings.estimated_time,
            milestone_id: draft.milestone_id,
            epic_id: draft.epic.as_ref().map(|epic| epic.id),
            iteration_id: draft.iteration.as_ref().map(|iteration| iteration.id),
        });
        let mut next = self.next_iid.lock().unwrap();
        *next += 1;
        Ok(CreatedIssue {
            iid: *next,
            title: draft.title.clone(),
        })
    }

    async fn create_branch(
        &self,
        project_id: &str,
        name: &BranchName,
        ref_branch: &str,
        issue_iid: u64,
    ) -> AppResult<CreatedBranch> {
        if self.fail_create_branch {
            return Err(AppError::Platform("branch already exists".to_string()));
        }
        self.record(PlatformCall::CreateBranch {
            project_id: project_id.to_string(),
            name: name.as_str().to_string(),
            ref_branch: ref_branch.to_string(),
            issue_iid,
        });
        Ok(CreatedBranch {
            name: name.as_str().to_string(),
        })
    }

    async fn create_merge_request(
        &self,
        project_id: &str,
        draft: &MergeRequestDraft,
    ) -> AppResult<MergeRequest> {
        self.record(PlatformCall::CreateMergeRequest {
            project_id: project_id.to_string(),
            source_branch: draft.source_branch.clone(),
            target_branch: draft.target_branch.clone(),
            description: draft.description.clone(),
            labels: draft.labels.clone(),
            milestone_id: draft.milestone_id,
            squash: draft.squash,
            remove_source_branch: draft.remove_source_branch,
        });
        Ok(MergeRequest {
            iid: 500 + draft.issue_iid,
            title: draft.title.clone(),
            source_branch: draft.source_branch.clone(),
            description: draft.description.clone(),
        })
    }

    async fn list_milestones(&self) -> AppResult<Vec<Milestone>> {
        Ok(self.milestones.clone())
    }

    async fn list_iterations(&self) -> AppResult<Vec<Iteration>> {
        Ok(self.iterations.clone())
    }

    async fn list_epics(&self) -> AppResult<Vec<Epic>> {
        Ok(self.epics.clone())
    }

    async fn list_group_labels(&self, _search: &str) -> AppResult<Vec<Label>> {
        Ok(self.labels.clone())
    }

    async fn current_user(&self) -> AppResult<User> {
        Ok(User {
            id: 1,
            name: "Test User".to_string(),
            username: "test".to_string(),
        })
    }

    async fn get_user(&self, id: u64) -> AppResult<User> {
        self.users
            .iter()
            .find(|user| user.id == id)
            .cloned()
            .ok_or_else(|| AppError::Platform(format!("no user {id}")))
    }

    async fn list_projects(&self, _search: &str) -> AppResult<Vec<Project>> {
        Ok(self.projects.clone())
    }

    async fn merge_request_for_branch(
        &self,
        _project_id: &str,
        branch: &str,
    ) -> AppResult<Option<MergeRequest>> {
        Ok(self
            .merge_requests
            .iter()
            .find(|mr| mr.source_branch == branch)
            .cloned())
    }

    async fn update_reviewers(
        &self,
        _project_id: &str,
        mr_iid: u64,
        reviewer_ids: &[u64],
    ) -> AppResult<()> {
        self.record(PlatformCall::UpdateReviewers {
            mr_iid,
            reviewer_ids: reviewer_ids.to_vec(),
        });
        Ok(())
    }

    async fn enable_auto_merge(&self, _project_id: &str, mr_iid: u64) -> AppResult<()> {
        self.record(PlatformCall::EnableAutoMerge { mr_iid });
        Ok(())
    }

    async fn add_spent_time(
        &self,
        _project_id: &str,
        issue_iid: u64,
        minutes: u32,
    ) -> AppResult<()> {
        self.record(PlatformCall::AddSpentTime { issue_iid, minutes });
        Ok(())
    }

    async fn close_issue(&self, _project_id: &str, issue_iid: u64) -> AppResult<()> {
        self.record(PlatformCall::CloseIssue { issue_iid });
        Ok(())
    }

    async fn merge_request_diff(&self, _project_id: &str, _mr_iid: u64) -> AppResult<String> {
        Ok("--- src/lib.rs\n+fn added() {}".to_string())
    }

    async fn post_merge_request_note(
        &self,
        _project_id: &str,
        mr_iid: u64,
        body: &str,
    ) -> AppResult<()> {
        self.record(PlatformCall::PostNote {
            mr_iid,
            body: body.to_string(),
        });
        Ok(())
    }

    async fn list_pipelines(&self, _project_id: &str, _ref_name: &str) -> AppResult<Vec<Pipeline>> {
        Ok(self.pipelines.clone())
    }

    async fn list_pipeline_jobs(
        &self,
        _project_id: &str,
        pipeline_id: u64,
    ) -> AppResult<Vec<PipelineJob>> {
        Ok(self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .find(|(id, _)| *id == pipeline_id)
            .map(|(_, jobs)| jobs.clone())
            .unwrap_or_default())
    }
}

/// Prompt fake fed from queues; `select` answers from its queue or
/// falls back to the first offered choice.
#[derive(Default)]
pub struct ScriptedPrompt {
    pub inputs: Mutex<VecDeque<String>>,
    pub selections: Mutex<VecDeque<String>>,
    pub multi_selections: Mutex<VecDeque<Vec<String>>>,
}

impl ScriptedPrompt {
    pub fn with_inputs(inputs: &[&str]) -> Self {
        Self {
            inputs: Mutex::new(inputs.iter().map(|s| s.to_string()).collect()),
            ..Self::default()
        }
    }

    pub fn push_selection(&self, choice: &str) {
        self.selections
            .lock()
            .unwrap()
            .push_back(choice.to_string());
    }
}

impl PromptService for ScriptedPrompt {
    fn input(&self, _message: &str) -> AppResult<String> {
        Ok(self
            .inputs
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default())
    }

    fn select(&self, _message: &str, choices: &[String]) -> AppResult<String> {
        if let Some(choice) = self.selections.lock().unwrap().pop_front() {
            return Ok(choice);
        }
        choices
            .first()
            .cloned()
            .ok_or_else(|| AppError::Configuration("no choices offered".to_string()))
    }

    fn multi_select(&self, _message: &str, _choices: &[String]) -> AppResult<Vec<String>> {
        Ok(self
            .multi_selections
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default())
    }
}

pub struct FakeVcs {
    pub main_branch: String,
    pub current_branch: String,
    pub remote_url: Option<String>,
    pub commits: Vec<String>,
}

impl Default for FakeVcs {
    fn default() -> Self {
        Self {
            main_branch: "main".to_string(),
            current_branch: "1-some-branch".to_string(),
            remote_url: Some("git@gitlab.example.com:group/repo.git".to_string()),
            commits: Vec::new(),
        }
    }
}

#[async_trait]
impl VersionControlService for FakeVcs {
    async fn main_branch(&self) -> AppResult<String> {
        Ok(self.main_branch.clone())
    }

    async fn current_branch(&self) -> AppResult<String> {
        Ok(self.current_branch.clone())
    }

    async fn remote_url(&self) -> AppResult<Option<String>> {
        Ok(self.remote_url.clone())
    }

    async fn recent_commits(&self, _since: NaiveDate) -> AppResult<Vec<String>> {
        Ok(self.commits.clone())
    }
}

pub struct FakeLlm;

#[async_trait]
impl LanguageModelService for FakeLlm {
    async fn summarize_commits(&self, _commits: &str) -> AppResult<String> {
        Ok("summary".to_string())
    }

    async fn review_diff(&self, _diff: &str) -> AppResult<String> {
        Ok("review notes".to_string())
    }
}

pub fn test_config() -> AppConfig {
    test_config_with_templates(Vec::new())
}

pub fn test_config_with_templates(templates: Vec<Template>) -> AppConfig {
    AppConfig::from_stored(StoredConfig {
        base_url: Some("https://gitlab.example.com".to_string()),
        group_id: Some("10".to_string()),
        token: Some("glpat-test".to_string()),
        templates,
        reviewers: vec![7, 8],
        ..StoredConfig::default()
    })
    .unwrap()
}

pub fn test_context(
    platform: Arc<FakePlatform>,
    vcs: Arc<FakeVcs>,
    prompt: Arc<ScriptedPrompt>,
) -> AppContext {
    AppContext::new(test_config(), platform, vcs, prompt, Arc::new(FakeLlm))
}
