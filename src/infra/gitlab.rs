use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::domain::branch::{BranchName, CreatedBranch};
use crate::domain::issue::{CreatedIssue, IssueDraft};
use crate::domain::merge_request::{MergeRequest, MergeRequestDraft};
use crate::domain::pipeline::{Pipeline, PipelineJob};
use crate::domain::schedule::{Epic, Iteration, Milestone};
use crate::error::{AppError, AppResult};
use crate::services::PlatformService;
use crate::services::platform::{Label, Project, User};

const TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// GitLab REST v4 client. One instance per process; the token and
/// group id come from the validated configuration.
pub struct GitLabClient {
    http: Client,
    api_url: String,
    group_id: String,
}

impl GitLabClient {
    pub fn new(api_url: String, token: &str, group_id: String) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        let mut token_value = HeaderValue::from_str(token)
            .map_err(|_| AppError::Configuration("token contains invalid characters".to_string()))?;
        token_value.set_sensitive(true);
        headers.insert(TOKEN_HEADER, token_value);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|err| AppError::Platform(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            api_url,
            group_id,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{path}", self.api_url))
    }

    async fn send(&self, request: RequestBuilder) -> AppResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|err| AppError::Platform(format!("failed to call GitLab: {err}")))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(AppError::Auth(
                "GitLab rejected the token (401); it is probably expired or missing scopes. \
                 Generate a new token and run `labctl config init`."
                    .to_string(),
            ));
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::Platform(format!(
                "GitLab responded with {status}: {body}"
            )));
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let response = self.send(self.request(Method::GET, path)).await?;
        response
            .json()
            .await
            .map_err(|err| AppError::Platform(format!("failed to parse GitLab response: {err}")))
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> AppResult<T> {
        let response = self.send(self.request(method, path).json(body)).await?;
        response
            .json()
            .await
            .map_err(|err| AppError::Platform(format!("failed to parse GitLab response: {err}")))
    }

    async fn send_ignore_body<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> AppResult<()> {
        self.send(self.request(method, path).json(body)).await?;
        Ok(())
    }
}

#[async_trait]
impl PlatformService for GitLabClient {
    async fn create_issue(&self, project_id: &str, draft: &IssueDraft) -> AppResult<CreatedIssue> {
        let assignee = self.current_user().await?;

        // Iteration assignment and time estimates ride along as quick
        // actions in the description; the REST payload has no direct
        // fields for them.
        let mut description = String::new();
        if let Some(iteration) = &draft.iteration {
            description.push_str(&format!("/iteration *iteration:{} ", iteration.id));
        }
        if let Some(minutes) = draft.settings.estimated_time {
            description.push_str(&format!("\n/estimate {minutes}m "));
        }

        let mut body = json!({
            "title": draft.title,
            "assignee_ids": [assignee.id],
            "issue_type": draft.settings.issue_type.as_str(),
            "description": description,
        });
        if !draft.settings.labels.is_empty() {
            body["labels"] = json!(draft.settings.labels.join(","));
        }
        if let Some(weight) = draft.settings.weight {
            body["weight"] = json!(weight);
        }
        if let Some(milestone_id) = draft.milestone_id {
            body["milestone_id"] = json!(milestone_id);
        }
        if let Some(epic) = &draft.epic {
            body["epic_id"] = json!(epic.id);
        }

        self.send_json(Method::POST, &format!("/projects/{project_id}/issues"), &body)
            .await
    }

    async fn create_branch(
        &self,
        project_id: &str,
        name: &BranchName,
        ref_branch: &str,
        issue_iid: u64,
    ) -> AppResult<CreatedBranch> {
        let body = json!({
            "branch": name.as_str(),
            "ref": ref_branch,
            "issue_iid": issue_iid,
        });
        self.send_json(
            Method::POST,
            &format!("/projects/{project_id}/repository/branches"),
            &body,
        )
        .await
    }

    async fn create_merge_request(
        &self,
        project_id: &str,
        draft: &MergeRequestDraft,
    ) -> AppResult<MergeRequest> {
        let assignee = self.current_user().await?;

        let mut body = json!({
            "title": draft.title,
            "description": draft.description,
            "source_branch": draft.source_branch,
            "target_branch": draft.target_branch,
            "issue_iid": draft.issue_iid,
            "assignee_ids": [assignee.id],
        });
        if draft.squash {
            body["squash"] = json!(true);
        }
        if draft.remove_source_branch {
            body["remove_source_branch"] = json!(true);
        }
        if !draft.labels.is_empty() {
            body["labels"] = json!(draft.labels.join(","));
        }
        if let Some(milestone_id) = draft.milestone_id {
            body["milestone_id"] = json!(milestone_id);
        }

        self.send_json(
            Method::POST,
            &format!("/projects/{project_id}/merge_requests"),
            &body,
        )
        .await
    }

    async fn list_milestones(&self) -> AppResult<Vec<Milestone>> {
        self.get_json(&format!("/groups/{}/milestones?state=active", self.group_id))
            .await
    }

    async fn list_iterations(&self) -> AppResult<Vec<Iteration>> {
        self.get_json(&format!("/groups/{}/iterations?state=opened", self.group_id))
            .await
    }

    async fn list_epics(&self) -> AppResult<Vec<Epic>> {
        self.get_json(&format!(
            "/groups/{}/epics?per_page=1000&state=opened",
            self.group_id
        ))
        .await
    }

    async fn list_group_labels(&self, search: &str) -> AppResult<Vec<Label>> {
        self.get_json(&format!("/groups/{}/labels?search={search}", self.group_id))
            .await
    }

    async fn current_user(&self) -> AppResult<User> {
        self.get_json("/user").await
    }

    async fn get_user(&self, id: u64) -> AppResult<User> {
        self.get_json(&format!("/users/{id}")).await
    }

    async fn list_projects(&self, search: &str) -> AppResult<Vec<Project>> {
        self.get_json(&format!("/projects?membership=true&search={search}"))
            .await
    }

    async fn merge_request_for_branch(
        &self,
        project_id: &str,
        branch: &str,
    ) -> AppResult<Option<MergeRequest>> {
        let merge_requests: Vec<MergeRequest> = self
            .get_json(&format!(
                "/projects/{project_id}/merge_requests?source_branch={branch}"
            ))
            .await?;
        Ok(merge_requests
            .into_iter()
            .find(|mr| mr.source_branch == branch))
    }

    async fn update_reviewers(
        &self,
        project_id: &str,
        mr_iid: u64,
        reviewer_ids: &[u64],
    ) -> AppResult<()> {
        let body = json!({ "reviewer_ids": reviewer_ids });
        self.send_ignore_body(
            Method::PUT,
            &format!("/projects/{project_id}/merge_requests/{mr_iid}"),
            &body,
        )
        .await
    }

    async fn enable_auto_merge(&self, project_id: &str, mr_iid: u64) -> AppResult<()> {
        let body = json!({
            "merge_request_iid": mr_iid,
            "should_remove_source_branch": true,
            "merge_when_pipeline_succeeds": true,
            "auto_merge_strategy": "merge_when_pipeline_succeeds",
        });
        self.send_ignore_body(
            Method::PUT,
            &format!("/projects/{project_id}/merge_requests/{mr_iid}/merge"),
            &body,
        )
        .await
    }

    async fn add_spent_time(
        &self,
        project_id: &str,
        issue_iid: u64,
        minutes: u32,
    ) -> AppResult<()> {
        let body = json!({ "body": format!("/spend {minutes}m") });
        self.send_ignore_body(
            Method::POST,
            &format!("/projects/{project_id}/issues/{issue_iid}/notes"),
            &body,
        )
        .await
    }

    async fn close_issue(&self, project_id: &str, issue_iid: u64) -> AppResult<()> {
        let body = json!({ "state_event": "close" });
        self.send_ignore_body(
            Method::PUT,
            &format!("/projects/{project_id}/issues/{issue_iid}"),
            &body,
        )
        .await
    }

    async fn merge_request_diff(&self, project_id: &str, mr_iid: u64) -> AppResult<String> {
        #[derive(serde::Deserialize)]
        struct Changes {
            changes: Vec<Change>,
        }
        #[derive(serde::Deserialize)]
        struct Change {
            new_path: String,
            diff: String,
        }

        let changes: Changes = self
            .get_json(&format!(
                "/projects/{project_id}/merge_requests/{mr_iid}/changes"
            ))
            .await?;
        Ok(changes
            .changes
            .into_iter()
            .map(|change| format!("--- {}\n{}", change.new_path, change.diff))
            .collect::<Vec<_>>()
            .join("\n"))
    }

    async fn post_merge_request_note(
        &self,
        project_id: &str,
        mr_iid: u64,
        note: &str,
    ) -> AppResult<()> {
        let body = json!({ "body": note });
        self.send_ignore_body(
            Method::POST,
            &format!("/projects/{project_id}/merge_requests/{mr_iid}/notes"),
            &body,
        )
        .await
    }

    async fn list_pipelines(&self, project_id: &str, ref_name: &str) -> AppResult<Vec<Pipeline>> {
        self.get_json(&format!(
            "/projects/{project_id}/pipelines?per_page=50&order_by=updated_at&sort=desc&ref={ref_name}"
        ))
        .await
    }

    async fn list_pipeline_jobs(
        &self,
        project_id: &str,
        pipeline_id: u64,
    ) -> AppResult<Vec<PipelineJob>> {
        self.get_json(&format!(
            "/projects/{project_id}/pipelines/{pipeline_id}/jobs"
        ))
        .await
    }
}
