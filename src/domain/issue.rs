use serde::Deserialize;

use crate::domain::schedule::{Epic, Iteration};
use crate::domain::template::IssueSettings;

/// Everything needed to create one issue in one project. Built per
/// invocation and consumed by the platform client; never reused.
#[derive(Debug, Clone)]
pub struct IssueDraft {
    pub title: String,
    pub milestone_id: Option<u64>,
    pub epic: Option<Epic>,
    pub iteration: Option<Iteration>,
    pub settings: IssueSettings,
}

/// The platform's answer to a create-issue call. `iid` is scoped to
/// the project, not globally unique.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedIssue {
    pub iid: u64,
    pub title: String,
}
