use serde::Deserialize;

/// Merge request returned by the platform, either freshly created or
/// looked up for a branch.
#[derive(Debug, Clone, Deserialize)]
pub struct MergeRequest {
    pub iid: u64,
    pub title: String,
    pub source_branch: String,
    #[serde(default)]
    pub description: String,
}

impl MergeRequest {
    /// Extracts the issue iid from the `Closes #<iid>` convention the
    /// CLI writes into every merge-request description.
    pub fn closed_issue_iid(&self) -> Option<u64> {
        let after_hash = self.description.split('#').nth(1)?;
        let digits: String = after_hash
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse().ok()
    }
}

pub fn closes_description(issue_iid: u64) -> String {
    format!("Closes #{issue_iid}")
}

/// Everything needed to open a merge request for a freshly created
/// issue branch.
#[derive(Debug, Clone)]
pub struct MergeRequestDraft {
    pub title: String,
    pub description: String,
    pub source_branch: String,
    pub target_branch: String,
    pub issue_iid: u64,
    pub labels: Vec<String>,
    pub milestone_id: Option<u64>,
    pub squash: bool,
    pub remove_source_branch: bool,
}
