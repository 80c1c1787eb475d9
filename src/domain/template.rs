use serde::{Deserialize, Serialize};

/// Issue type understood by the platform. Anything beyond the two the
/// CLI creates itself round-trips through `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IssueType {
    Issue,
    Incident,
    Other(String),
}

impl IssueType {
    pub fn as_str(&self) -> &str {
        match self {
            IssueType::Issue => "issue",
            IssueType::Incident => "incident",
            IssueType::Other(value) => value,
        }
    }
}

impl Default for IssueType {
    fn default() -> Self {
        IssueType::Issue
    }
}

impl From<String> for IssueType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "issue" => IssueType::Issue,
            "incident" => IssueType::Incident,
            _ => IssueType::Other(value),
        }
    }
}

impl From<IssueType> for String {
    fn from(value: IssueType) -> Self {
        value.as_str().to_string()
    }
}

/// Target project(s) of a template. A list signals fan-out: the same
/// issue is created in every listed project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProjectTarget {
    One(String),
    Many(Vec<String>),
}

impl ProjectTarget {
    pub fn ids(&self) -> Vec<String> {
        match self {
            ProjectTarget::One(id) => vec![id.clone()],
            ProjectTarget::Many(ids) => ids.clone(),
        }
    }
}

/// A named bundle of default issue attributes, loaded once from the
/// config file and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub name: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(rename = "type", default)]
    pub issue_type: IssueType,
    #[serde(default)]
    pub weight: Option<u32>,
    #[serde(default)]
    pub estimated_time: Option<u32>,
    #[serde(default)]
    pub project_ids: Option<ProjectTarget>,
    #[serde(default)]
    pub only_issue: bool,
}

/// Result of looking a template name up in the catalogue. The custom
/// sentinel is an explicit "no predefined settings" answer, distinct
/// from a name that is simply not configured.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedTemplate {
    Named(Template),
    Custom,
}

impl ResolvedTemplate {
    pub fn settings(&self) -> IssueSettings {
        match self {
            ResolvedTemplate::Named(template) => IssueSettings {
                labels: template.labels.clone(),
                issue_type: template.issue_type.clone(),
                weight: template.weight,
                estimated_time: template.estimated_time,
            },
            ResolvedTemplate::Custom => IssueSettings::default(),
        }
    }

    pub fn only_issue(&self) -> bool {
        match self {
            ResolvedTemplate::Named(template) => template.only_issue,
            ResolvedTemplate::Custom => false,
        }
    }

    pub fn project_ids(&self) -> Option<Vec<String>> {
        match self {
            ResolvedTemplate::Named(template) => {
                template.project_ids.as_ref().map(ProjectTarget::ids)
            }
            ResolvedTemplate::Custom => None,
        }
    }
}

/// The merge-ready attribute set an issue is created with. Built by
/// copying from a template; runtime overrides always produce a new
/// value so the shared template stays untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueSettings {
    pub labels: Vec<String>,
    pub issue_type: IssueType,
    pub weight: Option<u32>,
    pub estimated_time: Option<u32>,
}

impl IssueSettings {
    pub fn with_estimated_time(&self, minutes: u32) -> Self {
        let mut copy = self.clone();
        copy.estimated_time = Some(minutes);
        copy
    }
}
