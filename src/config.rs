use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::template::{ResolvedTemplate, Template};
use crate::error::{AppError, AppResult};

const CONFIG_DIR_NAME: &str = "labctl";
const CONFIG_FILE_NAME: &str = "config.json";
const DEFAULT_CUSTOM_TEMPLATE: &str = "Custom";
const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

pub fn config_directory() -> AppResult<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| {
        AppError::Configuration("could not determine the user config directory".to_string())
    })?;
    Ok(base.join(CONFIG_DIR_NAME))
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}

/// Per-project hint for finding the production deployment job in a
/// pipeline: match by stage name, job name, or both.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductionMapping {
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub job: Option<String>,
}

/// The configuration file as written to disk. Everything is optional
/// here; `AppConfig::from_stored` decides what is actually required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredConfig {
    pub base_url: Option<String>,
    pub group_id: Option<String>,
    pub token: Option<String>,
    pub custom_template: Option<String>,
    #[serde(default)]
    pub squash_commits: bool,
    #[serde(default)]
    pub delete_branch_after_merge: bool,
    pub developer_email: Option<String>,
    pub incident_project_id: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_model: Option<String>,
    #[serde(default)]
    pub templates: Vec<Template>,
    #[serde(default)]
    pub reviewers: Vec<u64>,
    #[serde(default)]
    pub production_mappings: HashMap<String, ProductionMapping>,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        Self::load_from(&config_file_path()?)
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|err| {
                AppError::Configuration(format!(
                    "invalid config file {}: {err}",
                    path.display()
                ))
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self) -> AppResult<()> {
        self.save_to(&config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to encode config: {err}")))?;
        fs::write(path, data)?;
        Ok(())
    }
}

/// Validated runtime view of the configuration. Built once in `main`
/// and handed to every component through `AppContext`; nothing reads
/// the config file after startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub group_id: String,
    pub token: String,
    pub custom_template: String,
    pub squash_commits: bool,
    pub delete_branch_after_merge: bool,
    pub developer_email: Option<String>,
    pub incident_project_id: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub reviewers: Vec<u64>,
    pub production_mappings: HashMap<String, ProductionMapping>,
    templates: Vec<Template>,
}

impl AppConfig {
    pub fn load() -> AppResult<Self> {
        Self::from_stored(StoredConfig::load()?)
    }

    pub fn from_stored(stored: StoredConfig) -> AppResult<Self> {
        let base_url = required(stored.base_url, "base_url")?;
        let group_id = required(stored.group_id, "group_id")?;
        let token = required(stored.token, "token")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            group_id,
            token,
            custom_template: stored
                .custom_template
                .unwrap_or_else(|| DEFAULT_CUSTOM_TEMPLATE.to_string()),
            squash_commits: stored.squash_commits,
            delete_branch_after_merge: stored.delete_branch_after_merge,
            developer_email: stored.developer_email,
            incident_project_id: stored.incident_project_id,
            openai_api_key: stored.openai_api_key,
            openai_model: stored
                .openai_model
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            reviewers: stored.reviewers,
            production_mappings: stored.production_mappings,
            templates: stored.templates,
        })
    }

    pub fn api_url(&self) -> String {
        format!("{}/api/v4", self.base_url)
    }

    /// Choices offered when picking a template: every configured name
    /// plus the custom sentinel.
    pub fn template_choices(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .templates
            .iter()
            .map(|template| template.name.clone())
            .collect();
        names.push(self.custom_template.clone());
        names
    }

    /// Looks a chosen template name up. The custom sentinel resolves to
    /// an explicit empty settings record; an unknown name resolves to
    /// `None` and must be treated as fatal by the caller.
    pub fn resolve_template(&self, name: &str) -> Option<ResolvedTemplate> {
        if name == self.custom_template {
            return Some(ResolvedTemplate::Custom);
        }
        self.templates
            .iter()
            .find(|template| template.name == name)
            .cloned()
            .map(ResolvedTemplate::Named)
    }
}

fn required(value: Option<String>, field: &str) -> AppResult<String> {
    value.filter(|v| !v.trim().is_empty()).ok_or_else(|| {
        AppError::Configuration(format!(
            "{field} is not configured; run `labctl config init` to set it"
        ))
    })
}
