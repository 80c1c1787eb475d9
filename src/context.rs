use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{
    LanguageModelService, PlatformService, PromptService, VersionControlService,
};

/// Everything a workflow needs, wired up once in `main` and passed by
/// reference. Workflows never construct their own collaborators.
#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub platform: Arc<dyn PlatformService>,
    pub version_control: Arc<dyn VersionControlService>,
    pub prompt: Arc<dyn PromptService>,
    pub language_model: Arc<dyn LanguageModelService>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        platform: Arc<dyn PlatformService>,
        version_control: Arc<dyn VersionControlService>,
        prompt: Arc<dyn PromptService>,
        language_model: Arc<dyn LanguageModelService>,
    ) -> Self {
        Self {
            config,
            platform,
            version_control,
            prompt,
            language_model,
        }
    }
}
