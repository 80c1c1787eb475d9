pub mod language_model;
pub mod platform;
pub mod prompt;
pub mod version_control;

pub use language_model::LanguageModelService;
pub use platform::PlatformService;
pub use prompt::PromptService;
pub use version_control::VersionControlService;
