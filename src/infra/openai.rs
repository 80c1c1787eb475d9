use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::services::LanguageModelService;

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

const SUMMARY_SYSTEM_PROMPT: &str = "You are a helpful assistant that summarizes git commits. \
     Provide a concise, well-organized summary of the main changes and themes.";

const REVIEW_SYSTEM_PROMPT: &str = "You are a senior engineer reviewing a merge request. \
     Point out bugs, risky changes and missing tests; be brief and concrete.";

/// OpenAI chat-completions client. Constructed even when no key is
/// configured; the key check happens at call time so commands that
/// never touch the model work without one.
pub struct OpenAiClient {
    http: Client,
    api_key: Option<String>,
    model: String,
}

impl OpenAiClient {
    pub fn new(api_key: Option<String>, model: String) -> Self {
        Self {
            http: Client::new(),
            api_key,
            model,
        }
    }

    async fn chat(&self, system: &str, user: String) -> AppResult<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AppError::LanguageModel(
                "OpenAI API key not configured; run `labctl config init` to set it".to_string(),
            )
        })?;

        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        };

        let response = self
            .http
            .post(CHAT_COMPLETIONS_URL)
            .header(AUTHORIZATION, format!("Bearer {api_key}"))
            .json(&request_body)
            .send()
            .await
            .map_err(|err| AppError::LanguageModel(format!("failed to call OpenAI: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::LanguageModel(format!(
                "OpenAI responded with {status}: {body}"
            )));
        }

        let payload: ChatResponse = response.json().await.map_err(|err| {
            AppError::LanguageModel(format!("failed to parse OpenAI response: {err}"))
        })?;

        payload
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AppError::LanguageModel("OpenAI returned no choices".to_string()))
    }
}

#[async_trait]
impl LanguageModelService for OpenAiClient {
    async fn summarize_commits(&self, commits: &str) -> AppResult<String> {
        self.chat(
            SUMMARY_SYSTEM_PROMPT,
            format!("Please summarize these git commits in a clear, bulleted format:\n\n{commits}"),
        )
        .await
    }

    async fn review_diff(&self, diff: &str) -> AppResult<String> {
        self.chat(
            REVIEW_SYSTEM_PROMPT,
            format!("Review this merge request diff:\n\n{diff}"),
        )
        .await
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}
