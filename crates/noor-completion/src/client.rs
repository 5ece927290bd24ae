use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::debug;

use crate::error::CompletionError;
use crate::prompt::dua_prompt;
use crate::types::{ChatMessage, ChatRequest, ChatResponse};

pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "openai/gpt-3.5-turbo";

/// Settings for the outbound completion call. Only the API key has no
/// sensible default.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub api_key: String,
    pub endpoint: String,
    pub model: String,
    /// Sent as `HTTP-Referer`, which OpenRouter uses to attribute traffic.
    pub site_url: String,
    /// Sent as `X-Title`.
    pub app_title: String,
}

impl CompletionConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.into(),
            model: DEFAULT_MODEL.into(),
            site_url: "http://localhost:3000".into(),
            app_title: "NoorAI".into(),
        }
    }
}

/// Single-turn chat completion client. One attempt per call: no retry and
/// no timeout beyond what the transport imposes.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl CompletionClient {
    pub fn new(config: CompletionConfig) -> Result<Self, CompletionError> {
        let mut headers = HeaderMap::new();

        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|e| CompletionError::Config(format!("invalid API key header value: {e}")))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(
            "http-referer",
            HeaderValue::from_str(&config.site_url)
                .map_err(|e| CompletionError::Config(format!("invalid site url: {e}")))?,
        );
        headers.insert(
            "x-title",
            HeaderValue::from_str(&config.app_title)
                .map_err(|e| CompletionError::Config(format!("invalid app title: {e}")))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint,
            model: config.model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send `prompt` as one user message and return the first choice's text.
    ///
    /// `Ok(None)` means the provider answered successfully but without any
    /// content.
    pub async fn complete(&self, prompt: &str) -> Result<Option<String>, CompletionError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user(prompt)],
        };

        let response = self.client.post(&self.endpoint).json(&request).send().await?;

        let status = response.status();
        debug!(status = %status, model = %self.model, "completion response received");

        let body = response.text().await?;
        if !status.is_success() {
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&body)?;
        Ok(parsed.first_content())
    }

    /// Ask for a dua matching `feeling`.
    pub async fn suggest_dua(&self, feeling: &str) -> Result<Option<String>, CompletionError> {
        self.complete(&dua_prompt(feeling)).await
    }
}
