//! Chat-completions LLM client (OpenAI-compatible API)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::infrastructure::ports::{
    FinishReason, LlmError, LlmPort, LlmRequest, LlmResponse, MessageRole, ResponseFormat,
    TokenUsage,
};

/// Default base URL for the hosted API.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Default model for both the director and the archivist.
pub const DEFAULT_MODEL: &str = "gpt-4-1106-preview";

/// Default request timeout. Narration calls can be slow.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Client for any server speaking the `/v1/chat/completions` protocol.
#[derive(Clone)]
pub struct ChatCompletionsClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl ChatCompletionsClient {
    pub fn new(base_url: &str, model: &str, api_key: Option<String>, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.filter(|key| !key.is_empty()),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }
}

#[async_trait]
impl LlmPort for ChatCompletionsClient {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        let api_request = build_request(&self.model, &request);

        let mut builder = self.client.post(self.endpoint()).json(&api_request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        tracing::debug!(
            model = %self.model,
            messages = api_request.messages.len(),
            json = request.response_format == ResponseFormat::JsonObject,
            "Sending chat completion request"
        );

        let response = builder
            .send()
            .await
            .map_err(|e| LlmError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .map_err(|e| LlmError::RequestFailed(e.to_string()))?;
            return Err(LlmError::RequestFailed(format!("{status}: {error_text}")));
        }

        let api_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        convert_response(api_response)
    }
}

fn build_request(model: &str, request: &LlmRequest) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        messages: build_messages(request),
        response_format: match request.response_format {
            ResponseFormat::Text => None,
            ResponseFormat::JsonObject => Some(ApiResponseFormat {
                r#type: "json_object".to_string(),
            }),
        },
    }
}

fn build_messages(request: &LlmRequest) -> Vec<ApiMessage> {
    let mut messages = Vec::new();

    if let Some(system) = &request.system_prompt {
        messages.push(ApiMessage {
            role: "system".to_string(),
            content: Some(system.clone()),
        });
    }

    for msg in &request.messages {
        messages.push(ApiMessage {
            role: match msg.role {
                MessageRole::User => "user",
                MessageRole::Assistant => "assistant",
            }
            .to_string(),
            content: Some(msg.content.clone()),
        });
    }

    messages
}

fn convert_response(response: ChatResponse) -> Result<LlmResponse, LlmError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::InvalidResponse("No choices in LLM response".to_string()))?;

    let finish_reason = match choice.finish_reason.as_deref() {
        Some("length") => FinishReason::Length,
        Some("content_filter") => FinishReason::ContentFilter,
        _ => FinishReason::Stop,
    };

    Ok(LlmResponse {
        content: choice.message.content.unwrap_or_default(),
        finish_reason,
        usage: response.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        }),
    })
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ApiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ApiResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ApiResponseFormat {
    r#type: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ApiChoice>,
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize, Default)]
struct ApiChoice {
    message: ApiMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}
