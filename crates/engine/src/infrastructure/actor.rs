//! Conversational LLM actor: accumulate observations, then ask a question.
//!
//! An actor wraps one [`LlmPort`] with a fixed system prompt. Observations
//! are kept in the order they were made and sent ahead of every query.
//! Queries either return free text or, when a [`ResponseShape`] is given,
//! a JSON object the caller decodes into its own type.

use std::sync::Arc;

use serde_json::Value;

use crate::infrastructure::ports::{
    ChatMessage, FinishReason, LlmError, LlmPort, LlmRequest, ResponseFormat, TokenUsage,
};

/// Named JSON shape a structured query must answer with.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseShape {
    pub name: String,
    pub schema: Value,
}

impl ResponseShape {
    pub fn new(name: impl Into<String>, schema: Value) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }

    fn instructions(&self) -> String {
        let schema =
            serde_json::to_string_pretty(&self.schema).unwrap_or_else(|_| self.schema.to_string());
        format!(
            "Respond with a single JSON object of type `{}` matching this JSON schema:\n{}\n\nDo not include any text outside the JSON object.",
            self.name, schema
        )
    }
}

/// Outcome of a query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResponse {
    /// Free-text answer to an unstructured query.
    Text(String),
    /// JSON object answering a structured query.
    Structured(Value),
    /// The model answered a structured query with something unusable.
    ExtractionFailed { raw: String, reason: String },
}

impl QueryResponse {
    /// Interpret raw model output as the answer to a structured query.
    pub fn from_structured_output(raw: &str) -> Self {
        let candidate = extract_json(raw);
        match serde_json::from_str::<Value>(&candidate) {
            Ok(value @ Value::Object(_)) => Self::Structured(value),
            Ok(other) => Self::ExtractionFailed {
                raw: raw.to_string(),
                reason: format!("expected a JSON object, got {}", json_kind(&other)),
            },
            Err(e) => Self::ExtractionFailed {
                raw: raw.to_string(),
                reason: e.to_string(),
            },
        }
    }

    /// The answer as plain text, whatever its kind.
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Structured(value) => value.to_string(),
            Self::ExtractionFailed { raw, .. } => raw,
        }
    }
}

/// A query's answer plus how the model finished producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct ActorReply {
    pub response: QueryResponse,
    pub finish_reason: FinishReason,
    pub usage: Option<TokenUsage>,
}

impl ActorReply {
    /// Whether the model stopped at its token limit rather than finishing.
    pub fn is_truncated(&self) -> bool {
        self.finish_reason == FinishReason::Length
    }
}

/// One LLM persona with its own running context.
pub struct LlmActor {
    name: String,
    llm: Arc<dyn LlmPort>,
    system_prompt: String,
    observations: Vec<String>,
}

impl LlmActor {
    pub fn new(name: impl Into<String>, llm: Arc<dyn LlmPort>, system_prompt: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            llm,
            system_prompt: system_prompt.into(),
            observations: Vec::new(),
        }
    }

    /// Append context for later queries.
    pub fn observe(&mut self, text: impl Into<String>) {
        self.observations.push(text.into());
    }

    /// Ask the model a question against everything observed so far.
    pub async fn query(
        &self,
        prompt: &str,
        expected: Option<&ResponseShape>,
    ) -> Result<ActorReply, LlmError> {
        let request = self.build_request(prompt, expected);
        tracing::debug!(
            actor = %self.name,
            observations = self.observations.len(),
            shape = expected.map(|s| s.name.as_str()),
            "Querying actor"
        );

        let response = self.llm.generate(request).await?;
        if let Some(usage) = &response.usage {
            tracing::debug!(
                actor = %self.name,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "Actor token usage"
            );
        }
        match response.finish_reason {
            FinishReason::Length => {
                tracing::warn!(actor = %self.name, "Answer stopped at the token limit")
            }
            FinishReason::ContentFilter => {
                tracing::warn!(actor = %self.name, "Answer was cut by the content filter")
            }
            FinishReason::Stop => {}
        }

        let parsed = match expected {
            None => QueryResponse::Text(response.content.trim().to_string()),
            Some(shape) => {
                let parsed = QueryResponse::from_structured_output(&response.content);
                if let QueryResponse::ExtractionFailed { reason, .. } = &parsed {
                    tracing::warn!(actor = %self.name, shape = %shape.name, %reason, "Structured extraction failed");
                }
                parsed
            }
        };
        Ok(ActorReply {
            response: parsed,
            finish_reason: response.finish_reason,
            usage: response.usage,
        })
    }

    fn build_request(&self, prompt: &str, expected: Option<&ResponseShape>) -> LlmRequest {
        let mut messages = Vec::new();
        if !self.observations.is_empty() {
            messages.push(ChatMessage::user(self.observations.join("\n\n")));
        }

        let task = match expected {
            Some(shape) => format!("{prompt}\n\n{}", shape.instructions()),
            None => prompt.to_string(),
        };
        messages.push(ChatMessage::user(task));

        let mut request = LlmRequest::new(messages).with_system_prompt(self.system_prompt.clone());
        if expected.is_some() {
            request = request.with_response_format(ResponseFormat::JsonObject);
        }
        request
    }
}

/// Pull the JSON payload out of a response that may wrap it in a code fence.
fn extract_json(response: &str) -> String {
    let trimmed = response.trim();

    if let Some(start) = trimmed.find("```") {
        if let Some(end) = trimmed[start + 3..].find("```") {
            let content = trimmed[start + 3..start + 3 + end].trim();
            // Skip language identifier if present
            if let Some(newline_pos) = content.find('\n') {
                if !content[..newline_pos].trim_start().starts_with('{') {
                    return content[newline_pos + 1..].trim().to_string();
                }
            }
            return content.to_string();
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            return trimmed[start..=end].to_string();
        }
    }

    trimmed.to_string()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{LlmResponse, MessageRole, MockLlmPort};
    use serde_json::json;

    fn shape() -> ResponseShape {
        ResponseShape::new("Verdict", json!({"type": "object"}))
    }

    #[test]
    fn fenced_json_is_unwrapped() {
        let raw = "Here you go:\n```json\n{\"ok\": true}\n```\nanything else?";
        assert_eq!(
            QueryResponse::from_structured_output(raw),
            QueryResponse::Structured(json!({"ok": true}))
        );
    }

    #[test]
    fn bare_object_with_chatter_is_found() {
        let raw = "Sure. {\"ok\": false} Hope that helps.";
        assert_eq!(
            QueryResponse::from_structured_output(raw),
            QueryResponse::Structured(json!({"ok": false}))
        );
    }

    #[test]
    fn non_object_json_fails_extraction() {
        let parsed = QueryResponse::from_structured_output("[1, 2]");
        assert!(
            matches!(parsed, QueryResponse::ExtractionFailed { ref reason, .. } if reason.contains("an array"))
        );
    }

    #[test]
    fn prose_fails_extraction_and_keeps_raw() {
        let parsed = QueryResponse::from_structured_output("No new characters appeared.");
        match parsed {
            QueryResponse::ExtractionFailed { raw, .. } => {
                assert_eq!(raw, "No new characters appeared.")
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn observations_precede_the_task_in_order() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .withf(|request| {
                request.system_prompt.as_deref() == Some("You narrate.")
                    && request.response_format == ResponseFormat::Text
                    && request.messages.len() == 2
                    && request.messages[0].role == MessageRole::User
                    && request.messages[0].content == "first\n\nsecond"
                    && request.messages[1].content == "Tell a story"
            })
            .times(1)
            .returning(|_| Ok(LlmResponse::text("  Once upon a tide.  ")));

        let mut actor = LlmActor::new("director", Arc::new(llm), "You narrate.");
        actor.observe("first");
        actor.observe("second");

        let answer = actor.query("Tell a story", None).await.expect("query");
        assert_eq!(answer.response, QueryResponse::Text("Once upon a tide.".into()));
        assert!(!answer.is_truncated());
    }

    #[tokio::test]
    async fn structured_query_requests_json_and_embeds_schema() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .withf(|request| {
                request.response_format == ResponseFormat::JsonObject
                    && request.messages.len() == 1
                    && request.messages[0].content.contains("`Verdict`")
            })
            .times(1)
            .returning(|_| Ok(LlmResponse::text("{\"ok\": true}")));

        let actor = LlmActor::new("archivist", Arc::new(llm), "You catalogue.");
        let answer = actor.query("Judge", Some(&shape())).await.expect("query");
        assert_eq!(answer.response, QueryResponse::Structured(json!({"ok": true})));
    }

    #[tokio::test]
    async fn reply_reports_truncation_and_usage() {
        let usage = TokenUsage {
            prompt_tokens: 900,
            completion_tokens: 100,
            total_tokens: 1000,
        };
        let mut llm = MockLlmPort::new();
        llm.expect_generate().times(1).returning(move |_| {
            Ok(LlmResponse {
                content: "Mira rowed out past the".into(),
                finish_reason: FinishReason::Length,
                usage: Some(usage),
            })
        });

        let actor = LlmActor::new("director", Arc::new(llm), "You narrate.");
        let answer = actor.query("Tell a story", None).await.expect("query");
        assert!(answer.is_truncated());
        assert_eq!(answer.usage, Some(usage));
        assert_eq!(answer.response.into_text(), "Mira rowed out past the");
    }

    #[tokio::test]
    async fn llm_failure_propagates() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .returning(|_| Err(LlmError::RequestFailed("connection refused".into())));

        let actor = LlmActor::new("director", Arc::new(llm), "You narrate.");
        let err = actor.query("Tell a story", None).await.expect_err("fails");
        assert!(matches!(err, LlmError::RequestFailed(_)));
    }
}
