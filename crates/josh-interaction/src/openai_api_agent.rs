//! OpenAIApiAgent - Direct REST API implementation for OpenAI GPT.
//!
//! This agent calls the OpenAI Chat Completions API directly.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::agent::{AgentError, CompletionAgent};

/// Model used when neither the config file nor the environment names one.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

const BASE_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Sampling temperature for the persona conversation.
const DEFAULT_TEMPERATURE: f32 = 1.0;

/// Agent implementation that talks to the OpenAI HTTP API.
///
/// One POST per completion, reqwest's default timeout, no retries.
#[derive(Clone)]
pub struct OpenAIApiAgent {
    client: Client,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl OpenAIApiAgent {
    /// Creates a new agent with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: None,
        }
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Overrides the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the maximum number of tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    async fn send_request(&self, body: &ChatCompletionRequest) -> Result<String, AgentError> {
        let response = self
            .client
            .post(BASE_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| AgentError::ExecutionFailed(format!("OpenAI API request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read OpenAI error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| AgentError::Parse(format!("Failed to parse OpenAI response: {err}")))?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl CompletionAgent for OpenAIApiAgent {
    fn describe(&self) -> &str {
        "OpenAI Chat Completions API"
    }

    async fn complete(&self, prompt: String) -> Result<String, AgentError> {
        if prompt.trim().is_empty() {
            return Err(AgentError::ExecutionFailed(
                "OpenAI payload must include text".into(),
            ));
        }

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        self.send_request(&request).await
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
    #[allow(dead_code)]
    r#type: Option<String>,
    #[allow(dead_code)]
    code: Option<String>,
}

fn extract_text_response(response: ChatCompletionResponse) -> Result<String, AgentError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| {
            AgentError::ExecutionFailed("OpenAI API returned no content in the response".into())
        })
}

fn map_http_error(status: StatusCode, body: String) -> AgentError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or(body);

    AgentError::Process {
        status_code: Some(status.as_u16()),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_response() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{ "choices": [ { "message": { "role": "assistant", "content": "Peace be with you" } } ] }"#,
        )
        .unwrap();

        let text = extract_text_response(response).unwrap();
        assert_eq!(text, "Peace be with you");
    }

    #[test]
    fn test_extract_text_response_empty_choices() {
        let response: ChatCompletionResponse = serde_json::from_str(r#"{ "choices": [] }"#).unwrap();

        let result = extract_text_response(response);
        assert!(matches!(result, Err(AgentError::ExecutionFailed(_))));
    }

    #[test]
    fn test_map_http_error_extracts_service_message() {
        let body = r#"{ "error": { "message": "Incorrect API key provided", "type": "invalid_request_error", "code": "invalid_api_key" } }"#;

        let err = map_http_error(StatusCode::UNAUTHORIZED, body.to_string());

        match err {
            AgentError::Process {
                status_code,
                message,
            } => {
                assert_eq!(status_code, Some(401));
                assert_eq!(message, "Incorrect API key provided");
            }
            other => panic!("Expected Process error, got {other:?}"),
        }
    }

    #[test]
    fn test_map_http_error_falls_back_to_raw_body() {
        let err = map_http_error(StatusCode::BAD_GATEWAY, "upstream unavailable".to_string());

        match err {
            AgentError::Process { message, .. } => assert_eq!(message, "upstream unavailable"),
            other => panic!("Expected Process error, got {other:?}"),
        }
    }

    #[test]
    fn test_request_serialization_skips_absent_max_tokens() {
        let request = ChatCompletionRequest {
            model: DEFAULT_OPENAI_MODEL.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: "Hi".to_string(),
            }],
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: None,
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"model\":\"gpt-4o\""));
        assert!(!json.contains("max_tokens"));
    }
}
