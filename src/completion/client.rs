//! OpenAI-compatible chat completions client

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::{CompletionClient, CompletionError, Temperature};
use crate::config::CompletionConfig;
use crate::prompt::RenderedPrompt;

/// Chat completions client for OpenAI and compatible endpoints
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    endpoint: String,
    model: String,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 1],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl OpenAiClient {
    pub fn new(config: &CompletionConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client for completion service")?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request<'a>(
        &'a self,
        prompt: &'a RenderedPrompt,
        temperature: Temperature,
    ) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: [Message {
                role: "user",
                content: prompt.as_str(),
            }],
            temperature: temperature.value(),
            max_tokens: self.max_tokens,
        }
    }
}

impl CompletionClient for OpenAiClient {
    async fn complete(
        &self,
        prompt: &RenderedPrompt,
        temperature: Temperature,
        api_key: &str,
    ) -> Result<String, CompletionError> {
        if api_key.trim().is_empty() {
            return Err(CompletionError::Auth("no API key configured".to_string()));
        }

        let started = Instant::now();
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&self.build_request(prompt, temperature))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        tracing::debug!(
            "Completion service answered {} after {:?}",
            status,
            started.elapsed()
        );

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &error_text));
        }

        let body = response.text().await.map_err(transport_error)?;
        parse_completion(&body)
    }
}

/// Map a non-success HTTP status to the completion error taxonomy
pub fn classify_status(status: StatusCode, body: &str) -> CompletionError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    let message = if message.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("no details")
            .to_string()
    } else {
        message
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CompletionError::Auth(message),
        StatusCode::TOO_MANY_REQUESTS => CompletionError::RateLimit(message),
        StatusCode::REQUEST_TIMEOUT
        | StatusCode::INTERNAL_SERVER_ERROR
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => CompletionError::TransientNetwork(message),
        _ => CompletionError::Service {
            status: status.as_u16(),
            message,
        },
    }
}

fn transport_error(err: reqwest::Error) -> CompletionError {
    if err.is_decode() {
        CompletionError::MalformedResponse(err.to_string())
    } else if err.is_timeout() {
        CompletionError::TransientNetwork(format!("request timed out: {}", err))
    } else {
        CompletionError::TransientNetwork(err.to_string())
    }
}

fn parse_completion(body: &str) -> Result<String, CompletionError> {
    let chat_response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;

    chat_response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| CompletionError::MalformedResponse("no completion in response".into()))
}
