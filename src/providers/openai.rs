//! OpenAI chat-completions client.
//!
//! Speaks `/chat/completions` in batch and SSE streaming modes. Streaming
//! responses are pumped through an unbounded channel by a background task;
//! the caller pulls fragments off the `CompletionStream` at its own pace.

use anyhow::Result;
use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::config::schema::ApiConfig;
use crate::context::message::Message;
use crate::errors::{ConfigError, ProviderError};
use crate::providers::base::{CompletionClient, CompletionStream, StreamEvent};

/// Default API endpoint.
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Client for the OpenAI chat-completions API.
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    organization: Option<String>,
    api_base: String,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            organization: None,
            api_base: OPENAI_API_BASE.to_string(),
        }
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Build a client from the environment, the way notebook deployments
    /// usually configure it. The key is required; the organization is not.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let mut client = Self::new(api_key);
        if let Some(org) = std::env::var("OPENAI_ORGANIZATION")
            .ok()
            .filter(|o| !o.is_empty())
        {
            client.organization = Some(org);
        }
        Ok(client)
    }

    /// Build a client from loaded configuration (already env-overlaid).
    pub fn from_config(api: &ApiConfig) -> Result<Self, ConfigError> {
        if api.api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        let mut client = Self::new(api.api_key.clone()).with_api_base(api.api_base.clone());
        client.organization = api.organization.clone();
        Ok(client)
    }

    fn request(&self, body: &serde_json::Value) -> reqwest::RequestBuilder {
        let url = format!("{}/chat/completions", self.api_base);
        let mut request = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(body);
        if let Some(org) = &self.organization {
            request = request.header("OpenAI-Organization", org);
        }
        request
    }
}

fn status_error(status: u16, message: String) -> ProviderError {
    if status == 401 || status == 403 {
        ProviderError::AuthError { status, message }
    } else {
        ProviderError::ServerError { status, message }
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, model: &str, messages: &[Message]) -> Result<String> {
        let body = serde_json::json!({
            "model": model,
            "messages": messages,
            "stream": false,
        });

        let response = self
            .request(&body)
            .send()
            .await
            .map_err(|e| ProviderError::HttpError(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::ResponseReadError(e.to_string()))?;

        if !status.is_success() {
            warn!("completion API returned status {status}: {text}");
            return Err(status_error(status.as_u16(), text).into());
        }

        let data: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| ProviderError::JsonParseError(e.to_string()))?;

        let content = data
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
            .ok_or(ProviderError::MissingContent)?;

        Ok(content.to_string())
    }

    async fn complete_stream(&self, model: &str, messages: &[Message]) -> Result<CompletionStream> {
        let body = serde_json::json!({
            "model": model,
            "messages": messages,
            "stream": true,
        });

        let response = self
            .request(&body)
            .send()
            .await
            .map_err(|e| ProviderError::HttpError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!("streaming completion API returned status {status}: {text}");
            return Err(status_error(status.as_u16(), text).into());
        }

        let (tx, stream) = CompletionStream::channel();
        let byte_stream = response.bytes_stream();
        tokio::spawn(async move {
            pump_sse(byte_stream, tx).await;
        });

        Ok(stream)
    }
}

/// Forward SSE content deltas into the stream channel.
///
/// Every `data:` line carrying a `choices[0].delta.content` is forwarded
/// verbatim, in arrival order; `[DONE]` (or the connection closing) ends the
/// stream.
async fn pump_sse(
    byte_stream: impl futures_util::Stream<Item = Result<bytes::Bytes, reqwest::Error>>,
    tx: UnboundedSender<StreamEvent>,
) {
    let mut line_buffer = String::new();
    let mut stream = Box::pin(byte_stream);

    while let Some(result) = stream.next().await {
        let bytes = match result {
            Ok(b) => b,
            Err(e) => {
                warn!("SSE stream error: {}", e);
                break;
            }
        };

        line_buffer.push_str(&String::from_utf8_lossy(&bytes));

        // Process complete lines.
        while let Some(newline_pos) = line_buffer.find('\n') {
            let line = line_buffer[..newline_pos]
                .trim_end_matches('\r')
                .to_string();
            line_buffer = line_buffer[newline_pos + 1..].to_string();

            if line.is_empty() || !line.starts_with("data: ") {
                continue;
            }

            let data = &line[6..];
            if data == "[DONE]" {
                let _ = tx.send(StreamEvent::Done);
                return;
            }

            if let Some(content) = delta_content(data) {
                let _ = tx.send(StreamEvent::Delta(content));
            }
        }
    }

    // Stream ended without [DONE].
    let _ = tx.send(StreamEvent::Done);
}

/// `choices[0].delta.content` of one SSE chunk, when present.
fn delta_content(data: &str) -> Option<String> {
    let chunk: serde_json::Value = match serde_json::from_str(data) {
        Ok(v) => v,
        Err(e) => {
            debug!("SSE parse error (skipping chunk): {}", e);
            return None;
        }
    };

    chunk
        .get("choices")?
        .as_array()?
        .first()?
        .get("delta")?
        .get("content")?
        .as_str()
        .map(|s| s.to_string())
}
