//! Streaming chat-completion backends.

use std::pin::Pin;

use async_stream::try_stream;
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CompletionError;
use crate::transcript::Turn;

use super::router::Provider;
use super::sse::{SseDecoder, SseEvent};

/// Incremental text fragments of one completion, in arrival order.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, CompletionError>> + Send>>;

/// Capability to stream a chat completion for a turn sequence.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    fn provider(&self) -> Provider;

    async fn stream_chat(
        &self,
        model: &str,
        turns: &[Turn],
    ) -> Result<FragmentStream, CompletionError>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Turn],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reasoning_effort: Option<&'static str>,
}

#[derive(Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: StreamDelta,
}

#[derive(Deserialize, Default)]
struct StreamDelta {
    content: Option<String>,
}

/// Extract the text delta of one `data:` payload, if any.
fn parse_chunk(provider: Provider, data: &str) -> Result<Option<String>, CompletionError> {
    let chunk: StreamChunk =
        serde_json::from_str(data).map_err(|e| CompletionError::InvalidPayload {
            provider,
            detail: e.to_string(),
        })?;

    Ok(chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .filter(|text| !text.is_empty()))
}

/// OpenAI-compatible `/chat/completions` endpoint over HTTP.
pub struct HttpChatBackend {
    provider: Provider,
    base_url: String,
    api_key: Option<String>,
    http: reqwest::Client,
}

impl HttpChatBackend {
    pub fn new(provider: Provider, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            provider,
            base_url: base_url.into(),
            api_key,
            http: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    fn provider(&self) -> Provider {
        self.provider
    }

    async fn stream_chat(
        &self,
        model: &str,
        turns: &[Turn],
    ) -> Result<FragmentStream, CompletionError> {
        let provider = self.provider;
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CompletionError::MissingApiKey {
                provider,
                env_var: provider.api_key_var(),
            })?;

        let request = ChatRequest {
            model,
            messages: turns,
            stream: true,
            reasoning_effort: provider.reasoning_effort(),
        };

        debug!("Streaming {} turns to {} ({})", turns.len(), provider, model);

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|source| CompletionError::Request { provider, source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Status {
                provider,
                status: status.as_u16(),
                body,
            });
        }

        let stream = try_stream! {
            let mut body = response.bytes_stream();
            let mut decoder = SseDecoder::new();
            let mut done = false;

            while let Some(chunk) = body.next().await {
                let chunk = chunk.map_err(|source| CompletionError::Stream { provider, source })?;

                for event in decoder.push(&chunk) {
                    match event {
                        SseEvent::Done => done = true,
                        SseEvent::Data(data) if !done => {
                            if let Some(text) = parse_chunk(provider, &data)? {
                                yield text;
                            }
                        }
                        SseEvent::Data(_) => {}
                    }
                }

                if done {
                    break;
                }
            }

            if !done {
                for event in decoder.finish() {
                    if let SseEvent::Data(data) = event {
                        if let Some(text) = parse_chunk(provider, &data)? {
                            yield text;
                        }
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}
