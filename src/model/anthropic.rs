//! Anthropic Messages API session.
//!
//! Key shape differences from the OpenAI-style APIs: the system prompt is a
//! top-level `system` parameter, content is typed blocks, `max_tokens` is
//! required, and tool invocations stream as `tool_use` content blocks whose
//! arguments arrive as `input_json_delta` fragments that must be assembled
//! before the invocation is complete.

use std::collections::HashMap;
use std::time::Duration;

use futures::{stream, StreamExt};
use serde_json::{json, Value};

use crate::error::Error;
use crate::model::{sse, ModelPrompt, ModelSession};
use crate::types::events::{ModelEvent, StopReason};
use crate::types::message::{Message, MessageContent, Role};
use crate::types::tool::ToolInvocation;
use crate::{BoxStream, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 4096;

pub struct AnthropicSession {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl AnthropicSession {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Result<Self> {
        Self::with_base_url(api_key, model, DEFAULT_BASE_URL, timeout)
    }

    pub fn with_base_url(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            // Streamed generations outlive a single request timeout; bound
            // connect instead.
            .connect_timeout(timeout)
            .build()
            .map_err(|e| Error::model(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    fn build_body(&self, prompt: &ModelPrompt) -> Value {
        let messages: Vec<Value> = prompt.messages.iter().map(render_message).collect();
        let mut body = json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": DEFAULT_MAX_TOKENS,
            "stream": true,
        });
        if !prompt.system.is_empty() {
            body["system"] = json!(prompt.system);
        }
        if !prompt.tools.is_empty() {
            let tools: Vec<Value> = prompt
                .tools
                .iter()
                .map(|t| {
                    json!({
                        "name": t.name,
                        "description": t.description,
                        "input_schema": t.input_schema,
                    })
                })
                .collect();
            body["tools"] = json!(tools);
        }
        body
    }
}

fn render_message(message: &Message) -> Value {
    let role = match message.role {
        Role::User => "user",
        Role::Assistant => "assistant",
    };
    let content = match &message.content {
        MessageContent::Text(text) => json!([{ "type": "text", "text": text }]),
        MessageContent::Blocks(_) => serde_json::to_value(&message.content).unwrap_or(Value::Null),
    };
    json!({ "role": role, "content": content })
}

#[async_trait::async_trait]
impl ModelSession for AnthropicSession {
    async fn advance(&self, prompt: &ModelPrompt) -> Result<BoxStream<'static, ModelEvent>> {
        let body = self.build_body(prompt);
        let url = format!("{}/messages", self.base_url);

        tracing::debug!(model = %self.model, messages = prompt.messages.len(), "model step");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("accept", "text/event-stream")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::model(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::model(format!("HTTP {status}: {detail}")));
        }

        let frames = sse::frames(response.bytes_stream());
        Ok(decode_events(frames))
    }
}

/// In-flight tool_use block: model-assigned id/name plus the argument JSON
/// assembled from `input_json_delta` fragments. An unparseable buffer falls
/// back to an empty object and lets schema validation report the problem.
#[derive(Default)]
struct PendingToolUse {
    id: String,
    name: String,
    partial_json: String,
}

impl PendingToolUse {
    fn finalize(self) -> ToolInvocation {
        let arguments = if self.partial_json.trim().is_empty() {
            json!({})
        } else {
            serde_json::from_str(&self.partial_json).unwrap_or_else(|_| json!({}))
        };
        ToolInvocation {
            id: self.id,
            name: self.name,
            arguments,
        }
    }
}

struct DecodeState {
    frames: BoxStream<'static, Value>,
    pending: HashMap<u64, PendingToolUse>,
    stop_reason: Option<StopReason>,
    finished: bool,
}

fn decode_events(frames: BoxStream<'static, Value>) -> BoxStream<'static, ModelEvent> {
    let state = DecodeState {
        frames,
        pending: HashMap::new(),
        stop_reason: None,
        finished: false,
    };

    let stream = stream::unfold(state, |mut state| async move {
        if state.finished {
            return None;
        }
        loop {
            let frame = match state.frames.next().await {
                Some(Ok(frame)) => frame,
                Some(Err(e)) => {
                    state.finished = true;
                    return Some((Err(e), state));
                }
                None => {
                    // Provider closed the stream without message_stop.
                    state.finished = true;
                    let stop_reason = state.stop_reason;
                    return Some((Ok(ModelEvent::Done { stop_reason }), state));
                }
            };

            match frame.get("type").and_then(|t| t.as_str()).unwrap_or("") {
                "content_block_start" => {
                    let index = frame.get("index").and_then(|i| i.as_u64()).unwrap_or(0);
                    let block = frame.get("content_block");
                    if block.and_then(|b| b.get("type")).and_then(|t| t.as_str())
                        == Some("tool_use")
                    {
                        let id = block
                            .and_then(|b| b.get("id"))
                            .and_then(|v| v.as_str())
                            .unwrap_or_default()
                            .to_string();
                        let name = block
                            .and_then(|b| b.get("name"))
                            .and_then(|v| v.as_str())
                            .unwrap_or_default()
                            .to_string();
                        state.pending.insert(
                            index,
                            PendingToolUse {
                                id,
                                name,
                                partial_json: String::new(),
                            },
                        );
                    }
                }
                "content_block_delta" => {
                    let index = frame.get("index").and_then(|i| i.as_u64()).unwrap_or(0);
                    if let Some(text) = frame.pointer("/delta/text").and_then(|t| t.as_str()) {
                        if !text.is_empty() {
                            return Some((
                                Ok(ModelEvent::TextDelta(text.to_string())),
                                state,
                            ));
                        }
                    }
                    if let Some(fragment) =
                        frame.pointer("/delta/partial_json").and_then(|t| t.as_str())
                    {
                        if let Some(pending) = state.pending.get_mut(&index) {
                            pending.partial_json.push_str(fragment);
                        }
                    }
                }
                "content_block_stop" => {
                    let index = frame.get("index").and_then(|i| i.as_u64()).unwrap_or(0);
                    if let Some(pending) = state.pending.remove(&index) {
                        return Some((Ok(ModelEvent::ToolUse(pending.finalize())), state));
                    }
                }
                "message_delta" => {
                    if let Some(reason) =
                        frame.pointer("/delta/stop_reason").and_then(|r| r.as_str())
                    {
                        state.stop_reason = Some(map_stop_reason(reason));
                    }
                }
                "message_stop" => {
                    state.finished = true;
                    let stop_reason = state.stop_reason;
                    return Some((Ok(ModelEvent::Done { stop_reason }), state));
                }
                "error" => {
                    state.finished = true;
                    let detail = frame.get("error").cloned().unwrap_or(Value::Null);
                    return Some((Err(Error::model(format!("stream error: {detail}"))), state));
                }
                // ping, message_start, unknown event kinds
                _ => {}
            }
        }
    });

    Box::pin(stream)
}

fn map_stop_reason(reason: &str) -> StopReason {
    match reason {
        "tool_use" => StopReason::ToolUse,
        "max_tokens" => StopReason::MaxTokens,
        _ => StopReason::EndTurn,
    }
}
