//! Shared fixtures: a scripted model session for driving the agent loop
//! without a network.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::{stream, StreamExt};
use serde_json::Value;

use wingman::model::{ModelPrompt, ModelSession};
use wingman::types::events::{ModelEvent, StopReason};
use wingman::types::tool::ToolInvocation;
use wingman::{BoxStream, Error, Result};

/// Records every prompt the agent sends, so a test can keep a handle on it
/// after the model has been moved into the agent.
pub type PromptLog = Arc<Mutex<Vec<ModelPrompt>>>;

/// Plays back a fixed sequence of decision steps and records every prompt
/// it was shown, so tests can assert what the model would have seen.
pub struct ScriptedModel {
    steps: Mutex<VecDeque<Vec<ModelEvent>>>,
    prompts: PromptLog,
}

impl ScriptedModel {
    pub fn new(steps: Vec<Vec<ModelEvent>>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn prompt_log(&self) -> PromptLog {
        self.prompts.clone()
    }
}

#[async_trait]
impl ModelSession for ScriptedModel {
    async fn advance(&self, prompt: &ModelPrompt) -> Result<BoxStream<'static, ModelEvent>> {
        self.prompts.lock().unwrap().push(prompt.clone());
        let step = self
            .steps
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Error::model("script exhausted"))?;
        Ok(stream::iter(step.into_iter().map(Ok)).boxed())
    }
}

/// A step that streams text and finishes the turn.
pub fn text_step(text: &str) -> Vec<ModelEvent> {
    vec![
        ModelEvent::TextDelta(text.to_string()),
        ModelEvent::Done {
            stop_reason: Some(StopReason::EndTurn),
        },
    ]
}

/// A step that requests the given tool invocations.
pub fn tool_step(invocations: Vec<(&str, &str, Value)>) -> Vec<ModelEvent> {
    let mut events: Vec<ModelEvent> = invocations
        .into_iter()
        .map(|(id, name, arguments)| {
            ModelEvent::ToolUse(ToolInvocation {
                id: id.to_string(),
                name: name.to_string(),
                arguments,
            })
        })
        .collect();
    events.push(ModelEvent::Done {
        stop_reason: Some(StopReason::ToolUse),
    });
    events
}
