//! Conversation log entries and the working transcript sent to the model.
//!
//! `Turn` is what the session records: one role-tagged text message, never
//! mutated after creation. `Message` is the richer transcript shape a single
//! orchestration turn builds up internally — it can carry tool-use and
//! tool-result blocks that are deliberately not part of the persistent log.

use serde::{Deserialize, Serialize};

use crate::types::tool::{ToolInvocation, ToolResult};

/// One role-tagged entry in the persistent conversation log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Transcript message handed to the model session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Text(text.into()),
        }
    }

    /// Assistant step that requested tools, with whatever text preceded them.
    pub fn tool_uses(text: Option<String>, invocations: &[ToolInvocation]) -> Self {
        let mut blocks = Vec::with_capacity(invocations.len() + 1);
        if let Some(t) = text.filter(|t| !t.is_empty()) {
            blocks.push(ContentBlock::Text { text: t });
        }
        for inv in invocations {
            blocks.push(ContentBlock::ToolUse {
                id: inv.id.clone(),
                name: inv.name.clone(),
                input: inv.arguments.clone(),
            });
        }
        Self {
            role: Role::Assistant,
            content: MessageContent::Blocks(blocks),
        }
    }

    /// Synthetic user message carrying one completed set of tool results.
    pub fn tool_results(results: &[ToolResult]) -> Self {
        let blocks = results
            .iter()
            .map(|r| ContentBlock::ToolResult {
                tool_use_id: r.invocation_id.clone(),
                content: r.content.clone(),
                is_error: r.is_error,
            })
            .collect();
        Self {
            role: Role::User,
            content: MessageContent::Blocks(blocks),
        }
    }
}

impl From<&Turn> for Message {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role,
            content: MessageContent::Text(turn.content.clone()),
        }
    }
}

/// Message content: plain text or typed blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "tool_use")]
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },
    #[serde(rename = "tool_result")]
    ToolResult {
        tool_use_id: String,
        content: serde_json::Value,
        #[serde(default)]
        is_error: bool,
    },
}
