//! Tool contracts shared by the registry, the clients and the model session.

use serde::{Deserialize, Serialize};

/// Declaration of one tool as the model sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    /// JSON Schema for the tool's arguments.
    pub input_schema: serde_json::Value,
}

/// A tool call requested by the model. The id is model-assigned and is the
/// identity results are matched by.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolInvocation {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub arguments: serde_json::Value,
}

/// Outcome of executing one invocation. Always produced, never dropped: a
/// failed execution carries the error description as its content so the
/// model can react instead of the loop aborting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub invocation_id: String,
    pub tool_name: String,
    pub content: serde_json::Value,
    #[serde(default)]
    pub is_error: bool,
}

impl ToolResult {
    pub fn ok(invocation: &ToolInvocation, content: serde_json::Value) -> Self {
        Self {
            invocation_id: invocation.id.clone(),
            tool_name: invocation.name.clone(),
            content,
            is_error: false,
        }
    }

    pub fn error(invocation: &ToolInvocation, content: serde_json::Value) -> Self {
        Self {
            invocation_id: invocation.id.clone(),
            tool_name: invocation.name.clone(),
            content,
            is_error: true,
        }
    }
}
