//! Tool registry: the fixed mapping from tool name to description, input
//! schema and execution function.
//!
//! The registry holds no state of its own and performs no I/O beyond
//! delegating to the backend clients captured by each handler. `execute`
//! never lets an error cross the tool boundary as `Err`: validation,
//! remote and configuration failures all become error-flagged results the
//! model can react to.

mod knowledge;
mod stylist;
mod telegram;

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::{json, Map, Value};

use crate::error::Error;
use crate::knowledge::KnowledgeClient;
use crate::schema::InputSchema;
use crate::telegram::TelegramBridge;
use crate::types::tool::{ToolDescriptor, ToolInvocation, ToolResult};
use crate::Result;

pub use knowledge::KnowledgeTools;

type Handler = Box<dyn Fn(Map<String, Value>) -> BoxFuture<'static, Result<Value>> + Send + Sync>;

pub struct RegisteredTool {
    descriptor: ToolDescriptor,
    schema: InputSchema,
    handler: Handler,
}

impl RegisteredTool {
    pub fn new<F, Fut>(
        name: &'static str,
        description: &'static str,
        schema: InputSchema,
        handler: F,
    ) -> Self
    where
        F: Fn(Map<String, Value>) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<Value>> + Send + 'static,
    {
        Self {
            descriptor: ToolDescriptor {
                name: name.to_string(),
                description: description.to_string(),
                input_schema: schema.to_json_schema(),
            },
            schema,
            handler: Box::new(move |args| Box::pin(handler(args))),
        }
    }
}

#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, RegisteredTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The full production registry: Telegram operations, knowledge search
    /// and the prompt-shaping helper, as one flat namespace.
    pub fn with_defaults(
        bridge: Arc<TelegramBridge>,
        knowledge: Arc<KnowledgeClient>,
        knowledge_tools: KnowledgeTools,
    ) -> Result<Self> {
        let mut registry = Self::new();
        for tool in telegram::tools(bridge) {
            registry.register(tool)?;
        }
        for tool in knowledge::tools(knowledge, knowledge_tools) {
            registry.register(tool)?;
        }
        registry.register(stylist::style_reply())?;
        Ok(registry)
    }

    /// Tool names are a single flat namespace; a duplicate is a wiring bug
    /// surfaced as a configuration error at construction time.
    pub fn register(&mut self, tool: RegisteredTool) -> Result<()> {
        let name = tool.descriptor.name.clone();
        if self.tools.insert(name.clone(), tool).is_some() {
            return Err(Error::configuration(format!(
                "duplicate tool name '{name}'"
            )));
        }
        Ok(())
    }

    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.values().map(|t| t.descriptor.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Execute one invocation. Arguments are validated against the tool's
    /// schema before the handler (and therefore any client) is touched.
    pub async fn execute(&self, invocation: &ToolInvocation) -> ToolResult {
        let tool = match self.tools.get(&invocation.name) {
            Some(tool) => tool,
            None => {
                return ToolResult::error(
                    invocation,
                    error_payload(&Error::validation(format!(
                        "unknown tool '{}'",
                        invocation.name
                    ))),
                );
            }
        };

        let args = match tool.schema.validate(&invocation.arguments) {
            Ok(args) => args,
            Err(e) => {
                tracing::debug!(tool = %invocation.name, error = %e, "rejected tool arguments");
                return ToolResult::error(invocation, error_payload(&e));
            }
        };

        tracing::info!(tool = %invocation.name, id = %invocation.id, "executing tool");
        match (tool.handler)(args).await {
            Ok(value) => ToolResult::ok(invocation, value),
            Err(e) => {
                tracing::warn!(tool = %invocation.name, error = %e, "tool execution failed");
                ToolResult::error(invocation, error_payload(&e))
            }
        }
    }
}

/// Structured error payload fed back to the model in place of a value.
fn error_payload(error: &Error) -> Value {
    match error {
        Error::Validation { message } => json!({
            "error": { "kind": "validation", "message": message }
        }),
        Error::Remote {
            backend,
            status,
            message,
        } => json!({
            "error": {
                "kind": "remote",
                "backend": backend,
                "status": status,
                "message": message,
            }
        }),
        Error::Configuration { message } => json!({
            "error": { "kind": "configuration", "message": message }
        }),
        other => json!({
            "error": { "kind": "internal", "message": other.to_string() }
        }),
    }
}

// Argument accessors used by the tool groups. Validation has already run,
// so these only translate the normalized map into Rust types.

pub(crate) fn arg_str<'a>(args: &'a Map<String, Value>, name: &str) -> Option<&'a str> {
    args.get(name).and_then(|v| v.as_str())
}

pub(crate) fn arg_i64(args: &Map<String, Value>, name: &str) -> Option<i64> {
    args.get(name).and_then(|v| v.as_i64())
}

pub(crate) fn arg_bool(args: &Map<String, Value>, name: &str) -> Option<bool> {
    args.get(name).and_then(|v| v.as_bool())
}

pub(crate) fn arg_id(args: &Map<String, Value>, name: &str) -> Value {
    args.get(name).cloned().unwrap_or(Value::Null)
}
