//! The model seam.
//!
//! The orchestration loop depends on a capability it does not implement:
//! given a system prompt, a transcript and a set of declared tools, produce
//! either streamed text or tool invocation requests, and continue after tool
//! results are supplied. `ModelSession` abstracts that capability so the
//! loop runs identically against the real gateway and scripted test stubs.

mod anthropic;
mod sse;

pub use anthropic::AnthropicSession;

use async_trait::async_trait;

use crate::types::events::ModelEvent;
use crate::types::message::Message;
use crate::types::tool::ToolDescriptor;
use crate::{BoxStream, Result};

/// Everything the model sees for one decision step.
#[derive(Debug, Clone)]
pub struct ModelPrompt {
    pub system: String,
    pub messages: Vec<Message>,
    pub tools: Vec<ToolDescriptor>,
}

#[async_trait]
pub trait ModelSession: Send + Sync {
    /// Run one decision step. The returned stream yields text fragments
    /// and/or fully assembled tool invocations, then `Done`. A failure of
    /// the call itself (credential, outage) is an `Err` — the one error
    /// kind that aborts a turn.
    async fn advance(&self, prompt: &ModelPrompt) -> Result<BoxStream<'static, ModelEvent>>;
}
