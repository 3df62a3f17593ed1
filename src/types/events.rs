//! Stream events: what a model session emits and what a turn forwards to
//! the session driver.

use crate::types::tool::ToolInvocation;

/// One event from a model session's response stream.
#[derive(Debug, Clone)]
pub enum ModelEvent {
    /// Incremental text fragment.
    TextDelta(String),
    /// A fully assembled tool invocation request. Emitted once the model has
    /// finished streaming that call's arguments.
    ToolUse(ToolInvocation),
    /// The model finished this step.
    Done { stop_reason: Option<StopReason> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Final answer; the step terminates the turn.
    EndTurn,
    /// The model wants the emitted tool invocations executed.
    ToolUse,
    /// Output truncated by the provider's token limit.
    MaxTokens,
}

/// One event forwarded to the caller while a turn runs.
#[derive(Debug, Clone)]
pub enum TurnEvent {
    /// Incremental assistant text, forwarded as it arrives.
    Fragment(String),
    /// A tool round is starting; names of the requested tools.
    ToolRound(Vec<String>),
}
