//! The tool-orchestration loop.
//!
//! One user turn = up to `MAX_TOOL_ROUNDS` decision steps. Each step the
//! model either finishes with text (streamed out fragment by fragment) or
//! requests tools; requested tools run concurrently and the step waits for
//! every result before the model continues — a join, not a race. Tool
//! failures come back as error-flagged results the model can react to;
//! only a failure of the model invocation itself aborts the turn.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::future::join_all;
use futures::StreamExt;

use crate::history::ConversationHistory;
use crate::model::{ModelPrompt, ModelSession};
use crate::tools::ToolRegistry;
use crate::types::events::{ModelEvent, TurnEvent};
use crate::types::message::{Message, Turn};
use crate::Result;

/// Hard ceiling on tool rounds per user turn. Prevents runaway chains.
pub const MAX_TOOL_ROUNDS: u32 = 10;

pub const SYSTEM_PROMPT: &str = "\
You are Wingman, a sharp, kind and honest dating assistant living in the user's terminal. \
You can read and act on the user's Telegram through your tools, search a curated \
dating-advice knowledge base, and search the web.

Ground rules:
- Read before you write: when asked about a conversation, fetch the actual messages first.
- Drafts are suggestions. Never send, edit or delete anything unless the user clearly asked for that action this turn.
- Match the user's voice. Punchy beats flowery; specific beats generic.
- When a tool fails or is not configured, say so briefly and work with what you have.
- Keep answers tight. This is a terminal, not an essay.";

/// Cooperative cancellation flag, checked at every fragment-forward point
/// and at the tool-result join.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// How a turn ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The model produced a final answer.
    Completed { text: String },
    /// The step budget ran out; whatever text accumulated is the answer.
    BudgetExhausted { text: String },
    /// The user interrupted. No assistant turn was recorded.
    Cancelled,
}

/// One conversation session: model, tools and history, single-owner.
pub struct Agent<M: ModelSession> {
    model: M,
    registry: ToolRegistry,
    history: ConversationHistory,
    system_prompt: String,
    max_tool_rounds: u32,
}

impl<M: ModelSession> Agent<M> {
    pub fn new(model: M, registry: ToolRegistry) -> Self {
        Self {
            model,
            registry,
            history: ConversationHistory::new(),
            system_prompt: SYSTEM_PROMPT.to_string(),
            max_tool_rounds: MAX_TOOL_ROUNDS,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Run one user turn to completion, forwarding events as they happen.
    ///
    /// History is all-or-nothing: the user turn is recorded up front, and
    /// the assistant turn is recorded only once its text is final — a
    /// cancelled turn leaves no partial assistant text behind.
    pub async fn run_turn<F>(
        &mut self,
        input: &str,
        cancel: &CancelToken,
        mut on_event: F,
    ) -> Result<TurnOutcome>
    where
        F: FnMut(TurnEvent),
    {
        self.history.append(Turn::user(input));

        let tools = self.registry.descriptors();
        let mut transcript: Vec<Message> =
            self.history.snapshot().iter().map(Message::from).collect();

        let mut budget = self.max_tool_rounds;
        let mut accumulated = String::new();

        loop {
            let prompt = ModelPrompt {
                system: self.system_prompt.clone(),
                messages: transcript.clone(),
                tools: tools.clone(),
            };

            // Model-invocation failure is the one error that escapes here.
            let mut stream = self.model.advance(&prompt).await?;

            let mut step_text = String::new();
            let mut invocations = Vec::new();

            while let Some(event) = stream.next().await {
                if cancel.is_cancelled() {
                    tracing::info!("turn cancelled mid-stream");
                    return Ok(TurnOutcome::Cancelled);
                }
                match event? {
                    ModelEvent::TextDelta(fragment) => {
                        on_event(TurnEvent::Fragment(fragment.clone()));
                        step_text.push_str(&fragment);
                    }
                    ModelEvent::ToolUse(invocation) => invocations.push(invocation),
                    ModelEvent::Done { .. } => break,
                }
            }

            accumulated.push_str(&step_text);

            if invocations.is_empty() {
                self.history.append(Turn::assistant(accumulated.clone()));
                return Ok(TurnOutcome::Completed { text: accumulated });
            }

            let names: Vec<String> = invocations.iter().map(|i| i.name.clone()).collect();
            tracing::info!(tools = ?names, round = self.max_tool_rounds - budget + 1, "tool round");
            on_event(TurnEvent::ToolRound(names));

            // Join barrier: every requested invocation produces a result
            // before the model sees any of them.
            let results =
                join_all(invocations.iter().map(|inv| self.registry.execute(inv))).await;

            if cancel.is_cancelled() {
                tracing::info!("turn cancelled at tool join");
                return Ok(TurnOutcome::Cancelled);
            }

            transcript.push(Message::tool_uses(Some(step_text), &invocations));
            transcript.push(Message::tool_results(&results));

            budget -= 1;
            if budget == 0 {
                tracing::warn!("step budget exhausted, forcing turn to end");
                self.history.append(Turn::assistant(accumulated.clone()));
                return Ok(TurnOutcome::BudgetExhausted { text: accumulated });
            }
        }
    }
}
