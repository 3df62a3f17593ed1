//! # wingman
//!
//! A terminal chat agent that helps you hold conversations on Telegram.
//! The model decides which tools to use — reading chats, sending replies,
//! searching a knowledge service — and the agent loop executes them and
//! feeds the results back until the model answers in plain text.
//!
//! ## Overview
//!
//! - **Streaming-first**: model output arrives as text fragments over SSE
//!   and is surfaced to the caller as it lands
//! - **Tool orchestration**: tool requests within one model step run
//!   concurrently, and every result is returned to the model together
//! - **Bounded turns**: a hard ceiling on tool rounds per user turn keeps
//!   runaway loops impossible
//! - **All-or-nothing history**: a cancelled turn never leaves partial
//!   assistant text in the conversation record
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use wingman::{
//!     Agent, AnthropicSession, CancelToken, Config, Error, KnowledgeClient, KnowledgeTools,
//!     TelegramBridge, ToolRegistry,
//! };
//!
//! #[tokio::main]
//! async fn main() -> wingman::Result<()> {
//!     let config = Config::from_env().map_err(|e| Error::configuration(e.to_string()))?;
//!
//!     let model = AnthropicSession::new(
//!         &config.anthropic_api_key,
//!         &config.model,
//!         config.http_timeout,
//!     )?;
//!     let bridge = Arc::new(TelegramBridge::new(
//!         &config.telegram_bridge_url,
//!         config.http_timeout,
//!     )?);
//!     let knowledge = Arc::new(KnowledgeClient::new(
//!         &config.knowledge_base_url,
//!         config.knowledge_api_key.clone(),
//!         config.http_timeout,
//!     )?);
//!     let registry = ToolRegistry::with_defaults(
//!         bridge,
//!         knowledge,
//!         KnowledgeTools {
//!             pickup_source_id: config.pickup_source_id.clone(),
//!             knowledge_repo_id: config.knowledge_repo_id.clone(),
//!         },
//!     )?;
//!
//!     let mut agent = Agent::new(model, registry);
//!     let cancel = CancelToken::new();
//!     agent
//!         .run_turn("what did alice say today?", &cancel, |event| {
//!             // print fragments as they stream in
//!             let _ = event;
//!         })
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`agent`] | The tool-orchestration loop and turn outcomes |
//! | [`model`] | Model session trait and the Anthropic SSE implementation |
//! | [`tools`] | Tool registry, schemas and the built-in tool set |
//! | [`telegram`] | HTTP client for the local Telegram bridge |
//! | [`knowledge`] | Semantic-search client with lazy credential checks |
//! | [`session`] | Interactive line-based session driver |
//! | [`history`] | Conversation record shared across turns |
//! | [`schema`] | Declarative input schemas and validation |
//! | [`transport`] | Shared HTTP plumbing for backend services |
//! | [`types`] | Core message, event and tool types |
//! | [`config`] | Environment-driven configuration |

pub mod agent;
pub mod config;
pub mod history;
pub mod knowledge;
pub mod model;
pub mod schema;
pub mod session;
pub mod telegram;
pub mod tools;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use agent::{Agent, CancelToken, TurnOutcome};
pub use config::Config;
pub use history::ConversationHistory;
pub use knowledge::KnowledgeClient;
pub use model::{AnthropicSession, ModelPrompt, ModelSession};
pub use session::Session;
pub use telegram::TelegramBridge;
pub use tools::{KnowledgeTools, ToolRegistry};
pub use types::{
    events::{ModelEvent, StopReason, TurnEvent},
    message::{Message, Role, Turn},
    tool::{ToolDescriptor, ToolInvocation, ToolResult},
};

use futures::Stream;
use std::pin::Pin;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// A pinned, boxed stream of fallible items
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = Result<T>> + Send + 'a>>;

/// Error type for the library
pub mod error;
pub use error::Error;
