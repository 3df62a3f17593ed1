//! wingman: terminal entry point. Wires configuration, backends and the
//! agent loop into an interactive session on stdin/stdout.

use std::sync::Arc;

use anyhow::Result;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use wingman::{
    Agent, AnthropicSession, Config, KnowledgeClient, KnowledgeTools, Session, TelegramBridge,
    ToolRegistry,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so they never interleave with streamed replies.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("WINGMAN_LOG")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("wingman=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(missing) => {
            eprintln!("{missing}");
            std::process::exit(1);
        }
    };

    let bridge = Arc::new(TelegramBridge::new(
        &config.telegram_bridge_url,
        config.http_timeout,
    )?);
    let knowledge = Arc::new(KnowledgeClient::new(
        &config.knowledge_base_url,
        config.knowledge_api_key.clone(),
        config.http_timeout,
    )?);
    let registry = ToolRegistry::with_defaults(
        bridge.clone(),
        knowledge,
        KnowledgeTools {
            pickup_source_id: config.pickup_source_id.clone(),
            knowledge_repo_id: config.knowledge_repo_id.clone(),
        },
    )?;
    let model = AnthropicSession::new(
        &config.anthropic_api_key,
        &config.model,
        config.http_timeout,
    )?;

    // Advisory only: the bridge may come up later, and tool errors already
    // explain an unreachable backend mid-session.
    match bridge.health().await {
        Ok(_) => tracing::info!(url = %config.telegram_bridge_url, "telegram bridge is up"),
        Err(e) => tracing::warn!(url = %config.telegram_bridge_url, error = %e, "telegram bridge not reachable yet"),
    }

    let agent = Agent::new(model, registry);
    let mut session = Session::new(agent)
        .status_line("model", config.model.clone())
        .status_line("telegram bridge", config.telegram_bridge_url.clone())
        .status_line("knowledge api", config.knowledge_base_url.clone());

    println!("wingman ready — /help for commands");
    session
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await?;

    Ok(())
}
