//! Knowledge tool group: semantic search over curated dating-advice sources
//! plus a real-time web search.
//!
//! The source/repository ids are configuration, not tool arguments — the
//! model never picks the corpus. A missing id yields a structured
//! "not configured" result (no network call), so the loop keeps going and
//! the model can say so.

use std::sync::Arc;

use serde_json::json;

use crate::knowledge::KnowledgeClient;
use crate::schema::{Field, InputSchema};
use crate::tools::{arg_i64, arg_str, RegisteredTool};

/// Which corpora the knowledge tools are wired to.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeTools {
    pub pickup_source_id: Option<String>,
    pub knowledge_repo_id: Option<String>,
}

pub(crate) fn tools(client: Arc<KnowledgeClient>, cfg: KnowledgeTools) -> Vec<RegisteredTool> {
    let mut tools = Vec::new();

    let c = client.clone();
    let source_id = cfg.pickup_source_id;
    tools.push(RegisteredTool::new(
        "search_pickup_lines",
        "Semantic search over the curated pickup-line collection. Describe the vibe or situation and get ranked lines.",
        InputSchema::new().field(
            Field::string("query")
                .required()
                .describe("The situation or style of line you want, in plain language"),
        ),
        move |args| {
            let c = c.clone();
            let source_id = source_id.clone();
            async move {
                let Some(source_id) = source_id else {
                    return Ok(not_configured("PICKUP_SOURCE_ID"));
                };
                c.query_source(arg_str(&args, "query").unwrap_or_default(), &source_id).await
            }
        },
    ));

    let c = client.clone();
    let repo_id = cfg.knowledge_repo_id;
    tools.push(RegisteredTool::new(
        "search_knowledge",
        "Semantic search over the dating-advice knowledge base: conversation tactics, date ideas, profile tips.",
        InputSchema::new().field(Field::string("query").required()),
        move |args| {
            let c = c.clone();
            let repo_id = repo_id.clone();
            async move {
                let Some(repo_id) = repo_id else {
                    return Ok(not_configured("KNOWLEDGE_REPO_ID"));
                };
                c.query_repository(arg_str(&args, "query").unwrap_or_default(), &repo_id).await
            }
        },
    ));

    let c = client;
    tools.push(RegisteredTool::new(
        "web_search",
        "Real-time web search. Use for anything current: venues, events, news.",
        InputSchema::new()
            .field(Field::string("query").required())
            .field(
                Field::integer("num_results")
                    .min(1)
                    .max(20)
                    .default_value(json!(5)),
            )
            .field(
                Field::string("category")
                    .one_of(&["news", "places", "general"])
                    .describe("Narrow results to one category"),
            ),
        move |args| {
            let c = c.clone();
            async move {
                c.web_search(
                    arg_str(&args, "query").unwrap_or_default(),
                    arg_i64(&args, "num_results").unwrap_or(5),
                    arg_str(&args, "category"),
                )
                .await
            }
        },
    ));

    tools
}

fn not_configured(variable: &str) -> serde_json::Value {
    json!({
        "configured": false,
        "message": format!(
            "this search is not configured ({variable} is unset); tell the user and answer from your own judgment"
        ),
    })
}
