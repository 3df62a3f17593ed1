//! Client for the semantic-search provider.
//!
//! Unlike the Telegram bridge this backend requires a bearer credential. The
//! credential is checked lazily on first use so a missing key degrades to a
//! tool-level failure the model can explain, instead of refusing to start a
//! session that may never touch the knowledge tools.

use std::time::Duration;

use serde_json::{json, Value};

use crate::error::Error;
use crate::transport::RemoteService;
use crate::Result;

pub const BACKEND: &str = "knowledge";

pub struct KnowledgeClient {
    service: Option<RemoteService>,
}

impl KnowledgeClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let service = match api_key {
            Some(key) => Some(RemoteService::new(BACKEND, base_url, Some(key), timeout)?),
            None => None,
        };
        Ok(Self { service })
    }

    fn service(&self) -> Result<&RemoteService> {
        self.service.as_ref().ok_or_else(|| {
            Error::configuration("KNOWLEDGE_API_KEY is not set; knowledge search is unavailable")
        })
    }

    /// `POST /query` scoped to a data source — ranked snippets for a query.
    pub async fn query_source(&self, query: &str, source_id: &str) -> Result<Value> {
        self.query(query, json!({ "data_sources": [source_id] })).await
    }

    /// `POST /query` scoped to a repository.
    pub async fn query_repository(&self, query: &str, repository_id: &str) -> Result<Value> {
        self.query(query, json!({ "repositories": [repository_id] })).await
    }

    async fn query(&self, query: &str, scope: Value) -> Result<Value> {
        let mut body = json!({
            "messages": [{ "role": "user", "content": query }],
            "search_mode": "sources",
            "include_sources": true,
        });
        if let Value::Object(scope) = scope {
            for (k, v) in scope {
                body[k] = v;
            }
        }
        self.service()?.post("/query", &[], Some(&body)).await
    }

    /// `POST /web-search` with `{query, num_results, category?}`.
    pub async fn web_search(
        &self,
        query: &str,
        num_results: i64,
        category: Option<&str>,
    ) -> Result<Value> {
        let mut body = json!({
            "query": query,
            "num_results": num_results,
        });
        if let Some(category) = category {
            body["category"] = json!(category);
        }
        self.service()?.post("/web-search", &[], Some(&body)).await
    }
}
