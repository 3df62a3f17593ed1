//! Generic JSON-over-HTTP caller.
//!
//! The two backends are structurally identical — build a URL, optionally
//! attach a bearer credential, send JSON, parse JSON — so one client type is
//! parameterized by backend label, base URL and credential instead of being
//! written twice. Responses are not schema-validated: callers interpret the
//! `Value` and absent fields read as absent, matching the permissive
//! contract of the upstream APIs.

use std::time::Duration;

use reqwest::Method;
use serde_json::Value;

use crate::error::Error;
use crate::Result;

pub struct RemoteService {
    backend: &'static str,
    base_url: String,
    bearer: Option<String>,
    client: reqwest::Client,
}

impl RemoteService {
    pub fn new(
        backend: &'static str,
        base_url: impl Into<String>,
        bearer: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Remote {
                backend,
                status: None,
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            backend,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bearer,
            client,
        })
    }

    pub fn backend(&self) -> &'static str {
        self.backend
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        // Reads are idempotent: one retry on transport-level failure.
        match self.call(Method::GET, path, query, None).await {
            Err(ref e) if e.is_unreachable() => {
                tracing::debug!(backend = self.backend, path, "retrying idempotent GET");
                self.call(Method::GET, path, query, None).await
            }
            other => other,
        }
    }

    pub async fn post(&self, path: &str, query: &[(&str, String)], body: Option<&Value>) -> Result<Value> {
        self.call(Method::POST, path, query, body).await
    }

    /// Multipart upload. Never retried: forms are single-use and uploads
    /// are mutations anyway.
    pub async fn post_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.post(&url).multipart(form);
        if let Some(key) = &self.bearer {
            request = request.bearer_auth(key);
        }

        tracing::debug!(backend = self.backend, path, "remote multipart call");

        let response = request.send().await.map_err(|e| Error::Remote {
            backend: self.backend,
            status: None,
            message: e.to_string(),
        })?;
        self.decode(response, path).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> Result<Value> {
        self.call(Method::PUT, path, &[], Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.call(Method::DELETE, path, &[], None).await
    }

    async fn call(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.request(method.clone(), &url);

        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(key) = &self.bearer {
            request = request.bearer_auth(key);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!(backend = self.backend, %method, path, "remote call");

        let response = request.send().await.map_err(|e| Error::Remote {
            backend: self.backend,
            status: None,
            message: e.to_string(),
        })?;
        self.decode(response, path).await
    }

    async fn decode(&self, response: reqwest::Response, path: &str) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(
                backend = self.backend,
                status = status.as_u16(),
                path,
                "remote call failed"
            );
            return Err(Error::Remote {
                backend: self.backend,
                status: Some(status.as_u16()),
                message,
            });
        }

        response.json::<Value>().await.map_err(|e| Error::Remote {
            backend: self.backend,
            status: None,
            message: format!("invalid JSON response: {e}"),
        })
    }
}
