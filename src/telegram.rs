//! Typed caller for the local Telegram HTTP bridge.
//!
//! The bridge wraps a logged-in Telegram client behind plain REST on the
//! same host, so there is no auth header — the trust boundary is the host.
//! Chat and user ids may be numeric ids or username strings; the bridge
//! resolves either form.

use std::time::Duration;

use serde_json::{json, Value};

use crate::transport::RemoteService;
use crate::Result;

pub const BACKEND: &str = "telegram";

pub struct TelegramBridge {
    service: RemoteService,
}

impl TelegramBridge {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            service: RemoteService::new(BACKEND, base_url, None, timeout)?,
        })
    }

    pub fn base_url(&self) -> &str {
        self.service.base_url()
    }

    /// `GET /health` → `{status, connected}`.
    pub async fn health(&self) -> Result<Value> {
        self.service.get("/health", &[]).await
    }

    /// `GET /me` — the account the bridge is logged in as.
    pub async fn get_me(&self) -> Result<Value> {
        self.service.get("/me", &[]).await
    }

    /// `GET /chats?limit&chat_type`.
    pub async fn get_chats(&self, limit: Option<i64>, chat_type: Option<&str>) -> Result<Value> {
        let mut query = Vec::new();
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(chat_type) = chat_type {
            query.push(("chat_type", chat_type.to_string()));
        }
        self.service.get("/chats", &query).await
    }

    /// `GET /chats/{id}`.
    pub async fn get_chat_info(&self, chat_id: &Value) -> Result<Value> {
        self.service
            .get(&format!("/chats/{}", id_segment(chat_id)), &[])
            .await
    }

    /// `GET /chats/{id}/messages?limit&offset_id`.
    pub async fn get_messages(
        &self,
        chat_id: &Value,
        limit: Option<i64>,
        offset_id: Option<i64>,
    ) -> Result<Value> {
        let mut query = Vec::new();
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(offset_id) = offset_id {
            query.push(("offset_id", offset_id.to_string()));
        }
        self.service
            .get(&format!("/chats/{}/messages", id_segment(chat_id)), &query)
            .await
    }

    /// `POST /chats/{id}/messages` with `{message, reply_to?}`.
    pub async fn send_message(
        &self,
        chat_id: &Value,
        message: &str,
        reply_to: Option<i64>,
    ) -> Result<Value> {
        let mut body = json!({ "message": message });
        if let Some(reply_to) = reply_to {
            body["reply_to"] = json!(reply_to);
        }
        self.service
            .post(
                &format!("/chats/{}/messages", id_segment(chat_id)),
                &[],
                Some(&body),
            )
            .await
    }

    /// `POST /chats/{id}/files` — multipart upload of a photo, document or
    /// voice note, with an optional caption.
    pub async fn send_file(
        &self,
        chat_id: &Value,
        file_name: &str,
        content: Vec<u8>,
        caption: Option<&str>,
        voice_note: bool,
    ) -> Result<Value> {
        let mut form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(content).file_name(file_name.to_string()),
            )
            .text("voice_note", voice_note.to_string());
        if let Some(caption) = caption {
            form = form.text("caption", caption.to_string());
        }
        self.service
            .post_multipart(&format!("/chats/{}/files", id_segment(chat_id)), form)
            .await
    }

    /// `POST /chats/{id}/messages/{mid}/reply` with `{message}`.
    pub async fn reply_to_message(
        &self,
        chat_id: &Value,
        message_id: i64,
        message: &str,
    ) -> Result<Value> {
        self.service
            .post(
                &format!("/chats/{}/messages/{message_id}/reply", id_segment(chat_id)),
                &[],
                Some(&json!({ "message": message })),
            )
            .await
    }

    /// `PUT /chats/{id}/messages/{mid}` with `{new_text}`.
    pub async fn edit_message(
        &self,
        chat_id: &Value,
        message_id: i64,
        new_text: &str,
    ) -> Result<Value> {
        self.service
            .put(
                &format!("/chats/{}/messages/{message_id}", id_segment(chat_id)),
                &json!({ "new_text": new_text }),
            )
            .await
    }

    /// `DELETE /chats/{id}/messages/{mid}`.
    pub async fn delete_message(&self, chat_id: &Value, message_id: i64) -> Result<Value> {
        self.service
            .delete(&format!("/chats/{}/messages/{message_id}", id_segment(chat_id)))
            .await
    }

    /// `POST /chats/{id}/messages/{mid}/forward?to_chat_id`.
    pub async fn forward_message(
        &self,
        chat_id: &Value,
        message_id: i64,
        to_chat_id: &Value,
    ) -> Result<Value> {
        self.service
            .post(
                &format!("/chats/{}/messages/{message_id}/forward", id_segment(chat_id)),
                &[("to_chat_id", id_segment(to_chat_id))],
                None,
            )
            .await
    }

    /// `POST /chats/{id}/messages/{mid}/reaction` with `{emoji, big}`.
    pub async fn send_reaction(
        &self,
        chat_id: &Value,
        message_id: i64,
        emoji: &str,
        big: bool,
    ) -> Result<Value> {
        self.service
            .post(
                &format!("/chats/{}/messages/{message_id}/reaction", id_segment(chat_id)),
                &[],
                Some(&json!({ "emoji": emoji, "big": big })),
            )
            .await
    }

    /// `POST /chats/{id}/messages/{mid}/pin`.
    pub async fn pin_message(&self, chat_id: &Value, message_id: i64) -> Result<Value> {
        self.service
            .post(
                &format!("/chats/{}/messages/{message_id}/pin", id_segment(chat_id)),
                &[],
                None,
            )
            .await
    }

    /// `POST /chats/{id}/read`.
    pub async fn mark_as_read(&self, chat_id: &Value) -> Result<Value> {
        self.service
            .post(&format!("/chats/{}/read", id_segment(chat_id)), &[], None)
            .await
    }

    /// `GET /chats/{id}/search?query&limit`.
    pub async fn search_messages(
        &self,
        chat_id: &Value,
        query: &str,
        limit: Option<i64>,
    ) -> Result<Value> {
        let mut params = vec![("query", query.to_string())];
        if let Some(limit) = limit {
            params.push(("limit", limit.to_string()));
        }
        self.service
            .get(&format!("/chats/{}/search", id_segment(chat_id)), &params)
            .await
    }

    /// `GET /chats/{id}/history?limit`.
    pub async fn get_chat_history(&self, chat_id: &Value, limit: Option<i64>) -> Result<Value> {
        let mut query = Vec::new();
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        self.service
            .get(&format!("/chats/{}/history", id_segment(chat_id)), &query)
            .await
    }

    /// `GET /contacts`.
    pub async fn get_contacts(&self) -> Result<Value> {
        self.service.get("/contacts", &[]).await
    }

    /// `GET /contacts/search?query`.
    pub async fn search_contacts(&self, query: &str) -> Result<Value> {
        self.service
            .get("/contacts/search", &[("query", query.to_string())])
            .await
    }

    /// `GET /users/{id}/status`.
    pub async fn get_user_status(&self, user_id: &Value) -> Result<Value> {
        self.service
            .get(&format!("/users/{}/status", id_segment(user_id)), &[])
            .await
    }

    /// `GET /users/{id}/photos?limit`.
    pub async fn get_user_photos(&self, user_id: &Value, limit: Option<i64>) -> Result<Value> {
        let mut query = Vec::new();
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        self.service
            .get(&format!("/users/{}/photos", id_segment(user_id)), &query)
            .await
    }

    /// `GET /gifs/search?query&limit`.
    pub async fn search_gifs(&self, query: &str, limit: Option<i64>) -> Result<Value> {
        let mut params = vec![("query", query.to_string())];
        if let Some(limit) = limit {
            params.push(("limit", limit.to_string()));
        }
        self.service.get("/gifs/search", &params).await
    }
}

/// Render a validated id argument (integer or username) as a path segment.
/// Usernames are percent-encoded so reserved characters cannot reshape the
/// request path.
fn id_segment(id: &Value) -> String {
    match id {
        Value::String(s) => urlencoding::encode(s).into_owned(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_segment_renders_both_forms() {
        assert_eq!(id_segment(&json!(-100123)), "-100123");
        assert_eq!(id_segment(&json!("durov")), "durov");
    }

    #[test]
    fn id_segment_escapes_reserved_characters() {
        assert_eq!(id_segment(&json!("a/b")), "a%2Fb");
        assert_eq!(id_segment(&json!("who?")), "who%3F");
        assert_eq!(id_segment(&json!("two words")), "two%20words");
    }
}
