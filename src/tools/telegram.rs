//! Telegram tool group: one tool per bridge endpoint.
//!
//! Descriptions are written for the model, not the user — they state what
//! the operation does and when to reach for it. Limits mirror the bridge's
//! own caps so validation rejects what the backend would anyway.

use std::sync::Arc;

use serde_json::json;

use crate::schema::{Field, InputSchema};
use crate::telegram::TelegramBridge;
use crate::tools::{arg_bool, arg_i64, arg_id, arg_str, RegisteredTool};

pub(crate) fn tools(bridge: Arc<TelegramBridge>) -> Vec<RegisteredTool> {
    let mut tools = Vec::new();

    let b = bridge.clone();
    tools.push(RegisteredTool::new(
        "get_chats",
        "List the user's Telegram chats (dialogs), most recent first. Optionally filter by chat type.",
        InputSchema::new()
            .field(
                Field::integer("limit")
                    .min(1)
                    .max(200)
                    .default_value(json!(30))
                    .describe("Maximum number of chats to return"),
            )
            .field(
                Field::string("chat_type")
                    .one_of(&["user", "chat", "channel"])
                    .describe("Only return chats of this type"),
            ),
        move |args| {
            let b = b.clone();
            async move { b.get_chats(arg_i64(&args, "limit"), arg_str(&args, "chat_type")).await }
        },
    ));

    let b = bridge.clone();
    tools.push(RegisteredTool::new(
        "get_chat_info",
        "Get detailed info about one chat, by numeric id or username.",
        InputSchema::new().field(Field::id("chat_id").required()),
        move |args| {
            let b = b.clone();
            async move { b.get_chat_info(&arg_id(&args, "chat_id")).await }
        },
    ));

    let b = bridge.clone();
    tools.push(RegisteredTool::new(
        "get_messages",
        "Read recent messages from a chat. Use offset_id to page backwards through older messages.",
        InputSchema::new()
            .field(Field::id("chat_id").required())
            .field(
                Field::integer("limit")
                    .min(1)
                    .max(100)
                    .default_value(json!(20)),
            )
            .field(Field::integer("offset_id").describe("Only messages older than this id")),
        move |args| {
            let b = b.clone();
            async move {
                b.get_messages(
                    &arg_id(&args, "chat_id"),
                    arg_i64(&args, "limit"),
                    arg_i64(&args, "offset_id"),
                )
                .await
            }
        },
    ));

    let b = bridge.clone();
    tools.push(RegisteredTool::new(
        "send_message",
        "Send a text message to a chat. Set reply_to to reply to a specific message.",
        InputSchema::new()
            .field(Field::id("chat_id").required())
            .field(Field::string("message").required().describe("Message text to send"))
            .field(Field::integer("reply_to").describe("Message id to reply to")),
        move |args| {
            let b = b.clone();
            async move {
                b.send_message(
                    &arg_id(&args, "chat_id"),
                    arg_str(&args, "message").unwrap_or_default(),
                    arg_i64(&args, "reply_to"),
                )
                .await
            }
        },
    ));

    let b = bridge.clone();
    tools.push(RegisteredTool::new(
        "send_file",
        "Send a local file (photo, document or voice note) to a chat, with an optional caption. The path must exist on this machine.",
        InputSchema::new()
            .field(Field::id("chat_id").required())
            .field(
                Field::string("file_path")
                    .required()
                    .describe("Path to the file on the local filesystem"),
            )
            .field(Field::string("caption").describe("Caption shown with the file"))
            .field(
                Field::boolean("voice_note")
                    .default_value(json!(false))
                    .describe("Send an audio file as a voice note"),
            ),
        move |args| {
            let b = b.clone();
            async move {
                let path = arg_str(&args, "file_path").unwrap_or_default().to_string();
                let content = tokio::fs::read(&path).await.map_err(|e| {
                    crate::error::Error::validation(format!("cannot read '{path}': {e}"))
                })?;
                let file_name = std::path::Path::new(&path)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "file".to_string());
                b.send_file(
                    &arg_id(&args, "chat_id"),
                    &file_name,
                    content,
                    arg_str(&args, "caption"),
                    arg_bool(&args, "voice_note").unwrap_or(false),
                )
                .await
            }
        },
    ));

    let b = bridge.clone();
    tools.push(RegisteredTool::new(
        "reply_to_message",
        "Reply to a specific message in a chat.",
        InputSchema::new()
            .field(Field::id("chat_id").required())
            .field(Field::integer("message_id").required())
            .field(Field::string("message").required()),
        move |args| {
            let b = b.clone();
            async move {
                b.reply_to_message(
                    &arg_id(&args, "chat_id"),
                    arg_i64(&args, "message_id").unwrap_or_default(),
                    arg_str(&args, "message").unwrap_or_default(),
                )
                .await
            }
        },
    ));

    let b = bridge.clone();
    tools.push(RegisteredTool::new(
        "edit_message",
        "Edit the text of a message the user previously sent.",
        InputSchema::new()
            .field(Field::id("chat_id").required())
            .field(Field::integer("message_id").required())
            .field(Field::string("new_text").required()),
        move |args| {
            let b = b.clone();
            async move {
                b.edit_message(
                    &arg_id(&args, "chat_id"),
                    arg_i64(&args, "message_id").unwrap_or_default(),
                    arg_str(&args, "new_text").unwrap_or_default(),
                )
                .await
            }
        },
    ));

    let b = bridge.clone();
    tools.push(RegisteredTool::new(
        "delete_message",
        "Delete a message the user previously sent.",
        InputSchema::new()
            .field(Field::id("chat_id").required())
            .field(Field::integer("message_id").required()),
        move |args| {
            let b = b.clone();
            async move {
                b.delete_message(
                    &arg_id(&args, "chat_id"),
                    arg_i64(&args, "message_id").unwrap_or_default(),
                )
                .await
            }
        },
    ));

    let b = bridge.clone();
    tools.push(RegisteredTool::new(
        "forward_message",
        "Forward a message from one chat to another.",
        InputSchema::new()
            .field(Field::id("chat_id").required().describe("Chat the message is in"))
            .field(Field::integer("message_id").required())
            .field(Field::id("to_chat_id").required().describe("Destination chat")),
        move |args| {
            let b = b.clone();
            async move {
                b.forward_message(
                    &arg_id(&args, "chat_id"),
                    arg_i64(&args, "message_id").unwrap_or_default(),
                    &arg_id(&args, "to_chat_id"),
                )
                .await
            }
        },
    ));

    let b = bridge.clone();
    tools.push(RegisteredTool::new(
        "send_reaction",
        "React to a message with an emoji.",
        InputSchema::new()
            .field(Field::id("chat_id").required())
            .field(Field::integer("message_id").required())
            .field(Field::string("emoji").required().describe("A single emoji, e.g. ❤️ or 😂"))
            .field(
                Field::boolean("big")
                    .default_value(json!(false))
                    .describe("Send as a big animated reaction"),
            ),
        move |args| {
            let b = b.clone();
            async move {
                b.send_reaction(
                    &arg_id(&args, "chat_id"),
                    arg_i64(&args, "message_id").unwrap_or_default(),
                    arg_str(&args, "emoji").unwrap_or_default(),
                    arg_bool(&args, "big").unwrap_or(false),
                )
                .await
            }
        },
    ));

    let b = bridge.clone();
    tools.push(RegisteredTool::new(
        "pin_message",
        "Pin a message in a chat.",
        InputSchema::new()
            .field(Field::id("chat_id").required())
            .field(Field::integer("message_id").required()),
        move |args| {
            let b = b.clone();
            async move {
                b.pin_message(
                    &arg_id(&args, "chat_id"),
                    arg_i64(&args, "message_id").unwrap_or_default(),
                )
                .await
            }
        },
    ));

    let b = bridge.clone();
    tools.push(RegisteredTool::new(
        "mark_as_read",
        "Mark all messages in a chat as read.",
        InputSchema::new().field(Field::id("chat_id").required()),
        move |args| {
            let b = b.clone();
            async move { b.mark_as_read(&arg_id(&args, "chat_id")).await }
        },
    ));

    let b = bridge.clone();
    tools.push(RegisteredTool::new(
        "search_messages",
        "Full-text search within one chat's messages.",
        InputSchema::new()
            .field(Field::id("chat_id").required())
            .field(Field::string("query").required())
            .field(
                Field::integer("limit")
                    .min(1)
                    .max(100)
                    .default_value(json!(20)),
            ),
        move |args| {
            let b = b.clone();
            async move {
                b.search_messages(
                    &arg_id(&args, "chat_id"),
                    arg_str(&args, "query").unwrap_or_default(),
                    arg_i64(&args, "limit"),
                )
                .await
            }
        },
    ));

    let b = bridge.clone();
    tools.push(RegisteredTool::new(
        "get_chat_history",
        "Fetch a longer slice of chat history than get_messages allows. Good for summarizing a conversation.",
        InputSchema::new()
            .field(Field::id("chat_id").required())
            .field(
                Field::integer("limit")
                    .min(1)
                    .max(500)
                    .default_value(json!(100)),
            ),
        move |args| {
            let b = b.clone();
            async move {
                b.get_chat_history(&arg_id(&args, "chat_id"), arg_i64(&args, "limit")).await
            }
        },
    ));

    let b = bridge.clone();
    tools.push(RegisteredTool::new(
        "get_contacts",
        "List all of the user's Telegram contacts.",
        InputSchema::new(),
        move |_args| {
            let b = b.clone();
            async move { b.get_contacts().await }
        },
    ));

    let b = bridge.clone();
    tools.push(RegisteredTool::new(
        "search_contacts",
        "Search contacts by name, username or phone number.",
        InputSchema::new().field(Field::string("query").required()),
        move |args| {
            let b = b.clone();
            async move { b.search_contacts(arg_str(&args, "query").unwrap_or_default()).await }
        },
    ));

    let b = bridge.clone();
    tools.push(RegisteredTool::new(
        "get_me",
        "Get the Telegram account the assistant is acting as.",
        InputSchema::new(),
        move |_args| {
            let b = b.clone();
            async move { b.get_me().await }
        },
    ));

    let b = bridge.clone();
    tools.push(RegisteredTool::new(
        "get_user_status",
        "Check whether a user is online, and if not, roughly when they were last seen.",
        InputSchema::new().field(Field::id("user_id").required()),
        move |args| {
            let b = b.clone();
            async move { b.get_user_status(&arg_id(&args, "user_id")).await }
        },
    ));

    let b = bridge.clone();
    tools.push(RegisteredTool::new(
        "get_user_photos",
        "List a user's profile photos.",
        InputSchema::new()
            .field(Field::id("user_id").required())
            .field(
                Field::integer("limit")
                    .min(1)
                    .max(50)
                    .default_value(json!(10)),
            ),
        move |args| {
            let b = b.clone();
            async move {
                b.get_user_photos(&arg_id(&args, "user_id"), arg_i64(&args, "limit")).await
            }
        },
    ));

    let b = bridge;
    tools.push(RegisteredTool::new(
        "search_gifs",
        "Search for GIFs to send.",
        InputSchema::new()
            .field(Field::string("query").required())
            .field(
                Field::integer("limit")
                    .min(1)
                    .max(50)
                    .default_value(json!(10)),
            ),
        move |args| {
            let b = b.clone();
            async move {
                b.search_gifs(arg_str(&args, "query").unwrap_or_default(), arg_i64(&args, "limit"))
                    .await
            }
        },
    ));

    tools
}
