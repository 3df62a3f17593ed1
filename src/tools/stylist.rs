//! The prompt-shaping tool.
//!
//! `style_reply` calls no backend: it deterministically returns an
//! instruction block the model acts on in its next step. It still goes
//! through the registry like every I/O tool — same descriptor, same
//! validation, same result contract — so the loop has no special cases.

use serde_json::json;

use crate::schema::{Field, InputSchema};
use crate::tools::{arg_str, RegisteredTool};

const TONES: &[&str] = &["playful", "witty", "romantic", "bold", "casual", "sincere"];

pub(crate) fn style_reply() -> RegisteredTool {
    RegisteredTool::new(
        "style_reply",
        "Rewrite or draft a reply to a message in a chosen tone. Returns styling instructions for you to follow; it does not send anything.",
        InputSchema::new()
            .field(
                Field::string("message")
                    .required()
                    .describe("The message being replied to, verbatim"),
            )
            .field(
                Field::string("tone")
                    .required()
                    .one_of(TONES)
                    .describe("The voice the reply should take"),
            )
            .field(
                Field::string("context")
                    .describe("Anything known about the person or the conversation so far"),
            ),
        |args| async move {
            let message = arg_str(&args, "message").unwrap_or_default();
            let tone = arg_str(&args, "tone").unwrap_or_default();
            let hints = tone_hints(tone);
            Ok(json!({
                "instruction": format!(
                    "Draft a {tone} reply to the original message. Keep it short enough to text, \
                     reference something specific from the message, and end in a way that invites a response. \
                     Offer two or three variants."
                ),
                "original_message": message,
                "tone": tone,
                "context": arg_str(&args, "context"),
                "hints": hints,
            }))
        },
    )
}

fn tone_hints(tone: &str) -> Vec<&'static str> {
    match tone {
        "playful" => vec![
            "tease lightly, never at their expense",
            "emoji are fine, one at most",
        ],
        "witty" => vec![
            "one sharp observation beats three jokes",
            "callbacks to their own words land best",
        ],
        "romantic" => vec![
            "be concrete about what you noticed, not generic compliments",
            "sincerity over poetry",
        ],
        "bold" => vec![
            "make the ask directly, with a time and a place",
            "confidence reads better without qualifiers",
        ],
        "casual" => vec![
            "lowercase energy, no pressure on the reply",
        ],
        "sincere" => vec![
            "drop the angle entirely; say the true thing plainly",
        ],
        _ => vec![],
    }
}
