use thiserror::Error;

/// Unified error type for the wingman runtime.
///
/// The taxonomy mirrors how far an error is allowed to travel:
/// `Validation`, `Remote` and `Configuration` are captured at the tool
/// boundary and fed back to the model as structured tool results, while
/// `Model` aborts the current turn and reaches the session driver.
#[derive(Debug, Error)]
pub enum Error {
    /// Tool arguments failed schema validation.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// A backend returned a non-2xx response or the transport itself failed.
    /// `status` is `None` for transport-level faults (connect, timeout).
    #[error("remote error from {backend}{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Remote {
        backend: &'static str,
        status: Option<u16>,
        message: String,
    },

    /// A required credential or setting is absent.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// The model invocation itself failed. The only error kind that crosses
    /// the orchestration-loop boundary as `Err`.
    #[error("model invocation failed: {message}")]
    Model { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    pub fn model(message: impl Into<String>) -> Self {
        Error::Model {
            message: message.into(),
        }
    }

    /// Whether this error represents a failure to reach a backend at all,
    /// as opposed to the backend answering with an error status.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Error::Remote { status: None, .. })
    }
}
