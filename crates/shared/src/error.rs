use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error payload the hero API sends with non-2xx create responses.
///
/// `message` is kept as a raw JSON value: servers are not trusted to send a
/// string, and anything that is not a non-empty string counts as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
}

impl ApiErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(Value::String(message.into())),
        }
    }

    /// Parses a response body; `None` when it is not a JSON object.
    pub fn parse(body: &[u8]) -> Option<Self> {
        serde_json::from_slice(body).ok()
    }

    pub fn message(&self) -> Option<&str> {
        self.message
            .as_ref()
            .and_then(Value::as_str)
            .filter(|message| !message.is_empty())
    }
}
