use crate::error_code::SUCCESS_CODE;
use serde::{Deserialize, Deserializer, Serialize};

/// The server's outer JSON wrapper around every response payload.
///
/// ```json
/// {"code": "1", "description": "ok", "resultMap": {"token": "..."}}
/// ```
///
/// `code` may arrive as a string or an integer; it is always held as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(
        rename = "code",
        alias = "statusCode",
        deserialize_with = "deserialize_code"
    )]
    pub status_code: String,

    #[serde(rename = "description", alias = "message", default)]
    pub message: String,

    #[serde(
        rename = "resultMap",
        alias = "payload",
        default = "none",
        skip_serializing_if = "Option::is_none"
    )]
    pub payload: Option<T>,
}

fn none<T>() -> Option<T> {
    None
}

impl<T> Envelope<T> {
    pub fn new(status_code: impl Into<String>, message: impl Into<String>, payload: Option<T>) -> Self {
        Self {
            status_code: status_code.into(),
            message: message.into(),
            payload,
        }
    }

    pub fn success(payload: T) -> Self {
        Self::new(SUCCESS_CODE, "", Some(payload))
    }

    /// True iff the server reported success (`code == "1"`).
    pub fn is_success(&self) -> bool {
        self.status_code == SUCCESS_CODE
    }
}

fn deserialize_code<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Code {
        Text(String),
        Int(i64),
    }

    Ok(match Code::deserialize(deserializer)? {
        Code::Text(s) => s,
        Code::Int(n) => n.to_string(),
    })
}
