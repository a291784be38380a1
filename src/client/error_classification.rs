//! Error classification logic

use crate::error_code::{
    ErrorKind, MSG_CERTIFICATE_FAILED, MSG_CONNECTION_FAILED, MSG_INVALID_CONFIG,
    MSG_PARSE_ERROR, MSG_TIMED_OUT, MSG_UNKNOWN_ERROR, MSG_UNKNOWN_HOST, SYSTEM_ERROR,
};
use crate::transport::TransportError;
use crate::Error;
use serde::Serialize;
use std::fmt;

/// A failure reduced to what the UI layer needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedError {
    pub code: String,
    pub message: String,
    pub kind: ErrorKind,
}

impl ClassifiedError {
    fn local(kind: ErrorKind, message: &str) -> Self {
        Self {
            code: SYSTEM_ERROR.to_string(),
            message: message.to_string(),
            kind,
        }
    }

    pub fn is_session(&self) -> bool {
        self.kind == ErrorKind::Session
    }
}

impl fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({})", self.code, self.message, self.kind)
    }
}

impl std::error::Error for ClassifiedError {}

impl From<&Error> for ClassifiedError {
    fn from(err: &Error) -> Self {
        classify(err)
    }
}

/// Map any failure to its stable `(code, message, kind)`.
///
/// Arms are checked top to bottom and the first match wins: session, business,
/// parse, connection refused, TLS, timeout, unknown host, configuration, then
/// everything else.
pub fn classify(err: &Error) -> ClassifiedError {
    match err {
        Error::Session { code, message } => ClassifiedError {
            code: code.clone(),
            message: message.clone(),
            kind: ErrorKind::Session,
        },
        Error::Business { code, message } => ClassifiedError {
            code: code.clone(),
            message: message.clone(),
            kind: ErrorKind::Business,
        },
        Error::Serialization(_) | Error::Transport(TransportError::Decode(_)) => {
            ClassifiedError::local(ErrorKind::Parse, MSG_PARSE_ERROR)
        }
        Error::Transport(TransportError::Connect(_)) => {
            ClassifiedError::local(ErrorKind::Network, MSG_CONNECTION_FAILED)
        }
        Error::Transport(TransportError::Tls(_)) => {
            ClassifiedError::local(ErrorKind::Network, MSG_CERTIFICATE_FAILED)
        }
        Error::Transport(TransportError::Timeout(_)) => {
            ClassifiedError::local(ErrorKind::Network, MSG_TIMED_OUT)
        }
        Error::Transport(TransportError::UnknownHost(_)) => {
            ClassifiedError::local(ErrorKind::Network, MSG_UNKNOWN_HOST)
        }
        Error::Configuration { .. } => ClassifiedError::local(ErrorKind::Config, MSG_INVALID_CONFIG),
        _ => ClassifiedError::local(ErrorKind::Unknown, MSG_UNKNOWN_ERROR),
    }
}
