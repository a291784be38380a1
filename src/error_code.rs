//! 错误分类码：定义面向界面的稳定错误类别与系统错误码。
//!
//! Stable error taxonomy shown to application code.
//!
//! Every failure that reaches a caller is reduced to a `(code, message)` pair
//! plus an [`ErrorKind`]. Server-originated failures keep the server's code;
//! locally detected failures all share [`SYSTEM_ERROR`].
//!
//! | Kind     | Code            | Origin                                  |
//! |----------|-----------------|-----------------------------------------|
//! | Session  | server-provided | envelope carries the session-expired code |
//! | Business | server-provided | any other non-success envelope          |
//! | Parse    | `-1`            | body is not a decodable envelope        |
//! | Network  | `-1`            | connect, TLS, timeout or DNS failure    |
//! | Config   | `-1`            | invalid client configuration            |
//! | Unknown  | `-1`            | everything else                         |
//!
//! ## Example
//!
//! ```rust
//! use envelope_http::error_code::{ErrorKind, SYSTEM_ERROR};
//!
//! assert_eq!(SYSTEM_ERROR, "-1");
//! assert!(ErrorKind::Network.is_local());
//! assert_eq!(ErrorKind::Business.name(), "business");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Code attached to every failure detected on the client side.
pub const SYSTEM_ERROR: &str = "-1";

/// Envelope code the server uses for success.
pub const SUCCESS_CODE: &str = "1";

/// Envelope code signalling an invalidated session unless configured otherwise.
pub const DEFAULT_SESSION_EXPIRED_CODE: &str = "-2";

pub const MSG_PARSE_ERROR: &str = "parse error";
pub const MSG_CONNECTION_FAILED: &str = "connection failed";
pub const MSG_CERTIFICATE_FAILED: &str = "certificate verification failed";
pub const MSG_TIMED_OUT: &str = "connection timed out";
pub const MSG_UNKNOWN_HOST: &str = "unknown host";
pub const MSG_INVALID_CONFIG: &str = "invalid configuration";
pub const MSG_UNKNOWN_ERROR: &str = "unknown error";

/// Category of a classified failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The server reported that the caller's session is no longer valid
    Session,
    /// The server answered with a non-success envelope
    Business,
    /// The response body could not be decoded
    Parse,
    /// The request never produced a response (connect, TLS, timeout, DNS)
    Network,
    /// The client was configured with invalid settings
    Config,
    /// Anything not covered above
    Unknown,
}

impl ErrorKind {
    /// Returns the snake_case name (e.g., `"session"`).
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Session => "session",
            Self::Business => "business",
            Self::Parse => "parse",
            Self::Network => "network",
            Self::Config => "config",
            Self::Unknown => "unknown",
        }
    }

    /// Whether the code for this kind is [`SYSTEM_ERROR`] rather than a server code.
    #[inline]
    pub fn is_local(&self) -> bool {
        !matches!(self, Self::Session | Self::Business)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
