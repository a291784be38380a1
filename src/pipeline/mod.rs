//! 响应处理流水线：解码响应信封并拆解为业务数据或原始错误。
//!
//! # Response Pipeline
//!
//! Every response body passes through the same two stages exactly once, after
//! it has been fully received:
//!
//! ```text
//! Bytes → decode_envelope → Envelope<T> → normalize → Ok(Option<T>) | Err(Session | Business)
//!              │
//!         Serialization error (parse)
//! ```
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`decode`] | JSON body → [`Envelope`](crate::types::Envelope) |
//! | [`normalize`](mod@normalize) | Envelope → payload or raw error |

pub mod decode;
pub mod normalize;

pub use decode::decode_envelope;
pub use normalize::normalize;

use crate::Result;
use serde::de::DeserializeOwned;

/// Decode and normalize a body in one step.
pub fn unwrap_body<T: DeserializeOwned>(body: &[u8], session_code: &str) -> Result<Option<T>> {
    normalize(decode_envelope(body)?, session_code)
}
