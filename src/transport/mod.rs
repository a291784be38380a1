//! 传输层：请求描述、原始响应与可替换的 HTTP 执行引擎。
//!
//! Transport layer.
//!
//! The dispatcher never talks to reqwest directly; it hands a resolved URL and
//! an [`ApiRequest`] to a [`Transport`]. [`HttpTransport`] is the production
//! implementation, tests substitute their own to script failures.

pub mod http;
pub mod request;

pub use http::{HttpTransport, TransportError};
pub use request::{ApiRequest, RawResponse, RequestBody};

use async_trait::async_trait;
use url::Url;

/// HTTP execution engine (pooling, TLS, timeouts).
///
/// Implementations perform exactly one exchange per call; retries, interceptors
/// and concurrency caps live above this seam.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        url: Url,
        request: &ApiRequest,
    ) -> std::result::Result<RawResponse, TransportError>;
}
