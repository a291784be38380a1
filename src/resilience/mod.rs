//! 弹性模块：网络失败重试与按主机并发限制。
//!
//! # Resilience Primitives Module
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`retry`] | Bounded re-issue of requests after network-level failures |
//! | [`host_limiter`] | Per-host cap on concurrent in-flight requests |
//!
//! ```rust
//! use envelope_http::resilience::retry::{RetryConfig, RetryPolicy};
//! use std::time::Duration;
//!
//! let policy = RetryPolicy::new(RetryConfig::new(3, Duration::ZERO));
//! assert_eq!(policy.max_retries(), 3);
//! ```

pub mod host_limiter;
pub mod retry;
