//! # envelope-http
//!
//! 面向统一响应信封（code / description / resultMap）的 HTTP 请求分发库：集中配置、拦截器、重试、错误分类与会话过期通知。
//!
//! HTTP request dispatcher for backends that wrap every response in a uniform
//! envelope.
//!
//! ## Overview
//!
//! Every response body looks like:
//!
//! ```json
//! { "code": "1", "description": "ok", "resultMap": { "...": "..." } }
//! ```
//!
//! `code == "1"` is success and `resultMap` is the payload. A configurable
//! code marks an expired session; every other code is a business failure that
//! callers see verbatim. Local failures (network, TLS, timeouts, bad JSON) are
//! reduced to the shared `"-1"` code with a stable message.
//!
//! ## Key Features
//!
//! - **One configured dispatcher**: [`Dispatcher::configure`] builds the
//!   transport, interceptor chain, retry policy and per-host limiter once
//! - **Typed services**: [`Dispatcher::create`] binds an [`ApiService`]
//! - **Interceptors**: header injection, common parameters, request logging
//!   and caller-supplied hooks via [`interceptors`]
//! - **Classification**: every failure becomes a [`ClassifiedError`]
//! - **Session expiry**: a single replaceable [`SessionNotifier`]
//! - **Lifecycle-bound calls**: [`Dispatcher::spawn`] / [`Dispatcher::subscribe`]
//!   drop results once the caller's `CancellationToken` fires
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use envelope_http::services::AccountApi;
//! use envelope_http::{ClientConfig, Dispatcher};
//!
//! #[tokio::main]
//! async fn main() -> envelope_http::Result<()> {
//!     let config = ClientConfig::builder()
//!         .base_url("https://api.example.com")
//!         .connect_timeout(15)
//!         .response_timeout(20)
//!         .retry(2)
//!         .header("token", "secret")
//!         .build()?;
//!
//!     let dispatcher = Dispatcher::configure(config)?;
//!     dispatcher.register_session_notifier(|e: &envelope_http::SessionExpired| {
//!         println!("session expired (background={})", e.is_background());
//!     });
//!
//!     let account: AccountApi = dispatcher.create();
//!     match account.check_user_info("13800000000").await {
//!         Ok(payload) => println!("ok: {:?}", payload),
//!         Err(e) => println!("failed: {} {}", e.code, e.message),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Dispatcher, configuration, classification, session notifier |
//! | [`transport`] | Request/response values and the reqwest transport |
//! | [`interceptors`] | Per-attempt request/response hooks |
//! | [`pipeline`] | Envelope decoding and normalization |
//! | [`resilience`] | Retry policy and per-host concurrency cap |
//! | [`services`] | Typed API services |
//! | [`telemetry`] | `tracing` setup and the capped debug log file |

pub mod client;
pub mod error;
pub mod error_code;
pub mod interceptors;
pub mod pipeline;
pub mod resilience;
pub mod services;
pub mod telemetry;
pub mod transport;
pub mod types;

pub use client::{
    classify, ApiService, CallHandle, ClassifiedError, ClientConfig, DataCallback, Dispatcher,
    DispatcherBuilder, Outcome, SessionExpired, SessionMode, SessionNotifier,
};
pub use error::{Error, ErrorContext};
pub use error_code::ErrorKind;
pub use types::Envelope;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;
