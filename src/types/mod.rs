//! 类型模块：服务端响应信封等核心数据类型。
//!
//! # Types Module
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Envelope`] | `code` / `description` / `resultMap` wrapper around every payload |
//!
//! ## Example
//!
//! ```rust
//! use envelope_http::types::Envelope;
//!
//! let env: Envelope<u32> =
//!     serde_json::from_str(r#"{"code":"1","description":"ok","resultMap":3}"#).unwrap();
//! assert!(env.is_success());
//! assert_eq!(env.payload, Some(3));
//! ```

pub mod envelope;

pub use envelope::Envelope;
