//! Typed API services.
//!
//! Each service is a thin struct over a [`Dispatcher`](crate::Dispatcher),
//! obtained with [`Dispatcher::create`](crate::Dispatcher::create).

pub mod account;

pub use account::{AccountApi, CheckResponse, LoginResponse};
