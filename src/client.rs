//! Request dispatcher.
//!
//! Keep the public surface small: [`Dispatcher`] for sending, [`ClientConfig`]
//! for configuring, [`ClassifiedError`] for what callers see on failure.
//! Implementation details are split into submodules under `src/client/`.

pub mod builder;
pub mod completion;
pub mod config;
pub mod core;
pub mod error_classification;
mod execution;
pub mod session;

pub use builder::DispatcherBuilder;
pub use completion::{CallHandle, DataCallback, Outcome};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use core::{ApiService, Dispatcher};
pub use error_classification::{classify, ClassifiedError};
pub use session::{SessionExpired, SessionMode, SessionNotifier, SessionSlot};
