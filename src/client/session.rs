//! 会话过期通知：单一注册槽，后注册者覆盖先注册者。
//!
//! Session-expiry notification.
//!
//! A dispatcher owns exactly one [`SessionSlot`]. Registering a notifier
//! replaces whatever was there (last writer wins); an empty slot drops events.

use arc_swap::ArcSwapOption;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// What the notifier is asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Prompt the user to sign in again.
    Prompt,
    /// Attempt a silent re-authentication without UI.
    Background,
}

/// A session-expiry event.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionExpired {
    pub mode: SessionMode,
    /// Server code and message, when the event came from a response.
    pub code: Option<String>,
    pub message: Option<String>,
    pub context: Option<Value>,
}

impl SessionExpired {
    pub fn is_background(&self) -> bool {
        self.mode == SessionMode::Background
    }
}

/// Receives session-expiry events.
pub trait SessionNotifier: Send + Sync {
    fn session_expired(&self, event: &SessionExpired);
}

impl<F> SessionNotifier for F
where
    F: Fn(&SessionExpired) + Send + Sync,
{
    fn session_expired(&self, event: &SessionExpired) {
        self(event)
    }
}

/// Single registration slot for the session notifier.
#[derive(Default)]
pub struct SessionSlot {
    current: ArcSwapOption<Box<dyn SessionNotifier>>,
}

impl SessionSlot {
    pub fn new() -> Self {
        Self {
            current: ArcSwapOption::empty(),
        }
    }

    /// Install `notifier`, returning the one it replaced.
    pub fn register(
        &self,
        notifier: Box<dyn SessionNotifier>,
    ) -> Option<Arc<Box<dyn SessionNotifier>>> {
        self.current.swap(Some(Arc::new(notifier)))
    }

    pub fn clear(&self) -> Option<Arc<Box<dyn SessionNotifier>>> {
        self.current.swap(None)
    }

    pub fn is_registered(&self) -> bool {
        self.current.load().is_some()
    }

    /// Deliver `event` to the registered notifier. Returns whether anyone received it.
    pub fn notify(&self, event: &SessionExpired) -> bool {
        match self.current.load_full() {
            Some(notifier) => {
                notifier.session_expired(event);
                true
            }
            None => {
                debug!(mode = ?event.mode, "session expired with no notifier registered; dropped");
                false
            }
        }
    }
}
