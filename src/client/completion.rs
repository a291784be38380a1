//! 异步调用：在后台任务中执行请求，结果回到调用方；调用方生命周期结束后丢弃结果。
//!
//! Background calls bound to a caller lifecycle.
//!
//! The caller owns a [`CancellationToken`] for its lifecycle (a screen, a
//! session, a job). Requests started with [`Dispatcher::spawn`] or
//! [`Dispatcher::subscribe`] run on the tokio runtime and deliver at most one
//! outcome. Once the lifecycle token is cancelled the in-flight exchange is
//! dropped and nothing is delivered.

use crate::client::core::Dispatcher;
use crate::client::error_classification::ClassifiedError;
use crate::transport::ApiRequest;
use serde::de::DeserializeOwned;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Settled result of a background call.
pub type Outcome<T> = std::result::Result<Option<T>, ClassifiedError>;

/// Success/error callback pair for [`Dispatcher::subscribe`].
pub trait DataCallback<T>: Send + 'static {
    /// `data` is `None` when the server succeeded without a payload.
    fn on_success(&mut self, data: Option<T>);
    fn on_error(&mut self, code: &str, message: &str);
}

/// Handle to a call started with [`Dispatcher::spawn`].
pub struct CallHandle<T> {
    rx: oneshot::Receiver<Outcome<T>>,
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl<T> CallHandle<T> {
    /// Cancel just this call. The caller's lifecycle token is unaffected.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the outcome. `None` if the call was cancelled first.
    pub async fn outcome(self) -> Option<Outcome<T>> {
        let outcome = self.rx.await.ok()?;
        if self.token.is_cancelled() {
            return None;
        }
        Some(outcome)
    }
}

/// Run `fetch` unless `token` fires first; a result that lands after
/// cancellation is discarded.
async fn run_guarded<T: DeserializeOwned>(
    dispatcher: Dispatcher,
    request: ApiRequest,
    token: CancellationToken,
) -> Option<Outcome<T>> {
    let path = request.path.clone();
    let outcome = tokio::select! {
        biased;
        _ = token.cancelled() => None,
        outcome = dispatcher.fetch::<T>(request) => Some(outcome),
    };
    match outcome {
        Some(outcome) if !token.is_cancelled() => Some(outcome),
        _ => {
            debug!(path = path.as_str(), "caller lifecycle ended; result dropped");
            None
        }
    }
}

impl Dispatcher {
    /// Start `request` in the background under `lifecycle`.
    pub fn spawn<T>(&self, request: ApiRequest, lifecycle: &CancellationToken) -> CallHandle<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let token = lifecycle.child_token();
        let (tx, rx) = oneshot::channel();
        let guarded = run_guarded::<T>(self.clone(), request, token.clone());
        let task = tokio::spawn(async move {
            if let Some(outcome) = guarded.await {
                let _ = tx.send(outcome);
            }
        });
        CallHandle { rx, token, task }
    }

    /// Start `request` in the background and report through `callback`.
    ///
    /// Exactly one of `on_success` / `on_error` runs, unless `lifecycle` is
    /// cancelled before the outcome is delivered, in which case neither does.
    pub fn subscribe<T, C>(
        &self,
        request: ApiRequest,
        lifecycle: &CancellationToken,
        mut callback: C,
    ) -> JoinHandle<()>
    where
        T: DeserializeOwned + Send + 'static,
        C: DataCallback<T>,
    {
        let token = lifecycle.child_token();
        let dispatcher = self.clone();
        tokio::spawn(async move {
            match run_guarded::<T>(dispatcher, request, token).await {
                Some(Ok(data)) => callback.on_success(data),
                Some(Err(err)) => callback.on_error(&err.code, &err.message),
                None => {}
            }
        })
    }
}
