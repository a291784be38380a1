use crate::client::builder::DispatcherBuilder;
use crate::client::config::{parse_base_url, ClientConfig};
use crate::client::error_classification::{classify, ClassifiedError};
use crate::client::session::{SessionExpired, SessionMode, SessionNotifier, SessionSlot};
use crate::interceptors::InterceptorPipeline;
use crate::resilience::host_limiter::{HostLimiter, HostLimiterSnapshot};
use crate::resilience::retry::RetryPolicy;
use crate::transport::{ApiRequest, Transport};
use crate::{Error, ErrorContext, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;
use url::Url;

/// A typed API surface bound to a dispatcher (the `createTypedClient` seam).
pub trait ApiService: Sized {
    fn bind(dispatcher: Dispatcher) -> Self;
}

/// Request dispatcher: the one shared transport plus everything wrapped around it.
///
/// Cloning is cheap and every clone shares the same transport, interceptor
/// chain, limiter and session slot. There is no global instance: construct
/// one at startup with [`Dispatcher::configure`] and pass it to consumers.
#[derive(Clone)]
pub struct Dispatcher {
    pub(crate) inner: Arc<DispatcherInner>,
}

pub(crate) struct DispatcherInner {
    pub(crate) config: Arc<ClientConfig>,
    pub(crate) base_url: Url,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) interceptors: InterceptorPipeline,
    pub(crate) retry: RetryPolicy,
    pub(crate) host_limiter: Option<Arc<HostLimiter>>,
    pub(crate) session: Arc<SessionSlot>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("base_url", &self.inner.base_url.as_str())
            .field("interceptors", &self.inner.interceptors.names())
            .field("max_retries", &self.inner.retry.max_retries())
            .field("session_notifier", &self.inner.session.is_registered())
            .finish()
    }
}

impl Dispatcher {
    /// Build the transport and interceptor chain from `config`.
    ///
    /// Fails with [`Error::Configuration`] when the base URL is missing or
    /// malformed, or a header is invalid.
    pub fn configure(config: ClientConfig) -> Result<Self> {
        DispatcherBuilder::new(config).build()
    }

    pub fn builder(config: ClientConfig) -> DispatcherBuilder {
        DispatcherBuilder::new(config)
    }

    /// Construct a typed API service bound to this dispatcher.
    pub fn create<S: ApiService>(&self) -> S {
        S::bind(self.clone())
    }

    /// A sibling dispatcher for another host.
    ///
    /// Shares this dispatcher's configuration, transport, interceptors, limiter
    /// and session slot; only the base URL differs.
    pub fn rebase(&self, base_url: &str) -> Result<Self> {
        let base_url = parse_base_url(base_url)?;
        info!(base_url = base_url.as_str(), "rebased dispatcher");
        Ok(Self {
            inner: Arc::new(DispatcherInner {
                config: self.inner.config.clone(),
                base_url,
                transport: self.inner.transport.clone(),
                interceptors: self.inner.interceptors.clone(),
                retry: self.inner.retry.clone(),
                host_limiter: self.inner.host_limiter.clone(),
                session: self.inner.session.clone(),
            }),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    pub(crate) fn resolve(&self, path: &str) -> Result<Url> {
        self.inner.base_url.join(path).map_err(|e| {
            Error::configuration_with_context(
                format!("cannot resolve request path '{}'", path),
                ErrorContext::new()
                    .with_field_path("request.path")
                    .with_details(e.to_string())
                    .with_source("dispatcher"),
            )
        })
    }

    /// Execute `request` and unwrap the envelope, returning the raw error on failure.
    pub async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<Option<T>> {
        let resp = self.execute(request).await?;
        crate::pipeline::unwrap_body(&resp.body, &self.inner.config.session_expired_code)
    }

    /// Execute `request` and classify any failure.
    ///
    /// A session failure also notifies the registered session notifier
    /// (prompt mode), in addition to being returned.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> std::result::Result<Option<T>, ClassifiedError> {
        self.call(request).await.map_err(|err| {
            let classified = classify(&err);
            if classified.is_session() {
                self.inner.session.notify(&SessionExpired {
                    mode: SessionMode::Prompt,
                    code: Some(classified.code.clone()),
                    message: Some(classified.message.clone()),
                    context: self.inner.config.context.clone(),
                });
            }
            classified
        })
    }

    /// Install the session notifier. Replaces any previous one; returns
    /// whether a previous one existed.
    pub fn register_session_notifier<N: SessionNotifier + 'static>(&self, notifier: N) -> bool {
        self.inner.session.register(Box::new(notifier)).is_some()
    }

    pub fn clear_session_notifier(&self) -> bool {
        self.inner.session.clear().is_some()
    }

    /// Signal session expiry outside of a response (e.g. from a background job).
    ///
    /// `background == true` asks for silent re-authentication, otherwise a UI
    /// prompt. `context` defaults to `ClientConfig::context`. Returns whether a
    /// notifier received the event.
    pub fn notify_session_expired(&self, background: bool, context: Option<Value>) -> bool {
        self.inner.session.notify(&SessionExpired {
            mode: if background {
                SessionMode::Background
            } else {
                SessionMode::Prompt
            },
            code: None,
            message: None,
            context: context.or_else(|| self.inner.config.context.clone()),
        })
    }

    pub fn host_usage(&self) -> Option<HostLimiterSnapshot> {
        self.inner.host_limiter.as_ref().map(|l| l.snapshot())
    }
}
