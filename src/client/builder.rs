use crate::client::config::ClientConfig;
use crate::client::core::{Dispatcher, DispatcherInner};
use crate::client::session::{SessionNotifier, SessionSlot};
use crate::interceptors::{
    CommonParamInterceptor, HeaderInterceptor, InterceptorPipeline, LoggingInterceptor,
};
use crate::resilience::host_limiter::HostLimiter;
use crate::resilience::retry::{RetryConfig, RetryPolicy};
use crate::transport::{HttpTransport, Transport};
use crate::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Builder for [`Dispatcher`].
///
/// Everything comes from the [`ClientConfig`]; the builder only adds the
/// pieces that are not plain data (a transport override for tests or custom
/// stacks, and an initial session notifier).
pub struct DispatcherBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
    notifier: Option<Box<dyn SessionNotifier>>,
}

impl DispatcherBuilder {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            transport: None,
            notifier: None,
        }
    }

    /// Use `transport` instead of the default reqwest-backed one.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn session_notifier<N: SessionNotifier + 'static>(mut self, notifier: N) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }

    /// Validate the configuration and assemble the dispatcher.
    pub fn build(self) -> Result<Dispatcher> {
        let base_url = self.config.validate()?;

        let transport: Arc<dyn Transport> = match self.transport {
            Some(t) => t,
            None => Arc::new(HttpTransport::new(&self.config)?),
        };

        // Caller-supplied interceptors first, built-ins after; the logger is
        // last so it sees the final request.
        let mut interceptors = InterceptorPipeline::new();
        for extra in &self.config.extra_interceptors {
            interceptors = interceptors.with_arc(extra.clone());
        }
        if !self.config.headers.is_empty() {
            interceptors = interceptors.with(HeaderInterceptor::new(&self.config.headers)?);
        }
        if !self.config.common_params.is_empty() {
            interceptors =
                interceptors.with(CommonParamInterceptor::new(self.config.common_params.clone()));
        }
        if self.config.use_logger {
            interceptors = interceptors.with(LoggingInterceptor::new());
        }

        let retry = RetryPolicy::new(RetryConfig::new(
            self.config.retry,
            Duration::from_millis(self.config.retry_delay_ms),
        ));

        let host_limiter = if self.config.max_connections_per_host > 0 {
            Some(Arc::new(HostLimiter::new(self.config.max_connections_per_host)))
        } else {
            None
        };

        let session = SessionSlot::new();
        if let Some(notifier) = self.notifier {
            session.register(notifier);
        }

        info!(
            base_url = base_url.as_str(),
            interceptors = ?interceptors.names(),
            retry = self.config.retry,
            max_connections_per_host = self.config.max_connections_per_host,
            "dispatcher configured"
        );

        Ok(Dispatcher {
            inner: Arc::new(DispatcherInner {
                config: Arc::new(self.config),
                base_url,
                transport,
                interceptors,
                retry,
                host_limiter,
                session: Arc::new(session),
            }),
        })
    }
}
