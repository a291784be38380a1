//! 拦截器：请求头注入、公共参数、日志等横切逻辑。
//!
//! Interceptor hooks for cross-cutting request concerns.
//!
//! Interceptors run on every attempt, in registration order. Each one sees
//! `on_request` (and may rewrite or reject the outgoing request), then exactly
//! one of `on_response` / `on_error`.
//!
//! Built-ins:
//!
//! | Interceptor | Enabled by |
//! |-------------|------------|
//! | [`HeaderInterceptor`] | `ClientConfig::headers` |
//! | [`CommonParamInterceptor`] | `ClientConfig::common_params` |
//! | [`LoggingInterceptor`] | `ClientConfig::use_logger` |

mod headers;
mod logging;
mod params;

pub use headers::HeaderInterceptor;
pub use logging::LoggingInterceptor;
pub use params::CommonParamInterceptor;

use async_trait::async_trait;
use std::sync::Arc;
use url::Url;

use crate::transport::{ApiRequest, RawResponse};
use crate::{Error, Result};

/// Per-attempt request context passed to interceptors.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Shared by all attempts of one logical request.
    pub request_id: String,
    /// 0-based attempt number.
    pub attempt: u32,
    pub base_url: String,
}

impl RequestContext {
    /// The URL `path` resolves to, with the same join rules the dispatcher
    /// uses (a leading `/` resolves from the host root).
    pub fn url_for(&self, path: &str) -> String {
        match Url::parse(&self.base_url).and_then(|base| base.join(path)) {
            Ok(url) => url.to_string(),
            Err(_) => format!("{}{}", self.base_url, path),
        }
    }
}

#[async_trait]
pub trait Interceptor: Send + Sync {
    /// Short name used in logs and `Debug` output.
    fn name(&self) -> &str;

    async fn on_request(&self, _ctx: &RequestContext, _req: &mut ApiRequest) -> Result<()> {
        Ok(())
    }

    async fn on_response(&self, _ctx: &RequestContext, _resp: &RawResponse) {}

    async fn on_error(&self, _ctx: &RequestContext, _err: &Error) {}
}

/// Ordered interceptor chain.
#[derive(Clone, Default)]
pub struct InterceptorPipeline {
    pub(crate) interceptors: Vec<Arc<dyn Interceptor>>,
}

impl InterceptorPipeline {
    pub fn new() -> Self {
        Self {
            interceptors: Vec::new(),
        }
    }

    pub fn with<I: Interceptor + 'static>(mut self, interceptor: I) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    pub fn with_arc(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    pub fn names(&self) -> Vec<String> {
        self.interceptors.iter().map(|i| i.name().to_string()).collect()
    }

    /// Run hooks around a provided async function that performs the actual exchange.
    ///
    /// A failing `on_request` aborts the attempt; every interceptor (including
    /// the ones that already ran) then sees `on_error`.
    pub async fn execute<F, Fut>(
        &self,
        ctx: &RequestContext,
        mut req: ApiRequest,
        f: F,
    ) -> Result<RawResponse>
    where
        F: FnOnce(ApiRequest) -> Fut,
        Fut: std::future::Future<Output = Result<RawResponse>>,
    {
        let mut rejected = None;
        for ic in &self.interceptors {
            if let Err(err) = ic.on_request(ctx, &mut req).await {
                rejected = Some(err);
                break;
            }
        }

        let outcome = match rejected {
            Some(err) => Err(err),
            None => f(req).await,
        };

        match outcome {
            Ok(resp) => {
                for ic in &self.interceptors {
                    ic.on_response(ctx, &resp).await;
                }
                Ok(resp)
            }
            Err(err) => {
                for ic in &self.interceptors {
                    ic.on_error(ctx, &err).await;
                }
                Err(err)
            }
        }
    }
}
