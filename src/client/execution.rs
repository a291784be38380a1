//! 请求执行：重试循环包裹拦截器链与单次传输。
//!
//! Request execution.
//!
//! One logical request gets one request id. Each attempt runs the full
//! interceptor chain around a single transport exchange; the retry policy
//! decides between attempts.

use crate::interceptors::RequestContext;
use crate::transport::{ApiRequest, RawResponse};
use crate::{Error, Result};
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::core::Dispatcher;

impl Dispatcher {
    /// Send `request` with interceptors and retry, returning the raw response.
    ///
    /// Non-2xx statuses are errors; the envelope is not inspected here.
    pub async fn execute(&self, request: ApiRequest) -> Result<RawResponse> {
        let request_id = Uuid::new_v4().to_string();
        let started = Instant::now();
        let base_url = self.inner.base_url.to_string();
        let mut attempt: u32 = 0;

        loop {
            let ctx = RequestContext {
                request_id: request_id.clone(),
                attempt,
                base_url: base_url.clone(),
            };

            let result = self
                .inner
                .interceptors
                .execute(&ctx, request.clone(), |req| self.execute_once(req))
                .await;

            match result {
                Ok(resp) => {
                    debug!(
                        request_id = request_id.as_str(),
                        attempt,
                        status = resp.status,
                        duration_ms = started.elapsed().as_millis() as u64,
                        "request completed"
                    );
                    return Ok(resp);
                }
                Err(err) => match self.inner.retry.should_retry(attempt, &err) {
                    Some(delay) => {
                        warn!(
                            request_id = request_id.as_str(),
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            error = %err,
                            "transient failure, retrying"
                        );
                        if !delay.is_zero() {
                            tokio::time::sleep(delay).await;
                        }
                        attempt += 1;
                    }
                    None => {
                        info!(
                            request_id = request_id.as_str(),
                            attempts = attempt + 1,
                            duration_ms = started.elapsed().as_millis() as u64,
                            error = %err,
                            "request failed"
                        );
                        return Err(err);
                    }
                },
            }
        }
    }

    /// Single attempt: resolve, take a host slot, send.
    async fn execute_once(&self, request: ApiRequest) -> Result<RawResponse> {
        let url = self.resolve(&request.path)?;
        let _permit = match &self.inner.host_limiter {
            Some(limiter) => Some(limiter.acquire(&url).await?),
            None => None,
        };
        self.inner
            .transport
            .send(url, &request)
            .await
            .map_err(Error::Transport)
    }
}
