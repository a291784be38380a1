use async_trait::async_trait;
use tracing::{debug, warn};

use super::{Interceptor, RequestContext};
use crate::transport::{ApiRequest, RawResponse, RequestBody};
use crate::Error;

/// Logged bodies are cut to this many bytes.
pub const RESPONSE_MAX_LENGTH: usize = 1000;

/// Verbose request/response logging, enabled by `ClientConfig::use_logger`.
///
/// Registered last so it records the request exactly as it goes on the wire.
#[derive(Debug, Default)]
pub struct LoggingInterceptor;

impl LoggingInterceptor {
    pub fn new() -> Self {
        Self
    }
}

pub(crate) fn truncate_for_log(text: &str) -> &str {
    if text.len() <= RESPONSE_MAX_LENGTH {
        return text;
    }
    let mut cut = RESPONSE_MAX_LENGTH;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    &text[..cut]
}

fn describe_body(body: &RequestBody) -> String {
    match body {
        RequestBody::Empty => String::new(),
        RequestBody::Form(fields) => fields
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&"),
        RequestBody::Json(value) => value.to_string(),
    }
}

#[async_trait]
impl Interceptor for LoggingInterceptor {
    fn name(&self) -> &str {
        "logger"
    }

    async fn on_request(&self, ctx: &RequestContext, req: &mut ApiRequest) -> crate::Result<()> {
        let headers = req
            .headers
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v.to_str().unwrap_or("<binary>")))
            .collect::<Vec<_>>()
            .join(", ");
        let body = describe_body(&req.body);
        let url = ctx.url_for(&req.path);
        debug!(
            request_id = ctx.request_id.as_str(),
            attempt = ctx.attempt,
            method = %req.method,
            url = url.as_str(),
            query = ?req.query,
            headers = headers.as_str(),
            body = truncate_for_log(&body),
            "--> request"
        );
        Ok(())
    }

    async fn on_response(&self, ctx: &RequestContext, resp: &RawResponse) {
        let body = resp.text_lossy();
        debug!(
            request_id = ctx.request_id.as_str(),
            attempt = ctx.attempt,
            status = resp.status,
            bytes = resp.body.len(),
            body = truncate_for_log(&body),
            "<-- response"
        );
    }

    async fn on_error(&self, ctx: &RequestContext, err: &Error) {
        warn!(
            request_id = ctx.request_id.as_str(),
            attempt = ctx.attempt,
            error = %err,
            "<-- failed"
        );
    }
}
