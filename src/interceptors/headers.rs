use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue};
use std::collections::BTreeMap;

use super::{Interceptor, RequestContext};
use crate::transport::request::parse_header;
use crate::transport::ApiRequest;
use crate::Result;

/// Injects fixed headers (e.g. `token`) into every outgoing request.
///
/// Headers are validated once at construction. A header already set on the
/// request is overwritten.
pub struct HeaderInterceptor {
    headers: Vec<(HeaderName, HeaderValue)>,
}

impl HeaderInterceptor {
    pub fn new(headers: &BTreeMap<String, String>) -> Result<Self> {
        let headers = headers
            .iter()
            .map(|(k, v)| parse_header(k, v))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { headers })
    }
}

#[async_trait]
impl Interceptor for HeaderInterceptor {
    fn name(&self) -> &str {
        "headers"
    }

    async fn on_request(&self, _ctx: &RequestContext, req: &mut ApiRequest) -> Result<()> {
        for (name, value) in &self.headers {
            req.headers.insert(name.clone(), value.clone());
        }
        Ok(())
    }
}
