use async_trait::async_trait;
use std::collections::BTreeMap;

use super::{Interceptor, RequestContext};
use crate::transport::ApiRequest;
use crate::Result;

/// Adds shared parameters (app version, channel, ...) to every request.
///
/// See [`ApiRequest::add_param`] for where each parameter lands. Parameters the
/// request already carries win.
pub struct CommonParamInterceptor {
    params: BTreeMap<String, String>,
}

impl CommonParamInterceptor {
    pub fn new(params: BTreeMap<String, String>) -> Self {
        Self { params }
    }
}

#[async_trait]
impl Interceptor for CommonParamInterceptor {
    fn name(&self) -> &str {
        "common_params"
    }

    async fn on_request(&self, _ctx: &RequestContext, req: &mut ApiRequest) -> Result<()> {
        for (k, v) in &self.params {
            req.add_param(k, v);
        }
        Ok(())
    }
}
