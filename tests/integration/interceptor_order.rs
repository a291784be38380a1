//! Interceptor ordering and request rewriting.

use crate::scripted_transport::{base_config, dispatcher, envelope, ScriptedTransport};
use async_trait::async_trait;
use envelope_http::interceptors::{Interceptor, RequestContext};
use envelope_http::transport::{ApiRequest, RawResponse};
use envelope_http::{Error, ErrorContext, ErrorKind};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

struct Stamp {
    token: &'static str,
    trail: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Interceptor for Stamp {
    fn name(&self) -> &str {
        "stamp"
    }

    async fn on_request(&self, ctx: &RequestContext, req: &mut ApiRequest) -> envelope_http::Result<()> {
        self.trail.lock().unwrap().push(format!("request:{}", ctx.attempt));
        req.insert_header("token", self.token)?;
        req.add_param("app", "from-extra");
        Ok(())
    }

    async fn on_response(&self, _ctx: &RequestContext, resp: &RawResponse) {
        self.trail.lock().unwrap().push(format!("response:{}", resp.status));
    }
}

#[tokio::test]
async fn extras_run_before_builtin_interceptors() {
    let trail = Arc::new(Mutex::new(Vec::new()));
    let transport = ScriptedTransport::new(vec![envelope("1", "", Value::Null)]);
    let config = base_config()
        .interceptor(Stamp {
            token: "from-extra",
            trail: trail.clone(),
        })
        .header("token", "from-config")
        .common_param("app", "from-config")
        .common_param("channel", "store")
        .build()
        .unwrap();
    let d = dispatcher(config, transport.clone());

    d.call::<Value>(ApiRequest::post("x").json(json!({"phone": "1"})))
        .await
        .unwrap();

    let (_, sent) = transport.seen().remove(0);
    // header injection runs after the extra and overwrites it
    assert_eq!(sent.headers.get("token").unwrap(), "from-config");
    // common params never override what the request already has
    assert_eq!(
        sent.body,
        envelope_http::transport::RequestBody::Json(
            json!({"phone": "1", "app": "from-extra", "channel": "store"})
        )
    );
    assert_eq!(*trail.lock().unwrap(), vec!["request:0", "response:200"]);
}

struct Reject;

#[async_trait]
impl Interceptor for Reject {
    fn name(&self) -> &str {
        "reject"
    }

    async fn on_request(&self, _ctx: &RequestContext, _req: &mut ApiRequest) -> envelope_http::Result<()> {
        Err(Error::configuration_with_context(
            "missing credentials",
            ErrorContext::new().with_source("reject"),
        ))
    }
}

#[tokio::test]
async fn rejected_request_never_reaches_transport() {
    let transport = ScriptedTransport::new(vec![envelope("1", "", Value::Null)]);
    let config = base_config().retry(2).interceptor(Reject).build().unwrap();
    let d = dispatcher(config, transport.clone());

    let err = d.fetch::<Value>(ApiRequest::get("x")).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Config);
    assert_eq!(transport.calls(), 0);
}
