//! Retry behavior across transient and final failures.

use crate::scripted_transport::{base_config, dispatcher, envelope, refused, timed_out, ScriptedTransport};
use envelope_http::transport::{ApiRequest, TransportError};
use envelope_http::ErrorKind;
use serde_json::{json, Value};

#[tokio::test]
async fn two_failures_then_success_with_three_retries() {
    let transport = ScriptedTransport::new(vec![
        refused(),
        timed_out(),
        envelope("1", "ok", json!({"token": "t"})),
    ]);
    let d = dispatcher(base_config().retry(3).build().unwrap(), transport.clone());

    let payload: Option<Value> = d.fetch(ApiRequest::post("api/account/login")).await.unwrap();
    assert_eq!(payload, Some(json!({"token": "t"})));
    assert_eq!(transport.calls(), 3);
}

#[tokio::test]
async fn retry_budget_is_respected() {
    let transport = ScriptedTransport::new(vec![refused(), refused(), refused()]);
    let d = dispatcher(base_config().retry(1).build().unwrap(), transport.clone());

    let err = d
        .fetch::<Value>(ApiRequest::post("api/account/login"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Network);
    assert_eq!(err.message, "connection failed");
    assert_eq!(transport.calls(), 2);
}

#[tokio::test]
async fn connect_timeout_surfaces_as_timed_out() {
    let transport = ScriptedTransport::new(vec![timed_out()]);
    let d = dispatcher(base_config().build().unwrap(), transport);

    let err = d.fetch::<Value>(ApiRequest::get("ping")).await.unwrap_err();
    assert_eq!(
        (err.kind, err.code.as_str(), err.message.as_str()),
        (ErrorKind::Network, "-1", "connection timed out")
    );
}

#[tokio::test]
async fn server_answers_are_never_retried() {
    let transport = ScriptedTransport::new(vec![
        envelope("2", "phone not registered", Value::Null),
        envelope("1", "ok", Value::Null),
    ]);
    let d = dispatcher(base_config().retry(3).build().unwrap(), transport.clone());
    let err = d.fetch::<Value>(ApiRequest::post("x")).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Business);
    assert_eq!(transport.calls(), 1);

    let transport = ScriptedTransport::new(vec![Err(TransportError::Tls("bad cert".into()))]);
    let d = dispatcher(base_config().retry(3).build().unwrap(), transport.clone());
    let err = d.fetch::<Value>(ApiRequest::post("x")).await.unwrap_err();
    assert_eq!(err.message, "certificate verification failed");
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn paths_resolve_under_base_url() {
    let transport = ScriptedTransport::new(vec![
        envelope("1", "", Value::Null),
        envelope("1", "", Value::Null),
    ]);
    let d = dispatcher(base_config().build().unwrap(), transport.clone());
    d.call::<Value>(ApiRequest::post("api/account/login")).await.unwrap();
    d.call::<Value>(ApiRequest::get("/health")).await.unwrap();

    let urls: Vec<String> = transport.seen().into_iter().map(|(u, _)| u.to_string()).collect();
    assert_eq!(
        urls,
        vec![
            "http://api.example.test/gateway/api/account/login".to_string(),
            "http://api.example.test/health".to_string(),
        ]
    );
}
