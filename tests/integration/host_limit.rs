//! Per-host concurrency cap applied through the dispatcher.

use crate::scripted_transport::{base_config, dispatcher, envelope, ScriptedTransport};
use envelope_http::transport::ApiRequest;
use serde_json::{json, Value};
use std::time::Duration;

#[tokio::test]
async fn in_flight_requests_stay_under_the_cap() {
    let script = (0..6).map(|i| envelope("1", "", json!(i))).collect();
    let transport = ScriptedTransport::slow(script, Duration::from_millis(30));
    let d = dispatcher(base_config().max_connections(2).build().unwrap(), transport.clone());

    let calls = (0..6).map(|_| d.fetch::<Value>(ApiRequest::get("list")));
    let results = futures::future::join_all(calls).await;

    assert!(results.iter().all(|r| r.is_ok()));
    assert_eq!(transport.calls(), 6);
    assert_eq!(transport.peak(), 2);

    let usage = d.host_usage().unwrap();
    assert_eq!(usage.max_per_host, 2);
    assert_eq!(usage.in_use, vec![("api.example.test:80".to_string(), 0)]);
}

#[tokio::test]
async fn held_slots_show_in_host_usage() {
    let transport = ScriptedTransport::slow(
        vec![envelope("1", "", Value::Null)],
        Duration::from_millis(200),
    );
    let d = dispatcher(base_config().max_connections(3).build().unwrap(), transport);

    let pending = tokio::spawn({
        let d = d.clone();
        async move { d.fetch::<Value>(ApiRequest::get("slow")).await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(
        d.host_usage().unwrap().in_use,
        vec![("api.example.test:80".to_string(), 1)]
    );

    pending.await.unwrap().unwrap();
    assert_eq!(
        d.host_usage().unwrap().in_use,
        vec![("api.example.test:80".to_string(), 0)]
    );
}

#[tokio::test]
async fn no_cap_means_no_usage_report() {
    let d = dispatcher(base_config().build().unwrap(), ScriptedTransport::new(vec![]));
    assert!(d.host_usage().is_none());
}
