//! Session-expiry notification.

use crate::scripted_transport::{base_config, dispatcher, envelope, ScriptedTransport};
use envelope_http::transport::ApiRequest;
use envelope_http::{ErrorKind, SessionExpired, SessionMode};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

fn recorder() -> (Arc<Mutex<Vec<SessionExpired>>>, impl Fn(&SessionExpired) + Send + Sync) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    (events, move |e: &SessionExpired| sink.lock().unwrap().push(e.clone()))
}

#[tokio::test]
async fn session_code_notifies_exactly_once() {
    let transport = ScriptedTransport::new(vec![envelope("-2", "signed in elsewhere", Value::Null)]);
    let config = base_config().context(json!({"screen": "home"})).build().unwrap();
    let d = dispatcher(config, transport);

    let (events, notifier) = recorder();
    assert!(!d.register_session_notifier(notifier));

    let err = d.fetch::<Value>(ApiRequest::get("api/me")).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Session);
    assert_eq!(err.code, "-2");
    assert_eq!(err.message, "signed in elsewhere");

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].mode, SessionMode::Prompt);
    assert_eq!(events[0].code.as_deref(), Some("-2"));
    assert_eq!(events[0].context, Some(json!({"screen": "home"})));
}

#[tokio::test]
async fn custom_session_code() {
    let transport = ScriptedTransport::new(vec![
        envelope("-2", "just a business code here", Value::Null),
        envelope("401", "token expired", Value::Null),
    ]);
    let config = base_config().session_expired_code("401").build().unwrap();
    let d = dispatcher(config, transport);
    let (events, notifier) = recorder();
    d.register_session_notifier(notifier);

    let first = d.fetch::<Value>(ApiRequest::get("a")).await.unwrap_err();
    assert_eq!(first.kind, ErrorKind::Business);
    let second = d.fetch::<Value>(ApiRequest::get("b")).await.unwrap_err();
    assert_eq!(second.kind, ErrorKind::Session);
    assert_eq!(events.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn second_registration_replaces_first() {
    let transport = ScriptedTransport::new(vec![envelope("-2", "expired", Value::Null)]);
    let d = dispatcher(base_config().build().unwrap(), transport);

    let (first, n1) = recorder();
    let (second, n2) = recorder();
    assert!(!d.register_session_notifier(n1));
    assert!(d.register_session_notifier(n2));

    d.fetch::<Value>(ApiRequest::get("a")).await.unwrap_err();
    assert!(first.lock().unwrap().is_empty());
    assert_eq!(second.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn no_notifier_drops_event_but_still_fails() {
    let transport = ScriptedTransport::new(vec![envelope("-2", "expired", Value::Null)]);
    let d = dispatcher(base_config().build().unwrap(), transport);

    let err = d.fetch::<Value>(ApiRequest::get("a")).await.unwrap_err();
    assert!(err.is_session());
    assert!(!d.notify_session_expired(true, None));
}

#[test]
fn manual_notification_uses_config_context_by_default() {
    let d = dispatcher(
        base_config().context(json!("app")).build().unwrap(),
        ScriptedTransport::new(vec![]),
    );
    let (events, notifier) = recorder();
    d.register_session_notifier(notifier);

    assert!(d.notify_session_expired(true, None));
    assert!(d.notify_session_expired(false, Some(json!("login-screen"))));

    let events = events.lock().unwrap();
    assert!(events[0].is_background());
    assert_eq!(events[0].context, Some(json!("app")));
    assert_eq!(events[0].code, None);
    assert_eq!(events[1].mode, SessionMode::Prompt);
    assert_eq!(events[1].context, Some(json!("login-screen")));
}

#[test]
fn rebased_dispatcher_shares_notifier() {
    let d = dispatcher(base_config().build().unwrap(), ScriptedTransport::new(vec![]));
    let other = d.rebase("https://upload.example.test").unwrap();
    assert_eq!(other.base_url().as_str(), "https://upload.example.test/");

    let (events, notifier) = recorder();
    d.register_session_notifier(notifier);
    assert!(other.notify_session_expired(false, None));
    assert_eq!(events.lock().unwrap().len(), 1);

    assert!(d.rebase("not a url").is_err());
}
