//! End-to-end envelope handling over real HTTP.

use crate::mock_server::{MockServerFixture, LOGIN_PATH};
use envelope_http::services::AccountApi;
use envelope_http::transport::ApiRequest;
use envelope_http::{ClientConfig, DataCallback, Dispatcher, ErrorKind, SessionExpired};
use mockito::Matcher;
use serde::Deserialize;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Deserialize, PartialEq)]
struct User {
    #[serde(rename = "userId")]
    user_id: u64,
    name: String,
}

#[tokio::test]
async fn success_payload_is_returned_unchanged() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_envelope(LOGIN_PATH, "1", "ok", json!({"userId": 42, "name": "li"}))
        .await;

    let dispatcher = fixture.dispatcher();
    let user: Option<User> = dispatcher
        .fetch(ApiRequest::post("api/account/login").form_field("phone", "13800000000"))
        .await
        .unwrap();

    assert_eq!(
        user,
        Some(User {
            user_id: 42,
            name: "li".into()
        })
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn success_without_payload_is_none() {
    let mut fixture = MockServerFixture::new().await;
    let _m = fixture
        .mock_raw(LOGIN_PATH, 200, r#"{"code":1,"description":"ok","resultMap":null}"#)
        .await;

    let account: AccountApi = fixture.dispatcher().create();
    assert_eq!(account.login("13800000000").await.unwrap(), None);
}

struct ChannelCallback(mpsc::UnboundedSender<Result<Option<serde_json::Value>, (String, String)>>);

impl DataCallback<serde_json::Value> for ChannelCallback {
    fn on_success(&mut self, data: Option<serde_json::Value>) {
        let _ = self.0.send(Ok(data));
    }

    fn on_error(&mut self, code: &str, message: &str) {
        let _ = self.0.send(Err((code.to_string(), message.to_string())));
    }
}

#[tokio::test]
async fn business_error_reaches_error_callback_without_notifier() {
    let mut fixture = MockServerFixture::new().await;
    let _m = fixture
        .mock_raw(
            LOGIN_PATH,
            200,
            r#"{"code":"2","description":"phone not registered","resultMap":null}"#,
        )
        .await;

    let dispatcher = fixture.dispatcher();
    let notified = Arc::new(AtomicUsize::new(0));
    let n = notified.clone();
    dispatcher.register_session_notifier(move |_: &SessionExpired| {
        n.fetch_add(1, Ordering::SeqCst);
    });

    let (tx, mut rx) = mpsc::unbounded_channel();
    let lifecycle = CancellationToken::new();
    dispatcher
        .subscribe(
            AccountApi::check_user_info_request("13800000000"),
            &lifecycle,
            ChannelCallback(tx),
        )
        .await
        .unwrap();

    assert_eq!(
        rx.recv().await.unwrap(),
        Err(("2".to_string(), "phone not registered".to_string()))
    );
    assert!(rx.try_recv().is_err());
    assert_eq!(notified.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn configured_headers_and_common_params_are_sent() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", LOGIN_PATH)
        .match_header("token", "123333333333")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("phone".into(), "13800000000".into()),
            Matcher::UrlEncoded("app".into(), "driver".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"code":"1","description":"","resultMap":{"ok":true}}"#)
        .expect(1)
        .create_async()
        .await;

    let config = fixture
        .config()
        .header("token", "123333333333")
        .common_param("app", "driver")
        .use_logger(true)
        .build()
        .unwrap();
    let account: AccountApi = Dispatcher::configure(config).unwrap().create();

    let payload = account.check_user_info("13800000000").await.unwrap();
    assert_eq!(payload, Some(json!({"ok": true})));
    mock.assert_async().await;
}

#[tokio::test]
async fn malformed_body_is_parse_error() {
    let mut fixture = MockServerFixture::new().await;
    let _m = fixture.mock_raw(LOGIN_PATH, 200, "<html>gateway</html>").await;

    let err = fixture
        .dispatcher()
        .fetch::<serde_json::Value>(ApiRequest::post("api/account/login"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Parse);
    assert_eq!(err.code, "-1");
    assert_eq!(err.message, "parse error");
}

#[tokio::test]
async fn non_2xx_status_is_unknown_and_not_retried() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", LOGIN_PATH)
        .with_status(502)
        .with_body("bad gateway")
        .expect(1)
        .create_async()
        .await;

    let config = fixture.config().retry(3).build().unwrap();
    let err = Dispatcher::configure(config)
        .unwrap()
        .fetch::<serde_json::Value>(ApiRequest::post("api/account/login"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unknown);
    assert_eq!(err.message, "unknown error");
    mock.assert_async().await;
}

#[tokio::test]
async fn refused_connection_is_network_error() {
    let config = ClientConfig::builder()
        .base_url("http://127.0.0.1:1")
        .connect_timeout(2)
        .build()
        .unwrap();
    let err = Dispatcher::configure(config)
        .unwrap()
        .fetch::<serde_json::Value>(ApiRequest::get("ping"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Network);
    assert_eq!(err.code, "-1");
    assert_eq!(err.message, "connection failed");
}

#[tokio::test]
async fn refused_connection_is_not_read_from_the_path() {
    let config = ClientConfig::builder()
        .base_url("http://127.0.0.1:1")
        .connect_timeout(2)
        .retry(2)
        .build()
        .unwrap();
    let dispatcher = Dispatcher::configure(config).unwrap();

    for path in ["ping", "api/certificate/status", "tls/handshake"] {
        let err = dispatcher
            .fetch::<serde_json::Value>(ApiRequest::get(path))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Network, "{}", path);
        assert_eq!(err.message, "connection failed", "{}", path);
    }
}
