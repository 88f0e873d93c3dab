mod common;

use std::sync::Arc;
use std::time::Duration;

use bleed_backend::client::{
    FALLBACK_ERROR_MESSAGE, RequestError, RequestOptions, RetryPolicy, RetryingClient,
};
use common::{RecordingNotifier, ScriptedTransport, json_response, network_error, retrying_client};
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde_json::{Value, json};
use tokio::time::Instant;

const URL: &str = "http://directory.local/donors/search";

fn assert_elapsed(start: Instant, expected: Duration) {
    let elapsed = start.elapsed();
    assert!(
        elapsed >= expected && elapsed < expected + Duration::from_millis(50),
        "elapsed {:?}, expected {:?}",
        elapsed,
        expected
    );
}

#[tokio::test(start_paused = true)]
async fn client_error_fails_fast() {
    let transport = ScriptedTransport::new(vec![json_response(404, json!({"message": "not found"}))]);
    let notifier = Arc::new(RecordingNotifier::default());
    let client = retrying_client(transport.clone(), notifier.clone());

    let start = Instant::now();
    let err = client
        .request::<Value>(URL, RequestOptions::get())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "not found");
    assert!(!err.is_retryable());
    assert_eq!(transport.calls(), 1);
    assert!(notifier.events().is_empty());
    assert_elapsed(start, Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn recovers_after_two_network_failures() {
    let transport = ScriptedTransport::new(vec![
        network_error(),
        network_error(),
        json_response(200, json!({"donors": [], "total": 0})),
    ]);
    let notifier = Arc::new(RecordingNotifier::default());
    let client = retrying_client(transport.clone(), notifier.clone());

    let start = Instant::now();
    let data: Value = client.request(URL, RequestOptions::get()).await.unwrap();

    assert_eq!(data, json!({"donors": [], "total": 0}));
    assert_eq!(transport.calls(), 3);
    assert_eq!(
        notifier.events(),
        vec![(1, Duration::from_millis(1000)), (2, Duration::from_millis(2000))]
    );
    assert_elapsed(start, Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn server_errors_exhaust_attempts_without_trailing_delay() {
    let transport = ScriptedTransport::new(vec![
        json_response(503, json!({"message": "warming up"})),
        json_response(503, json!({"message": "still warming up"})),
        json_response(503, json!({"message": "unavailable"})),
    ]);
    let notifier = Arc::new(RecordingNotifier::default());
    let client = retrying_client(transport.clone(), notifier.clone());

    let start = Instant::now();
    let err = client
        .request::<Value>(URL, RequestOptions::get())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert_eq!(err.to_string(), "unavailable");
    assert_eq!(transport.calls(), 3);
    assert_eq!(notifier.events().len(), 2);
    assert_elapsed(start, Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn error_without_message_uses_fallback() {
    let transport = ScriptedTransport::new(vec![Ok(bleed_backend::client::HttpResponse {
        status: 422,
        body: b"<html>bad</html>".to_vec(),
    })]);
    let client = retrying_client(transport, Arc::new(RecordingNotifier::default()));

    let err = client
        .request::<Value>(URL, RequestOptions::get())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), FALLBACK_ERROR_MESSAGE);
}

#[tokio::test(start_paused = true)]
async fn malformed_request_is_still_retried() {
    let transport = ScriptedTransport::new(vec![
        Err(RequestError::InvalidRequest("relative URL without a base".to_string())),
        Err(RequestError::InvalidRequest("relative URL without a base".to_string())),
        Err(RequestError::InvalidRequest("relative URL without a base".to_string())),
    ]);
    let notifier = Arc::new(RecordingNotifier::default());
    let client = retrying_client(transport.clone(), notifier.clone());

    let err = client
        .request::<Value>("not a url", RequestOptions::get())
        .await
        .unwrap_err();

    assert!(matches!(err, RequestError::InvalidRequest(_)));
    assert_eq!(transport.calls(), 3);
    assert_eq!(notifier.events().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn malformed_success_body_is_retried() {
    let transport = ScriptedTransport::new(vec![
        Ok(bleed_backend::client::HttpResponse {
            status: 200,
            body: b"{truncated".to_vec(),
        }),
        json_response(200, json!({"ok": true})),
    ]);
    let client = retrying_client(transport.clone(), Arc::new(RecordingNotifier::default()));

    let data: Value = client.request(URL, RequestOptions::get()).await.unwrap();

    assert_eq!(data, json!({"ok": true}));
    assert_eq!(transport.calls(), 2);
}

#[tokio::test]
async fn json_content_type_is_default_and_overridable() {
    let transport = ScriptedTransport::new(vec![
        json_response(200, json!({})),
        json_response(200, json!({})),
    ]);
    let client = retrying_client(transport.clone(), Arc::new(RecordingNotifier::default()));

    let _: Value = client
        .request(URL, RequestOptions::post(json!({"bloodType": "A+"})))
        .await
        .unwrap();
    let _: Value = client
        .request(
            URL,
            RequestOptions::get().header(CONTENT_TYPE, HeaderValue::from_static("text/plain")),
        )
        .await
        .unwrap();

    let requests = transport.requests();
    assert_eq!(requests[0].headers[CONTENT_TYPE], "application/json");
    assert_eq!(requests[0].method, reqwest::Method::POST);
    assert_eq!(requests[0].body, Some(json!({"bloodType": "A+"})));
    assert_eq!(requests[1].headers[CONTENT_TYPE], "text/plain");
    assert_eq!(requests[1].headers.get_all(CONTENT_TYPE).iter().count(), 1);
}

#[tokio::test(start_paused = true)]
async fn custom_policy_bounds_attempts() {
    let transport = ScriptedTransport::new(vec![network_error(), network_error()]);
    let notifier = Arc::new(RecordingNotifier::default());
    let client = RetryingClient::new(transport.clone())
        .with_policy(RetryPolicy::new(2, Duration::from_millis(250)))
        .with_notifier(notifier.clone());

    let start = Instant::now();
    let err = client
        .request::<Value>(URL, RequestOptions::get())
        .await
        .unwrap_err();

    assert!(matches!(err, RequestError::Network(_)));
    assert_eq!(transport.calls(), 2);
    assert_eq!(notifier.events(), vec![(1, Duration::from_millis(250))]);
    assert_elapsed(start, Duration::from_millis(250));
}

#[test]
fn backoff_is_linear() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.delay_for(0), Duration::from_secs(1));
    assert_eq!(policy.delay_for(1), Duration::from_secs(2));
    assert_eq!(policy.delay_for(2), Duration::from_secs(3));
}

#[test]
fn only_client_errors_skip_retry() {
    let http = |status| RequestError::Http {
        status,
        message: String::new(),
    };
    assert!(!http(400).is_retryable());
    assert!(!http(499).is_retryable());
    assert!(http(500).is_retryable());
    assert!(http(399).is_retryable());
    assert!(RequestError::Network("reset".to_string()).is_retryable());
    assert!(RequestError::Decode("eof".to_string()).is_retryable());
}
