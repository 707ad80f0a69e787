use interhook::testing::{MockRequest, test_key};
use interhook::{GateError, Handled, ServerError};

mod common;
use common::{ENDPOINT, empty_server, sink};

const PING: &[u8] = br#"{"type":1}"#;

#[tokio::test]
async fn ping_is_echoed() {
    let (key, _) = test_key();
    let server = empty_server();
    let sink = sink();

    let handled = server
        .handle(MockRequest::signed(ENDPOINT, PING, &key), sink.clone())
        .await
        .unwrap();

    assert_eq!(handled, Handled::Pong);
    let response = sink.response().unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.header("content-type"), Some("application/json"));
    assert_eq!(response.json().unwrap(), serde_json::json!({"type": 1}));
}

#[tokio::test]
async fn get_is_a_liveness_check_on_any_path() {
    let server = empty_server();
    let sink = sink();

    let handled = server
        .handle(MockRequest::get("/anything/else"), sink.clone())
        .await
        .unwrap();

    assert_eq!(handled, Handled::Rejected(200));
    let response = sink.response().unwrap();
    assert_eq!(response.body.as_deref(), Some(&b"Server is alive!"[..]));
}

#[tokio::test]
async fn other_methods_are_not_allowed() {
    let server = empty_server();
    let sink = sink();

    server
        .handle(MockRequest::new("PUT", ENDPOINT), sink.clone())
        .await
        .unwrap();

    let response = sink.response().unwrap();
    assert_eq!(response.status, 405);
    assert_eq!(response.header("allow"), Some("POST"));
    assert_eq!(response.body, None);
}

#[tokio::test]
async fn wrong_path_is_bad_endpoint() {
    let (key, _) = test_key();
    let server = empty_server();

    for target in ["/other", "/interactions?x=1", "/interactions/"] {
        let sink = sink();
        let handled = server
            .handle(MockRequest::signed(target, PING, &key), sink.clone())
            .await
            .unwrap();

        assert_eq!(handled, Handled::Rejected(404), "target {target}");
        let response = sink.response().unwrap();
        assert_eq!(response.header("content-type"), Some("text/plain"));
        assert_eq!(response.body.as_deref(), Some(&b"Bad Endpoint"[..]));
    }
}

#[tokio::test]
async fn non_json_content_type_is_unsupported() {
    let (key, _) = test_key();
    let server = empty_server();

    for content_type in ["text/plain", "application/json; charset=utf-8"] {
        let sink = sink();
        let request =
            MockRequest::signed(ENDPOINT, PING, &key).header("content-type", content_type);
        let handled = server.handle(request, sink.clone()).await.unwrap();
        assert_eq!(handled, Handled::Rejected(415));
    }
}

#[tokio::test]
async fn missing_signature_headers_are_unauthorized() {
    let (key, _) = test_key();
    let server = empty_server();

    for header in ["x-signature-ed25519", "x-signature-timestamp"] {
        let sink = sink();
        let request = MockRequest::signed(ENDPOINT, PING, &key).without_header(header);
        let handled = server.handle(request, sink.clone()).await.unwrap();

        assert_eq!(handled, Handled::Rejected(401));
        assert_eq!(sink.response().unwrap().body, None);
    }
}

#[tokio::test]
async fn tampered_body_is_unauthorized() {
    let (key, _) = test_key();
    let server = empty_server();
    let sink = sink();

    let request = MockRequest::signed(ENDPOINT, PING, &key).body(&br#"{"type":2}"#[..]);
    let handled = server.handle(request, sink.clone()).await.unwrap();

    assert_eq!(handled, Handled::Rejected(401));
    assert_eq!(sink.write_attempts(), 1);
}

#[tokio::test]
async fn foreign_key_is_unauthorized() {
    let other = ed25519_dalek::SigningKey::from_bytes(&[9u8; 32]);
    let server = empty_server();
    let sink = sink();

    let handled = server
        .handle(MockRequest::signed(ENDPOINT, PING, &other), sink.clone())
        .await
        .unwrap();

    assert_eq!(handled, Handled::Rejected(401));
}

#[tokio::test]
async fn malformed_json_propagates() {
    let (key, _) = test_key();
    let server = empty_server();
    let sink = sink();

    let err = server
        .handle(MockRequest::signed(ENDPOINT, &b"{not json"[..], &key), sink.clone())
        .await
        .unwrap_err();

    assert!(matches!(err, ServerError::Gate(GateError::Payload(_))));
    assert!(sink.response().is_none());
}

#[tokio::test]
async fn body_failure_propagates() {
    let (key, _) = test_key();
    let server = empty_server();
    let sink = sink();

    let request = MockRequest::signed(ENDPOINT, PING, &key).failing_body("connection reset");
    let err = server.handle(request, sink.clone()).await.unwrap_err();

    assert!(matches!(err, ServerError::Gate(GateError::Body(_))));
    assert!(err.to_string().contains("connection reset"));
    assert!(sink.response().is_none());
}

#[tokio::test]
async fn oversized_body_is_rejected_before_verification() {
    let server = empty_server();
    let sink = sink();

    let request = MockRequest::post(ENDPOINT, vec![b' '; 64]).body_limit(16);
    let handled = server.handle(request, sink.clone()).await.unwrap();

    assert_eq!(handled, Handled::Rejected(413));
    let response = sink.response().unwrap();
    assert_eq!(response.status, 413);
    assert!(response.body.is_none());
}

#[tokio::test]
async fn verified_command_without_data_is_payload_corruption() {
    let (key, _) = test_key();
    let server = empty_server();
    let sink = sink();

    let err = server
        .handle(MockRequest::signed(ENDPOINT, &br#"{"type":2}"#[..], &key), sink.clone())
        .await
        .unwrap_err();

    assert!(matches!(err, ServerError::Gate(GateError::Payload(_))));
    assert!(sink.response().is_none());
}
