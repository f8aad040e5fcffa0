//! HttpClient against a local mock backend: URL building, headers, status mapping.

mod common;

use common::mock_backend::{MockBackend, MockResponse};
use resource_slice::{HttpClient, HttpConfig, Method, RemoteClient, RemoteRequest, SliceError};
use serde_json::json;
use std::time::Duration;

fn client_for(backend: &MockBackend) -> HttpClient {
    HttpClient::new(HttpConfig {
        base_url: backend.base_url(),
        timeout: Duration::from_millis(500),
        connect_timeout: Duration::from_millis(500),
        bearer_token: Some("secret-token".to_string()),
    })
    .unwrap()
}

#[tokio::test]
async fn test_get_sends_query_and_bearer() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::json(r#"{"data":[],"pageNumber":1,"pageSize":20,"totalPages":0,"totalResults":0}"#))
        .await;
    let client = client_for(&backend);

    let request = RemoteRequest::new(Method::Get, "/charges").with_params(vec![
        ("status".to_string(), "open".to_string()),
        ("pageNumber".to_string(), "1".to_string()),
        ("pageSize".to_string(), "20".to_string()),
    ]);
    let body = client.request(request).await.unwrap();
    assert_eq!(body["totalResults"], 0);

    let captured = backend.captured_requests().await;
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].method, "GET");
    assert_eq!(captured[0].path, "/api/charges");
    assert_eq!(
        captured[0].query.as_deref(),
        Some("status=open&pageNumber=1&pageSize=20")
    );
    assert_eq!(captured[0].header("authorization"), Some("Bearer secret-token"));
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::json(r#"{"id":9,"customerId":4,"status":"open","amount":10.5}"#))
        .await;
    let client = client_for(&backend);

    let request = RemoteRequest::new(Method::Post, "/charges")
        .with_body(json!({"customerId": 4, "amount": 10.5}));
    let body = client.request(request).await.unwrap();
    assert_eq!(body["id"], 9);

    let captured = backend.captured_requests().await;
    assert_eq!(captured[0].method, "POST");
    assert_eq!(captured[0].json(), json!({"customerId": 4, "amount": 10.5}));
    assert_eq!(captured[0].header("content-type"), Some("application/json"));
}

#[tokio::test]
async fn test_empty_success_body_is_null() {
    let backend = MockBackend::start().await;
    backend.enqueue_response(MockResponse::empty(204)).await;
    let client = client_for(&backend);

    let body = client
        .request(RemoteRequest::new(Method::Delete, "/charges/3"))
        .await
        .unwrap();
    assert!(body.is_null());
    assert_eq!(backend.captured_requests().await[0].method, "DELETE");
}

#[tokio::test]
async fn test_error_status_becomes_domain_error() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::error(
            422,
            r#"{"message":"Amount exceeds balance","code":"OVERPAYMENT"}"#,
        ))
        .await;
    let client = client_for(&backend);

    let err = client
        .request(RemoteRequest::new(Method::Post, "/charges/3/payments"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        SliceError::Domain {
            status: 422,
            message: "Amount exceeds balance".to_string(),
            code: Some("OVERPAYMENT".to_string()),
        }
    );
}

#[tokio::test]
async fn test_malformed_success_body_is_decode_error() {
    let backend = MockBackend::start().await;
    backend.enqueue_response(MockResponse::json("{not json")).await;
    let client = client_for(&backend);

    let err = client
        .request(RemoteRequest::new(Method::Get, "/charges/1"))
        .await
        .unwrap_err();
    assert!(matches!(err, SliceError::Decode(_)));
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::json("{}").with_delay(2_000))
        .await;
    let client = client_for(&backend);

    let err = client
        .request(RemoteRequest::new(Method::Get, "/charges"))
        .await
        .unwrap_err();
    assert_eq!(err, SliceError::Timeout);
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    let client = HttpClient::new(HttpConfig {
        base_url: "http://127.0.0.1:1/api".to_string(),
        timeout: Duration::from_millis(500),
        connect_timeout: Duration::from_millis(200),
        bearer_token: None,
    })
    .unwrap();

    let err = client
        .request(RemoteRequest::new(Method::Get, "/charges"))
        .await
        .unwrap_err();
    assert!(matches!(err, SliceError::Transport(_) | SliceError::Timeout));
}
