#![allow(clippy::unwrap_used)]

use std::time::Duration;

use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use trends_explorer::api::{ApiRequest, HttpTransport, Transport};
use trends_explorer::domain::Operation;
use trends_explorer::error::ErrorKind;
use trends_explorer::TrendsError;

/// Serve one canned HTTP response and report the request head.
async fn serve_once(
    status_line: &'static str,
    body: String,
    delay: Duration,
) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/api/trends", listener.local_addr().unwrap());
    let (head_tx, head_rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut received = Vec::new();
        let mut buffer = [0_u8; 1024];
        while !received.windows(4).any(|window| window == b"\r\n\r\n") {
            let read = socket.read(&mut buffer).await.unwrap();
            if read == 0 {
                break;
            }
            received.extend_from_slice(&buffer[..read]);
        }
        let _ = head_tx.send(String::from_utf8_lossy(&received).to_string());

        tokio::time::sleep(delay).await;
        let response = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    });

    (base_url, head_rx)
}

#[tokio::test]
async fn success_body_is_decoded() {
    let body = json!({"status": "healthy", "service": "trends"}).to_string();
    let (base_url, head) = serve_once("200 OK", body, Duration::ZERO).await;
    let transport = HttpTransport::new(base_url, Duration::from_secs(5)).unwrap();

    let value = transport
        .send(ApiRequest::get(Operation::Health))
        .await
        .unwrap();
    assert_eq!(value["status"], "healthy");

    let head = head.await.unwrap();
    assert!(head.starts_with("GET /api/trends/health"));
}

#[tokio::test]
async fn backend_error_message_is_surfaced() {
    let body = json!({"error": "Failed to fetch trends data"}).to_string();
    let (base_url, _head) = serve_once("500 Internal Server Error", body, Duration::ZERO).await;
    let transport = HttpTransport::new(base_url, Duration::from_secs(5)).unwrap();

    let request = ApiRequest::get(Operation::Search)
        .with_query(vec![("keyword".to_string(), "ai".to_string())]);
    let err = transport.send(request).await.unwrap_err();

    assert_eq!(
        err,
        TrendsError::Transport {
            operation: Operation::Search,
            status: Some(500),
            message: "Failed to fetch trends data".to_string(),
        }
    );
}

#[tokio::test]
async fn invalid_json_is_a_data_integrity_error() {
    let (base_url, _head) =
        serve_once("200 OK", "not json".to_string(), Duration::ZERO).await;
    let transport = HttpTransport::new(base_url, Duration::from_secs(5)).unwrap();

    let err = transport
        .send(ApiRequest::get(Operation::Countries))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DataIntegrity);
}

#[tokio::test]
async fn slow_backend_times_out() {
    let (base_url, _head) =
        serve_once("200 OK", "{}".to_string(), Duration::from_secs(3)).await;
    let transport = HttpTransport::new(base_url, Duration::from_millis(200)).unwrap();

    let err = transport
        .send(ApiRequest::get(Operation::Trending))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert!(err.is_retryable());
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let transport = HttpTransport::new(base_url, Duration::from_secs(2)).unwrap();
    let err = transport
        .send(ApiRequest::get(Operation::Health))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        TrendsError::Transport { status: None, .. }
    ));
}
