//! Integration tests for the reply pipeline against a local upstream stub.

use std::time::Duration;

use convdebate_core::{AgentConfig, ConversationManager, RestConversationManager};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Spawn a one-shot HTTP upstream that answers the first request with the
/// given status line and body, and hands back the raw request it saw.
async fn spawn_upstream(
    status_line: &'static str,
    body: &'static str,
) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();

        let mut raw = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&chunk[..n]);
            if request_complete(&raw) {
                break;
            }
        }

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.ok();

        let _ = tx.send(String::from_utf8_lossy(&raw).into_owned());
    });

    (format!("http://{}", addr), rx)
}

/// True once the buffered request contains its full body per Content-Length.
fn request_complete(raw: &[u8]) -> bool {
    let text = String::from_utf8_lossy(raw);
    let Some(split) = text.find("\r\n\r\n") else {
        return false;
    };
    let content_length = text[..split]
        .lines()
        .find_map(|line| {
            let lower = line.to_ascii_lowercase();
            lower
                .strip_prefix("content-length:")
                .and_then(|v| v.trim().parse::<usize>().ok())
        })
        .unwrap_or(0);

    raw.len() - (split + 4) >= content_length
}

fn manager_for(base: &str) -> RestConversationManager {
    let config = AgentConfig::new("test-key", "agent_test")
        .with_api_base(base)
        .with_timeout(Duration::from_secs(5));
    RestConversationManager::new(config).unwrap()
}

#[tokio::test]
async fn returns_last_agent_message_from_simulation() {
    let (base, request_rx) = spawn_upstream(
        "200 OK",
        r#"{"simulated_conversation":[{"role":"user","message":"AI reduces diagnostic error rates."},{"role":"agent","message":"I disagree because..."}]}"#,
    )
    .await;

    let manager = manager_for(&base);
    let reply = manager
        .get_response("AI reduces diagnostic error rates.")
        .await;

    assert_eq!(reply, "I disagree because...");

    let raw_request = request_rx.await.unwrap();
    let (headers, body) = raw_request.split_once("\r\n\r\n").unwrap();

    // Exact wire body, credential header, and endpoint path.
    assert_eq!(
        body,
        r#"{"simulation_specification":{"simulated_user_config":{"language":"en","first_message":"AI reduces diagnostic error rates."}}}"#
    );
    assert!(headers.to_ascii_lowercase().contains("xi-api-key: test-key"));
    assert!(headers.starts_with("POST /v1/convai/agents/agent_test/simulate-conversation"));
}

#[tokio::test]
async fn upstream_error_status_yields_empty_reply() {
    let (base, _rx) = spawn_upstream("500 Internal Server Error", r#"{"detail":"boom"}"#).await;

    let manager = manager_for(&base);
    assert_eq!(manager.get_response("Opening statement.").await, "");
}

#[tokio::test]
async fn non_json_body_yields_empty_reply() {
    let (base, _rx) = spawn_upstream("200 OK", "<html>gateway timeout</html>").await;

    let manager = manager_for(&base);
    assert_eq!(manager.get_response("Opening statement.").await, "");
}

#[tokio::test]
async fn empty_conversation_yields_empty_reply() {
    let (base, _rx) = spawn_upstream("200 OK", r#"{"simulated_conversation":[]}"#).await;

    let manager = manager_for(&base);
    assert_eq!(manager.get_response("Opening statement.").await, "");
}

#[tokio::test]
async fn connection_failure_yields_empty_reply() {
    // Bind and immediately drop the listener so the port refuses connections.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let manager = manager_for(&base);
    assert_eq!(manager.get_response("Opening statement.").await, "");
}
