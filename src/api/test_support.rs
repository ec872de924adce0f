//! In-process HTTP server for exercising the API clients in tests.

use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use super::credentials::TokenStore;
use super::http::ApiClient;
use crate::config::ClientConfig;

/// Answer `count` connections with `handler(raw_request)`, one at a time.
///
/// Returns the base URL and a handle resolving to the raw requests seen.
pub async fn serve<H>(count: usize, handler: H) -> (String, JoinHandle<Vec<String>>)
where
    H: Fn(&str) -> (u16, String) + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let mut requests = Vec::with_capacity(count);
        for _ in 0..count {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let (status, body) = handler(&request);
            let response = format!(
                "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            requests.push(request);
        }
        requests
    });

    (format!("http://{}", addr), handle)
}

pub fn client_for(base_url: &str, tokens: Arc<dyn TokenStore>) -> ApiClient {
    let config = ClientConfig {
        request_timeout: Duration::from_secs(5),
        ..ClientConfig::default()
    }
    .with_base_url(base_url);
    ApiClient::new(&config, tokens).unwrap()
}

/// First line of a raw request, e.g. `GET /trades?status=open HTTP/1.1`.
pub fn request_line(request: &str) -> &str {
    request.lines().next().unwrap_or_default()
}

/// Body of a raw request (everything after the blank line).
pub fn request_body(request: &str) -> &str {
    request.split_once("\r\n\r\n").map(|(_, b)| b).unwrap_or_default()
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(end) = find(&buf, b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let body = &buf[end + 4..];
            if head.contains("transfer-encoding: chunked") {
                if find(body, b"0\r\n\r\n").is_some() {
                    break;
                }
            } else if body.len() >= content_length(&head) {
                break;
            }
        }
    }

    String::from_utf8_lossy(&buf).to_string()
}

fn content_length(head: &str) -> usize {
    head.lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
