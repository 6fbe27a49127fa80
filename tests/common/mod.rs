#![allow(dead_code)]

use std::time::Duration;

use fraudgate::{DetectorError, ProbabilityModel};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Probability model that always returns the same value.
#[derive(Debug)]
pub struct FixedModel(pub f32);

impl ProbabilityModel for FixedModel {
    fn predict_probability(&self, _: &[f32; 5]) -> Result<f32, DetectorError> {
        Ok(self.0)
    }
}

/// Probability model that always fails.
#[derive(Debug)]
pub struct BrokenModel;

impl ProbabilityModel for BrokenModel {
    fn predict_probability(&self, _: &[f32; 5]) -> Result<f32, DetectorError> {
        Err(DetectorError::InferenceError("graph exploded".into()))
    }
}

/// A request as seen by [`serve_once`].
#[derive(Debug)]
pub struct Captured {
    pub head: String,
    pub body: String,
}

/// Serves exactly one HTTP response on a random local port.
///
/// Returns the base URL and a handle resolving to the captured request.
/// With `delay` set, the response is held back that long.
pub async fn serve_once(
    status: u16,
    content_type: &'static str,
    body: impl Into<String>,
    delay: Option<Duration>,
) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let body = body.into();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let captured = read_request(&mut socket).await;

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let response = format!(
            "HTTP/1.1 {} X\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            content_type,
            body.len(),
            body
        );
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
        captured
    });

    (format!("http://{}", addr), handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Captured {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break buf.len();
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.eq_ignore_ascii_case("content-length") {
                value.trim().parse::<usize>().ok()
            } else {
                None
            }
        })
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body = String::from_utf8_lossy(&buf[header_end..]).to_string();
    Captured { head, body }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// A `generateContent` response body carrying `text`.
pub fn gemini_body(text: &str) -> String {
    serde_json::json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }], "role": "model" },
            "finishReason": "STOP"
        }]
    })
    .to_string()
}
