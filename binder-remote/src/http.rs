//! Minimal JSON-over-HTTP client shared by the backends.
//!
//! `ureq` is blocking; each request runs on tokio's blocking pool so the
//! backends can expose awaitable operations. No timeout is set beyond the
//! transport defaults.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::RemoteError;

/// Characters left alone by JavaScript's `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, COMPONENT).to_string()
}

/// `url` with `apiKey=<key>` appended to its query string.
pub fn with_api_key(url: &str, key: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}apiKey={}", encode_component(key))
}

/// Status and raw body of a completed exchange, success or not.
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, RemoteError> {
        serde_json::from_str(&self.body).map_err(|e| RemoteError::MalformedPayload(e.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    agent: ureq::Agent,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
        }
    }

    /// Send one request. Non-2xx statuses come back as a reply; only
    /// transport failures are errors.
    pub async fn send<B>(
        &self,
        method: &'static str,
        url: String,
        body: Option<B>,
    ) -> Result<HttpReply, RemoteError>
    where
        B: Serialize + Send + 'static,
    {
        let agent = self.agent.clone();
        tracing::debug!("{method} {url}");
        tokio::task::spawn_blocking(move || send_blocking(&agent, method, &url, body))
            .await
            .map_err(|e| RemoteError::Network(format!("request task failed: {e}")))?
    }
}

fn send_blocking<B: Serialize>(
    agent: &ureq::Agent,
    method: &str,
    url: &str,
    body: Option<B>,
) -> Result<HttpReply, RemoteError> {
    let request = agent.request(method, url);
    let result = match body {
        Some(body) => request.send_json(body),
        None => request.call(),
    };
    match result {
        Ok(response) | Err(ureq::Error::Status(_, response)) => read_reply(response),
        Err(ureq::Error::Transport(transport)) => Err(RemoteError::Network(transport.to_string())),
    }
}

fn read_reply(response: ureq::Response) -> Result<HttpReply, RemoteError> {
    let status = response.status();
    let body = response
        .into_string()
        .map_err(|e| RemoteError::Network(e.to_string()))?;
    Ok(HttpReply { status, body })
}

/// Throwaway HTTP/1.1 responder for backend tests.
#[cfg(test)]
pub(crate) mod test_server {
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    #[derive(Debug, Clone)]
    pub struct Recorded {
        pub method: String,
        pub path: String,
        pub body: String,
    }

    /// Answer one connection per canned `(status, body)` reply, in order,
    /// reporting each request on the returned channel.
    pub fn serve(replies: Vec<(u16, &'static str)>) -> (String, mpsc::Receiver<Recorded>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let base = format!("http://{}", listener.local_addr().expect("addr"));
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            for (status, body) in replies {
                let Ok((stream, _)) = listener.accept() else {
                    return;
                };
                let mut reader = BufReader::new(stream);
                let mut request_line = String::new();
                reader.read_line(&mut request_line).expect("request line");
                let mut content_length = 0usize;
                loop {
                    let mut line = String::new();
                    reader.read_line(&mut line).expect("header line");
                    let line = line.trim_end();
                    if line.is_empty() {
                        break;
                    }
                    if let Some((name, value)) = line.split_once(':') {
                        if name.eq_ignore_ascii_case("content-length") {
                            content_length = value.trim().parse().unwrap_or(0);
                        }
                    }
                }
                let mut buf = vec![0u8; content_length];
                reader.read_exact(&mut buf).expect("request body");

                let mut parts = request_line.split_whitespace();
                let _ = tx.send(Recorded {
                    method: parts.next().unwrap_or_default().to_string(),
                    path: parts.next().unwrap_or_default().to_string(),
                    body: String::from_utf8_lossy(&buf).into_owned(),
                });

                let phrase = if (200..300).contains(&status) { "OK" } else { "Error" };
                let reply = format!(
                    "HTTP/1.1 {status} {phrase}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let mut stream = reader.into_inner();
                let _ = stream.write_all(reply.as_bytes());
            }
        });
        (base, rx)
    }

    /// An address nothing listens on.
    pub fn dead_address() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);
        format!("http://{addr}")
    }
}
