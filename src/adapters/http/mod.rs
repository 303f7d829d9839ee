//! HTTP adapter: Implementation of PredictionTransport using ureq.
//!
//! Blocking client; it runs on the prediction worker thread, never on the UI
//! thread.

use std::time::Duration;

use crate::ports::{PredictionTransport, TransportResponse};

/// Error type when no HTTP response could be obtained.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Failed to read response body: {0}")]
    Body(#[from] std::io::Error),
}

/// ureq-backed transport for one endpoint.
pub struct UreqTransport {
    agent: ureq::Agent,
    endpoint: String,
}

impl UreqTransport {
    /// Create a transport with an overall request timeout.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            endpoint: endpoint.into(),
        }
    }
}

impl PredictionTransport for UreqTransport {
    type Error = TransportError;

    fn post_json(&self, body: &str) -> Result<TransportResponse, Self::Error> {
        let result = self
            .agent
            .post(&self.endpoint)
            .set("Content-Type", "application/json")
            .set("X-Requested-With", "XMLHttpRequest")
            .send_string(body);

        // ureq reports 4xx/5xx as `Error::Status`; both arms are responses here
        let response = match result {
            Ok(resp) => resp,
            Err(ureq::Error::Status(_, resp)) => resp,
            Err(ureq::Error::Transport(t)) => return Err(TransportError::Request(t.to_string())),
        };

        let status = response.status();
        let body = response.into_string()?;
        tracing::debug!(status, bytes = body.len(), "Prediction endpoint responded");
        Ok(TransportResponse::new(status, body))
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    /// Serve exactly one HTTP exchange with a canned response.
    ///
    /// Returns the endpoint URL and a receiver for the raw request
    /// (head, body).
    pub(crate) fn one_shot_server(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, mpsc::Receiver<(String, String)>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Should bind");
        let addr = listener.local_addr().expect("Should have addr");
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let (stream, _) = listener.accept().expect("Should accept");
            let mut reader = BufReader::new(stream.try_clone().expect("Should clone stream"));

            let mut head = String::new();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).expect("Should read line") == 0 {
                    break;
                }
                if let Some(v) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                    content_length = v.trim().parse().unwrap_or(0);
                }
                let end = line == "\r\n";
                head.push_str(&line);
                if end {
                    break;
                }
            }

            let mut request_body = vec![0u8; content_length];
            reader.read_exact(&mut request_body).expect("Should read body");

            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let mut stream = stream;
            stream.write_all(response.as_bytes()).expect("Should write");
            stream.flush().expect("Should flush");

            let _ = tx.send((head, String::from_utf8_lossy(&request_body).to_string()));
        });

        (format!("http://{addr}/api/predict"), rx)
    }

    #[test]
    fn test_posts_json_with_headers() {
        let (url, rx) = one_shot_server("200 OK", r#"{"ok":true}"#);
        let transport = UreqTransport::new(url, Duration::from_secs(5));

        let response = transport.post_json(r#"{"features":{}}"#).expect("Should respond");
        assert_eq!(response, TransportResponse::new(200, r#"{"ok":true}"#));

        let (head, body) = rx.recv().expect("Should capture request");
        let head = head.to_ascii_lowercase();
        assert!(head.starts_with("post /api/predict "));
        assert!(head.contains("content-type: application/json"));
        assert!(head.contains("x-requested-with: xmlhttprequest"));
        assert_eq!(body, r#"{"features":{}}"#);
    }

    #[test]
    fn test_error_status_is_a_response() {
        let (url, _rx) = one_shot_server("500 Internal Server Error", r#"{"error":"boom"}"#);
        let transport = UreqTransport::new(url, Duration::from_secs(5));

        let response = transport.post_json("{}").expect("Should respond");
        assert_eq!(response.status, 500);
        assert!(!response.is_success());
        assert_eq!(response.body, r#"{"error":"boom"}"#);
    }

    #[test]
    fn test_refused_connection_is_a_transport_error() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").expect("Should bind");
            listener.local_addr().expect("Should have addr").port()
        };
        let transport = UreqTransport::new(
            format!("http://127.0.0.1:{port}/api/predict"),
            Duration::from_secs(5),
        );

        let err = transport.post_json("{}").unwrap_err();
        assert!(matches!(err, TransportError::Request(_)));
    }
}
