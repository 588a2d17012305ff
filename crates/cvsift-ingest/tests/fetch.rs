//! [`HttpPageFetcher`] against a one-shot local HTTP server.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use cvsift_ingest::{BackendError, HttpPageFetcher, PageFetcher};

/// Serve exactly one response on an ephemeral port and return its URL.
fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = [0u8; 4096];
        let _ = stream.read(&mut buf);
        let response = format!(
            "{status_line}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).unwrap();
    });
    format!("http://{addr}/in/jane-doe")
}

fn fetcher() -> HttpPageFetcher {
    HttpPageFetcher::new(Duration::from_secs(5), "cvsift-test")
}

#[test]
fn success_returns_visible_text() {
    let url = serve_once(
        "HTTP/1.1 200 OK",
        "<html><body><h1>Jane Doe</h1><p>Staff Engineer</p></body></html>",
    );
    let text = fetcher().fetch_page(&url).unwrap();
    assert_eq!(text, "Jane Doe\nStaff Engineer");
}

#[test]
fn error_status_is_reported() {
    let url = serve_once("HTTP/1.1 404 Not Found", "");
    match fetcher().fetch_page(&url) {
        Err(BackendError::Status(code)) => assert_eq!(code, 404),
        other => panic!("expected a status error, got {other:?}"),
    }
}

#[test]
fn connection_failure_is_fetch_error() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let result = fetcher().fetch_page(&format!("http://{addr}/in/jane-doe"));
    assert!(matches!(result, Err(BackendError::Fetch(_))));
}
