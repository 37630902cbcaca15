//! Shared integration test helpers for geolens.
//!
//! Include this module at the top of each test file that needs it:
//!
//! ```ignore
//! mod common;
//! use common::StubService;
//! ```
//!
//! Note: Rust integration tests use `mod common;` (not `use`) to bring in
//! helpers from `tests/common/mod.rs`. The `#[allow(dead_code)]` attributes
//! suppress warnings when only a subset of helpers are used per file.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::JoinHandle;

/// A loopback HTTP server answering a fixed number of requests with one
/// canned response, for exercising the lookup round-trip without a real
/// service.
pub struct StubService {
    endpoint: String,
    handle: Option<JoinHandle<()>>,
}

impl StubService {
    /// Serve `body` with a `200 OK` status to exactly `requests` requests.
    pub fn json(body: &str, requests: usize) -> Self {
        Self::respond(200, "application/json", body, requests)
    }

    /// Serve an error status with a small plain-text body.
    pub fn failure(status: u16, requests: usize) -> Self {
        Self::respond(status, "text/plain", "lookup failed", requests)
    }

    fn respond(status: u16, content_type: &str, body: &str, requests: usize) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind stub listener");
        let endpoint = format!("http://{}", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {} X\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            content_type,
            body.len(),
            body
        );

        let handle = std::thread::spawn(move || {
            for _ in 0..requests {
                let Ok((mut stream, _)) = listener.accept() else {
                    return;
                };
                // Drain the request head before answering.
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(response.as_bytes());
            }
        });

        Self {
            endpoint,
            handle: Some(handle),
        }
    }

    /// Base URL of the stub, e.g. `http://127.0.0.1:49152`.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Wait for the stub to finish serving its request budget.
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
