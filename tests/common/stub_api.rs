//! Local HTTP/1.1 server standing in for the GitHub REST API.
//!
//! Shared by the integration tests and the client's unit tests.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

/// Canned response for `METHOD /path` (query ignored).
///
/// Several routes with the same key are served in order; the last one repeats.
pub struct Route {
    pub key: String,
    pub status: u16,
    pub body: String,
}

impl Route {
    pub fn new(key: &str, status: u16, body: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            status,
            body: body.into(),
        }
    }
}

/// One request as the server saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    /// Request line, e.g. `GET /repos/o/r/pulls/1?page=1 HTTP/1.1`.
    pub line: String,
    /// Header names lowercased.
    pub headers: Vec<(String, String)>,
    #[allow(dead_code)]
    pub body: String,
}

impl Recorded {
    #[allow(dead_code)]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

pub struct StubApi {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl StubApi {
    pub fn start(mut routes: Vec<Route>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub api");
        let base_url = format!("http://{}", listener.local_addr().expect("local addr"));
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else {
                    continue;
                };
                let Some(recorded) = read_request(&stream) else {
                    continue;
                };
                let (status, body) = next_response(&mut routes, &route_key(&recorded.line));
                seen.lock().expect("lock requests").push(recorded);
                let _ = write!(
                    stream,
                    "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
            }
        });
        Self { base_url, requests }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().expect("lock requests").clone()
    }
}

/// A base URL nothing listens on.
#[allow(dead_code)]
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let url = format!("http://{}", listener.local_addr().expect("local addr"));
    drop(listener);
    url
}

fn next_response(routes: &mut Vec<Route>, key: &str) -> (u16, String) {
    let matching: Vec<usize> = routes
        .iter()
        .enumerate()
        .filter(|(_, route)| route.key == key)
        .map(|(index, _)| index)
        .collect();
    match matching.as_slice() {
        [] => (404, r#"{"message":"Not Found"}"#.to_string()),
        [only] => (routes[*only].status, routes[*only].body.clone()),
        [first, ..] => {
            let route = routes.remove(*first);
            (route.status, route.body)
        }
    }
}

fn route_key(line: &str) -> String {
    let mut parts = line.split_whitespace();
    let method = parts.next().unwrap_or_default();
    let path = parts
        .next()
        .unwrap_or_default()
        .split('?')
        .next()
        .unwrap_or_default();
    format!("{method} {path}")
}

fn read_request(stream: &TcpStream) -> Option<Recorded> {
    let mut reader = BufReader::new(stream.try_clone().ok()?);
    let mut line = String::new();
    reader.read_line(&mut line).ok()?;
    let mut headers = Vec::new();
    let mut content_length = 0;
    loop {
        let mut header = String::new();
        reader.read_line(&mut header).ok()?;
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            let name = name.trim().to_ascii_lowercase();
            let value = value.trim().to_string();
            if name == "content-length" {
                content_length = value.parse().unwrap_or(0);
            }
            headers.push((name, value));
        }
    }
    let mut body = vec![0; content_length];
    reader.read_exact(&mut body).ok()?;
    Some(Recorded {
        line: line.trim_end().to_string(),
        headers,
        body: String::from_utf8_lossy(&body).to_string(),
    })
}
