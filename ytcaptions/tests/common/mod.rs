//! Minimal HTTP/1.1 stub for driving the pipeline without the real host.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::future::{self, BoxFuture};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use ytcaptions::TranscriptPanelReader;

#[derive(Clone)]
struct Route {
    method: String,
    /// Exact request target, or a prefix when it ends with `*`.
    target: String,
    status: u16,
    body: String,
    delay: Duration,
}

impl Route {
    fn matches(&self, method: &str, target: &str) -> bool {
        if self.method != method {
            return false;
        }
        match self.target.strip_suffix('*') {
            Some(prefix) => target.starts_with(prefix),
            None => target == self.target,
        }
    }
}

/// One request the stub received.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub target: String,
    pub body: String,
}

pub struct StubServer {
    addr: SocketAddr,
    routes: Arc<Mutex<Vec<Route>>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl StubServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let routes: Arc<Mutex<Vec<Route>>> = Arc::default();
        let requests: Arc<Mutex<Vec<Recorded>>> = Arc::default();

        let (r, q) = (routes.clone(), requests.clone());
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(serve(stream, r.clone(), q.clone()));
            }
        });

        Self {
            addr,
            routes,
            requests,
        }
    }

    /// `http://127.0.0.1:<port>`
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn route(&self, method: &str, target: &str, status: u16, body: impl Into<String>) {
        self.slow_route(method, target, status, body, Duration::ZERO);
    }

    pub fn slow_route(&self, method: &str, target: &str, status: u16, body: impl Into<String>, delay: Duration) {
        self.routes.lock().unwrap().push(Route {
            method: method.into(),
            target: target.into(),
            status,
            body: body.into(),
            delay,
        });
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    /// Targets of all GET requests, in arrival order.
    pub fn get_targets(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == "GET")
            .map(|r| r.target)
            .collect()
    }
}

async fn serve(mut stream: TcpStream, routes: Arc<Mutex<Vec<Route>>>, requests: Arc<Mutex<Vec<Recorded>>>) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.lines();
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let target = request_line.next().unwrap_or_default().to_string();
    let content_length = lines
        .filter_map(|l| l.split_once(':'))
        .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    let end = buf.len().min(header_end + content_length);
    let body = String::from_utf8_lossy(&buf[header_end..end]).into_owned();

    requests.lock().unwrap().push(Recorded {
        method: method.clone(),
        target: target.clone(),
        body,
    });

    let route = routes
        .lock()
        .unwrap()
        .iter()
        .find(|r| r.matches(&method, &target))
        .cloned();
    let (status, body, delay) = match route {
        Some(r) => (r.status, r.body, r.delay),
        None => (404, "not found".to_string(), Duration::ZERO),
    };

    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let response = format!(
        "HTTP/1.1 {status} STUB\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

/// Watch page markup carrying a player API key.
pub fn watch_page_html() -> String {
    r#"<!DOCTYPE html><html><head><script>ytcfg.set({"INNERTUBE_API_KEY":"TEST_KEY","INNERTUBE_CONTEXT_CLIENT_NAME":1});</script></head><body></body></html>"#.to_string()
}

/// A `/player` response advertising `tracks` as `(lang, kind, base_url)`.
pub fn player_response(tracks: &[(&str, &str, Option<String>)]) -> String {
    let tracks: Vec<serde_json::Value> = tracks
        .iter()
        .map(|(lang, kind, base_url)| {
            let mut t = serde_json::json!({ "languageCode": lang });
            if !kind.is_empty() {
                t["kind"] = serde_json::json!(kind);
            }
            if let Some(url) = base_url {
                t["baseUrl"] = serde_json::json!(url);
            }
            t
        })
        .collect();
    serde_json::json!({
        "playabilityStatus": { "status": "OK" },
        "captions": { "playerCaptionsTracklistRenderer": { "captionTracks": tracks } }
    })
    .to_string()
}

/// In-memory transcript panel.
#[derive(Default)]
pub struct FakePanel {
    pub menu: Vec<String>,
    pub segments: Vec<String>,
    /// Number of segment reads; shared so tests can inspect it after handing the panel over.
    pub reads: Arc<AtomicUsize>,
}

impl FakePanel {
    pub fn with_segments(segments: &[&str]) -> Self {
        Self {
            menu: vec!["Show transcript".into()],
            segments: segments.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

impl TranscriptPanelReader for FakePanel {
    fn click_menu_button(&self) -> BoxFuture<'_, ytcaptions::Result<()>> {
        Box::pin(future::ready(Ok(())))
    }

    fn menu_items(&self) -> BoxFuture<'_, ytcaptions::Result<Vec<String>>> {
        Box::pin(future::ready(Ok(self.menu.clone())))
    }

    fn click_menu_item(&self, _index: usize) -> BoxFuture<'_, ytcaptions::Result<()>> {
        Box::pin(future::ready(Ok(())))
    }

    fn segment_texts(&self) -> BoxFuture<'_, ytcaptions::Result<Vec<String>>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Box::pin(future::ready(Ok(self.segments.clone())))
    }
}
