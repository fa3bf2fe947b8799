//! Access log events emitted by the MCP route
//!
//! Captures JSON log output from a thread-local subscriber while requests are
//! driven through the full route table, then checks the structured fields.

use google_search_agent::http;
use google_search_agent::protocol::McpServer;
use google_search_agent::tools::ToolSystem;
use serde_json::{json, Value};
use std::io;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;

const ACCESS_TARGET: &str = "google_search_agent::access";

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

impl CapturedLogs {
    /// `fields` object of every access log event, in emission order
    fn access_events(&self) -> Vec<Value> {
        let raw = self.0.lock().unwrap().clone();
        String::from_utf8(raw)
            .unwrap()
            .lines()
            .filter_map(|line| serde_json::from_str::<Value>(line).ok())
            .filter(|event| event["target"] == ACCESS_TARGET)
            .map(|event| event["fields"].clone())
            .collect()
    }
}

fn capture() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().json().with_writer(logs.clone()));
    let guard = tracing::subscriber::set_default(subscriber);
    (logs, guard)
}

fn test_server() -> Arc<McpServer> {
    Arc::new(McpServer::new("google-search-agent", "0.3.0", ToolSystem::new()))
}

#[tokio::test]
async fn test_request_without_explicit_status_logs_200() {
    let (logs, _guard) = capture();
    let routes = http::routes(test_server());

    let response = warp::test::request()
        .method("POST")
        .path("/")
        .body(json!({"jsonrpc": "2.0", "id": 1, "method": "ping"}).to_string())
        .reply(&routes)
        .await;
    assert_eq!(response.status(), 200);

    let events = logs.access_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["status"], 200);
    assert_eq!(events[0]["method"], "POST");
    assert_eq!(events[0]["path"], "/");
    assert!(events[0].get("session").is_none());
}

#[tokio::test]
async fn test_session_header_is_logged_as_suffix() {
    let (logs, _guard) = capture();
    let routes = http::routes(test_server());

    warp::test::request()
        .method("POST")
        .path("/")
        .header("mcp-session-id", "mcp-session-1234567890abcdef")
        .body(json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}).to_string())
        .reply(&routes)
        .await;

    let events = logs.access_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["session"], "abcdef");
    assert!(events[0]["message"]
        .as_str()
        .unwrap()
        .contains("[session: ...abcdef]"));
}

#[tokio::test]
async fn test_notification_logs_final_202() {
    let (logs, _guard) = capture();
    let routes = http::routes(test_server());

    warp::test::request()
        .method("POST")
        .path("/")
        .body(json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string())
        .reply(&routes)
        .await;

    let events = logs.access_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["status"], 202);
}

#[tokio::test]
async fn test_rejected_method_logs_405() {
    let (logs, _guard) = capture();
    let routes = http::routes(test_server());

    let response = warp::test::request()
        .method("GET")
        .path("/")
        .reply(&routes)
        .await;
    assert_eq!(response.status(), 405);

    let events = logs.access_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["status"], 405);
}

#[tokio::test]
async fn test_informational_endpoints_are_not_access_logged() {
    let (logs, _guard) = capture();
    let routes = http::routes(test_server());

    warp::test::request().path("/health").reply(&routes).await;
    warp::test::request().path("/version").reply(&routes).await;

    assert!(logs.access_events().is_empty());
}
