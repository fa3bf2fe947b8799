//! Per-request access logging for the MCP endpoint
//!
//! One INFO line per request, recorded after the reply is finalized, so the
//! status is whatever was actually written (200 when the handler set none).

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::info;
use warp::http::{Method, StatusCode};
use warp::log::Info;

/// Header carrying the MCP session identifier
pub const MCP_SESSION_ID: &str = "mcp-session-id";

const SESSION_SUFFIX_LEN: usize = 6;

/// Last six characters of a session id, enough to correlate log lines
/// without writing the whole identifier
pub fn short_session_id(id: &str) -> &str {
    let count = id.chars().count();
    if count <= SESSION_SUFFIX_LEN {
        return id;
    }
    let start = id
        .char_indices()
        .nth(count - SESSION_SUFFIX_LEN)
        .map(|(index, _)| index)
        .unwrap_or(0);
    &id[start..]
}

/// Everything one access log line reports
#[derive(Debug, Clone, PartialEq)]
pub struct AccessLogEntry {
    pub method: Method,
    pub path: String,
    pub remote_addr: Option<SocketAddr>,
    pub session: Option<String>,
    pub status: StatusCode,
    pub elapsed: Duration,
}

impl AccessLogEntry {
    pub fn from_info(info: &Info<'_>) -> Self {
        let session = info
            .request_headers()
            .get(MCP_SESSION_ID)
            .and_then(|value| value.to_str().ok())
            .filter(|id| !id.is_empty())
            .map(|id| short_session_id(id).to_string());

        Self {
            method: info.method().clone(),
            path: info.path().to_string(),
            remote_addr: info.remote_addr(),
            session,
            status: info.status(),
            elapsed: info.elapsed(),
        }
    }
}

impl fmt::Display for AccessLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.method, self.path)?;
        match self.remote_addr {
            Some(addr) => write!(f, "{addr}")?,
            None => f.write_str("-")?,
        }
        if let Some(session) = &self.session {
            write!(f, " [session: ...{session}]")?;
        }
        write!(f, " {} {:?}", self.status.as_u16(), self.elapsed)
    }
}

/// `warp::log::custom` callback
pub fn log_request(info: Info<'_>) {
    let entry = AccessLogEntry::from_info(&info);
    info!(
        target: "google_search_agent::access",
        method = %entry.method,
        path = %entry.path,
        remote_addr = ?entry.remote_addr,
        session = entry.session.as_deref(),
        status = entry.status.as_u16(),
        latency_ms = entry.elapsed.as_millis() as u64,
        "{}",
        entry
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(session: Option<&str>) -> AccessLogEntry {
        AccessLogEntry {
            method: Method::POST,
            path: "/".to_string(),
            remote_addr: Some("127.0.0.1:54321".parse().unwrap()),
            session: session.map(str::to_string),
            status: StatusCode::OK,
            elapsed: Duration::from_millis(12),
        }
    }

    #[test]
    fn test_short_session_id_keeps_last_six() {
        assert_eq!(short_session_id("mcp-session-1234567890abcdef"), "abcdef");
        assert_eq!(short_session_id("abcdef"), "abcdef");
        assert_eq!(short_session_id("abc"), "abc");
        assert_eq!(short_session_id(""), "");
    }

    #[test]
    fn test_short_session_id_is_char_safe() {
        assert_eq!(short_session_id("sessión-ñandú"), "-ñandú");
    }

    #[test]
    fn test_line_without_session() {
        assert_eq!(entry(None).to_string(), "POST / 127.0.0.1:54321 200 12ms");
    }

    #[test]
    fn test_line_with_session() {
        assert_eq!(
            entry(Some("abcdef")).to_string(),
            "POST / 127.0.0.1:54321 [session: ...abcdef] 200 12ms"
        );
    }

    #[test]
    fn test_line_without_remote_addr() {
        let mut entry = entry(None);
        entry.remote_addr = None;
        entry.status = StatusCode::ACCEPTED;

        assert_eq!(entry.to_string(), "POST / - 202 12ms");
    }
}
