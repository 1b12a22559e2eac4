//! Global leaderboard
//!
//! A shared JSON endpoint holds every submitted run as a map of
//! `{initials, score, timestamp}` records. Reads keep the top 10 by score.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Realtime-database endpoint the web build has always used
pub const DEFAULT_ENDPOINT: &str =
    "https://road-to-asotu-con-default-rtdb.firebaseio.com/leaderboard.json";

/// Maximum number of entries shown
pub const MAX_ENTRIES: usize = 10;

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("initials must be exactly three letters A-Z, got {0:?}")]
    InvalidInitials(String),
    #[error("leaderboard request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("leaderboard returned HTTP {0}")]
    Status(u16),
    #[error("malformed leaderboard body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A single submitted run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub initials: String,
    pub score: u32,
    /// Unix timestamp (ms) at submission
    #[serde(default)]
    pub timestamp: u64,
}

/// Top scores, sorted descending
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score would make the board
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Get the rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert an entry in score order, returning its rank if it made the board
    pub fn insert(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        let rank = self.potential_rank(entry.score)?;
        self.entries.insert(rank - 1, entry);
        self.entries.truncate(MAX_ENTRIES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }
}

/// Upper-case and check `^[A-Z]{3}$`
pub fn validate_initials(raw: &str) -> Result<String, LeaderboardError> {
    let initials = raw.trim().to_uppercase();
    if initials.len() == 3 && initials.bytes().all(|b| b.is_ascii_uppercase()) {
        Ok(initials)
    } else {
        Err(LeaderboardError::InvalidInitials(raw.to_string()))
    }
}

/// Decode a leaderboard body: `null` is an empty board, records that don't
/// parse are skipped, the rest are sorted by score and cut to the top 10.
pub fn parse_leaderboard(body: &str) -> Result<Leaderboard, LeaderboardError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    let records: Vec<serde_json::Value> = match value {
        serde_json::Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
        serde_json::Value::Array(items) => items,
        _ => Vec::new(),
    };

    let mut entries: Vec<LeaderboardEntry> = records
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect();
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(MAX_ENTRIES);
    Ok(Leaderboard { entries })
}

/// Current Unix time in milliseconds
pub fn now_ms() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now() as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// HTTP client for the shared endpoint
#[derive(Debug, Clone)]
pub struct LeaderboardClient {
    http: reqwest::Client,
    endpoint: String,
}

impl Default for LeaderboardClient {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

impl LeaderboardClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: build_http(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch the top 10, surfacing any failure
    pub async fn try_fetch_top(&self) -> Result<Leaderboard, LeaderboardError> {
        let response = self
            .http
            .get(&self.endpoint)
            .header("Accept", "application/json")
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(LeaderboardError::Status(response.status().as_u16()));
        }
        let body = response.text().await?;
        parse_leaderboard(&body)
    }

    /// Fetch the top 10; any failure reads as an empty board
    pub async fn fetch_top(&self) -> Leaderboard {
        match self.try_fetch_top().await {
            Ok(board) => {
                log::info!("Fetched {} leaderboard entries", board.entries.len());
                board
            }
            Err(e) => {
                log::error!("Error fetching leaderboard: {e}");
                Leaderboard::new()
            }
        }
    }

    /// Submit a finished run. Single attempt, no retry.
    pub async fn submit(&self, initials: &str, score: u32) -> Result<LeaderboardEntry, LeaderboardError> {
        let entry = LeaderboardEntry {
            initials: validate_initials(initials)?,
            score,
            timestamp: now_ms(),
        };
        let response = self.http.post(&self.endpoint).json(&entry).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            log::error!("Score submission rejected: HTTP {status}");
            return Err(LeaderboardError::Status(status));
        }
        log::info!("Score submitted: {} - {}", entry.initials, entry.score);
        Ok(entry)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn build_http() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .unwrap_or_else(|e| {
            log::warn!("Falling back to default HTTP client: {e}");
            reqwest::Client::new()
        })
}

#[cfg(target_arch = "wasm32")]
fn build_http() -> reqwest::Client {
    reqwest::Client::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(initials: &str, score: u32) -> LeaderboardEntry {
        LeaderboardEntry {
            initials: initials.to_string(),
            score,
            timestamp: 0,
        }
    }

    #[test]
    fn test_parse_null_is_empty() {
        assert!(parse_leaderboard("null").unwrap().is_empty());
    }

    #[test]
    fn test_parse_sorts_truncates_and_skips_garbage() {
        let mut body = String::from("{");
        for i in 0..15 {
            body.push_str(&format!(
                r#""k{i:02}": {{"initials": "A{i:02}", "score": {}, "timestamp": {i}}},"#,
                i * 7 % 15
            ));
        }
        body.push_str(r#""bad1": {"initials": "XYZ"}, "bad2": 42}"#);

        let board = parse_leaderboard(&body).unwrap();
        assert_eq!(board.entries.len(), MAX_ENTRIES);
        assert_eq!(board.top_score(), Some(14));
        assert!(board.entries.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(board.entries.last().map(|e| e.score), Some(5));
    }

    #[test]
    fn test_parse_missing_timestamp_defaults() {
        let board = parse_leaderboard(r#"{"a": {"initials": "ABC", "score": 9}}"#).unwrap();
        assert_eq!(board.entries, vec![entry("ABC", 9)]);
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(matches!(
            parse_leaderboard("<html>"),
            Err(LeaderboardError::Decode(_))
        ));
    }

    #[test]
    fn test_validate_initials() {
        assert_eq!(validate_initials("abc").unwrap(), "ABC");
        assert_eq!(validate_initials(" xYz ").unwrap(), "XYZ");
        for bad in ["", "AB", "ABCD", "A1C", "A C", "ÄBC"] {
            assert!(
                matches!(validate_initials(bad), Err(LeaderboardError::InvalidInitials(_))),
                "{bad:?} accepted"
            );
        }
    }

    #[test]
    fn test_ranking() {
        let mut board = Leaderboard::new();
        assert!(!board.qualifies(0));
        assert_eq!(board.insert(entry("AAA", 10)), Some(1));
        assert_eq!(board.insert(entry("BBB", 30)), Some(1));
        assert_eq!(board.insert(entry("CCC", 20)), Some(2));
        for i in 0..7 {
            board.insert(entry("DDD", 5 + i));
        }
        assert_eq!(board.entries.len(), MAX_ENTRIES);
        // Full board: must beat the last entry (5)
        assert!(!board.qualifies(5));
        assert_eq!(board.potential_rank(6), Some(10));
        assert_eq!(board.insert(entry("EEE", 100)), Some(1));
        assert_eq!(board.entries.len(), MAX_ENTRIES);
        assert_eq!(board.top_score(), Some(100));
    }

    #[test]
    fn test_entry_wire_shape() {
        let json = serde_json::to_value(entry("KYL", 12)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"initials": "KYL", "score": 12, "timestamp": 0})
        );
    }

    #[cfg(not(target_arch = "wasm32"))]
    mod http {
        use super::super::*;
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::{TcpListener, TcpStream};

        /// Read one request, headers plus `Content-Length` body
        async fn read_request(socket: &mut TcpStream) {
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = socket.read(&mut chunk).await.unwrap_or(0);
                if n == 0 {
                    return;
                }
                buf.extend_from_slice(&chunk[..n]);
                if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                    let body_len = head
                        .lines()
                        .find_map(|l| l.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if buf.len() >= end + 4 + body_len {
                        return;
                    }
                }
            }
        }

        /// Local endpoint answering every request with `status`; returns the
        /// URL and a request counter
        async fn serve_status(status: &'static str) -> (String, Arc<AtomicUsize>) {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            let requests = Arc::new(AtomicUsize::new(0));
            let counter = requests.clone();
            tokio::spawn(async move {
                while let Ok((mut socket, _)) = listener.accept().await {
                    read_request(&mut socket).await;
                    counter.fetch_add(1, Ordering::SeqCst);
                    let response = format!(
                        "HTTP/1.1 {status}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                }
            });
            (format!("http://{addr}/leaderboard.json"), requests)
        }

        #[tokio::test]
        async fn test_fetch_unreachable_is_empty() {
            let client = LeaderboardClient::new("http://127.0.0.1:1/leaderboard.json");
            assert!(client.try_fetch_top().await.is_err());
            assert!(client.fetch_top().await.is_empty());
        }

        #[tokio::test]
        async fn test_fetch_not_found_is_status() {
            let (url, requests) = serve_status("404 Not Found").await;
            let client = LeaderboardClient::new(url);
            assert!(matches!(
                client.try_fetch_top().await,
                Err(LeaderboardError::Status(404))
            ));
            assert!(client.fetch_top().await.is_empty());
            assert_eq!(requests.load(Ordering::SeqCst), 2);
        }

        #[tokio::test]
        async fn test_submit_server_error_single_attempt() {
            let (url, requests) = serve_status("500 Internal Server Error").await;
            let client = LeaderboardClient::new(url);
            assert!(matches!(
                client.submit("abc", 12).await,
                Err(LeaderboardError::Status(500))
            ));
            assert_eq!(requests.load(Ordering::SeqCst), 1);
        }

        #[tokio::test]
        async fn test_submit_bad_initials_sends_nothing() {
            let (url, requests) = serve_status("200 OK").await;
            let client = LeaderboardClient::new(url);
            assert!(matches!(
                client.submit("a1", 12).await,
                Err(LeaderboardError::InvalidInitials(_))
            ));
            assert_eq!(requests.load(Ordering::SeqCst), 0);
        }
    }
}
