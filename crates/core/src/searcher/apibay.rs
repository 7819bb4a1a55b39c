//! apibay search backend implementation.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex_lite::Regex;
use reqwest::Client;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::ApiConfig;

use super::{detail_url, IndexSearcher, Query, SearchError, TorrentRecord};

/// Id the index uses for its placeholder "No results returned" entry.
const NO_RESULTS_ID: &str = "0";

static LINK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"https?://[^\s<>"'\[\]()]+"#).expect("link pattern is valid")
});

/// apibay search backend implementation.
pub struct ApibaySearcher {
    client: Client,
    base_url: String,
    max_results: usize,
}

impl ApibaySearcher {
    /// Create a new ApibaySearcher with the given configuration.
    pub fn new(config: &ApiConfig, max_results: usize) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| SearchError::Internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            max_results,
        })
    }

    /// Build the search URL for a query.
    fn build_search_url(&self, query: &Query) -> String {
        format!(
            "{}/q.php?q={}",
            self.base_url,
            urlencoding::encode(&query.api_query())
        )
    }

    fn build_description_url(&self, id: &str) -> String {
        format!("{}/t.php?id={}", self.base_url, urlencoding::encode(id))
    }

    async fn get_text(&self, url: &str) -> Result<String, SearchError> {
        let response = self.client.get(url).send().await.map_err(map_request_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Network(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        response.text().await.map_err(map_request_error)
    }
}

#[async_trait]
impl IndexSearcher for ApibaySearcher {
    fn name(&self) -> &str {
        "apibay"
    }

    async fn fetch(
        &self,
        proxy_base_url: &str,
        query: &Query,
    ) -> Result<Vec<TorrentRecord>, SearchError> {
        let url = self.build_search_url(query);
        debug!(query = %query, "Querying apibay");

        let body = self.get_text(&url).await?;
        let records = parse_search_response(&body, proxy_base_url, query, self.max_results)?;

        debug!(query = %query, results = records.len(), "apibay query complete");
        Ok(records)
    }

    async fn description_links(&self, id: &str) -> Result<Vec<String>, SearchError> {
        let body = self.get_text(&self.build_description_url(id)).await?;
        let details: ApibayDetails = serde_json::from_str(&body)
            .map_err(|e| SearchError::Parse(format!("Failed to parse details: {e}")))?;
        Ok(extract_links(details.descr.as_deref().unwrap_or_default()))
    }
}

fn map_request_error(e: reqwest::Error) -> SearchError {
    if e.is_timeout() {
        SearchError::Timeout
    } else if e.is_decode() {
        SearchError::Parse(e.to_string())
    } else {
        SearchError::Network(e.to_string())
    }
}

/// Parse a `q.php` response body into records.
///
/// The placeholder "no results" entry is dropped, at most `max_results`
/// entries are kept, then entries not uploaded by the query's user are
/// filtered out. A body that is not a JSON array is a parse error; a single
/// malformed entry is logged and skipped.
pub fn parse_search_response(
    body: &str,
    proxy_base_url: &str,
    query: &Query,
    max_results: usize,
) -> Result<Vec<TorrentRecord>, SearchError> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(body)
        .map_err(|e| SearchError::Parse(format!("Failed to parse response: {e}")))?;

    let mut records = Vec::new();
    for value in entries
        .into_iter()
        .filter(|v| !is_placeholder(v))
        .take(max_results)
    {
        let id = value.get("id").map(|id| id.to_string()).unwrap_or_default();
        let record = match parse_entry(value, proxy_base_url) {
            Ok(record) => record,
            Err(e) => {
                warn!(query = %query, id = %id, error = %e, "Skipping malformed apibay entry");
                continue;
            }
        };
        if query.matches_uploader(&record.username) {
            records.push(record);
        }
    }
    Ok(records)
}

fn is_placeholder(value: &serde_json::Value) -> bool {
    match value.get("id") {
        Some(serde_json::Value::String(id)) => id.trim() == NO_RESULTS_ID,
        Some(serde_json::Value::Number(id)) => id.to_string() == NO_RESULTS_ID,
        _ => false,
    }
}

fn parse_entry(value: serde_json::Value, proxy_base_url: &str) -> Result<TorrentRecord, SearchError> {
    let entry: ApibayEntry = serde_json::from_value(value)
        .map_err(|e| SearchError::Parse(format!("Failed to parse entry: {e}")))?;
    entry.into_record(proxy_base_url)
}

/// Every http(s) link in a torrent description, in order of appearance.
pub fn extract_links(description: &str) -> Vec<String> {
    LINK_PATTERN
        .find_iter(description)
        .map(|m| m.as_str().trim_end_matches(['.', ',', ';']).to_string())
        .collect()
}

// apibay API response types
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Flexible {
    Text(String),
    Number(serde_json::Number),
}

impl Flexible {
    fn text(&self) -> String {
        match self {
            Flexible::Text(s) => s.trim().to_string(),
            Flexible::Number(n) => n.to_string(),
        }
    }

    fn parse<T: FromStr>(&self, field: &str) -> Result<T, SearchError> {
        let text = self.text();
        text.parse()
            .map_err(|_| SearchError::Parse(format!("invalid {field}: {text:?}")))
    }
}

#[derive(Debug, Deserialize)]
struct ApibayEntry {
    id: Flexible,
    name: String,
    #[serde(default)]
    info_hash: String,
    #[serde(default)]
    leechers: Option<Flexible>,
    seeders: Flexible,
    size: Flexible,
    #[serde(default)]
    username: String,
    added: Flexible,
    #[serde(default)]
    status: String,
}

impl ApibayEntry {
    fn into_record(self, proxy_base_url: &str) -> Result<TorrentRecord, SearchError> {
        let id = self.id.text();
        Ok(TorrentRecord {
            detail_url: detail_url(proxy_base_url, &id),
            size_bytes: self.size.parse("size")?,
            upload_timestamp: self.added.parse("added")?,
            seeders: self.seeders.parse("seeders")?,
            leechers: match &self.leechers {
                Some(l) => l.parse("leechers")?,
                None => 0,
            },
            id,
            name: self.name,
            info_hash: self.info_hash.to_lowercase(),
            username: self.username,
            status: self.status,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ApibayDetails {
    #[serde(default)]
    descr: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROXY: &str = "https://tpb.example";

    fn entry(id: &str, name: &str, user: &str, hash: &str) -> String {
        format!(
            r#"{{"id":"{id}","name":"{name}","info_hash":"{hash}","leechers":"3","seeders":"12","num_files":"1","size":"2048","username":"{user}","added":"1700000000","status":"vip","category":"300","imdb":""}}"#
        )
    }

    #[test]
    fn test_parse_sentinel_is_empty() {
        let body = r#"[{"id":"0","name":"No results returned","info_hash":"0000000000000000000000000000000000000000","leechers":"0","seeders":"0","num_files":"0","size":"0","username":"","added":"0","status":"member","category":"0","imdb":""}]"#;
        let records = parse_search_response(body, PROXY, &Query::by_term("nothing"), 100).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_parse_converts_string_fields() {
        let body = format!("[{}]", entry("42", "Debian 12", "Alice", "ABCDEF"));
        let records = parse_search_response(&body, PROXY, &Query::by_term("debian"), 100).unwrap();

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.id, "42");
        assert_eq!(r.name, "Debian 12");
        assert_eq!(r.info_hash, "abcdef");
        assert_eq!(r.size_bytes, 2048);
        assert_eq!(r.seeders, 12);
        assert_eq!(r.leechers, 3);
        assert_eq!(r.upload_timestamp, 1_700_000_000);
        assert_eq!(r.status, "vip");
        assert_eq!(r.detail_url, "https://tpb.example/description.php?id=42");
    }

    #[test]
    fn test_parse_accepts_numeric_fields() {
        let body = r#"[{"id":7,"name":"N","info_hash":"h","seeders":5,"size":100,"username":"Bob","added":1600000000}]"#;
        let records = parse_search_response(body, PROXY, &Query::by_term("n"), 100).unwrap();
        assert_eq!(records[0].id, "7");
        assert_eq!(records[0].seeders, 5);
        assert_eq!(records[0].leechers, 0);
    }

    #[test]
    fn test_parse_filters_by_uploader() {
        let body = format!(
            "[{},{},{}]",
            entry("1", "a", "alice", "h1"),
            entry("2", "b", "Bob", "h2"),
            entry("3", "c", "ALICE", "h3")
        );
        let records =
            parse_search_response(&body, PROXY, &Query::new("Alice", "x"), 100).unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_parse_caps_entries() {
        let entries: Vec<String> = (1..=5)
            .map(|i| entry(&i.to_string(), "n", "Alice", &format!("h{i}")))
            .collect();
        let body = format!("[{}]", entries.join(","));
        let records = parse_search_response(&body, PROXY, &Query::by_term("n"), 3).unwrap();
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn test_parse_malformed_json() {
        let err = parse_search_response("<html>", PROXY, &Query::by_term("x"), 100).unwrap_err();
        assert!(matches!(err, SearchError::Parse(_)));
    }

    #[test]
    fn test_parse_not_an_array() {
        let err = parse_search_response(r#"{"error":"busy"}"#, PROXY, &Query::by_term("x"), 100)
            .unwrap_err();
        assert!(matches!(err, SearchError::Parse(_)));
    }

    #[test]
    fn test_parse_negative_size_skipped() {
        let body = r#"[{"id":"1","name":"N","seeders":"1","size":"-5","added":"0"}]"#;
        let records = parse_search_response(body, PROXY, &Query::by_term("x"), 100).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_parse_missing_required_field_skipped() {
        let body = r#"[{"id":"1","name":"N","size":"5","added":"0"}]"#;
        let records = parse_search_response(body, PROXY, &Query::by_term("x"), 100).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_parse_skips_bad_entry_keeps_rest() {
        let bad = entry("2", "b", "Alice", "h2").replace(r#""size":"2048""#, r#""size":"""#);
        let body = format!(
            "[{},{},{}]",
            entry("1", "a", "Alice", "h1"),
            bad,
            entry("3", "c", "Alice", "h3")
        );
        let records = parse_search_response(&body, PROXY, &Query::by_term("x"), 100).unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_extract_links() {
        let descr = "Screens:\nhttps://img.example/a.png\nMirror (http://mirror.example/file).\nno link here";
        assert_eq!(
            extract_links(descr),
            vec!["https://img.example/a.png", "http://mirror.example/file"]
        );
    }

    #[test]
    fn test_build_search_url() {
        let searcher = ApibaySearcher::new(
            &ApiConfig {
                url: "https://apibay.org/".to_string(),
                timeout_secs: 5,
            },
            100,
        )
        .unwrap();

        assert_eq!(
            searcher.build_search_url(&Query::by_term("linux iso")),
            "https://apibay.org/q.php?q=linux%20iso"
        );
        assert_eq!(
            searcher.build_search_url(&Query::by_user("Alice")),
            "https://apibay.org/q.php?q=user%3AAlice"
        );
        assert_eq!(
            searcher.build_description_url("99"),
            "https://apibay.org/t.php?id=99"
        );
    }
}
