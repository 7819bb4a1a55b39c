//! Text rendering of results and dataset contents.

use chrono::TimeZone;
use std::fmt;

use crate::searcher::TorrentRecord;

/// Multi-line description of one record; the upload date is shown in `tz`.
pub fn format_record<Tz>(record: &TorrentRecord, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let uploaded = record
        .uploaded_at()
        .map(|at| at.with_timezone(tz).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "unknown".to_string());

    format!(
        "{}\nUploaded by: {}\nUser status: {}\nFile size: {:.2} GB\nUploaded: {}\nNumber of seeders: {}\nHash: {}\nSite URL: {}\n",
        record.name,
        record.username,
        record.status,
        record.size_gib(),
        uploaded,
        record.seeders,
        record.info_hash,
        record.detail_url,
    )
}

pub fn format_links(links: &[String]) -> String {
    let mut out = String::from("Relevant links:\n");
    for link in links {
        out.push_str(link);
        out.push('\n');
    }
    out
}

/// `[a, b, c]`
pub fn format_list(entries: &[String]) -> String {
    format!("[{}]", entries.join(", "))
}
