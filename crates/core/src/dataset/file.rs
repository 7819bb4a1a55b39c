//! CSV persistence for a single dataset.
//!
//! File layout: a header row `url,usernames,search_terms` followed by one data
//! row. The multi-value cells hold entries separated by [`CELL_DELIMITER`].
//! Bracketed list cells such as `['Alice', 'Bob']` are accepted on load.

use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use tracing::{debug, warn};

use super::{DatasetError, SearchConfig};

/// Separator between entries inside a multi-value cell.
pub const CELL_DELIMITER: char = ';';

const REQUIRED_COLUMNS: [&str; 3] = ["url", "usernames", "search_terms"];

/// How `save` treats an existing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    /// Replace the file contents.
    Overwrite,
    /// Create a new file; fail with `Conflict` if one exists.
    NewFile,
}

#[derive(Debug, Serialize, Deserialize)]
struct DatasetRow {
    #[serde(rename = "url", alias = "URL", alias = "Url")]
    url: String,
    #[serde(rename = "usernames", alias = "Usernames")]
    usernames: String,
    #[serde(rename = "search_terms", alias = "Search_Terms", alias = "Search_terms")]
    search_terms: String,
}

/// Read a dataset from `path`.
pub fn load(path: &Path) -> Result<SearchConfig, DatasetError> {
    let file = File::open(path).map_err(|e| io_error(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| parse_error(path, e.to_string()))?
        .iter()
        .map(str::to_lowercase)
        .collect::<Vec<_>>();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(parse_error(path, format!("missing required column `{column}`")));
        }
    }

    let mut rows = reader.deserialize::<DatasetRow>();
    let row = match rows.next() {
        Some(row) => row.map_err(|e| parse_error(path, e.to_string()))?,
        None => return Err(parse_error(path, "no dataset row".to_string())),
    };
    let extra = rows.count();
    if extra > 0 {
        warn!(path = %path.display(), extra, "Ignoring extra rows in dataset file");
    }

    if row.url.is_empty() {
        return Err(parse_error(path, "empty url".to_string()));
    }

    debug!(path = %path.display(), "Loaded dataset");
    Ok(SearchConfig {
        proxy_base_url: row.url,
        usernames: split_cell(&row.usernames),
        search_terms: split_cell(&row.search_terms),
    })
}

/// Write `config` to `path`.
pub fn save(config: &SearchConfig, path: &Path, mode: SaveMode) -> Result<(), DatasetError> {
    let mut options = OpenOptions::new();
    options.write(true);
    match mode {
        SaveMode::Overwrite => options.create(true).truncate(true),
        SaveMode::NewFile => options.create_new(true),
    };
    let file = options.open(path).map_err(|e| io_error(path, e))?;

    let mut writer = csv::Writer::from_writer(file);
    writer
        .serialize(DatasetRow {
            url: config.proxy_base_url.clone(),
            usernames: join_cell(&config.usernames),
            search_terms: join_cell(&config.search_terms),
        })
        .map_err(|e| DatasetError::Io(format!("{}: {}", path.display(), e)))?;
    writer.flush().map_err(|e| io_error(path, e))?;

    debug!(path = %path.display(), ?mode, "Saved dataset");
    Ok(())
}

fn split_cell(cell: &str) -> Vec<String> {
    let cell = cell.trim();
    match bracketed_list(cell) {
        Some(inner) => inner
            .split(',')
            .map(|e| e.trim().trim_matches(|c: char| c == '\'' || c == '"').trim())
            .filter(|e| !e.is_empty())
            .map(String::from)
            .collect(),
        None => cell
            .split(CELL_DELIMITER)
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(String::from)
            .collect(),
    }
}

/// Inner text of a quoted list cell such as `['a', 'b']` or `[]`. A plain
/// entry that happens to be wrapped in brackets, like `[hevc]`, is not one.
fn bracketed_list(cell: &str) -> Option<&str> {
    let inner = cell.strip_prefix('[')?.strip_suffix(']')?;
    let first = inner.trim_start().chars().next();
    match first {
        None | Some('\'') | Some('"') => Some(inner),
        Some(_) => None,
    }
}

fn join_cell(entries: &[String]) -> String {
    entries.join(&CELL_DELIMITER.to_string())
}

fn io_error(path: &Path, err: io::Error) -> DatasetError {
    let shown = path.display().to_string();
    match err.kind() {
        io::ErrorKind::NotFound => DatasetError::FileNotFound(shown),
        io::ErrorKind::PermissionDenied => DatasetError::PermissionDenied(shown),
        io::ErrorKind::AlreadyExists => DatasetError::Conflict(shown),
        _ => DatasetError::Io(format!("{shown}: {err}")),
    }
}

fn parse_error(path: &Path, message: String) -> DatasetError {
    DatasetError::ParseError(format!("{}: {}", path.display(), message))
}
