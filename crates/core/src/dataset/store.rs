//! Named datasets kept as `<name>.csv` files in one directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

use super::file::{self, SaveMode};
use super::{dedupe, DatasetError, SearchConfig};

const EXTENSION: &str = "csv";

/// Directory-backed mapping from dataset name to [`SearchConfig`].
#[derive(Debug, Clone)]
pub struct DatasetStore {
    dir: PathBuf,
}

impl DatasetStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Canonical dataset name for user input: trimmed, lower-cased, without
    /// a trailing `.csv`.
    pub fn dataset_name(input: &str) -> String {
        let name = input.trim().to_lowercase();
        match name.strip_suffix(".csv") {
            Some(stem) => stem.to_string(),
            None => name,
        }
    }

    /// File backing `name`. Names match files case-insensitively, so a
    /// `Music.csv` written by hand is found as `music`. A name with no file
    /// yet maps to its lower-cased path.
    pub fn path_for(&self, name: &str) -> PathBuf {
        let name = Self::dataset_name(name);
        let existing = self
            .list()
            .unwrap_or_default()
            .into_iter()
            .find(|stem| stem.to_lowercase() == name);
        let stem = existing.unwrap_or(name);
        self.dir.join(format!("{stem}.{EXTENSION}"))
    }

    /// Names of all datasets in the directory, sorted.
    pub fn list(&self) -> Result<Vec<String>, DatasetError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(DatasetError::Io(format!("{}: {}", self.dir.display(), e))),
        };

        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| path.extension().is_some_and(|ext| ext == EXTENSION))
            .filter_map(|path| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .collect();
        names.sort();
        Ok(names)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    pub fn load(&self, name: &str) -> Result<SearchConfig, DatasetError> {
        file::load(&self.path_for(name))
    }

    /// Save under `name`, creating the directory if needed.
    pub fn save(
        &self,
        name: &str,
        config: &SearchConfig,
        mode: SaveMode,
    ) -> Result<PathBuf, DatasetError> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| DatasetError::Io(format!("{}: {}", self.dir.display(), e)))?;
        let path = self.path_for(name);
        file::save(config, &path, mode)?;
        info!(dataset = %Self::dataset_name(name), ?mode, "Dataset saved");
        Ok(path)
    }

    /// Remove duplicate usernames and terms from a saved dataset in place.
    pub fn clean(&self, name: &str) -> Result<SearchConfig, DatasetError> {
        let cleaned = dedupe(&self.load(name)?);
        self.save(name, &cleaned, SaveMode::Overwrite)?;
        Ok(cleaned)
    }
}
