//! Search configuration types and the pure operations on them.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

/// A reusable search: which proxy to link against, whose uploads to look for,
/// and which terms to search.
///
/// Both lists keep insertion order so the queries built from them are
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Proxy base URL used for detail pages and liveness checks.
    pub proxy_base_url: String,
    /// Uploaders to keep results for.
    pub usernames: Vec<String>,
    /// Terms sent to the index.
    pub search_terms: Vec<String>,
}

impl SearchConfig {
    /// Create a config from raw entries, applying the case policy to each one.
    pub fn new<U, T>(proxy_base_url: impl Into<String>, usernames: U, search_terms: T) -> Self
    where
        U: IntoIterator,
        U::Item: AsRef<str>,
        T: IntoIterator,
        T::Item: AsRef<str>,
    {
        Self {
            proxy_base_url: proxy_base_url.into(),
            usernames: usernames
                .into_iter()
                .filter_map(|u| normalize_username(u.as_ref()))
                .collect(),
            search_terms: search_terms
                .into_iter()
                .filter_map(|t| normalize_term(t.as_ref()))
                .collect(),
        }
    }

    /// Return a copy pointing at a different proxy.
    pub fn with_proxy_url(mut self, url: impl Into<String>) -> Self {
        self.proxy_base_url = url.into();
        self
    }

    /// True when there is nothing to search for.
    pub fn is_empty(&self) -> bool {
        self.usernames.is_empty() && self.search_terms.is_empty()
    }
}

/// A batch of usernames and terms to add to or remove from a config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntrySet {
    pub usernames: Vec<String>,
    pub search_terms: Vec<String>,
}

impl EntrySet {
    /// Build from comma-separated user input.
    pub fn from_input(usernames: &str, search_terms: &str) -> Self {
        Self {
            usernames: parse_usernames(usernames),
            search_terms: parse_terms(search_terms),
        }
    }

    pub fn usernames(input: &str) -> Self {
        Self::from_input(input, "")
    }

    pub fn search_terms(input: &str) -> Self {
        Self::from_input("", input)
    }
}

/// Usernames are trimmed and capitalised: first letter upper-case, rest lower-case.
pub fn normalize_username(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    let first = chars.next()?;
    Some(
        first
            .to_uppercase()
            .chain(chars.as_str().to_lowercase().chars())
            .collect(),
    )
}

/// Search terms are trimmed and lower-cased.
pub fn normalize_term(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Split comma-separated usernames. `;` is the in-cell delimiter of the
/// dataset file, so it separates entries here too.
pub fn parse_usernames(input: &str) -> Vec<String> {
    split_entries(input).filter_map(normalize_username).collect()
}

/// Split comma-separated search terms.
pub fn parse_terms(input: &str) -> Vec<String> {
    split_entries(input).filter_map(normalize_term).collect()
}

fn split_entries(input: &str) -> impl Iterator<Item = &str> {
    input.split([',', ';'])
}

/// Remove repeated entries, keeping the first occurrence of each.
pub fn dedupe(config: &SearchConfig) -> SearchConfig {
    SearchConfig {
        proxy_base_url: config.proxy_base_url.clone(),
        usernames: unique(&config.usernames),
        search_terms: unique(&config.search_terms),
    }
}

/// Add `additions`, then drop everything in `removals`.
///
/// Removals are applied last, so an entry present in both ends up removed.
pub fn amend(config: &SearchConfig, additions: &EntrySet, removals: &EntrySet) -> SearchConfig {
    SearchConfig {
        proxy_base_url: config.proxy_base_url.clone(),
        usernames: union_minus(
            &config.usernames,
            &additions.usernames,
            &removals.usernames,
            normalize_username,
        ),
        search_terms: union_minus(
            &config.search_terms,
            &additions.search_terms,
            &removals.search_terms,
            normalize_term,
        ),
    }
}

fn union_minus(
    current: &[String],
    add: &[String],
    remove: &[String],
    normalize: fn(&str) -> Option<String>,
) -> Vec<String> {
    let removed: HashSet<String> = remove.iter().filter_map(|r| normalize(r)).collect();
    let added = add.iter().filter_map(|a| normalize(a));

    let mut merged = unique(current);
    let mut seen: HashSet<String> = merged.iter().cloned().collect();
    for entry in added {
        if seen.insert(entry.clone()) {
            merged.push(entry);
        }
    }
    merged.retain(|entry| !removed.contains(entry));
    merged
}

fn unique(entries: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .filter(|e| seen.insert(e.as_str()))
        .cloned()
        .collect()
}

/// How to reconcile one list of a saved dataset with the edited copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMerge {
    /// Keep the saved entries.
    Keep,
    /// Replace with the edited entries.
    Overwrite,
    /// Union of both, skipping duplicates.
    Combine,
}

impl FromStr for ListMerge {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "k" | "keep" => Ok(Self::Keep),
            "o" | "overwrite" => Ok(Self::Overwrite),
            "c" | "combine" => Ok(Self::Combine),
            other => Err(format!("unknown merge option: {other}")),
        }
    }
}

/// Choices made while viewing the differences between a saved dataset and
/// the edited one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileChoices {
    pub take_current_url: bool,
    pub usernames: ListMerge,
    pub search_terms: ListMerge,
}

/// Merge an edited config back into the saved one according to `choices`.
pub fn reconcile(
    saved: &SearchConfig,
    current: &SearchConfig,
    choices: ReconcileChoices,
) -> SearchConfig {
    let proxy_base_url = if choices.take_current_url {
        current.proxy_base_url.clone()
    } else {
        saved.proxy_base_url.clone()
    };

    SearchConfig {
        proxy_base_url,
        usernames: merge_list(&saved.usernames, &current.usernames, choices.usernames),
        search_terms: merge_list(
            &saved.search_terms,
            &current.search_terms,
            choices.search_terms,
        ),
    }
}

fn merge_list(saved: &[String], current: &[String], merge: ListMerge) -> Vec<String> {
    match merge {
        ListMerge::Keep => saved.to_vec(),
        ListMerge::Overwrite => current.to_vec(),
        ListMerge::Combine => {
            let both: Vec<String> = saved.iter().chain(current).cloned().collect();
            unique(&both)
        }
    }
}
