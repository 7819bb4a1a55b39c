//! Expansion of a search configuration into individual index queries.

use crate::dataset::SearchConfig;

use super::{Query, SearchError};

/// Build one query per (term, username) pair.
///
/// Terms form the outer loop and usernames the inner one, so the order is
/// fixed for a given config. When one of the lists is empty, every entry of
/// the other is paired with the wildcard.
pub fn build_queries(config: &SearchConfig) -> Result<Vec<Query>, SearchError> {
    let users = &config.usernames;
    let terms = &config.search_terms;

    match (users.is_empty(), terms.is_empty()) {
        (true, true) => Err(SearchError::Validation(
            "at least one username or search term is required".to_string(),
        )),
        (true, false) => Ok(terms.iter().map(Query::by_term).collect()),
        (false, true) => Ok(users.iter().map(Query::by_user).collect()),
        (false, false) => Ok(terms
            .iter()
            .flat_map(|term| users.iter().map(move |user| Query::new(user, term)))
            .collect()),
    }
}
