//! Session stages: start menu, fresh search, loading and amending datasets.

use chrono::Local;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;
use crate::dataset::{
    amend, parse_terms, parse_usernames, DatasetStore, EntrySet, SaveMode, SearchConfig,
};
use crate::probe::{filter_dead_links, normalize_proxy_url, LinkProber};
use crate::searcher::{build_queries, run_search, IndexSearcher, SearchError, TorrentRecord};
use crate::sorter::{sort_records, SortCriterion};

use super::console::{ask_choice, ask_yes_no, AmendNext, Console, LoadChoice, StartChoice};
use super::render::{format_links, format_list, format_record};
use super::SessionError;

const START_MENU: &str = "Would you like to:\n\
- Start a fresh search: (f)\n\
- Load a saved data set: (l)\n\
- Clean up a saved data set: (c)\n";

const LOAD_MENU: &str = "Would you like to:\n\
- Amend the data set before searching: (a)\n\
- Search with the data set as is: (s)\n";

const AMEND_NEXT_MENU: &str = "\nWould you like to:\n\
- Make further changes: (a)\n\
- Continue to search: (s)\n";

/// What a session does once started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// New URL, usernames and terms typed in.
    Fresh,
    /// A saved dataset searched unchanged.
    LoadAsIs,
    /// A saved dataset edited before searching.
    Amend,
}

/// Knobs a session reads from the configuration.
#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub fetch_concurrency: usize,
    pub probe_concurrency: usize,
    pub max_url_attempts: u32,
    /// Records whose description links are fetched and shown.
    pub link_limit: usize,
}

impl From<&Config> for SessionSettings {
    fn from(config: &Config) -> Self {
        Self {
            fetch_concurrency: config.fetch.concurrency,
            probe_concurrency: config.probe.concurrency,
            max_url_attempts: config.probe.max_url_attempts,
            link_limit: config.display.link_limit,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

#[derive(Debug, Clone, Copy)]
enum EntryKind {
    Usernames,
    SearchTerms,
}

impl EntryKind {
    fn label(self) -> &'static str {
        match self {
            EntryKind::Usernames => "usernames",
            EntryKind::SearchTerms => "search terms",
        }
    }

    fn entries(self, config: &SearchConfig) -> &[String] {
        match self {
            EntryKind::Usernames => &config.usernames,
            EntryKind::SearchTerms => &config.search_terms,
        }
    }

    fn parse(self, input: &str) -> EntrySet {
        match self {
            EntryKind::Usernames => EntrySet::usernames(input),
            EntryKind::SearchTerms => EntrySet::search_terms(input),
        }
    }
}

/// One interactive run of the tool.
pub struct Session<C: Console> {
    pub(super) console: C,
    pub(super) searcher: Arc<dyn IndexSearcher>,
    pub(super) prober: Arc<dyn LinkProber>,
    pub(super) store: DatasetStore,
    pub(super) settings: SessionSettings,
    rng: Option<StdRng>,
}

impl<C: Console> Session<C> {
    pub fn new(
        console: C,
        searcher: Arc<dyn IndexSearcher>,
        prober: Arc<dyn LinkProber>,
        store: DatasetStore,
        settings: SessionSettings,
    ) -> Self {
        Self {
            console,
            searcher,
            prober,
            store,
            settings,
            rng: None,
        }
    }

    /// Use `rng` for random sorting instead of a fresh entropy-seeded one.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn into_console(self) -> C {
        self.console
    }

    /// Run the session from the start menu to the end of the save stage.
    pub async fn run(&mut self) -> Result<(), SessionError> {
        if self.store.list()?.is_empty() {
            self.console
                .say("Welcome! No saved data sets were found, so let's start a fresh search.\n");
            return self.run_mode(SessionMode::Fresh).await;
        }

        self.console.say("Welcome back!\n");
        loop {
            let mode = match ask_choice::<StartChoice>(&mut self.console, START_MENU)? {
                StartChoice::Fresh => SessionMode::Fresh,
                StartChoice::Load => match ask_choice::<LoadChoice>(&mut self.console, LOAD_MENU)? {
                    LoadChoice::Amend => SessionMode::Amend,
                    LoadChoice::AsIs => SessionMode::LoadAsIs,
                },
                StartChoice::Clean => {
                    self.clean_up()?;
                    continue;
                }
            };
            return self.run_mode(mode).await;
        }
    }

    /// Run one mode directly, skipping the start menu.
    pub async fn run_mode(&mut self, mode: SessionMode) -> Result<(), SessionError> {
        info!(?mode, dir = %self.store.dir().display(), "Session started");
        match mode {
            SessionMode::Fresh => self.fresh().await,
            SessionMode::LoadAsIs => self.load_as_is().await,
            SessionMode::Amend => self.amend_saved().await,
        }
    }

    async fn fresh(&mut self) -> Result<(), SessionError> {
        let proxy_base_url = self
            .ask_working_url("\nInput the URL of the Pirate Bay proxy you would like to use: ")
            .await?;

        let config = loop {
            let usernames = self.console.ask(
                "\nInput the usernames of the uploaders you want to search. \
                 Separate each username with a comma: ",
            )?;
            let search_terms = self
                .console
                .ask("Input the search terms. Separate each search term with a comma: ")?;

            let config = SearchConfig {
                proxy_base_url: proxy_base_url.clone(),
                usernames: parse_usernames(&usernames),
                search_terms: parse_terms(&search_terms),
            };
            if !config.is_empty() {
                break config;
            }
            self.console
                .say("Please input at least one username or search term.\n");
        };

        self.search_and_review(&config).await?;
        self.save_fresh(&config)
    }

    async fn load_as_is(&mut self) -> Result<(), SessionError> {
        let name = self.choose_dataset("\nInput the set to load: ")?;
        let mut config = self.store.load(&name)?;

        if let Some(url) = self.confirm_proxy(&config.proxy_base_url).await? {
            config.proxy_base_url = url;
            self.store.save(&name, &config, SaveMode::Overwrite)?;
            self.console.say("The data set has been updated with the new URL.\n");
        }

        self.search_and_review(&config).await?;
        self.console
            .say("Since you made no changes, there is nothing to save.\nHave a great day!");
        Ok(())
    }

    async fn amend_saved(&mut self) -> Result<(), SessionError> {
        let name = self.choose_dataset("\nInput the set to amend: ")?;
        let saved = self.store.load(&name)?;

        let mut current = saved.clone();
        loop {
            current = self.edit(current).await?;
            match ask_choice::<AmendNext>(&mut self.console, AMEND_NEXT_MENU)? {
                AmendNext::MoreChanges => continue,
                AmendNext::Search if current.is_empty() => {
                    self.console
                        .say("Please input at least one username or search term.\n");
                }
                AmendNext::Search => break,
            }
        }

        self.search_and_review(&current).await?;
        self.save_amended(&name, &saved, &current)
    }

    fn clean_up(&mut self) -> Result<(), SessionError> {
        let name = self.choose_dataset("\nInput the set to clean: ")?;
        let cleaned = self.store.clean(&name)?;
        self.console.say(&format!(
            "Duplicates removed from {name}. It now holds {} usernames and {} search terms.\n",
            cleaned.usernames.len(),
            cleaned.search_terms.len()
        ));
        Ok(())
    }

    /// One round of edits: proxy URL, then usernames, then search terms.
    async fn edit(&mut self, mut config: SearchConfig) -> Result<SearchConfig, SessionError> {
        match self.confirm_proxy(&config.proxy_base_url).await? {
            Some(url) => config.proxy_base_url = url,
            None => {
                if ask_yes_no(
                    &mut self.console,
                    "Would you like to change it anyway? (y/n): ",
                )? {
                    config.proxy_base_url =
                        self.ask_working_url("Input the new proxy URL: ").await?;
                }
            }
        }

        let config = self.edit_entries(config, EntryKind::Usernames)?;
        self.edit_entries(config, EntryKind::SearchTerms)
    }

    fn edit_entries(
        &mut self,
        mut config: SearchConfig,
        kind: EntryKind,
    ) -> Result<SearchConfig, SessionError> {
        let label = kind.label();
        self.console.say(&format!(
            "\nCurrent {label}: {}",
            format_list(kind.entries(&config))
        ));

        if ask_yes_no(&mut self.console, &format!("Remove any {label}? (y/n): "))? {
            let input = self
                .console
                .ask(&format!("Input the {label} to remove, separated by commas: "))?;
            config = amend(&config, &EntrySet::default(), &kind.parse(&input));
        }
        if ask_yes_no(&mut self.console, &format!("Add new {label}? (y/n): "))? {
            let input = self
                .console
                .ask(&format!("Input the {label} to add, separated by commas: "))?;
            config = amend(&config, &kind.parse(&input), &EntrySet::default());
        }

        self.console.say(&format!(
            "Updated {label}: {}",
            format_list(kind.entries(&config))
        ));
        Ok(config)
    }

    /// List saved datasets and ask until an existing one is named.
    fn choose_dataset(&mut self, prompt: &str) -> Result<String, SessionError> {
        let names = self.store.list()?;
        self.console
            .say(&format!("\nAvailable data sets:\n{}\n", names.join("\n")));

        loop {
            let name = DatasetStore::dataset_name(&self.console.ask(prompt)?);
            if !name.is_empty() && self.store.contains(&name) {
                return Ok(name);
            }
            self.console
                .say("File not found. Please input a correct filename.\n");
        }
    }

    /// Probe a saved proxy. Returns the replacement URL when the saved one is
    /// down, `None` when it still answers.
    async fn confirm_proxy(&mut self, saved_url: &str) -> Result<Option<String>, SessionError> {
        if self.prober.probe(saved_url).await {
            self.console
                .say(&format!("Your proxy URL is still working: {saved_url}"));
            return Ok(None);
        }

        warn!(url = %saved_url, "Saved proxy unreachable");
        self.console.say(&format!("Cannot connect to {saved_url}."));
        let url = self
            .ask_working_url("Please input a new proxy URL: ")
            .await?;
        Ok(Some(url))
    }

    /// Ask for a proxy URL until one answers, at most `max_url_attempts` times.
    /// Input that does not normalize to a URL counts as an attempt.
    pub(super) async fn ask_working_url(&mut self, prompt: &str) -> Result<String, SessionError> {
        let attempts = self.settings.max_url_attempts.max(1);

        for attempt in 1..=attempts {
            let input = self.console.ask(prompt)?;
            let url = match normalize_proxy_url(&input) {
                Ok(url) => url,
                Err(e) => {
                    self.console.say(&format!("{e}. Please try again."));
                    continue;
                }
            };

            if self.prober.probe(&url).await {
                info!(url = %url, "Proxy reachable");
                return Ok(url);
            }
            warn!(url = %url, attempt, "Proxy unreachable");
            self.console
                .say(&format!("Cannot connect to {url}. Please try a different URL."));
        }

        Err(SessionError::ProxyUnreachable(attempts))
    }

    /// Search, drop dead links, then sort and show until the user is done.
    async fn search_and_review(&mut self, config: &SearchConfig) -> Result<(), SessionError> {
        let queries = build_queries(config)?;
        self.console.say("\nSearching...please wait a moment.\n");

        let (records, failures) = match run_search(
            self.searcher.as_ref(),
            &config.proxy_base_url,
            &queries,
            self.settings.fetch_concurrency,
        )
        .await
        {
            Ok(outcome) => (outcome.records, outcome.failures),
            Err(SearchError::AllQueriesFailed(failures)) => (Vec::new(), failures),
            Err(e) => return Err(e.into()),
        };

        for failure in &failures {
            self.console.say(&format!(
                "Warning: search {} failed: {}",
                failure.query, failure.error
            ));
        }
        self.console
            .say(&format!("Found {} potential results.\n", records.len()));
        if records.is_empty() {
            return Ok(());
        }

        self.console.say("Checking for and removing dead URLs...\n");
        let filtered =
            filter_dead_links(self.prober.as_ref(), records, self.settings.probe_concurrency)
                .await;
        if !filtered.dropped.is_empty() {
            self.console
                .say(&format!("Removed {} dead results.", filtered.dropped.len()));
        }
        self.console
            .say(&format!("Found {} working results.\n", filtered.kept.len()));
        if filtered.kept.is_empty() {
            return Ok(());
        }

        let mut records = filtered.kept;
        loop {
            let criterion = ask_choice::<SortCriterion>(&mut self.console, &sort_menu())?;
            records = self.sort(records, criterion);
            self.display(&records).await;

            if !ask_yes_no(
                &mut self.console,
                "Would you like to sort the results differently? (y/n): ",
            )? {
                break;
            }
        }

        self.console
            .say("Ok, let's close down or save the data...\n");
        Ok(())
    }

    fn sort(&mut self, records: Vec<TorrentRecord>, criterion: SortCriterion) -> Vec<TorrentRecord> {
        match self.rng.as_mut() {
            Some(rng) => sort_records(records, criterion, rng),
            None => sort_records(records, criterion, &mut StdRng::from_entropy()),
        }
    }

    async fn display(&mut self, records: &[TorrentRecord]) {
        let limit = self.settings.link_limit;
        if limit > 0 {
            self.console.say(&format!(
                "\nNOTICE:\nThe first {limit} results include relevant URLs from the torrent's page \
                 (e.g., screenshots).\nThese URLs have not been checked.\n"
            ));
        }

        for (index, record) in records.iter().enumerate() {
            let mut text = format_record(record, &Local);
            if index < limit {
                match self.searcher.description_links(&record.id).await {
                    Ok(links) => text.push_str(&format_links(&links)),
                    Err(e) => {
                        warn!(id = %record.id, error = %e, "Could not fetch description links");
                        text.push_str("Relevant links unavailable.\n");
                    }
                }
            }
            self.console.say(&text);
        }
    }
}

fn sort_menu() -> String {
    let mut menu = String::from("How would you like to sort the results?\n");
    for criterion in SortCriterion::ALL {
        menu.push_str(&format!("- {}: ({})\n", criterion.label(), criterion.key()));
    }
    menu
}
