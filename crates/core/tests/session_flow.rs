//! Session integration tests.
//!
//! These tests drive whole sessions through a scripted console against the
//! mock searcher and prober:
//! - Fresh search followed by a save
//! - Loading a dataset whose proxy went down
//! - Amending a dataset and reconciling the changes
//! - Cleaning a dataset from the start menu

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

use piratesearch_core::{
    dataset::SaveMode,
    testing::{fixtures, MockProber, MockSearcher, ScriptedConsole},
    DatasetStore, Query, SearchConfig, SearchError, Session, SessionError, SessionSettings,
    TorrentRecord,
};

/// Test helper owning the mocks and the dataset directory.
struct TestHarness {
    searcher: Arc<MockSearcher>,
    prober: Arc<MockProber>,
    dir: TempDir,
}

impl TestHarness {
    async fn new() -> Self {
        let searcher = Arc::new(MockSearcher::new());
        searcher
            .set_fallback_results(vec![
                seeded(fixtures::uploaded_by("debian-12", "h1", "Alice"), 40),
                seeded(fixtures::uploaded_by("arch-2024", "h2", "Bob"), 90),
                seeded(fixtures::uploaded_by("gentoo", "h3", "Carol"), 5),
            ])
            .await;

        Self {
            searcher,
            prober: Arc::new(MockProber::reachable()),
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    fn store(&self) -> DatasetStore {
        DatasetStore::new(self.dir.path())
    }

    fn save(&self, name: &str, config: &SearchConfig) {
        self.store()
            .save(name, config, SaveMode::NewFile)
            .expect("Failed to seed dataset");
    }

    fn session(&self, answers: &[&str]) -> Session<ScriptedConsole> {
        Session::new(
            ScriptedConsole::new(answers.iter().copied()),
            self.searcher.clone(),
            self.prober.clone(),
            self.store(),
            SessionSettings {
                link_limit: 1,
                ..SessionSettings::default()
            },
        )
        .with_rng(StdRng::seed_from_u64(7))
    }
}

fn seeded(mut record: TorrentRecord, seeders: u32) -> TorrentRecord {
    record.seeders = seeders;
    record
}

#[tokio::test]
async fn test_fresh_search_then_save() {
    let harness = TestHarness::new().await;
    harness
        .searcher
        .set_description_links("debian-12", vec!["https://img.example/1.png".to_string()])
        .await;

    let mut session = harness.session(&[
        "www.tpb.example/",
        "alice, BOB",
        "Linux",
        "s",
        "n",
        "y",
        "My Set",
    ]);
    session.run().await.expect("Session failed");

    let console = session.into_console();
    assert_eq!(console.remaining(), 0);
    let output = console.output();
    assert!(output.contains("Found 2 potential results."));
    assert!(output.contains("Found 2 working results."));
    assert!(output.contains("Your data set has been saved as my set."));

    // Most seeded first, and only the first record gets its links
    let arch = output.find("arch-2024\n").expect("arch shown");
    let debian = output.find("debian-12\n").expect("debian shown");
    assert!(arch < debian);
    assert_eq!(output.matches("Relevant links:").count(), 1);
    assert!(!output.contains("gentoo"));

    let searches = harness.searcher.recorded_searches().await;
    let queries: Vec<_> = searches.iter().map(|s| s.query.clone()).collect();
    assert_eq!(
        queries,
        vec![Query::new("Alice", "linux"), Query::new("Bob", "linux")]
    );
    assert!(searches
        .iter()
        .all(|s| s.proxy_base_url == "https://tpb.example"));

    let saved = harness.store().load("my set").unwrap();
    assert_eq!(saved, fixtures::search_config(&["Alice", "Bob"], &["linux"]));
}

#[tokio::test]
async fn test_fresh_search_declines_save() {
    let harness = TestHarness::new().await;
    let mut session = harness.session(&["tpb.example", "", "linux", "r", "y", "n", "n", "n"]);

    session.run().await.expect("Session failed");

    assert!(harness.store().list().unwrap().is_empty());
    assert!(session
        .console()
        .output()
        .contains("Found 3 working results."));
}

#[tokio::test]
async fn test_fresh_save_conflict_asks_again() {
    let harness = TestHarness::new().await;
    harness.save("taken", &fixtures::search_config(&["Zed"], &[]));

    let mut session = harness.session(&[
        "f",
        "tpb.example",
        "carol",
        "",
        "n",
        "n",
        "y",
        "Taken.csv",
        "other",
    ]);
    session.run().await.expect("Session failed");

    let output = session.console().output();
    assert!(output.contains("A data set named taken already exists."));
    assert_eq!(harness.store().list().unwrap(), vec!["other", "taken"]);
    assert_eq!(
        harness.store().load("taken").unwrap().usernames,
        vec!["Zed"]
    );
}

#[tokio::test]
async fn test_dead_links_are_dropped() {
    let harness = TestHarness::new().await;
    harness
        .prober
        .mark_dead("https://tpb.example/description.php?id=debian-12")
        .await;

    let mut session = harness.session(&["tpb.example", "alice, bob", "", "o", "n", "n"]);
    session.run().await.expect("Session failed");

    let output = session.console().output();
    assert!(output.contains("Found 2 potential results."));
    assert!(output.contains("Removed 1 dead results."));
    assert!(output.contains("Found 1 working results."));
    assert!(!output.contains("debian-12\n"));
}

#[tokio::test]
async fn test_failed_queries_are_warnings() {
    let harness = TestHarness::new().await;
    harness
        .searcher
        .fail_query(&Query::by_user("Alice"), SearchError::Timeout)
        .await;

    let mut session = harness.session(&["tpb.example", "alice, bob", "", "n", "n", "n"]);
    session.run().await.expect("Session failed");

    let output = session.console().output();
    assert!(output.contains("Warning: search user=Alice term=* failed: Request timeout"));
    assert!(output.contains("Found 1 potential results."));
}

#[tokio::test]
async fn test_load_as_is_replaces_dead_proxy() {
    let harness = TestHarness::new().await;
    harness.save(
        "music",
        &SearchConfig::new("https://old.example", ["Bob"], ["arch"]),
    );
    harness.prober.mark_dead("https://old.example").await;

    let mut session = harness.session(&["l", "s", "nope", "Music.csv", "new.example", "n", "n"]);
    session.run().await.expect("Session failed");

    let output = session.console().output();
    assert!(output.contains("File not found."));
    assert!(output.contains("Cannot connect to https://old.example."));
    assert!(output.contains("nothing to save"));

    let saved = harness.store().load("music").unwrap();
    assert_eq!(saved.proxy_base_url, "https://new.example");
    assert_eq!(saved.usernames, vec!["Bob"]);

    let searches = harness.searcher.recorded_searches().await;
    assert_eq!(searches.len(), 1);
    assert_eq!(searches[0].proxy_base_url, "https://new.example");
}

#[tokio::test]
async fn test_load_as_is_gives_up_on_proxy() {
    let harness = TestHarness::new().await;
    harness.save(
        "music",
        &SearchConfig::new("https://old.example", ["Bob"], ["arch"]),
    );
    let prober = Arc::new(MockProber::unreachable());
    let mut session = Session::new(
        ScriptedConsole::new(["l", "s", "music", "a.example", "b.example", "c.example"]),
        harness.searcher.clone(),
        prober,
        harness.store(),
        SessionSettings::default(),
    );

    let err = session.run().await.unwrap_err();
    assert!(matches!(err, SessionError::ProxyUnreachable(3)));
    assert_eq!(harness.searcher.search_count().await, 0);
}

#[tokio::test]
async fn test_amend_then_review_and_overwrite() {
    let harness = TestHarness::new().await;
    harness.save(
        "music",
        &SearchConfig::new("https://tpb.example", ["Alice"], ["linux"]),
    );

    let mut session = harness.session(&[
        "l", "a", "music", // start menu, amend, dataset
        "n", // keep the working proxy
        "n", "y", "bob", // usernames: add Bob
        "y", "linux", "y", "bsd", // terms: swap linux for bsd
        "s", // search
        "n", "n", // sort newest, no re-sort
        "v", // view changes
        "c", // combine usernames
        "o", // overwrite terms
        "o", // overwrite the dataset
    ]);
    session.run().await.expect("Session failed");

    let console = session.into_console();
    assert_eq!(console.remaining(), 0);
    let output = console.output();
    assert!(output.contains("You did not change the URL."));
    assert!(output.contains("The usernames have been changed.\nOld: [Alice]\nNew: [Alice, Bob]"));
    assert!(output.contains("Data set music has been updated."));

    let saved = harness.store().load("music").unwrap();
    assert_eq!(saved.usernames, vec!["Alice", "Bob"]);
    assert_eq!(saved.search_terms, vec!["bsd"]);
}

#[tokio::test]
async fn test_amend_exit_without_saving() {
    let harness = TestHarness::new().await;
    let original = SearchConfig::new("https://tpb.example", ["Alice"], ["linux"]);
    harness.save("music", &original);

    let mut session = harness.session(&[
        "l", "a", "music", "n", // keep proxy
        "y", "alice", "n", // remove Alice
        "n", "n", // terms untouched
        "a", // further changes
        "n", "n", "y", "carol", "n", "n", // add Carol
        "s", "m", "n", "e",
    ]);
    session.run().await.expect("Session failed");

    let output = session.console().output();
    assert!(output.contains("Updated usernames: []"));
    assert!(output.contains("Updated usernames: [Carol]"));
    assert!(output.contains("Exiting the program without saving."));
    assert_eq!(harness.store().load("music").unwrap(), original);

    let queries: Vec<_> = harness
        .searcher
        .recorded_searches()
        .await
        .into_iter()
        .map(|s| s.query)
        .collect();
    assert_eq!(queries, vec![Query::new("Carol", "linux")]);
}

#[cfg(unix)]
#[tokio::test]
async fn test_amend_overwrite_refused_on_read_only_file() {
    use std::fs::{self, OpenOptions, Permissions};
    use std::os::unix::fs::PermissionsExt;

    let harness = TestHarness::new().await;
    let original = SearchConfig::new("https://tpb.example", ["Alice"], ["linux"]);
    harness.save("music", &original);
    let path = harness.store().path_for("music");
    fs::set_permissions(&path, Permissions::from_mode(0o444)).unwrap();
    if OpenOptions::new().write(true).open(&path).is_ok() {
        // Permission bits are not enforced for this user (e.g. root)
        return;
    }

    let mut session = harness.session(&[
        "l", "a", "music", "n", // keep proxy
        "n", "y", "bob", // add Bob
        "n", "n", // terms untouched
        "s", "n", "n", // search, sort newest, no re-sort
        "o", // overwrite is refused
        "e",
    ]);
    session.run().await.expect("Session failed");

    let console = session.into_console();
    assert_eq!(console.remaining(), 0);
    let output = console.output();
    assert!(output.contains("Please choose another option."));
    assert!(!output.contains("has been updated"));
    assert!(output.contains("Exiting the program without saving."));
    assert_eq!(harness.store().load("music").unwrap(), original);
}

#[tokio::test]
async fn test_amend_removing_everything_asks_again() {
    let harness = TestHarness::new().await;
    let original = SearchConfig::new("https://tpb.example", ["Alice"], ["linux"]);
    harness.save("music", &original);

    let mut session = harness.session(&[
        "l", "a", "music", "n", // keep proxy
        "y", "alice", "n", // remove Alice
        "y", "linux", "n", // remove linux
        "s", // nothing left to search with
        "n", "n", "y", "bob", "n", "n", // add Bob
        "s", "n", "n", "e",
    ]);
    session.run().await.expect("Session failed");

    let console = session.into_console();
    assert_eq!(console.remaining(), 0);
    let output = console.output();
    assert!(output.contains("Updated search terms: []"));
    assert!(output.contains("Please input at least one username or search term."));
    assert!(output.contains("Exiting the program without saving."));
    assert_eq!(harness.store().load("music").unwrap(), original);

    let queries: Vec<_> = harness
        .searcher
        .recorded_searches()
        .await
        .into_iter()
        .map(|s| s.query)
        .collect();
    assert_eq!(queries, vec![Query::by_user("Bob")]);
}

#[tokio::test]
async fn test_clean_from_start_menu() {
    let harness = TestHarness::new().await;
    harness.save(
        "dups",
        &SearchConfig {
            proxy_base_url: "https://tpb.example".to_string(),
            usernames: vec!["Alice".into(), "Bob".into(), "Alice".into()],
            search_terms: vec!["linux".into(), "linux".into()],
        },
    );

    let mut session = harness.session(&["x", "c", "dups"]);
    let err = session.run().await.unwrap_err();

    // The script ends at the start menu shown again after cleaning
    assert!(matches!(err, SessionError::InputClosed));
    assert!(session
        .console()
        .output()
        .contains("Please input a valid option."));

    let cleaned = harness.store().load("dups").unwrap();
    assert_eq!(cleaned.usernames, vec!["Alice", "Bob"]);
    assert_eq!(cleaned.search_terms, vec!["linux"]);
}
