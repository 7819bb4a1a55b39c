pub mod config;
pub mod dataset;
pub mod probe;
pub mod searcher;
pub mod session;
pub mod sorter;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, Config,
    ConfigError,
};
pub use dataset::{DatasetError, DatasetStore, SaveMode, SearchConfig};
pub use probe::{filter_dead_links, normalize_proxy_url, HttpProber, LinkProber, ProbeError};
pub use searcher::{
    build_queries, run_search, ApibaySearcher, IndexSearcher, Query, SearchError, TorrentRecord,
};
pub use session::{Console, Session, SessionError, SessionMode, SessionSettings};
pub use sorter::{sort_records, SortCriterion};
