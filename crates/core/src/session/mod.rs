//! Interactive search session.
//!
//! A session is a chain of prompt/response stages: pick or create a dataset,
//! make sure its proxy answers, search, sort and show the results, then offer
//! to save. All input and output goes through a [`Console`].

mod console;
mod render;
mod save;
mod shell;

pub use console::{
    ask_choice, ask_yes_no, AmendNext, AmendSave, Console, LoadChoice, ReviewedSave, StartChoice,
    INVALID_OPTION,
};
pub use render::{format_links, format_list, format_record};
pub use shell::{Session, SessionMode, SessionSettings};

use thiserror::Error;

use crate::dataset::DatasetError;
use crate::probe::ProbeError;
use crate::searcher::SearchError;

/// Errors that end a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Probe(#[from] ProbeError),

    #[error("No working proxy URL after {0} attempts")]
    ProxyUnreachable(u32),

    #[error("Input closed before the session finished")]
    InputClosed,

    #[error("Console error: {0}")]
    Console(String),
}
