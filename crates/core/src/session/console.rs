//! Prompt/response plumbing shared by every session stage.

use std::str::FromStr;

use super::SessionError;

pub const INVALID_OPTION: &str = "Please input a valid option.\n";

/// Where a session reads answers from and writes messages to.
///
/// The binary talks to stdin/stdout; tests use a scripted console.
pub trait Console: Send {
    /// Show `prompt` and return the reply without its line terminator.
    /// Returns `SessionError::InputClosed` once no more input can arrive.
    fn ask(&mut self, prompt: &str) -> Result<String, SessionError>;

    /// Show a message.
    fn say(&mut self, message: &str);
}

/// Ask until the reply parses as `T`.
pub fn ask_choice<T: FromStr>(
    console: &mut dyn Console,
    prompt: &str,
) -> Result<T, SessionError> {
    loop {
        let reply = console.ask(prompt)?;
        match reply.trim().parse::<T>() {
            Ok(choice) => return Ok(choice),
            Err(_) => console.say(INVALID_OPTION),
        }
    }
}

/// Ask a y/n question.
pub fn ask_yes_no(console: &mut dyn Console, prompt: &str) -> Result<bool, SessionError> {
    ask_choice::<YesNo>(console, prompt).map(|answer| answer == YesNo::Yes)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum YesNo {
    Yes,
    No,
}

impl FromStr for YesNo {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "y" | "yes" => Ok(Self::Yes),
            "n" | "no" => Ok(Self::No),
            _ => Err(()),
        }
    }
}

/// First menu shown when saved datasets exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartChoice {
    Fresh,
    Load,
    Clean,
}

impl FromStr for StartChoice {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "f" => Ok(Self::Fresh),
            "l" => Ok(Self::Load),
            "c" => Ok(Self::Clean),
            _ => Err(()),
        }
    }
}

/// What to do with a loaded dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadChoice {
    Amend,
    AsIs,
}

impl FromStr for LoadChoice {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "a" => Ok(Self::Amend),
            "s" => Ok(Self::AsIs),
            _ => Err(()),
        }
    }
}

/// After an edit round: edit more or run the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmendNext {
    MoreChanges,
    Search,
}

impl FromStr for AmendNext {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "a" => Ok(Self::MoreChanges),
            "s" => Ok(Self::Search),
            _ => Err(()),
        }
    }
}

/// Save options after searching with an amended dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmendSave {
    Overwrite,
    SaveNew,
    ViewChanges,
    Exit,
}

impl FromStr for AmendSave {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "o" => Ok(Self::Overwrite),
            "s" => Ok(Self::SaveNew),
            "v" => Ok(Self::ViewChanges),
            "e" => Ok(Self::Exit),
            _ => Err(()),
        }
    }
}

/// Save options once the changes have been reviewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewedSave {
    Overwrite,
    SaveNew,
    NoChanges,
}

impl FromStr for ReviewedSave {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "o" => Ok(Self::Overwrite),
            "s" => Ok(Self::SaveNew),
            "m" => Ok(Self::NoChanges),
            _ => Err(()),
        }
    }
}
