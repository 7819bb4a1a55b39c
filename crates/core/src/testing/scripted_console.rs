//! Console fed from a fixed list of answers.

use std::collections::VecDeque;

use crate::session::{Console, SessionError};

/// One line of console traffic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEvent {
    Prompt(String),
    Message(String),
}

/// Console that answers prompts from a script and records everything shown.
///
/// Once the script runs out, `ask` fails with `SessionError::InputClosed`,
/// so a session that asks more than expected stops instead of looping.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    answers: VecDeque<String>,
    events: Vec<ConsoleEvent>,
}

impl ScriptedConsole {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            events: Vec::new(),
        }
    }

    pub fn events(&self) -> &[ConsoleEvent] {
        &self.events
    }

    pub fn prompts(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ConsoleEvent::Prompt(p) => Some(p.as_str()),
                ConsoleEvent::Message(_) => None,
            })
            .collect()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ConsoleEvent::Message(m) => Some(m.as_str()),
                ConsoleEvent::Prompt(_) => None,
            })
            .collect()
    }

    /// Everything shown, prompts included, as one string.
    pub fn output(&self) -> String {
        self.events
            .iter()
            .map(|e| match e {
                ConsoleEvent::Prompt(text) | ConsoleEvent::Message(text) => text.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Answers not consumed yet.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Console for ScriptedConsole {
    fn ask(&mut self, prompt: &str) -> Result<String, SessionError> {
        self.events.push(ConsoleEvent::Prompt(prompt.to_string()));
        self.answers.pop_front().ok_or(SessionError::InputClosed)
    }

    fn say(&mut self, message: &str) {
        self.events.push(ConsoleEvent::Message(message.to_string()));
    }
}
