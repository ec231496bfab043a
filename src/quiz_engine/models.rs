use std::fmt;
use serde::{Deserialize, Serialize};

/// Smallest pool that can fill one correct option plus three distractors.
pub const MIN_ENTRIES: usize = 4;

/// Number of options shown for every question.
pub const OPTION_COUNT: usize = 4;

// ---------------------------------------------------------------------------
// Dataset primitives
// ---------------------------------------------------------------------------

/// One normalized (state, nickname) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    pub state: String,
    pub nickname: String,
}

impl Entry {
    pub fn new(state: impl Into<String>, nickname: impl Into<String>) -> Self {
        Entry {
            state: state.into(),
            nickname: nickname.into(),
        }
    }

    /// Case-insensitive identity used for deduplication.
    pub fn dedupe_key(&self) -> String {
        format!("{}|{}", self.state.to_lowercase(), self.nickname.to_lowercase())
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.state, self.nickname)
    }
}

// ---------------------------------------------------------------------------
// Question / outcome types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub nickname: String,
    pub correct_state: String,
    /// Four distinct state names in shuffled order, one of them `correct_state`.
    pub options: Vec<String>,
}

impl Question {
    /// Position of the correct state within `options`.
    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|o| o == &self.correct_state)
    }

    /// Resolve a 1-based option number to the state name shown there.
    pub fn option_label(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|i| self.options.get(i))
            .map(String::as_str)
    }
}

/// What `submit_answer` reports back to the presenter and notifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub is_correct: bool,
    pub selected: String,
    pub correct_state: String,
}

// ---------------------------------------------------------------------------
// Round state
// ---------------------------------------------------------------------------

/// Mutable bookkeeping for one round. `score <= total` always holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    pub score: u32,
    pub total: u32,
    pub answered: bool,
    pub current_question: Option<Question>,
}

impl RoundState {
    pub fn reset(&mut self) {
        *self = RoundState::default();
    }
}

/// Read-only view of the engine handed to presenters and serialisers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub entry_count: usize,
    pub score: u32,
    pub total: u32,
    pub answered: bool,
    pub question: Option<Question>,
}

impl RoundSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
