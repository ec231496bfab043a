//! # plate_quiz
//!
//! A multiple-choice quiz over US license plate nicknames.
//!
//! A table of (state, nickname) pairs is loaded from a spreadsheet export,
//! one nickname is shown, and the player picks the matching state from four
//! options. Score and total are kept across questions until the round is reset.
//!
//! ## How it works
//!
//! 1. Rows from a `.json`, `.csv` or `.tsv` file are read into [`RawRow`]s and
//!    normalized into a deduplicated pool of [`Entry`] values. Column headers
//!    are matched loosely (`state`, `nickname`, `plate`, `slogan`, ...).
//! 2. A [`RoundEngine`] picks the correct entry, three distractor states, and
//!    shuffles the four options using an injected RNG.
//! 3. A [`QuizSession`] forwards answers to the engine and reports every
//!    change to a [`Presenter`] and a [`FeedbackNotifier`].
//!
//! ## Quick start
//!
//! ```rust
//! use plate_quiz::{sample_entries, RoundEngine};
//!
//! let mut engine = RoundEngine::seeded(sample_entries(), Some(42));
//! let question = engine.start_round().unwrap().clone();
//! println!("Which state uses {:?}?", question.nickname);
//!
//! let outcome = engine.submit_answer(&question.correct_state).unwrap();
//! assert!(outcome.is_correct);
//! assert_eq!(engine.state().score, 1);
//!
//! // Move on, never repeating the state just asked about.
//! let next = engine.next_question().unwrap();
//! assert_ne!(next.correct_state, question.correct_state);
//! ```

pub mod config;
pub mod quiz_engine;

// Convenience re-exports so callers can use `plate_quiz::RoundEngine`
// directly without reaching into `quiz_engine::`.
pub use config::Config;
pub use quiz_engine::{
    normalize_rows, parse_dataset, read_rows, sample_entries, Cell, Entry, FeedbackNotifier,
    LoadOrigin, LoadTicket, Outcome, Presenter, Question, QuizError, QuizResult, QuizSession,
    RawRow, RoundEngine, RoundSnapshot, RoundState, SilentNotifier, TerminalBell,
    TerminalPresenter, Tune,
};
