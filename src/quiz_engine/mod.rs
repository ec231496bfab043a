//! Core quiz engine — dataset normalization, question building, scoring and
//! the session that ties them to a presenter.
//!
//! ## Module overview
//!
//! | Module      | Purpose |
//! |-------------|---------|
//! | `models`    | Shared types: entries, questions, outcomes, round state |
//! | `error`     | `QuizError` and the `QuizResult` alias |
//! | `shuffle`   | Fisher-Yates shuffle over an injected RNG |
//! | `dataset`   | Header detection, row filtering, deduplication, sample pool |
//! | `source`    | Reading JSON / CSV / TSV files into raw rows |
//! | `engine`    | `RoundEngine` — question lifecycle and score keeping |
//! | `feedback`  | Feedback tunes and notifiers |
//! | `presenter` | Presentation contract and the terminal presenter |
//! | `session`   | `QuizSession` — loads, commands, and rendering |

pub mod dataset;
pub mod engine;
pub mod error;
pub mod feedback;
pub mod models;
pub mod presenter;
pub mod session;
pub mod shuffle;
pub mod source;

// Re-export the public API surface so callers can use
// `quiz_engine::RoundEngine` without reaching into sub-modules.
pub use dataset::{normalize_rows, parse_dataset, sample_entries, Cell, RawRow, SAMPLE_ENTRIES};
pub use engine::RoundEngine;
pub use error::{QuizError, QuizResult};
pub use feedback::{FeedbackNotifier, SilentNotifier, TerminalBell, Tune};
pub use models::{Entry, Outcome, Question, RoundSnapshot, RoundState, MIN_ENTRIES, OPTION_COUNT};
pub use presenter::{Presenter, TerminalPresenter};
pub use session::{LoadOrigin, LoadTicket, QuizSession};
pub use source::read_rows;
