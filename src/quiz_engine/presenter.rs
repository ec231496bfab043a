//! Presentation contract and a line-oriented terminal implementation.
//!
//! Presenters hold no authoritative state: they only draw what the session
//! hands them.

use std::io::{self, Write};

use crate::quiz_engine::models::{Outcome, Question};

pub trait Presenter {
    fn render_question(&mut self, question: &Question);
    /// Show the verdict. `question` is the one that was answered, so the
    /// presenter can mark both the chosen and the correct option.
    fn render_outcome(&mut self, outcome: &Outcome, question: &Question);
    fn render_score(&mut self, score: u32, total: u32);
    fn render_status(&mut self, message: &str);
    /// Shown instead of a question while fewer than four entries are loaded.
    fn render_empty_state(&mut self);
}

/// Writes plain text to any `io::Write` (stdout in the binary, a `Vec<u8>` in tests).
pub struct TerminalPresenter<W: Write> {
    out: W,
}

impl TerminalPresenter<io::Stdout> {
    pub fn stdout() -> Self {
        TerminalPresenter { out: io::stdout() }
    }
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        TerminalPresenter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        let result = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush());
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to write to terminal");
        }
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn render_question(&mut self, question: &Question) {
        let mut text = format!("\nWhich state uses \u{201c}{}\u{201d}?\n", question.nickname);
        for (i, option) in question.options.iter().enumerate() {
            text.push_str(&format!("  {}) {option}\n", i + 1));
        }
        self.emit(&text);
    }

    fn render_outcome(&mut self, outcome: &Outcome, question: &Question) {
        let mut text = if outcome.is_correct {
            String::from("Correct!\n")
        } else {
            format!("Wrong. Correct answer: {}\n", outcome.correct_state)
        };
        for (i, option) in question.options.iter().enumerate() {
            let mark = if *option == outcome.correct_state {
                "+"
            } else if *option == outcome.selected {
                "x"
            } else {
                " "
            };
            text.push_str(&format!("  [{mark}] {}) {option}\n", i + 1));
        }
        text.push_str("Type 'next' for another question.\n");
        self.emit(&text);
    }

    fn render_score(&mut self, score: u32, total: u32) {
        self.emit(&format!("Score: {score}/{total}\n"));
    }

    fn render_status(&mut self, message: &str) {
        self.emit(&format!("{message}\n"));
    }

    fn render_empty_state(&mut self) {
        self.emit("No quiz loaded yet. Load a file with 'load <path>' or type 'sample'.\n");
    }
}
