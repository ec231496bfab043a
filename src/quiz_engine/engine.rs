//! Round engine: owns the entry pool and the round state, builds questions
//! and judges answers.
//!
//! Every operation either completes or leaves the state exactly as it was.
//! Randomness comes from the injected `Rng`, so a seeded engine replays the
//! same sequence of questions.

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::quiz_engine::{
    error::{QuizError, QuizResult},
    models::{Entry, Outcome, Question, RoundSnapshot, RoundState, MIN_ENTRIES, OPTION_COUNT},
    shuffle::{shuffle_in_place, shuffled},
};

/// How many times to re-roll the correct entry when it repeats the previous
/// nickname. After that the repeat is accepted.
pub const REPEAT_REROLLS: usize = 8;

/// Number of different state names in `entries`.
pub fn distinct_states(entries: &[Entry]) -> usize {
    let mut states: Vec<&str> = entries.iter().map(|e| e.state.as_str()).collect();
    states.sort_unstable();
    states.dedup();
    states.len()
}

/// A question needs four entries naming four different states.
pub fn is_playable_pool(entries: &[Entry]) -> bool {
    entries.len() >= MIN_ENTRIES && distinct_states(entries) >= OPTION_COUNT
}

/// Reject pools [`RoundEngine`] could not build a question from.
pub fn ensure_playable_pool(entries: &[Entry]) -> QuizResult<()> {
    if is_playable_pool(entries) {
        Ok(())
    } else {
        Err(QuizError::InsufficientEntries { available: distinct_states(entries) })
    }
}

pub struct RoundEngine<R: Rng = StdRng> {
    entries: Vec<Entry>,
    state: RoundState,
    rng: R,
}

impl RoundEngine<StdRng> {
    /// Engine backed by `StdRng`; `Some(seed)` makes every question reproducible.
    pub fn seeded(entries: Vec<Entry>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None       => StdRng::from_entropy(),
        };
        RoundEngine::with_rng(entries, rng)
    }
}

impl<R: Rng> RoundEngine<R> {
    pub fn with_rng(entries: Vec<Entry>, rng: R) -> Self {
        RoundEngine {
            entries,
            state: RoundState::default(),
            rng,
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.state.current_question.as_ref()
    }

    /// Swap in a new pool. The round state is left alone; callers follow up
    /// with [`restart`](Self::restart).
    pub fn replace_entries(&mut self, entries: Vec<Entry>) {
        tracing::info!(entries = entries.len(), "entry pool replaced");
        self.entries = entries;
    }

    pub fn is_playable(&self) -> bool {
        is_playable_pool(&self.entries)
    }

    fn ensure_playable(&self) -> QuizResult<()> {
        ensure_playable_pool(&self.entries)
    }

    /// Zero the score and build the first question of a fresh round.
    pub fn start_round(&mut self) -> QuizResult<&Question> {
        self.ensure_playable()?;
        self.state.reset();
        self.build_question(None)
    }

    /// Like [`start_round`](Self::start_round), but steers the first question
    /// away from the state that was just on screen.
    pub fn restart(&mut self) -> QuizResult<&Question> {
        self.ensure_playable()?;
        let previous = self.state.current_question.as_ref().map(|q| q.correct_state.clone());
        self.state.reset();
        tracing::info!(exclude = ?previous, "round restarted");
        self.build_question(previous.as_deref())
    }

    /// Advance after an answer, avoiding the state just asked about.
    pub fn next_question(&mut self) -> QuizResult<&Question> {
        let previous = self.state.current_question.as_ref().map(|q| q.correct_state.clone());
        self.build_question(previous.as_deref())
    }

    pub fn build_question(&mut self, exclude_state: Option<&str>) -> QuizResult<&Question> {
        self.ensure_playable()?;

        // Ignore the exclusion when it would leave nothing to ask.
        let pool: Vec<&Entry> = match exclude_state {
            Some(ex) if self.entries.iter().any(|e| e.state != ex) => {
                self.entries.iter().filter(|e| e.state != ex).collect()
            }
            _ => self.entries.iter().collect(),
        };

        let mut correct = pool[self.rng.gen_range(0..pool.len())];
        if let Some(previous) = &self.state.current_question {
            if pool.len() > 1 {
                // Compares nicknames, not states.
                for _ in 0..REPEAT_REROLLS {
                    if correct.nickname != previous.nickname {
                        break;
                    }
                    correct = pool[self.rng.gen_range(0..pool.len())];
                }
            }
        }

        let mut others: Vec<&str> = Vec::new();
        for e in &self.entries {
            if e.state != correct.state && !others.contains(&e.state.as_str()) {
                others.push(&e.state);
            }
        }
        let mut options: Vec<String> = shuffled(&others, &mut self.rng)
            .into_iter()
            .take(OPTION_COUNT - 1)
            .map(str::to_string)
            .collect();
        options.push(correct.state.clone());
        shuffle_in_place(&mut options, &mut self.rng);

        let question = Question {
            nickname: correct.nickname.clone(),
            correct_state: correct.state.clone(),
            options,
        };
        tracing::debug!(
            nickname = %question.nickname,
            correct_state = %question.correct_state,
            "built question"
        );

        self.state.answered = false;
        let question: &Question = self.state.current_question.insert(question);
        Ok(question)
    }

    /// Judge `selected` against the current question.
    ///
    /// Returns `None` without touching anything when there is no question or
    /// it has already been answered.
    pub fn submit_answer(&mut self, selected: &str) -> Option<Outcome> {
        if self.state.answered {
            return None;
        }
        let question = self.state.current_question.as_ref()?;
        let outcome = Outcome {
            is_correct: selected == question.correct_state,
            selected: selected.to_string(),
            correct_state: question.correct_state.clone(),
        };

        self.state.answered = true;
        self.state.total += 1;
        if outcome.is_correct {
            self.state.score += 1;
        }
        tracing::debug!(
            correct = outcome.is_correct,
            score = self.state.score,
            total = self.state.total,
            "answer submitted"
        );
        Some(outcome)
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            entry_count: self.entries.len(),
            score: self.state.score,
            total: self.state.total,
            answered: self.state.answered,
            question: self.state.current_question.clone(),
        }
    }
}
