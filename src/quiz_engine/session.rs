//! One quiz session: the round engine plus the presenter and notifier it
//! reports to, and the dataset loads that feed it.
//!
//! ## Load ordering
//!
//! Every load (bundled file, user file, sample data) takes a [`LoadTicket`]
//! from a monotonic counter. A load that completes after a newer one was
//! started is discarded, so the most recently *started* load always wins.

use std::path::Path;

use rand::{rngs::StdRng, Rng};

use crate::quiz_engine::{
    dataset::{parse_dataset, sample_entries},
    engine::{ensure_playable_pool, RoundEngine},
    error::{QuizError, QuizResult},
    feedback::FeedbackNotifier,
    models::{Entry, Outcome, RoundSnapshot},
    presenter::Presenter,
    source::{display_name, read_rows},
};

/// Where a load came from; decides the status wording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOrigin {
    /// The dataset shipped next to the program, loaded at startup.
    Bundled(String),
    /// A file the user pointed at.
    File(String),
    Sample,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    origin: LoadOrigin,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn origin(&self) -> &LoadOrigin {
        &self.origin
    }
}

pub struct QuizSession<P, N, R: Rng = StdRng> {
    engine: RoundEngine<R>,
    presenter: P,
    notifier: N,
    latest_load: u64,
    status: String,
}

impl<P: Presenter, N: FeedbackNotifier, R: Rng> QuizSession<P, N, R> {
    pub fn new(engine: RoundEngine<R>, presenter: P, notifier: N) -> Self {
        QuizSession {
            engine,
            presenter,
            notifier,
            latest_load: 0,
            status: String::new(),
        }
    }

    pub fn engine(&self) -> &RoundEngine<R> {
        &self.engine
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Last status line shown to the user.
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        self.engine.snapshot()
    }

    fn set_status(&mut self, message: String) {
        self.presenter.render_status(&message);
        self.status = message;
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    /// Start a load. Any ticket handed out earlier becomes stale.
    pub fn begin_load(&mut self, origin: LoadOrigin) -> LoadTicket {
        self.latest_load += 1;
        let message = match &origin {
            LoadOrigin::Bundled(name) => Some(format!("Loading bundled dataset ({name})...")),
            LoadOrigin::File(_) => Some("Reading file...".to_string()),
            LoadOrigin::Sample => None,
        };
        if let Some(message) = message {
            self.set_status(message);
        }
        LoadTicket { generation: self.latest_load, origin }
    }

    /// Finish a load. Returns `true` when the new pool was installed.
    ///
    /// Stale tickets are dropped silently apart from a log line. Failures,
    /// including pools with fewer than four different states, keep the
    /// previous pool and round.
    pub fn complete_load(&mut self, ticket: LoadTicket, result: QuizResult<Vec<Entry>>) -> bool {
        if ticket.generation != self.latest_load {
            tracing::warn!(
                stale = ticket.generation,
                latest = self.latest_load,
                "discarding superseded dataset load"
            );
            return false;
        }

        let result = result.and_then(|entries| ensure_playable_pool(&entries).map(|_| entries));
        match result {
            Ok(entries) => {
                let message = match &ticket.origin {
                    LoadOrigin::Bundled(_) => format!("Loaded {} rows from bundled dataset.", entries.len()),
                    LoadOrigin::File(name) => format!("Loaded {} rows from {name}.", entries.len()),
                    LoadOrigin::Sample => format!("Loaded {} sample rows.", entries.len()),
                };
                tracing::info!(origin = ?ticket.origin, entries = entries.len(), "dataset loaded");
                self.set_status(message);
                self.engine.replace_entries(entries);
                self.reset();
                true
            }
            Err(e) => {
                tracing::warn!(origin = ?ticket.origin, error = %e, "dataset load failed");
                let message = match (&ticket.origin, &e) {
                    (LoadOrigin::Bundled(_), _) => {
                        format!("Bundled dataset unavailable. Upload a file to start. ({e})")
                    }
                    (_, QuizError::SourceUnreadable { .. }) => e.to_string(),
                    _ => format!("Upload failed: {e}"),
                };
                self.set_status(message);
                if !self.engine.is_playable() {
                    self.presenter.render_empty_state();
                }
                false
            }
        }
    }

    /// Read and normalize a file in one step.
    fn load_path(&mut self, origin: LoadOrigin, path: &Path) -> bool {
        let ticket = self.begin_load(origin);
        let result = read_rows(path).and_then(|rows| parse_dataset(&rows));
        self.complete_load(ticket, result)
    }

    pub fn load_bundled(&mut self, path: &Path) -> bool {
        self.load_path(LoadOrigin::Bundled(display_name(path)), path)
    }

    pub fn load_file(&mut self, path: &Path) -> bool {
        self.load_path(LoadOrigin::File(display_name(path)), path)
    }

    pub fn use_sample_data(&mut self) -> bool {
        let ticket = self.begin_load(LoadOrigin::Sample);
        self.complete_load(ticket, Ok(sample_entries()))
    }

    // -----------------------------------------------------------------------
    // Round commands
    // -----------------------------------------------------------------------

    fn after_build(&mut self, result: QuizResult<()>) -> bool {
        match result {
            Ok(()) => {
                if let Some(q) = self.engine.current_question() {
                    self.presenter.render_question(q);
                }
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not build question");
                self.set_status(e.to_string());
                self.presenter.render_empty_state();
                false
            }
        }
    }

    /// The reset control: zero the score and ask a fresh question.
    pub fn reset(&mut self) -> bool {
        let result = self.engine.restart().map(|_| ());
        if result.is_ok() {
            let state = self.engine.state();
            self.presenter.render_score(state.score, state.total);
        }
        self.after_build(result)
    }

    /// The next control. Does nothing until the current question is answered.
    pub fn next(&mut self) -> bool {
        if self.engine.current_question().is_some() && !self.engine.state().answered {
            return false;
        }
        let result = self.engine.next_question().map(|_| ());
        self.after_build(result)
    }

    /// Submit a state name. Ignored when the question is already answered.
    pub fn answer(&mut self, selected: &str) -> Option<Outcome> {
        let outcome = self.engine.submit_answer(selected)?;
        if let Some(q) = self.engine.current_question() {
            self.presenter.render_outcome(&outcome, q);
        }
        let state = self.engine.state();
        self.presenter.render_score(state.score, state.total);
        self.notifier.notify(outcome.is_correct);
        Some(outcome)
    }

    /// Submit by 1-based option number as displayed.
    pub fn answer_option(&mut self, number: usize) -> Option<Outcome> {
        let selected = self.engine.current_question()?.option_label(number)?.to_string();
        self.answer(&selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz_engine::models::Question;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Question(Question),
        Outcome(Outcome),
        Score(u32, u32),
        Status(String),
        Empty,
    }

    #[derive(Default)]
    struct Recorder(Vec<Event>);

    impl Presenter for Recorder {
        fn render_question(&mut self, question: &Question) {
            self.0.push(Event::Question(question.clone()));
        }
        fn render_outcome(&mut self, outcome: &Outcome, _question: &Question) {
            self.0.push(Event::Outcome(outcome.clone()));
        }
        fn render_score(&mut self, score: u32, total: u32) {
            self.0.push(Event::Score(score, total));
        }
        fn render_status(&mut self, message: &str) {
            self.0.push(Event::Status(message.to_string()));
        }
        fn render_empty_state(&mut self) {
            self.0.push(Event::Empty);
        }
    }

    #[derive(Default)]
    struct Cues(Vec<bool>);

    impl FeedbackNotifier for Cues {
        fn notify(&mut self, is_correct: bool) {
            self.0.push(is_correct);
        }
    }

    fn session() -> QuizSession<Recorder, Cues> {
        QuizSession::new(RoundEngine::seeded(Vec::new(), Some(21)), Recorder::default(), Cues::default())
    }

    fn events(s: &QuizSession<Recorder, Cues>) -> &[Event] {
        &s.presenter().0
    }

    #[test]
    fn sample_data_starts_a_round() {
        let mut s = session();
        assert!(s.use_sample_data());
        assert_eq!(s.status(), "Loaded 8 sample rows.");
        assert!(matches!(
            events(&s),
            [Event::Status(_), Event::Score(0, 0), Event::Question(_)]
        ));
        assert!(s.snapshot().question.is_some());
    }

    #[test]
    fn answering_reports_outcome_score_and_cue() {
        let mut s = session();
        s.use_sample_data();
        let correct = s.snapshot().question.unwrap().correct_state;
        let outcome = s.answer(&correct).unwrap();
        assert!(outcome.is_correct);
        assert_eq!(s.notifier().0, vec![true]);
        assert!(events(&s).ends_with(&[Event::Outcome(outcome), Event::Score(1, 1)]));

        // Double submission is ignored end to end.
        let before = events(&s).len();
        assert_eq!(s.answer(&correct), None);
        assert_eq!(events(&s).len(), before);
        assert_eq!(s.notifier().0.len(), 1);
    }

    #[test]
    fn answer_by_option_number() {
        let mut s = session();
        s.use_sample_data();
        let q = s.snapshot().question.unwrap();
        let outcome = s.answer_option(1).unwrap();
        assert_eq!(outcome.selected, q.options[0]);
        assert_eq!(s.answer_option(2), None, "already answered");
    }

    #[test]
    fn out_of_range_option_is_ignored() {
        let mut s = session();
        s.use_sample_data();
        assert_eq!(s.answer_option(0), None);
        assert_eq!(s.answer_option(5), None);
        assert_eq!(s.snapshot().total, 0);
    }

    #[test]
    fn next_waits_for_an_answer() {
        let mut s = session();
        s.use_sample_data();
        let first = s.snapshot().question.unwrap();
        assert!(!s.next());
        assert_eq!(s.snapshot().question.unwrap(), first);

        s.answer_option(1);
        assert!(s.next());
        let second = s.snapshot().question.unwrap();
        assert_ne!(second.correct_state, first.correct_state);
        assert!(!s.snapshot().answered);
    }

    #[test]
    fn stale_load_is_discarded() {
        let mut s = session();
        let old = s.begin_load(LoadOrigin::File("old.csv".into()));
        let new = s.begin_load(LoadOrigin::File("new.csv".into()));
        assert!(new.generation() > old.generation());

        assert!(s.complete_load(new, Ok(sample_entries())));
        let installed = s.snapshot();

        let stale_pool = vec![
            Entry::new("A", "a"),
            Entry::new("B", "b"),
            Entry::new("C", "c"),
            Entry::new("D", "d"),
        ];
        assert!(!s.complete_load(old, Ok(stale_pool)));
        assert_eq!(s.snapshot(), installed);
        assert_eq!(s.status(), "Loaded 8 rows from new.csv.");
    }

    #[test]
    fn sample_supersedes_an_in_flight_load() {
        let mut s = session();
        let pending = s.begin_load(LoadOrigin::Bundled("plates.csv".into()));
        s.use_sample_data();
        assert!(!s.complete_load(pending, Err(QuizError::unreadable("plates.csv", "gone"))));
        assert_eq!(s.status(), "Loaded 8 sample rows.");
    }

    #[test]
    fn failed_load_keeps_previous_round() {
        let mut s = session();
        s.use_sample_data();
        s.answer_option(1);
        let before = s.snapshot();

        let ticket = s.begin_load(LoadOrigin::File("tiny.csv".into()));
        assert!(!s.complete_load(ticket, Err(QuizError::DatasetTooSmall { found: 2 })));
        assert_eq!(s.snapshot(), before);
        assert!(s.status().starts_with("Upload failed: Need at least 4"));
        assert_ne!(events(&s).last(), Some(&Event::Empty));
    }

    #[test]
    fn bundled_failure_shows_empty_state() {
        let mut s = session();
        let dir = tempfile::tempdir().unwrap();
        assert!(!s.load_bundled(&dir.path().join("plates.csv")));
        assert!(s.status().starts_with("Bundled dataset unavailable. Upload a file to start. ("));
        assert_eq!(events(&s).last(), Some(&Event::Empty));
        assert_eq!(s.snapshot().question, None);
    }

    #[test]
    fn unreadable_user_file_reports_reason() {
        let mut s = session();
        let dir = tempfile::tempdir().unwrap();
        assert!(!s.load_file(&dir.path().join("missing.csv")));
        assert!(s.status().starts_with("Could not read missing.csv:"), "{}", s.status());
    }

    #[test]
    fn file_load_replaces_pool_and_restarts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plates.csv");
        std::fs::write(
            &path,
            "State,Plate Slogan\nOhio,Birthplace of Aviation\nIdaho,Famous Potatoes\n\
             Maine,Vacationland\nUtah,Life Elevated\nohio,BIRTHPLACE OF AVIATION\n",
        )
        .unwrap();

        let mut s = session();
        s.use_sample_data();
        s.answer_option(1);
        assert!(s.load_file(&path));
        assert_eq!(s.status(), "Loaded 4 rows from plates.csv.");
        let snap = s.snapshot();
        assert_eq!((snap.entry_count, snap.score, snap.total), (4, 0, 0));
    }

    #[test]
    fn pool_with_too_few_states_is_rejected() {
        let mut s = session();
        s.use_sample_data();
        let before = s.snapshot();

        let ticket = s.begin_load(LoadOrigin::File("maine.csv".into()));
        let pool = vec![
            Entry::new("Maine", "Vacationland"),
            Entry::new("Maine", "The Pine Tree State"),
            Entry::new("Ohio", "Birthplace of Aviation"),
            Entry::new("Utah", "Life Elevated"),
        ];
        assert!(!s.complete_load(ticket, Ok(pool)));
        assert_eq!(s.snapshot(), before);
        assert!(s.status().starts_with("Upload failed: Need at least 4 entries"));
    }

    #[test]
    fn reset_without_data_reports_insufficient_entries() {
        let mut s = session();
        assert!(!s.reset());
        assert!(s.status().starts_with("Need at least 4 entries"));
        assert_eq!(events(&s).last(), Some(&Event::Empty));
    }
}
