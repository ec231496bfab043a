//! Audible feedback after each answer.
//!
//! A notifier must never disrupt the round: implementations swallow their
//! own failures and at most log them.

use std::io::{self, Write};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One note of a feedback tune.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub frequency_hz: f32,
    pub duration_secs: f32,
}

impl Note {
    /// Nearest equal-tempered pitch in scientific notation, e.g. `"C5"`.
    pub fn pitch_name(&self) -> String {
        const NAMES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];
        let midi = (69.0 + 12.0 * (self.frequency_hz / 440.0).log2()).round() as i32;
        format!("{}{}", NAMES[midi.rem_euclid(12) as usize], midi.div_euclid(12) - 1)
    }
}

/// Rising C-major arpeggio played on a correct answer.
pub const HAPPY_TUNE: [Note; 3] = [
    Note { frequency_hz: 523.25, duration_secs: 0.11 },
    Note { frequency_hz: 659.25, duration_secs: 0.11 },
    Note { frequency_hz: 783.99, duration_secs: 0.16 },
];

/// Falling phrase played on a wrong answer.
pub const SAD_TUNE: [Note; 3] = [
    Note { frequency_hz: 392.0, duration_secs: 0.15 },
    Note { frequency_hz: 349.23, duration_secs: 0.20 },
    Note { frequency_hz: 293.66, duration_secs: 0.24 },
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tune(pub &'static [Note]);

impl Tune {
    pub fn for_outcome(is_correct: bool) -> Tune {
        if is_correct { Tune(&HAPPY_TUNE) } else { Tune(&SAD_TUNE) }
    }

    pub fn notes(&self) -> &'static [Note] {
        self.0
    }

    /// Total playing time of all notes back to back.
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f32(self.0.iter().map(|n| n.duration_secs).sum())
    }
}

/// Plays a cue keyed on correctness.
pub trait FeedbackNotifier {
    fn notify(&mut self, is_correct: bool);
}

impl<N: FeedbackNotifier + ?Sized> FeedbackNotifier for Box<N> {
    fn notify(&mut self, is_correct: bool) {
        (**self).notify(is_correct)
    }
}

/// Does nothing. Used when sound is switched off.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl FeedbackNotifier for SilentNotifier {
    fn notify(&mut self, _is_correct: bool) {}
}

/// Terminals have no tone generator, so the tune is rung as one bell and
/// spelled out by pitch: `"\x07♪ C5 E5 G5\n"` for a correct answer.
pub struct TerminalBell<W: Write = io::Stderr> {
    out: W,
}

impl TerminalBell<io::Stderr> {
    pub fn stderr() -> Self {
        TerminalBell { out: io::stderr() }
    }
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        TerminalBell { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn play(&mut self, tune: Tune) -> io::Result<()> {
        let pitches: Vec<String> = tune.notes().iter().map(Note::pitch_name).collect();
        writeln!(self.out, "\x07\u{266a} {}", pitches.join(" "))?;
        self.out.flush()
    }
}

impl<W: Write> FeedbackNotifier for TerminalBell<W> {
    fn notify(&mut self, is_correct: bool) {
        let tune = Tune::for_outcome(is_correct);
        if let Err(e) = self.play(tune) {
            tracing::warn!(error = %e, "feedback bell failed");
            return;
        }
        tracing::trace!(notes = tune.notes().len(), duration = ?tune.duration(), "played feedback");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn tunes_rise_and_fall() {
        let happy = Tune::for_outcome(true).notes();
        let sad = Tune::for_outcome(false).notes();
        assert!(happy.windows(2).all(|w| w[0].frequency_hz < w[1].frequency_hz));
        assert!(sad.windows(2).all(|w| w[0].frequency_hz > w[1].frequency_hz));
    }

    #[test]
    fn tune_duration_sums_notes() {
        let ms = Tune(&SAD_TUNE).duration().as_millis();
        assert!((588..=591).contains(&ms), "sad tune lasts {ms}ms");
    }

    #[test]
    fn pitch_names_follow_the_tunes() {
        let names = |tune: &[Note]| tune.iter().map(Note::pitch_name).collect::<Vec<_>>();
        assert_eq!(names(&HAPPY_TUNE), ["C5", "E5", "G5"]);
        assert_eq!(names(&SAD_TUNE), ["G4", "F4", "D4"]);
        assert_eq!(Note { frequency_hz: 440.0, duration_secs: 0.1 }.pitch_name(), "A4");
    }

    #[test]
    fn bell_spells_out_the_tune() {
        let mut bell = TerminalBell::new(Vec::new());
        bell.notify(true);
        bell.notify(false);
        let out = String::from_utf8(bell.into_inner()).unwrap();
        assert_eq!(out, "\x07\u{266a} C5 E5 G5\n\x07\u{266a} G4 F4 D4\n");
    }

    #[test]
    fn broken_output_is_swallowed() {
        let mut bell = TerminalBell::new(BrokenPipe);
        bell.notify(true);
        bell.notify(false);
    }
}
