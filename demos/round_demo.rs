//! Scripted walk-through of one round.
//!
//! Run with: `cargo run --example round_demo`
//!
//! Uses the built-in sample pool and a fixed seed, so the output is the same
//! every run. Shows:
//!
//! - `RoundEngine::seeded` with `Some(seed)` for reproducible questions.
//! - Answering right and wrong, and the score that follows.
//! - `next_question` steering away from the state just asked about.
//! - `restart` zeroing the score.
//! - `RoundSnapshot::to_json` for handing state to another front end.

use plate_quiz::{sample_entries, Question, RoundEngine};

fn print_question(n: usize, q: &Question) {
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("  Q{n}: Which state uses \u{201c}{}\u{201d}?", q.nickname);
    for (i, option) in q.options.iter().enumerate() {
        let marker = if *option == q.correct_state { "✓" } else { " " };
        println!("    {}) {marker} {option}", i + 1);
    }
}

fn main() {
    let mut engine = RoundEngine::seeded(sample_entries(), Some(2024));

    let mut question = match engine.start_round() {
        Ok(q) => q.clone(),
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };

    for n in 1..=5 {
        print_question(n, &question);

        // Answer correctly on odd questions, pick a wrong option on even ones.
        let pick = if n % 2 == 1 {
            question.correct_state.clone()
        } else {
            question
                .options
                .iter()
                .find(|o| **o != question.correct_state)
                .cloned()
                .unwrap_or_default()
        };
        if let Some(outcome) = engine.submit_answer(&pick) {
            let verdict = if outcome.is_correct { "correct" } else { "wrong" };
            let state = engine.state();
            println!("  Picked {pick}: {verdict}.  Score {}/{}", state.score, state.total);
        }

        question = match engine.next_question() {
            Ok(q) => q.clone(),
            Err(e) => {
                eprintln!("{e}");
                return;
            }
        };
    }

    println!();
    println!("══ Snapshot before reset ══");
    match engine.snapshot().to_json() {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("{e}"),
    }

    if let Ok(q) = engine.restart() {
        println!();
        println!("══ After reset ══");
        println!("  First question avoids {}: now asking about {:?}", question.correct_state, q.nickname);
    }
    let state = engine.state();
    println!("  Score {}/{}", state.score, state.total);
}
