use std::io::{self, BufRead, Write};
use std::path::Path;

use plate_quiz::{
    Config, FeedbackNotifier, QuizSession, RoundEngine, SilentNotifier, TerminalBell,
    TerminalPresenter,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type Session = QuizSession<TerminalPresenter<io::Stdout>, Box<dyn FeedbackNotifier>>;

fn print_help() {
    println!("Commands:");
    println!("  1-4 or a state name -> answer the current question");
    println!("  next        -> next question (after answering)");
    println!("  reset       -> start a new round, score back to 0/0");
    println!("  sample      -> use the built-in sample data");
    println!("  load <path> -> load a .xlsx, .ods, .json, .csv or .tsv file");
    println!("  score       -> show the current score");
    println!("  help        -> show this list");
    println!("  quit        -> exit");
}

fn print_summary(session: &Session) {
    let snap = session.snapshot();
    println!("\n=== SESSION SUMMARY ===");
    println!("Questions answered: {}", snap.total);
    println!("Final score: {}/{}", snap.score, snap.total);
    if snap.total > 0 {
        let pct = snap.score as f64 * 100.0 / snap.total as f64;
        println!("Accuracy: {pct:.0}%");
    }
    println!("Goodbye!");
}

/// Answer by number or by (case-insensitive) state name.
fn handle_answer(session: &mut Session, raw: &str) {
    let Some(question) = session.engine().current_question().cloned() else {
        println!("Unknown command: '{raw}'");
        println!("Type 'help' to see available commands.");
        return;
    };

    let outcome = if let Ok(number) = raw.parse::<usize>() {
        if question.option_label(number).is_none() {
            println!("Pick an option between 1 and {}.", question.options.len());
            return;
        }
        session.answer_option(number)
    } else if let Some(option) = question.options.iter().find(|o| o.eq_ignore_ascii_case(raw)) {
        session.answer(option)
    } else {
        println!("'{raw}' is not one of the options.");
        return;
    };

    if outcome.is_none() {
        println!("Already answered. Type 'next' for another question.");
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "plate_quiz=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };
    tracing::info!(?config, "starting plate quiz");

    let notifier: Box<dyn FeedbackNotifier> = if config.sound {
        Box::new(TerminalBell::stderr())
    } else {
        Box::new(SilentNotifier)
    };
    let engine = RoundEngine::seeded(Vec::new(), config.seed);
    let mut session: Session = QuizSession::new(engine, TerminalPresenter::stdout(), notifier);

    println!("Welcome to Plate Quiz");
    print_help();
    println!();

    session.load_bundled(&config.data_path);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush().ok();

        let input = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(_)) => {
                eprintln!("Error reading input, try again.");
                continue;
            }
            None => break,
        };

        let raw = input.trim();
        if raw.is_empty() {
            continue;
        }

        let (cmd, arg) = match raw.split_once(char::is_whitespace) {
            Some((cmd, arg)) => (cmd, arg.trim()),
            None => (raw, ""),
        };

        match cmd.to_lowercase().as_str() {
            "quit" | "exit" => break,
            "help" => print_help(),
            "score" => {
                let snap = session.snapshot();
                println!("Score: {}/{}", snap.score, snap.total);
            }
            "sample" => {
                session.use_sample_data();
            }
            "reset" => {
                session.reset();
            }
            "next" => {
                if !session.next() && session.snapshot().question.is_some() {
                    println!("Answer the current question first.");
                }
            }
            "load" if !arg.is_empty() => {
                session.load_file(Path::new(arg));
            }
            "load" => println!("Usage: load <path>"),
            _ => handle_answer(&mut session, raw),
        }
    }

    print_summary(&session);
}
