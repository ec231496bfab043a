use std::env;
use std::path::PathBuf;

use crate::quiz_engine::error::{QuizError, QuizResult};

pub const DEFAULT_DATA_FILE: &str = "US_States_License_Plate_Nicknames.xlsx";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Dataset loaded at startup.
    pub data_path: PathBuf,
    /// `None` seeds from OS entropy.
    pub seed: Option<u64>,
    pub sound: bool,
}

impl Config {
    /// Read `PLATE_QUIZ_DATA`, `PLATE_QUIZ_SEED` and `PLATE_QUIZ_SOUND`.
    pub fn from_env() -> QuizResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> QuizResult<Self> {
        let defaults = Config::default();

        let data_path = lookup("PLATE_QUIZ_DATA")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_path);

        let seed = match lookup("PLATE_QUIZ_SEED") {
            Some(raw) if !raw.trim().is_empty() => Some(
                raw.trim()
                    .parse()
                    .map_err(|_| invalid("PLATE_QUIZ_SEED", &raw))?,
            ),
            _ => defaults.seed,
        };

        let sound = match lookup("PLATE_QUIZ_SOUND") {
            Some(raw) => parse_flag(&raw).ok_or_else(|| invalid("PLATE_QUIZ_SOUND", &raw))?,
            None => defaults.sound,
        };

        Ok(Config { data_path, seed, sound })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_path: PathBuf::from(DEFAULT_DATA_FILE),
            seed: None,
            sound: true,
        }
    }
}

fn invalid(key: &str, value: &str) -> QuizError {
    QuizError::InvalidConfig {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
