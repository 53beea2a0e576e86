//! Error types for the turn loop.

use std::path::PathBuf;
use thiserror::Error;

use crate::kernel::state::TurnState;

/// Sequencing errors: an operation invoked in a state that forbids it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TurnError {
    #[error("Turn already in flight (state: {state:?})")]
    Busy { state: TurnState },

    #[error("Cannot repeat while {state:?}")]
    RepeatNotAllowed { state: TurnState },

    #[error("Nothing has been spoken yet")]
    NothingToRepeat,
}

/// Failures reported by the speech output and speech input providers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpeechError {
    #[error("No speech detected")]
    NoSpeech,

    #[error("Speech device unavailable: {0}")]
    Unavailable(String),

    #[error("Synthesis failed: {0}")]
    Synthesis(String),

    #[error("Recognition failed: {0}")]
    Recognition(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for SpeechError {
    fn from(err: std::io::Error) -> Self {
        SpeechError::Io(err.to_string())
    }
}

/// Invalid evaluator input. Indicates a broken game invariant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuessError {
    #[error("{role} must be exactly {expected} letters, got {actual:?}")]
    InvalidLength {
        role: &'static str,
        expected: usize,
        actual: String,
    },
}

#[derive(Error, Debug)]
pub enum DialogueError {
    #[error("Game invariant violated: {0}")]
    Invariant(#[from] GuessError),
}

#[derive(Error, Debug)]
pub enum WordListError {
    #[error("Failed to read word list {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Word list {origin} has no usable {length}-letter words")]
    Empty { origin: String, length: usize },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum ReactorError {
    #[error(transparent)]
    Dialogue(#[from] DialogueError),
}
