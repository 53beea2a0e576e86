//! Speech provider boundary.
//!
//! The turn loop never talks to an audio device directly. A `SpeechOutput`
//! speaks prompts and a `SpeechInput` captures replies; both are polled by
//! the Reactor once per tick and report back through plain values.
//!
//! Provider contract:
//! - `speak` yields exactly one `SpeechSignal`, unless `stop` is called first.
//! - A listening session yields zero or more partial results, then exactly
//!   one final result or error.
//! - Nothing is reported after `stop` / `stop_listening`. Both are idempotent.

pub mod command;
pub mod console;
pub mod silence;
pub mod transcript;

use crate::error::SpeechError;
use crate::kernel::time::Tick;

pub use command::CommandSpeaker;
pub use console::{spawn_stdin_reader, ConsoleSpeaker};
pub use silence::{SilencePolicy, SilenceWatch};
pub use transcript::TranscriptRecognizer;

/// One recognition update.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceRecognitionResult {
    pub text: String,
    pub is_final: bool,
    pub confidence: Option<f32>,
}

impl VoiceRecognitionResult {
    pub fn partial(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_final: false, confidence: None }
    }

    pub fn final_text(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_final: true, confidence: None }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionEvent {
    Result(VoiceRecognitionResult),
    Failed(SpeechError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpeechSignal {
    Finished,
    Failed(SpeechError),
}

pub trait SpeechOutput {
    fn speak(&mut self, text: &str, now: Tick) -> Result<(), SpeechError>;

    fn stop(&mut self);

    /// Completion of the current utterance, reported once.
    fn poll(&mut self, now: Tick) -> Option<SpeechSignal>;
}

pub trait SpeechInput {
    fn start_listening(&mut self, now: Tick) -> Result<(), SpeechError>;

    fn stop_listening(&mut self);

    fn poll(&mut self, now: Tick) -> Vec<RecognitionEvent>;

    /// True if the user was heard while the provider was not listening.
    /// Used by the Reactor to detect barge-in during a prompt.
    fn take_voice_activity(&mut self) -> bool {
        false
    }
}
