use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SpeechError;
use crate::speech::{RecognitionEvent, SpeechSignal, VoiceRecognitionResult};

pub type TurnId = String;

pub fn new_turn_id() -> TurnId {
    Uuid::new_v4().to_string()
}

/// Provider callbacks, serialized into one ordered stream per tick.
/// None of them is trusted to belong to the current turn.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SpeechFinished,
    SpeechFailed(SpeechError),
    Recognition(VoiceRecognitionResult),
    RecognitionFailed(SpeechError),
}

/// Content-free classification of an `Event`, safe for telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    SpeechFinished,
    SpeechFailed,
    PartialResult,
    FinalResult,
    RecognitionFailed,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::SpeechFinished => EventKind::SpeechFinished,
            Event::SpeechFailed(_) => EventKind::SpeechFailed,
            Event::Recognition(r) if r.is_final => EventKind::FinalResult,
            Event::Recognition(_) => EventKind::PartialResult,
            Event::RecognitionFailed(_) => EventKind::RecognitionFailed,
        }
    }
}

impl From<SpeechSignal> for Event {
    fn from(signal: SpeechSignal) -> Self {
        match signal {
            SpeechSignal::Finished => Event::SpeechFinished,
            SpeechSignal::Failed(e) => Event::SpeechFailed(e),
        }
    }
}

impl From<RecognitionEvent> for Event {
    fn from(event: RecognitionEvent) -> Self {
        match event {
            RecognitionEvent::Result(r) => Event::Recognition(r),
            RecognitionEvent::Failed(e) => Event::RecognitionFailed(e),
        }
    }
}
