use serde::{Deserialize, Serialize};

/// The explicit phases of a conversational turn.
/// Exactly one instance exists, owned by the `TurnManager`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TurnState {
    /// No turn in flight. Initial state and the end of every turn.
    #[default]
    Idle,
    /// A prompt is being spoken, or the post-speech cooldown is running.
    Speaking,
    /// The speech input provider is capturing the reply.
    Listening,
    /// A final transcript is being parsed. Transient.
    Processing,
}

impl TurnState {
    pub fn label(&self) -> &'static str {
        match self {
            TurnState::Idle => "Idle",
            TurnState::Speaking => "Speaking...",
            TurnState::Listening => "Listening...",
            TurnState::Processing => "Processing...",
        }
    }
}

/// Requests a turn state transition.
/// These are REQUESTS. The graph decides whether the edge exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRequest {
    Begin,
    /// Speech finished and the turn does not listen afterwards.
    SpeechCompleted,
    /// Cooldown elapsed; start capturing the reply.
    ListenStart,
    FinalResult,
    Resolved,
    ProviderError,
    Repeat,
    Cancel,
}

/// The edge table of the turn state machine.
pub struct TurnGraph;

impl TurnGraph {
    /// Pure function: (Current State, Request) -> New State.
    /// Returns None if the edge does not exist.
    pub fn transition(current: TurnState, request: TurnRequest) -> Option<TurnState> {
        use TurnRequest::*;
        use TurnState::*;

        match (current, request) {
            (Idle, Begin) => Some(Speaking),
            (Idle, Repeat) => Some(Speaking),

            (Speaking, SpeechCompleted) => Some(Idle),
            (Speaking, ListenStart) => Some(Listening),
            (Speaking, ProviderError) => Some(Idle),

            (Listening, FinalResult) => Some(Processing),
            (Listening, ProviderError) => Some(Idle),
            (Listening, Repeat) => Some(Speaking),

            (Processing, Resolved) => Some(Idle),
            (Processing, ProviderError) => Some(Idle),

            // Hard abort is valid from anywhere
            (_, Cancel) => Some(Idle),

            _ => None,
        }
    }
}
