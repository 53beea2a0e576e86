use serde::{Deserialize, Serialize};

use crate::kernel::event::{EventKind, TurnId};
use crate::kernel::state::TurnState;
use crate::kernel::time::Tick;

// Allowed: IDs, Ticks, Durations, Counts, Enums
// Forbidden: Prompt text, Transcripts, Guesses

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TelemetryEvent {
    TurnBegan {
        turn_id: TurnId,
        tick: Tick,
    },

    TurnResolved {
        turn_id: TurnId,
        outcome: OutcomeKind,
        latency_ticks: u64, // begin_turn -> resolution
    },

    BargeIn {
        turn_id: TurnId,
        speaking_ticks: u64, // how long the prompt played before the interruption
    },

    Repeat {
        turn_id: TurnId,
    },

    GhostDropped {
        event: EventKind,
        state: TurnState,
    },

    Rejected {
        operation: OperationKind,
        state: TurnState,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeKind {
    Reply,
    Spoken,
    Failed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationKind {
    BeginTurn,
    BargeIn,
    Repeat,
}
