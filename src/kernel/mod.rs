//! The turn-taking kernel: logical time, the turn state machine, and the
//! driver that connects it to speech providers and dialogues.

pub mod event;
pub mod reactor;
pub mod scheduler;
pub mod state;
pub mod telemetry;
pub mod time;
pub mod turn;

pub use event::{Event, TurnId};
pub use reactor::{Reactor, StepStatus};
pub use scheduler::SideEffect;
pub use state::TurnState;
pub use time::{ticks_from_ms, Tick, TICK_MS};
pub use turn::{Prompt, TurnConfig, TurnFailure, TurnManager, TurnOutcome, TurnTicket};
