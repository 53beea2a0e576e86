//! Turn-loop telemetry.
//!
//! # SAFETY INVARIANT
//! Telemetry is a READ-ONLY side-effect layer.
//! It must **NEVER** be read inside decision logic (Turn Manager, Reactor, Dialogues).
//!
//! # PRIVACY INVARIANT
//! Telemetry events must **NEVER** contain user content (prompts, transcripts, guesses).
//! Only turn ids, ticks, counts and content-free kinds are allowed.

pub mod event;
pub mod metrics;
pub mod recorder;

pub use event::{OperationKind, OutcomeKind, TelemetryEvent};
pub use metrics::{compute_snapshot, TelemetrySnapshot};
pub use recorder::TelemetryRecorder;
