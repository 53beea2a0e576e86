pub mod config;
pub mod error;
pub mod games;
pub mod input;
pub mod kernel;
pub mod speech;

// Re-export specific items if needed for convenient access
pub use kernel::reactor::Reactor;
pub use kernel::turn::{Prompt, TurnManager, TurnOutcome};
