//! Dialogue controllers that drive the turn loop.
//!
//! A dialogue never touches the Turn Manager. It answers each resolved turn
//! with a `Directive` and the Reactor carries it out.

pub mod echo;
pub mod word_guess;

use crate::error::DialogueError;
use crate::input::ParsedCommand;
use crate::kernel::turn::{Prompt, TurnFailure};

pub use echo::EchoTest;
pub use word_guess::{WordGuessGame, WordList};

/// The next move of a dialogue.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// Begin a new turn.
    Say(Prompt),
    /// Re-speak the previous prompt and listen with the same spec.
    RepeatLast,
}

pub trait Dialogue {
    fn name(&self) -> &'static str;

    /// Opening prompt. Resets any previous session.
    fn start(&mut self) -> Directive;

    /// One parsed reply, delivered once per turn.
    fn on_reply(&mut self, parsed: ParsedCommand) -> Result<Directive, DialogueError>;

    /// The turn ended without a reply. `None` when there is nothing left to say.
    fn on_failure(&mut self, failure: &TurnFailure) -> Option<Directive>;

    /// True once the dialogue has said goodbye.
    fn is_finished(&self) -> bool;
}
