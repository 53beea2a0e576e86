use tracing::info;

use super::{Dialogue, Directive};
use crate::error::DialogueError;
use crate::input::{GlobalCommand, InputSpec, ParsedCommand};
use crate::kernel::turn::{Prompt, TurnFailure};

const GREETING: &str = "Echo Test. Say anything. Say QUIT to exit.";

/// Speaks every reply back. Exercises the turn loop end to end.
#[derive(Debug, Default)]
pub struct EchoTest {
    finished: bool,
}

impl EchoTest {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Dialogue for EchoTest {
    fn name(&self) -> &'static str {
        "Echo Test"
    }

    fn start(&mut self) -> Directive {
        info!("Starting Echo Test");
        self.finished = false;
        Directive::Say(Prompt::ask(GREETING, InputSpec::open_ended()))
    }

    fn on_reply(&mut self, parsed: ParsedCommand) -> Result<Directive, DialogueError> {
        if parsed.is(GlobalCommand::Quit) {
            self.finished = true;
            return Ok(Directive::Say(Prompt::say("Goodbye!")));
        }
        if parsed.is(GlobalCommand::Repeat) {
            return Ok(Directive::RepeatLast);
        }

        let echo = format!("You said: {}.", parsed.normalized);
        Ok(Directive::Say(Prompt::ask(echo, InputSpec::open_ended())))
    }

    fn on_failure(&mut self, _failure: &TurnFailure) -> Option<Directive> {
        if self.finished {
            return None;
        }
        Some(Directive::Say(Prompt::ask(
            "I didn't hear anything. Say anything, or QUIT to exit.",
            InputSpec::open_ended(),
        )))
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}
