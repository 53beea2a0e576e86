use tokio::time::{interval, Duration}; // Only for the loop driver
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::event::Event;
use super::scheduler::SideEffect;
use super::state::TurnState;
use super::telemetry::TelemetrySnapshot;
use super::time::{Tick, TICK_MS};
use super::turn::{TurnFailure, TurnManager, TurnOutcome, TurnTicket};
use crate::error::{ReactorError, TurnError};
use crate::games::{Dialogue, Directive};
use crate::speech::{SpeechInput, SpeechOutput};

/// Rejected directives the dialogue may answer with another directive
/// before the step gives up.
const MAX_REDIRECTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Running,
    Finished,
}

/// Single-threaded driver: serializes provider callbacks, cooldowns and
/// dialogue decisions into one ordered step per tick.
pub struct Reactor<O: SpeechOutput, I: SpeechInput> {
    manager: TurnManager,
    output: O,
    input: I,
    dialogue: Box<dyn Dialogue>,
    ticket: Option<TurnTicket>,
    tick: Tick,
    /// Provider start failures, delivered on the next step.
    deferred: Vec<Event>,
    started: bool,
}

impl<O: SpeechOutput, I: SpeechInput> Reactor<O, I> {
    pub fn new(manager: TurnManager, output: O, input: I, dialogue: Box<dyn Dialogue>) -> Self {
        Self {
            manager,
            output,
            input,
            dialogue,
            ticket: None,
            tick: Tick::new(),
            deferred: Vec::new(),
            started: false,
        }
    }

    pub fn manager(&self) -> &TurnManager {
        &self.manager
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn dialogue(&self) -> &dyn Dialogue {
        self.dialogue.as_ref()
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn is_finished(&self) -> bool {
        self.dialogue.is_finished() && self.manager.state() == TurnState::Idle && self.ticket.is_none()
    }

    /// Issues the dialogue's opening prompt. Called by the first step if
    /// not called explicitly.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        info!("Starting dialogue: {}", self.dialogue.name());
        let directive = self.dialogue.start();
        self.follow(directive);
    }

    /// Pure Tick Step: advances the clock by one frame and runs one pass.
    pub fn step(&mut self) -> Result<StepStatus, ReactorError> {
        self.start();
        self.tick = self.tick.next();
        let now = self.tick;

        // 1. Gather provider callbacks
        let mut events = std::mem::take(&mut self.deferred);
        if let Some(signal) = self.output.poll(now) {
            events.push(signal.into());
        }
        events.extend(self.input.poll(now).into_iter().map(Event::from));

        // 2. Kernel step
        let mut effects = self.manager.tick_step(now, events);

        // 3. Barge-in: the user spoke over the prompt
        if self.manager.state() == TurnState::Speaking && self.input.take_voice_activity() {
            self.manager.handle_barge_in();
            effects.extend(self.manager.take_effects());
        }

        self.execute(effects);

        // 4. Deliver the outcome, then follow the dialogue's next move
        let outcome = self.ticket.as_mut().and_then(|ticket| ticket.try_resolve());
        if let Some(outcome) = outcome {
            self.ticket = None;
            self.on_outcome(outcome)?;
        }

        Ok(if self.is_finished() { StepStatus::Finished } else { StepStatus::Running })
    }

    /// Hard abort of the turn in flight.
    pub fn cancel(&mut self) {
        self.manager.cancel_turn();
        let effects = self.manager.take_effects();
        self.execute(effects);
        self.ticket = None;
        self.deferred.clear();
    }

    /// Async Driver Loop. Runs until the dialogue finishes or `shutdown` fires.
    pub async fn run(&mut self, shutdown: CancellationToken) -> Result<TelemetrySnapshot, ReactorError> {
        info!("Reactor Pipeline Started. Tick: {}ms", TICK_MS);

        let mut cadence = interval(Duration::from_millis(TICK_MS));
        cadence.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Shutdown requested");
                    self.cancel();
                    break;
                }
                _ = cadence.tick() => {
                    if self.step()? == StepStatus::Finished {
                        info!("Dialogue {} finished", self.dialogue.name());
                        break;
                    }
                }
            }
        }

        Ok(self.manager.telemetry().snapshot())
    }

    fn on_outcome(&mut self, outcome: TurnOutcome) -> Result<(), ReactorError> {
        let directive = match outcome {
            TurnOutcome::Reply(parsed) => Some(self.dialogue.on_reply(parsed)?),
            TurnOutcome::Failed(failure) => {
                warn!("Turn failed: {:?}", failure);
                self.dialogue.on_failure(&failure)
            }
            TurnOutcome::Spoken | TurnOutcome::Cancelled => None,
        };

        if let Some(directive) = directive {
            self.follow(directive);
        }
        Ok(())
    }

    fn follow(&mut self, directive: Directive) {
        let mut directive = directive;
        for _ in 0..MAX_REDIRECTS {
            match self.try_follow(directive) {
                Ok(()) => break,
                Err(e) => {
                    warn!("Directive rejected: {}", e);
                    match self.dialogue.on_failure(&TurnFailure::Rejected(e)) {
                        Some(next) => directive = next,
                        None => break,
                    }
                }
            }
        }
        let effects = self.manager.take_effects();
        self.execute(effects);
    }

    fn try_follow(&mut self, directive: Directive) -> Result<(), TurnError> {
        match directive {
            Directive::Say(prompt) => {
                self.ticket = Some(self.manager.begin_turn(prompt)?);
            }
            Directive::RepeatLast => {
                if let Some(ticket) = self.manager.repeat_last_utterance()? {
                    self.ticket = Some(ticket);
                }
            }
        }
        Ok(())
    }

    /// Driver: Execute Side Effects
    fn execute(&mut self, effects: Vec<SideEffect>) {
        for effect in effects {
            match effect {
                SideEffect::Speak(text) => {
                    if let Err(e) = self.output.speak(&text, self.tick) {
                        warn!("Speech output failed to start: {}", e);
                        self.deferred.push(Event::SpeechFailed(e));
                    }
                }
                SideEffect::StopSpeaking => self.output.stop(),
                SideEffect::StartListening => {
                    if let Err(e) = self.input.start_listening(self.tick) {
                        warn!("Speech input failed to start: {}", e);
                        self.deferred.push(Event::RecognitionFailed(e));
                    }
                }
                SideEffect::StopListening => self.input.stop_listening(),
            }
        }
    }
}
