//! The Turn Manager: sole owner of `TurnState`.
//!
//! Sequences speak -> cooldown -> listen -> process for one turn at a time.
//! It performs no I/O: provider commands go to an outbox of `SideEffect`s,
//! provider callbacks come back as `Event`s, and every callback is checked
//! against the current state before it is trusted.

use tokio::sync::{oneshot, watch};
use tracing::{debug, info, warn};

use super::event::{new_turn_id, Event, EventKind, TurnId};
use super::scheduler::{Cooldown, SideEffect};
use super::state::{TurnGraph, TurnRequest, TurnState};
use super::telemetry::{OperationKind, OutcomeKind, TelemetryEvent, TelemetryRecorder};
use super::time::{ticks_from_ms, Tick};
use crate::error::{SpeechError, TurnError};
use crate::input::{CommandParser, InputSpec, ParsedCommand};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnConfig {
    /// Delay between the end of speech and the start of listening.
    pub cooldown_ticks: u64,
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self {
            cooldown_ticks: ticks_from_ms(300),
        }
    }
}

/// What to say, and how to read the reply.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub text: String,
    pub spec: InputSpec,
    pub listen_after_speech: bool,
}

impl Prompt {
    /// Speak, then listen for a reply interpreted with `spec`.
    pub fn ask(text: impl Into<String>, spec: InputSpec) -> Self {
        Self { text: text.into(), spec, listen_after_speech: true }
    }

    /// Speak only. The turn resolves as `Spoken`.
    pub fn say(text: impl Into<String>) -> Self {
        Self { text: text.into(), spec: InputSpec::open_ended(), listen_after_speech: false }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TurnFailure {
    Speech(SpeechError),
    Recognition(SpeechError),
    Rejected(TurnError),
}

/// Resolution of one turn. Delivered exactly once per turn.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    Reply(ParsedCommand),
    Spoken,
    Failed(TurnFailure),
    Cancelled,
}

impl TurnOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            TurnOutcome::Reply(_) => OutcomeKind::Reply,
            TurnOutcome::Spoken => OutcomeKind::Spoken,
            TurnOutcome::Failed(_) => OutcomeKind::Failed,
            TurnOutcome::Cancelled => OutcomeKind::Cancelled,
        }
    }
}

/// Receiving end of a turn's result channel.
#[derive(Debug)]
pub struct TurnTicket {
    id: TurnId,
    rx: oneshot::Receiver<TurnOutcome>,
}

impl TurnTicket {
    pub fn id(&self) -> &TurnId {
        &self.id
    }

    /// Non-blocking check. A manager that dropped the turn without
    /// resolving it reads as `Cancelled`.
    pub fn try_resolve(&mut self) -> Option<TurnOutcome> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(TurnOutcome::Cancelled),
        }
    }

    pub async fn outcome(self) -> TurnOutcome {
        self.rx.await.unwrap_or(TurnOutcome::Cancelled)
    }
}

/// Context of the turn in flight.
#[derive(Debug)]
struct PendingTurn {
    id: TurnId,
    spec: InputSpec,
    listen_after_speech: bool,
    began_at: Tick,
    reply: oneshot::Sender<TurnOutcome>,
}

pub struct TurnManager {
    state: TurnState,
    state_tx: watch::Sender<TurnState>,
    parser: CommandParser,
    pending: Option<PendingTurn>,
    /// The utterance currently playing has not reported completion yet.
    awaiting_speech_end: bool,
    speech_started: Tick,
    cooldown: Cooldown,
    last_spoken: Option<String>,
    last_spec: Option<InputSpec>,
    now: Tick,
    effects: Vec<SideEffect>,
    telemetry: TelemetryRecorder,
}

impl Default for TurnManager {
    fn default() -> Self {
        Self::new(TurnConfig::default())
    }
}

impl TurnManager {
    pub fn new(config: TurnConfig) -> Self {
        let (state_tx, _) = watch::channel(TurnState::Idle);
        Self {
            state: TurnState::Idle,
            state_tx,
            parser: CommandParser::new(),
            pending: None,
            awaiting_speech_end: false,
            speech_started: Tick::new(),
            cooldown: Cooldown::new(config.cooldown_ticks),
            last_spoken: None,
            last_spec: None,
            now: Tick::new(),
            effects: Vec::new(),
            telemetry: TelemetryRecorder::new(),
        }
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    /// State-change notifications for the presentation layer.
    pub fn subscribe(&self) -> watch::Receiver<TurnState> {
        self.state_tx.subscribe()
    }

    pub fn now(&self) -> Tick {
        self.now
    }

    pub fn last_spoken(&self) -> Option<&str> {
        self.last_spoken.as_deref()
    }

    pub fn pending_spec(&self) -> Option<&InputSpec> {
        self.pending.as_ref().map(|p| &p.spec)
    }

    pub fn pending_turn(&self) -> Option<&TurnId> {
        self.pending.as_ref().map(|p| &p.id)
    }

    pub fn is_cooling_down(&self) -> bool {
        self.cooldown.is_pending()
    }

    pub fn telemetry(&self) -> &TelemetryRecorder {
        &self.telemetry
    }

    /// Drains queued provider commands.
    pub fn take_effects(&mut self) -> Vec<SideEffect> {
        std::mem::take(&mut self.effects)
    }

    /// Starts a turn. Only valid from Idle; otherwise nothing changes.
    pub fn begin_turn(&mut self, prompt: Prompt) -> Result<TurnTicket, TurnError> {
        if self.state != TurnState::Idle {
            warn!("begin_turn rejected: turn already in flight ({:?})", self.state);
            self.reject(OperationKind::BeginTurn);
            return Err(TurnError::Busy { state: self.state });
        }

        let id = new_turn_id();
        let (reply, rx) = oneshot::channel();

        self.last_spoken = Some(prompt.text.clone());
        self.last_spec = Some(prompt.spec.clone());
        self.pending = Some(PendingTurn {
            id: id.clone(),
            spec: prompt.spec,
            listen_after_speech: prompt.listen_after_speech,
            began_at: self.now,
            reply,
        });

        self.apply(TurnRequest::Begin);
        self.speak(prompt.text);

        info!("Turn {} began (listen after speech: {})", id, prompt.listen_after_speech);
        self.telemetry.record(TelemetryEvent::TurnBegan { turn_id: id.clone(), tick: self.now });

        Ok(TurnTicket { id, rx })
    }

    /// Pure step: applies provider events in arrival order, then fires an
    /// expired cooldown. Returns the provider commands to execute.
    pub fn tick_step(&mut self, now: Tick, events: Vec<Event>) -> Vec<SideEffect> {
        self.now = now;

        for event in events {
            self.handle_event(event);
        }

        if self.cooldown.fire(now) {
            self.start_listening();
        }

        self.take_effects()
    }

    pub fn handle_event(&mut self, event: Event) {
        let kind = event.kind();
        match event {
            Event::SpeechFinished => {
                if self.state == TurnState::Speaking && self.awaiting_speech_end {
                    self.on_speech_finished();
                } else {
                    self.drop_ghost(kind);
                }
            }
            Event::SpeechFailed(error) => {
                if self.state == TurnState::Speaking && self.awaiting_speech_end {
                    warn!("Speech output failed: {}", error);
                    self.awaiting_speech_end = false;
                    self.cooldown.cancel();
                    self.apply(TurnRequest::ProviderError);
                    self.resolve(TurnOutcome::Failed(TurnFailure::Speech(error)));
                } else {
                    self.drop_ghost(kind);
                }
            }
            Event::Recognition(result) => {
                if self.state != TurnState::Listening {
                    self.drop_ghost(kind);
                } else if result.is_final {
                    self.on_final_result(&result.text);
                } else {
                    // Partials are the provider's business
                    debug!("Partial transcript ({} chars)", result.text.len());
                }
            }
            Event::RecognitionFailed(error) => {
                if matches!(self.state, TurnState::Listening | TurnState::Processing) {
                    warn!("Recognition failed: {}", error);
                    self.effects.push(SideEffect::StopListening);
                    self.apply(TurnRequest::ProviderError);
                    self.resolve(TurnOutcome::Failed(TurnFailure::Recognition(error)));
                } else {
                    self.drop_ghost(kind);
                }
            }
        }
    }

    /// Hard abort from any state. Stops both providers.
    pub fn cancel_turn(&mut self) {
        self.effects.push(SideEffect::StopSpeaking);
        self.effects.push(SideEffect::StopListening);
        self.awaiting_speech_end = false;
        self.cooldown.cancel();

        if self.state != TurnState::Idle {
            info!("Cancelling turn in {:?}", self.state);
            self.apply(TurnRequest::Cancel);
        }
        self.resolve(TurnOutcome::Cancelled);
    }

    /// The user spoke over the prompt: stop speaking and listen early with
    /// the pending spec. Returns false if there was nothing to interrupt.
    pub fn handle_barge_in(&mut self) -> bool {
        if self.state != TurnState::Speaking {
            warn!("Barge-in ignored in {:?}", self.state);
            self.reject(OperationKind::BargeIn);
            return false;
        }
        if !self.awaiting_speech_end {
            debug!("Barge-in during cooldown, already about to listen");
            return false;
        }
        let Some(pending) = self.pending.as_ref() else {
            return false;
        };
        if !pending.listen_after_speech {
            debug!("Barge-in ignored, turn {} does not listen", pending.id);
            return false;
        }

        info!("Barge-in on turn {}", pending.id);
        self.telemetry.record(TelemetryEvent::BargeIn {
            turn_id: pending.id.clone(),
            speaking_ticks: self.now.since(self.speech_started),
        });

        self.effects.push(SideEffect::StopSpeaking);
        self.awaiting_speech_end = false;
        self.cooldown.schedule(self.now);
        true
    }

    /// Re-speaks the last prompt, then listens with the same spec.
    ///
    /// From Idle this opens a new turn and returns its ticket. From
    /// Listening the turn in flight keeps its ticket and `None` is returned.
    pub fn repeat_last_utterance(&mut self) -> Result<Option<TurnTicket>, TurnError> {
        match self.state {
            TurnState::Idle => {
                let text = self.last_spoken.clone().ok_or(TurnError::NothingToRepeat)?;
                let spec = self.last_spec.clone().unwrap_or_default();
                let ticket = self.begin_turn(Prompt::ask(text, spec))?;
                self.telemetry.record(TelemetryEvent::Repeat { turn_id: ticket.id().clone() });
                Ok(Some(ticket))
            }
            TurnState::Listening => {
                let text = self.last_spoken.clone().ok_or(TurnError::NothingToRepeat)?;
                self.effects.push(SideEffect::StopListening);
                self.apply(TurnRequest::Repeat);
                if let Some(pending) = self.pending.as_mut() {
                    pending.listen_after_speech = true;
                    self.telemetry.record(TelemetryEvent::Repeat { turn_id: pending.id.clone() });
                }
                self.speak(text);
                Ok(None)
            }
            state => {
                warn!("Repeat rejected in {:?}", state);
                self.reject(OperationKind::Repeat);
                Err(TurnError::RepeatNotAllowed { state })
            }
        }
    }

    fn speak(&mut self, text: String) {
        self.awaiting_speech_end = true;
        self.speech_started = self.now;
        self.effects.push(SideEffect::Speak(text));
    }

    fn on_speech_finished(&mut self) {
        self.awaiting_speech_end = false;
        let listen = self.pending.as_ref().map(|p| p.listen_after_speech).unwrap_or(false);

        if listen {
            debug!("Speech finished, cooling down for {} ticks", self.cooldown.ticks());
            self.cooldown.schedule(self.now);
        } else {
            self.apply(TurnRequest::SpeechCompleted);
            self.resolve(TurnOutcome::Spoken);
        }
    }

    fn start_listening(&mut self) {
        if self.apply(TurnRequest::ListenStart) {
            self.effects.push(SideEffect::StartListening);
        }
    }

    fn on_final_result(&mut self, raw: &str) {
        self.effects.push(SideEffect::StopListening);
        self.apply(TurnRequest::FinalResult);

        let spec = self.pending.as_ref().map(|p| p.spec.clone()).unwrap_or_default();
        let parsed = self.parser.parse(raw, &spec);

        // Idle first, so the receiver may begin the next turn at once
        self.apply(TurnRequest::Resolved);
        self.resolve(TurnOutcome::Reply(parsed));
    }

    /// Clears the turn context and delivers its outcome.
    fn resolve(&mut self, outcome: TurnOutcome) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        debug!("Turn {} resolved: {:?}", pending.id, outcome.kind());
        self.telemetry.record(TelemetryEvent::TurnResolved {
            turn_id: pending.id,
            outcome: outcome.kind(),
            latency_ticks: self.now.since(pending.began_at),
        });
        // Receiver may be gone; the turn is over either way
        let _ = pending.reply.send(outcome);
    }

    fn apply(&mut self, request: TurnRequest) -> bool {
        match TurnGraph::transition(self.state, request) {
            Some(next) => {
                debug!("Turn state {:?} -> {:?} ({:?})", self.state, next, request);
                self.state = next;
                self.state_tx.send_replace(next);
                true
            }
            None => {
                warn!("No edge from {:?} on {:?}", self.state, request);
                false
            }
        }
    }

    fn drop_ghost(&mut self, event: EventKind) {
        warn!("Dropped {:?} callback in {:?}", event, self.state);
        self.telemetry.record(TelemetryEvent::GhostDropped { event, state: self.state });
    }

    fn reject(&mut self, operation: OperationKind) {
        self.telemetry.record(TelemetryEvent::Rejected { operation, state: self.state });
    }
}
