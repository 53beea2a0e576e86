use super::time::Tick;

/// Provider commands emitted by the Turn Manager.
/// The manager never touches a provider; the driver executes these in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    Speak(String),
    StopSpeaking,
    StartListening,
    StopListening,
}

/// One-shot delay between the end of speech and the start of listening.
#[derive(Debug, Clone)]
pub struct Cooldown {
    ticks: u64,
    deadline: Option<Tick>,
}

impl Cooldown {
    pub fn new(ticks: u64) -> Self {
        Self { ticks, deadline: None }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// (Re)starts the delay from `now`.
    pub fn schedule(&mut self, now: Tick) {
        self.deadline = Some(now.after(self.ticks));
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True exactly once, on the first tick at or past the deadline.
    pub fn fire(&mut self, now: Tick) -> bool {
        match self.deadline {
            Some(deadline) if now.has_reached(deadline) => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
