use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::{debug, info, warn};

use super::silence::{SilencePolicy, SilenceWatch};
use super::{RecognitionEvent, SpeechInput, VoiceRecognitionResult};
use crate::error::SpeechError;
use crate::kernel::time::Tick;

/// Speech input fed by transcript fragments from any front-end
/// (console reader, external recognizer bridge).
///
/// Fragments accumulate into the running transcript and are reported as
/// partial results; the silence policy turns the transcript into the final
/// result. Fragments heard while not listening count as voice activity and
/// open the next session.
pub struct TranscriptRecognizer {
    fragments: mpsc::UnboundedReceiver<String>,
    watch: SilenceWatch,
    listening: bool,
    source_closed: bool,
    heard: String,
    carry: Vec<String>,
    pending: Vec<RecognitionEvent>,
}

impl TranscriptRecognizer {
    pub fn new(fragments: mpsc::UnboundedReceiver<String>, policy: SilencePolicy) -> Self {
        Self {
            fragments,
            watch: SilenceWatch::new(policy),
            listening: false,
            source_closed: false,
            heard: String::new(),
            carry: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Recognizer plus the sender a front-end pushes fragments into.
    pub fn channel(policy: SilencePolicy) -> (mpsc::UnboundedSender<String>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self::new(rx, policy))
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    fn drain(&mut self) -> Vec<String> {
        let mut fragments = Vec::new();
        loop {
            match self.fragments.try_recv() {
                Ok(fragment) => {
                    let fragment = fragment.trim();
                    if !fragment.is_empty() {
                        fragments.push(fragment.to_string());
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.source_closed {
                        info!("Transcript source closed");
                    }
                    self.source_closed = true;
                    break;
                }
            }
        }
        fragments
    }

    fn hear(&mut self, fragment: &str, now: Tick) -> RecognitionEvent {
        if !self.heard.is_empty() {
            self.heard.push(' ');
        }
        self.heard.push_str(fragment);
        self.watch.on_partial(&self.heard, now);
        RecognitionEvent::Result(VoiceRecognitionResult::partial(self.heard.clone()))
    }

    fn end_session(&mut self) {
        self.listening = false;
        self.heard.clear();
        self.watch.disarm();
    }
}

impl SpeechInput for TranscriptRecognizer {
    fn start_listening(&mut self, now: Tick) -> Result<(), SpeechError> {
        if self.listening {
            return Ok(());
        }
        // Surface a closed source now rather than after the initial timeout
        let early = self.drain();
        self.carry.extend(early);
        if self.source_closed && self.carry.is_empty() {
            return Err(SpeechError::Unavailable("transcript source closed".to_string()));
        }

        debug!("Listening (carried fragments: {})", self.carry.len());
        self.listening = true;
        self.heard.clear();
        self.pending.clear();
        self.watch.arm(now);

        for fragment in std::mem::take(&mut self.carry) {
            let event = self.hear(&fragment, now);
            self.pending.push(event);
        }
        Ok(())
    }

    fn stop_listening(&mut self) {
        if self.listening {
            debug!("Stopped listening");
        }
        self.end_session();
        self.pending.clear();
        self.carry.clear();
    }

    fn poll(&mut self, now: Tick) -> Vec<RecognitionEvent> {
        if !self.listening {
            return Vec::new();
        }

        let mut events = std::mem::take(&mut self.pending);
        for fragment in self.drain() {
            let event = self.hear(&fragment, now);
            events.push(event);
        }

        if let Some(terminal) = self.watch.poll(now) {
            events.push(terminal);
            self.end_session();
        } else if self.source_closed && self.heard.is_empty() {
            warn!("Transcript source closed while listening");
            events.push(RecognitionEvent::Failed(SpeechError::Unavailable(
                "transcript source closed".to_string(),
            )));
            self.end_session();
        }

        events
    }

    fn take_voice_activity(&mut self) -> bool {
        if self.listening {
            return false;
        }
        let fragments = self.drain();
        let heard = !fragments.is_empty();
        self.carry.extend(fragments);
        heard
    }
}
