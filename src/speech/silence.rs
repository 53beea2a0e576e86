use serde::{Deserialize, Serialize};

use super::{RecognitionEvent, VoiceRecognitionResult};
use crate::error::SpeechError;
use crate::kernel::time::{ticks_from_ms, Tick};

/// Timeouts that end a listening session when the user stops talking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SilencePolicy {
    /// Wait before the first result arrives.
    pub initial_ticks: u64,
    /// Wait after each partial result.
    pub trailing_ticks: u64,
}

impl Default for SilencePolicy {
    fn default() -> Self {
        Self {
            initial_ticks: ticks_from_ms(10_000),
            trailing_ticks: ticks_from_ms(2_000),
        }
    }
}

/// Retriggerable silence timer for one listening session.
///
/// When it expires the last partial transcript becomes the final result;
/// with nothing heard it becomes `SpeechError::NoSpeech`.
#[derive(Debug)]
pub struct SilenceWatch {
    policy: SilencePolicy,
    deadline: Option<Tick>,
    transcript: String,
}

impl SilenceWatch {
    pub fn new(policy: SilencePolicy) -> Self {
        Self {
            policy,
            deadline: None,
            transcript: String::new(),
        }
    }

    pub fn arm(&mut self, now: Tick) {
        self.transcript.clear();
        self.deadline = Some(now.after(self.policy.initial_ticks));
    }

    pub fn disarm(&mut self) {
        self.deadline = None;
        self.transcript.clear();
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// Records the best transcript so far and restarts the short timeout.
    pub fn on_partial(&mut self, text: &str, now: Tick) {
        if !self.is_armed() {
            return;
        }
        self.transcript = text.to_string();
        self.deadline = Some(now.after(self.policy.trailing_ticks));
    }

    /// Terminal event once the deadline has passed. Disarms itself.
    pub fn poll(&mut self, now: Tick) -> Option<RecognitionEvent> {
        let deadline = self.deadline?;
        if !now.has_reached(deadline) {
            return None;
        }

        let transcript = std::mem::take(&mut self.transcript);
        self.deadline = None;

        if transcript.trim().is_empty() {
            tracing::debug!("Silence timeout with nothing heard");
            Some(RecognitionEvent::Failed(SpeechError::NoSpeech))
        } else {
            tracing::debug!("Silence timeout, finalizing partial transcript");
            Some(RecognitionEvent::Result(VoiceRecognitionResult::final_text(transcript)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> SilencePolicy {
        SilencePolicy { initial_ticks: 10, trailing_ticks: 3 }
    }

    #[test]
    fn test_no_speech_after_initial_timeout() {
        let mut watch = SilenceWatch::new(policy());
        watch.arm(Tick { frame: 0 });

        assert_eq!(watch.poll(Tick { frame: 9 }), None);
        assert_eq!(watch.poll(Tick { frame: 10 }), Some(RecognitionEvent::Failed(SpeechError::NoSpeech)));
        assert!(!watch.is_armed());
        assert_eq!(watch.poll(Tick { frame: 50 }), None, "Fires only once");
    }

    #[test]
    fn test_partial_becomes_final_after_trailing_silence() {
        let mut watch = SilenceWatch::new(policy());
        watch.arm(Tick { frame: 0 });
        watch.on_partial("CRANE", Tick { frame: 2 });

        assert_eq!(watch.poll(Tick { frame: 4 }), None);
        assert_eq!(
            watch.poll(Tick { frame: 5 }),
            Some(RecognitionEvent::Result(VoiceRecognitionResult::final_text("CRANE")))
        );
    }

    #[test]
    fn test_each_partial_retriggers() {
        let mut watch = SilenceWatch::new(policy());
        watch.arm(Tick { frame: 0 });
        watch.on_partial("HOLD", Tick { frame: 1 });
        watch.on_partial("HOLD ON", Tick { frame: 3 });

        assert_eq!(watch.poll(Tick { frame: 5 }), None);
        assert!(matches!(watch.poll(Tick { frame: 6 }), Some(RecognitionEvent::Result(r)) if r.text == "HOLD ON"));
    }

    #[test]
    fn test_disarmed_ignores_partials() {
        let mut watch = SilenceWatch::new(policy());
        watch.on_partial("IGNORED", Tick { frame: 0 });
        assert_eq!(watch.poll(Tick { frame: 100 }), None);
        assert_eq!(watch.transcript(), "");
    }
}
