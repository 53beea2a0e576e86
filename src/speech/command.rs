use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use super::{SpeechOutput, SpeechSignal};
use crate::error::SpeechError;
use crate::kernel::time::Tick;

/// Speaks through an external text-to-speech command (`say`, `espeak`, ...).
///
/// The prompt text is passed as the last argument. The child is killed on
/// `stop` and when the speaker is dropped. Completions of stopped
/// utterances are discarded by generation.
pub struct CommandSpeaker {
    program: String,
    args: Vec<String>,
    generation: u64,
    active: Option<u64>,
    stop_tx: Option<oneshot::Sender<()>>,
    done_tx: mpsc::UnboundedSender<(u64, SpeechSignal)>,
    done_rx: mpsc::UnboundedReceiver<(u64, SpeechSignal)>,
}

impl CommandSpeaker {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        let (done_tx, done_rx) = mpsc::unbounded_channel();
        Self {
            program: program.into(),
            args,
            generation: 0,
            active: None,
            stop_tx: None,
            done_tx,
            done_rx,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl SpeechOutput for CommandSpeaker {
    fn speak(&mut self, text: &str, _now: Tick) -> Result<(), SpeechError> {
        self.stop();
        self.generation += 1;
        let generation = self.generation;

        let mut child = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SpeechError::Unavailable(format!("failed to spawn '{}': {}", self.program, e)))?;

        debug!("Spawned '{}' for utterance {}", self.program, generation);

        let (stop_tx, mut stop_rx) = oneshot::channel();
        self.stop_tx = Some(stop_tx);
        self.active = Some(generation);

        let done_tx = self.done_tx.clone();
        tokio::spawn(async move {
            let signal = tokio::select! {
                status = child.wait() => match status {
                    Ok(status) if status.success() => SpeechSignal::Finished,
                    Ok(status) => SpeechSignal::Failed(SpeechError::Synthesis(format!("speech command exited with {}", status))),
                    Err(e) => SpeechSignal::Failed(SpeechError::from(e)),
                },
                _ = &mut stop_rx => {
                    let _ = child.kill().await;
                    return;
                }
            };
            let _ = done_tx.send((generation, signal));
        });

        Ok(())
    }

    fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        self.active = None;
    }

    fn poll(&mut self, _now: Tick) -> Option<SpeechSignal> {
        let mut signal = None;
        while let Ok((generation, outcome)) = self.done_rx.try_recv() {
            if self.active == Some(generation) {
                signal = Some(outcome);
            } else {
                warn!("Discarding completion of stopped utterance {}", generation);
            }
        }
        if signal.is_some() {
            self.active = None;
            self.stop_tx = None;
        }
        signal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn wait_for_signal(speaker: &mut CommandSpeaker) -> Option<SpeechSignal> {
        for frame in 0..250 {
            if let Some(signal) = speaker.poll(Tick { frame }) {
                return Some(signal);
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        None
    }

    #[tokio::test]
    async fn test_successful_command_finishes() {
        let mut speaker = CommandSpeaker::new("true", vec![]);
        speaker.speak("hello", Tick::new()).unwrap();
        assert_eq!(wait_for_signal(&mut speaker).await, Some(SpeechSignal::Finished));
        assert_eq!(speaker.poll(Tick::new()), None, "Reported once");
    }

    #[tokio::test]
    async fn test_failing_command_reports_failure() {
        let mut speaker = CommandSpeaker::new("false", vec![]);
        speaker.speak("hello", Tick::new()).unwrap();
        assert!(matches!(
            wait_for_signal(&mut speaker).await,
            Some(SpeechSignal::Failed(SpeechError::Synthesis(_)))
        ));
    }

    #[tokio::test]
    async fn test_missing_program_is_unavailable() {
        let mut speaker = CommandSpeaker::new("definitely-not-a-tts-binary", vec![]);
        assert!(matches!(speaker.speak("hello", Tick::new()), Err(SpeechError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_stopped_utterance_stays_silent() {
        let mut speaker = CommandSpeaker::new("sleep", vec![]);
        speaker.speak("5", Tick::new()).unwrap();
        speaker.stop();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(speaker.poll(Tick::new()), None);
    }
}
