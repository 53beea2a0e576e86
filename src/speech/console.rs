use std::io::BufRead;

use tokio::sync::mpsc;
use tracing::{debug, info};

use super::{SpeechOutput, SpeechSignal};
use crate::error::SpeechError;
use crate::kernel::time::{ticks_from_ms, Tick};

/// Prints prompts to the console and finishes after the time a voice would
/// need to read them aloud.
pub struct ConsoleSpeaker {
    words_per_minute: u32,
    deadline: Option<Tick>,
}

impl ConsoleSpeaker {
    pub fn new(words_per_minute: u32) -> Self {
        Self {
            words_per_minute: words_per_minute.max(1),
            deadline: None,
        }
    }

    /// Estimated speaking time in ticks.
    pub fn duration_ticks(&self, text: &str) -> u64 {
        let words = text.split_whitespace().count() as u64;
        ticks_from_ms(words * 60_000 / self.words_per_minute as u64).max(1)
    }
}

impl SpeechOutput for ConsoleSpeaker {
    fn speak(&mut self, text: &str, now: Tick) -> Result<(), SpeechError> {
        println!("[SAY] {}", text);
        self.deadline = Some(now.after(self.duration_ticks(text)));
        Ok(())
    }

    fn stop(&mut self) {
        if self.deadline.take().is_some() {
            println!("[SAY] (interrupted)");
        }
    }

    fn poll(&mut self, now: Tick) -> Option<SpeechSignal> {
        let deadline = self.deadline?;
        if now.has_reached(deadline) {
            self.deadline = None;
            return Some(SpeechSignal::Finished);
        }
        None
    }
}

/// Forwards each non-empty stdin line as a transcript fragment.
///
/// Runs on a dedicated thread with blocking reads so a pending read never
/// holds up runtime shutdown.
pub fn spawn_stdin_reader(tx: mpsc::UnboundedSender<String>) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            debug!("Console input: '{}'", line);
            if tx.send(line).is_err() {
                break;
            }
        }
        info!("Console input closed");
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_scales_with_words() {
        let speaker = ConsoleSpeaker::new(180);
        // 3 words at 180 wpm = 1000ms = 50 ticks
        assert_eq!(speaker.duration_ticks("one two three"), 50);
        assert_eq!(speaker.duration_ticks(""), 1);
    }

    #[test]
    fn test_finishes_at_deadline_once() {
        let mut speaker = ConsoleSpeaker::new(6000);
        speaker.speak("hello there", Tick { frame: 0 }).unwrap();
        let ticks = speaker.duration_ticks("hello there");

        assert_eq!(speaker.poll(Tick { frame: ticks - 1 }), None);
        assert_eq!(speaker.poll(Tick { frame: ticks }), Some(SpeechSignal::Finished));
        assert_eq!(speaker.poll(Tick { frame: ticks + 1 }), None);
    }

    #[test]
    fn test_stop_suppresses_completion() {
        let mut speaker = ConsoleSpeaker::new(180);
        speaker.speak("hello", Tick { frame: 0 }).unwrap();
        speaker.stop();
        speaker.stop();
        assert_eq!(speaker.poll(Tick { frame: 1000 }), None);
    }
}
