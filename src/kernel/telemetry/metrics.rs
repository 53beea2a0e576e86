use std::collections::VecDeque;

use serde::Serialize;

use super::event::{OutcomeKind, TelemetryEvent};
use crate::kernel::event::EventKind;

#[derive(Debug, Clone, Default, Serialize)]
pub struct TelemetrySnapshot {
    pub turn_stats: TurnStats,
    pub interruption_stats: InterruptionStats,
    pub ghost_stats: GhostStats,
    pub rejected_operations: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TurnStats {
    pub began: u64,
    pub replies: u64,
    pub spoken: u64,
    pub failed: u64,
    pub cancelled: u64,
    pub repeats: u64,
    pub total_reply_latency_ticks: u64,
    pub avg_reply_latency_ticks: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct InterruptionStats {
    pub count: u64,
    pub total_speaking_ticks: u64,
    pub avg_speaking_ticks: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GhostStats {
    pub dropped: u64,
    pub speech: u64,
    pub recognition: u64,
}

pub fn compute_snapshot(events: &VecDeque<TelemetryEvent>) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();

    for event in events {
        match event {
            TelemetryEvent::TurnBegan { .. } => snap.turn_stats.began += 1,
            TelemetryEvent::TurnResolved { outcome, latency_ticks, .. } => match outcome {
                OutcomeKind::Reply => {
                    snap.turn_stats.replies += 1;
                    snap.turn_stats.total_reply_latency_ticks += latency_ticks;
                }
                OutcomeKind::Spoken => snap.turn_stats.spoken += 1,
                OutcomeKind::Failed => snap.turn_stats.failed += 1,
                OutcomeKind::Cancelled => snap.turn_stats.cancelled += 1,
            },
            TelemetryEvent::BargeIn { speaking_ticks, .. } => {
                snap.interruption_stats.count += 1;
                snap.interruption_stats.total_speaking_ticks += speaking_ticks;
            }
            TelemetryEvent::Repeat { .. } => snap.turn_stats.repeats += 1,
            TelemetryEvent::GhostDropped { event, .. } => {
                snap.ghost_stats.dropped += 1;
                match event {
                    EventKind::SpeechFinished | EventKind::SpeechFailed => snap.ghost_stats.speech += 1,
                    EventKind::PartialResult | EventKind::FinalResult | EventKind::RecognitionFailed => {
                        snap.ghost_stats.recognition += 1
                    }
                }
            }
            TelemetryEvent::Rejected { .. } => snap.rejected_operations += 1,
        }
    }

    // Compute Averages
    if snap.turn_stats.replies > 0 {
        snap.turn_stats.avg_reply_latency_ticks =
            snap.turn_stats.total_reply_latency_ticks as f64 / snap.turn_stats.replies as f64;
    }

    if snap.interruption_stats.count > 0 {
        snap.interruption_stats.avg_speaking_ticks =
            snap.interruption_stats.total_speaking_ticks as f64 / snap.interruption_stats.count as f64;
    }

    snap
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::state::TurnState;

    #[test]
    fn test_snapshot_counts_and_averages() {
        let mut events = VecDeque::new();
        events.push_back(TelemetryEvent::TurnResolved {
            turn_id: "a".into(),
            outcome: OutcomeKind::Reply,
            latency_ticks: 10,
        });
        events.push_back(TelemetryEvent::TurnResolved {
            turn_id: "b".into(),
            outcome: OutcomeKind::Reply,
            latency_ticks: 30,
        });
        events.push_back(TelemetryEvent::TurnResolved {
            turn_id: "c".into(),
            outcome: OutcomeKind::Cancelled,
            latency_ticks: 99,
        });
        events.push_back(TelemetryEvent::GhostDropped {
            event: EventKind::FinalResult,
            state: TurnState::Idle,
        });

        let snap = compute_snapshot(&events);
        assert_eq!(snap.turn_stats.replies, 2);
        assert_eq!(snap.turn_stats.cancelled, 1);
        assert_eq!(snap.turn_stats.avg_reply_latency_ticks, 20.0);
        assert_eq!(snap.ghost_stats.recognition, 1);
        assert_eq!(snap.interruption_stats.avg_speaking_ticks, 0.0);
    }
}
