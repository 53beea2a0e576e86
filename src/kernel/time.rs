use serde::{Deserialize, Serialize};

/// Logical clock of the turn loop. One frame per Reactor cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Tick {
    pub frame: u64,
}

pub const TICK_MS: u64 = 20;

impl Tick {
    pub fn new() -> Self {
        Tick { frame: 0 }
    }

    pub fn next(&self) -> Self {
        Tick { frame: self.frame + 1 }
    }

    /// Deadline `ticks` frames after this one.
    pub fn after(&self, ticks: u64) -> Self {
        Tick { frame: self.frame.saturating_add(ticks) }
    }

    pub fn since(&self, earlier: Tick) -> u64 {
        self.frame.saturating_sub(earlier.frame)
    }

    pub fn has_reached(&self, deadline: Tick) -> bool {
        self.frame >= deadline.frame
    }
}

/// Converts a wall-clock duration into whole ticks, rounding up.
/// Any non-zero duration lasts at least one tick.
pub fn ticks_from_ms(ms: u64) -> u64 {
    if ms == 0 {
        return 0;
    }
    ms.div_ceil(TICK_MS).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_round_up() {
        assert_eq!(ticks_from_ms(0), 0);
        assert_eq!(ticks_from_ms(1), 1);
        assert_eq!(ticks_from_ms(20), 1);
        assert_eq!(ticks_from_ms(21), 2);
        assert_eq!(ticks_from_ms(300), 15);
    }

    #[test]
    fn test_deadline_arithmetic() {
        let start = Tick { frame: 10 };
        let deadline = start.after(5);
        assert!(!Tick { frame: 14 }.has_reached(deadline));
        assert!(Tick { frame: 15 }.has_reached(deadline));
        assert_eq!(deadline.since(start), 5);
        assert_eq!(start.since(deadline), 0);
    }
}
