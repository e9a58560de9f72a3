//! Advisory think-time bookkeeping.
//!
//! The clock only observes. It never interrupts a player; a side that takes longer
//! than the budget is merely reported once the game is over.

use std::time::{Duration, Instant};

use crate::types::Side;

/// A side whose slowest move exceeded the budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overrun {
    pub side: Side,
    pub slowest: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct ThinkClock {
    started: Option<(Side, Instant)>,
    slowest: [Duration; 2],
}

impl ThinkClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// A request was just issued to `side`.
    pub fn start(&mut self, side: Side) {
        self.started = Some((side, Instant::now()));
    }

    /// The running request was answered at `at`. Returns the measured think time.
    pub fn stop_at(&mut self, at: Instant) -> Option<(Side, Duration)> {
        let (side, since) = self.started.take()?;
        let elapsed = at.saturating_duration_since(since);
        let i = side.index();
        self.slowest[i] = self.slowest[i].max(elapsed);
        Some((side, elapsed))
    }

    pub fn stop(&mut self) -> Option<(Side, Duration)> {
        self.stop_at(Instant::now())
    }

    pub fn slowest(&self, side: Side) -> Duration {
        self.slowest[side.index()]
    }

    /// Sides whose slowest move took longer than `budget`.
    pub fn overruns(&self, budget: Duration) -> Vec<Overrun> {
        Side::ALL
            .into_iter()
            .filter(|&s| self.slowest(s) > budget)
            .map(|side| Overrun {
                side,
                slowest: self.slowest(side),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_slowest_per_side() {
        let mut clock = ThinkClock::new();
        let t0 = Instant::now();

        clock.started = Some((Side::Black, t0));
        assert_eq!(
            clock.stop_at(t0 + Duration::from_millis(30)),
            Some((Side::Black, Duration::from_millis(30)))
        );

        clock.started = Some((Side::Black, t0));
        clock.stop_at(t0 + Duration::from_millis(10));

        assert_eq!(clock.slowest(Side::Black), Duration::from_millis(30));
        assert_eq!(clock.slowest(Side::White), Duration::ZERO);
    }

    #[test]
    fn stop_without_start_is_ignored() {
        let mut clock = ThinkClock::new();
        assert_eq!(clock.stop(), None);
    }

    #[test]
    fn reports_overruns_only() {
        let mut clock = ThinkClock::new();
        let t0 = Instant::now();
        clock.started = Some((Side::White, t0));
        clock.stop_at(t0 + Duration::from_secs(12));
        clock.started = Some((Side::Black, t0));
        clock.stop_at(t0 + Duration::from_secs(1));

        let overruns = clock.overruns(Duration::from_secs(10));
        assert_eq!(
            overruns,
            vec![Overrun {
                side: Side::White,
                slowest: Duration::from_secs(12)
            }]
        );
    }
}
