//! One-shot deadlines and the heat readout. The engine owns exactly one
//! of each timer kind and cancels it in the exit action of the state
//! that armed it; a deadline that outlives its state must never fire.

use std::time::{Duration, Instant};

/// A cancellable one-shot deadline. Arming replaces any pending
/// deadline, firing disarms, and a cancelled timer never fires.
#[derive(Debug, Clone, Copy, Default)]
pub struct OneShot {
    deadline: Option<Instant>,
}

impl OneShot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, now: Instant, after: Duration) {
        self.deadline = Some(now + after);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Fires at most once: returns true when the deadline has passed and
    /// disarms the timer in the same call.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }
}

/// Fraction of the wave's time budget already burned, clamped to [0, 1].
pub fn heat_ratio(wave_start: Instant, now: Instant, max_game_duration: Duration) -> f64 {
    if max_game_duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(wave_start).as_secs_f64();
    (elapsed / max_game_duration.as_secs_f64()).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_fires_once() {
        let start = Instant::now();
        let mut timer = OneShot::new();
        timer.arm(start, Duration::from_millis(100));

        assert!(!timer.fire_if_due(start));
        assert!(!timer.fire_if_due(start + Duration::from_millis(99)));
        assert!(timer.fire_if_due(start + Duration::from_millis(100)));
        // Disarmed after firing.
        assert!(!timer.fire_if_due(start + Duration::from_secs(10)));
        assert_eq!(timer.remaining(start), None);
    }

    #[test]
    fn test_cancel_prevents_fire() {
        let start = Instant::now();
        let mut timer = OneShot::new();
        timer.arm(start, Duration::from_millis(10));
        timer.cancel();

        assert!(!timer.fire_if_due(start + Duration::from_secs(1)));
    }

    #[test]
    fn test_rearm_replaces_deadline() {
        let start = Instant::now();
        let mut timer = OneShot::new();
        timer.arm(start, Duration::from_millis(10));
        timer.arm(start, Duration::from_millis(500));

        assert!(!timer.fire_if_due(start + Duration::from_millis(100)));
        assert!(timer.fire_if_due(start + Duration::from_millis(500)));
    }

    #[test]
    fn test_remaining() {
        let start = Instant::now();
        let mut timer = OneShot::new();
        assert_eq!(timer.remaining(start), None);

        timer.arm(start, Duration::from_millis(100));
        assert_eq!(
            timer.remaining(start + Duration::from_millis(40)),
            Some(Duration::from_millis(60))
        );
        // Past the deadline the remainder saturates at zero.
        assert_eq!(
            timer.remaining(start + Duration::from_millis(200)),
            Some(Duration::ZERO)
        );
    }

    #[test]
    fn test_heat_ratio_clamps() {
        let start = Instant::now();
        let budget = Duration::from_secs(90);

        assert_eq!(heat_ratio(start, start, budget), 0.0);
        let half = heat_ratio(start, start + Duration::from_secs(45), budget);
        assert!((half - 0.5).abs() < 1e-9);
        assert_eq!(heat_ratio(start, start + Duration::from_secs(400), budget), 1.0);
    }

    #[test]
    fn test_heat_ratio_zero_budget() {
        let start = Instant::now();
        assert_eq!(heat_ratio(start, start, Duration::ZERO), 1.0);
    }
}
