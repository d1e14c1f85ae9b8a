//! Scoring for reboot attempts: fast successes on hard stages are worth
//! the most, failures bleed points but the running total never goes
//! below zero.

const SUCCESS_COEF: f64 = 2.0;
const FAILURE_COEF: f64 = -1.0;

/// Signed score delta for a single attempt.
///
/// `level` is the 1-indexed difficulty of the stage in play and
/// `elapsed_ms` the typing time for the attempt measured from focus
/// acquisition.
pub fn score_delta(level: usize, elapsed_ms: u64, max_game_duration_ms: u64, is_success: bool) -> i64 {
    let coef = if is_success { SUCCESS_COEF } else { FAILURE_COEF };
    let time_coef = (max_game_duration_ms as f64 - elapsed_ms as f64) / 1000.0;
    (level as f64 * time_coef * coef).round() as i64
}

/// Running score for a session. Success deltas are added as-is; failure
/// deltas are absorbed but the total is floored at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreTally {
    total: i64,
}

impl ScoreTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, delta: i64, is_success: bool) {
        if is_success {
            self.total += delta;
        } else {
            self.total = (self.total + delta).max(0);
        }
    }

    pub fn total(&self) -> i64 {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instant_success_at_level_one() {
        assert_eq!(score_delta(1, 0, 90_000, true), 180);
    }

    #[test]
    fn test_slowest_failure_is_zero() {
        assert_eq!(score_delta(1, 90_000, 90_000, false), 0);
    }

    #[test]
    fn test_level_scales_delta() {
        assert_eq!(score_delta(3, 0, 90_000, true), 540);
        assert_eq!(score_delta(5, 30_000, 90_000, true), 600);
    }

    #[test]
    fn test_failure_delta_is_negative() {
        assert_eq!(score_delta(2, 10_000, 90_000, false), -160);
    }

    #[test]
    fn test_rounding() {
        // 1 * (90000 - 89_250)/1000 * 2 = 1.5 -> rounds away from zero
        assert_eq!(score_delta(1, 89_250, 90_000, true), 2);
        assert_eq!(score_delta(1, 89_500, 90_000, true), 1);
    }

    #[test]
    fn test_tally_floors_failures_at_zero() {
        let mut tally = ScoreTally::new();
        for _ in 0..5 {
            tally.record(score_delta(1, 0, 90_000, false), false);
            assert_eq!(tally.total(), 0);
        }
    }

    #[test]
    fn test_tally_accumulates_successes() {
        let mut tally = ScoreTally::new();
        tally.record(180, true);
        tally.record(90, true);
        assert_eq!(tally.total(), 270);
    }

    #[test]
    fn test_tally_failure_partial_drain() {
        let mut tally = ScoreTally::new();
        tally.record(100, true);
        tally.record(-40, false);
        assert_eq!(tally.total(), 60);
        tally.record(-200, false);
        assert_eq!(tally.total(), 0);
    }
}
