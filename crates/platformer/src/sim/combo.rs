use std::time::Duration;

use serde::Serialize;

const BASE_STOMP_POINTS: u32 = 100;
const POINTS_PER_CHAINED_STOMP: u32 = 50;

/// Stomp chain. Each stomp inside the timeout window is worth 50 more
/// points than the previous one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Combo {
    count: u32,
    last_stomp_at: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComboIndicator {
    pub count: u32,
    /// Fraction of the timeout window still left, 1.0 right after a stomp.
    pub remaining: f32,
}

impl Combo {
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Registers a stomp at `now` and returns the points it is worth.
    pub fn register_stomp(&mut self, now: Duration) -> u32 {
        let points = BASE_STOMP_POINTS + self.count * POINTS_PER_CHAINED_STOMP;
        self.count += 1;
        self.last_stomp_at = now;
        points
    }

    /// Returns true when the chain was reset on this call.
    pub fn expire(&mut self, now: Duration, timeout: Duration) -> bool {
        if self.count > 0 && now.saturating_sub(self.last_stomp_at) > timeout {
            self.count = 0;
            return true;
        }
        false
    }

    pub fn indicator(&self, now: Duration, timeout: Duration) -> Option<ComboIndicator> {
        if self.count <= 1 || timeout.is_zero() {
            return None;
        }
        let elapsed = now.saturating_sub(self.last_stomp_at);
        let remaining = timeout.saturating_sub(elapsed).as_secs_f32() / timeout.as_secs_f32();
        Some(ComboIndicator {
            count: self.count,
            remaining: remaining.clamp(0.0, 1.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(2);

    #[test]
    fn chained_stomps_pay_increasing_points() {
        let mut combo = Combo::default();
        let points: Vec<u32> = (0..3)
            .map(|i| combo.register_stomp(Duration::from_millis(i * 500)))
            .collect();
        assert_eq!(points, vec![100, 150, 200]);
        assert_eq!(combo.count(), 3);
    }

    #[test]
    fn chain_resets_only_after_timeout_passes() {
        let mut combo = Combo::default();
        combo.register_stomp(Duration::from_secs(1));

        assert!(!combo.expire(Duration::from_secs(3), TIMEOUT));
        assert_eq!(combo.count(), 1);
        assert!(combo.expire(Duration::from_millis(3_001), TIMEOUT));
        assert_eq!(combo.count(), 0);
        assert!(!combo.expire(Duration::from_secs(10), TIMEOUT));
    }

    #[test]
    fn indicator_needs_two_stomps_and_fades() {
        let mut combo = Combo::default();
        combo.register_stomp(Duration::ZERO);
        assert!(combo.indicator(Duration::ZERO, TIMEOUT).is_none());

        combo.register_stomp(Duration::from_secs(1));
        let fresh = combo.indicator(Duration::from_secs(1), TIMEOUT).expect("indicator");
        assert_eq!(fresh.count, 2);
        assert!((fresh.remaining - 1.0).abs() < f32::EPSILON);

        let half = combo.indicator(Duration::from_secs(2), TIMEOUT).expect("indicator");
        assert!((half.remaining - 0.5).abs() < 1e-6);
    }
}
