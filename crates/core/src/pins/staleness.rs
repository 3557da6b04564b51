//! Staleness clock: pure functions of `now` and a pin's last access time.

use chrono::{DateTime, Duration, Utc};

use super::policy::PinPolicy;
use super::types::PinnedItem;

/// Returns how long the pin has been idle, clamped at zero when the clock
/// reads earlier than the last access.
pub fn idle_duration(pin: &PinnedItem, now: DateTime<Utc>) -> Duration {
    (now - pin.last_accessed_at).max(Duration::zero())
}

/// Returns true if the pin has been idle for at least the stale threshold.
///
/// Staleness is a display signal only and never removes a pin.
pub fn is_stale(pin: &PinnedItem, now: DateTime<Utc>, policy: &PinPolicy) -> bool {
    idle_duration(pin, now) >= policy.stale_after()
}

/// Returns true if the pin has been idle long enough to be removed automatically.
pub fn is_auto_unpin_eligible(pin: &PinnedItem, now: DateTime<Utc>, policy: &PinPolicy) -> bool {
    idle_duration(pin, now) >= policy.auto_unpin_after()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pins::types::{EntityRef, EntityType};
    use chrono::TimeZone;
    use uuid::Uuid;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    fn pin_at(at: DateTime<Utc>) -> PinnedItem {
        let entity = EntityRef::new(EntityType::Task, Uuid::new_v4());
        PinnedItem::new(Uuid::new_v4(), entity, 0, at)
    }

    #[test]
    fn test_idle_duration() {
        let pin = pin_at(t0());
        assert_eq!(idle_duration(&pin, t0() + Duration::hours(5)), Duration::hours(5));
    }

    #[test]
    fn test_idle_duration_clamps_clock_skew() {
        let pin = pin_at(t0());
        assert_eq!(idle_duration(&pin, t0() - Duration::days(1)), Duration::zero());
    }

    #[test]
    fn test_stale_boundary_is_inclusive() {
        let policy = PinPolicy::default();
        let pin = pin_at(t0());

        assert!(!is_stale(&pin, t0() + Duration::days(14) - Duration::seconds(1), &policy));
        assert!(is_stale(&pin, t0() + Duration::days(14), &policy));
    }

    #[test]
    fn test_auto_unpin_boundary_is_inclusive() {
        let policy = PinPolicy::default();
        let pin = pin_at(t0());

        assert!(!is_auto_unpin_eligible(&pin, t0() + Duration::days(20), &policy));
        assert!(is_auto_unpin_eligible(&pin, t0() + Duration::days(21), &policy));
    }

    #[test]
    fn test_stale_is_independent_of_auto_unpin_threshold() {
        let pin = pin_at(t0());
        let now = t0() + Duration::days(15);

        let short = PinPolicy::default().with_auto_unpin_after_days(1);
        let long = PinPolicy::default().with_auto_unpin_after_days(365);

        assert!(is_stale(&pin, now, &short));
        assert!(is_stale(&pin, now, &long));
    }
}
