use chrono::{DateTime, Duration, Utc};

/// A simple clock abstraction for deterministic time in services and tests.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns a clock that uses the current system time.
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// Returns the current time according to the clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// Session seed derived from the clock's wall time in milliseconds.
    ///
    /// Only the low 32 bits are kept; the shuffle is seeded with a `u32`.
    #[must_use]
    pub fn session_seed(&self) -> u32 {
        seed_from_millis(self.now().timestamp_millis())
    }

    /// If this is a fixed clock, advance it by the given duration.
    ///
    /// Has no effect on `Clock::Default`.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }
}

/// Truncates a millisecond timestamp to a 32-bit seed.
#[must_use]
pub fn seed_from_millis(millis: i64) -> u32 {
    let masked = millis & i64::from(u32::MAX);
    u32::try_from(masked).unwrap_or(0)
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_gives_stable_seed() {
        let clock = fixed_clock();
        assert_eq!(clock.session_seed(), clock.session_seed());
        assert_eq!(
            clock.session_seed(),
            seed_from_millis(FIXED_TEST_TIMESTAMP * 1000)
        );
    }

    #[test]
    fn advancing_changes_seed() {
        let mut clock = fixed_clock();
        let before = clock.session_seed();
        clock.advance(Duration::milliseconds(1));
        assert_eq!(clock.session_seed(), before.wrapping_add(1));
    }

    #[test]
    fn seed_keeps_low_bits() {
        assert_eq!(seed_from_millis(0x1_0000_0005), 5);
        assert_eq!(seed_from_millis(-1), u32::MAX);
    }
}
