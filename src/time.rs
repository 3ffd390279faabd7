//! Time abstraction traits for platform-agnostic timing.
//!
//! The gauge never sleeps or spawns timers itself. Animation deadlines and
//! ramp timers are stored as instants and compared against [`TimeSource::now`]
//! whenever the host services the gauge.

/// Trait for abstracting time sources.
pub trait TimeSource<I: TimeInstant> {
    /// Returns the current time instant.
    fn now(&self) -> I;
}

/// Trait abstraction for duration types.
pub trait TimeDuration: Copy + PartialEq {
    /// Zero duration constant.
    const ZERO: Self;

    /// Converts duration to milliseconds.
    fn as_millis(&self) -> u64;

    /// Creates duration from milliseconds.
    fn from_millis(millis: u64) -> Self;

    /// Saturating subtraction (returns ZERO on underflow).
    fn saturating_sub(self, other: Self) -> Self;

    /// Scales the duration by a non-negative factor, rounded to the nearest millisecond.
    fn scaled(self, factor: f32) -> Self {
        if !factor.is_finite() || factor <= 0.0 {
            return Self::ZERO;
        }
        let millis = self.as_millis() as f32 * factor + 0.5;
        Self::from_millis(millis as u64)
    }

    /// Multiplies the duration by an integer step count, saturating on overflow.
    fn times(self, count: u32) -> Self {
        Self::from_millis(self.as_millis().saturating_mul(u64::from(count)))
    }
}

/// Trait abstraction for instant types.
///
/// Instants must be ordered so deadlines can be compared against the current time.
pub trait TimeInstant: Copy + PartialOrd {
    /// Duration type for this instant.
    type Duration: TimeDuration;

    /// Calculates duration since an earlier instant.
    fn duration_since(&self, earlier: Self) -> Self::Duration;

    /// Adds duration to instant, returns None on overflow.
    fn checked_add(self, duration: Self::Duration) -> Option<Self>;

    /// Returns the instant `duration` after `self`.
    ///
    /// Falls back to `self` when the addition overflows, so a deadline on a
    /// wrapped 32-bit timer fires early instead of never.
    fn deadline_after(self, duration: Self::Duration) -> Self {
        self.checked_add(duration).unwrap_or(self)
    }

    /// Time remaining until `deadline`, or ZERO once it has passed.
    fn until(self, deadline: Self) -> Self::Duration {
        if deadline > self {
            deadline.duration_since(self)
        } else {
            Self::Duration::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    struct Millis(u64);

    impl TimeDuration for Millis {
        const ZERO: Self = Millis(0);

        fn as_millis(&self) -> u64 {
            self.0
        }

        fn from_millis(millis: u64) -> Self {
            Millis(millis)
        }

        fn saturating_sub(self, other: Self) -> Self {
            Millis(self.0.saturating_sub(other.0))
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    struct Tick(u32);

    impl TimeInstant for Tick {
        type Duration = Millis;

        fn duration_since(&self, earlier: Self) -> Self::Duration {
            Millis(u64::from(self.0 - earlier.0))
        }

        fn checked_add(self, duration: Self::Duration) -> Option<Self> {
            let millis = u32::try_from(duration.0).ok()?;
            self.0.checked_add(millis).map(Tick)
        }
    }

    #[test]
    fn scaled_rounds_to_nearest_millisecond() {
        assert_eq!(Millis(300).scaled(1.0 / 3.0), Millis(100));
        assert_eq!(Millis(200).scaled(1.0 / 3.0), Millis(67));
        assert_eq!(Millis(200).scaled(0.0), Millis::ZERO);
        assert_eq!(Millis(200).scaled(-1.0), Millis::ZERO);
        assert_eq!(Millis(200).scaled(f32::NAN), Millis::ZERO);
    }

    #[test]
    fn times_saturates() {
        assert_eq!(Millis(100).times(4), Millis(400));
        assert_eq!(Millis(u64::MAX).times(2), Millis(u64::MAX));
    }

    #[test]
    fn deadline_after_falls_back_on_overflow() {
        assert_eq!(Tick(10).deadline_after(Millis(5)), Tick(15));
        assert_eq!(Tick(u32::MAX - 1).deadline_after(Millis(5)), Tick(u32::MAX - 1));
    }

    #[test]
    fn until_is_zero_once_deadline_passed() {
        assert_eq!(Tick(10).until(Tick(25)), Millis(15));
        assert_eq!(Tick(25).until(Tick(25)), Millis::ZERO);
        assert_eq!(Tick(30).until(Tick(25)), Millis::ZERO);
    }
}
