//! Schedule time types
//!
//! This module defines the two time types used throughout the system:
//! - Time: a monotonic instant with nanosecond resolution
//! - Duration: a signed span between two instants
//!
//! Instants are measured from the schedule epoch (the moment the traffic
//! authority started); epochs before the system start are out of contract,
//! so `Time` is non-negative by construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};

/// Nanoseconds per second, shared by both conversions below.
const NANOS_PER_SEC: u64 = 1_000_000_000;
const NANOS_PER_MILLI: u64 = 1_000_000;

/// A monotonic instant with nanosecond resolution
///
/// `Time` is an opaque count of nanoseconds since the schedule epoch.
/// It is `Copy`, totally ordered, and non-negative by construction.
///
/// # Examples
///
/// ```
/// use corridor_core::{Duration, Time};
///
/// let t = Time::from_secs(10);
/// assert_eq!(t + Duration::from_secs(5), Time::from_secs(15));
/// assert_eq!(Time::from_secs(15) - t, Duration::from_secs(5));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Time {
    nanos: u64,
}

impl Time {
    /// The schedule epoch (time zero)
    pub const ZERO: Time = Time { nanos: 0 };

    /// Create an instant from whole seconds since the schedule epoch
    pub fn from_secs(secs: u64) -> Self {
        Time {
            nanos: secs * NANOS_PER_SEC,
        }
    }

    /// Create an instant from milliseconds since the schedule epoch
    pub fn from_millis(millis: u64) -> Self {
        Time {
            nanos: millis * NANOS_PER_MILLI,
        }
    }

    /// Create an instant from nanoseconds since the schedule epoch
    pub fn from_nanos(nanos: u64) -> Self {
        Time { nanos }
    }

    /// Nanoseconds since the schedule epoch
    pub fn as_nanos(&self) -> u64 {
        self.nanos
    }

    /// Split into whole seconds and the sub-second nanosecond remainder
    ///
    /// This is the representation message-level collaborators exchange
    /// (`sec` + `nanosec` fields), so the split/join pair lives here.
    pub fn to_parts(&self) -> (u64, u32) {
        (
            self.nanos / NANOS_PER_SEC,
            (self.nanos % NANOS_PER_SEC) as u32,
        )
    }

    /// Rejoin a seconds + sub-second nanoseconds pair into an instant
    pub fn from_parts(secs: u64, nanos: u32) -> Self {
        Time {
            nanos: secs * NANOS_PER_SEC + u64::from(nanos),
        }
    }

    /// Shift this instant by a signed duration, or `None` if the result
    /// would land before the schedule epoch or overflow
    pub fn checked_add(self, delta: Duration) -> Option<Time> {
        let shifted = if delta.nanos >= 0 {
            self.nanos.checked_add(delta.nanos as u64)?
        } else {
            self.nanos.checked_sub(delta.nanos.unsigned_abs())?
        };
        Some(Time { nanos: shifted })
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (secs, nanos) = self.to_parts();
        write!(f, "{}.{:09}s", secs, nanos)
    }
}

impl Add<Duration> for Time {
    type Output = Time;

    /// Shift an instant by a signed duration
    ///
    /// # Panics
    ///
    /// Panics if the result would land before the schedule epoch. Code
    /// paths handling untrusted durations use [`Time::checked_add`].
    fn add(self, delta: Duration) -> Time {
        self.checked_add(delta)
            .expect("time shifted before the schedule epoch")
    }
}

impl Sub<Time> for Time {
    type Output = Duration;

    fn sub(self, earlier: Time) -> Duration {
        Duration {
            nanos: self.nanos as i64 - earlier.nanos as i64,
        }
    }
}

/// A signed span between two instants, nanosecond resolution
///
/// Negative durations shift instants earlier; the schedule uses them to
/// pull a previously delayed trajectory back in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Duration {
    nanos: i64,
}

impl Duration {
    /// The zero-length span
    pub const ZERO: Duration = Duration { nanos: 0 };

    /// Create a span from whole seconds
    pub fn from_secs(secs: i64) -> Self {
        Duration {
            nanos: secs * NANOS_PER_SEC as i64,
        }
    }

    /// Create a span from milliseconds
    pub fn from_millis(millis: i64) -> Self {
        Duration {
            nanos: millis * NANOS_PER_MILLI as i64,
        }
    }

    /// Create a span from nanoseconds
    pub fn from_nanos(nanos: i64) -> Self {
        Duration { nanos }
    }

    /// Signed nanosecond count
    pub fn as_nanos(&self) -> i64 {
        self.nanos
    }

    /// True iff this span shifts instants earlier
    pub fn is_negative(&self) -> bool {
        self.nanos < 0
    }
}

impl Neg for Duration {
    type Output = Duration;

    fn neg(self) -> Duration {
        Duration { nanos: -self.nanos }
    }
}

impl Add<Duration> for Duration {
    type Output = Duration;

    fn add(self, other: Duration) -> Duration {
        Duration {
            nanos: self.nanos + other.nanos,
        }
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ns", self.nanos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Construction and accessors ===

    #[test]
    fn test_time_from_secs_matches_nanos() {
        assert_eq!(Time::from_secs(3).as_nanos(), 3_000_000_000);
        assert_eq!(Time::from_millis(1500).as_nanos(), 1_500_000_000);
        assert_eq!(Time::from_nanos(42).as_nanos(), 42);
    }

    #[test]
    fn test_time_zero_is_epoch() {
        assert_eq!(Time::ZERO, Time::from_nanos(0));
        assert_eq!(Time::default(), Time::ZERO);
    }

    #[test]
    fn test_time_ordering() {
        assert!(Time::from_secs(1) < Time::from_secs(2));
        assert!(Time::from_nanos(999_999_999) < Time::from_secs(1));
    }

    // === Parts conversion ===

    #[test]
    fn test_time_parts_round_trip() {
        let t = Time::from_nanos(5_000_000_123);
        let (secs, nanos) = t.to_parts();
        assert_eq!(secs, 5);
        assert_eq!(nanos, 123);
        assert_eq!(Time::from_parts(secs, nanos), t);
    }

    #[test]
    fn test_time_parts_sub_second() {
        let (secs, nanos) = Time::from_nanos(123).to_parts();
        assert_eq!((secs, nanos), (0, 123));
    }

    // === Arithmetic ===

    #[test]
    fn test_time_plus_duration() {
        let t = Time::from_secs(10) + Duration::from_secs(5);
        assert_eq!(t, Time::from_secs(15));

        let t = Time::from_secs(10) + Duration::from_secs(-4);
        assert_eq!(t, Time::from_secs(6));
    }

    #[test]
    fn test_time_difference_is_signed() {
        let a = Time::from_secs(3);
        let b = Time::from_secs(8);
        assert_eq!(b - a, Duration::from_secs(5));
        assert_eq!(a - b, Duration::from_secs(-5));
    }

    #[test]
    fn test_checked_add_underflow_returns_none() {
        assert_eq!(Time::from_secs(1).checked_add(Duration::from_secs(-2)), None);
        assert_eq!(
            Time::from_secs(1).checked_add(Duration::from_secs(-1)),
            Some(Time::ZERO)
        );
    }

    #[test]
    #[should_panic(expected = "before the schedule epoch")]
    fn test_add_underflow_panics() {
        let _ = Time::ZERO + Duration::from_nanos(-1);
    }

    #[test]
    fn test_duration_negation_and_sum() {
        let d = Duration::from_millis(250);
        assert_eq!(-d, Duration::from_millis(-250));
        assert!((-d).is_negative());
        assert_eq!(d + d, Duration::from_millis(500));
    }

    // === Serialization ===

    #[test]
    fn test_time_serde_round_trip() {
        let t = Time::from_nanos(987_654_321);
        let json = serde_json::to_string(&t).unwrap();
        let restored: Time = serde_json::from_str(&json).unwrap();
        assert_eq!(t, restored, "Time should roundtrip through JSON");
    }

    #[test]
    fn test_duration_serde_round_trip() {
        let d = Duration::from_nanos(-12345);
        let json = serde_json::to_string(&d).unwrap();
        let restored: Duration = serde_json::from_str(&json).unwrap();
        assert_eq!(d, restored, "Duration should roundtrip through JSON");
    }
}
