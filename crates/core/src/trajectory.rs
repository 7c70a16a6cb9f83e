//! Time-parameterized trajectories
//!
//! A [`Trajectory`] is an immutable-once-scheduled sequence of waypoints
//! ordered by strictly increasing time. Revising a scheduled trajectory
//! always produces a new value; the schedule database never mutates a
//! stored trajectory in place.
//!
//! The two revision helpers here ([`Trajectory::delayed_from`] and
//! [`Trajectory::spliced_with`]) compute the successor trajectory for the
//! schedule's delay and interrupt operations eagerly, so every stored
//! revision carries the motion actually in force.

use crate::error::{Result, ScheduleError};
use crate::time::{Duration, Time};
use serde::{Deserialize, Serialize};

/// One pose sample of a motion: an instant plus an (x, y, yaw) position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// The instant this pose is reached
    pub time: Time,
    /// Position as x, y, yaw
    pub position: [f64; 3],
}

impl Waypoint {
    /// Create a waypoint at the given instant and position
    pub fn new(time: Time, position: [f64; 3]) -> Self {
        Waypoint { time, position }
    }
}

/// A time-parameterized motion: waypoints with strictly increasing times
///
/// # Examples
///
/// ```
/// use corridor_core::{Time, Trajectory, Waypoint};
///
/// let mut t = Trajectory::new();
/// t.insert(Waypoint::new(Time::from_secs(0), [0.0, 0.0, 0.0]));
/// t.insert(Waypoint::new(Time::from_secs(10), [4.0, 2.0, 0.0]));
///
/// assert_eq!(t.start_time(), Some(Time::from_secs(0)));
/// assert_eq!(t.finish_time(), Some(Time::from_secs(10)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    waypoints: Vec<Waypoint>,
}

impl Trajectory {
    /// Create an empty trajectory
    pub fn new() -> Self {
        Trajectory {
            waypoints: Vec::new(),
        }
    }

    /// Build a trajectory from waypoints that are already strictly
    /// time-ordered
    ///
    /// Returns [`ScheduleError::InvalidTime`] if two waypoints share an
    /// instant or appear out of order.
    pub fn from_ordered(waypoints: Vec<Waypoint>) -> Result<Self> {
        for pair in waypoints.windows(2) {
            if pair[1].time <= pair[0].time {
                return Err(ScheduleError::waypoint_reordering(pair[1].time));
            }
        }
        Ok(Trajectory { waypoints })
    }

    /// Insert a waypoint, keeping the sequence time-ordered
    ///
    /// Inserting at an instant that already has a waypoint replaces that
    /// waypoint, the same way a map insert replaces a value.
    pub fn insert(&mut self, waypoint: Waypoint) {
        match self
            .waypoints
            .binary_search_by(|probe| probe.time.cmp(&waypoint.time))
        {
            Ok(at) => self.waypoints[at] = waypoint,
            Err(at) => self.waypoints.insert(at, waypoint),
        }
    }

    /// The instant of the first waypoint, or `None` if empty
    pub fn start_time(&self) -> Option<Time> {
        self.waypoints.first().map(|w| w.time)
    }

    /// The instant of the last waypoint, or `None` if empty
    pub fn finish_time(&self) -> Option<Time> {
        self.waypoints.last().map(|w| w.time)
    }

    /// Span from the first to the last waypoint, or `None` if empty
    pub fn duration(&self) -> Option<Duration> {
        match (self.start_time(), self.finish_time()) {
            (Some(start), Some(finish)) => Some(finish - start),
            _ => None,
        }
    }

    /// Number of waypoints
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// True iff there are no waypoints
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Iterate the waypoints in time order
    pub fn iter(&self) -> std::slice::Iter<'_, Waypoint> {
        self.waypoints.iter()
    }

    /// A new trajectory with every waypoint at or after `from` shifted
    /// later by `delay`
    ///
    /// `delay` may be negative to pull a motion earlier. Returns
    /// [`ScheduleError::InvalidTime`] if a shifted waypoint would land
    /// before the schedule epoch or collide with an unshifted one.
    pub fn delayed_from(&self, from: Time, delay: Duration) -> Result<Trajectory> {
        let mut shifted = Vec::with_capacity(self.waypoints.len());
        for waypoint in &self.waypoints {
            if waypoint.time >= from {
                let time = waypoint
                    .time
                    .checked_add(delay)
                    .ok_or_else(|| ScheduleError::epoch_underflow(waypoint.time, delay))?;
                shifted.push(Waypoint::new(time, waypoint.position));
            } else {
                shifted.push(*waypoint);
            }
        }
        Trajectory::from_ordered(shifted)
    }

    /// Splice an interruption into this motion
    ///
    /// The original motion is truncated at the interruption's start, the
    /// interruption's waypoints follow, and the remaining portion of the
    /// original is rescheduled later by `delay`.
    ///
    /// Returns [`ScheduleError::EmptyTrajectory`] if the interruption has
    /// no waypoints, and [`ScheduleError::InvalidTime`] if the rescheduled
    /// remainder would overlap the interruption.
    pub fn spliced_with(&self, interruption: &Trajectory, delay: Duration) -> Result<Trajectory> {
        let cut = interruption
            .start_time()
            .ok_or(ScheduleError::EmptyTrajectory)?;

        let mut spliced = Vec::with_capacity(self.waypoints.len() + interruption.len());
        spliced.extend(self.iter().take_while(|w| w.time < cut).copied());
        spliced.extend(interruption.iter().copied());
        for waypoint in self.iter().skip_while(|w| w.time < cut) {
            let time = waypoint
                .time
                .checked_add(delay)
                .ok_or_else(|| ScheduleError::epoch_underflow(waypoint.time, delay))?;
            spliced.push(Waypoint::new(time, waypoint.position));
        }
        Trajectory::from_ordered(spliced)
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a Waypoint;
    type IntoIter = std::slice::Iter<'a, Waypoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.waypoints.iter()
    }
}
