//! # Corridor
//!
//! A shared trajectory schedule database for multi-robot traffic management.
//!
//! Participants submit time-parameterized trajectories; planners, mirrors,
//! and visualizers query the schedule for the region and time window they
//! care about. Remote mirrors stay synchronized by pulling the incremental
//! [`Patch`] of relevant changes since the version they last saw.
//!
//! # Quick Start
//!
//! ```
//! use corridor::{Database, Mirror, Query, Trajectory, Waypoint, Time};
//!
//! fn main() -> corridor::Result<()> {
//!     let db = Database::new();
//!
//!     let mut trajectory = Trajectory::new();
//!     trajectory.insert(Waypoint::new(Time::from_secs(0), [0.0, 0.0, 0.0]));
//!     trajectory.insert(Waypoint::new(Time::from_secs(10), [5.0, 0.0, 0.0]));
//!
//!     let id = db.insert(trajectory)?;
//!     assert_eq!(id, db.latest_version());
//!
//!     // A fresh mirror pulls everything it needs in one patch.
//!     let mut mirror = Mirror::new();
//!     let patch = db.changes(&Query::all());
//!     mirror.apply(&patch)?;
//!
//!     // Afterwards the mirror only pulls the delta.
//!     let delta = db.changes(&Query::all().after(mirror.latest_version()));
//!     assert!(delta.is_empty());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! The [`Database`] struct is the main entry point. Every mutation
//! (insert, interrupt, delay, replace, erase, cull) assigns one new
//! monotonic version and records a [`Change`]; [`Database::changes`]
//! answers a [`Query`] with the minimal version-ordered [`Patch`] a
//! remote [`Mirror`] must apply to converge.
//!
//! Internal crates (`corridor-core`, `corridor-engine`) are not part of
//! the stable surface. Only the re-exports in this crate are.

// Re-export the public API surface.
pub use corridor_core::{
    detect_conflicts, Aabb, Duration, Query, QueryFilter, Region, Result, ScheduleError, Time,
    Trajectory, Version, Waypoint,
};
pub use corridor_engine::{Change, Database, DatabaseConfig, Mirror, Patch};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facade_round_trip() {
        let db = Database::new();
        let mut t = Trajectory::new();
        t.insert(Waypoint::new(Time::from_secs(1), [0.0, 0.0, 0.0]));
        t.insert(Waypoint::new(Time::from_secs(2), [1.0, 0.0, 0.0]));
        let v = db.insert(t).unwrap();

        let patch = db.changes(&Query::all());
        assert_eq!(patch.len(), 1);
        assert_eq!(patch.latest_version(), v);
    }
}
