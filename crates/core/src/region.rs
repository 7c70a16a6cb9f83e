//! Spacetime regions and the conflict predicate
//!
//! A [`Region`] is an axis-aligned x/y box paired with optional time
//! bounds. [`detect_conflicts`] reports whether a trajectory's motion
//! passes through a region while the region is in force.
//!
//! This is deliberately the simplest predicate that is correct for boxes:
//! each motion segment is clipped to the overlapping time range, the
//! clipped endpoints are interpolated, and the resulting x/y segment is
//! slab-tested against the box. Full geometric conflict detection (robot
//! footprints, swept volumes) lives outside this crate; the schedule
//! engine only ever consumes the boolean.

use crate::time::Time;
use crate::trajectory::Trajectory;
use serde::{Deserialize, Serialize};

/// Axis-aligned x/y bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum x/y corner
    pub min: [f64; 2],
    /// Maximum x/y corner
    pub max: [f64; 2],
}

impl Aabb {
    /// Create a box from two opposite corners, normalizing their order
    pub fn new(a: [f64; 2], b: [f64; 2]) -> Self {
        Aabb {
            min: [a[0].min(b[0]), a[1].min(b[1])],
            max: [a[0].max(b[0]), a[1].max(b[1])],
        }
    }

    /// True iff the point lies inside or on the boundary
    pub fn contains(&self, point: [f64; 2]) -> bool {
        (self.min[0]..=self.max[0]).contains(&point[0])
            && (self.min[1]..=self.max[1]).contains(&point[1])
    }

    /// Slab-test a line segment against the box
    pub fn intersects_segment(&self, a: [f64; 2], b: [f64; 2]) -> bool {
        let mut enter = 0.0f64;
        let mut exit = 1.0f64;
        for axis in 0..2 {
            let delta = b[axis] - a[axis];
            if delta.abs() < f64::EPSILON {
                if a[axis] < self.min[axis] || a[axis] > self.max[axis] {
                    return false;
                }
                continue;
            }
            let inv = 1.0 / delta;
            let mut t0 = (self.min[axis] - a[axis]) * inv;
            let mut t1 = (self.max[axis] - a[axis]) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            enter = enter.max(t0);
            exit = exit.min(t1);
            if enter > exit {
                return false;
            }
        }
        true
    }
}

/// A spacetime region: an x/y box active over an optional time range
///
/// An absent bound is unbounded on that side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// The region takes effect at this instant (unbounded if absent)
    pub lower_time: Option<Time>,
    /// The region lapses after this instant (unbounded if absent)
    pub upper_time: Option<Time>,
    /// Spatial extent
    pub bounds: Aabb,
}

impl Region {
    /// A region in force for all time
    pub fn new(bounds: Aabb) -> Self {
        Region {
            lower_time: None,
            upper_time: None,
            bounds,
        }
    }

    /// A region in force between two instants (inclusive)
    pub fn between(lower: Time, upper: Time, bounds: Aabb) -> Self {
        Region {
            lower_time: Some(lower),
            upper_time: Some(upper),
            bounds,
        }
    }
}

/// Report whether a trajectory conflicts with a spacetime region
///
/// Empty trajectories never conflict. A single-waypoint trajectory
/// conflicts iff its one pose falls inside the region while the region is
/// in force.
pub fn detect_conflicts(trajectory: &Trajectory, region: &Region) -> bool {
    let waypoints: Vec<_> = trajectory.iter().collect();
    if waypoints.is_empty() {
        return false;
    }

    let in_time = |t: Time| {
        region.lower_time.map_or(true, |lower| t >= lower)
            && region.upper_time.map_or(true, |upper| t <= upper)
    };

    if waypoints.len() == 1 {
        let w = waypoints[0];
        return in_time(w.time) && region.bounds.contains([w.position[0], w.position[1]]);
    }

    for pair in waypoints.windows(2) {
        let (a, b) = (pair[0], pair[1]);

        // Clip the segment's time span to the region's time range.
        let lo = region.lower_time.map_or(a.time, |l| l.max(a.time));
        let hi = region.upper_time.map_or(b.time, |u| u.min(b.time));
        if lo > hi {
            continue;
        }

        let p_lo = interpolate(a.time, a.position, b.time, b.position, lo);
        let p_hi = interpolate(a.time, a.position, b.time, b.position, hi);
        if region.bounds.intersects_segment(p_lo, p_hi) {
            return true;
        }
    }
    false
}

/// Linear x/y interpolation along one motion segment
fn interpolate(t0: Time, p0: [f64; 3], t1: Time, p1: [f64; 3], at: Time) -> [f64; 2] {
    let span = (t1 - t0).as_nanos();
    if span == 0 {
        return [p0[0], p0[1]];
    }
    let frac = (at - t0).as_nanos() as f64 / span as f64;
    [
        p0[0] + (p1[0] - p0[0]) * frac,
        p0[1] + (p1[1] - p0[1]) * frac,
    ]
}
