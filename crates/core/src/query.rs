//! Relevance queries
//!
//! A [`Query`] asks the schedule database "what do I need to know about
//! this slice of spacetime?". The filter selects which trajectories are
//! relevant; the optional `after` cursor tells the database the greatest
//! version the caller has already applied, which is what makes the reply
//! an incremental patch rather than a full snapshot.

use crate::region::{detect_conflicts, Region};
use crate::time::Time;
use crate::trajectory::Trajectory;
use crate::version::Version;
use serde::{Deserialize, Serialize};

/// Which trajectories a query considers relevant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueryFilter {
    /// Every active trajectory is relevant
    All,
    /// Trajectories conflicting with a spacetime region
    Region(Region),
    /// Trajectories overlapping a time window
    ///
    /// A trajectory overlaps iff `finish_time >= lower` and
    /// `start_time <= upper`; an absent bound is unbounded on that side.
    /// With `lower == upper` this matches trajectories containing that
    /// exact instant.
    TimeWindow {
        /// Inclusive lower bound
        lower: Option<Time>,
        /// Inclusive upper bound
        upper: Option<Time>,
    },
}

impl QueryFilter {
    /// Evaluate the filter against one trajectory
    pub fn matches(&self, trajectory: &Trajectory) -> bool {
        match self {
            QueryFilter::All => !trajectory.is_empty(),
            QueryFilter::Region(region) => detect_conflicts(trajectory, region),
            QueryFilter::TimeWindow { lower, upper } => {
                let (start, finish) = match (trajectory.start_time(), trajectory.finish_time()) {
                    (Some(start), Some(finish)) => (start, finish),
                    _ => return false,
                };
                if lower.is_some_and(|lower| finish < lower) {
                    return false;
                }
                if upper.is_some_and(|upper| start > upper) {
                    return false;
                }
                true
            }
        }
    }
}

/// A relevance query with an optional version cursor
///
/// # Examples
///
/// ```
/// use corridor_core::Query;
///
/// // Fresh mirror: everything relevant, no cursor.
/// let fresh = Query::all();
/// assert_eq!(fresh.after, None);
///
/// // Catching up: only changes newer than version 7.
/// let catch_up = Query::all().after(7);
/// assert_eq!(catch_up.after, Some(7));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Relevance filter
    pub filter: QueryFilter,
    /// Greatest version the caller has already applied, if any
    pub after: Option<Version>,
}

impl Query {
    /// Query for every active trajectory
    pub fn all() -> Self {
        Query {
            filter: QueryFilter::All,
            after: None,
        }
    }

    /// Query for trajectories conflicting with a spacetime region
    pub fn region(region: Region) -> Self {
        Query {
            filter: QueryFilter::Region(region),
            after: None,
        }
    }

    /// Query for trajectories overlapping a time window
    pub fn window(lower: Option<Time>, upper: Option<Time>) -> Self {
        Query {
            filter: QueryFilter::TimeWindow { lower, upper },
            after: None,
        }
    }

    /// Restrict the query to changes newer than `version`
    pub fn after(mut self, version: Version) -> Self {
        self.after = Some(version);
        self
    }
}
