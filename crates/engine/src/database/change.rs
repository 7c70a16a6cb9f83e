//! Change records
//!
//! Every mutation of the schedule produces one [`Change`], tagged with the
//! version the database assigned to it. Changes are what remote mirrors
//! apply: a patch is nothing but an id-ordered batch of them.
//!
//! Trajectory payloads are held behind `Arc`. Inside the relevance walk
//! cloning a change is a refcount bump, and once a change is handed to a
//! caller the same handle keeps the trajectory alive independently of the
//! database, including across a concurrent cull.

use corridor_core::{Duration, Time, Trajectory, Version};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One recorded mutation of the schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Change {
    /// A new trajectory entered the schedule
    Insert {
        /// Version assigned to this mutation
        id: Version,
        /// The inserted trajectory
        trajectory: Arc<Trajectory>,
    },

    /// A scheduled trajectory was interrupted by another motion
    Interrupt {
        /// Version assigned to this mutation
        id: Version,
        /// Head version that was interrupted
        original_id: Version,
        /// The interrupting motion
        interruption: Arc<Trajectory>,
        /// How much later the remainder of the original was rescheduled
        delay: Duration,
    },

    /// Part of a scheduled trajectory was pushed later in time
    Delay {
        /// Version assigned to this mutation
        id: Version,
        /// Head version that was delayed
        original_id: Version,
        /// Waypoints at or after this instant were shifted
        from: Time,
        /// The (signed) shift
        delay: Duration,
    },

    /// A scheduled trajectory was replaced wholesale
    Replace {
        /// Version assigned to this mutation
        id: Version,
        /// Head version that was replaced
        original_id: Version,
        /// The replacement trajectory
        trajectory: Arc<Trajectory>,
    },

    /// A lineage was terminated
    Erase {
        /// Version assigned to this mutation
        id: Version,
        /// Head version that was erased
        original_id: Version,
    },

    /// Finished lineages were purged from the schedule
    Cull {
        /// Version assigned to this mutation
        id: Version,
        /// Head versions of every purged lineage, ascending
        culled: Vec<Version>,
    },
}

impl Change {
    /// The version the database assigned to this mutation
    pub fn id(&self) -> Version {
        match self {
            Change::Insert { id, .. }
            | Change::Interrupt { id, .. }
            | Change::Delay { id, .. }
            | Change::Replace { id, .. }
            | Change::Erase { id, .. }
            | Change::Cull { id, .. } => *id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corridor_core::{Time, Waypoint};

    fn arc_trajectory() -> Arc<Trajectory> {
        let mut t = Trajectory::new();
        t.insert(Waypoint::new(Time::from_secs(0), [0.0, 0.0, 0.0]));
        t.insert(Waypoint::new(Time::from_secs(5), [1.0, 0.0, 0.0]));
        Arc::new(t)
    }

    #[test]
    fn test_id_accessor_covers_every_variant() {
        let t = arc_trajectory();
        let changes = vec![
            Change::Insert {
                id: 1,
                trajectory: Arc::clone(&t),
            },
            Change::Interrupt {
                id: 2,
                original_id: 1,
                interruption: Arc::clone(&t),
                delay: Duration::from_secs(1),
            },
            Change::Delay {
                id: 3,
                original_id: 2,
                from: Time::from_secs(0),
                delay: Duration::from_secs(1),
            },
            Change::Replace {
                id: 4,
                original_id: 3,
                trajectory: Arc::clone(&t),
            },
            Change::Erase {
                id: 5,
                original_id: 4,
            },
            Change::Cull {
                id: 6,
                culled: vec![5],
            },
        ];
        for (expect, change) in (1u64..).zip(&changes) {
            assert_eq!(change.id(), expect);
        }
    }

    #[test]
    fn test_clone_shares_trajectory_payload() {
        let t = arc_trajectory();
        let change = Change::Insert {
            id: 1,
            trajectory: Arc::clone(&t),
        };
        let cloned = change.clone();
        match (&change, &cloned) {
            (Change::Insert { trajectory: a, .. }, Change::Insert { trajectory: b, .. }) => {
                assert!(Arc::ptr_eq(a, b), "clone should bump the refcount, not copy");
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_change_serde_round_trip() {
        let change = Change::Interrupt {
            id: 9,
            original_id: 4,
            interruption: arc_trajectory(),
            delay: Duration::from_millis(1500),
        };
        let json = serde_json::to_string(&change).unwrap();
        let restored: Change = serde_json::from_str(&json).unwrap();
        assert_eq!(change, restored, "Change should roundtrip through JSON");
    }
}
