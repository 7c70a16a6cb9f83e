//! Mirrors: remote materialized views of the schedule
//!
//! A [`Mirror`] is what a remote consumer (a planner's local cache, a
//! visualizer, another traffic node) maintains by applying [`Patch`]es.
//! It holds the trajectories currently in force for the slice of the
//! schedule its query covers, keyed by the head version it last heard
//! for each lineage, plus the cursor to hand back on the next query.
//!
//! Application is idempotent: replaying a patch that was already applied
//! leaves the view unchanged, so transport-level retries are harmless.

use crate::database::change::Change;
use crate::database::patch::Patch;
use corridor_core::{Result, Trajectory, Version, INITIAL_VERSION};
use std::collections::HashMap;
use std::sync::Arc;

/// A materialized view converging on the schedule through patches
#[derive(Debug, Clone, Default)]
pub struct Mirror {
    schedule: HashMap<Version, Arc<Trajectory>>,
    latest_version: Version,
}

impl Mirror {
    /// Create an empty mirror with its cursor at the initial version
    pub fn new() -> Self {
        Mirror {
            schedule: HashMap::new(),
            latest_version: INITIAL_VERSION,
        }
    }

    /// The greatest version this mirror has applied
    ///
    /// Pass this as the `after` cursor of the next query.
    pub fn latest_version(&self) -> Version {
        self.latest_version
    }

    /// Number of trajectories currently in view
    pub fn len(&self) -> usize {
        self.schedule.len()
    }

    /// True iff no trajectory is in view
    pub fn is_empty(&self) -> bool {
        self.schedule.is_empty()
    }

    /// The trajectory last heard for the given head version, if any
    pub fn trajectory(&self, version: Version) -> Option<&Trajectory> {
        self.schedule.get(&version).map(Arc::as_ref)
    }

    /// Iterate the (head version, trajectory) pairs in view
    pub fn iter(&self) -> impl Iterator<Item = (Version, &Trajectory)> {
        self.schedule
            .iter()
            .map(|(version, trajectory)| (*version, trajectory.as_ref()))
    }

    /// Apply one patch, advancing the cursor to its latest version
    ///
    /// Changes referencing lineages this mirror does not hold are skipped:
    /// with a correct cursor that only happens on re-application, where
    /// skipping is exactly what idempotence requires. Composition errors
    /// (a malformed interrupt or delay record) are returned and leave the
    /// remaining changes unapplied.
    pub fn apply(&mut self, patch: &Patch) -> Result<()> {
        for change in patch {
            match change {
                Change::Insert { id, trajectory } => {
                    self.schedule.insert(*id, Arc::clone(trajectory));
                }
                Change::Interrupt {
                    id,
                    original_id,
                    interruption,
                    delay,
                } => {
                    if let Some(prior) = self.schedule.remove(original_id) {
                        let spliced = prior.spliced_with(interruption, *delay)?;
                        self.schedule.insert(*id, Arc::new(spliced));
                    }
                }
                Change::Delay {
                    id,
                    original_id,
                    from,
                    delay,
                } => {
                    if let Some(prior) = self.schedule.remove(original_id) {
                        let delayed = prior.delayed_from(*from, *delay)?;
                        self.schedule.insert(*id, Arc::new(delayed));
                    }
                }
                Change::Replace {
                    id,
                    original_id,
                    trajectory,
                } => {
                    self.schedule.remove(original_id);
                    self.schedule.insert(*id, Arc::clone(trajectory));
                }
                Change::Erase { original_id, .. } => {
                    self.schedule.remove(original_id);
                }
                Change::Cull { culled, .. } => {
                    for version in culled {
                        self.schedule.remove(version);
                    }
                }
            }
        }
        self.latest_version = self.latest_version.max(patch.latest_version());
        Ok(())
    }
}
