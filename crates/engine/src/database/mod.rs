//! The schedule database
//!
//! This module provides the main [`Database`] struct that orchestrates:
//! - The versioned lineage store (every revision of every trajectory)
//! - The mutation API (insert / interrupt / delay / replace / erase / cull)
//! - Relevance queries that produce incremental [`Patch`]es for mirrors
//!
//! ## Versioning
//!
//! Mutations are serialized: each one atomically takes the next value of
//! a database-wide monotonic counter, so versions strictly ascend with no
//! gaps and a version number names one change across the whole schedule.
//! A failed mutation assigns nothing and changes nothing.
//!
//! ## Concurrency
//!
//! Single-writer / multi-reader: mutations take the write half of a
//! `parking_lot::RwLock`, queries take the read half and therefore
//! observe one consistent snapshot for the duration of a
//! [`Database::changes`] call. Trajectories and change records are
//! shared behind `Arc`, so a patch handed to a caller stays valid across
//! any later mutation, cull included.

pub mod change;
pub mod config;
mod inspector;
mod lineage;
pub mod mirror;
pub mod patch;

pub use change::Change;
pub use config::DatabaseConfig;
pub use mirror::Mirror;
pub use patch::Patch;

use corridor_core::{
    Duration, Query, Result, ScheduleError, Time, Trajectory, Version, INITIAL_VERSION,
};
use inspector::ChangeRelevanceInspector;
use lineage::{Entry, LineageStore};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info};

/// Internal state guarded by the database lock
struct State {
    lineages: LineageStore,
    latest_version: Version,
    /// Cull records, ascending by id. Culled lineages leave no entries
    /// behind for the relevance walk to find, so their records are kept
    /// here for cursored queries.
    cull_log: Vec<Change>,
    patch_reserve: usize,
}

/// The shared trajectory schedule database
///
/// # Example
///
/// ```
/// use corridor_core::{Query, Time, Trajectory, Waypoint};
/// use corridor_engine::Database;
///
/// let db = Database::new();
///
/// let mut t = Trajectory::new();
/// t.insert(Waypoint::new(Time::from_secs(0), [0.0, 0.0, 0.0]));
/// t.insert(Waypoint::new(Time::from_secs(10), [3.0, 0.0, 0.0]));
/// let id = db.insert(t).unwrap();
///
/// let patch = db.changes(&Query::all());
/// assert_eq!(patch.len(), 1);
/// assert_eq!(patch.latest_version(), id);
/// ```
pub struct Database {
    state: RwLock<State>,
}

impl Database {
    /// Create an empty schedule database
    pub fn new() -> Self {
        Self::with_config(DatabaseConfig::default())
    }

    /// Create an empty schedule database with the given tuning hints
    pub fn with_config(config: DatabaseConfig) -> Self {
        Database {
            state: RwLock::new(State {
                lineages: LineageStore::with_capacity(config.expected_entries),
                latest_version: INITIAL_VERSION,
                cull_log: Vec::new(),
                patch_reserve: config.patch_reserve,
            }),
        }
    }

    /// The largest version this database has assigned so far
    pub fn latest_version(&self) -> Version {
        self.state.read().latest_version
    }

    /// Schedule a new trajectory, starting a new lineage
    ///
    /// Returns the version assigned to the insertion, which is also the
    /// id future mutations use to target this lineage's head.
    ///
    /// # Errors
    ///
    /// [`ScheduleError::EmptyTrajectory`] if the trajectory has no
    /// waypoints.
    pub fn insert(&self, trajectory: Trajectory) -> Result<Version> {
        if trajectory.start_time().is_none() {
            return Err(ScheduleError::EmptyTrajectory);
        }

        let mut state = self.state.write();
        let version = state.latest_version + 1;
        let trajectory = Arc::new(trajectory);
        state.lineages.insert_root(Entry::new_head(
            version,
            Arc::clone(&trajectory),
            Change::Insert {
                id: version,
                trajectory,
            },
            None,
            false,
        ));
        state.latest_version = version;
        debug!(target: "corridor::db", version, "inserted trajectory");
        Ok(version)
    }

    /// Interrupt the lineage headed by `original_id` with another motion
    ///
    /// The prior motion is truncated at the interruption's start, the
    /// interruption is spliced in, and the remainder of the prior motion
    /// is rescheduled later by `delay`. The stored head becomes the
    /// composed trajectory.
    ///
    /// # Errors
    ///
    /// [`ScheduleError::UnknownId`] / [`ScheduleError::Superseded`] if
    /// `original_id` is not an active head;
    /// [`ScheduleError::EmptyTrajectory`] if the interruption is empty;
    /// [`ScheduleError::InvalidTime`] if the composition breaks waypoint
    /// ordering.
    pub fn interrupt(
        &self,
        original_id: Version,
        interruption: Trajectory,
        delay: Duration,
    ) -> Result<Version> {
        let mut state = self.state.write();
        let state = &mut *state;

        let predecessor = state.lineages.resolve_active_head(original_id)?;
        let composed = predecessor.trajectory.spliced_with(&interruption, delay)?;

        let version = state.latest_version + 1;
        state.lineages.append(
            original_id,
            Entry::new_head(
                version,
                Arc::new(composed),
                Change::Interrupt {
                    id: version,
                    original_id,
                    interruption: Arc::new(interruption),
                    delay,
                },
                Some(original_id),
                false,
            ),
        );
        state.latest_version = version;
        debug!(target: "corridor::db", version, original_id, "interrupted trajectory");
        Ok(version)
    }

    /// Push part of the lineage headed by `original_id` later in time
    ///
    /// Every waypoint at or after `from` is shifted by `delay`, which may
    /// be negative to pull a previously delayed motion back in. A `from`
    /// before the trajectory's start shifts the whole motion; a `from`
    /// past its finish shifts nothing.
    ///
    /// # Errors
    ///
    /// [`ScheduleError::UnknownId`] / [`ScheduleError::Superseded`] if
    /// `original_id` is not an active head; [`ScheduleError::InvalidTime`]
    /// if the shift lands before the schedule epoch or breaks waypoint
    /// ordering.
    pub fn delay(&self, original_id: Version, from: Time, delay: Duration) -> Result<Version> {
        let mut state = self.state.write();
        let state = &mut *state;

        let predecessor = state.lineages.resolve_active_head(original_id)?;
        let shifted = predecessor.trajectory.delayed_from(from, delay)?;

        let version = state.latest_version + 1;
        state.lineages.append(
            original_id,
            Entry::new_head(
                version,
                Arc::new(shifted),
                Change::Delay {
                    id: version,
                    original_id,
                    from,
                    delay,
                },
                Some(original_id),
                false,
            ),
        );
        state.latest_version = version;
        debug!(target: "corridor::db", version, original_id, "delayed trajectory");
        Ok(version)
    }

    /// Replace the lineage head `original_id` with a new trajectory
    ///
    /// # Errors
    ///
    /// [`ScheduleError::UnknownId`] / [`ScheduleError::Superseded`] if
    /// `original_id` is not an active head;
    /// [`ScheduleError::EmptyTrajectory`] if the replacement is empty.
    pub fn replace(&self, original_id: Version, trajectory: Trajectory) -> Result<Version> {
        if trajectory.start_time().is_none() {
            return Err(ScheduleError::EmptyTrajectory);
        }

        let mut state = self.state.write();
        let state = &mut *state;
        state.lineages.resolve_active_head(original_id)?;

        let version = state.latest_version + 1;
        let trajectory = Arc::new(trajectory);
        state.lineages.append(
            original_id,
            Entry::new_head(
                version,
                Arc::clone(&trajectory),
                Change::Replace {
                    id: version,
                    original_id,
                    trajectory,
                },
                Some(original_id),
                false,
            ),
        );
        state.latest_version = version;
        debug!(target: "corridor::db", version, original_id, "replaced trajectory");
        Ok(version)
    }

    /// Terminate the lineage headed by `original_id`
    ///
    /// The lineage stops being relevant to any query, but its history
    /// stays reachable until a cull retires it.
    ///
    /// # Errors
    ///
    /// [`ScheduleError::UnknownId`] / [`ScheduleError::Superseded`] if
    /// `original_id` is not an active head.
    pub fn erase(&self, original_id: Version) -> Result<Version> {
        let mut state = self.state.write();
        let state = &mut *state;

        let predecessor = state.lineages.resolve_active_head(original_id)?;
        let trajectory = Arc::clone(&predecessor.trajectory);

        let version = state.latest_version + 1;
        state.lineages.append(
            original_id,
            Entry::new_head(
                version,
                trajectory,
                Change::Erase {
                    id: version,
                    original_id,
                },
                Some(original_id),
                true,
            ),
        );
        state.latest_version = version;
        debug!(target: "corridor::db", version, original_id, "erased trajectory");
        Ok(version)
    }

    /// Purge every lineage whose head finishes strictly before `before`
    ///
    /// The purged lineages become unreachable for all subsequent queries;
    /// one Cull change carrying their head versions is recorded so
    /// cursored mirrors drop them too. Always assigns and returns a new
    /// version, even when nothing matched.
    pub fn cull(&self, before: Time) -> Version {
        let mut state = self.state.write();

        let culled: Vec<Version> = state
            .lineages
            .heads()
            .filter(|head| {
                head.trajectory
                    .finish_time()
                    .expect("active entries always have a finish time")
                    < before
            })
            .map(|head| head.version)
            .collect();

        for head in &culled {
            state.lineages.remove_lineage(*head);
        }

        let version = state.latest_version + 1;
        info!(
            target: "corridor::db",
            version,
            culled = culled.len(),
            "culled finished lineages"
        );
        state.cull_log.push(Change::Cull {
            id: version,
            culled,
        });
        state.latest_version = version;
        version
    }

    /// Compute the patch a mirror needs to converge with this schedule
    ///
    /// Walks the active lineage heads against the query's relevance
    /// filter. With no cursor the reply is a self-contained snapshot (one
    /// insert per relevant head); with a cursor it is the minimal delta:
    /// stored history for lineages the mirror knew, synthesized inserts
    /// for ones it did not, synthesized erases for ones it no longer
    /// needs, and any cull records newer than the cursor.
    ///
    /// Queries never fail; the whole call observes one consistent
    /// snapshot.
    pub fn changes(&self, query: &Query) -> Patch {
        let state = self.state.read();

        let mut inspector = ChangeRelevanceInspector::new(&state.lineages, query.after);
        inspector.reserve(if state.patch_reserve > 0 {
            state.patch_reserve
        } else {
            state.lineages.head_count()
        });

        let relevant = |entry: &Entry| query.filter.matches(&entry.trajectory);
        for head in state.lineages.heads() {
            inspector.inspect(head, &relevant);
        }

        let mut changes = inspector.finish();
        if let Some(after) = query.after {
            // A cursor at the initial version means "nothing applied yet":
            // such a mirror never held a culled lineage, so it gets the
            // same reply as a cursor-less query.
            if after > INITIAL_VERSION {
                changes.extend(
                    state
                        .cull_log
                        .iter()
                        .filter(|cull| cull.id() > after)
                        .cloned(),
                );
            }
        }

        Patch::new(changes, state.latest_version)
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}
