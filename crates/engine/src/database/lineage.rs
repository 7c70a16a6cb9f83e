//! The versioned lineage store
//!
//! Every revision of every trajectory is an [`Entry`] in a forward-linked
//! lineage chain: `succeeds` points back at the revision this entry
//! replaced, `succeeded_by` points forward at the revision that replaced
//! it. Links are version numbers into the `by_version` map rather than
//! references, so the chains carry no ownership cycles and culling a
//! lineage is a plain map removal.
//!
//! Entries are immutable once published. The one exception is the
//! forward link: appending a revision rewires its predecessor's
//! `succeeded_by`, which only this store may do.
//!
//! Integrity violations in here (dangling links, double appends) are
//! logic bugs, not recoverable conditions, and abort the process.

use crate::database::change::Change;
use corridor_core::{ScheduleError, Trajectory, Version};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// One revision of one trajectory: a node in a lineage chain
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Entry {
    /// The version at which this revision appeared
    pub version: Version,
    /// The trajectory in force at this revision
    pub trajectory: Arc<Trajectory>,
    /// The change record that produced this revision
    pub change: Change,
    /// Predecessor revision, or `None` for a lineage root
    pub succeeds: Option<Version>,
    /// Successor revision, or `None` while this entry is the head
    pub succeeded_by: Option<Version>,
    /// True iff this head terminated its lineage
    pub erased: bool,
}

impl Entry {
    /// A fresh head entry; the store fills in the forward link later
    pub fn new_head(
        version: Version,
        trajectory: Arc<Trajectory>,
        change: Change,
        succeeds: Option<Version>,
        erased: bool,
    ) -> Self {
        Entry {
            version,
            trajectory,
            change,
            succeeds,
            succeeded_by: None,
            erased,
        }
    }
}

/// Keyed storage for every lineage in the schedule
///
/// - `by_version` holds every entry ever created (and not yet culled).
/// - `by_head` holds the versions of current lineage heads, erased heads
///   included: a terminated lineage stays visible to the relevance walk
///   until a cull retires it.
#[derive(Debug, Default)]
pub(crate) struct LineageStore {
    by_version: HashMap<Version, Entry>,
    by_head: BTreeSet<Version>,
}

impl LineageStore {
    /// Create a store with a capacity hint for the version map
    pub fn with_capacity(expected_entries: usize) -> Self {
        LineageStore {
            by_version: HashMap::with_capacity(expected_entries),
            by_head: BTreeSet::new(),
        }
    }

    /// Number of entries across all lineages
    pub fn len(&self) -> usize {
        self.by_version.len()
    }

    /// Number of lineage heads (erased heads included)
    pub fn head_count(&self) -> usize {
        self.by_head.len()
    }

    /// Look up any entry by its version
    pub fn get(&self, version: Version) -> Option<&Entry> {
        self.by_version.get(&version)
    }

    /// Iterate the lineage heads in ascending version order
    pub fn heads(&self) -> impl Iterator<Item = &Entry> {
        self.by_head.iter().map(|version| {
            self.by_version
                .get(version)
                .expect("head set references a missing entry")
        })
    }

    /// Resolve a mutation target: the entry must be an active head
    ///
    /// Returns [`ScheduleError::UnknownId`] for versions never assigned,
    /// culled, or belonging to a terminated lineage, and
    /// [`ScheduleError::Superseded`] for historical entries that still
    /// exist but have been revised.
    pub fn resolve_active_head(&self, id: Version) -> Result<&Entry, ScheduleError> {
        let entry = self
            .by_version
            .get(&id)
            .ok_or(ScheduleError::UnknownId { id })?;
        if let Some(by) = entry.succeeded_by {
            return Err(ScheduleError::Superseded { id, by });
        }
        if entry.erased {
            return Err(ScheduleError::UnknownId { id });
        }
        Ok(entry)
    }

    /// Start a new lineage at the given root entry
    pub fn insert_root(&mut self, entry: Entry) {
        assert!(
            entry.succeeds.is_none() && entry.succeeded_by.is_none(),
            "lineage root must not be linked"
        );
        let version = entry.version;
        let displaced = self.by_version.insert(version, entry);
        assert!(displaced.is_none(), "version {} assigned twice", version);
        self.by_head.insert(version);
    }

    /// Append a new head onto the lineage currently headed by `predecessor`
    ///
    /// Rewires the predecessor's forward link and moves the head marker.
    pub fn append(&mut self, predecessor: Version, entry: Entry) {
        assert_eq!(
            entry.succeeds,
            Some(predecessor),
            "appended entry must succeed its predecessor"
        );
        let version = entry.version;

        let prior = self
            .by_version
            .get_mut(&predecessor)
            .expect("appending onto a missing entry");
        assert!(
            prior.succeeded_by.is_none(),
            "appending onto a superseded entry"
        );
        prior.succeeded_by = Some(version);

        let displaced = self.by_version.insert(version, entry);
        assert!(displaced.is_none(), "version {} assigned twice", version);

        let was_head = self.by_head.remove(&predecessor);
        assert!(was_head, "predecessor {} was not a head", predecessor);
        self.by_head.insert(version);
    }

    /// Purge the entire lineage headed by `head`
    ///
    /// Every ancestor of the head becomes unreachable. Callers that still
    /// hold `Arc`'d trajectories or change records keep them alive; the
    /// store itself forgets the lineage entirely.
    pub fn remove_lineage(&mut self, head: Version) {
        let was_head = self.by_head.remove(&head);
        assert!(was_head, "culling a non-head version {}", head);

        let mut cursor = Some(head);
        while let Some(version) = cursor {
            let entry = self
                .by_version
                .remove(&version)
                .expect("lineage link to a missing entry");
            cursor = entry.succeeds;
        }
    }

    /// The most recent ancestor of `entry` with `version <= after`
    ///
    /// Walks the back links, short-circuiting at the first version the
    /// cursor covers. Returns `None` when the whole lineage is newer than
    /// the cursor.
    pub fn last_known_ancestor(&self, entry: &Entry, after: Version) -> Option<&Entry> {
        let mut check = self.get(entry.version);
        while let Some(e) = check {
            if e.version <= after {
                return Some(e);
            }
            check = e.succeeds.map(|version| {
                self.get(version)
                    .expect("lineage link to a missing entry")
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corridor_core::{Time, Waypoint};

    fn arc_trajectory(start_secs: u64) -> Arc<Trajectory> {
        let mut t = Trajectory::new();
        t.insert(Waypoint::new(Time::from_secs(start_secs), [0.0, 0.0, 0.0]));
        t.insert(Waypoint::new(
            Time::from_secs(start_secs + 10),
            [1.0, 0.0, 0.0],
        ));
        Arc::new(t)
    }

    fn root(version: Version) -> Entry {
        let t = arc_trajectory(version);
        Entry::new_head(
            version,
            Arc::clone(&t),
            Change::Insert {
                id: version,
                trajectory: t,
            },
            None,
            false,
        )
    }

    fn revision(version: Version, succeeds: Version) -> Entry {
        let t = arc_trajectory(version);
        Entry::new_head(
            version,
            Arc::clone(&t),
            Change::Replace {
                id: version,
                original_id: succeeds,
                trajectory: t,
            },
            Some(succeeds),
            false,
        )
    }

    // === Roots and appends ===

    #[test]
    fn test_insert_root_becomes_head() {
        let mut store = LineageStore::default();
        store.insert_root(root(1));

        assert_eq!(store.len(), 1);
        assert_eq!(store.head_count(), 1);
        assert!(store.resolve_active_head(1).is_ok());
    }

    #[test]
    fn test_append_moves_head_and_links_both_ways() {
        let mut store = LineageStore::default();
        store.insert_root(root(1));
        store.append(1, revision(2, 1));

        let first = store.get(1).unwrap();
        let second = store.get(2).unwrap();
        assert_eq!(first.succeeded_by, Some(2));
        assert_eq!(second.succeeds, Some(1));
        assert_eq!(store.head_count(), 1);

        let heads: Vec<Version> = store.heads().map(|e| e.version).collect();
        assert_eq!(heads, vec![2]);
    }

    #[test]
    fn test_heads_iterate_in_ascending_version_order() {
        let mut store = LineageStore::default();
        store.insert_root(root(3));
        store.insert_root(root(1));
        store.insert_root(root(2));

        let heads: Vec<Version> = store.heads().map(|e| e.version).collect();
        assert_eq!(heads, vec![1, 2, 3]);
    }

    // === Mutation target resolution ===

    #[test]
    fn test_resolve_unknown_version() {
        let store = LineageStore::default();
        assert_eq!(
            store.resolve_active_head(7),
            Err(ScheduleError::UnknownId { id: 7 })
        );
    }

    #[test]
    fn test_resolve_superseded_version() {
        let mut store = LineageStore::default();
        store.insert_root(root(1));
        store.append(1, revision(2, 1));

        assert_eq!(
            store.resolve_active_head(1),
            Err(ScheduleError::Superseded { id: 1, by: 2 })
        );
    }

    #[test]
    fn test_resolve_erased_head_is_unknown() {
        let mut store = LineageStore::default();
        store.insert_root(root(1));
        let trajectory = Arc::clone(&store.get(1).unwrap().trajectory);
        let erased = Entry::new_head(
            2,
            trajectory,
            Change::Erase {
                id: 2,
                original_id: 1,
            },
            Some(1),
            true,
        );
        store.append(1, erased);

        assert_eq!(
            store.resolve_active_head(2),
            Err(ScheduleError::UnknownId { id: 2 })
        );
        // The erased head still walks as a head.
        assert_eq!(store.head_count(), 1);
    }

    // === Cull ===

    #[test]
    fn test_remove_lineage_purges_every_ancestor() {
        let mut store = LineageStore::default();
        store.insert_root(root(1));
        store.append(1, revision(2, 1));
        store.append(2, revision(3, 2));
        store.insert_root(root(4));

        store.remove_lineage(3);

        assert_eq!(store.len(), 1, "only the unrelated lineage remains");
        assert!(store.get(1).is_none());
        assert!(store.get(2).is_none());
        assert!(store.get(3).is_none());
        assert!(store.get(4).is_some());
        assert_eq!(store.head_count(), 1);
    }

    #[test]
    fn test_culled_trajectory_survives_behind_arc() {
        let mut store = LineageStore::default();
        store.insert_root(root(1));
        let held = Arc::clone(&store.get(1).unwrap().trajectory);

        store.remove_lineage(1);
        assert_eq!(store.len(), 0);
        // A reader that grabbed the Arc before the cull still reads it.
        assert_eq!(held.start_time(), Some(Time::from_secs(1)));
    }

    // === Ancestor walk ===

    #[test]
    fn test_last_known_ancestor_short_circuits() {
        let mut store = LineageStore::default();
        store.insert_root(root(1));
        store.append(1, revision(3, 1));
        store.append(3, revision(5, 3));

        let head = store.get(5).unwrap();
        assert_eq!(
            store.last_known_ancestor(head, 4).map(|e| e.version),
            Some(3)
        );
        assert_eq!(
            store.last_known_ancestor(head, 3).map(|e| e.version),
            Some(3)
        );
        assert_eq!(
            store.last_known_ancestor(head, 1).map(|e| e.version),
            Some(1)
        );
        assert!(store.last_known_ancestor(head, 0).is_none());
    }

    // === Integrity ===

    #[test]
    #[should_panic(expected = "appending onto a superseded entry")]
    fn test_append_onto_non_head_aborts() {
        let mut store = LineageStore::default();
        store.insert_root(root(1));
        store.append(1, revision(2, 1));
        // Version 1 is no longer a head; appending onto it is a logic bug.
        store.append(1, revision(3, 1));
    }
}
