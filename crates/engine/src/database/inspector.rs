//! The change relevance inspector
//!
//! Given a relevance predicate and an optional "after" cursor, the
//! inspector walks the active lineage heads and collects the minimal
//! sequence of change records a remote mirror must apply to converge
//! with the schedule.
//!
//! The rule per head: a mirror only needs a lineage's stored history when
//! it already knew a relevant ancestor of that head. Otherwise a
//! synthesized insert of the current head (when relevant) or a
//! synthesized erase of the last ancestor it knew (when no longer
//! relevant) is strictly cheaper to transmit, and just as convergent.

use crate::database::change::Change;
use crate::database::lineage::{Entry, LineageStore};
use corridor_core::Version;
use std::sync::Arc;

/// Collects the relevant changes for one query over one schedule snapshot
pub(crate) struct ChangeRelevanceInspector<'a> {
    store: &'a LineageStore,
    after: Option<Version>,
    relevant_changes: Vec<Change>,
}

impl<'a> ChangeRelevanceInspector<'a> {
    /// Create an inspector over a store snapshot with an optional cursor
    pub fn new(store: &'a LineageStore, after: Option<Version>) -> Self {
        ChangeRelevanceInspector {
            store,
            after,
            relevant_changes: Vec::new(),
        }
    }

    /// Pre-size the output buffer (one change per head is the common case)
    pub fn reserve(&mut self, size: usize) {
        self.relevant_changes.reserve(size);
    }

    /// Inspect one lineage head against the relevance predicate
    pub fn inspect(&mut self, entry: &Entry, relevant: &dyn Fn(&Entry) -> bool) {
        if entry.succeeded_by.is_some() {
            // Not a head. Should not occur under the store's invariants,
            // but the check is cheap and keeps the walk correct if the
            // caller's iteration ever changes.
            return;
        }

        if let Some(after) = self.after {
            if entry.version <= after {
                // The mirror already has this exact head; no newer
                // information exists for this lineage.
                return;
            }
        }

        let needed = !entry.erased && relevant(entry);

        if needed {
            // Check whether this entry descends from an entry the remote
            // mirror already knows about.
            let record_changes_from = self.after.and_then(|after| {
                self.store
                    .last_known_ancestor(entry, after)
                    .filter(|ancestor| relevant(ancestor))
                    .map(|ancestor| ancestor.version)
            });

            match record_changes_from {
                Some(ancestor) => {
                    // The mirror knows this lineage: transmit every stored
                    // change strictly after the ancestor, in order.
                    let mut cursor = self
                        .store
                        .get(ancestor)
                        .expect("ancestor vanished mid-walk")
                        .succeeded_by;
                    while let Some(version) = cursor {
                        let record = self
                            .store
                            .get(version)
                            .expect("lineage link to a missing entry");
                        self.relevant_changes.push(record.change.clone());
                        cursor = record.succeeded_by;
                    }
                }
                None => {
                    // The mirror never knew this lineage (or knew only an
                    // irrelevant ancestor): a single insert of the current
                    // head is sufficient.
                    self.relevant_changes.push(Change::Insert {
                        id: entry.version,
                        trajectory: Arc::clone(&entry.trajectory),
                    });
                }
            }
        } else if let Some(after) = self.after {
            // No longer relevant. If the mirror knew a relevant ancestor,
            // tell it to erase that lineage instead of streaming history
            // it no longer cares about; a later relevant revision will be
            // re-sent as a fresh insert.
            if let Some(ancestor) = self.store.last_known_ancestor(entry, after) {
                if relevant(ancestor) {
                    self.relevant_changes.push(Change::Erase {
                        id: entry.version,
                        original_id: ancestor.version,
                    });
                }
            }
        }
        // With no cursor and no relevance the mirror never knew this
        // lineage; transmit nothing.
    }

    /// Consume the inspector, yielding the collected changes
    pub fn finish(self) -> Vec<Change> {
        self.relevant_changes
    }
}
