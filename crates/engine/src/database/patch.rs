//! Patches: the unit of mirror synchronization
//!
//! A [`Patch`] is the reply to one relevance query: the change records the
//! caller must apply, sorted ascending by assigned version, plus the
//! database's latest version at the moment the query ran. Applying every
//! change and advancing the cursor to that version brings a mirror into
//! agreement with the snapshot the query observed.

use crate::database::change::Change;
use corridor_core::Version;
use serde::{Deserialize, Serialize};

/// A version-ordered batch of changes plus the snapshot's latest version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    changes: Vec<Change>,
    latest_version: Version,
}

impl Patch {
    /// Wrap a batch of changes, sorting them into application order
    pub(crate) fn new(mut changes: Vec<Change>, latest_version: Version) -> Self {
        // Ids are unique, so the sort has no ties to preserve.
        changes.sort_by_key(Change::id);
        Patch {
            changes,
            latest_version,
        }
    }

    /// Number of changes in the patch
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// True iff the patch carries no changes
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// The database's latest version when this patch was produced
    ///
    /// After applying the whole patch a mirror advances its cursor to
    /// exactly this value.
    pub fn latest_version(&self) -> Version {
        self.latest_version
    }

    /// Iterate the changes in application order
    pub fn iter(&self) -> std::slice::Iter<'_, Change> {
        self.changes.iter()
    }
}

impl<'a> IntoIterator for &'a Patch {
    type Item = &'a Change;
    type IntoIter = std::slice::Iter<'a, Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}
