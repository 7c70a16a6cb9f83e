//! Schedule versioning
//!
//! Every mutation of the schedule database is assigned one version from a
//! single monotonic counter, so a version number identifies one change
//! across the whole database and doubles as the id of the entry that
//! change produced.

/// Monotonic integer identifying one mutation across the whole database
///
/// Versions assigned by the database strictly ascend with no gaps. The
/// value [`INITIAL_VERSION`] is reserved for "nothing assigned yet" and is
/// never given to an entry.
pub type Version = u64;

/// Reserved version meaning no mutation has been applied yet
pub const INITIAL_VERSION: Version = 0;
