//! Error types for the corridor schedule
//!
//! This module defines the error type shared by all schedule APIs.
//! We use `thiserror` for automatic `Display` and `Error` trait
//! implementations.
//!
//! ## Error model
//!
//! Mutations fail without touching the schedule: a returned error means no
//! version was assigned and no lineage changed. Queries never fail — a
//! malformed query degenerates to an empty patch. Internal invariant
//! violations are not represented here at all; they signal a logic bug and
//! abort the process.

use crate::time::{Duration, Time};
use crate::version::Version;
use thiserror::Error;

/// Result type alias for schedule operations
pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Error type for schedule mutations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// The referenced id is not an active schedule head
    ///
    /// Returned when a mutation targets a version that was never
    /// assigned, was culled, or belongs to a terminated lineage.
    #[error("unknown id: {id} is not an active schedule head")]
    UnknownId {
        /// The id the mutation referenced
        id: Version,
    },

    /// The referenced entry has already been revised
    ///
    /// Reserved for multi-writer scenarios; under the single-writer
    /// invariants every superseded entry has also left the head set, so
    /// callers normally observe [`ScheduleError::UnknownId`] instead.
    #[error("id {id} has been superseded by version {by}")]
    Superseded {
        /// The id the mutation referenced
        id: Version,
        /// The version that superseded it
        by: Version,
    },

    /// A trajectory with no waypoints was supplied
    #[error("trajectory has no waypoints")]
    EmptyTrajectory,

    /// A time argument is inconsistent with the targeted trajectory
    #[error("invalid time: {reason}")]
    InvalidTime {
        /// What was wrong with the time argument
        reason: String,
    },
}

impl ScheduleError {
    /// Create an InvalidTime error for a shift that lands before the
    /// schedule epoch
    pub fn epoch_underflow(at: Time, delay: Duration) -> Self {
        ScheduleError::InvalidTime {
            reason: format!(
                "shifting waypoint at {} by {} lands before the schedule epoch",
                at, delay
            ),
        }
    }

    /// Create an InvalidTime error for a revision that breaks strict
    /// waypoint time ordering
    pub fn waypoint_reordering(at: Time) -> Self {
        ScheduleError::InvalidTime {
            reason: format!("waypoint at {} breaks strict time ordering", at),
        }
    }

    /// Check if this error means the mutation's target is gone
    ///
    /// True for [`ScheduleError::UnknownId`] and
    /// [`ScheduleError::Superseded`]: the caller's view of the schedule is
    /// stale and it should re-query before retrying.
    pub fn is_stale_target(&self) -> bool {
        matches!(
            self,
            ScheduleError::UnknownId { .. } | ScheduleError::Superseded { .. }
        )
    }

    /// Check if this error means the supplied arguments were invalid
    ///
    /// True for [`ScheduleError::EmptyTrajectory`] and
    /// [`ScheduleError::InvalidTime`]: retrying without changing the input
    /// cannot succeed.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            ScheduleError::EmptyTrajectory | ScheduleError::InvalidTime { .. }
        )
    }
}
