//! Database configuration
//!
//! Tuning knobs for a schedule database instance. Everything here is a
//! hint: leaving a field at its default never changes observable
//! behavior, only allocation patterns.

/// Configuration for a [`Database`](crate::database::Database) instance
///
/// # Example
///
/// ```
/// use corridor_engine::{Database, DatabaseConfig};
///
/// let db = Database::with_config(DatabaseConfig {
///     expected_entries: 4096,
///     ..DatabaseConfig::default()
/// });
/// assert_eq!(db.latest_version(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DatabaseConfig {
    /// Capacity hint for the version map
    ///
    /// Set this to the expected number of live entries (active heads plus
    /// their retained history) to avoid rehashing during bursts of
    /// schedule activity. Zero means "let the map grow on its own".
    pub expected_entries: usize,

    /// Reserve hint for the change buffer of each relevance query
    ///
    /// Zero means "reserve one slot per active head", which is the common
    /// shape of a catch-up patch.
    pub patch_reserve: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_all_automatic() {
        let config = DatabaseConfig::default();
        assert_eq!(config.expected_entries, 0);
        assert_eq!(config.patch_reserve, 0);
    }

    #[test]
    fn test_field_init_shorthand() {
        let config = DatabaseConfig {
            expected_entries: 128,
            ..DatabaseConfig::default()
        };
        assert_eq!(config.expected_entries, 128);
        assert_eq!(config.patch_reserve, 0);
    }
}
