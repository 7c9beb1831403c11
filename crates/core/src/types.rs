use chrono::SubsecRound;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Entity identifiers are prefixed random strings, see [`crate::id::new_id`].
pub type EntityId = String;

/// Current time at microsecond precision, the resolution PostgreSQL stores.
///
/// Truncating up front keeps values identical whichever backend they
/// round-trip through.
pub fn now() -> Timestamp {
    chrono::Utc::now().trunc_subsecs(6)
}
