/// Alert identifiers are UUIDv7: unique even when generated within the same millisecond.
pub type AlertId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
