//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and pins, testable
//! without database access.

use chrono::{DateTime, Utc};
use rusqlite::Row;
use uuid::Uuid;

use pinboard_core::pins::{EntityType, PinnedItem};

/// Convert a SQLite row to a PinnedItem.
///
/// Expected columns: id, user_id, entity_type, entity_id, display_order, pinned_at, last_accessed_at
pub fn row_to_pin(row: &Row) -> rusqlite::Result<PinnedItem> {
    let id: String = row.get(0)?;
    let user_id: String = row.get(1)?;
    let entity_type: String = row.get(2)?;
    let entity_id: String = row.get(3)?;
    let display_order: i32 = row.get(4)?;
    let pinned_at: String = row.get(5)?;
    let last_accessed_at: String = row.get(6)?;

    Ok(PinnedItem {
        id: parse_uuid(0, &id)?,
        user_id: parse_uuid(1, &user_id)?,
        entity_type: parse_entity_type(2, &entity_type)?,
        entity_id: parse_uuid(3, &entity_id)?,
        display_order,
        pinned_at: parse_datetime(5, &pinned_at)?,
        last_accessed_at: parse_datetime(6, &last_accessed_at)?,
    })
}

/// Format a DateTime<Utc> for SQLite storage (RFC 3339).
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn conversion_error(
    column: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(err))
}

fn parse_uuid(column: usize, s: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| conversion_error(column, e))
}

fn parse_entity_type(column: usize, s: &str) -> rusqlite::Result<EntityType> {
    s.parse().map_err(|e| conversion_error(column, e))
}

/// Parse a datetime from RFC 3339 string.
fn parse_datetime(column: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(column, e))
}
