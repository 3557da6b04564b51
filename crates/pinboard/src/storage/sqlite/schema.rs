//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
-- Pinned items table
CREATE TABLE IF NOT EXISTS pinned_items (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    entity_type TEXT NOT NULL
        CHECK (entity_type IN ('task', 'project', 'contact', 'routine', 'list')),
    entity_id TEXT NOT NULL,
    display_order INTEGER NOT NULL,
    pinned_at TEXT NOT NULL,
    last_accessed_at TEXT NOT NULL,
    UNIQUE (user_id, entity_type, entity_id)
);

CREATE INDEX IF NOT EXISTS idx_pinned_items_user_id ON pinned_items(user_id);
"#;

pub const SELECT_PINS_BY_USER: &str = r#"
SELECT id, user_id, entity_type, entity_id, display_order, pinned_at, last_accessed_at
FROM pinned_items
WHERE user_id = ?1
ORDER BY display_order ASC, pinned_at ASC
"#;

pub const INSERT_PIN: &str = r#"
INSERT INTO pinned_items (id, user_id, entity_type, entity_id, display_order, pinned_at, last_accessed_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

/// Only the mutable columns; the logical key and `pinned_at` never change.
pub const UPDATE_PIN: &str = r#"
UPDATE pinned_items
SET display_order = ?3, last_accessed_at = ?4
WHERE id = ?1 AND user_id = ?2
"#;

pub const DELETE_PIN: &str = r#"
DELETE FROM pinned_items
WHERE id = ?1 AND user_id = ?2
"#;
