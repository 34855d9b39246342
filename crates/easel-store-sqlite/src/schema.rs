// crates/easel-store-sqlite/src/schema.rs
// ============================================================================
// Module: Easel Container Schema
// Description: Versioned DDL and ordered migration steps for the container.
// Purpose: Pure schema registry; no behavior beyond lookups.
// Dependencies: none
// ============================================================================

//! ## Overview
//! The schema registry is immutable static data: the DDL for the current
//! container version plus, per target version, the ordered statements that
//! transform the previous version's stored shape into it. Migrations are
//! strictly sequential and cumulative; there is no skip-version shortcut.

/// Fixed container identity written to `PRAGMA application_id`.
pub const APPLICATION_ID: i64 = 2_060_242_126;

/// Current container schema version written to `PRAGMA user_version`.
pub const USER_VERSION: i64 = 2;

/// DDL for the current schema version.
pub const SCHEMA: &[&str] = &[
    "CREATE TABLE items (
        id INTEGER PRIMARY KEY,
        type TEXT NOT NULL,
        x REAL DEFAULT 0,
        y REAL DEFAULT 0,
        z REAL DEFAULT 0,
        scale REAL DEFAULT 1,
        rotation REAL DEFAULT 0,
        flip INTEGER DEFAULT 1,
        data JSON
    )",
    "CREATE TABLE sqlar (
        name TEXT PRIMARY KEY,
        item_id INTEGER NOT NULL UNIQUE,
        mode INT,
        mtime INT default current_timestamp,
        sz INT,
        data BLOB,
        FOREIGN KEY (item_id)
          REFERENCES items (id)
             ON DELETE CASCADE
             ON UPDATE NO ACTION
    )",
];

/// Ordered statements migrating version 1 containers to version 2.
const MIGRATIONS_TO_V2: &[&str] = &[
    "ALTER TABLE items ADD COLUMN data JSON",
    "UPDATE items SET data = json_object('filename', filename)",
];

/// Returns the ordered migration statements reaching `target` from
/// `target - 1`, or `None` when no steps are registered for `target`.
#[must_use]
pub const fn migration_steps(target: i64) -> Option<&'static [&'static str]> {
    match target {
        2 => Some(MIGRATIONS_TO_V2),
        _ => None,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::USER_VERSION;
    use super::migration_steps;

    #[test]
    fn every_version_step_is_registered() {
        for target in 2..=USER_VERSION {
            assert!(migration_steps(target).is_some(), "missing steps for version {target}");
        }
        assert!(migration_steps(1).is_none());
        assert!(migration_steps(USER_VERSION + 1).is_none());
    }
}
