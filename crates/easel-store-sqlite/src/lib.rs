// crates/easel-store-sqlite/src/lib.rs
// ============================================================================
// Module: Easel SQLite Store
// Description: Single-file board container backed by SQLite.
// Purpose: Persist and reconstruct board documents with migration and recovery.
// Dependencies: easel-core, rusqlite, serde_json, tempfile, thiserror, tracing
// ============================================================================

//! ## Overview
//! Easel's native file format is a single SQLite database. Items live in an
//! `items` table; embedded image bytes live in an `sqlar` table so they can
//! be extracted with SQLite's archive command line option. The container is
//! versioned through `PRAGMA user_version` and recognized through a fixed
//! `PRAGMA application_id`; opening an older file migrates it in one
//! transaction, falling back to a temporary working copy when the source is
//! read-only.

pub mod schema;
pub mod store;

pub use schema::APPLICATION_ID;
pub use schema::SCHEMA;
pub use schema::USER_VERSION;
pub use store::BoardStoreError;
pub use store::OpenMode;
pub use store::SqliteBoardStore;
pub use store::StoreOptions;
pub use store::is_easel_file;
pub use store::load_board;
pub use store::save_board;
