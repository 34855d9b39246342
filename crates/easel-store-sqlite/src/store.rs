// crates/easel-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Board Store
// Description: Connection lifecycle, migration, and read/write pipelines.
// Purpose: Persist board documents into a single-file SQLite container.
// Dependencies: easel-core, rusqlite, serde, serde_json, tempfile, thiserror, tracing
// ============================================================================

//! ## Overview
//! One [`SqliteBoardStore`] owns exactly one connection to one container
//! file. Reads stream stored records into reconstructed items and hand them
//! to the document through its deferred-insert queue; writes reconcile the
//! live item set against stored rows (insert new, update changed, delete
//! removed) and commit in a single transaction. Every entry point is wrapped
//! by a recovery policy: roll back, release resources, and either report the
//! failure through the caller's progress sink or return a typed error.
//! Writes additionally retry exactly once by rebuilding the container from
//! scratch.
//!
//! The engine is built to run on a dedicated background thread (see
//! `easel_core::runtime`); callers must serialize operations per container
//! path.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use easel_core::BoardItem;
use easel_core::Document;
use easel_core::FileIoError;
use easel_core::ItemSnapshot;
use easel_core::PixmapDecoder;
use easel_core::ProgressSink;
use easel_core::Transform;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::Transaction;
use rusqlite::params;
use serde::Deserialize;
use serde_json::Value;
use tempfile::TempDir;
use thiserror::Error;
use tracing::debug;
use tracing::info;
use tracing::trace;
use tracing::warn;

use crate::schema::APPLICATION_ID;
use crate::schema::SCHEMA;
use crate::schema::USER_VERSION;
use crate::schema::migration_steps;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Default pause between per-item units, keeping a host thread responsive.
const DEFAULT_ITEM_YIELD_MS: u64 = 10;
/// File mode stored for embedded blobs in the sqlar table.
const SQLAR_FILE_MODE: i64 = 0o644;
/// Extension of native container files.
const FILE_EXTENSION: &str = "easel";

// ============================================================================
// SECTION: Config
// ============================================================================

/// Configuration for the `SQLite` board store.
///
/// # Invariants
/// - `busy_timeout_ms` and `item_yield_ms` are interpreted as milliseconds.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreOptions {
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// Pause after each per-item unit when a progress sink is attached.
    #[serde(default = "default_item_yield_ms")]
    pub item_yield_ms: u64,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            item_yield_ms: DEFAULT_ITEM_YIELD_MS,
        }
    }
}

/// Returns the default busy timeout for container connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

/// Returns the default per-item yield pause.
const fn default_item_yield_ms() -> u64 {
    DEFAULT_ITEM_YIELD_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Container store errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error, Clone)]
pub enum BoardStoreError {
    /// Filesystem I/O error.
    #[error("container io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("container db error: {0}")]
    Db(String),
    /// Write attempted against a read-only container.
    #[error("container is read-only: {0}")]
    ReadOnly(String),
    /// Stored schema version cannot be brought to the current version.
    #[error("container version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid stored data or store state.
    #[error("container invalid data: {0}")]
    Invalid(String),
}

impl From<rusqlite::Error> for BoardStoreError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Db(error.to_string())
    }
}

// ============================================================================
// SECTION: Open Mode
// ============================================================================

/// How a container file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Delete any file at the path and initialize a fresh container.
    CreateNew,
    /// Open an existing container for writing, migrating it if needed.
    Existing,
    /// Open an existing container for reading; a required migration is
    /// applied in place when the file is writable, or against a temporary
    /// working copy when it is not.
    ReadOnly,
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed board container with migration and failure recovery.
///
/// # Invariants
/// - Exactly one connection is open per instance at a time.
/// - The connection and any temporary working copy are released exactly
///   once, on every exit path.
#[derive(Debug)]
pub struct SqliteBoardStore {
    /// Path of the container file.
    filename: PathBuf,
    /// Store configuration.
    options: StoreOptions,
    /// Whether the next connection initializes a fresh container.
    create_new: bool,
    /// Whether the caller requested read-only access.
    readonly: bool,
    /// Lazily established connection.
    connection: Option<Connection>,
    /// Temporary directory holding a read-only migration working copy.
    tmpdir: Option<TempDir>,
    /// Whether reads are served from a detached migrated copy.
    detached_copy: bool,
}

impl SqliteBoardStore {
    /// Creates a store for the container at `filename` with default options.
    #[must_use]
    pub fn new(filename: impl Into<PathBuf>, mode: OpenMode) -> Self {
        Self::with_options(filename, mode, StoreOptions::default())
    }

    /// Creates a store with explicit options.
    #[must_use]
    pub fn with_options(filename: impl Into<PathBuf>, mode: OpenMode, options: StoreOptions) -> Self {
        Self {
            filename: filename.into(),
            options,
            create_new: matches!(mode, OpenMode::CreateNew),
            readonly: matches!(mode, OpenMode::ReadOnly),
            connection: None,
            tmpdir: None,
            detached_copy: false,
        }
    }

    /// Returns the path of the container file this store targets.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.filename
    }

    /// Returns whether reads are served from a detached migrated copy.
    ///
    /// True after a read-only source required a migration and was copied to
    /// a temporary location; the original path was never modified, so hosts
    /// should force a save-as flow for subsequent saves.
    #[must_use]
    pub const fn is_detached_copy(&self) -> bool {
        self.detached_copy
    }

    /// Closes the connection and removes any temporary working copy.
    ///
    /// Idempotent; also runs on drop.
    pub fn close(&mut self) {
        if let Some(connection) = self.connection.take()
            && let Err((_connection, err)) = connection.close()
        {
            debug!(error = %err, "closing container connection failed");
        }
        if let Some(tmpdir) = self.tmpdir.take()
            && let Err(err) = tmpdir.close()
        {
            debug!(error = %err, "removing temporary migration copy failed");
        }
    }

    // ------------------------------------------------------------------
    // Read pipeline
    // ------------------------------------------------------------------

    /// Reads all stored records and queues reconstructed items onto the
    /// document.
    ///
    /// Per-record decode failures degrade into error placeholders and never
    /// abort the read. When `sink` is provided, operation-level failures are
    /// reported through `finished(filename, [description])` and `Ok(())` is
    /// returned; otherwise they surface as [`FileIoError`]. Reads do not
    /// auto-retry.
    ///
    /// # Errors
    ///
    /// Returns [`FileIoError`] on a fatal failure when no sink was supplied.
    pub fn read<D: Document>(
        &mut self,
        document: &D,
        decoder: &dyn PixmapDecoder,
        sink: Option<&dyn ProgressSink>,
    ) -> Result<(), FileIoError> {
        match self.read_inner(document, decoder, sink) {
            Ok(()) => Ok(()),
            Err(err) => self.report_failure(&err, sink),
        }
    }

    /// Read pipeline body; any error propagates to the recovery wrapper.
    fn read_inner<D: Document>(
        &mut self,
        document: &D,
        decoder: &dyn PixmapDecoder,
        sink: Option<&dyn ProgressSink>,
    ) -> Result<(), BoardStoreError> {
        self.ensure_connection()?;
        let yield_pause = Duration::from_millis(self.options.item_yield_ms);
        let filename = self.display_name();
        let connection = self.connection.as_ref().ok_or_else(no_connection)?;
        let mut records = query_blob_records(connection)?;
        records.extend(query_blobless_records(connection)?);
        if let Some(sink) = sink {
            sink.begin_processing(records.len());
        }
        for (index, record) in records.into_iter().enumerate() {
            let snapshot = record.into_snapshot()?;
            document.queue_reconstructed(BoardItem::reconstruct(snapshot, decoder));
            if let Some(sink) = sink {
                trace!(index, "emit progress");
                sink.progress(index);
                if sink.canceled() {
                    // Partial loads are expected on cancellation.
                    sink.finished("", &[]);
                    return Ok(());
                }
                // Give the host thread time to drain queued items.
                thread::sleep(yield_pause);
            }
        }
        if let Some(sink) = sink {
            sink.finished(&filename, &[]);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Write pipeline
    // ------------------------------------------------------------------

    /// Reconciles the document's saveable items against stored rows and
    /// commits the result.
    ///
    /// Fails immediately when the container was opened read-only. On any
    /// other failure the write retries exactly once by rebuilding the
    /// container from scratch; a second failure is reported through `sink`
    /// (as `finished(filename, [description])`) or returned as
    /// [`FileIoError`].
    ///
    /// # Errors
    ///
    /// Returns [`FileIoError`] on a fatal failure when no sink was supplied.
    pub fn write<D: Document>(
        &mut self,
        document: &mut D,
        sink: Option<&dyn ProgressSink>,
    ) -> Result<(), FileIoError> {
        if self.readonly {
            let err =
                BoardStoreError::ReadOnly("attempt to write to a read-only container".to_string());
            return self.report_failure(&err, sink);
        }
        if !self.filename.exists() {
            self.create_new = true;
        }
        let mut retried = false;
        loop {
            match self.write_inner(document, sink) {
                Ok(()) => return Ok(()),
                Err(err) if !retried => {
                    retried = true;
                    warn!(
                        error = %err,
                        file = %self.filename.display(),
                        "writing to existing container failed; rebuilding from scratch"
                    );
                    self.rollback_and_close();
                    self.create_new = true;
                }
                Err(err) => return self.report_failure(&err, sink),
            }
        }
    }

    /// Write pipeline body; any error propagates to the retry loop.
    fn write_inner<D: Document>(
        &mut self,
        document: &mut D,
        sink: Option<&dyn ProgressSink>,
    ) -> Result<(), BoardStoreError> {
        self.ensure_connection()?;
        if self.create_new {
            document.clear_save_ids();
        }
        let create_new = self.create_new;
        let yield_pause = Duration::from_millis(self.options.item_yield_ms);
        let filename = self.display_name();
        let connection = self.connection.as_mut().ok_or_else(no_connection)?;
        let tx = connection.transaction()?;
        if create_new {
            write_meta(&tx)?;
            for statement in SCHEMA {
                tx.execute_batch(statement)?;
            }
        }
        let mut to_delete = stored_ids(&tx)?;
        let protected = document.protected_original_ids();
        if !protected.is_empty() {
            debug!(protected = protected.len(), "rows protected by error placeholders");
        }
        for id in &protected {
            to_delete.remove(id);
        }
        let items = document.saveable_items_mut();
        if let Some(sink) = sink {
            sink.begin_processing(items.len());
        }
        let mut canceled = false;
        for (index, item) in items.into_iter().enumerate() {
            match item.save_id {
                Some(id) => {
                    update_item(&tx, id, item)?;
                    to_delete.remove(&id);
                }
                None => insert_item(&tx, item)?,
            }
            if let Some(sink) = sink {
                sink.progress(index);
                if sink.canceled() {
                    // Completed per-item writes stay; only further work halts.
                    canceled = true;
                    break;
                }
                thread::sleep(yield_pause);
            }
        }
        if !canceled {
            delete_items(&tx, &to_delete)?;
        }
        tx.commit()?;
        if !canceled {
            // VACUUM cannot run inside a transaction.
            connection.execute_batch("VACUUM")?;
        }
        self.create_new = false;
        if let Some(sink) = sink {
            sink.finished(&filename, &[]);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Connection manager
    // ------------------------------------------------------------------

    /// Establishes the connection on first use; existing containers are
    /// migrated immediately after connecting.
    fn ensure_connection(&mut self) -> Result<(), BoardStoreError> {
        if self.connection.is_some() {
            return Ok(());
        }
        if self.create_new && !self.readonly && self.filename.exists() {
            fs::remove_file(&self.filename).map_err(|err| BoardStoreError::Io(err.to_string()))?;
        }
        let mut flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
        if !self.readonly {
            flags |= OpenFlags::SQLITE_OPEN_CREATE;
        }
        let connection = Connection::open_with_flags(&self.filename, flags)?;
        apply_connection_pragmas(&connection, &self.options)?;
        self.connection = Some(connection);
        if !self.create_new {
            self.migrate()?;
        }
        Ok(())
    }

    /// Applies pending migration steps to bring the container to the
    /// current schema version.
    ///
    /// A stored version at or above the current one is a no-op, which makes
    /// migration idempotent. All pending steps run in a single transaction,
    /// followed by the identity and version pragmas.
    fn migrate(&mut self) -> Result<(), BoardStoreError> {
        let version = self.stored_version()?;
        debug!(version, "found container schema version");
        if version >= USER_VERSION {
            debug!("version current; no migrations necessary");
            return Ok(());
        }
        if self.readonly {
            self.ensure_migratable()?;
        }
        let connection = self.connection.as_mut().ok_or_else(no_connection)?;
        let tx = connection.transaction()?;
        for from in version..USER_VERSION {
            let target = from + 1;
            debug!(from, target, "migrating container schema");
            let steps = migration_steps(target).ok_or_else(|| {
                BoardStoreError::VersionMismatch(format!(
                    "no migration steps registered for version {target}"
                ))
            })?;
            for statement in steps {
                tx.execute_batch(statement)?;
            }
        }
        write_meta(&tx)?;
        tx.commit()?;
        debug!("migration finished");
        Ok(())
    }

    /// Makes a read-only source migratable, copying it to a temporary
    /// working location when the file itself cannot be written.
    fn ensure_migratable(&mut self) -> Result<(), BoardStoreError> {
        let probe = self
            .connection
            .as_ref()
            .ok_or_else(no_connection)?
            .pragma_update(None, "application_id", APPLICATION_ID);
        if probe.is_ok() {
            return Ok(());
        }
        debug!("source not writable; migrating a temporary copy instead");
        self.connection = None;
        let tmpdir = tempfile::Builder::new()
            .prefix("easel")
            .tempdir()
            .map_err(|err| BoardStoreError::Io(err.to_string()))?;
        let copy_path = tmpdir.path().join("migrate.easel");
        fs::copy(&self.filename, &copy_path)
            .map_err(|err| BoardStoreError::Io(err.to_string()))?;
        let connection = Connection::open_with_flags(
            &copy_path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_FULL_MUTEX,
        )?;
        apply_connection_pragmas(&connection, &self.options)?;
        self.connection = Some(connection);
        self.tmpdir = Some(tmpdir);
        self.detached_copy = true;
        Ok(())
    }

    /// Reads the stored schema version pragma.
    fn stored_version(&self) -> Result<i64, BoardStoreError> {
        let connection = self.connection.as_ref().ok_or_else(no_connection)?;
        Ok(connection.query_row("PRAGMA user_version", [], |row| row.get(0))?)
    }

    // ------------------------------------------------------------------
    // Failure recovery controller
    // ------------------------------------------------------------------

    /// Rolls back any open transaction and releases all resources, then
    /// routes the failure through the sink or returns it as a typed error.
    fn report_failure(
        &mut self,
        err: &BoardStoreError,
        sink: Option<&dyn ProgressSink>,
    ) -> Result<(), FileIoError> {
        let filename = self.display_name();
        warn!(error = %err, file = %filename, "container operation failed");
        self.rollback_and_close();
        if let Some(sink) = sink {
            sink.finished(&filename, &[err.to_string()]);
            return Ok(());
        }
        Err(FileIoError {
            message: err.to_string(),
            filename,
        })
    }

    /// Best-effort rollback followed by teardown; rollback errors are
    /// ignored.
    fn rollback_and_close(&mut self) {
        if let Some(connection) = &self.connection
            && !connection.is_autocommit()
            && connection.execute_batch("ROLLBACK").is_err()
        {
            debug!("rollback attempt failed; ignoring");
        }
        self.close();
    }

    /// Returns the container path as a display string.
    fn display_name(&self) -> String {
        self.filename.display().to_string()
    }
}

impl Drop for SqliteBoardStore {
    fn drop(&mut self) {
        self.close();
    }
}

// ============================================================================
// SECTION: Convenience Entry Points
// ============================================================================

/// Checks whether the file at the given path is a native container file.
#[must_use]
pub fn is_easel_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case(FILE_EXTENSION))
}

/// Loads a native container file into the document's deferred-insert queue.
///
/// # Errors
///
/// Returns [`FileIoError`] on a fatal failure when no sink was supplied.
pub fn load_board<D: Document>(
    filename: impl Into<PathBuf>,
    document: &D,
    decoder: &dyn PixmapDecoder,
    sink: Option<&dyn ProgressSink>,
) -> Result<(), FileIoError> {
    let filename = filename.into();
    info!(file = %filename.display(), "loading board");
    let mut store = SqliteBoardStore::new(filename, OpenMode::ReadOnly);
    store.read(document, decoder, sink)
}

/// Saves the document into a native container file.
///
/// # Errors
///
/// Returns [`FileIoError`] on a fatal failure when no sink was supplied.
pub fn save_board<D: Document>(
    filename: impl Into<PathBuf>,
    document: &mut D,
    create_new: bool,
    sink: Option<&dyn ProgressSink>,
) -> Result<(), FileIoError> {
    let filename = filename.into();
    info!(file = %filename.display(), create_new, "saving board");
    let mode = if create_new {
        OpenMode::CreateNew
    } else {
        OpenMode::Existing
    };
    let mut store = SqliteBoardStore::new(filename, mode);
    let result = store.write(document, sink);
    info!("end save");
    result
}

// ============================================================================
// SECTION: Stored Records
// ============================================================================

/// One stored row as fetched by the read pipeline.
#[derive(Debug)]
struct StoredRecord {
    /// Save identity of the row.
    save_id: i64,
    /// Stored type tag.
    type_tag: String,
    /// Horizontal position.
    x: f64,
    /// Vertical position.
    y: f64,
    /// Stacking order value.
    z: f64,
    /// Uniform scale factor.
    scale: f64,
    /// Rotation angle in degrees.
    rotation: f64,
    /// Flip flag.
    flip: i64,
    /// Structured payload document as stored text.
    payload_text: Option<String>,
    /// Associated blob bytes where present.
    blob: Option<Vec<u8>>,
}

impl StoredRecord {
    /// Decodes the payload document and builds the reconstruction snapshot.
    fn into_snapshot(self) -> Result<ItemSnapshot, BoardStoreError> {
        let payload = match self.payload_text {
            Some(text) => serde_json::from_str(&text).map_err(|err| {
                BoardStoreError::Invalid(format!(
                    "malformed payload document for item {}: {err}",
                    self.save_id
                ))
            })?,
            None => Value::Object(serde_json::Map::new()),
        };
        Ok(ItemSnapshot {
            save_id: self.save_id,
            type_tag: self.type_tag,
            transform: Transform {
                x: self.x,
                y: self.y,
                z: self.z,
                scale: self.scale,
                rotation: self.rotation,
                flip: self.flip,
            },
            payload,
            blob: self.blob,
        })
    }
}

/// Maps a stored row into a [`StoredRecord`].
fn map_stored_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredRecord> {
    Ok(StoredRecord {
        save_id: row.get(0)?,
        type_tag: row.get(1)?,
        x: row.get(2)?,
        y: row.get(3)?,
        z: row.get(4)?,
        scale: row.get(5)?,
        rotation: row.get(6)?,
        flip: row.get(7)?,
        payload_text: row.get(8)?,
        blob: row.get(9)?,
    })
}

/// Fetches all blob-bearing records with their embedded bytes.
fn query_blob_records(connection: &Connection) -> Result<Vec<StoredRecord>, BoardStoreError> {
    let mut stmt = connection.prepare(
        "SELECT items.id, type, x, y, z, scale, rotation, flip, items.data, sqlar.data
         FROM sqlar JOIN items ON sqlar.item_id = items.id",
    )?;
    let rows = stmt.query_map([], map_stored_record)?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(BoardStoreError::from)
}

/// Fetches all blobless records.
///
/// Queried separately instead of an OUTER JOIN for performance; ordering is
/// not significant since identities are explicit. Selecting by the absence
/// of an sqlar row rather than by type tag keeps unknown blobless rows and
/// pixmap rows with missing blobs visible, so reconstruction can degrade
/// them to protected placeholders instead of the next reconcile pass
/// silently deleting them.
fn query_blobless_records(connection: &Connection) -> Result<Vec<StoredRecord>, BoardStoreError> {
    let mut stmt = connection.prepare(
        "SELECT items.id, type, x, y, z, scale, rotation, flip, items.data, null
         FROM items WHERE items.id NOT IN (SELECT item_id FROM sqlar)",
    )?;
    let rows = stmt.query_map([], map_stored_record)?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(BoardStoreError::from)
}

// ============================================================================
// SECTION: Row Operations
// ============================================================================

/// Writes the container identity and version pragmas.
fn write_meta(connection: &Connection) -> Result<(), BoardStoreError> {
    connection.pragma_update(None, "application_id", APPLICATION_ID)?;
    connection.pragma_update(None, "user_version", USER_VERSION)?;
    Ok(())
}

/// Applies connection-scoped pragmas.
fn apply_connection_pragmas(
    connection: &Connection,
    options: &StoreOptions,
) -> Result<(), BoardStoreError> {
    connection.execute_batch("PRAGMA foreign_keys = ON;")?;
    connection.busy_timeout(Duration::from_millis(options.busy_timeout_ms))?;
    Ok(())
}

/// Returns the identities of all stored rows.
fn stored_ids(tx: &Transaction<'_>) -> Result<BTreeSet<i64>, BoardStoreError> {
    let mut stmt = tx.prepare("SELECT id FROM items")?;
    let rows = stmt.query_map([], |row| row.get::<_, i64>(0))?;
    rows.collect::<rusqlite::Result<BTreeSet<_>>>().map_err(BoardStoreError::from)
}

/// Serializes an item's structured payload document.
fn payload_text(item: &BoardItem) -> Result<String, BoardStoreError> {
    let document =
        item.payload_document().map_err(|err| BoardStoreError::Invalid(err.to_string()))?;
    serde_json::to_string(&document).map_err(|err| BoardStoreError::Invalid(err.to_string()))
}

/// Updates an existing row's transform fields and payload document.
///
/// The associated blob is left untouched: blob content never changes after
/// insert and rewriting it on every save would dominate write time.
fn update_item(tx: &Transaction<'_>, id: i64, item: &BoardItem) -> Result<(), BoardStoreError> {
    let payload = payload_text(item)?;
    trace!(id, "updating stored item");
    tx.execute(
        "UPDATE items SET x = ?1, y = ?2, z = ?3, scale = ?4, rotation = ?5, flip = ?6, data = ?7
         WHERE id = ?8",
        params![
            item.transform.x,
            item.transform.y,
            item.transform.z,
            item.transform.scale,
            item.transform.rotation,
            item.transform.flip,
            payload,
            id
        ],
    )?;
    Ok(())
}

/// Inserts a new row, writes the assigned identity back onto the item, and
/// stores its blob alongside when the kind carries one.
fn insert_item(tx: &Transaction<'_>, item: &mut BoardItem) -> Result<(), BoardStoreError> {
    let payload = payload_text(item)?;
    tx.execute(
        "INSERT INTO items (type, x, y, z, scale, rotation, flip, data)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            item.type_tag(),
            item.transform.x,
            item.transform.y,
            item.transform.z,
            item.transform.scale,
            item.transform.rotation,
            item.transform.flip,
            payload
        ],
    )?;
    let save_id = tx.last_insert_rowid();
    item.save_id = Some(save_id);
    trace!(save_id, "inserted new item");
    if let Some((bytes, _format)) = item.blob_payload() {
        let name = item.export_filename(save_id);
        let size = i64::try_from(bytes.len())
            .map_err(|_| BoardStoreError::Invalid("blob exceeds supported size".to_string()))?;
        tx.execute(
            "INSERT INTO sqlar (item_id, name, mode, sz, data) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![save_id, name, SQLAR_FILE_MODE, size, bytes],
        )?;
    }
    Ok(())
}

/// Deletes the remaining reconciliation candidates from both tables.
fn delete_items(tx: &Transaction<'_>, to_delete: &BTreeSet<i64>) -> Result<(), BoardStoreError> {
    if to_delete.is_empty() {
        return Ok(());
    }
    debug!(count = to_delete.len(), "deleting rows with no live item");
    let mut delete_item = tx.prepare("DELETE FROM items WHERE id = ?1")?;
    let mut delete_blob = tx.prepare("DELETE FROM sqlar WHERE item_id = ?1")?;
    for id in to_delete {
        delete_item.execute(params![id])?;
        delete_blob.execute(params![id])?;
    }
    Ok(())
}

/// Error used when an operation runs without an established connection.
fn no_connection() -> BoardStoreError {
    BoardStoreError::Invalid("container connection not established".to_string())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::is_easel_file;

    #[test]
    fn easel_extension_is_recognized_case_insensitively() {
        assert!(is_easel_file(Path::new("board.easel")));
        assert!(is_easel_file(Path::new("board.EASEL")));
        assert!(!is_easel_file(Path::new("board.sqlite")));
        assert!(!is_easel_file(Path::new("easel")));
    }
}
