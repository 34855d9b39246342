// crates/easel-core/src/interfaces/mod.rs
// ============================================================================
// Module: Easel Interfaces
// Description: Backend-agnostic contracts between the document and its stores.
// Purpose: Define the seams the persistence engine consumes.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! These traits keep the persistence engine independent of both the concrete
//! document type and the image codecs. [`Document`] is what a store reads
//! from and writes back into; [`ProgressSink`] is the worker/caller contract
//! (begin/progress/finished plus a cooperative cancellation flag);
//! [`PixmapDecoder`] validates opaque encoded image bytes without this crate
//! knowing any codec.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use thiserror::Error;

use crate::core::items::BoardItem;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Typed persistence failure surfaced to callers without a progress sink.
///
/// # Invariants
/// - `filename` names the container path the operation targeted.
#[derive(Debug, Clone, Error)]
#[error("file operation failed for {filename}: {message}")]
pub struct FileIoError {
    /// Human-readable failure description.
    pub message: String,
    /// Path of the container file the operation targeted.
    pub filename: String,
}

// ============================================================================
// SECTION: Document
// ============================================================================

/// The live document as seen by a persistence engine.
pub trait Document {
    /// Returns the saveable items in a stable, deterministic order.
    ///
    /// Saveable items are the ones carrying a save identity attribute;
    /// error placeholders are excluded. Mutable access lets the store write
    /// newly assigned identities back onto the items.
    fn saveable_items_mut(&mut self) -> Vec<&mut BoardItem>;

    /// Returns the original identities protected by live error placeholders.
    fn protected_original_ids(&self) -> BTreeSet<i64>;

    /// Clears every item's save identity ahead of a from-scratch rewrite.
    fn clear_save_ids(&mut self);

    /// Queues a reconstructed item for later insertion by the host.
    ///
    /// Takes `&self` because reconstruction happens off the document's
    /// owning thread; implementations use interior mutability.
    fn queue_reconstructed(&self, item: BoardItem);
}

// ============================================================================
// SECTION: Progress Sink
// ============================================================================

/// Worker/caller contract for long-running read and write operations.
///
/// # Invariants
/// - `finished` is reported exactly once per operation, success or failure.
/// - `canceled` is polled between units of work, never mid-item.
pub trait ProgressSink: Send + Sync {
    /// Reports the number of units of work, once per operation.
    fn begin_processing(&self, total: usize);

    /// Reports completion of the unit at `index`.
    fn progress(&self, index: usize);

    /// Reports the end of the operation; a non-empty `errors` list signals
    /// a fatal, caller-visible failure.
    fn finished(&self, filename: &str, errors: &[String]);

    /// Returns whether the host requested cooperative cancellation.
    fn canceled(&self) -> bool;
}

// ============================================================================
// SECTION: Pixmap Decoder
// ============================================================================

/// Validates opaque encoded image bytes for blob-bearing items.
///
/// Codecs live outside this crate; a decoder only has to establish that the
/// bytes are loadable and name their format tag.
pub trait PixmapDecoder: Send + Sync {
    /// Validates `bytes` and returns the detected format tag.
    ///
    /// # Errors
    ///
    /// Returns a human-readable diagnostic when the bytes cannot be decoded;
    /// the read pipeline turns it into an error placeholder.
    fn decode(&self, bytes: &[u8]) -> Result<String, String>;
}
