// crates/easel-core/src/core/items.rs
// ============================================================================
// Module: Easel Items
// Description: The closed set of board item kinds and their payload documents.
// Purpose: Own payload interpretation and reconstruction from stored records.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A board item is a positioned visual element with a transform, an optional
//! save identity joining it to its stored row, and a kind-specific payload.
//! The kinds form a closed enum: `Pixmap` (an embedded encoded image),
//! `Text`, and `Error` (a placeholder substituted when a stored record could
//! not be decoded). Reconstruction from a stored record never fails; any
//! record that cannot be decoded degrades into an `Error` placeholder that
//! protects the original row from deletion.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::interfaces::PixmapDecoder;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Stored type tag for pixmap items.
pub const PIXMAP_TYPE: &str = "pixmap";
/// Stored type tag for text items.
pub const TEXT_TYPE: &str = "text";
/// Type tag used by error placeholders (never written to storage).
pub const ERROR_TYPE: &str = "error";

/// Diagnostic appended to placeholders for images that failed to decode.
pub const IMG_LOADING_ERROR_MSG: &str = "Unknown format or too big?";

// ============================================================================
// SECTION: Transform
// ============================================================================

/// Position and orientation shared by all item kinds.
///
/// # Invariants
/// - `flip` is always `1` or `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Stacking order value.
    pub z: f64,
    /// Uniform scale factor.
    pub scale: f64,
    /// Rotation angle in degrees.
    pub rotation: f64,
    /// Horizontal flip flag (`1` or `-1`).
    pub flip: i64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            scale: 1.0,
            rotation: 0.0,
            flip: 1,
        }
    }
}

// ============================================================================
// SECTION: Payload Documents
// ============================================================================

/// Structured payload document stored for pixmap items.
///
/// # Invariants
/// - Every field is optional on the wire; files migrated from schema
///   version 1 carry only `filename`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PixmapPayload {
    /// Original filename the image was loaded from, if known.
    #[serde(default)]
    pub filename: Option<String>,
    /// Item opacity in `0.0..=1.0`.
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Whether the item is displayed in grayscale.
    #[serde(default)]
    pub grayscale: bool,
    /// Crop rectangle as `[x, y, width, height]`; `None` means uncropped.
    #[serde(default)]
    pub crop: Option<[f64; 4]>,
}

/// Returns the default opacity for pixmap payloads.
const fn default_opacity() -> f64 {
    1.0
}

/// Structured payload document stored for text items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPayload {
    /// Text content.
    #[serde(default)]
    pub text: String,
}

/// Payload of an error placeholder (diagnostic text plus protected row).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Human-readable diagnostic shown in place of the original item.
    #[serde(default)]
    pub text: String,
    /// Save identity of the original record this placeholder protects.
    #[serde(skip)]
    pub original_save_id: i64,
}

// ============================================================================
// SECTION: Item Kinds
// ============================================================================

/// The closed set of item kinds a board can hold.
///
/// # Invariants
/// - Unknown stored type tags map to [`ItemKind::Error`], never to a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind {
    /// An embedded image: opaque encoded bytes plus a format tag.
    Pixmap {
        /// Encoded image bytes (immutable once persisted).
        bytes: Vec<u8>,
        /// Codec format tag, e.g. `png` or `jpg`.
        format: String,
        /// Structured payload document.
        payload: PixmapPayload,
    },
    /// A block of text.
    Text(TextPayload),
    /// A placeholder substituted for a record that failed to decode.
    Error(ErrorPayload),
}

// ============================================================================
// SECTION: Stored Record Snapshot
// ============================================================================

/// One stored record as handed to reconstruction by the read pipeline.
#[derive(Debug, Clone)]
pub struct ItemSnapshot {
    /// Save identity of the stored row.
    pub save_id: i64,
    /// Stored type tag.
    pub type_tag: String,
    /// Stored transform fields.
    pub transform: Transform,
    /// Structured payload document as stored.
    pub payload: Value,
    /// Associated blob bytes where present.
    pub blob: Option<Vec<u8>>,
}

// ============================================================================
// SECTION: Board Item
// ============================================================================

/// One live item on a board.
///
/// # Invariants
/// - `save_id` is `None` until the item is first persisted, then stable.
/// - Error placeholders never carry a `save_id`; they carry the original
///   row's identity in their payload instead.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardItem {
    /// Save identity joining this item to its stored row.
    pub save_id: Option<i64>,
    /// Position and orientation.
    pub transform: Transform,
    /// Kind-specific payload.
    pub kind: ItemKind,
}

impl BoardItem {
    /// Creates a new, never-persisted pixmap item.
    #[must_use]
    pub fn new_pixmap(bytes: Vec<u8>, format: impl Into<String>, filename: Option<String>) -> Self {
        Self {
            save_id: None,
            transform: Transform::default(),
            kind: ItemKind::Pixmap {
                bytes,
                format: format.into(),
                payload: PixmapPayload {
                    filename,
                    ..PixmapPayload::default()
                },
            },
        }
    }

    /// Creates a new, never-persisted text item.
    #[must_use]
    pub fn new_text(text: impl Into<String>) -> Self {
        Self {
            save_id: None,
            transform: Transform::default(),
            kind: ItemKind::Text(TextPayload {
                text: text.into(),
            }),
        }
    }

    /// Creates an error placeholder protecting the given original row.
    #[must_use]
    pub fn new_error(original_save_id: i64, text: impl Into<String>) -> Self {
        Self {
            save_id: None,
            transform: Transform::default(),
            kind: ItemKind::Error(ErrorPayload {
                text: text.into(),
                original_save_id,
            }),
        }
    }

    /// Returns the stored type tag for this item's kind.
    #[must_use]
    pub const fn type_tag(&self) -> &'static str {
        match &self.kind {
            ItemKind::Pixmap {
                ..
            } => PIXMAP_TYPE,
            ItemKind::Text(_) => TEXT_TYPE,
            ItemKind::Error(_) => ERROR_TYPE,
        }
    }

    /// Returns whether this item participates in saves.
    ///
    /// Error placeholders are never saved; the original row they protect
    /// stays in storage untouched instead.
    #[must_use]
    pub const fn is_saveable(&self) -> bool {
        !matches!(self.kind, ItemKind::Error(_))
    }

    /// Returns the structured payload document to store for this item.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if the payload cannot be represented
    /// as a JSON document.
    pub fn payload_document(&self) -> Result<Value, serde_json::Error> {
        match &self.kind {
            ItemKind::Pixmap {
                payload, ..
            } => serde_json::to_value(payload),
            ItemKind::Text(payload) => serde_json::to_value(payload),
            ItemKind::Error(payload) => serde_json::to_value(payload),
        }
    }

    /// Returns encoded blob bytes and format tag for blob-bearing kinds.
    #[must_use]
    pub fn blob_payload(&self) -> Option<(&[u8], &str)> {
        match &self.kind {
            ItemKind::Pixmap {
                bytes,
                format,
                ..
            } => Some((bytes.as_slice(), format.as_str())),
            ItemKind::Text(_) | ItemKind::Error(_) => None,
        }
    }

    /// Returns the external-export filename hint for this item's blob.
    ///
    /// The hint is `NNNN-basename.format` when a source filename is known
    /// and `NNNN.format` otherwise, with the save identity zero-padded.
    #[must_use]
    pub fn export_filename(&self, save_id: i64) -> String {
        let ItemKind::Pixmap {
            format,
            payload,
            ..
        } = &self.kind
        else {
            return format!("{save_id:04}");
        };
        payload.filename.as_deref().and_then(file_stem).map_or_else(
            || format!("{save_id:04}.{format}"),
            |basename| format!("{save_id:04}-{basename}.{format}"),
        )
    }

    /// Returns the original save identity protected by an error placeholder.
    #[must_use]
    pub const fn protected_original_id(&self) -> Option<i64> {
        match &self.kind {
            ItemKind::Error(payload) => Some(payload.original_save_id),
            ItemKind::Pixmap {
                ..
            }
            | ItemKind::Text(_) => None,
        }
    }

    /// Reconstructs a live item from a stored record.
    ///
    /// Decode failures are local recoveries: the result is an error
    /// placeholder carrying the record's identity and a diagnostic, never a
    /// failure of the overall read.
    #[must_use]
    pub fn reconstruct(snapshot: ItemSnapshot, decoder: &dyn PixmapDecoder) -> Self {
        let transform = snapshot.transform;
        let mut item = match snapshot.type_tag.as_str() {
            PIXMAP_TYPE => reconstruct_pixmap(&snapshot, decoder),
            TEXT_TYPE => {
                let payload: TextPayload =
                    serde_json::from_value(snapshot.payload).unwrap_or_default();
                let mut item = Self::new_text(payload.text);
                item.save_id = Some(snapshot.save_id);
                item
            }
            other => {
                Self::new_error(snapshot.save_id, format!("Item of unknown type: {other}"))
            }
        };
        item.transform = transform;
        item
    }
}

/// Reconstructs a pixmap item, degrading to a placeholder on decode failure.
fn reconstruct_pixmap(snapshot: &ItemSnapshot, decoder: &dyn PixmapDecoder) -> BoardItem {
    let payload: PixmapPayload =
        serde_json::from_value(snapshot.payload.clone()).unwrap_or_default();
    let Some(bytes) = snapshot.blob.clone() else {
        return BoardItem::new_error(
            snapshot.save_id,
            format!(
                "Image could not be loaded: {}\nEmbedded image data is missing",
                payload.filename.as_deref().unwrap_or("<unknown>")
            ),
        );
    };
    match decoder.decode(&bytes) {
        Ok(format) => BoardItem {
            save_id: Some(snapshot.save_id),
            transform: Transform::default(),
            kind: ItemKind::Pixmap {
                bytes,
                format,
                payload,
            },
        },
        Err(diagnostic) => BoardItem::new_error(
            snapshot.save_id,
            format!(
                "Image could not be loaded: {}\n{IMG_LOADING_ERROR_MSG}\n{diagnostic}",
                payload.filename.as_deref().unwrap_or("<unknown>")
            ),
        ),
    }
}

/// Returns the stem of a filename, if any.
fn file_stem(filename: &str) -> Option<String> {
    Path::new(filename).file_stem().map(|stem| stem.to_string_lossy().into_owned())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
