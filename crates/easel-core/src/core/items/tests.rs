// crates/easel-core/src/core/items/tests.rs
// ============================================================================
// Module: Easel Item Tests
// Description: Unit tests for item reconstruction and payload handling.
// Purpose: Validate placeholder degradation, identity copying, and naming.
// Dependencies: easel-core
// ============================================================================

//! ## Overview
//! Validates that reconstruction from stored records copies identity and
//! transform, degrades decode failures and unknown type tags into protected
//! error placeholders, and that export filename hints and legacy payload
//! defaults behave as stored containers expect.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use super::BoardItem;
use super::ItemKind;
use super::ItemSnapshot;
use super::PixmapPayload;
use super::Transform;
use crate::interfaces::PixmapDecoder;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Decoder that accepts everything as PNG.
struct AcceptAll;

impl PixmapDecoder for AcceptAll {
    fn decode(&self, _bytes: &[u8]) -> Result<String, String> {
        Ok("png".to_string())
    }
}

/// Decoder that rejects everything.
struct RejectAll;

impl PixmapDecoder for RejectAll {
    fn decode(&self, _bytes: &[u8]) -> Result<String, String> {
        Err("not an image".to_string())
    }
}

fn snapshot(type_tag: &str, blob: Option<Vec<u8>>) -> ItemSnapshot {
    ItemSnapshot {
        save_id: 7,
        type_tag: type_tag.to_string(),
        transform: Transform {
            x: 1.0,
            ..Transform::default()
        },
        payload: serde_json::json!({"filename": "cat.png"}),
        blob,
    }
}

// ============================================================================
// SECTION: Reconstruction
// ============================================================================

#[test]
fn pixmap_reconstruction_copies_identity_and_transform() {
    let item = BoardItem::reconstruct(snapshot("pixmap", Some(vec![1, 2, 3])), &AcceptAll);
    assert_eq!(item.save_id, Some(7));
    assert!((item.transform.x - 1.0).abs() < f64::EPSILON);
    assert!(matches!(item.kind, ItemKind::Pixmap { .. }));
}

#[test]
fn failed_decode_becomes_protected_placeholder() {
    let item = BoardItem::reconstruct(snapshot("pixmap", Some(vec![1])), &RejectAll);
    assert_eq!(item.save_id, None);
    assert_eq!(item.protected_original_id(), Some(7));
    let ItemKind::Error(payload) = &item.kind else {
        panic!("expected error placeholder");
    };
    assert!(payload.text.contains("cat.png"));
}

#[test]
fn missing_blob_becomes_protected_placeholder() {
    let item = BoardItem::reconstruct(snapshot("pixmap", None), &AcceptAll);
    assert_eq!(item.protected_original_id(), Some(7));
    assert!(!item.is_saveable());
}

#[test]
fn unknown_tag_becomes_placeholder() {
    let item = BoardItem::reconstruct(snapshot("hologram", None), &AcceptAll);
    assert_eq!(item.protected_original_id(), Some(7));
    assert!(!item.is_saveable());
}

// ============================================================================
// SECTION: Naming and Payloads
// ============================================================================

#[test]
fn export_filename_includes_stem_and_format() {
    let item = BoardItem::new_pixmap(vec![0], "png", Some("pics/cat.jpeg".to_string()));
    assert_eq!(item.export_filename(3), "0003-cat.png");
    let bare = BoardItem::new_pixmap(vec![0], "png", None);
    assert_eq!(bare.export_filename(3), "0003.png");
}

#[test]
fn legacy_payload_with_only_filename_deserializes_with_defaults() {
    let payload: PixmapPayload =
        serde_json::from_value(serde_json::json!({"filename": "a.png"})).unwrap();
    assert!((payload.opacity - 1.0).abs() < f64::EPSILON);
    assert!(!payload.grayscale);
    assert!(payload.crop.is_none());
}
