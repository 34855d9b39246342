// crates/easel-core/src/lib.rs
// ============================================================================
// Module: Easel Core
// Description: Document model and collaborator interfaces for Easel boards.
// Purpose: Define items, the live board, and the worker/progress contract.
// Dependencies: serde, serde_json, thiserror, tracing
// ============================================================================

//! ## Overview
//! `easel-core` holds everything the persistence engine needs to know about
//! a board document without depending on a storage backend: the closed set
//! of item kinds and their payload documents, the live [`Board`] with its
//! deferred-insert queue, the [`Document`]/[`ProgressSink`]/[`PixmapDecoder`]
//! collaborator traits, and the background IO task runtime.
//!
//! Rendering, undo/redo, and image codecs live outside this crate; payload
//! interpretation is owned by the item kinds, not by any store.

pub mod core;
pub mod interfaces;
pub mod runtime;

pub use crate::core::board::Board;
pub use crate::core::items::BoardItem;
pub use crate::core::items::ErrorPayload;
pub use crate::core::items::IMG_LOADING_ERROR_MSG;
pub use crate::core::items::ItemKind;
pub use crate::core::items::ItemSnapshot;
pub use crate::core::items::PixmapPayload;
pub use crate::core::items::TextPayload;
pub use crate::core::items::Transform;
pub use crate::interfaces::Document;
pub use crate::interfaces::FileIoError;
pub use crate::interfaces::PixmapDecoder;
pub use crate::interfaces::ProgressSink;
pub use crate::runtime::worker::ChannelProgress;
pub use crate::runtime::worker::IoEvent;
pub use crate::runtime::worker::IoTaskHandle;
pub use crate::runtime::worker::spawn_io_task;
