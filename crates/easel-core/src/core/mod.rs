// crates/easel-core/src/core/mod.rs
// ============================================================================
// Module: Easel Core Model
// Description: Item kinds, transforms, and the live board document.
// Purpose: Group the in-memory document model modules.
// Dependencies: crate::interfaces
// ============================================================================

//! ## Overview
//! The core model: [`items`] defines the closed item-kind enum and its
//! payload documents; [`board`] defines the live document that owns them.

pub mod board;
pub mod items;
