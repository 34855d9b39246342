// crates/easel-core/src/core/board.rs
// ============================================================================
// Module: Easel Board
// Description: The live in-memory document holding board items.
// Purpose: Provide saveable enumeration and the deferred-insert queue.
// Dependencies: crate::core::items, crate::interfaces
// ============================================================================

//! ## Overview
//! A [`Board`] owns the live items of one document. The persistence engine
//! talks to it through the [`Document`] trait: deterministic enumeration of
//! saveable items for writes, the set of original identities protected by
//! error placeholders, and a deferred-insert queue that lets a background
//! read hand reconstructed items over without touching the live item list.
//! The host drains the queue on its own thread via [`Board::take_queued`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::core::items::BoardItem;
use crate::interfaces::Document;

// ============================================================================
// SECTION: Board
// ============================================================================

/// The live in-memory document.
///
/// # Invariants
/// - Items keep their insertion order; saves enumerate them in that order.
/// - Queued items are invisible to saves until drained.
#[derive(Debug, Default)]
pub struct Board {
    /// Live items in insertion order.
    items: Vec<BoardItem>,
    /// Items reconstructed off-thread, awaiting insertion by the host.
    queued: Mutex<VecDeque<BoardItem>>,
}

impl Board {
    /// Creates an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an item to the live document.
    pub fn add_item(&mut self, item: BoardItem) {
        self.items.push(item);
    }

    /// Returns the live items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[BoardItem] {
        &self.items
    }

    /// Returns mutable access to the live items.
    pub fn items_mut(&mut self) -> &mut Vec<BoardItem> {
        &mut self.items
    }

    /// Drains and returns all items queued by a background read.
    pub fn take_queued(&self) -> Vec<BoardItem> {
        match self.queued.lock() {
            Ok(mut queued) => queued.drain(..).collect(),
            Err(poisoned) => poisoned.into_inner().drain(..).collect(),
        }
    }
}

impl Document for Board {
    fn saveable_items_mut(&mut self) -> Vec<&mut BoardItem> {
        self.items.iter_mut().filter(|item| item.is_saveable()).collect()
    }

    fn protected_original_ids(&self) -> BTreeSet<i64> {
        self.items.iter().filter_map(BoardItem::protected_original_id).collect()
    }

    fn clear_save_ids(&mut self) {
        for item in &mut self.items {
            item.save_id = None;
        }
    }

    fn queue_reconstructed(&self, item: BoardItem) {
        match self.queued.lock() {
            Ok(mut queued) => queued.push_back(item),
            Err(poisoned) => poisoned.into_inner().push_back(item),
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
