// crates/easel-core/src/runtime/mod.rs
// ============================================================================
// Module: Easel Runtime
// Description: Background task plumbing for long-running IO operations.
// Purpose: Group the worker runtime modules.
// Dependencies: crate::interfaces
// ============================================================================

//! ## Overview
//! Read and write operations are long-running and must not block the host's
//! control thread; [`worker`] provides the dedicated-thread task runtime and
//! the channel-backed progress sink they report through.

pub mod worker;
