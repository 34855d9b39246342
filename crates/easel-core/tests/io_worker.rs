// crates/easel-core/tests/io_worker.rs
// ============================================================================
// Module: IO Worker Unit Tests
// Description: Tests for the dedicated-thread IO task runtime.
// Purpose: Validate event ordering, cancellation delivery, and join behavior.
// ============================================================================

//! ## Overview
//! Unit-level tests for the background IO runtime:
//! - Events arrive over the channel in emission order
//! - The cancellation flag set on the handle is visible to the task
//! - Finished events carry failure descriptions when the task reports them

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use easel_core::IoEvent;
use easel_core::ProgressSink;
use easel_core::spawn_io_task;

// ============================================================================
// SECTION: Event Ordering
// ============================================================================

#[test]
fn io_task_forwards_events_in_emission_order() {
    let handle = spawn_io_task("io-order", |sink| {
        sink.begin_processing(2);
        sink.progress(0);
        sink.progress(1);
        sink.finished("board.easel", &[]);
    })
    .unwrap();

    let events: Vec<IoEvent> = handle.events().iter().collect();
    assert_eq!(
        events,
        vec![
            IoEvent::BeginProcessing(2),
            IoEvent::Progress(0),
            IoEvent::Progress(1),
            IoEvent::Finished {
                filename: "board.easel".to_string(),
                errors: Vec::new(),
            },
        ]
    );
    handle.join();
}

#[test]
fn finished_event_carries_failure_descriptions() {
    let handle = spawn_io_task("io-failure", |sink| {
        sink.finished("board.easel", &["container db error: disk full".to_string()]);
    })
    .unwrap();

    let events: Vec<IoEvent> = handle.events().iter().collect();
    let IoEvent::Finished {
        errors, ..
    } = &events[0]
    else {
        panic!("expected a finished event");
    };
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("disk full"));
    handle.join();
}

// ============================================================================
// SECTION: Cancellation
// ============================================================================

#[test]
fn cancellation_flag_reaches_the_task() {
    let (started_tx, started_rx) = mpsc::channel();
    let handle = spawn_io_task("io-cancel", move |sink| {
        started_tx.send(()).unwrap();
        while !sink.canceled() {
            thread::sleep(Duration::from_millis(1));
        }
        sink.finished("", &[]);
    })
    .unwrap();

    started_rx.recv().unwrap();
    handle.cancel();
    let events: Vec<IoEvent> = handle.events().iter().collect();
    assert_eq!(
        events,
        vec![IoEvent::Finished {
            filename: String::new(),
            errors: Vec::new(),
        }]
    );
    handle.join();
}
