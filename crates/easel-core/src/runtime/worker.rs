// crates/easel-core/src/runtime/worker.rs
// ============================================================================
// Module: Easel IO Worker
// Description: Dedicated-thread task runtime with channelled progress events.
// Purpose: Run read/write operations off the host's control thread.
// Dependencies: crate::interfaces, tracing
// ============================================================================

//! ## Overview
//! An IO task is an explicit closure submitted to a named thread. It reports
//! through a [`ChannelProgress`] sink that forwards [`IoEvent`]s over an
//! `mpsc` channel, and it observes cancellation through a shared atomic flag
//! polled between units of work. This replaces ambient callback objects with
//! a message channel and makes cancellation a plain flag rather than a
//! cooperative exception.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::mpsc;
use std::thread;
use std::thread::JoinHandle;

use tracing::debug;

use crate::interfaces::FileIoError;
use crate::interfaces::ProgressSink;

// ============================================================================
// SECTION: Events
// ============================================================================

/// Progress events emitted by a background IO task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IoEvent {
    /// The operation determined its total number of units of work.
    BeginProcessing(usize),
    /// The unit at `index` completed.
    Progress(usize),
    /// The operation ended; non-empty `errors` signals a fatal failure.
    Finished {
        /// Container path the operation targeted (empty on cancellation).
        filename: String,
        /// Fatal failure descriptions, empty on success.
        errors: Vec<String>,
    },
}

// ============================================================================
// SECTION: Channel Progress Sink
// ============================================================================

/// [`ProgressSink`] that forwards events over an `mpsc` channel.
///
/// # Invariants
/// - Send failures are ignored; a departed receiver must not abort the task.
#[derive(Debug, Clone)]
pub struct ChannelProgress {
    /// Event channel into the host.
    events: mpsc::Sender<IoEvent>,
    /// Shared cancellation flag set by the host.
    cancel: Arc<AtomicBool>,
}

impl ProgressSink for ChannelProgress {
    fn begin_processing(&self, total: usize) {
        let _ = self.events.send(IoEvent::BeginProcessing(total));
    }

    fn progress(&self, index: usize) {
        let _ = self.events.send(IoEvent::Progress(index));
    }

    fn finished(&self, filename: &str, errors: &[String]) {
        let _ = self.events.send(IoEvent::Finished {
            filename: filename.to_string(),
            errors: errors.to_vec(),
        });
    }

    fn canceled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }
}

// ============================================================================
// SECTION: Task Handle
// ============================================================================

/// Handle to a spawned IO task: event receiver, cancel flag, join handle.
#[derive(Debug)]
pub struct IoTaskHandle {
    /// Receiving end of the task's event channel.
    events: mpsc::Receiver<IoEvent>,
    /// Shared cancellation flag read by the task between units.
    cancel: Arc<AtomicBool>,
    /// Join handle for the task thread.
    join: Option<JoinHandle<()>>,
}

impl IoTaskHandle {
    /// Returns the receiving end of the task's event channel.
    #[must_use]
    pub const fn events(&self) -> &mpsc::Receiver<IoEvent> {
        &self.events
    }

    /// Requests cooperative cancellation of the task.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Waits for the task thread to finish.
    pub fn join(mut self) {
        if let Some(join) = self.join.take()
            && join.join().is_err()
        {
            debug!("io task thread panicked");
        }
    }
}

// ============================================================================
// SECTION: Spawn
// ============================================================================

/// Spawns a named IO task on a dedicated thread.
///
/// The task receives a [`ChannelProgress`] sink wired to the returned
/// handle's event channel and cancellation flag.
///
/// # Errors
///
/// Returns [`FileIoError`] when the task thread cannot be spawned.
pub fn spawn_io_task<F>(name: &str, task: F) -> Result<IoTaskHandle, FileIoError>
where
    F: FnOnce(ChannelProgress) + Send + 'static,
{
    let (events_tx, events_rx) = mpsc::channel();
    let cancel = Arc::new(AtomicBool::new(false));
    let sink = ChannelProgress {
        events: events_tx,
        cancel: Arc::clone(&cancel),
    };
    debug!(name, "spawning io task");
    let join = thread::Builder::new().name(name.to_string()).spawn(move || task(sink)).map_err(
        |err| FileIoError {
            message: format!("failed to spawn io task thread: {err}"),
            filename: String::new(),
        },
    )?;
    Ok(IoTaskHandle {
        events: events_rx,
        cancel,
        join: Some(join),
    })
}
