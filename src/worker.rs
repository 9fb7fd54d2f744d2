//! Runs an organization on a background thread.
//!
//! Events travel back over an `mpsc` channel so the caller can render them
//! while the worker keeps moving files. The terminal result comes back
//! through [`OrganizeHandle::join`].

use crate::event::OrganizeEvent;
use crate::file_organizer::{OrganizeError, OrganizeResult, Organizer, Summary};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

/// Handle to an organization running on another thread.
pub struct OrganizeHandle {
    events: Receiver<OrganizeEvent>,
    worker: JoinHandle<OrganizeResult<Summary>>,
}

impl OrganizeHandle {
    /// Blocks on each event in turn until the worker finishes.
    pub fn events(&self) -> impl Iterator<Item = OrganizeEvent> + '_ {
        self.events.iter()
    }

    /// Waits for the worker and returns its result.
    pub fn join(self) -> OrganizeResult<Summary> {
        self.worker.join().unwrap_or_else(|_| {
            tracing::error!("organizer thread panicked");
            Err(OrganizeError::WorkerPanicked)
        })
    }
}

/// Starts `organizer` on `target_dir` in a new thread.
///
/// ```no_run
/// use sortdir::file_organizer::Organizer;
/// use sortdir::worker::spawn_organize;
///
/// let handle = spawn_organize(Organizer::new(), "/home/me/Downloads".into());
/// for event in handle.events() {
///     println!("{event}");
/// }
/// let summary = handle.join().expect("listing failed");
/// println!("moved {} files", summary.total());
/// ```
pub fn spawn_organize(organizer: Organizer, target_dir: PathBuf) -> OrganizeHandle {
    let (tx, rx) = mpsc::channel();

    let worker = thread::spawn(move || {
        let mut sink = tx;
        organizer.organize(&target_dir, &mut sink)
    });

    OrganizeHandle { events: rx, worker }
}
