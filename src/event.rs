//! Progress events emitted while a directory is organized.
//!
//! The organizer reports through an [`EventSink`] and does not care where the
//! events end up: a closure, a `Vec` for inspection, or a channel feeding
//! another thread.

use crate::file_category::Category;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::mpsc::Sender;

/// A single progress notification.
///
/// The `Display` implementation renders the human-readable progress line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum OrganizeEvent {
    /// The run has begun on `directory`.
    Started { directory: PathBuf },
    /// A file was moved into its category folder.
    Moved { file_name: String, category: Category },
    /// The destination name is taken by something that cannot be replaced.
    AlreadyExists { file_name: String },
    /// Moving the file failed for another reason.
    Failed { file_name: String, reason: String },
    /// Dry run only: where the file would have gone.
    Planned { file_name: String, category: Category },
}

impl OrganizeEvent {
    /// Returns true for the per-file failure events.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            OrganizeEvent::AlreadyExists { .. } | OrganizeEvent::Failed { .. }
        )
    }

    /// Name of the file the event is about, if any.
    pub fn file_name(&self) -> Option<&str> {
        match self {
            OrganizeEvent::Started { .. } => None,
            OrganizeEvent::Moved { file_name, .. }
            | OrganizeEvent::AlreadyExists { file_name }
            | OrganizeEvent::Failed { file_name, .. }
            | OrganizeEvent::Planned { file_name, .. } => Some(file_name),
        }
    }
}

impl fmt::Display for OrganizeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrganizeEvent::Started { directory } => {
                write!(f, "Starting organization in: {}", directory.display())
            }
            OrganizeEvent::Moved {
                file_name,
                category,
            } => write!(f, "MOVED: {} -> {}", file_name, category),
            OrganizeEvent::AlreadyExists { file_name } => write!(
                f,
                "ERROR: Cannot move {}. Target file already exists.",
                file_name
            ),
            OrganizeEvent::Failed { file_name, reason } => {
                write!(f, "ERROR: Failed to move {}. Reason: {}", file_name, reason)
            }
            OrganizeEvent::Planned {
                file_name,
                category,
            } => write!(f, "PLAN: {} -> {}", file_name, category),
        }
    }
}

/// Receiver of progress events, called once per event in order.
pub trait EventSink {
    fn on_event(&mut self, event: OrganizeEvent);
}

impl<F> EventSink for F
where
    F: FnMut(OrganizeEvent),
{
    fn on_event(&mut self, event: OrganizeEvent) {
        self(event)
    }
}

impl EventSink for Vec<OrganizeEvent> {
    fn on_event(&mut self, event: OrganizeEvent) {
        self.push(event);
    }
}

/// Forwards events to another thread. Events sent after the receiver hung up
/// are dropped; the run itself carries on.
impl EventSink for Sender<OrganizeEvent> {
    fn on_event(&mut self, event: OrganizeEvent) {
        if self.send(event).is_err() {
            tracing::trace!("event receiver disconnected");
        }
    }
}
