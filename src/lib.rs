//! sortdir - sort the files of a directory into category folders
//!
//! This library classifies files by extension, moves the regular files of a
//! single directory into per-category subfolders, and reports progress as a
//! stream of events. The command line front end lives in [`cli`].

pub mod cli;
pub mod config;
pub mod event;
pub mod file_category;
pub mod file_organizer;
pub mod output;
pub mod worker;

pub use config::{CompiledFilters, ConfigError, FilterConfig};
pub use event::{EventSink, OrganizeEvent};
pub use file_category::{Category, CategoryMap};
pub use file_organizer::{OrganizeError, Organizer, Summary, organize};
pub use worker::{OrganizeHandle, spawn_organize};

pub use cli::{Args, run_cli};
