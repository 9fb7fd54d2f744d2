//! Moves the files of a directory into category subdirectories.
//!
//! A run lists the regular files directly inside the target directory,
//! snapshots that list, then classifies and moves each file in turn. A file
//! that cannot be moved is reported and skipped; only failing to list the
//! directory aborts the run.
use crate::config::{CompiledFilters, ConfigError};
use crate::event::{EventSink, OrganizeEvent};
use crate::file_category::{Category, CategoryMap};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that abort a whole organization run.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The target directory could not be opened for listing.
    #[error("Cannot list directory {}: {source}", .path.display())]
    ListDirectory { path: PathBuf, source: io::Error },
    /// Reading the directory failed part way through the listing.
    #[error("Failed to read entries of {}: {source}", .path.display())]
    ReadEntry { path: PathBuf, source: io::Error },
    /// Filter rules did not compile.
    #[error(transparent)]
    InvalidFilter(#[from] ConfigError),
    /// The background thread running the organizer panicked.
    #[error("organizer thread panicked before finishing")]
    WorkerPanicked,
}

/// Result type for organization runs.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Why a single file could not be moved.
#[derive(Debug, Error)]
pub enum MoveError {
    /// Something that cannot be replaced already sits at the destination.
    #[error("Target file already exists.")]
    DestinationExists,
    /// The category folder could not be created.
    #[error("Cannot create folder {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },
    /// Any other I/O failure during the move.
    #[error("{0}")]
    Io(#[from] io::Error),
}

/// What happened to one file of the snapshot.
#[derive(Debug)]
pub enum MoveOutcome {
    /// The file now lives in its category folder.
    Moved,
    /// The destination name was occupied and could not be replaced.
    SkippedAlreadyExists,
    /// The move failed; the file stays where it was.
    FailedIo(MoveError),
}

/// Number of files moved into each category during one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Summary {
    counts: BTreeMap<Category, usize>,
}

impl Summary {
    /// Counts one more file for `category`.
    pub fn record(&mut self, category: Category) {
        *self.counts.entry(category).or_insert(0) += 1;
    }

    /// Files moved into `category`, zero when none were.
    pub fn get(&self, category: Category) -> usize {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    /// Total number of files moved.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Number of categories that received at least one file.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Categories and their counts, in category order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, usize)> + '_ {
        self.counts.iter().map(|(category, count)| (*category, *count))
    }
}

impl FromIterator<(Category, usize)> for Summary {
    fn from_iter<I: IntoIterator<Item = (Category, usize)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().filter(|(_, n)| *n > 0).collect(),
        }
    }
}

/// Sorts the files of one directory into category folders.
#[derive(Debug, Clone, Default)]
pub struct Organizer {
    categories: CategoryMap,
    filters: CompiledFilters,
    dry_run: bool,
}

impl Organizer {
    /// An organizer with the standard category table and no filters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Leaves out files rejected by `filters` when scanning.
    pub fn with_filters(mut self, filters: CompiledFilters) -> Self {
        self.filters = filters;
        self
    }

    /// In dry-run mode nothing on disk changes; files are reported as
    /// [`OrganizeEvent::Planned`] and counted as if moved.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Organizes `target_dir`, reporting progress to `sink`.
    ///
    /// Emits one `Started` event, then exactly one event per scanned file.
    /// Files are handled in directory listing order, which depends on the
    /// platform and filesystem and is not sorted.
    ///
    /// # Errors
    ///
    /// Fails only when the directory cannot be listed. Per-file failures are
    /// reported through `sink` and left out of the returned [`Summary`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sortdir::event::OrganizeEvent;
    /// use sortdir::file_organizer::Organizer;
    /// use std::path::Path;
    ///
    /// let summary = Organizer::new()
    ///     .organize(Path::new("/home/me/Downloads"), &mut |event: OrganizeEvent| println!("{event}"))
    ///     .expect("directory should be listable");
    /// println!("{} files moved", summary.total());
    /// ```
    pub fn organize<S>(&self, target_dir: &Path, sink: &mut S) -> OrganizeResult<Summary>
    where
        S: EventSink + ?Sized,
    {
        sink.on_event(OrganizeEvent::Started {
            directory: target_dir.to_path_buf(),
        });
        info!(directory = %target_dir.display(), dry_run = self.dry_run, "organizing");

        let files = self.scan(target_dir).inspect_err(|e| {
            tracing::error!(error = %e, "listing failed");
        })?;
        debug!(count = files.len(), "snapshot taken");

        let mut summary = Summary::default();
        let mut failures = 0usize;

        for file in &files {
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let category = self.categories.classify(&file_name);
            debug!(file = %file_name, %category, "classified");

            if self.dry_run {
                sink.on_event(OrganizeEvent::Planned {
                    file_name,
                    category,
                });
                summary.record(category);
                continue;
            }

            match Self::process_file(target_dir, file, category) {
                MoveOutcome::Moved => {
                    summary.record(category);
                    sink.on_event(OrganizeEvent::Moved {
                        file_name,
                        category,
                    });
                }
                MoveOutcome::SkippedAlreadyExists => {
                    failures += 1;
                    warn!(file = %file_name, %category, "destination already exists");
                    sink.on_event(OrganizeEvent::AlreadyExists { file_name });
                }
                MoveOutcome::FailedIo(e) => {
                    failures += 1;
                    warn!(file = %file_name, %category, error = %e, "move failed");
                    sink.on_event(OrganizeEvent::Failed {
                        file_name,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            scanned = files.len(),
            moved = summary.total(),
            failed = failures,
            "organization finished"
        );
        Ok(summary)
    }

    /// Lists the regular files directly inside `target_dir`.
    ///
    /// Symlinks are not followed and are left out, as are directories and
    /// special files. Entries rejected by the filters are dropped here.
    pub fn scan(&self, target_dir: &Path) -> OrganizeResult<Vec<PathBuf>> {
        let entries = fs::read_dir(target_dir).map_err(|source| OrganizeError::ListDirectory {
            path: target_dir.to_path_buf(),
            source,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| OrganizeError::ReadEntry {
                path: target_dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();

            match entry.file_type() {
                Ok(file_type) if file_type.is_file() => {}
                Ok(_) => continue,
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "cannot stat entry, skipping");
                    continue;
                }
            }

            if !self.filters.should_include(&path) {
                debug!(path = %path.display(), "excluded by filters");
                continue;
            }
            files.push(path);
        }
        Ok(files)
    }

    fn process_file(target_dir: &Path, file: &Path, category: Category) -> MoveOutcome {
        match Self::move_to_category(target_dir, file, category) {
            Ok(_) => MoveOutcome::Moved,
            Err(MoveError::DestinationExists) => MoveOutcome::SkippedAlreadyExists,
            Err(e) => MoveOutcome::FailedIo(e),
        }
    }

    /// Moves a file into its category directory within `base_path`.
    ///
    /// The category directory is created when missing. A regular file with
    /// the same name at the destination is replaced. Returns the new path of
    /// the file.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sortdir::file_category::Category;
    /// use sortdir::file_organizer::Organizer;
    /// use std::path::Path;
    ///
    /// let moved = Organizer::move_to_category(
    ///     Path::new("/path/to/base"),
    ///     Path::new("/path/to/base/image.png"),
    ///     Category::Images,
    /// );
    /// assert!(moved.is_ok());
    /// ```
    pub fn move_to_category(
        base_path: &Path,
        file_path: &Path,
        category: Category,
    ) -> Result<PathBuf, MoveError> {
        let category_path = base_path.join(category.dir_name());
        fs::create_dir_all(&category_path).map_err(|source| MoveError::CreateDir {
            path: category_path.clone(),
            source,
        })?;

        let file_name = file_path.file_name().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "file has no name component")
        })?;
        let destination = category_path.join(file_name);

        // Only plain files may be overwritten.
        if fs::symlink_metadata(&destination).is_ok_and(|meta| meta.is_dir()) {
            return Err(MoveError::DestinationExists);
        }

        match fs::rename(file_path, &destination) {
            Ok(()) => Ok(destination),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(MoveError::DestinationExists),
            Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
                debug!(file = %file_path.display(), "rename crosses devices, copying instead");
                fs::copy(file_path, &destination)?;
                fs::remove_file(file_path)?;
                Ok(destination)
            }
            Err(e) => Err(MoveError::Io(e)),
        }
    }
}

/// Organizes `target_dir` with the standard category table.
///
/// Shorthand for `Organizer::new().organize(target_dir, sink)`.
pub fn organize<S>(target_dir: &Path, sink: &mut S) -> OrganizeResult<Summary>
where
    S: EventSink + ?Sized,
{
    Organizer::new().organize(target_dir, sink)
}
