use clap::Parser;
use sortdir::cli::{Args, run_cli};
use sortdir::event::OrganizeEvent;
use sortdir::file_category::Category;
use sortdir::file_organizer::{OrganizeError, Organizer, Summary, organize};
use sortdir::worker::spawn_organize;
/// Integration tests for sortdir
///
/// These tests run the organizer against real temporary directories.
///
/// Test categories:
/// 1. Basic organization workflows
/// 2. Summary and event invariants
/// 3. Conflicts and per-file failures
/// 4. Dry-run and filters
/// 5. Command-line runs
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// A temporary directory with helpers to populate and inspect it.
struct TestFixture {
    temp_dir: TempDir,
}

impl TestFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        TestFixture { temp_dir }
    }

    fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    fn create_text_file(&self, name: &str, content: &str) {
        let file_path = self.path().join(name);
        let mut file = File::create(&file_path).expect("Failed to create file");
        file.write_all(content.as_bytes())
            .expect("Failed to write file content");
    }

    fn create_files(&self, names: &[&str]) {
        for name in names {
            self.create_text_file(name, name);
        }
    }

    fn create_subdir(&self, name: &str) {
        fs::create_dir_all(self.path().join(name)).expect("Failed to create subdirectory");
    }

    fn assert_file_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(path.is_file(), "File should exist: {}", path.display());
    }

    fn assert_file_not_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(!path.exists(), "File should not exist: {}", path.display());
    }

    /// Count regular files directly inside the directory.
    fn count_files(&self) -> usize {
        fs::read_dir(self.path())
            .expect("Failed to read directory")
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .count()
    }

    fn count_dirs(&self) -> usize {
        fs::read_dir(self.path())
            .expect("Failed to read directory")
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .count()
    }

    /// Organize with the default organizer, collecting events.
    fn organize(&self) -> (Result<Summary, OrganizeError>, Vec<OrganizeEvent>) {
        let mut events: Vec<OrganizeEvent> = Vec::new();
        let result = organize(self.path(), &mut events);
        (result, events)
    }
}

fn moved_count(events: &[OrganizeEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, OrganizeEvent::Moved { .. }))
        .count()
}

fn cli_args(dir: &Path, extra: &[&str]) -> Args {
    let mut argv = vec!["sortdir".to_string(), dir.display().to_string()];
    argv.extend(extra.iter().map(|s| s.to_string()));
    Args::try_parse_from(argv).expect("arguments should parse")
}

// ============================================================================
// Test Suite 1: Basic Organization
// ============================================================================

#[test]
fn test_organize_empty_directory() {
    let fixture = TestFixture::new();

    let (result, events) = fixture.organize();

    let summary = result.expect("empty directory should organize");
    assert!(summary.is_empty());
    assert_eq!(events.len(), 1);
    assert_eq!(fixture.count_dirs(), 0, "No folders for an empty run");
}

#[test]
fn test_organize_mixed_scenario() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.jpg", "b.txt", "c.xyz", "noext"]);

    let (result, _) = fixture.organize();
    let summary = result.unwrap();

    fixture.assert_file_exists("Images/a.jpg");
    fixture.assert_file_exists("Documents/b.txt");
    fixture.assert_file_exists("Others/c.xyz");
    fixture.assert_file_exists("Others/noext");
    assert_eq!(fixture.count_files(), 0);

    let expected: Summary = [
        (Category::Images, 1),
        (Category::Documents, 1),
        (Category::Others, 2),
    ]
    .into_iter()
    .collect();
    assert_eq!(summary, expected);
}

#[test]
fn test_organize_case_insensitive_extensions() {
    let fixture = TestFixture::new();
    fixture.create_files(&["PHOTO.JPG", "photo.jpg", "Clip.MoV"]);

    let summary = fixture.organize().0.unwrap();

    assert_eq!(summary.get(Category::Images), 2);
    assert_eq!(summary.get(Category::Videos), 1);
    fixture.assert_file_exists("Images/PHOTO.JPG");
    fixture.assert_file_exists("Videos/Clip.MoV");
}

#[test]
fn test_organize_ill_formed_names_go_to_others() {
    let fixture = TestFixture::new();
    fixture.create_files(&[".gitignore", "trailing.", "README"]);

    let summary = fixture.organize().0.unwrap();

    assert_eq!(summary.get(Category::Others), 3);
    fixture.assert_file_exists("Others/.gitignore");
    fixture.assert_file_exists("Others/trailing.");
    fixture.assert_file_exists("Others/README");
}

#[test]
fn test_organize_preserves_content() {
    let fixture = TestFixture::new();
    fixture.create_text_file("letter.docx", "Dear reader");

    fixture.organize().0.unwrap();

    let content = fs::read_to_string(fixture.path().join("Documents/letter.docx")).unwrap();
    assert_eq!(content, "Dear reader");
}

#[test]
fn test_organize_many_files() {
    let fixture = TestFixture::new();
    for i in 0..50 {
        let name = match i % 5 {
            0 => format!("image_{}.png", i),
            1 => format!("doc_{}.pdf", i),
            2 => format!("audio_{}.flac", i),
            3 => format!("archive_{}.zip", i),
            _ => format!("script_{}.py", i),
        };
        fixture.create_text_file(&name, "x");
    }

    let summary = fixture.organize().0.unwrap();

    assert_eq!(fixture.count_files(), 0);
    assert_eq!(summary.total(), 50);
    for category in [
        Category::Images,
        Category::Documents,
        Category::Audio,
        Category::Archives,
        Category::Code,
    ] {
        assert_eq!(summary.get(category), 10, "{} count", category);
    }
}

#[test]
fn test_existing_subdirectories_are_not_moved() {
    let fixture = TestFixture::new();
    fixture.create_subdir("Images");
    fixture.create_subdir("projects.zip");
    fixture.create_text_file("Images/old.png", "old");
    fixture.create_files(&["new.png"]);

    let (result, events) = fixture.organize();
    let summary = result.unwrap();

    assert_eq!(summary.total(), 1);
    assert_eq!(events.len(), 2);
    assert!(fixture.path().join("projects.zip").is_dir());
    fixture.assert_file_exists("Images/old.png");
    fixture.assert_file_exists("Images/new.png");
    fixture.assert_file_not_exists("Archives");
}

#[cfg(unix)]
#[test]
fn test_symlinks_are_not_moved() {
    let fixture = TestFixture::new();
    fixture.create_files(&["real.txt"]);
    std::os::unix::fs::symlink(
        fixture.path().join("real.txt"),
        fixture.path().join("link.txt"),
    )
    .unwrap();

    let summary = fixture.organize().0.unwrap();

    assert_eq!(summary.total(), 1);
    assert!(
        fs::symlink_metadata(fixture.path().join("link.txt"))
            .unwrap()
            .file_type()
            .is_symlink()
    );
    fixture.assert_file_exists("Documents/real.txt");
}

// ============================================================================
// Test Suite 2: Summary and Event Invariants
// ============================================================================

#[test]
fn test_second_run_finds_nothing() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.jpg", "b.txt", "c.mp3"]);

    let first = fixture.organize().0.unwrap();
    let (second, events) = fixture.organize();

    assert_eq!(first.total(), 3);
    assert!(second.unwrap().is_empty());
    assert_eq!(events.len(), 1);
}

#[test]
fn test_summary_total_matches_moved_events() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.jpg", "b.gif", "c.txt", "d", "e.rar", "f.rs"]);
    fixture.create_subdir("Others/d");

    let (result, events) = fixture.organize();
    let summary = result.unwrap();

    let scanned = events.len() - 1;
    let not_moved = events.iter().filter(|e| e.is_error()).count();
    assert_eq!(scanned, 6);
    assert_eq!(summary.total(), moved_count(&events));
    assert_eq!(summary.total(), scanned - not_moved);
    assert_eq!(not_moved, 1);
}

#[test]
fn test_events_start_with_started_and_cover_every_file() {
    let fixture = TestFixture::new();
    fixture.create_files(&["x.png", "y.wav", "z.unknown"]);

    let (_, events) = fixture.organize();

    assert_eq!(
        events[0],
        OrganizeEvent::Started {
            directory: fixture.path().to_path_buf()
        }
    );
    let mut names: Vec<_> = events[1..].iter().filter_map(|e| e.file_name()).collect();
    names.sort();
    assert_eq!(names, vec!["x.png", "y.wav", "z.unknown"]);
    assert!(events.contains(&OrganizeEvent::Moved {
        file_name: "y.wav".to_string(),
        category: Category::Audio,
    }));
}

#[test]
fn test_missing_directory_fails_fatally() {
    let fixture = TestFixture::new();
    let missing = fixture.path().join("does-not-exist");

    let mut events: Vec<OrganizeEvent> = Vec::new();
    let result = organize(&missing, &mut events);

    assert!(matches!(result, Err(OrganizeError::ListDirectory { .. })));
    assert!(events.iter().all(|e| matches!(e, OrganizeEvent::Started { .. })));
    assert!(!missing.exists());
}

#[test]
fn test_target_that_is_a_file_fails_fatally() {
    let fixture = TestFixture::new();
    fixture.create_files(&["plain.txt"]);

    let mut events: Vec<OrganizeEvent> = Vec::new();
    let result = organize(&fixture.path().join("plain.txt"), &mut events);

    assert!(result.is_err());
    fixture.assert_file_exists("plain.txt");
}

// ============================================================================
// Test Suite 3: Conflicts and Per-File Failures
// ============================================================================

#[test]
fn test_overwrite_existing_file_counts_as_moved() {
    let fixture = TestFixture::new();
    fixture.create_subdir("Images");
    fixture.create_text_file("Images/photo.png", "old picture");
    fixture.create_text_file("photo.png", "new picture");

    let (result, events) = fixture.organize();
    let summary = result.unwrap();

    assert_eq!(summary.get(Category::Images), 1);
    assert_eq!(moved_count(&events), 1);
    fixture.assert_file_not_exists("photo.png");
    let content = fs::read_to_string(fixture.path().join("Images/photo.png")).unwrap();
    assert_eq!(content, "new picture");
}

#[test]
fn test_directory_in_the_way_is_reported_and_batch_continues() {
    let fixture = TestFixture::new();
    fixture.create_subdir("Others/notes");
    fixture.create_files(&["notes", "song.mp3"]);

    let (result, events) = fixture.organize();
    let summary = result.unwrap();

    assert!(events.contains(&OrganizeEvent::AlreadyExists {
        file_name: "notes".to_string()
    }));
    assert_eq!(summary.get(Category::Others), 0);
    assert_eq!(summary.get(Category::Audio), 1);
    fixture.assert_file_exists("notes");
    fixture.assert_file_exists("Audio/song.mp3");
}

#[test]
fn test_folder_creation_failure_is_per_file() {
    let fixture = TestFixture::new();
    fixture.create_text_file("Documents", "blocking file");
    fixture.create_files(&["a.txt", "b.jpg"]);

    // Keep the blocking file out of the run so it stays in place.
    let filters = sortdir::FilterConfig {
        skip_hidden: false,
        exclude: sortdir::config::ExcludeRules {
            filenames: vec!["Documents".to_string()],
            ..Default::default()
        },
    }
    .compile()
    .unwrap();
    let mut events: Vec<OrganizeEvent> = Vec::new();
    let summary = Organizer::new()
        .with_filters(filters)
        .organize(fixture.path(), &mut events)
        .unwrap();

    let failure = events
        .iter()
        .find(|e| e.file_name() == Some("a.txt"))
        .unwrap();
    assert!(matches!(failure, OrganizeEvent::Failed { .. }));
    assert!(
        failure
            .to_string()
            .starts_with("ERROR: Failed to move a.txt. Reason: ")
    );
    fixture.assert_file_exists("a.txt");
    fixture.assert_file_exists("Images/b.jpg");
    assert_eq!(summary.get(Category::Documents), 0);
}

// ============================================================================
// Test Suite 4: Dry-Run and Filters
// ============================================================================

#[test]
fn test_dry_run_moves_nothing() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.jpg", "b.txt", "c.xyz"]);

    let mut events: Vec<OrganizeEvent> = Vec::new();
    let summary = Organizer::new()
        .dry_run(true)
        .organize(fixture.path(), &mut events)
        .unwrap();

    assert_eq!(summary.total(), 3);
    assert_eq!(summary.get(Category::Others), 1);
    assert_eq!(fixture.count_files(), 3);
    assert_eq!(fixture.count_dirs(), 0, "Dry-run should not create folders");
    assert!(events.contains(&OrganizeEvent::Planned {
        file_name: "a.jpg".to_string(),
        category: Category::Images,
    }));
}

#[test]
fn test_dry_run_matches_real_run() {
    let fixture = TestFixture::new();
    fixture.create_files(&["one.png", "two.mp4", "three.7z", "four"]);

    let planned = Organizer::new()
        .dry_run(true)
        .organize(fixture.path(), &mut Vec::<OrganizeEvent>::new())
        .unwrap();
    let actual = fixture.organize().0.unwrap();

    assert_eq!(planned, actual);
}

#[test]
fn test_filters_leave_files_in_place() {
    let fixture = TestFixture::new();
    fixture.create_files(&[".hidden", "movie.part", "Thumbs.db", "~$draft.docx", "keep.txt"]);

    let filters = sortdir::FilterConfig {
        skip_hidden: true,
        exclude: sortdir::config::ExcludeRules {
            filenames: vec!["Thumbs.db".to_string()],
            patterns: vec!["*.part".to_string()],
            extensions: vec![],
            regex: vec![r"^~\$".to_string()],
        },
    }
    .compile()
    .unwrap();

    let mut events: Vec<OrganizeEvent> = Vec::new();
    let summary = Organizer::new()
        .with_filters(filters)
        .organize(fixture.path(), &mut events)
        .unwrap();

    assert_eq!(summary.total(), 1);
    assert_eq!(events.len(), 2);
    fixture.assert_file_exists("Documents/keep.txt");
    fixture.assert_file_exists(".hidden");
    fixture.assert_file_exists("movie.part");
    fixture.assert_file_exists("Thumbs.db");
    fixture.assert_file_exists("~$draft.docx");
}

#[test]
fn test_worker_matches_direct_run() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.jpg", "b.txt", "c.xyz", "noext"]);

    let handle = spawn_organize(Organizer::new(), fixture.path().to_path_buf());
    let events: Vec<_> = handle.events().collect();
    let summary = handle.join().unwrap();

    assert_eq!(events.len(), 5);
    assert_eq!(summary.total(), moved_count(&events));
    assert_eq!(summary.get(Category::Others), 2);
}

// ============================================================================
// Test Suite 5: Command-Line Runs
// ============================================================================

#[test]
fn test_cli_run_reports_summary() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.jpg", "b.txt"]);

    let report = run_cli(&cli_args(fixture.path(), &["--quiet"])).unwrap();

    assert_eq!(report.moved, 2);
    assert!(report.failed.is_empty());
    assert!(!report.dry_run);
    assert!(report.finished_at >= report.started_at);
    fixture.assert_file_exists("Images/a.jpg");
}

#[test]
fn test_cli_collects_failures() {
    let fixture = TestFixture::new();
    fixture.create_subdir("Others/blocked");
    fixture.create_files(&["blocked", "ok.txt"]);

    let report = run_cli(&cli_args(fixture.path(), &["--json"])).unwrap();

    assert_eq!(report.moved, 1);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].file_name, "blocked");
    assert_eq!(report.failed[0].reason, "Target file already exists.");
}

#[test]
fn test_cli_dry_run_and_exclude() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.jpg", "skip.tmp"]);

    let report = run_cli(&cli_args(
        fixture.path(),
        &["--dry-run", "--exclude-ext", "tmp", "--quiet"],
    ))
    .unwrap();

    assert!(report.dry_run);
    assert_eq!(report.summary.get(Category::Images), 1);
    assert_eq!(report.summary.get(Category::Others), 0);
    assert_eq!(fixture.count_files(), 2);
}

#[test]
fn test_cli_missing_directory_is_an_error() {
    let fixture = TestFixture::new();

    let result = run_cli(&cli_args(&fixture.path().join("missing"), &["--quiet"]));

    assert!(matches!(result, Err(OrganizeError::ListDirectory { .. })));
}

#[test]
fn test_cli_invalid_regex_is_an_error() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.jpg"]);

    let result = run_cli(&cli_args(fixture.path(), &["--exclude-regex", "(", "--quiet"]));

    assert!(matches!(result, Err(OrganizeError::InvalidFilter(_))));
    fixture.assert_file_exists("a.jpg");
}

#[test]
fn test_report_serializes_to_json() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.jpg", "b.jpg"]);

    let report = run_cli(&cli_args(fixture.path(), &["--json"])).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["summary"]["Images"], 2);
    assert_eq!(json["moved"], 2);
    assert!(json["started_at"].is_string());
    assert_eq!(json["failed"].as_array().map(|a| a.len()), Some(0));
}
