//! Extension-based file categorization.
//!
//! Files are sorted purely by the text after the last `.` of their name. The
//! lookup table is compiled in and never changes after a [`CategoryMap`] is
//! built.
//!
//! # Examples
//!
//! ```
//! use sortdir::file_category::{Category, CategoryMap};
//!
//! let map = CategoryMap::standard();
//! assert_eq!(map.classify("holiday.JPG"), Category::Images);
//! assert_eq!(map.classify("notes.txt"), Category::Documents);
//! assert_eq!(map.classify("Makefile"), Category::Others);
//! ```
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Pseudo-extension given to names without a usable extension.
pub const MISSING_EXTENSION: &str = "misc";

/// A destination folder for organized files.
///
/// The variant name doubles as the folder name created under the target
/// directory. Variants are ordered so summaries print in a stable order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Category {
    /// Raster and vector images (JPG, PNG, GIF, ...)
    Images,
    /// Text, PDF and office documents
    Documents,
    /// Audio files (MP3, WAV, FLAC, ...)
    Audio,
    /// Video files (MP4, MOV, AVI, ...)
    Videos,
    /// Compressed archives (ZIP, RAR, ...)
    Archives,
    /// Source code and markup
    Code,
    /// Everything without a known extension
    Others,
}

impl Category {
    /// Returns the directory name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use sortdir::file_category::Category;
    ///
    /// assert_eq!(Category::Images.dir_name(), "Images");
    /// assert_eq!(Category::Others.dir_name(), "Others");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Images => "Images",
            Category::Documents => "Documents",
            Category::Audio => "Audio",
            Category::Videos => "Videos",
            Category::Archives => "Archives",
            Category::Code => "Code",
            Category::Others => "Others",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Compiled-in extension table. Keys are lowercase and carry no leading dot.
const STANDARD_EXTENSIONS: &[(&str, Category)] = &[
    // Images
    ("jpg", Category::Images),
    ("jpeg", Category::Images),
    ("png", Category::Images),
    ("gif", Category::Images),
    ("bmp", Category::Images),
    ("webp", Category::Images),
    ("svg", Category::Images),
    ("tiff", Category::Images),
    ("heic", Category::Images),
    // Documents
    ("pdf", Category::Documents),
    ("doc", Category::Documents),
    ("docx", Category::Documents),
    ("txt", Category::Documents),
    ("xlsx", Category::Documents),
    ("xls", Category::Documents),
    ("csv", Category::Documents),
    ("odt", Category::Documents),
    ("rtf", Category::Documents),
    ("md", Category::Documents),
    // Audio
    ("mp3", Category::Audio),
    ("wav", Category::Audio),
    ("flac", Category::Audio),
    ("ogg", Category::Audio),
    ("aac", Category::Audio),
    ("m4a", Category::Audio),
    // Videos
    ("mp4", Category::Videos),
    ("mov", Category::Videos),
    ("avi", Category::Videos),
    ("mkv", Category::Videos),
    ("webm", Category::Videos),
    ("wmv", Category::Videos),
    // Archives
    ("zip", Category::Archives),
    ("rar", Category::Archives),
    ("7z", Category::Archives),
    ("tar", Category::Archives),
    ("gz", Category::Archives),
    // Code
    ("java", Category::Code),
    ("py", Category::Code),
    ("html", Category::Code),
    ("htm", Category::Code),
    ("css", Category::Code),
    ("js", Category::Code),
    ("ts", Category::Code),
    ("rs", Category::Code),
    ("c", Category::Code),
    ("cpp", Category::Code),
    ("h", Category::Code),
    ("go", Category::Code),
    ("sh", Category::Code),
];

/// Extracts the lowercase extension of a file name.
///
/// The extension is whatever follows the last `.`, as long as that dot is
/// neither the first nor the last character of the name. Any other name
/// yields [`MISSING_EXTENSION`].
///
/// ```
/// use sortdir::file_category::extension_of;
///
/// assert_eq!(extension_of("Report.PDF"), "pdf");
/// assert_eq!(extension_of("archive.tar.gz"), "gz");
/// assert_eq!(extension_of(".gitignore"), "misc");
/// assert_eq!(extension_of("draft."), "misc");
/// ```
pub fn extension_of(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(dot) if dot > 0 && dot < file_name.len() - 1 => file_name[dot + 1..].to_lowercase(),
        _ => MISSING_EXTENSION.to_string(),
    }
}

/// Immutable lookup from extension to [`Category`].
#[derive(Debug, Clone)]
pub struct CategoryMap {
    extension_map: HashMap<&'static str, Category>,
}

impl CategoryMap {
    /// Builds the map from the compiled-in extension table.
    pub fn standard() -> Self {
        Self {
            extension_map: STANDARD_EXTENSIONS.iter().copied().collect(),
        }
    }

    /// Maps a file extension to a category, ignoring case.
    ///
    /// ```
    /// use sortdir::file_category::{Category, CategoryMap};
    ///
    /// let map = CategoryMap::standard();
    /// assert_eq!(map.extension_to_category("MP3"), Some(Category::Audio));
    /// assert_eq!(map.extension_to_category("xyz"), None);
    /// ```
    pub fn extension_to_category(&self, ext: &str) -> Option<Category> {
        self.extension_map.get(ext.to_lowercase().as_str()).copied()
    }

    /// Determines the category of a file from its name alone.
    ///
    /// Unknown extensions, and names without one, land in
    /// [`Category::Others`].
    pub fn classify(&self, file_name: &str) -> Category {
        self.extension_to_category(&extension_of(file_name))
            .unwrap_or(Category::Others)
    }

    /// Number of extensions the map knows about.
    pub fn len(&self) -> usize {
        self.extension_map.len()
    }

    /// Returns true if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.extension_map.is_empty()
    }
}

impl Default for CategoryMap {
    fn default() -> Self {
        Self::standard()
    }
}
