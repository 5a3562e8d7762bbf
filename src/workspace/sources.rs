//! Source file enumeration for a single workspace.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern, PatternError};
use walkdir::{DirEntry, WalkDir};

use crate::analysis::SourceLanguage;
use crate::parser::MANIFEST_FILE;

/// Extensions enumerated when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["js", "jsx"];

/// Invalid source enumeration settings.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Unsupported source extension `{0}` (expected one of js, jsx, mjs, cjs, ts, tsx, mts, cts)")]
    UnsupportedExtension(String),

    #[error("Invalid extension pattern: {0}")]
    Pattern(#[from] PatternError),
}

/// Settings for [`enumerate_sources`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOptions {
    /// File extensions (without the dot) that count as source files.
    pub extensions: Vec<String>,
    /// Leave out every path starting with `example`.
    pub exclude_examples: bool,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            exclude_examples: false,
        }
    }
}

impl SourceOptions {
    /// One `*.ext` glob per configured extension.
    ///
    /// Every extension must be one the import analyzer can parse.
    pub fn patterns(&self) -> Result<Vec<Pattern>, SourceError> {
        self.extensions
            .iter()
            .map(|ext| {
                let ext = ext.trim_start_matches('.');
                if SourceLanguage::from_extension(ext).is_none() {
                    return Err(SourceError::UnsupportedExtension(ext.to_string()));
                }
                Ok(Pattern::new(&format!("*.{}", ext))?)
            })
            .collect()
    }
}

/// Lists the source files owned by the package rooted at `root`.
///
/// Files of nested packages (directories with their own package.json),
/// `node_modules` and hidden entries are left out. Symbolic links are
/// followed; a link cycle is logged and skipped. Returned paths are
/// relative to `root` and sorted.
pub fn enumerate_sources(root: &Path, options: &SourceOptions) -> Result<Vec<PathBuf>, SourceError> {
    let patterns = options.patterns()?;
    let match_options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_excluded(e, options));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(root = %root.display(), error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if !patterns.iter().any(|p| p.matches_with(&name, match_options)) {
            continue;
        }

        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        debug_assert!(
            !rel.is_absolute() && !rel.to_string_lossy().starts_with('.'),
            "source path must be relative: {}",
            rel.display()
        );
        files.push(rel.to_path_buf());
    }

    Ok(files)
}

/// Entries below the package root that are not part of the package.
fn is_excluded(entry: &DirEntry, options: &SourceOptions) -> bool {
    let name = entry.file_name().to_string_lossy();

    if name.starts_with('.') {
        return true;
    }
    if options.exclude_examples && entry.depth() == 1 && name.starts_with("example") {
        return true;
    }
    if entry.file_type().is_dir() {
        return name == "node_modules" || entry.path().join(MANIFEST_FILE).is_file();
    }
    false
}
