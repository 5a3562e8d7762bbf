//! Usage extraction: which packages does a workspace actually import?
//!
//! The [`UsageExtractor`] trait is the seam between the orchestration in
//! [`crate::check`] and the source analysis. [`SourceExtractor`] is the
//! tree-sitter backed implementation; it parses every entry file, follows
//! relative imports to other files of the same package, and records the
//! external packages reached.

use std::collections::{BTreeSet, HashSet, VecDeque};
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::imports::{AnalysisError, ImportAnalyzer, SourceLanguage};
use crate::graph::ModuleGraph;
use crate::parser::{parse_file, ManifestError, PackageJson};

/// Extensions tried, in order, when resolving an extensionless relative import.
const RESOLVE_EXTENSIONS: &[&str] = &["js", "jsx", "mjs", "cjs", "ts", "tsx", "mts", "cts"];

/// Options forwarded to the extractor and the reconciler.
///
/// Deserialized from the JSON configuration object given on the command
/// line; unknown fields are ignored.
///
/// ```
/// use checkdeps::analysis::ExtractorOptions;
///
/// let opts: ExtractorOptions = serde_json::from_str(r#"{"excludeDev": false}"#).unwrap();
/// assert!(!opts.exclude_dev);
/// assert!(ExtractorOptions::default().exclude_dev);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractorOptions {
    /// Do not count devDependencies as declared.
    pub exclude_dev: bool,
    /// Do not count peerDependencies as declared.
    pub exclude_peer: bool,
    /// Module names never reported, in any workspace.
    pub ignore: Vec<String>,
}

impl Default for ExtractorOptions {
    fn default() -> Self {
        Self {
            exclude_dev: true,
            exclude_peer: false,
            ignore: Vec::new(),
        }
    }
}

/// Errors raised while extracting usage for one workspace.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// What a workspace declares and what its code uses.
#[derive(Debug, Clone)]
pub struct UsageReport {
    /// The parsed workspace manifest.
    pub package: PackageJson,
    /// Package names imported by the entry files, directly or through
    /// relative imports.
    pub used: BTreeSet<String>,
    /// The import graph the usage was computed from.
    pub graph: ModuleGraph,
}

/// Computes the set of packages used by a list of entry files.
pub trait UsageExtractor {
    /// `entries` are relative to the directory holding `manifest_path`.
    fn extract(
        &mut self,
        manifest_path: &Path,
        entries: &[PathBuf],
        options: &ExtractorOptions,
    ) -> Result<UsageReport, ExtractionError>;
}

/// tree-sitter based [`UsageExtractor`].
pub struct SourceExtractor {
    analyzer: ImportAnalyzer,
}

impl SourceExtractor {
    pub fn new() -> Result<Self, AnalysisError> {
        Ok(Self {
            analyzer: ImportAnalyzer::new()?,
        })
    }
}

impl UsageExtractor for SourceExtractor {
    fn extract(
        &mut self,
        manifest_path: &Path,
        entries: &[PathBuf],
        options: &ExtractorOptions,
    ) -> Result<UsageReport, ExtractionError> {
        let package = parse_file(manifest_path)?;
        let root = manifest_path.parent().unwrap_or_else(|| Path::new("."));

        let mut graph = ModuleGraph::new();
        let mut seen: HashSet<PathBuf> = entries.iter().cloned().collect();
        let mut queue: VecDeque<PathBuf> = entries.iter().cloned().collect();

        while let Some(file) = queue.pop_front() {
            graph.add_file(&file);
            let imports = self.analyzer.analyze_file(&root.join(&file))?;

            for import in imports {
                if import.is_relative() {
                    let Some(target) = resolve_relative(root, &file, &import.source) else {
                        tracing::trace!(file = %file.display(), specifier = %import.source, "unresolved relative import");
                        continue;
                    };
                    graph.add_file_import(&file, &target);
                    if seen.insert(target.clone()) {
                        queue.push_back(target);
                    }
                } else if let Some(name) = import.package_name() {
                    if !options.ignore.iter().any(|i| i == name) {
                        graph.add_package_import(&file, name);
                    }
                }
            }
        }

        let used = graph.reachable_packages(entries.iter().map(PathBuf::as_path));
        tracing::debug!(
            manifest = %manifest_path.display(),
            files = graph.file_count(),
            packages = used.len(),
            "extracted usage"
        );

        Ok(UsageReport {
            package,
            used,
            graph,
        })
    }
}

/// Resolves `specifier`, imported from `from` (relative to `root`), to a
/// parseable source file inside `root`. Returns the path relative to `root`.
fn resolve_relative(root: &Path, from: &Path, specifier: &str) -> Option<PathBuf> {
    if specifier.starts_with('/') {
        return None;
    }
    let base = normalize(&from.parent().unwrap_or_else(|| Path::new("")).join(specifier))?;

    if is_source(root, &base) {
        return Some(base);
    }
    RESOLVE_EXTENSIONS
        .iter()
        .map(|ext| with_appended_extension(&base, ext))
        .chain(RESOLVE_EXTENSIONS.iter().map(|ext| base.join(format!("index.{ext}"))))
        .find(|candidate| is_source(root, candidate))
}

fn is_source(root: &Path, rel: &Path) -> bool {
    SourceLanguage::from_path(rel).is_some() && root.join(rel).is_file()
}

fn with_appended_extension(path: &Path, ext: &str) -> PathBuf {
    let mut s = OsString::from(path.as_os_str());
    s.push(".");
    s.push(ext);
    PathBuf::from(s)
}

/// Lexically normalizes a relative path. Returns `None` when the path
/// climbs out of its root.
fn normalize(path: &Path) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    return None;
                }
            }
            Component::Normal(part) => out.push(part),
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(out)
}
