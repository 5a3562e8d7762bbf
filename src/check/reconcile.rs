//! Reconciliation of declared dependencies against used modules.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::analysis::{ExtractorOptions, UsageReport};
use crate::parser::{extract_dependencies, DependencyType, PackageJson, SkipRule};

use super::CheckError;

/// The two kinds of dependency drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingKind {
    /// Declared but never imported.
    Unused,
    /// Imported but not declared.
    Missing,
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FindingKind::Unused => write!(f, "unused"),
            FindingKind::Missing => write!(f, "missing"),
        }
    }
}

/// One violation: every offending module of one kind in one workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub kind: FindingKind,
    #[serde(rename = "manifest")]
    pub manifest_path: PathBuf,
    pub modules: Vec<String>,
}

impl Finding {
    pub fn new(kind: FindingKind, manifest_path: impl Into<PathBuf>, modules: Vec<String>) -> Self {
        Self {
            kind,
            manifest_path: manifest_path.into(),
            modules,
        }
    }

    /// The human-readable line printed for this finding.
    pub fn message(&self) -> String {
        let modules = self.modules.join(", ");
        let path = self.manifest_path.display();
        match self.kind {
            FindingKind::Unused => {
                format!("Fail! Modules in {path} not used in code: {modules}")
            }
            FindingKind::Missing => {
                format!("Fail! Dependencies not listed in {path}: {modules}")
            }
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Names that count as declared for both checks.
///
/// `dependencies` and `optionalDependencies` always count; peer and dev
/// dependencies count unless excluded by the options.
pub fn declared_dependencies(pkg: &PackageJson, options: &ExtractorOptions) -> BTreeSet<String> {
    extract_dependencies(pkg)
        .into_iter()
        .filter(|dep| match dep.dep_type {
            DependencyType::Production | DependencyType::Optional => true,
            DependencyType::Peer => !options.exclude_peer,
            DependencyType::Development => !options.exclude_dev,
        })
        .map(|dep| dep.name)
        .collect()
}

fn is_suppressed(name: &str, skip: &SkipRule, options: &ExtractorOptions) -> bool {
    skip.skips(name) || options.ignore.iter().any(|i| i == name)
}

/// Declared dependencies that no source file uses, in lexical order.
pub fn unused_dependencies(
    declared: &BTreeSet<String>,
    used: &BTreeSet<String>,
    skip: &SkipRule,
    options: &ExtractorOptions,
) -> Vec<String> {
    declared
        .difference(used)
        .filter(|name| !is_suppressed(name, skip, options))
        .cloned()
        .collect()
}

/// Used modules that are not declared, in lexical order.
pub fn missing_dependencies(
    declared: &BTreeSet<String>,
    used: &BTreeSet<String>,
    skip: &SkipRule,
    options: &ExtractorOptions,
) -> Vec<String> {
    used.difference(declared)
        .filter(|name| !is_suppressed(name, skip, options))
        .cloned()
        .collect()
}

/// Returns true if `content` resolves `name` at runtime through
/// `require.resolve("name")` or `require.resolve('name')`.
///
/// This is a plain text search, not a parse: a match inside a comment or
/// string counts too, and any other spelling (spaces, template literals,
/// computed names) is not recognized.
pub fn mentions_dynamic_resolve(content: &str, name: &str) -> bool {
    content.contains(&format!("require.resolve(\"{name}\")"))
        || content.contains(&format!("require.resolve('{name}')"))
}

/// Computes the findings for one workspace.
///
/// `sources` are relative to `workspace_dir`; they are read again (only
/// when some dependency looks unused) for the `require.resolve` scan.
pub fn reconcile_workspace(
    workspace_dir: &Path,
    manifest_path: &Path,
    sources: &[PathBuf],
    usage: &UsageReport,
    skip: &SkipRule,
    options: &ExtractorOptions,
) -> Result<Vec<Finding>, CheckError> {
    let declared = declared_dependencies(&usage.package, options);
    let mut findings = Vec::new();

    let mut extras = unused_dependencies(&declared, &usage.used, skip, options);
    if !extras.is_empty() {
        let resolved = dynamically_resolved(workspace_dir, sources, &extras)?;
        if !resolved.is_empty() {
            tracing::debug!(manifest = %manifest_path.display(), resolved = ?resolved, "suppressed by require.resolve");
        }
        extras.retain(|name| !resolved.contains(name));
    }
    if !extras.is_empty() {
        findings.push(Finding::new(FindingKind::Unused, manifest_path, extras));
    }

    let missing = missing_dependencies(&declared, &usage.used, skip, options);
    if !missing.is_empty() {
        for name in &missing {
            tracing::debug!(module = %name, importers = ?usage.graph.importers_of(name), "missing dependency");
        }
        findings.push(Finding::new(FindingKind::Missing, manifest_path, missing));
    }

    Ok(findings)
}

/// The subset of `candidates` named in a `require.resolve` call by any source.
fn dynamically_resolved(
    dir: &Path,
    sources: &[PathBuf],
    candidates: &[String],
) -> Result<BTreeSet<String>, CheckError> {
    let mut found = BTreeSet::new();
    for file in sources {
        let path = dir.join(file);
        let content = fs::read_to_string(&path)
            .map_err(|source| CheckError::SourceRead {
                workspace: dir.to_path_buf(),
                path,
                source,
            })?;
        found.extend(
            candidates
                .iter()
                .filter(|name| mentions_dynamic_resolve(&content, name))
                .cloned(),
        );
        if found.len() == candidates.len() {
            break;
        }
    }
    Ok(found)
}
