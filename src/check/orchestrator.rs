//! Walks every workspace of a monorepo and collects findings.

use std::path::Path;

use serde::Serialize;

use crate::analysis::{ExtractorOptions, SourceExtractor, UsageExtractor};
use crate::parser::{load_manifest, load_root_manifest, manifest_path, SkipRule};
use crate::workspace::{enumerate_sources, expand_workspaces, SourceOptions, Workspace};

use super::reconcile::{reconcile_workspace, Finding};
use super::{CheckError, CheckResult};

/// Everything that configures a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOptions {
    /// Forwarded to the usage extractor and the reconciler.
    pub extractor: ExtractorOptions,
    /// Which files of a workspace are entry points.
    pub sources: SourceOptions,
    /// Workspaces (as declared) left out of the run entirely.
    pub exclude_workspaces: Vec<String>,
    /// Whether findings make the run fail.
    pub fail_on_findings: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            extractor: ExtractorOptions::default(),
            sources: SourceOptions::default(),
            exclude_workspaces: Vec::new(),
            fail_on_findings: true,
        }
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    /// Workspaces that went through the reconciler, in declaration order.
    pub checked: Vec<String>,
    /// Workspaces with `checkDeps.skip: true`.
    pub skipped: Vec<String>,
    /// Workspaces filtered out by [`CheckOptions::exclude_workspaces`].
    pub excluded: Vec<String>,
    /// Findings across all checked workspaces.
    pub findings: Vec<Finding>,
    #[serde(skip)]
    pub fail_on_findings: bool,
}

impl CheckReport {
    /// True when no dependency drift was found.
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// True unless findings exist and are configured to fail the run.
    pub fn is_success(&self) -> bool {
        self.is_clean() || !self.fail_on_findings
    }

    /// Process exit code for this report.
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}

/// Checks every workspace of the monorepo rooted at `root` using the
/// tree-sitter [`SourceExtractor`].
///
/// # Example
///
/// ```ignore
/// use std::path::Path;
/// use checkdeps::check::{check_monorepo, CheckOptions};
///
/// let report = check_monorepo(Path::new("."), &CheckOptions::default())?;
/// for finding in &report.findings {
///     eprintln!("{finding}");
/// }
/// ```
pub fn check_monorepo(root: &Path, options: &CheckOptions) -> CheckResult<CheckReport> {
    let mut extractor = SourceExtractor::new()?;
    check_monorepo_with(root, options, &mut extractor)
}

/// Like [`check_monorepo`], with a caller-supplied extractor.
///
/// Workspaces are processed one after the other in declaration order. A
/// broken manifest or a failed extraction aborts the run; findings
/// gathered up to that point are dropped.
pub fn check_monorepo_with<E: UsageExtractor>(
    root: &Path,
    options: &CheckOptions,
    extractor: &mut E,
) -> CheckResult<CheckReport> {
    options.sources.patterns()?;
    let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());

    let root_manifest = load_root_manifest(&root)?;
    let entries = root_manifest
        .workspace_entries()
        .ok_or_else(|| CheckError::NoWorkspaces {
            path: manifest_path(&root),
        })?;
    let workspaces = expand_workspaces(&root, entries)?;
    tracing::info!(root = %root.display(), count = workspaces.len(), "checking workspaces");

    let excluded: Vec<Workspace> = expand_workspaces(&root, &options.exclude_workspaces)?;

    let mut report = CheckReport {
        checked: Vec::new(),
        skipped: Vec::new(),
        excluded: Vec::new(),
        findings: Vec::new(),
        fail_on_findings: options.fail_on_findings,
    };

    for workspace in workspaces {
        if excluded.iter().any(|e| e.name == workspace.name) {
            tracing::debug!(workspace = %workspace.name, "excluded");
            report.excluded.push(workspace.name);
            continue;
        }

        let package = load_manifest(&workspace.dir)?;
        let skip = package.skip_rule();
        if skip.skips_workspace() {
            tracing::info!(workspace = %workspace.name, "skipped by checkDeps.skip");
            report.skipped.push(workspace.name);
            continue;
        }

        let findings = check_workspace(&workspace, &skip, options, extractor)?;
        tracing::info!(workspace = %workspace.name, findings = findings.len(), "checked");
        report.findings.extend(findings);
        report.checked.push(workspace.name);
    }

    Ok(report)
}

fn check_workspace<E: UsageExtractor>(
    workspace: &Workspace,
    skip: &SkipRule,
    options: &CheckOptions,
    extractor: &mut E,
) -> CheckResult<Vec<Finding>> {
    let manifest = workspace.manifest_path();
    let sources = enumerate_sources(&workspace.dir, &options.sources)?;

    let usage = match extractor.extract(&manifest, &sources, &options.extractor) {
        Ok(usage) => usage,
        Err(source) => {
            tracing::error!(
                workspace = %workspace.dir.display(),
                manifest = %manifest.display(),
                entries = ?sources,
                error = %source,
                "error checking source files"
            );
            return Err(CheckError::Extraction {
                workspace: workspace.dir.clone(),
                manifest,
                entries: sources,
                source,
            });
        }
    };

    reconcile_workspace(
        &workspace.dir,
        &manifest,
        &sources,
        &usage,
        skip,
        &options.extractor,
    )
}
