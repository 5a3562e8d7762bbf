//! Dependency checks across the workspaces of a monorepo.
//!
//! [`check_monorepo`] loads the root manifest, walks the declared
//! workspaces in order and reconciles each workspace's declared
//! dependencies against the modules its sources import. The result is a
//! [`CheckReport`]; printing it and choosing an exit code is up to the
//! caller (see [`crate::report`]).
//!
//! A finding is reported when:
//!
//! - a runtime dependency is never imported (**unused**), unless a source
//!   file names it in a `require.resolve(...)` call, or
//! - an imported module is not declared (**missing**).
//!
//! Names listed in a workspace's `checkDeps.skip` array are never
//! reported; `"skip": true` leaves the workspace out altogether.

pub mod orchestrator;
pub mod reconcile;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::analysis::{AnalysisError, ExtractionError};
use crate::parser::ManifestError;
use crate::workspace::SourceError;

pub use orchestrator::{check_monorepo, check_monorepo_with, CheckOptions, CheckReport};
pub use reconcile::{
    declared_dependencies, mentions_dynamic_resolve, missing_dependencies, reconcile_workspace,
    unused_dependencies, Finding, FindingKind,
};

/// Errors that abort a run.
#[derive(Error, Debug)]
pub enum CheckError {
    /// The root manifest or a workspace manifest could not be loaded.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("`{}` declares no workspaces", path.display())]
    NoWorkspaces { path: PathBuf },

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// The source enumeration settings are unusable.
    #[error(transparent)]
    Sources(#[from] SourceError),

    /// The usage extractor failed for one workspace.
    #[error("Error checking source files of `{}`: {source}", manifest.display())]
    Extraction {
        workspace: PathBuf,
        manifest: PathBuf,
        entries: Vec<PathBuf>,
        #[source]
        source: ExtractionError,
    },

    #[error("Failed to read `{}`: {source}", path.display())]
    SourceRead {
        workspace: PathBuf,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Analyzer(#[from] AnalysisError),
}

impl CheckError {
    /// The workspace directory the error is scoped to, if any.
    pub fn workspace(&self) -> Option<&Path> {
        match self {
            CheckError::Extraction { workspace, .. } | CheckError::SourceRead { workspace, .. } => {
                Some(workspace.as_path())
            }
            _ => None,
        }
    }

    /// The file the error is about, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            CheckError::Manifest(err) => Some(err.path.as_path()),
            CheckError::NoWorkspaces { path } | CheckError::SourceRead { path, .. } => {
                Some(path.as_path())
            }
            CheckError::Extraction { manifest, .. } => Some(manifest.as_path()),
            CheckError::Pattern(_) | CheckError::Sources(_) | CheckError::Analyzer(_) => None,
        }
    }
}

/// Result type for check operations.
pub type CheckResult<T> = Result<T, CheckError>;
