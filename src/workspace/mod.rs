//! Workspace discovery and source enumeration.
//!
//! [`expand_workspaces`] turns the root manifest's `workspaces` field into
//! concrete directories; [`enumerate_sources`] lists the source files that
//! belong to one of them.

pub mod discover;
pub mod sources;

pub use discover::{expand_workspaces, Workspace};
pub use sources::{enumerate_sources, SourceError, SourceOptions, DEFAULT_EXTENSIONS};
