//! Graph module for import relationship modeling.
//!
//! This module provides the [`ModuleGraph`] struct recording which files of
//! a package import which other files and which external packages.

mod module_graph;

pub use module_graph::{ModuleGraph, ModuleNode};
