//! checkdeps - unused and missing dependency checker for JavaScript monorepos
//!
//! This crate walks the workspaces declared by a monorepo's root
//! package.json and, for each one, compares the dependencies its manifest
//! declares with the packages its source files actually import.

pub mod analysis;
pub mod check;
pub mod graph;
pub mod parser;
pub mod report;
pub mod workspace;

#[cfg(test)]
mod fixture;

pub use check::{check_monorepo, check_monorepo_with, CheckError, CheckOptions, CheckReport};
