//! Source code analysis module for checkdeps.
//!
//! This module finds out which packages a workspace actually uses by
//! parsing its JavaScript/TypeScript sources with tree-sitter.
//!
//! # Features
//!
//! - Parse ES6 `import` statements and `export ... from` re-exports
//! - Parse CommonJS `require()` calls and TypeScript `import x = require()`
//! - Parse dynamic `import()` with a literal specifier
//! - Follow relative imports to other files of the same package
//! - Ignore Node.js built-in modules
//!
//! # Example
//!
//! ```ignore
//! use std::path::{Path, PathBuf};
//! use checkdeps::analysis::{ExtractorOptions, SourceExtractor, UsageExtractor};
//!
//! let mut extractor = SourceExtractor::new()?;
//! let usage = extractor.extract(
//!     Path::new("packages/app/package.json"),
//!     &[PathBuf::from("index.js")],
//!     &ExtractorOptions::default(),
//! )?;
//! for name in &usage.used {
//!     println!("uses {name}");
//! }
//! ```

pub mod builtins;
pub mod extractor;
pub mod imports;

pub use builtins::is_builtin;
pub use extractor::{
    ExtractionError, ExtractorOptions, SourceExtractor, UsageExtractor, UsageReport,
};
pub use imports::{
    analyze_file, package_name, AnalysisError, AnalysisResult, Import, ImportAnalyzer,
    ImportKind, SourceLanguage,
};
