//! Parser module for checkdeps.
//!
//! This module loads the npm manifests of a monorepo: the root package.json
//! declaring the workspaces, and one package.json per workspace declaring
//! its dependencies and its `checkDeps` configuration.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use checkdeps::parser::{load_manifest, extract_dependencies};
//!
//! let pkg = load_manifest(Path::new("packages/app"))?;
//! for dep in extract_dependencies(&pkg) {
//!     println!("{} ({:?})", dep.name, dep.dep_type);
//! }
//! ```

pub mod package_json;
pub mod types;

pub use package_json::{
    extract_dependencies, load_manifest, load_root_manifest, manifest_path, parse_file,
    parse_str, ManifestError, ParseError, ParseResult, MANIFEST_FILE,
};

pub use types::{
    CheckDepsConfig, Dependency, DependencyMap, DependencyType, PackageJson, RootManifest,
    SkipRule, SkipSetting, Workspaces,
};
