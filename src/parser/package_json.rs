//! Loader for npm package.json files.
//!
//! Every call re-reads the manifest from disk; nothing is cached between
//! calls, so a run always sees the current state of the filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use super::types::{Dependency, DependencyType, PackageJson, RootManifest};

/// File name of a package manifest.
pub const MANIFEST_FILE: &str = "package.json";

/// Errors that can occur during package.json parsing.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed to read the file from disk.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse JSON content.
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for parser operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// A manifest could not be loaded. Carries the resolved file path.
#[derive(Debug, thiserror::Error)]
#[error("Error parsing `{}`: {source}", path.display())]
pub struct ManifestError {
    pub path: PathBuf,
    #[source]
    pub source: ParseError,
}

/// Returns the path of the manifest file inside `dir`.
pub fn manifest_path(dir: &Path) -> PathBuf {
    dir.join(MANIFEST_FILE)
}

/// Loads and parses the package.json located in `dir`.
///
/// # Example
///
/// ```ignore
/// use std::path::Path;
/// use checkdeps::parser::load_manifest;
///
/// let pkg = load_manifest(Path::new("packages/app"))?;
/// println!("Package: {:?}", pkg.name);
/// ```
pub fn load_manifest(dir: &Path) -> Result<PackageJson, ManifestError> {
    load_json(&manifest_path(dir))
}

/// Loads and parses the root package.json of a monorepo located in `dir`.
pub fn load_root_manifest(dir: &Path) -> Result<RootManifest, ManifestError> {
    load_json(&manifest_path(dir))
}

/// Parses a package.json file from a file path.
pub fn parse_file(path: &Path) -> Result<PackageJson, ManifestError> {
    load_json(path)
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, ManifestError> {
    let read = || -> ParseResult<T> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    };
    read().map_err(|source| ManifestError {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses a package.json from a string.
///
/// # Example
///
/// ```
/// use checkdeps::parser::package_json::parse_str;
///
/// let json = r#"{"name": "my-app", "version": "1.0.0"}"#;
/// let pkg = parse_str(json).unwrap();
/// assert_eq!(pkg.name, Some("my-app".to_string()));
/// ```
pub fn parse_str(content: &str) -> ParseResult<PackageJson> {
    let pkg: PackageJson = serde_json::from_str(content)?;
    Ok(pkg)
}

/// Extracts all dependencies from a PackageJson into a normalized list.
///
/// Dependencies come out grouped by type (production, development, peer,
/// optional) and sorted by name within each group.
///
/// # Example
///
/// ```
/// use checkdeps::parser::package_json::{parse_str, extract_dependencies};
/// use checkdeps::parser::types::DependencyType;
///
/// let json = r#"{
///     "name": "my-app",
///     "dependencies": {"react": "^18.0.0"},
///     "devDependencies": {"typescript": "^5.0.0"}
/// }"#;
///
/// let pkg = parse_str(json).unwrap();
/// let deps = extract_dependencies(&pkg);
///
/// assert_eq!(deps.len(), 2);
/// assert!(deps.iter().any(|d| d.name == "react" && d.dep_type == DependencyType::Production));
/// assert!(deps.iter().any(|d| d.name == "typescript" && d.dep_type == DependencyType::Development));
/// ```
pub fn extract_dependencies(pkg: &PackageJson) -> Vec<Dependency> {
    let groups = [
        (&pkg.dependencies, DependencyType::Production),
        (&pkg.dev_dependencies, DependencyType::Development),
        (&pkg.peer_dependencies, DependencyType::Peer),
        (&pkg.optional_dependencies, DependencyType::Optional),
    ];

    groups
        .into_iter()
        .filter_map(|(deps, dep_type)| deps.as_ref().map(|d| (d, dep_type)))
        .flat_map(|(deps, dep_type)| {
            deps.keys()
                .map(move |name| Dependency::new(name, dep_type))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;
    use tempfile::TempDir;

    const SAMPLE_PACKAGE_JSON: &str = r#"{
        "name": "test-app",
        "version": "1.0.0",
        "dependencies": {
            "react": "^18.2.0",
            "react-dom": "^18.2.0",
            "lodash": "^4.17.21"
        },
        "devDependencies": {
            "typescript": "^5.0.0",
            "jest": "^29.0.0"
        },
        "peerDependencies": {
            "react": ">=16.8.0"
        },
        "optionalDependencies": {
            "fsevents": "^2.3.0"
        },
        "checkDeps": {
            "skip": ["fsevents"]
        }
    }"#;

    #[test]
    fn test_parse_str_valid() {
        let pkg = parse_str(SAMPLE_PACKAGE_JSON).unwrap();

        assert_eq!(pkg.name, Some("test-app".to_string()));
        assert!(pkg.skip_rule().skips("fsevents"));
    }

    #[test]
    fn test_parse_str_empty_object() {
        let pkg = parse_str("{}").unwrap();

        assert!(pkg.name.is_none());
        assert!(pkg.check_deps.is_none());
    }

    #[test]
    fn test_parse_str_invalid_json() {
        let result = parse_str("{ invalid json }");

        assert!(matches!(result.unwrap_err(), ParseError::JsonError(_)));
    }

    #[test]
    fn test_parse_str_with_extra_fields() {
        let json = r#"{
            "name": "with-extras",
            "scripts": {"build": "tsc"},
            "repository": {"type": "git", "url": "https://example.com"},
            "dependencies": {"express": "^4.18.0"}
        }"#;

        let pkg = parse_str(json).unwrap();
        assert_eq!(pkg.dependencies.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_extract_dependencies_all_types() {
        let pkg = parse_str(SAMPLE_PACKAGE_JSON).unwrap();
        let deps = extract_dependencies(&pkg);

        // 3 prod + 2 dev + 1 peer + 1 optional = 7
        assert_eq!(deps.len(), 7);
        assert_eq!(
            deps.iter()
                .filter(|d| d.dep_type == DependencyType::Development)
                .count(),
            2
        );

        let names: Vec<_> = deps
            .iter()
            .filter(|d| d.dep_type == DependencyType::Production)
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["lodash", "react", "react-dom"]);
    }

    #[test]
    fn test_load_manifest_from_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), SAMPLE_PACKAGE_JSON).unwrap();

        let pkg = load_manifest(dir.path()).unwrap();
        assert_eq!(pkg.name.as_deref(), Some("test-app"));
    }

    #[test]
    fn test_load_manifest_missing_file_carries_path() {
        let dir = TempDir::new().unwrap();

        let err = load_manifest(dir.path()).unwrap_err();
        assert_eq!(err.path, dir.path().join(MANIFEST_FILE));
        assert!(matches!(
            err.source,
            ParseError::IoError(ref e) if e.kind() == ErrorKind::NotFound
        ));
        assert!(err.to_string().contains("package.json"));
    }

    #[test]
    fn test_load_manifest_accepts_unexpected_shapes() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(MANIFEST_FILE),
            r#"{"name": "a", "version": 2, "checkDeps": "off", "dependencies": {"x": 1}}"#,
        )
        .unwrap();

        let pkg = load_manifest(dir.path()).unwrap();
        assert!(pkg.check_deps.is_none());
        let deps = extract_dependencies(&pkg);
        assert_eq!(deps, vec![Dependency::new("x", DependencyType::Production)]);
    }

    #[test]
    fn test_load_manifest_malformed_json() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), "{\"name\": ").unwrap();

        let err = load_manifest(dir.path()).unwrap_err();
        assert!(matches!(err.source, ParseError::JsonError(_)));
    }

    #[test]
    fn test_load_manifest_rereads_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(MANIFEST_FILE);

        fs::write(&path, r#"{"name": "before"}"#).unwrap();
        assert_eq!(load_manifest(dir.path()).unwrap().name.as_deref(), Some("before"));

        fs::write(&path, r#"{"name": "after"}"#).unwrap();
        assert_eq!(load_manifest(dir.path()).unwrap().name.as_deref(), Some("after"));
    }

    #[test]
    fn test_load_root_manifest() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(MANIFEST_FILE),
            r#"{"private": true, "workspaces": ["pkg-a"]}"#,
        )
        .unwrap();

        let root = load_root_manifest(dir.path()).unwrap();
        assert_eq!(root.workspace_entries().unwrap().len(), 1);
    }
}
