//! Shared types for manifest parsing.
//!
//! This module defines the data structures used to represent the root
//! manifest of a monorepo, the manifests of its workspaces, and the
//! dependencies they declare.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Represents the structure of a workspace package.json file.
///
/// Only the fields needed for dependency accounting are captured; every
/// other field in the file is ignored. A captured field whose value has an
/// unexpected shape reads as absent, so any well-formed JSON object loads.
/// Dependency maps are ordered so that everything derived from them is
/// deterministic; only their keys are used.
///
/// # Example
///
/// ```
/// use checkdeps::parser::types::PackageJson;
///
/// let json = r#"{"name": "my-app", "version": 2, "dependencies": {"lodash": "^4.17.21"}}"#;
/// let pkg: PackageJson = serde_json::from_str(json).unwrap();
/// assert_eq!(pkg.name, Some("my-app".to_string()));
/// assert!(pkg.dependencies.unwrap().contains_key("lodash"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PackageJson {
    /// The name of the package.
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,

    /// Production dependencies required at runtime.
    #[serde(default, deserialize_with = "lenient")]
    pub dependencies: Option<DependencyMap>,

    /// Development-only dependencies (testing, building, etc.).
    #[serde(rename = "devDependencies", default, deserialize_with = "lenient")]
    pub dev_dependencies: Option<DependencyMap>,

    /// Peer dependencies that the host package must provide.
    #[serde(rename = "peerDependencies", default, deserialize_with = "lenient")]
    pub peer_dependencies: Option<DependencyMap>,

    /// Optional dependencies that enhance functionality if available.
    #[serde(rename = "optionalDependencies", default, deserialize_with = "lenient")]
    pub optional_dependencies: Option<DependencyMap>,

    /// Tool-specific block: `{ "checkDeps": { "skip": ... } }`.
    #[serde(rename = "checkDeps", default, deserialize_with = "lenient")]
    pub check_deps: Option<CheckDepsConfig>,
}

/// Dependency name to version specifier. Specifiers are kept verbatim and
/// may be any JSON value.
pub type DependencyMap = BTreeMap<String, Value>;

/// Reads a field as `None` when its value does not have the expected shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

impl PackageJson {
    /// Returns the skip rule configured for this workspace.
    ///
    /// A missing `checkDeps` block, `skip: false`, or a `skip` value of any
    /// other shape all mean "check everything".
    pub fn skip_rule(&self) -> SkipRule {
        match self.check_deps.as_ref().map(|c| &c.skip) {
            Some(SkipSetting::Flag(true)) => SkipRule::All,
            Some(SkipSetting::Names(names)) => SkipRule::Names(names.iter().cloned().collect()),
            _ => SkipRule::none(),
        }
    }
}

/// The `checkDeps` block of a workspace manifest.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CheckDepsConfig {
    #[serde(default)]
    pub skip: SkipSetting,
}

/// Raw value of `checkDeps.skip` as written in the manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SkipSetting {
    /// `"skip": true` or `"skip": false`
    Flag(bool),
    /// `"skip": ["left-pad", ...]`
    Names(Vec<String>),
    /// Anything else; treated as no skip.
    Other(Value),
}

impl Default for SkipSetting {
    fn default() -> Self {
        SkipSetting::Flag(false)
    }
}

/// Per-workspace skip configuration, derived from [`SkipSetting`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipRule {
    /// Do not check this workspace at all.
    All,
    /// Never report these module names for this workspace.
    Names(BTreeSet<String>),
}

impl SkipRule {
    /// A rule that skips nothing.
    pub fn none() -> Self {
        SkipRule::Names(BTreeSet::new())
    }

    /// Returns true if the whole workspace is skipped.
    pub fn skips_workspace(&self) -> bool {
        matches!(self, SkipRule::All)
    }

    /// Returns true if findings for `name` must be suppressed.
    pub fn skips(&self, name: &str) -> bool {
        match self {
            SkipRule::All => true,
            SkipRule::Names(names) => names.contains(name),
        }
    }
}

/// Represents the root package.json of a monorepo.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RootManifest {
    /// The name of the monorepo root package.
    pub name: Option<String>,

    /// Declared workspaces, in declaration order.
    pub workspaces: Option<Workspaces>,
}

impl RootManifest {
    /// Returns the declared workspace entries in order.
    pub fn workspace_entries(&self) -> Option<&[String]> {
        self.workspaces.as_ref().map(Workspaces::entries)
    }
}

/// The `workspaces` field: either a plain list or the object form used by
/// yarn (`{ "packages": [...], "nohoist": [...] }`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Workspaces {
    List(Vec<String>),
    Object {
        #[serde(default)]
        packages: Vec<String>,
    },
}

impl Workspaces {
    pub fn entries(&self) -> &[String] {
        match self {
            Workspaces::List(entries) => entries,
            Workspaces::Object { packages } => packages,
        }
    }
}

/// Categorizes the type of dependency relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DependencyType {
    /// Production dependencies - required at runtime.
    Production,

    /// Development dependencies - only needed during development.
    Development,

    /// Peer dependencies - expected to be provided by the consumer.
    Peer,

    /// Optional dependencies - used at runtime if installed.
    Optional,
}

/// Represents a single declared dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// The package name (e.g., "react", "lodash").
    pub name: String,

    /// The category of this dependency.
    pub dep_type: DependencyType,
}

impl Dependency {
    /// Creates a new Dependency instance.
    pub fn new(name: impl Into<String>, dep_type: DependencyType) -> Self {
        Self {
            name: name.into(),
            dep_type,
        }
    }
}
