//! Expansion of the root manifest's `workspaces` entries.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use glob::PatternError;

use crate::parser::MANIFEST_FILE;

/// One workspace of the monorepo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    /// Path relative to the monorepo root, as reported to the user.
    pub name: String,
    /// Directory of the workspace, resolved against the monorepo root.
    pub dir: PathBuf,
}

impl Workspace {
    pub fn new(root: &Path, name: impl Into<String>) -> Self {
        let name = name.into();
        let dir = root.join(&name);
        Self { name, dir }
    }

    /// Path of the workspace's package.json.
    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE)
    }
}

/// Turns the declared `workspaces` entries into a list of workspaces.
///
/// Plain entries are kept as written (minus a leading `./` or trailing
/// `/`). Entries with glob metacharacters are expanded against `root` to
/// the matching directories holding a package.json, in sorted order.
/// Each workspace appears once, at its first position.
pub fn expand_workspaces(root: &Path, entries: &[String]) -> Result<Vec<Workspace>, PatternError> {
    let mut seen = HashSet::new();
    let mut workspaces = Vec::new();

    for entry in entries {
        let entry = clean_entry(entry);
        let names = if is_glob(entry) {
            expand_glob(root, entry)?
        } else {
            vec![entry.to_string()]
        };

        for name in names {
            if seen.insert(name.clone()) {
                workspaces.push(Workspace::new(root, name));
            } else {
                tracing::debug!(workspace = %name, "duplicate workspace entry ignored");
            }
        }
    }

    Ok(workspaces)
}

fn clean_entry(entry: &str) -> &str {
    let entry = entry.trim();
    let entry = entry.strip_prefix("./").unwrap_or(entry);
    entry.trim_end_matches('/')
}

fn is_glob(entry: &str) -> bool {
    entry.contains(['*', '?', '['])
}

fn expand_glob(root: &Path, pattern: &str) -> Result<Vec<String>, PatternError> {
    let escaped_root = glob::Pattern::escape(&root.to_string_lossy());
    let full = format!("{}/{}", escaped_root, pattern);

    let mut names = Vec::new();
    for matched in glob::glob(&full)? {
        let path = match matched {
            Ok(path) => path,
            Err(err) => {
                tracing::warn!(pattern, error = %err, "skipping unreadable workspace match");
                continue;
            }
        };
        if !path.join(MANIFEST_FILE).is_file() {
            continue;
        }
        if let Ok(rel) = path.strip_prefix(root) {
            let name: Vec<_> = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect();
            names.push(name.join("/"));
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::Fixture;

    fn names(workspaces: &[Workspace]) -> Vec<&str> {
        workspaces.iter().map(|w| w.name.as_str()).collect()
    }

    fn entries(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_plain_entries_keep_order() {
        let root = Path::new("/repo");
        let ws = expand_workspaces(root, &entries(&["pkg-b", "./pkg-a/"])).unwrap();

        assert_eq!(names(&ws), vec!["pkg-b", "pkg-a"]);
        assert_eq!(ws[1].dir, PathBuf::from("/repo/pkg-a"));
        assert_eq!(ws[1].manifest_path(), PathBuf::from("/repo/pkg-a/package.json"));
    }

    #[test]
    fn test_duplicates_processed_once() {
        let ws = expand_workspaces(
            Path::new("/repo"),
            &entries(&["pkg-a", "./pkg-a", "pkg-b", "pkg-a/"]),
        )
        .unwrap();

        assert_eq!(names(&ws), vec!["pkg-a", "pkg-b"]);
    }

    #[test]
    fn test_glob_entries_expand_to_packages() {
        let fx = Fixture::new()
            .manifest("packages/zeta", "{}")
            .manifest("packages/alpha", "{}")
            .file("packages/not-a-package/index.js", "")
            .manifest("tools/cli", "{}");

        let ws = expand_workspaces(
            fx.path(),
            &entries(&["tools/cli", "packages/*", "packages/alpha"]),
        )
        .unwrap();

        assert_eq!(names(&ws), vec!["tools/cli", "packages/alpha", "packages/zeta"]);
        assert!(ws.iter().all(|w| w.dir.starts_with(fx.path())));
    }

    #[test]
    fn test_invalid_glob() {
        assert!(expand_workspaces(Path::new("/repo"), &entries(&["packages/[*"])).is_err());
    }
}
