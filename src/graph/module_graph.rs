//! Module graph implementation using petgraph.
//!
//! Nodes are source files of one package and the external packages they
//! import; edges point from the importing file to what it imports.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Bfs;
use petgraph::Direction;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

/// A node in the module graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ModuleNode {
    /// A source file inside the package, relative to the package root.
    File(PathBuf),
    /// An external package, by package name.
    Package(String),
}

impl ModuleNode {
    /// Returns the package name if this node is a package.
    pub fn package_name(&self) -> Option<&str> {
        match self {
            ModuleNode::Package(name) => Some(name),
            ModuleNode::File(_) => None,
        }
    }
}

/// A directed graph of files and the packages they import.
///
/// # Example
///
/// ```rust
/// use std::path::Path;
/// use checkdeps::graph::ModuleGraph;
///
/// let mut graph = ModuleGraph::new();
/// graph.add_file_import(Path::new("index.js"), Path::new("lib/util.js"));
/// graph.add_package_import(Path::new("lib/util.js"), "lodash");
///
/// let used = graph.reachable_packages([Path::new("index.js")]);
/// assert!(used.contains("lodash"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModuleGraph {
    graph: DiGraph<ModuleNode, ()>,
    node_indices: HashMap<ModuleNode, NodeIndex>,
}

impl ModuleGraph {
    /// Creates a new empty module graph.
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&mut self, node: ModuleNode) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(&node) {
            return idx;
        }
        let idx = self.graph.add_node(node.clone());
        self.node_indices.insert(node, idx);
        idx
    }

    fn link(&mut self, from: NodeIndex, to: NodeIndex) {
        if self.graph.find_edge(from, to).is_none() {
            self.graph.add_edge(from, to, ());
        }
    }

    /// Adds a file node, returning its index. Existing nodes are reused.
    pub fn add_file(&mut self, path: &Path) -> NodeIndex {
        self.node(ModuleNode::File(path.to_path_buf()))
    }

    /// Records that `from` imports the local file `to`.
    pub fn add_file_import(&mut self, from: &Path, to: &Path) {
        let from = self.add_file(from);
        let to = self.add_file(to);
        self.link(from, to);
    }

    /// Records that `from` imports the external package `package`.
    pub fn add_package_import(&mut self, from: &Path, package: &str) {
        let from = self.add_file(from);
        let to = self.node(ModuleNode::Package(package.to_string()));
        self.link(from, to);
    }

    /// Returns every package reachable from the given entry files.
    pub fn reachable_packages<'a, I>(&self, entries: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = &'a Path>,
    {
        let mut packages = BTreeSet::new();
        let mut visited = vec![false; self.graph.node_count()];

        for entry in entries {
            let Some(&start) = self
                .node_indices
                .get(&ModuleNode::File(entry.to_path_buf()))
            else {
                continue;
            };
            if visited[start.index()] {
                continue;
            }

            let mut bfs = Bfs::new(&self.graph, start);
            while let Some(idx) = bfs.next(&self.graph) {
                if std::mem::replace(&mut visited[idx.index()], true) {
                    continue;
                }
                if let Some(name) = self.graph[idx].package_name() {
                    packages.insert(name.to_string());
                }
            }
        }

        packages
    }

    /// Returns the files that directly import `package`, sorted.
    pub fn importers_of(&self, package: &str) -> Vec<&Path> {
        let Some(&idx) = self
            .node_indices
            .get(&ModuleNode::Package(package.to_string()))
        else {
            return Vec::new();
        };

        let mut files: Vec<&Path> = self
            .graph
            .neighbors_directed(idx, Direction::Incoming)
            .filter_map(|n| match &self.graph[n] {
                ModuleNode::File(path) => Some(path.as_path()),
                ModuleNode::Package(_) => None,
            })
            .collect();
        files.sort();
        files
    }

    /// Number of file nodes.
    pub fn file_count(&self) -> usize {
        self.node_indices
            .keys()
            .filter(|n| matches!(n, ModuleNode::File(_)))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> &Path {
        Path::new(s)
    }

    #[test]
    fn test_empty_graph() {
        let graph = ModuleGraph::new();
        assert_eq!(graph.file_count(), 0);
        assert!(graph.reachable_packages([p("index.js")]).is_empty());
    }

    #[test]
    fn test_nodes_are_deduplicated() {
        let mut graph = ModuleGraph::new();
        graph.add_package_import(p("a.js"), "lodash");
        graph.add_package_import(p("a.js"), "lodash");
        graph.add_package_import(p("b.js"), "lodash");

        assert_eq!(graph.file_count(), 2);
        assert_eq!(graph.importers_of("lodash"), vec![p("a.js"), p("b.js")]);
    }

    #[test]
    fn test_transitive_reachability() {
        let mut graph = ModuleGraph::new();
        graph.add_file_import(p("index.js"), p("lib/a.js"));
        graph.add_file_import(p("lib/a.js"), p("lib/b.js"));
        graph.add_package_import(p("lib/b.js"), "chalk");
        graph.add_package_import(p("orphan.js"), "left-pad");

        let used = graph.reachable_packages([p("index.js")]);
        assert_eq!(used.into_iter().collect::<Vec<_>>(), vec!["chalk"]);
    }

    #[test]
    fn test_cycles_terminate() {
        let mut graph = ModuleGraph::new();
        graph.add_file_import(p("a.js"), p("b.js"));
        graph.add_file_import(p("b.js"), p("a.js"));
        graph.add_package_import(p("b.js"), "react");

        let used = graph.reachable_packages([p("a.js"), p("b.js")]);
        assert_eq!(used.len(), 1);
        assert!(used.contains("react"));
    }

    #[test]
    fn test_importers_of_unknown_package() {
        let graph = ModuleGraph::new();
        assert!(graph.importers_of("react").is_empty());
    }
}
