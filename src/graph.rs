//! Materialized dependency graph for display.
//!
//! The closure resolver never builds a graph; it only needs sets. This module
//! exists for the `tree` command: it records which module requires which, so
//! the hierarchy can be printed and cycles listed. Self edges (a module
//! including its own headers) are dropped since they carry no dependency.

use anyhow::Result;
use futures::stream::{self, StreamExt, TryStreamExt};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::path::Path;

use crate::scanner::{ModuleSet, Scanner, derive_modules};

/// A node of the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DependencyNode {
    /// A project directory that is not itself an indexed module.
    Project(String),
    /// A single source file.
    File(String),
    /// An indexed kit module.
    Module(String),
}

impl DependencyNode {
    /// Display name of this node.
    pub fn name(&self) -> &str {
        match self {
            Self::Project(name) | Self::File(name) | Self::Module(name) => name,
        }
    }
}

impl fmt::Display for DependencyNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Project(name) => write!(f, "{name} (project)"),
            Self::File(name) => write!(f, "{name} (file)"),
            Self::Module(name) => f.write_str(name),
        }
    }
}

/// Directed graph of "requires" edges between modules.
pub struct DependencyGraph {
    graph: DiGraph<DependencyNode, ()>,
    node_map: HashMap<DependencyNode, NodeIndex>,
    root: Option<DependencyNode>,
}

impl DependencyGraph {
    /// Create a new empty dependency graph.
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
            root: None,
        }
    }

    /// The node a scan started from, if the graph was built by a scan.
    pub fn root(&self) -> Option<&DependencyNode> {
        self.root.as_ref()
    }

    /// Scan every module reachable from the indexed module `name`.
    pub async fn for_module(scanner: &Scanner, name: &str) -> Result<Self> {
        let root = DependencyNode::Module(name.to_string());
        let seed = scanner.module_dependencies(name).await?;
        Self::build(scanner, root, seed).await
    }

    /// Scan every module reachable from the sources under `dir`.
    pub async fn for_directory(scanner: &Scanner, dir: &Path) -> Result<Self> {
        let seed = scanner.directory_dependencies(dir).await?;
        Self::build(scanner, DependencyNode::Project(display_name(dir)), seed).await
    }

    /// Scan every module reachable from a single source file.
    ///
    /// The file is read regardless of its extension.
    pub async fn for_file(scanner: &Scanner, path: &Path) -> Result<Self> {
        let seed = derive_modules(&scanner.file_references(path).await?);
        Self::build(scanner, DependencyNode::File(display_name(path)), seed).await
    }

    async fn build(scanner: &Scanner, root: DependencyNode, seed: ModuleSet) -> Result<Self> {
        let mut graph = Self::new();
        graph.ensure_node(root.clone());
        graph.root = Some(root.clone());

        let mut visited: HashSet<String> = HashSet::new();
        if let DependencyNode::Module(name) = &root {
            visited.insert(name.clone());
        }
        for dep in &seed {
            graph.add_dependency(root.clone(), DependencyNode::Module(dep.clone()));
        }

        let mut pending: ModuleSet = seed.into_iter().filter(|m| !visited.contains(m)).collect();
        while !pending.is_empty() {
            visited.extend(pending.iter().cloned());

            let expansions: Vec<(String, ModuleSet)> = stream::iter(pending.iter().cloned())
                .map(|module| async move {
                    let deps = scanner.module_dependencies(&module).await?;
                    Ok::<_, anyhow::Error>((module, deps))
                })
                .buffer_unordered(scanner.max_parallel())
                .try_collect()
                .await?;

            let mut next = ModuleSet::new();
            for (module, deps) in expansions {
                for dep in deps {
                    graph.add_dependency(
                        DependencyNode::Module(module.clone()),
                        DependencyNode::Module(dep.clone()),
                    );
                    if !visited.contains(&dep) {
                        next.insert(dep);
                    }
                }
            }
            pending = next;
        }

        Ok(graph)
    }

    /// Add a node to the graph if it doesn't already exist.
    fn ensure_node(&mut self, node: DependencyNode) -> NodeIndex {
        if let Some(&index) = self.node_map.get(&node) {
            index
        } else {
            let index = self.graph.add_node(node.clone());
            self.node_map.insert(node, index);
            index
        }
    }

    /// Record that `from` requires `to`. Self edges and duplicates are ignored.
    pub fn add_dependency(&mut self, from: DependencyNode, to: DependencyNode) {
        if from == to {
            self.ensure_node(from);
            return;
        }
        let from_idx = self.ensure_node(from);
        let to_idx = self.ensure_node(to);

        if !self.graph.contains_edge(from_idx, to_idx) {
            self.graph.add_edge(from_idx, to_idx, ());
        }
    }

    /// Direct dependencies of `node`, sorted by name.
    pub fn direct_dependencies(&self, node: &DependencyNode) -> Vec<DependencyNode> {
        let mut deps: Vec<DependencyNode> = self
            .node_map
            .get(node)
            .map(|&idx| self.graph.neighbors(idx).map(|n| self.graph[n].clone()).collect())
            .unwrap_or_default();
        deps.sort();
        deps
    }

    /// Names of every module node in the graph.
    pub fn modules(&self) -> ModuleSet {
        self.graph
            .node_weights()
            .filter_map(|node| match node {
                DependencyNode::Module(name) => Some(name.clone()),
                DependencyNode::Project(_) | DependencyNode::File(_) => None,
            })
            .collect()
    }

    /// Dependency cycles, each as the sorted set of modules that form it.
    pub fn cycles(&self) -> Vec<BTreeSet<DependencyNode>> {
        let mut cycles: Vec<BTreeSet<DependencyNode>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| component.len() > 1)
            .map(|component| component.into_iter().map(|idx| self.graph[idx].clone()).collect())
            .collect();
        cycles.sort();
        cycles
    }

    /// Get the total number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get the total number of edges (dependencies) in the graph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Render the hierarchy below `root` with box-drawing characters.
    ///
    /// A module already expanded elsewhere is marked `(*)`; an edge back to a
    /// module on the current path is marked `(circular reference)`.
    pub fn to_tree_string(&self, root: &DependencyNode) -> String {
        let mut result = format!("{root}\n");
        let mut expanded = HashSet::new();
        let mut path = vec![root.clone()];
        expanded.insert(root.clone());

        let deps = self.direct_dependencies(root);
        for (i, dep) in deps.iter().enumerate() {
            let is_last = i == deps.len() - 1;
            self.build_tree_string(dep, &mut result, "", is_last, &mut expanded, &mut path);
        }
        result
    }

    fn build_tree_string(
        &self,
        node: &DependencyNode,
        result: &mut String,
        prefix: &str,
        is_last: bool,
        expanded: &mut HashSet<DependencyNode>,
        path: &mut Vec<DependencyNode>,
    ) {
        let connector = if is_last {
            "└── "
        } else {
            "├── "
        };

        if path.contains(node) {
            result.push_str(&format!("{prefix}{connector}{node} (circular reference)\n"));
            return;
        }
        if !expanded.insert(node.clone()) {
            result.push_str(&format!("{prefix}{connector}{node} (*)\n"));
            return;
        }
        result.push_str(&format!("{prefix}{connector}{node}\n"));

        let child_prefix = if is_last {
            format!("{prefix}    ")
        } else {
            format!("{prefix}│   ")
        };

        path.push(node.clone());
        let deps = self.direct_dependencies(node);
        for (i, dep) in deps.iter().enumerate() {
            let is_last_child = i == deps.len() - 1;
            self.build_tree_string(dep, result, &child_prefix, is_last_child, expanded, path);
        }
        path.pop();
    }
}

fn display_name(path: &Path) -> String {
    path.canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| path.display().to_string())
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}
