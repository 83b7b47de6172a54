//! Diagnostic dependency graph over the resolved set.
//!
//! Built during the emit walk of resolution: one node per surviving
//! coordinate (at its resolved version), edges from each dependent to
//! its dependencies. Used for human-facing output only; the engine's
//! working state lives in its own queue and tables.

use std::collections::{HashMap, HashSet};
use std::fmt;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use jbasis_core::dependency::Coordinate;

/// A node in the resolved dependency graph.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct ResolvedNode {
    pub coordinate: Coordinate,
    pub version: String,
}

impl fmt::Display for ResolvedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.coordinate, self.version)
    }
}

/// A resolved dependency graph backed by petgraph.
///
/// Each coordinate appears once, at its resolved version; the roots are
/// the root dependencies of the resolution, in request order.
#[derive(Debug)]
pub struct DependencyGraph {
    graph: DiGraph<ResolvedNode, ()>,
    index: HashMap<Coordinate, NodeIndex>,
    roots: Vec<NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            index: HashMap::new(),
            roots: Vec::new(),
        }
    }

    /// Add the node for a coordinate, or retrieve it when present.
    pub fn add_node(&mut self, node: ResolvedNode) -> NodeIndex {
        match self.index.get(&node.coordinate) {
            Some(&idx) => idx,
            None => {
                let coordinate = node.coordinate.clone();
                let idx = self.graph.add_node(node);
                self.index.insert(coordinate, idx);
                idx
            }
        }
    }

    /// Mark a node as a resolution root.
    pub fn add_root(&mut self, idx: NodeIndex) {
        if !self.roots.contains(&idx) {
            self.roots.push(idx);
        }
    }

    /// Add a dependency edge, ignoring duplicates.
    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex) {
        let duplicate = self.graph.edges(from).any(|e| e.target() == to);
        if !duplicate {
            self.graph.add_edge(from, to, ());
        }
    }

    pub fn find(&self, coordinate: &Coordinate) -> Option<NodeIndex> {
        self.index.get(coordinate).copied()
    }

    pub fn node(&self, idx: NodeIndex) -> &ResolvedNode {
        &self.graph[idx]
    }

    /// Direct dependencies of a node.
    pub fn dependencies_of(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| e.target())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Render the resolved tree, each artifact nested under the
    /// dependent that first introduced it.
    pub fn render_tree(&self) -> String {
        let mut out = String::new();
        for (i, &root) in self.roots.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&self.graph[root].to_string());
            out.push('\n');
            let mut on_path = HashSet::from([root]);
            self.render_children(&mut out, root, "", &mut on_path);
        }
        out
    }

    fn render_children(
        &self,
        out: &mut String,
        idx: NodeIndex,
        prefix: &str,
        on_path: &mut HashSet<NodeIndex>,
    ) {
        let children = self.dependencies_of(idx);
        let last = children.len().saturating_sub(1);
        for (i, child) in children.into_iter().enumerate() {
            let (connector, extension) = if i == last {
                ("└── ", "    ")
            } else {
                ("├── ", "│   ")
            };
            out.push_str(prefix);
            out.push_str(connector);
            out.push_str(&self.graph[child].to_string());
            out.push('\n');

            // A child already on the current path would recurse forever.
            if on_path.insert(child) {
                self.render_children(out, child, &format!("{prefix}{extension}"), on_path);
                on_path.remove(&child);
            }
        }
    }

    /// Find a dependency chain from a root to the given coordinate:
    /// "why is this artifact on the classpath".
    ///
    /// Accepts either `group:artifact` or a bare artifact name.
    pub fn find_path(&self, target_key: &str) -> Option<Vec<&ResolvedNode>> {
        let target = self.target_of(target_key)?;
        self.roots.iter().find_map(|&root| {
            let mut trail = Vec::new();
            let mut seen = HashSet::new();
            self.search(root, target, &mut trail, &mut seen)
                .then(|| trail.iter().map(|&idx| &self.graph[idx]).collect())
        })
    }

    /// Resolve a user-supplied key: exact `group:artifact` first, then
    /// the first node (in coordinate order) whose artifact name matches.
    fn target_of(&self, key: &str) -> Option<NodeIndex> {
        if let Some((group, artifact)) = key.split_once(':') {
            return self.find(&Coordinate::new(group, artifact));
        }
        self.index
            .iter()
            .filter(|(coordinate, _)| coordinate.artifact_id == key)
            .min_by(|a, b| a.0.cmp(b.0))
            .map(|(_, &idx)| idx)
    }

    fn search(
        &self,
        current: NodeIndex,
        target: NodeIndex,
        trail: &mut Vec<NodeIndex>,
        seen: &mut HashSet<NodeIndex>,
    ) -> bool {
        if !seen.insert(current) {
            return false;
        }
        trail.push(current);
        if current == target {
            return true;
        }
        for edge in self.graph.edges(current) {
            if self.search(edge.target(), target, trail, seen) {
                return true;
            }
        }
        trail.pop();
        false
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}
