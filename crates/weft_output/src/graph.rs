//! The reference graph between the files of a cycle.

use std::collections::HashMap;
use std::path::PathBuf;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use weft_config::OrderingPolicy;
use weft_source::{FileId, SourceCache, Span};

use crate::error::{CycleMember, CyclicReferenceError};

#[derive(Debug, Clone)]
struct Node {
    id: FileId,
    path: PathBuf,
}

/// Directed graph from each file to the files its header references point at.
///
/// Only files of the committed cycle are nodes. References to anything else,
/// and a file referencing itself, add no edge.
#[derive(Debug, Clone)]
pub struct ReferenceGraph {
    graph: DiGraph<Node, Span>,
    /// Outgoing edges in declaration order, indexed by node.
    deps: Vec<Vec<NodeIndex>>,
}

/// A computed output order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputOrder {
    /// Every file of the cycle, each exactly once.
    pub files: Vec<FileId>,
    /// Reference cycles found. When non-empty, `files` is the resolution order.
    pub cycles: Vec<CyclicReferenceError>,
}

impl OutputOrder {
    /// Returns `true` if the order fell back because of reference cycles.
    pub fn is_fallback(&self) -> bool {
        !self.cycles.is_empty()
    }
}

impl ReferenceGraph {
    /// Builds the graph over the committed cycle of `sources`.
    pub fn build(sources: &SourceCache) -> Self {
        let mut graph = DiGraph::new();
        let mut by_path = HashMap::new();
        for file in sources.iter() {
            let node = graph.add_node(Node {
                id: file.id,
                path: file.path.clone(),
            });
            by_path.insert(file.path.as_path(), node);
        }

        let mut deps = vec![Vec::new(); graph.node_count()];
        for (index, file) in sources.iter().enumerate() {
            let from = NodeIndex::new(index);
            for reference in &file.references {
                let Some(&to) = by_path.get(reference.path.as_path()) else {
                    continue;
                };
                if to == from || graph.contains_edge(from, to) {
                    continue;
                }
                graph.add_edge(from, to, reference.span);
                deps[index].push(to);
            }
        }

        Self { graph, deps }
    }

    /// Number of files in the graph.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns `true` if the graph has no files.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Files directly referenced by `id`, in declaration order.
    pub fn references(&self, id: FileId) -> Vec<FileId> {
        self.node_of(id)
            .map(|node| {
                self.deps[node.index()]
                    .iter()
                    .map(|&dep| self.graph[dep].id)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Finds every reference cycle.
    ///
    /// Cycles are listed by the position of their earliest file, and each cycle
    /// starts at that file.
    pub fn cycles(&self) -> Vec<CyclicReferenceError> {
        let mut cycles: Vec<Vec<NodeIndex>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1)
            .map(|mut scc| {
                scc.sort();
                scc
            })
            .collect();
        cycles.sort_by_key(|scc| scc[0]);

        cycles
            .iter()
            .map(|scc| CyclicReferenceError {
                members: self.walk_cycle(scc),
                references: self.cycle_references(scc),
            })
            .collect()
    }

    /// Orders the files so that referenced files come first.
    ///
    /// Files are visited in `policy` order; each one is preceded by the files it
    /// references, depth first in declaration order. On a reference cycle the
    /// whole order falls back to resolution order.
    pub fn order(&self, policy: OrderingPolicy) -> OutputOrder {
        let cycles = self.cycles();
        if !cycles.is_empty() {
            tracing::warn!(
                cycles = cycles.len(),
                "reference cycle found, keeping resolution order"
            );
            return OutputOrder {
                files: self.graph.node_weights().map(|n| n.id).collect(),
                cycles,
            };
        }

        let mut roots: Vec<NodeIndex> = self.graph.node_indices().collect();
        if policy == OrderingPolicy::Path {
            roots.sort_by(|a, b| self.graph[*a].path.cmp(&self.graph[*b].path));
        }

        OutputOrder {
            files: self.references_first(&roots),
            cycles,
        }
    }

    fn references_first(&self, roots: &[NodeIndex]) -> Vec<FileId> {
        let mut visited = vec![false; self.graph.node_count()];
        let mut order = Vec::with_capacity(visited.len());
        let mut stack: Vec<(NodeIndex, usize)> = Vec::new();

        for &root in roots {
            if visited[root.index()] {
                continue;
            }
            visited[root.index()] = true;
            stack.push((root, 0));

            while let Some(top) = stack.last_mut() {
                let node = top.0;
                let next = self.deps[node.index()].get(top.1).copied();
                top.1 += 1;
                match next {
                    Some(dep) if !visited[dep.index()] => {
                        visited[dep.index()] = true;
                        stack.push((dep, 0));
                    }
                    Some(_) => {}
                    None => {
                        stack.pop();
                        order.push(self.graph[node].id);
                    }
                }
            }
        }
        order
    }

    /// Follows first in-cycle references from the earliest member until the
    /// walk returns to a visited file.
    fn walk_cycle(&self, scc: &[NodeIndex]) -> Vec<CycleMember> {
        let mut members = Vec::new();
        let mut seen = vec![false; self.graph.node_count()];
        let mut current = scc[0];
        while !seen[current.index()] {
            seen[current.index()] = true;
            let Some(&next) = self.deps[current.index()]
                .iter()
                .find(|dep| scc.binary_search(*dep).is_ok())
            else {
                break;
            };
            members.push(self.step(current, next));
            current = next;
        }
        members
    }

    /// Every edge between members of `scc`, by member then declaration order.
    fn cycle_references(&self, scc: &[NodeIndex]) -> Vec<CycleMember> {
        scc.iter()
            .flat_map(|&from| {
                self.deps[from.index()]
                    .iter()
                    .filter(|dep| scc.binary_search(*dep).is_ok())
                    .map(move |&to| self.step(from, to))
            })
            .collect()
    }

    fn step(&self, from: NodeIndex, to: NodeIndex) -> CycleMember {
        CycleMember {
            path: self.graph[from].path.clone(),
            reference: self
                .graph
                .find_edge(from, to)
                .map_or(Span::DUMMY, |edge| self.graph[edge]),
            target: self.graph[to].path.clone(),
        }
    }

    fn node_of(&self, id: FileId) -> Option<NodeIndex> {
        self.graph
            .node_indices()
            .find(|&node| self.graph[node].id == id)
    }
}
