//! Module dependency graph and dependency layers
//!
//! The driver resolves modules layer by layer: a module lands in a layer only
//! after every module it imports sits in an earlier one, so modules sharing a
//! layer never depend on each other.

use std::collections::{BTreeSet, HashMap};

use petgraph::algo::{kosaraju_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Bfs, Reversed};
use petgraph::Direction;

use crate::error::ResolveError;
use crate::names::ModuleName;

/// Edges point from a module to the modules it imports
#[derive(Debug, Default)]
pub struct ModuleGraph {
    graph: DiGraph<ModuleName, ()>,
    module_indices: HashMap<ModuleName, NodeIndex>,
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_module(&mut self, module: ModuleName) -> NodeIndex {
        if let Some(&idx) = self.module_indices.get(&module) {
            return idx;
        }
        let idx = self.graph.add_node(module.clone());
        self.module_indices.insert(module, idx);
        idx
    }

    /// Record that `from` imports `to`
    ///
    /// Dependencies on modules that are not part of the graph are assumed to be
    /// resolved already and are ignored.
    pub fn add_dependency(&mut self, from: &ModuleName, to: &ModuleName) {
        if let (Some(&from_idx), Some(&to_idx)) =
            (self.module_indices.get(from), self.module_indices.get(to))
        {
            self.graph.update_edge(from_idx, to_idx, ());
        } else {
            tracing::trace!("ModuleGraph: skipping external dependency {} -> {}", from, to);
        }
    }

    pub fn contains(&self, module: &ModuleName) -> bool {
        self.module_indices.contains_key(module)
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Direct dependencies of `module` that are part of the graph
    pub fn dependencies(&self, module: &ModuleName) -> Vec<ModuleName> {
        self.neighbors(module, Direction::Outgoing)
    }

    /// Direct dependents of `module`
    pub fn dependents(&self, module: &ModuleName) -> Vec<ModuleName> {
        self.neighbors(module, Direction::Incoming)
    }

    fn neighbors(&self, module: &ModuleName, dir: Direction) -> Vec<ModuleName> {
        let Some(&idx) = self.module_indices.get(module) else {
            return Vec::new();
        };
        let mut names: Vec<ModuleName> = self
            .graph
            .neighbors_directed(idx, dir)
            .map(|n| self.graph[n].clone())
            .collect();
        names.sort();
        names
    }

    /// Every module that imports `module` directly or transitively
    pub fn transitive_dependents(&self, module: &ModuleName) -> BTreeSet<ModuleName> {
        let mut found = BTreeSet::new();
        let Some(&start) = self.module_indices.get(module) else {
            return found;
        };
        let reversed = Reversed(&self.graph);
        let mut bfs = Bfs::new(reversed, start);
        while let Some(idx) = bfs.next(reversed) {
            if idx != start {
                found.insert(self.graph[idx].clone());
            }
        }
        found
    }

    /// Group modules into dependency layers, dependencies first
    ///
    /// Names inside a layer are sorted so the result is deterministic.
    pub fn layers(&self) -> Result<Vec<Vec<ModuleName>>, ResolveError> {
        let order = toposort(&self.graph, None).map_err(|_| self.cycle_error())?;

        let mut depth: HashMap<NodeIndex, usize> = HashMap::new();
        for &idx in order.iter().rev() {
            let level = self
                .graph
                .neighbors_directed(idx, Direction::Outgoing)
                .filter_map(|dep| depth.get(&dep))
                .map(|d| d + 1)
                .max()
                .unwrap_or(0);
            depth.insert(idx, level);
        }

        let layer_count = depth.values().max().map_or(0, |d| d + 1);
        let mut layers = vec![Vec::new(); layer_count];
        for (idx, level) in depth {
            layers[level].push(self.graph[idx].clone());
        }
        for layer in &mut layers {
            layer.sort();
        }

        tracing::debug!(
            "ModuleGraph: {} modules in {} layers",
            self.graph.node_count(),
            layers.len()
        );
        Ok(layers)
    }

    fn cycle_error(&self) -> ResolveError {
        let cycle = kosaraju_scc(&self.graph)
            .into_iter()
            .find(|scc| {
                scc.len() > 1 || scc.iter().any(|&idx| self.graph.contains_edge(idx, idx))
            })
            .map(|scc| {
                let mut names: Vec<ModuleName> =
                    scc.into_iter().map(|idx| self.graph[idx].clone()).collect();
                names.sort();
                names
            })
            .unwrap_or_default();
        ResolveError::CircularDependency(cycle)
    }
}
