//! ProductGraph - the immutable product dependency graph.
//!
//! Built once from validated configuration. Construction rejects unknown
//! dependency references and cycles, so every query afterwards operates on a
//! DAG.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};

use crate::core::ProductId;
use crate::resolver::errors::ResolveError;

/// Dependency graph over the products of a project.
///
/// An edge `a -> b` means "a depends on b".
#[derive(Debug, Clone)]
pub struct ProductGraph {
    graph: DiGraph<ProductId, ()>,

    /// Node index per product, in lexical order
    nodes: BTreeMap<ProductId, NodeIndex>,

    /// Declared direct dependencies, duplicates removed, declaration order kept
    deps: BTreeMap<ProductId, Vec<ProductId>>,
}

impl ProductGraph {
    /// Build the graph from `(product, declared dependencies)` pairs.
    pub fn new<'a, I>(products: I) -> Result<Self, ResolveError>
    where
        I: IntoIterator<Item = (&'a ProductId, &'a [ProductId])>,
    {
        let mut deps: BTreeMap<ProductId, Vec<ProductId>> = BTreeMap::new();
        for (id, declared) in products {
            let mut seen = HashSet::new();
            let unique = declared
                .iter()
                .filter(|dep| seen.insert(*dep))
                .cloned()
                .collect();
            deps.insert(id.clone(), unique);
        }

        let mut graph = DiGraph::new();
        let mut nodes = BTreeMap::new();
        for id in deps.keys() {
            nodes.insert(id.clone(), graph.add_node(id.clone()));
        }

        for (id, declared) in &deps {
            for dep in declared {
                let Some(&to) = nodes.get(dep) else {
                    return Err(ResolveError::UnknownDependency {
                        product: dep.to_string(),
                        referrer: id.to_string(),
                    });
                };
                graph.add_edge(nodes[id], to, ());
            }
        }

        let product_graph = ProductGraph { graph, nodes, deps };
        product_graph.check_acyclic()?;
        Ok(product_graph)
    }

    /// Direct dependencies of a product, in declared order.
    pub fn dependencies(&self, id: &ProductId) -> &[ProductId] {
        self.deps.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Check if a product is in the graph.
    pub fn contains(&self, id: &ProductId) -> bool {
        self.nodes.contains_key(id)
    }

    /// All product IDs in lexical order.
    pub fn product_ids(&self) -> impl Iterator<Item = &ProductId> {
        self.nodes.keys()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Processing order for `requested` (empty = every product).
    ///
    /// The transitive dependencies of requested products are always included.
    /// Every dependency precedes its dependents; products at the same depth
    /// appear in lexical order.
    pub fn order(&self, requested: &[ProductId]) -> Result<Vec<ProductId>, ResolveError> {
        Ok(self.levels(requested)?.into_iter().flatten().collect())
    }

    /// Processing order grouped by depth.
    ///
    /// Level 0 holds products without dependencies; a product at level `n`
    /// depends only on products at levels below `n`. Products within one
    /// level are mutually independent.
    pub fn levels(&self, requested: &[ProductId]) -> Result<Vec<Vec<ProductId>>, ResolveError> {
        let closure = self.closure(requested)?;

        let topo = toposort(&self.graph, None).map_err(|_| self.cycle_error())?;

        // Reverse topological order visits dependencies before dependents.
        let mut depth: HashMap<NodeIndex, usize> = HashMap::new();
        for &node in topo.iter().rev() {
            if !closure.contains(&self.graph[node]) {
                continue;
            }
            let d = self
                .graph
                .neighbors(node)
                .filter_map(|dep| depth.get(&dep))
                .map(|d| d + 1)
                .max()
                .unwrap_or(0);
            depth.insert(node, d);
        }

        let mut levels: BTreeMap<usize, Vec<ProductId>> = BTreeMap::new();
        for id in &closure {
            let node = self.nodes[id];
            levels.entry(depth[&node]).or_default().push(id.clone());
        }

        Ok(levels.into_values().collect())
    }

    /// Requested products plus everything they transitively depend on.
    fn closure(&self, requested: &[ProductId]) -> Result<BTreeSet<ProductId>, ResolveError> {
        if requested.is_empty() {
            return Ok(self.nodes.keys().cloned().collect());
        }

        let mut visited = BTreeSet::new();
        let mut stack = Vec::new();

        for id in requested {
            if !self.contains(id) {
                return Err(ResolveError::UnknownProduct {
                    product: id.to_string(),
                    available: self.nodes.keys().map(|p| p.to_string()).collect(),
                });
            }
            stack.push(id.clone());
        }

        while let Some(current) = stack.pop() {
            if visited.insert(current.clone()) {
                stack.extend(self.dependencies(&current).iter().cloned());
            }
        }

        Ok(visited)
    }

    fn check_acyclic(&self) -> Result<(), ResolveError> {
        match toposort(&self.graph, None) {
            Ok(_) => Ok(()),
            Err(_) => Err(self.cycle_error()),
        }
    }

    fn cycle_error(&self) -> ResolveError {
        let component = tarjan_scc(&self.graph)
            .into_iter()
            .find(|scc| {
                scc.len() > 1 || self.graph.contains_edge(scc[0], scc[0])
            })
            .unwrap_or_default();

        let members: BTreeSet<ProductId> = component
            .iter()
            .map(|&node| self.graph[node].clone())
            .collect();

        ResolveError::CyclicDependency {
            cycle: self
                .cycle_path(&members)
                .iter()
                .map(|id| id.to_string())
                .collect(),
        }
    }

    /// A closed path through the strongly connected `members`, starting and
    /// ending at the lexically smallest member.
    fn cycle_path(&self, members: &BTreeSet<ProductId>) -> Vec<ProductId> {
        let Some(start) = members.iter().next() else {
            return Vec::new();
        };

        let mut path = vec![start.clone()];
        let mut visited = HashSet::new();
        visited.insert(start.clone());

        if self.walk_cycle(start, start, members, &mut visited, &mut path) {
            path
        } else {
            members.iter().cloned().collect()
        }
    }

    fn walk_cycle(
        &self,
        current: &ProductId,
        start: &ProductId,
        members: &BTreeSet<ProductId>,
        visited: &mut HashSet<ProductId>,
        path: &mut Vec<ProductId>,
    ) -> bool {
        for dep in self.dependencies(current) {
            if !members.contains(dep) {
                continue;
            }
            if dep == start {
                path.push(dep.clone());
                return true;
            }
            if visited.insert(dep.clone()) {
                path.push(dep.clone());
                if self.walk_cycle(dep, start, members, visited, path) {
                    return true;
                }
                path.pop();
            }
        }
        false
    }
}
