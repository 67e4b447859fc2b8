use crate::error::{DagError, DagResult};
use crate::types::{Declaration, GraphStatistics};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

type AncestorCache = HashMap<NodeIndex, HashSet<NodeIndex>>;

/// Directed acyclic graph built from a topologically ordered declaration list.
///
/// Edges point from parent to child. Node indices follow declaration order and
/// edge indices follow edge declaration order, which is what keeps parent and
/// child lists in the order they were declared.
///
/// The graph is immutable once built. Ancestor sets are memoized behind a
/// lock, so a `Dag` can be shared between threads and queried concurrently.
#[derive(Debug)]
pub struct Dag {
    graph: DiGraph<String, ()>,
    node_map: HashMap<String, NodeIndex>,
    ancestors: RwLock<AncestorCache>,
}

impl Dag {
    /// Build a DAG from `(node, parents)` declarations.
    ///
    /// Every parent must have been declared by an earlier entry. The first
    /// violation aborts construction and nothing is returned but the error.
    ///
    /// # Errors
    ///
    /// * [`DagError::InvalidInput`] when a parent is not declared before its child
    ///   (this includes a node naming itself as parent).
    /// * [`DagError::DuplicateNode`] when a node is declared twice.
    pub fn new<I, D>(declarations: I) -> DagResult<Self>
    where
        I: IntoIterator<Item = D>,
        D: Into<Declaration>,
    {
        let mut graph = DiGraph::new();
        let mut node_map: HashMap<String, NodeIndex> = HashMap::new();

        for declaration in declarations {
            let Declaration { node, parents } = declaration.into();

            if node_map.contains_key(&node) {
                return Err(DagError::DuplicateNode(node));
            }

            // Parents are resolved before the node is registered so a self
            // reference can never create a loop.
            let parent_indices = parents
                .iter()
                .map(|parent| {
                    node_map
                        .get(parent)
                        .copied()
                        .ok_or_else(|| DagError::InvalidInput {
                            node: node.clone(),
                            parent: parent.clone(),
                        })
                })
                .collect::<DagResult<Vec<_>>>()?;

            let node_index = graph.add_node(node.clone());
            for parent_index in parent_indices {
                graph.add_edge(parent_index, node_index, ());
            }
            node_map.insert(node, node_index);
        }

        debug!(
            "Built DAG with {} nodes and {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        Ok(Self {
            graph,
            node_map,
            ancestors: RwLock::new(HashMap::new()),
        })
    }

    /// Get the number of nodes in the graph
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get the number of edges in the graph
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains(&self, node: &str) -> bool {
        self.node_map.contains_key(node)
    }

    /// Iterate over node identifiers in declaration order
    pub fn nodes(&self) -> impl Iterator<Item = &str> + '_ {
        self.graph
            .node_indices()
            .map(move |index| self.graph[index].as_str())
    }

    /// Direct parents of a node, in the order they were declared
    pub fn parents(&self, node: &str) -> DagResult<Vec<String>> {
        let index = self.index_of(node)?;
        Ok(self.ordered_neighbors(index, Direction::Incoming))
    }

    /// Direct children of a node, in the order the children were declared
    pub fn children(&self, node: &str) -> DagResult<Vec<String>> {
        let index = self.index_of(node)?;
        Ok(self.ordered_neighbors(index, Direction::Outgoing))
    }

    /// Forward adjacency: every node mapped to its declared parents
    pub fn graph(&self) -> HashMap<String, Vec<String>> {
        self.adjacency(Direction::Incoming)
    }

    /// Inverted adjacency: every node mapped to the children that declared it
    pub fn inverted(&self) -> HashMap<String, Vec<String>> {
        self.adjacency(Direction::Outgoing)
    }

    /// Collect leaf nodes (nodes no other node depends on)
    pub fn get_leaves(&self) -> HashSet<String> {
        self.nodes_without(Direction::Outgoing)
    }

    /// Collect root nodes (nodes declared with no parents)
    pub fn get_roots(&self) -> HashSet<String> {
        self.nodes_without(Direction::Incoming)
    }

    /// Collect the ancestors of `node`, the node itself included.
    ///
    /// The first query for a node memoizes its set along with the set of every
    /// ancestor resolved on the way; later queries are served from the cache.
    pub fn get_ancestors(&self, node: &str) -> DagResult<HashSet<String>> {
        let index = self.index_of(node)?;
        Ok(self.with_ancestors(index, |ancestors| {
            ancestors
                .iter()
                .map(|&ancestor| self.graph[ancestor].clone())
                .collect()
        }))
    }

    /// Size of the ancestor set of `node`, the node itself included
    pub fn ancestor_count(&self, node: &str) -> DagResult<usize> {
        let index = self.index_of(node)?;
        Ok(self.with_ancestors(index, HashSet::len))
    }

    /// Whether `ancestor` is reachable from `node` through parent links.
    /// Every node is its own ancestor.
    pub fn is_ancestor(&self, ancestor: &str, node: &str) -> DagResult<bool> {
        let ancestor_index = self.index_of(ancestor)?;
        let node_index = self.index_of(node)?;
        Ok(self.with_ancestors(node_index, |ancestors| {
            ancestors.contains(&ancestor_index)
        }))
    }

    /// Collect the descendants of `node`, the node itself included
    pub fn get_descendants(&self, node: &str) -> DagResult<HashSet<String>> {
        let start = self.index_of(node)?;

        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();

        queue.push_back(start);
        visited.insert(start);

        while let Some(current) = queue.pop_front() {
            for child in self.graph.neighbors_directed(current, Direction::Outgoing) {
                if visited.insert(child) {
                    queue.push_back(child);
                }
            }
        }

        debug!("Found {} descendants for node {}", visited.len(), node);
        Ok(visited
            .into_iter()
            .map(|index| self.graph[index].clone())
            .collect())
    }

    /// Number of nodes whose ancestor set is currently memoized
    pub fn cached_nodes(&self) -> usize {
        self.read_cache().len()
    }

    /// Get graph statistics
    pub fn statistics(&self) -> GraphStatistics {
        let total_nodes = self.node_count();
        let total_edges = self.edge_count();

        // Each edge adds one to an in-degree and one to an out-degree
        let average_degree = if total_nodes > 0 {
            (2 * total_edges) as f64 / total_nodes as f64
        } else {
            0.0
        };

        GraphStatistics {
            total_nodes,
            total_edges,
            leaf_nodes: self.get_leaves().len(),
            root_nodes: self.get_roots().len(),
            average_degree,
        }
    }

    /// Ancestor set sizes for every node, in declaration order
    pub(super) fn ancestor_counts(&self) -> Vec<(&str, usize)> {
        self.graph
            .node_indices()
            .map(|index| {
                (
                    self.graph[index].as_str(),
                    self.with_ancestors(index, HashSet::len),
                )
            })
            .collect()
    }

    fn index_of(&self, node: &str) -> DagResult<NodeIndex> {
        self.node_map
            .get(node)
            .copied()
            .ok_or_else(|| DagError::NodeNotFound(node.to_string()))
    }

    fn ordered_neighbors(&self, index: NodeIndex, direction: Direction) -> Vec<String> {
        let mut edges: Vec<_> = self.graph.edges_directed(index, direction).collect();
        edges.sort_by_key(|edge| edge.id());

        edges
            .into_iter()
            .map(|edge| match direction {
                Direction::Incoming => self.graph[edge.source()].clone(),
                Direction::Outgoing => self.graph[edge.target()].clone(),
            })
            .collect()
    }

    fn adjacency(&self, direction: Direction) -> HashMap<String, Vec<String>> {
        self.graph
            .node_indices()
            .map(|index| {
                (
                    self.graph[index].clone(),
                    self.ordered_neighbors(index, direction),
                )
            })
            .collect()
    }

    fn nodes_without(&self, direction: Direction) -> HashSet<String> {
        self.graph
            .node_indices()
            .filter(|&index| {
                self.graph
                    .neighbors_directed(index, direction)
                    .next()
                    .is_none()
            })
            .map(|index| self.graph[index].clone())
            .collect()
    }

    /// Run `f` against the memoized ancestor set of `target`, filling the cache
    /// first if needed. The fill runs under the write lock so concurrent
    /// queries never store a partial set.
    fn with_ancestors<R>(&self, target: NodeIndex, f: impl FnOnce(&HashSet<NodeIndex>) -> R) -> R {
        {
            let cache = self.read_cache();
            if let Some(ancestors) = cache.get(&target) {
                return f(ancestors);
            }
        }

        let mut cache = self.write_cache();
        self.fill_ancestors(&mut cache, target);
        f(&cache[&target])
    }

    /// Post-order walk over the parent relation with an explicit stack. A node
    /// is resolved once all of its parents are cached, so each node's set is
    /// built exactly once for the lifetime of the graph.
    fn fill_ancestors(&self, cache: &mut AncestorCache, target: NodeIndex) {
        let mut stack = vec![target];
        let mut filled = 0usize;

        while let Some(&current) = stack.last() {
            if cache.contains_key(&current) {
                stack.pop();
                continue;
            }

            let pending: Vec<NodeIndex> = self
                .graph
                .neighbors_directed(current, Direction::Incoming)
                .filter(|parent| !cache.contains_key(parent))
                .collect();
            if !pending.is_empty() {
                stack.extend(pending);
                continue;
            }

            let mut ancestors = HashSet::from([current]);
            for parent in self.graph.neighbors_directed(current, Direction::Incoming) {
                ancestors.extend(cache[&parent].iter().copied());
            }
            cache.insert(current, ancestors);
            stack.pop();
            filled += 1;
        }

        if filled > 0 {
            debug!(
                "Memoized ancestors for {} nodes while resolving {}",
                filled, self.graph[target]
            );
        }
    }

    // Entries are only inserted once complete, so a poisoned lock still guards
    // a consistent cache.
    fn read_cache(&self) -> RwLockReadGuard<'_, AncestorCache> {
        self.ancestors.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_cache(&self) -> RwLockWriteGuard<'_, AncestorCache> {
        self.ancestors.write().unwrap_or_else(PoisonError::into_inner)
    }
}
