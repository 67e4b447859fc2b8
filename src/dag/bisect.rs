use crate::dag::graph::Dag;
use crate::types::{BisectReport, NodeScore};
use std::collections::HashSet;
use tracing::debug;

/// Bisection over the ancestor relation.
///
/// A node with `a` ancestors (itself included) in a graph of `n` nodes splits
/// it into `a` and `n - a` nodes, and scores `min(a, n - a)`. The best
/// bisection point is whichever node comes closest to an even split; every
/// node tied for the best score is reported.
impl Dag {
    /// Score every node, in declaration order
    pub fn bisect_scores(&self) -> Vec<NodeScore> {
        let total = self.node_count();

        self.ancestor_counts()
            .into_iter()
            .map(|(node, ancestors)| NodeScore {
                node: node.to_string(),
                ancestors,
                score: ancestors.min(total - ancestors),
            })
            .collect()
    }

    /// Determine the bisector nodes for the DAG.
    ///
    /// Empty for an empty graph, otherwise never empty.
    pub fn get_bisect(&self) -> HashSet<String> {
        let (_, nodes) = self.best_nodes();
        nodes.into_iter().collect()
    }

    /// Bisection result with the winning score, nodes sorted by name
    pub fn bisect_report(&self) -> BisectReport {
        let total_nodes = self.node_count();
        let (best_score, mut nodes) = self.best_nodes();
        nodes.sort();

        debug!(
            "Bisection over {} nodes: best score {:?} shared by {} node(s)",
            total_nodes,
            best_score,
            nodes.len()
        );

        BisectReport {
            total_nodes,
            best_score: best_score.unwrap_or(0),
            nodes,
        }
    }

    fn best_nodes(&self) -> (Option<usize>, Vec<String>) {
        let scores = self.bisect_scores();
        let best = scores.iter().map(|entry| entry.score).max();

        let nodes = scores
            .into_iter()
            .filter(|entry| Some(entry.score) == best)
            .map(|entry| entry.node)
            .collect();

        (best, nodes)
    }
}
