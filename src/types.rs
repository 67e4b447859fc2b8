use serde::{Deserialize, Serialize};

/// Core value types shared by the graph, the loader and the reports

/// One entry of a topologically ordered input list: a node and the
/// parents it depends on, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub node: String,
    #[serde(default)]
    pub parents: Vec<String>,
}

impl Declaration {
    pub fn new<N, P, I>(node: N, parents: I) -> Self
    where
        N: Into<String>,
        P: Into<String>,
        I: IntoIterator<Item = P>,
    {
        Self {
            node: node.into(),
            parents: parents.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }
}

impl<N, P> From<(N, Vec<P>)> for Declaration
where
    N: Into<String>,
    P: Into<String>,
{
    fn from((node, parents): (N, Vec<P>)) -> Self {
        Declaration::new(node, parents)
    }
}

impl<N, P, const K: usize> From<(N, [P; K])> for Declaration
where
    N: Into<String>,
    P: Into<String>,
{
    fn from((node, parents): (N, [P; K])) -> Self {
        Declaration::new(node, parents)
    }
}

/// Bisection score of a single node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeScore {
    pub node: String,
    /// Size of the node's ancestor set, the node itself included
    pub ancestors: usize,
    /// `min(ancestors, total_nodes - ancestors)`
    pub score: usize,
}

/// Outcome of a bisection query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BisectReport {
    pub total_nodes: usize,
    pub best_score: usize,
    /// Every node scoring `best_score`, sorted
    pub nodes: Vec<String>,
}

impl BisectReport {
    pub fn is_tie(&self) -> bool {
        self.nodes.len() > 1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphStatistics {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub leaf_nodes: usize,
    pub root_nodes: usize,
    pub average_degree: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_from_tuples() {
        let from_vec: Declaration = ("C", vec!["A", "B"]).into();
        let from_array: Declaration = ("C", ["A", "B"]).into();
        let empty: Declaration = ("A", Vec::<String>::new()).into();

        assert_eq!(from_vec, from_array);
        assert_eq!(from_vec.parents, vec!["A".to_string(), "B".to_string()]);
        assert!(empty.is_root());
        assert!(!from_vec.is_root());
    }

    #[test]
    fn test_declaration_parents_default_to_empty() {
        let declaration: Declaration = serde_json::from_str(r#"{"node": "A"}"#).unwrap();
        assert_eq!(declaration, Declaration::new("A", Vec::<String>::new()));
    }

    #[test]
    fn test_bisect_report_tie() {
        let report = BisectReport {
            total_nodes: 3,
            best_score: 1,
            nodes: vec!["A".to_string(), "B".to_string()],
        };
        assert!(report.is_tie());
    }
}
