pub mod formatters;
pub mod generator;

pub use formatters::{JsonFormatter, ReportFormatter, TextFormatter, YamlFormatter};
pub use generator::ReportGenerator;

use crate::dag::Dag;
use crate::types::{BisectReport, GraphStatistics};
use serde::Serialize;
use std::collections::HashSet;

/// Result of a single CLI query, ready to be rendered
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "query", rename_all = "snake_case")]
pub enum QueryReport {
    Leaves { nodes: Vec<String> },
    Roots { nodes: Vec<String> },
    Ancestors { node: String, nodes: Vec<String> },
    Bisect(BisectReport),
    Statistics(GraphStatistics),
    Validation { nodes: usize, edges: usize },
}

/// Turn a node set into a list, either sorted by name or in declaration order
pub fn order_nodes(dag: &Dag, nodes: &HashSet<String>, sorted: bool) -> Vec<String> {
    if sorted {
        let mut ordered: Vec<String> = nodes.iter().cloned().collect();
        ordered.sort();
        ordered
    } else {
        dag.nodes()
            .filter(|node| nodes.contains(*node))
            .map(str::to_string)
            .collect()
    }
}
