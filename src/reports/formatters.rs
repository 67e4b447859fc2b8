use crate::reports::QueryReport;
use anyhow::Result;

/// Trait for report formatters
pub trait ReportFormatter {
    fn format(&self, report: &QueryReport) -> Result<String>;
}

/// JSON formatter
pub struct JsonFormatter;

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &QueryReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}

/// YAML formatter
pub struct YamlFormatter;

impl ReportFormatter for YamlFormatter {
    fn format(&self, report: &QueryReport) -> Result<String> {
        Ok(serde_yaml::to_string(report)?)
    }
}

/// Plain text formatter, one node per line
pub struct TextFormatter;

impl ReportFormatter for TextFormatter {
    fn format(&self, report: &QueryReport) -> Result<String> {
        let text = match report {
            QueryReport::Leaves { nodes } | QueryReport::Roots { nodes } => nodes.join("\n"),
            QueryReport::Ancestors { nodes, .. } => nodes.join("\n"),
            QueryReport::Bisect(bisect) => bisect.nodes.join("\n"),
            QueryReport::Statistics(stats) => format!(
                "Nodes: {}\nEdges: {}\nLeaves: {}\nRoots: {}\nAverage degree: {:.2}",
                stats.total_nodes,
                stats.total_edges,
                stats.leaf_nodes,
                stats.root_nodes,
                stats.average_degree
            ),
            QueryReport::Validation { nodes, edges } => {
                format!("Valid DAG: {} nodes, {} edges", nodes, edges)
            }
        };
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BisectReport, GraphStatistics};

    #[test]
    fn test_text_lists_one_node_per_line() {
        let report = QueryReport::Bisect(BisectReport {
            total_nodes: 3,
            best_score: 1,
            nodes: vec!["A".to_string(), "B".to_string()],
        });
        assert_eq!(TextFormatter.format(&report).unwrap(), "A\nB");
    }

    #[test]
    fn test_text_statistics() {
        let report = QueryReport::Statistics(GraphStatistics {
            total_nodes: 8,
            total_edges: 7,
            leaf_nodes: 1,
            root_nodes: 2,
            average_degree: 1.75,
        });
        let text = TextFormatter.format(&report).unwrap();

        assert!(text.contains("Nodes: 8"));
        assert!(text.contains("Average degree: 1.75"));
    }

    #[test]
    fn test_json_and_yaml() {
        let report = QueryReport::Ancestors {
            node: "C".to_string(),
            nodes: vec!["A".to_string(), "B".to_string(), "C".to_string()],
        };

        let json: serde_json::Value =
            serde_json::from_str(&JsonFormatter.format(&report).unwrap()).unwrap();
        assert_eq!(json["query"], "ancestors");
        assert_eq!(json["node"], "C");

        let yaml = YamlFormatter.format(&report).unwrap();
        assert!(yaml.contains("query: ancestors"));
    }
}
