use crate::config::OutputFormat;
use crate::reports::formatters::{JsonFormatter, ReportFormatter, TextFormatter, YamlFormatter};
use crate::reports::QueryReport;
use anyhow::Result;

/// Report generator for creating various output formats
#[derive(Default)]
pub struct ReportGenerator;

impl ReportGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate report in the specified format
    pub fn generate(&self, report: &QueryReport, format: OutputFormat) -> Result<String> {
        let formatter: &dyn ReportFormatter = match format {
            OutputFormat::Text => &TextFormatter,
            OutputFormat::Json => &JsonFormatter,
            OutputFormat::Yaml => &YamlFormatter,
        };
        formatter.format(report)
    }
}
