use crate::types::Declaration;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Document formats a declaration list can be read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Yaml,
}

impl InputFormat {
    /// Pick the format from a file extension, falling back to YAML
    /// (which also accepts JSON documents).
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .as_deref()
        {
            Some("json") => InputFormat::Json,
            _ => InputFormat::Yaml,
        }
    }
}

impl FromStr for InputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(InputFormat::Json),
            "yaml" | "yml" => Ok(InputFormat::Yaml),
            _ => Err(anyhow::anyhow!("Unsupported input format: {}", s)),
        }
    }
}

/// Parse a list of `{ node, parents }` entries
pub fn parse_declarations(content: &str, format: InputFormat) -> Result<Vec<Declaration>> {
    let declarations: Vec<Declaration> = match format {
        InputFormat::Json => serde_json::from_str(content)
            .with_context(|| "Failed to parse JSON declaration list")?,
        InputFormat::Yaml => serde_yaml::from_str(content)
            .with_context(|| "Failed to parse YAML declaration list")?,
    };

    debug!("Parsed {} declarations", declarations.len());
    Ok(declarations)
}

/// Read and parse a declaration list, inferring the format from the extension
pub fn load_declarations<P: AsRef<Path>>(path: P) -> Result<Vec<Declaration>> {
    let path = path.as_ref();
    debug!("Loading declarations from: {:?}", path);

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read declarations from {:?}", path))?;

    let declarations = parse_declarations(&content, InputFormat::from_path(path))
        .with_context(|| format!("Invalid declaration file {:?}", path))?;

    info!("Loaded {} declarations from {:?}", declarations.len(), path);
    Ok(declarations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const YAML_INPUT: &str = r#"
- node: A
- node: B
  parents: [A]
- node: C
  parents:
    - A
    - B
"#;

    #[test]
    fn test_parse_yaml() {
        let declarations = parse_declarations(YAML_INPUT, InputFormat::Yaml).unwrap();

        assert_eq!(
            declarations,
            vec![
                Declaration::new("A", Vec::<String>::new()),
                Declaration::new("B", ["A"]),
                Declaration::new("C", ["A", "B"]),
            ]
        );
    }

    #[test]
    fn test_parse_json() {
        let input = r#"[{"node": "A", "parents": []}, {"node": "B", "parents": ["A"]}]"#;
        let declarations = parse_declarations(input, InputFormat::Json).unwrap();

        assert_eq!(declarations.len(), 2);
        assert_eq!(declarations[1].parents, vec!["A".to_string()]);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse_declarations("{not json", InputFormat::Json).is_err());
        assert!(parse_declarations("- parents: [A]", InputFormat::Yaml).is_err());
    }

    #[test]
    fn test_format_selection() {
        assert_eq!(InputFormat::from_path("dag.json"), InputFormat::Json);
        assert_eq!(InputFormat::from_path("dag.JSON"), InputFormat::Json);
        assert_eq!(InputFormat::from_path("dag.yml"), InputFormat::Yaml);
        assert_eq!(InputFormat::from_path("dag"), InputFormat::Yaml);
        assert_eq!("yml".parse::<InputFormat>().unwrap(), InputFormat::Yaml);
        assert!("toml".parse::<InputFormat>().is_err());
    }

    #[test]
    fn test_load_declarations_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(YAML_INPUT.as_bytes()).unwrap();

        let declarations = load_declarations(file.path()).unwrap();
        assert_eq!(declarations.len(), 3);
    }

    #[test]
    fn test_load_declarations_missing_file() {
        let err = load_declarations("/nonexistent/dag.yml").unwrap_err();
        assert!(err.to_string().contains("Failed to read declarations"));
    }
}
