//! Config parser: converts raw JSON/YAML text into [`WorkflowConfig`].

use crate::error::EngineError;

use super::config::WorkflowConfig;

/// Supported configuration input formats.
#[derive(Debug, Clone, Copy)]
pub enum ConfigFormat {
    /// JSON format (`.json`).
    Json,
    /// YAML format (`.yaml` / `.yml`).
    Yaml,
}

/// Parse configuration content into a [`WorkflowConfig`].
pub fn parse_config(content: &str, format: ConfigFormat) -> Result<WorkflowConfig, EngineError> {
    match format {
        ConfigFormat::Json => serde_json::from_str(content)
            .map_err(|e| EngineError::ConfigParseError(e.to_string())),
        ConfigFormat::Yaml => serde_yaml::from_str(content)
            .map_err(|e| EngineError::ConfigParseError(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json() {
        let json = r#"{
            "name": "po_approval",
            "nodes": [
                {"id": "n0", "system": "initial"},
                {"id": "n1", "name": "Review",
                 "collaboration": {"mode": "out_form", "employees": ["emp-1"]}}
            ],
            "associations": [
                {"from": "n0", "to": "n1", "condition": []}
            ]
        }"#;
        let config = parse_config(json, ConfigFormat::Json).unwrap();
        assert_eq!(config.name, "po_approval");
        assert_eq!(config.nodes.len(), 2);
        assert_eq!(config.associations.len(), 1);
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
name: po_approval
zone_scoped: true
zones:
  - id: z1
    name: Header
    properties: [amount, supplier]
nodes:
  - id: n0
    system: initial
  - id: n1
    name: Review
    collaboration:
      mode: in_form
      property: approver
      zone: [z1]
associations:
  - from: n0
    to: n1
"#;
        let config = parse_config(yaml, ConfigFormat::Yaml).unwrap();
        assert!(config.zone_scoped);
        assert_eq!(config.zones.len(), 1);
        assert_eq!(config.zones[0].properties, vec!["amount", "supplier"]);
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(parse_config("{{{bad", ConfigFormat::Json).is_err());
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let bad = "name: x\nnodes: { unclosed";
        assert!(parse_config(bad, ConfigFormat::Yaml).is_err());
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_config("", ConfigFormat::Json).is_err());
        assert!(parse_config("", ConfigFormat::Yaml).is_err());
    }
}
