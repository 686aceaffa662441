//! Structural validation of a [`WorkflowConfig`].
//!
//! Validation happens before graph construction.  Errors make the config
//! unusable; warnings (dangling zone references, malformed conditions) are
//! reported but the workflow still builds with fail-closed defaults.

use std::collections::HashSet;

use crate::condition::parse_condition;

use super::config::{
    CollaborationConfig, InWorkflowEntryConfig, WorkflowConfig, INITIAL_NODE_CODE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Error,
    Warning,
}

/// One validation finding.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub code: &'static str,
    pub message: String,
}

impl Diagnostic {
    fn error(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Error,
            code,
            message: message.into(),
        }
    }

    fn warning(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Warning,
            code,
            message: message.into(),
        }
    }
}

/// Outcome of validating one workflow config.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.level == DiagnosticLevel::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.level == DiagnosticLevel::Warning)
    }
}

/// Validate structure, topology and references of a workflow config.
pub fn validate_config(config: &WorkflowConfig) -> ValidationReport {
    let mut diagnostics = Vec::new();

    check_nodes(config, &mut diagnostics);
    check_zones(config, &mut diagnostics);
    check_associations(config, &mut diagnostics);
    check_collaborations(config, &mut diagnostics);

    let is_valid = !diagnostics
        .iter()
        .any(|d| d.level == DiagnosticLevel::Error);
    ValidationReport {
        is_valid,
        diagnostics,
    }
}

fn check_nodes(config: &WorkflowConfig, diagnostics: &mut Vec<Diagnostic>) {
    let mut seen = HashSet::new();
    for node in &config.nodes {
        if !seen.insert(node.id.as_str()) {
            diagnostics.push(Diagnostic::error(
                "duplicate-node-id",
                format!("node id '{}' appears more than once", node.id),
            ));
        }
    }

    let initial_count = config
        .nodes
        .iter()
        .filter(|n| n.system.as_deref() == Some(INITIAL_NODE_CODE))
        .count();
    if initial_count == 0 {
        diagnostics.push(Diagnostic::error(
            "no-initial-node",
            "workflow has no initial system node",
        ));
    } else if initial_count > 1 {
        diagnostics.push(Diagnostic::error(
            "multiple-initial-nodes",
            "workflow has more than one initial system node",
        ));
    }

    for node in &config.nodes {
        let is_system = node.system.is_some();
        match (&node.collaboration, is_system) {
            (None, false) => diagnostics.push(Diagnostic::error(
                "missing-collaboration",
                format!("non-system node '{}' has no collaboration mode", node.id),
            )),
            (Some(_), true) => diagnostics.push(Diagnostic::error(
                "system-node-collaboration",
                format!("system node '{}' must not carry a collaboration mode", node.id),
            )),
            _ => {}
        }
    }
}

fn check_zones(config: &WorkflowConfig, diagnostics: &mut Vec<Diagnostic>) {
    let mut seen = HashSet::new();
    for zone in &config.zones {
        if !seen.insert(zone.id.as_str()) {
            diagnostics.push(Diagnostic::error(
                "duplicate-zone-id",
                format!("zone id '{}' appears more than once", zone.id),
            ));
        }
    }
}

fn check_associations(config: &WorkflowConfig, diagnostics: &mut Vec<Diagnostic>) {
    let node_ids: HashSet<&str> = config.nodes.iter().map(|n| n.id.as_str()).collect();
    let initial_id = config
        .nodes
        .iter()
        .find(|n| n.system.as_deref() == Some(INITIAL_NODE_CODE))
        .map(|n| n.id.as_str());

    for assoc in &config.associations {
        for endpoint in [&assoc.from, &assoc.to] {
            if !node_ids.contains(endpoint.as_str()) {
                diagnostics.push(Diagnostic::error(
                    "dangling-association",
                    format!(
                        "association '{} -> {}' references unknown node '{}'",
                        assoc.from, assoc.to, endpoint
                    ),
                ));
            }
        }
        if Some(assoc.to.as_str()) == initial_id {
            diagnostics.push(Diagnostic::error(
                "initial-node-target",
                format!(
                    "association '{} -> {}' targets the initial node; the entry point is never re-entered",
                    assoc.from, assoc.to
                ),
            ));
        }
        if let Err(e) = parse_condition(&assoc.condition) {
            diagnostics.push(Diagnostic::warning(
                "malformed-condition",
                format!(
                    "association '{} -> {}' has a malformed condition ({e}); it will never be taken",
                    assoc.from, assoc.to
                ),
            ));
        }
    }
}

fn check_collaborations(config: &WorkflowConfig, diagnostics: &mut Vec<Diagnostic>) {
    let zone_ids: HashSet<&str> = config.zones.iter().map(|z| z.id.as_str()).collect();

    for node in &config.nodes {
        match &node.collaboration {
            Some(CollaborationConfig::InForm {
                zone, zone_hidden, ..
            }) => {
                check_zone_refs(&zone_ids, &node.id, zone, diagnostics);
                check_zone_refs(&zone_ids, &node.id, zone_hidden, diagnostics);
            }
            Some(CollaborationConfig::OutForm {
                employees,
                zone,
                zone_hidden,
                ..
            }) => {
                check_zone_refs(&zone_ids, &node.id, zone, diagnostics);
                check_zone_refs(&zone_ids, &node.id, zone_hidden, diagnostics);
                if employees.is_empty() {
                    diagnostics.push(Diagnostic::warning(
                        "empty-employee-list",
                        format!("node '{}' has an out_form mode with no employees", node.id),
                    ));
                }
            }
            Some(CollaborationConfig::InWorkflow { entries }) => {
                for entry in entries {
                    let (zone, zone_hidden) = match entry {
                        InWorkflowEntryConfig::Position {
                            zone, zone_hidden, ..
                        }
                        | InWorkflowEntryConfig::Employee {
                            zone, zone_hidden, ..
                        }
                        | InWorkflowEntryConfig::PreviousActor { zone, zone_hidden } => {
                            (zone, zone_hidden)
                        }
                    };
                    check_zone_refs(&zone_ids, &node.id, zone, diagnostics);
                    check_zone_refs(&zone_ids, &node.id, zone_hidden, diagnostics);
                }
            }
            None => {}
        }
    }
}

fn check_zone_refs(
    zone_ids: &HashSet<&str>,
    node_id: &str,
    refs: &[String],
    diagnostics: &mut Vec<Diagnostic>,
) {
    for id in refs {
        if !zone_ids.contains(id.as_str()) {
            diagnostics.push(Diagnostic::warning(
                "unknown-zone",
                format!("node '{node_id}' references unknown zone '{id}'"),
            ));
        }
    }
}
