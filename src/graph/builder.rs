//! Workflow definition - the immutable graph built from a validated config.

use std::collections::HashMap;

use petgraph::stable_graph::{NodeIndex, StableDiGraph};

use crate::condition::{parse_condition, ConditionExpr};
use crate::error::{ConfigWarning, EngineError, WarningCode};
use crate::schema::{
    validate_config, CollaborationConfig, InWorkflowEntryConfig, PositionRuleConfig,
    WorkflowConfig, DEFAULT_ADVANCE_ACTION, INITIAL_NODE_CODE,
};
use crate::zone::{Zone, ZoneCatalog};

use super::types::*;

/// An immutable workflow template: nodes, zones, and condition-gated
/// associations.  Built once from a [`WorkflowConfig`]; runtimes reference
/// it read-only.
#[derive(Debug)]
pub struct WorkflowDefinition {
    pub id: String,
    pub name: String,
    pub multi_company: bool,
    pub zone_scoped: bool,
    /// Action name that triggers a stage advance.
    pub advance_action: String,
    /// Associations in creation order; traversal picks the first satisfied
    /// one, so this order is load-bearing.
    associations: Vec<Association>,
    graph: StableDiGraph<Node, usize>,
    node_index_map: HashMap<String, NodeIndex>,
    initial_id: String,
    zones: ZoneCatalog,
    /// Non-fatal problems found while building (malformed conditions).
    warnings: Vec<ConfigWarning>,
}

impl WorkflowDefinition {
    pub fn get_node(&self, node_id: &str) -> Result<&Node, EngineError> {
        let idx = self
            .node_index_map
            .get(node_id)
            .ok_or_else(|| EngineError::NodeNotFound(node_id.to_string()))?;
        self.graph
            .node_weight(*idx)
            .ok_or_else(|| EngineError::NodeNotFound(node_id.to_string()))
    }

    pub fn initial_node(&self) -> &Node {
        // The builder guarantees the initial node exists.
        self.graph
            .node_weight(self.node_index_map[&self.initial_id])
            .expect("initial node present by construction")
    }

    /// Outgoing associations of a node, in creation order.
    pub fn associations_from(&self, node_id: &str) -> Vec<&Association> {
        self.associations
            .iter()
            .filter(|a| a.from == node_id)
            .collect()
    }

    pub fn associations(&self) -> &[Association] {
        &self.associations
    }

    pub fn zones(&self) -> &ZoneCatalog {
        &self.zones
    }

    pub fn build_warnings(&self) -> &[ConfigWarning] {
        &self.warnings
    }

    /// Successor node ids, for diagram rendering.
    pub fn get_successors(&self, node_id: &str) -> Result<Vec<String>, EngineError> {
        let idx = self
            .node_index_map
            .get(node_id)
            .ok_or_else(|| EngineError::NodeNotFound(node_id.to_string()))?;
        Ok(self
            .graph
            .neighbors_directed(*idx, petgraph::Direction::Outgoing)
            .filter_map(|n| self.graph.node_weight(n).map(|node| node.id.clone()))
            .collect())
    }

    /// Predecessor node ids, for diagram rendering.
    pub fn get_predecessors(&self, node_id: &str) -> Result<Vec<String>, EngineError> {
        let idx = self
            .node_index_map
            .get(node_id)
            .ok_or_else(|| EngineError::NodeNotFound(node_id.to_string()))?;
        Ok(self
            .graph
            .neighbors_directed(*idx, petgraph::Direction::Incoming)
            .filter_map(|n| self.graph.node_weight(n).map(|node| node.id.clone()))
            .collect())
    }
}

/// Build a [`WorkflowDefinition`] from a config.
///
/// Validation errors abort the build; warnings (malformed conditions,
/// dangling zone references) are retained on the definition with the
/// offending condition compiled to the never-taken form.
pub fn build_definition(config: &WorkflowConfig) -> Result<WorkflowDefinition, EngineError> {
    let report = validate_config(config);
    if !report.is_valid {
        return Err(EngineError::ValidationFailed(Box::new(report)));
    }

    let mut warnings = Vec::new();
    let mut graph = StableDiGraph::<Node, usize>::new();
    let mut node_index_map: HashMap<String, NodeIndex> = HashMap::new();

    let mut zones = ZoneCatalog::new();
    for zone in &config.zones {
        zones.insert(Zone {
            id: zone.id.clone(),
            name: zone.name.clone(),
            properties: zone.properties.clone(),
        });
    }

    let mut initial_id = None;
    for node_config in &config.nodes {
        let kind = match (&node_config.system, &node_config.collaboration) {
            (Some(code), _) => {
                if code == INITIAL_NODE_CODE {
                    initial_id = Some(node_config.id.clone());
                }
                NodeKind::System { code: code.clone() }
            }
            (None, Some(collab)) => NodeKind::Stage {
                collaboration: convert_collaboration(collab),
            },
            // Rejected by validation already.
            (None, None) => {
                return Err(EngineError::GraphBuildError(format!(
                    "node '{}' has neither system code nor collaboration",
                    node_config.id
                )))
            }
        };
        let node = Node {
            id: node_config.id.clone(),
            name: if node_config.name.is_empty() {
                node_config.id.clone()
            } else {
                node_config.name.clone()
            },
            kind,
        };
        let idx = graph.add_node(node);
        node_index_map.insert(node_config.id.clone(), idx);
    }

    let initial_id = initial_id.ok_or_else(|| {
        EngineError::GraphBuildError("no initial system node after validation".into())
    })?;

    let mut associations = Vec::with_capacity(config.associations.len());
    for (position, assoc_config) in config.associations.iter().enumerate() {
        let condition = match parse_condition(&assoc_config.condition) {
            Ok(expr) => expr,
            Err(e) => {
                let warning = ConfigWarning::new(
                    WarningCode::MalformedCondition,
                    format!(
                        "association '{} -> {}': {e}; compiled as never-taken",
                        assoc_config.from, assoc_config.to
                    ),
                );
                tracing::warn!(
                    workflow = %config.name,
                    from = %assoc_config.from,
                    to = %assoc_config.to,
                    error = %e,
                    "malformed condition compiled as never-taken"
                );
                warnings.push(warning);
                ConditionExpr::Never
            }
        };

        let from_idx = node_index_map[&assoc_config.from];
        let to_idx = node_index_map[&assoc_config.to];
        let from_name = graph[from_idx].name.clone();
        let to_name = graph[to_idx].name.clone();

        let association = Association {
            id: if assoc_config.id.is_empty() {
                format!("assoc-{position}")
            } else {
                assoc_config.id.clone()
            },
            from: assoc_config.from.clone(),
            to: assoc_config.to.clone(),
            condition,
            endpoints: EndpointSnapshot {
                from_id: assoc_config.from.clone(),
                from_name,
                to_id: assoc_config.to.clone(),
                to_name,
            },
        };
        graph.add_edge(from_idx, to_idx, position);
        associations.push(association);
    }

    Ok(WorkflowDefinition {
        id: uuid::Uuid::new_v4().to_string(),
        name: config.name.clone(),
        multi_company: config.multi_company,
        zone_scoped: config.zone_scoped,
        advance_action: config
            .advance_action
            .clone()
            .unwrap_or_else(|| DEFAULT_ADVANCE_ACTION.to_string()),
        associations,
        graph,
        node_index_map,
        initial_id,
        zones,
        warnings,
    })
}

fn convert_collaboration(config: &CollaborationConfig) -> Collaboration {
    match config {
        CollaborationConfig::InForm {
            property,
            zone,
            zone_hidden,
        } => Collaboration::InForm {
            property: property.clone(),
            scope: ZoneRefs {
                zone: zone.clone(),
                zone_hidden: zone_hidden.clone(),
            },
        },
        CollaborationConfig::OutForm {
            employees,
            zone,
            zone_hidden,
            edit_all,
        } => Collaboration::OutForm {
            employees: employees.clone(),
            scope: ZoneRefs {
                zone: zone.clone(),
                zone_hidden: zone_hidden.clone(),
            },
            edit_all: *edit_all,
        },
        CollaborationConfig::InWorkflow { entries } => Collaboration::InWorkflow {
            entries: entries.iter().map(convert_entry).collect(),
        },
    }
}

fn convert_entry(config: &InWorkflowEntryConfig) -> InWorkflowEntry {
    match config {
        InWorkflowEntryConfig::Position {
            rule,
            zone,
            zone_hidden,
        } => InWorkflowEntry {
            source: ActorSource::Position(match rule {
                PositionRuleConfig::DirectManagerOfCreator => PositionRule::DirectManagerOfCreator,
                PositionRuleConfig::Holder { position } => PositionRule::Holder(position.clone()),
            }),
            scope: ZoneRefs {
                zone: zone.clone(),
                zone_hidden: zone_hidden.clone(),
            },
        },
        InWorkflowEntryConfig::Employee {
            employee,
            zone,
            zone_hidden,
        } => InWorkflowEntry {
            source: ActorSource::Employee(employee.clone()),
            scope: ZoneRefs {
                zone: zone.clone(),
                zone_hidden: zone_hidden.clone(),
            },
        },
        InWorkflowEntryConfig::PreviousActor { zone, zone_hidden } => InWorkflowEntry {
            source: ActorSource::PreviousActor,
            scope: ZoneRefs {
                zone: zone.clone(),
                zone_hidden: zone_hidden.clone(),
            },
        },
    }
}
