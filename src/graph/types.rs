//! Graph node and edge types for the workflow model.

use crate::condition::ConditionExpr;

/// Employee identifier as handed over by the directory.
pub type EmployeeId = String;

/// A stage in the workflow graph.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
}

impl Node {
    pub fn is_system(&self) -> bool {
        matches!(self.kind, NodeKind::System { .. })
    }

    pub fn is_initial(&self) -> bool {
        matches!(&self.kind, NodeKind::System { code } if code == crate::schema::INITIAL_NODE_CODE)
    }

    pub fn collaboration(&self) -> Option<&Collaboration> {
        match &self.kind {
            NodeKind::Stage { collaboration } => Some(collaboration),
            NodeKind::System { .. } => None,
        }
    }
}

/// Built-in stages carry a system code; user-defined stages carry exactly
/// one collaboration mode.
#[derive(Debug, Clone)]
pub enum NodeKind {
    System { code: String },
    Stage { collaboration: Collaboration },
}

/// How a stage's actors and their field scopes are determined.
#[derive(Debug, Clone)]
pub enum Collaboration {
    /// Single actor read from a document property.
    InForm {
        property: String,
        scope: ZoneRefs,
    },
    /// Fixed list of employees with a shared scope.
    OutForm {
        employees: Vec<EmployeeId>,
        scope: ZoneRefs,
        edit_all: bool,
    },
    /// Dynamically resolved actors, each entry with its own scope.
    InWorkflow { entries: Vec<InWorkflowEntry> },
}

/// One dynamically-resolved actor source.
#[derive(Debug, Clone)]
pub struct InWorkflowEntry {
    pub source: ActorSource,
    pub scope: ZoneRefs,
}

#[derive(Debug, Clone)]
pub enum ActorSource {
    Position(PositionRule),
    Employee(EmployeeId),
    PreviousActor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionRule {
    DirectManagerOfCreator,
    Holder(String),
}

/// Raw zone references of a collaboration; resolved against the catalog at
/// actor-resolution time so zone edits apply to running workflows.
#[derive(Debug, Clone, Default)]
pub struct ZoneRefs {
    pub zone: Vec<String>,
    pub zone_hidden: Vec<String>,
}

/// A directed, conditionally-taken edge between two nodes of one workflow.
#[derive(Debug, Clone)]
pub struct Association {
    pub id: String,
    pub from: String,
    pub to: String,
    pub condition: ConditionExpr,
    /// Audit copy of the endpoint identities at creation time; kept stable
    /// even if the nodes are later renamed, so historical diagrams do not
    /// shift under the reader.
    pub endpoints: EndpointSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointSnapshot {
    pub from_id: String,
    pub from_name: String,
    pub to_id: String,
    pub to_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_kind_predicates() {
        let initial = Node {
            id: "n0".into(),
            name: "Initial".into(),
            kind: NodeKind::System {
                code: "initial".into(),
            },
        };
        let stage = Node {
            id: "n1".into(),
            name: "Review".into(),
            kind: NodeKind::Stage {
                collaboration: Collaboration::OutForm {
                    employees: vec!["e1".into()],
                    scope: ZoneRefs::default(),
                    edit_all: false,
                },
            },
        };
        assert!(initial.is_system());
        assert!(initial.is_initial());
        assert!(initial.collaboration().is_none());
        assert!(!stage.is_system());
        assert!(!stage.is_initial());
        assert!(stage.collaboration().is_some());
    }
}
