//! Workflow configuration schema.
//!
//! This is the serialized form produced by the workflow builder UI.  Each
//! non-system node carries exactly one collaboration mode; the tagged enum
//! makes it impossible to populate two modes at once.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// System-node code for the entry point of every workflow.
pub const INITIAL_NODE_CODE: &str = "initial";

/// Default action name that triggers a stage advance.
pub const DEFAULT_ADVANCE_ACTION: &str = "approve";

/// A complete workflow template as configured.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct WorkflowConfig {
    pub name: String,
    /// Whether the workflow applies across companies.
    #[serde(default)]
    pub multi_company: bool,
    /// Whether zone-based field scoping is enforced.  When false every
    /// resolved actor gets the unrestricted scope.
    #[serde(default)]
    pub zone_scoped: bool,
    /// Action name that triggers a stage advance; defaults to "approve".
    #[serde(default)]
    pub advance_action: Option<String>,
    #[serde(default)]
    pub zones: Vec<ZoneConfig>,
    pub nodes: Vec<NodeConfig>,
    #[serde(default)]
    pub associations: Vec<AssociationConfig>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ZoneConfig {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub properties: Vec<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct NodeConfig {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Set for built-in stages; `"initial"` marks the entry node.
    #[serde(default)]
    pub system: Option<String>,
    /// Exactly one collaboration mode for non-system nodes.
    #[serde(default)]
    pub collaboration: Option<CollaborationConfig>,
}

/// How a stage's actors are determined.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CollaborationConfig {
    /// Actor is read from a document property holding an employee reference.
    InForm {
        property: String,
        #[serde(default)]
        zone: Vec<String>,
        #[serde(default)]
        zone_hidden: Vec<String>,
    },
    /// Actors are a fixed list of employees sharing one zone scope.
    OutForm {
        employees: Vec<String>,
        #[serde(default)]
        zone: Vec<String>,
        #[serde(default)]
        zone_hidden: Vec<String>,
        /// Grants full edit access regardless of the zone lists.
        #[serde(default)]
        edit_all: bool,
    },
    /// Actors are resolved dynamically, one entry at a time.
    InWorkflow { entries: Vec<InWorkflowEntryConfig> },
}

/// One dynamically-resolved actor source, with its own zone scope.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum InWorkflowEntryConfig {
    /// Resolved through the org hierarchy.
    Position {
        rule: PositionRuleConfig,
        #[serde(default)]
        zone: Vec<String>,
        #[serde(default)]
        zone_hidden: Vec<String>,
    },
    /// A fixed employee.
    Employee {
        employee: String,
        #[serde(default)]
        zone: Vec<String>,
        #[serde(default)]
        zone_hidden: Vec<String>,
    },
    /// Whoever acted on the immediately preceding stage.
    PreviousActor {
        #[serde(default)]
        zone: Vec<String>,
        #[serde(default)]
        zone_hidden: Vec<String>,
    },
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PositionRuleConfig {
    /// Direct manager of the document creator.
    DirectManagerOfCreator,
    /// Every employee holding the named position.
    Holder { position: String },
}

/// A directed, conditionally-taken edge between two nodes.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct AssociationConfig {
    #[serde(default)]
    pub id: String,
    pub from: String,
    pub to: String,
    /// Legacy alternating predicate/operator list; `[]` or absent means
    /// the edge is always taken.
    #[serde(default)]
    pub condition: Value,
}
