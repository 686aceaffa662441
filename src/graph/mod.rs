//! Workflow graph model: nodes, zones, condition-gated associations, and
//! traversal.

mod builder;
mod traversal;
mod types;

pub use builder::{build_definition, WorkflowDefinition};
pub use traversal::NextStage;
pub use types::{
    ActorSource, Association, Collaboration, EmployeeId, EndpointSnapshot, InWorkflowEntry,
    Node, NodeKind, PositionRule, ZoneRefs,
};
