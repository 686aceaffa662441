//! Workflow configuration surface: serde schema, parser, and validation.

mod config;
mod parser;
mod validation;

pub use config::{
    AssociationConfig, CollaborationConfig, InWorkflowEntryConfig, NodeConfig,
    PositionRuleConfig, WorkflowConfig, ZoneConfig, DEFAULT_ADVANCE_ACTION, INITIAL_NODE_CODE,
};
pub use parser::{parse_config, ConfigFormat};
pub use validation::{validate_config, Diagnostic, DiagnosticLevel, ValidationReport};
