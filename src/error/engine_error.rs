//! Engine-level error types.

use thiserror::Error;

use crate::schema::ValidationReport;

/// Errors surfaced by the approval engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Config parse error: {0}")]
    ConfigParseError(String),
    #[error("Validation failed")]
    ValidationFailed(Box<ValidationReport>),
    #[error("Workflow not found: {0}")]
    WorkflowNotFound(String),
    #[error("Node not found: {0}")]
    NodeNotFound(String),
    #[error("Runtime not found: {0}")]
    RuntimeNotFound(String),
    #[error("Assignee not found: {0}")]
    AssigneeNotFound(String),
    #[error("Graph build error: {0}")]
    GraphBuildError(String),
    #[error("Workflow '{0}' is referenced by active runtimes and cannot be modified")]
    WorkflowInUse(String),
    #[error("Runtime {0} is terminal and cannot accept further actions")]
    TerminalState(String),
    #[error("Stage {stage_id} is no longer current for runtime {runtime_id}")]
    StaleStage {
        runtime_id: String,
        stage_id: String,
    },
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl EngineError {
    /// Whether the caller may retry the same call against fresh state.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::StaleStage { .. })
    }
}

/// Non-fatal configuration problem, reported to administrators rather than
/// failing the document pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub code: WarningCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningCode {
    MalformedCondition,
    UnknownZone,
    UnknownEmployee,
    EmptyActorProperty,
}

impl ConfigWarning {
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}
