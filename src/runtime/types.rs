//! Runtime records: one executing workflow instance and its durable state.

use std::collections::BTreeSet;

use crate::graph::EmployeeId;

/// Lifecycle state of a runtime.  `Completed` is terminal; a `Blocked`
/// status is not (a later advance attempt may succeed with fresh fields).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeState {
    Active,
    Completed,
}

/// Display status surfaced to the owning module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeStatus {
    /// At a stage with pending assignees.
    InProgress,
    /// Outgoing associations exist but none was satisfied on the last
    /// advance attempt; awaiting action.
    Blocked,
    Completed,
}

/// One executing instance of a workflow, bound to exactly one document.
#[derive(Debug, Clone)]
pub struct Runtime {
    pub id: String,
    pub workflow_id: String,
    pub workflow_name: String,
    pub app_code: String,
    pub doc_id: String,
    pub creator: EmployeeId,
    pub state: RuntimeState,
    pub status: RuntimeStatus,
    /// Id of the current stage; exactly one at any time.
    pub current_stage: String,
    /// Visited stages in order; the traversed path.
    pub stages: Vec<RuntimeStage>,
    /// One task per resolved actor per stage; never deleted.
    pub assignees: Vec<RuntimeAssignee>,
    /// Append-only audit trail.
    pub log: Vec<RuntimeLog>,
}

impl Runtime {
    pub fn is_terminal(&self) -> bool {
        self.state == RuntimeState::Completed
    }

    pub fn current_stage(&self) -> Option<&RuntimeStage> {
        self.stages.iter().find(|s| s.id == self.current_stage)
    }

    pub fn stage(&self, stage_id: &str) -> Option<&RuntimeStage> {
        self.stages.iter().find(|s| s.id == stage_id)
    }

    pub fn assignee(&self, assignee_id: &str) -> Option<&RuntimeAssignee> {
        self.assignees.iter().find(|a| a.id == assignee_id)
    }

    /// Assignees of the current stage that have not acted yet.
    pub fn pending_assignees(&self) -> impl Iterator<Item = &RuntimeAssignee> {
        self.assignees
            .iter()
            .filter(|a| a.stage_id == self.current_stage && !a.is_done)
    }
}

/// Record of one visited node within a runtime.
#[derive(Debug, Clone)]
pub struct RuntimeStage {
    pub id: String,
    pub node_id: String,
    /// Node name at visit time, kept for stable historical diagrams.
    pub node_name: String,
    pub from_stage: Option<String>,
    pub to_stage: Option<String>,
}

/// A per-actor task created at a stage.
#[derive(Debug, Clone)]
pub struct RuntimeAssignee {
    pub id: String,
    pub stage_id: String,
    pub employee: EmployeeId,
    pub visible: BTreeSet<String>,
    pub editable: BTreeSet<String>,
    pub is_done: bool,
    /// Actions taken, deduplicated, append-only.
    pub actions: BTreeSet<String>,
}

/// Append-only audit trail entry.
#[derive(Debug, Clone)]
pub struct RuntimeLog {
    pub actor: EmployeeId,
    pub stage: Option<String>,
    pub kind: LogKind,
    pub action: String,
    pub msg: String,
    pub is_system: bool,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    /// Runtime creation.
    Create,
    /// An actor's recorded action (advance outcome noted in `msg`).
    Action,
}

/// A pending approval surfaced to one employee.
#[derive(Debug, Clone)]
pub struct PendingTask {
    pub runtime_id: String,
    pub stage_id: String,
    pub assignee_id: String,
    pub node_name: String,
    pub app_code: String,
    pub doc_id: String,
}
