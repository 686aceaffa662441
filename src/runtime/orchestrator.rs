//! Runtime orchestrator.
//!
//! Creates runtimes, records actor actions, and advances stages.  All
//! mutation of a runtime happens under its per-runtime mutex, so two actors
//! racing to advance the same stage are serialized: the first advance moves
//! the current-stage pointer and the loser is rejected with a retryable
//! [`EngineError::StaleStage`].

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;

use crate::collab::{resolve_actors, Directory, ResolveContext};
use crate::document::{DocumentContext, FieldSnapshot};
use crate::error::EngineError;
use crate::graph::{build_definition, NextStage, Node, WorkflowDefinition};
use crate::schema::WorkflowConfig;

use super::context::RuntimeContext;
use super::registry::WorkflowRegistry;
use super::types::{
    LogKind, PendingTask, Runtime, RuntimeAssignee, RuntimeLog, RuntimeStage, RuntimeState,
    RuntimeStatus,
};

pub struct Engine {
    registry: WorkflowRegistry,
    runtimes: DashMap<String, Arc<Mutex<Runtime>>>,
    directory: Arc<dyn Directory>,
    ctx: RuntimeContext,
}

impl Engine {
    pub fn new(directory: Arc<dyn Directory>) -> Self {
        Self {
            registry: WorkflowRegistry::new(),
            runtimes: DashMap::new(),
            directory,
            ctx: RuntimeContext::default(),
        }
    }

    pub fn with_context(mut self, ctx: RuntimeContext) -> Self {
        self.ctx = ctx;
        self
    }

    pub fn registry(&self) -> &WorkflowRegistry {
        &self.registry
    }

    /// Build a definition from config and register it.
    pub fn register_workflow(
        &self,
        config: &WorkflowConfig,
    ) -> Result<Arc<WorkflowDefinition>, EngineError> {
        let definition = build_definition(config)?;
        Ok(self.registry.register(definition))
    }

    /// Create a runtime for one document and take the first traversal step
    /// from the initial node against the creation-time snapshot.
    pub fn start(
        &self,
        workflow_id: &str,
        doc: &DocumentContext,
        creator: &str,
    ) -> Result<Runtime, EngineError> {
        let definition = self.registry.get(workflow_id)?;
        let initial = definition.initial_node();

        let runtime_id = self.ctx.id_generator.next_id();
        let mut runtime = Runtime {
            id: runtime_id.clone(),
            workflow_id: definition.id.clone(),
            workflow_name: definition.name.clone(),
            app_code: doc.app_code.clone(),
            doc_id: doc.doc_id.clone(),
            creator: creator.to_string(),
            state: RuntimeState::Active,
            status: RuntimeStatus::InProgress,
            current_stage: String::new(),
            stages: Vec::new(),
            assignees: Vec::new(),
            log: Vec::new(),
        };

        match definition.next_stage(&initial.id, &doc.snapshot)? {
            NextStage::Node(node) => {
                let stage_id =
                    self.enter_stage(&mut runtime, &definition, node, None, &doc.snapshot);
                runtime.current_stage = stage_id;
            }
            NextStage::Blocked => {
                // No route out of the entry point for this document; the
                // runtime sits at the initial stage awaiting a config fix.
                let stage_id = self.push_stage(&mut runtime, initial, None);
                runtime.current_stage = stage_id;
                runtime.status = RuntimeStatus::Blocked;
            }
            NextStage::Complete => {
                let stage_id = self.push_stage(&mut runtime, initial, None);
                runtime.current_stage = stage_id;
                runtime.state = RuntimeState::Completed;
                runtime.status = RuntimeStatus::Completed;
            }
        }

        runtime.log.push(RuntimeLog {
            actor: creator.to_string(),
            stage: Some(runtime.current_stage.clone()),
            kind: LogKind::Create,
            action: "create".to_string(),
            msg: format!("runtime created for {}:{}", doc.app_code, doc.doc_id),
            is_system: true,
            timestamp: self.ctx.time_provider.now_millis(),
        });

        if runtime.state == RuntimeState::Active {
            // The runtime stores the definition's id; count under the same
            // key so completion and removal decrement what start incremented.
            self.registry.mark_active(&runtime.workflow_id);
        }

        let view = runtime.clone();
        self.runtimes
            .insert(runtime_id, Arc::new(Mutex::new(runtime)));
        Ok(view)
    }

    /// Record one actor action on one assignee task.
    ///
    /// Every call appends exactly one audit entry.  If the action is the
    /// workflow's advance action, one traversal step runs against the
    /// supplied snapshot; a blocked step keeps the stage and stays
    /// retryable with fresh field values.
    pub fn record_action(
        &self,
        runtime_id: &str,
        assignee_id: &str,
        action: &str,
        snapshot: &FieldSnapshot,
    ) -> Result<Runtime, EngineError> {
        let cell = self
            .runtimes
            .get(runtime_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| EngineError::RuntimeNotFound(runtime_id.to_string()))?;

        let mut runtime = cell.lock();
        if runtime.is_terminal() {
            return Err(EngineError::TerminalState(runtime_id.to_string()));
        }

        let definition = self.registry.get(&runtime.workflow_id)?;

        let assignee_index = runtime
            .assignees
            .iter()
            .position(|a| a.id == assignee_id)
            .ok_or_else(|| EngineError::AssigneeNotFound(assignee_id.to_string()))?;

        let assignee_stage = runtime.assignees[assignee_index].stage_id.clone();
        if assignee_stage != runtime.current_stage {
            return Err(EngineError::StaleStage {
                runtime_id: runtime_id.to_string(),
                stage_id: assignee_stage,
            });
        }

        let actor = runtime.assignees[assignee_index].employee.clone();
        runtime.assignees[assignee_index]
            .actions
            .insert(action.to_string());

        let mut msg = format!("action '{action}' recorded");
        if action == definition.advance_action {
            let current_node_id = runtime
                .current_stage()
                .map(|s| s.node_id.clone())
                .ok_or_else(|| {
                    EngineError::InternalError(format!(
                        "runtime {runtime_id} has no current stage record"
                    ))
                })?;

            match definition.next_stage(&current_node_id, snapshot)? {
                NextStage::Node(node) => {
                    runtime.assignees[assignee_index].is_done = true;
                    let previous_stage = runtime.current_stage.clone();
                    let stage_id = self.enter_stage(
                        &mut runtime,
                        &definition,
                        node,
                        Some((previous_stage, actor.clone())),
                        snapshot,
                    );
                    runtime.current_stage = stage_id;
                    runtime.status = RuntimeStatus::InProgress;
                    msg = format!("advanced to '{}'", node.name);
                }
                NextStage::Blocked => {
                    runtime.status = RuntimeStatus::Blocked;
                    msg = "no association satisfied; stage retained".to_string();
                }
                NextStage::Complete => {
                    runtime.assignees[assignee_index].is_done = true;
                    runtime.state = RuntimeState::Completed;
                    runtime.status = RuntimeStatus::Completed;
                    self.registry.mark_inactive(&runtime.workflow_id);
                    msg = "workflow complete".to_string();
                }
            }
        }

        let stage = Some(runtime.current_stage.clone());
        runtime.log.push(RuntimeLog {
            actor,
            stage,
            kind: LogKind::Action,
            action: action.to_string(),
            msg,
            is_system: false,
            timestamp: self.ctx.time_provider.now_millis(),
        });

        Ok(runtime.clone())
    }

    /// Latest committed state of a runtime.
    pub fn view(&self, runtime_id: &str) -> Result<Runtime, EngineError> {
        let cell = self
            .runtimes
            .get(runtime_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| EngineError::RuntimeNotFound(runtime_id.to_string()))?;
        let runtime = cell.lock();
        Ok(runtime.clone())
    }

    /// Visited stages in traversal order, for diagram rendering.
    pub fn visited_path(&self, runtime_id: &str) -> Result<Vec<RuntimeStage>, EngineError> {
        Ok(self.view(runtime_id)?.stages)
    }

    /// All open tasks for one employee across runtimes.
    pub fn pending_tasks(&self, employee: &str) -> Vec<PendingTask> {
        let mut tasks = Vec::new();
        for entry in self.runtimes.iter() {
            let runtime = entry.value().lock();
            if runtime.is_terminal() {
                continue;
            }
            for assignee in runtime.pending_assignees() {
                if assignee.employee == employee {
                    let node_name = runtime
                        .stage(&assignee.stage_id)
                        .map(|s| s.node_name.clone())
                        .unwrap_or_default();
                    tasks.push(PendingTask {
                        runtime_id: runtime.id.clone(),
                        stage_id: assignee.stage_id.clone(),
                        assignee_id: assignee.id.clone(),
                        node_name,
                        app_code: runtime.app_code.clone(),
                        doc_id: runtime.doc_id.clone(),
                    });
                }
            }
        }
        tasks
    }

    /// Drop a runtime, releasing its hold on the workflow.  Only explicit
    /// document deletion calls this.
    pub fn remove_runtime(&self, runtime_id: &str) -> Result<(), EngineError> {
        let (_, cell) = self
            .runtimes
            .remove(runtime_id)
            .ok_or_else(|| EngineError::RuntimeNotFound(runtime_id.to_string()))?;
        let runtime = cell.lock();
        if !runtime.is_terminal() {
            self.registry.mark_inactive(&runtime.workflow_id);
        }
        Ok(())
    }

    /// Append a stage record without resolving actors (system stages).
    fn push_stage(
        &self,
        runtime: &mut Runtime,
        node: &Node,
        from_stage: Option<String>,
    ) -> String {
        let stage_id = self.ctx.id_generator.next_id();
        runtime.stages.push(RuntimeStage {
            id: stage_id.clone(),
            node_id: node.id.clone(),
            node_name: node.name.clone(),
            from_stage,
            to_stage: None,
        });
        stage_id
    }

    /// Create a stage for `node`, link it to the previous stage, and create
    /// assignee tasks from the resolved actors.
    fn enter_stage(
        &self,
        runtime: &mut Runtime,
        definition: &WorkflowDefinition,
        node: &Node,
        previous: Option<(String, String)>,
        snapshot: &FieldSnapshot,
    ) -> String {
        let (from_stage, previous_actor) = match previous {
            Some((stage, actor)) => (Some(stage), Some(actor)),
            None => (None, None),
        };

        let stage_id = self.push_stage(runtime, node, from_stage.clone());
        if let Some(from) = from_stage {
            if let Some(prev) = runtime.stages.iter_mut().find(|s| s.id == from) {
                prev.to_stage = Some(stage_id.clone());
            }
        }

        // Actor resolution sees the same snapshot the condition evaluation
        // saw, never a mix of old and new fields.
        let creator = runtime.creator.clone();
        let resolve_ctx = ResolveContext {
            snapshot,
            creator: &creator,
            previous_actor: previous_actor.as_deref(),
            zones: definition.zones(),
            directory: self.directory.as_ref(),
            zone_scoped: definition.zone_scoped,
        };
        let resolution = resolve_actors(node, &resolve_ctx);
        for assignment in resolution.assignments {
            runtime.assignees.push(RuntimeAssignee {
                id: self.ctx.id_generator.next_id(),
                stage_id: stage_id.clone(),
                employee: assignment.employee,
                visible: assignment.visible,
                editable: assignment.editable,
                is_done: false,
                actions: Default::default(),
            });
        }
        stage_id
    }
}
