//! Workflow registry with the frozen-while-in-use invariant.
//!
//! Structural edits to a workflow whose graph is referenced by active
//! runtimes are unsafe; the registry refuses replacement and removal while
//! the active count is non-zero instead of leaving that as an application
//! convention.

use std::sync::Arc;

use dashmap::DashMap;

use crate::error::EngineError;
use crate::graph::WorkflowDefinition;

#[derive(Default)]
pub struct WorkflowRegistry {
    definitions: DashMap<String, Arc<WorkflowDefinition>>,
    active_counts: DashMap<String, usize>,
}

impl WorkflowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition under its own id.
    pub fn register(&self, definition: WorkflowDefinition) -> Arc<WorkflowDefinition> {
        let definition = Arc::new(definition);
        self.definitions
            .insert(definition.id.clone(), definition.clone());
        definition
    }

    pub fn get(&self, workflow_id: &str) -> Result<Arc<WorkflowDefinition>, EngineError> {
        self.definitions
            .get(workflow_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| EngineError::WorkflowNotFound(workflow_id.to_string()))
    }

    /// Replace a definition.  Rejected while any active runtime references
    /// the workflow.  The replacement takes over the replaced workflow's id,
    /// so runtimes started afterwards keep resolving through the same key.
    pub fn replace(
        &self,
        workflow_id: &str,
        mut definition: WorkflowDefinition,
    ) -> Result<Arc<WorkflowDefinition>, EngineError> {
        self.ensure_not_in_use(workflow_id)?;
        if !self.definitions.contains_key(workflow_id) {
            return Err(EngineError::WorkflowNotFound(workflow_id.to_string()));
        }
        definition.id = workflow_id.to_string();
        let definition = Arc::new(definition);
        self.definitions
            .insert(workflow_id.to_string(), definition.clone());
        Ok(definition)
    }

    /// Remove a definition.  Rejected while in use.
    pub fn remove(&self, workflow_id: &str) -> Result<(), EngineError> {
        self.ensure_not_in_use(workflow_id)?;
        self.definitions
            .remove(workflow_id)
            .map(|_| ())
            .ok_or_else(|| EngineError::WorkflowNotFound(workflow_id.to_string()))
    }

    pub fn active_count(&self, workflow_id: &str) -> usize {
        self.active_counts
            .get(workflow_id)
            .map(|entry| *entry.value())
            .unwrap_or(0)
    }

    pub(crate) fn mark_active(&self, workflow_id: &str) {
        *self.active_counts.entry(workflow_id.to_string()).or_insert(0) += 1;
    }

    pub(crate) fn mark_inactive(&self, workflow_id: &str) {
        if let Some(mut entry) = self.active_counts.get_mut(workflow_id) {
            *entry = entry.saturating_sub(1);
        }
    }

    fn ensure_not_in_use(&self, workflow_id: &str) -> Result<(), EngineError> {
        if self.active_count(workflow_id) > 0 {
            return Err(EngineError::WorkflowInUse(workflow_id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_definition;
    use crate::schema::{parse_config, ConfigFormat};

    fn definition() -> WorkflowDefinition {
        let config = parse_config(
            r#"{
            "name": "wf",
            "nodes": [
                {"id": "n0", "system": "initial"},
                {"id": "n1", "collaboration": {"mode": "out_form", "employees": ["e1"]}}
            ],
            "associations": [{"from": "n0", "to": "n1"}]
        }"#,
            ConfigFormat::Json,
        )
        .unwrap();
        build_definition(&config).unwrap()
    }

    #[test]
    fn test_register_and_get() {
        let registry = WorkflowRegistry::new();
        let def = registry.register(definition());
        assert_eq!(registry.get(&def.id).unwrap().name, "wf");
        assert!(matches!(
            registry.get("ghost"),
            Err(EngineError::WorkflowNotFound(_))
        ));
    }

    #[test]
    fn test_frozen_while_in_use() {
        let registry = WorkflowRegistry::new();
        let def = registry.register(definition());
        registry.mark_active(&def.id);

        assert!(matches!(
            registry.replace(&def.id, definition()),
            Err(EngineError::WorkflowInUse(_))
        ));
        assert!(matches!(
            registry.remove(&def.id),
            Err(EngineError::WorkflowInUse(_))
        ));

        registry.mark_inactive(&def.id);
        assert!(registry.replace(&def.id, definition()).is_ok());
        assert!(registry.remove(&def.id).is_ok());
    }

    #[test]
    fn test_replace_keeps_workflow_id() {
        let registry = WorkflowRegistry::new();
        let def = registry.register(definition());
        let replaced = registry.replace(&def.id, definition()).unwrap();
        // The replacement is reachable under the original id and reports it
        // as its own.
        assert_eq!(replaced.id, def.id);
        assert_eq!(registry.get(&def.id).unwrap().id, def.id);
    }

    #[test]
    fn test_active_count_tracking() {
        let registry = WorkflowRegistry::new();
        let def = registry.register(definition());
        assert_eq!(registry.active_count(&def.id), 0);
        registry.mark_active(&def.id);
        registry.mark_active(&def.id);
        assert_eq!(registry.active_count(&def.id), 2);
        registry.mark_inactive(&def.id);
        assert_eq!(registry.active_count(&def.id), 1);
    }
}
