//! Traversal: picking the next stage from the current node.

use crate::document::FieldSnapshot;
use crate::error::EngineError;

use super::builder::WorkflowDefinition;
use super::types::Node;

/// Outcome of one traversal step.
#[derive(Debug)]
pub enum NextStage<'a> {
    /// First association (in creation order) whose condition holds.
    Node(&'a Node),
    /// The node has no outgoing associations at all.
    Complete,
    /// Outgoing associations exist but none is satisfied; the current stage
    /// is retained and exposed as awaiting action.
    Blocked,
}

impl WorkflowDefinition {
    /// Evaluate the outgoing associations of `node_id` against one snapshot
    /// and return the next stage.
    ///
    /// Associations are tried strictly in creation order; the first whose
    /// condition evaluates true wins, even if later ones would also hold.
    pub fn next_stage(
        &self,
        node_id: &str,
        snapshot: &FieldSnapshot,
    ) -> Result<NextStage<'_>, EngineError> {
        // Ensure the node exists before looking at edges.
        self.get_node(node_id)?;

        let outgoing = self.associations_from(node_id);
        if outgoing.is_empty() {
            return Ok(NextStage::Complete);
        }

        for association in outgoing {
            if association.condition.evaluate(snapshot) {
                tracing::debug!(
                    workflow = %self.name,
                    association = %association.id,
                    from = %association.from,
                    to = %association.to,
                    "association taken"
                );
                return Ok(NextStage::Node(self.get_node(&association.to)?));
            }
        }
        Ok(NextStage::Blocked)
    }
}
