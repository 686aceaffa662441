//! # approvalflow — a configurable approval-workflow engine
//!
//! `approvalflow` drives business documents (purchase orders, contracts,
//! leave requests) through a configurable approval lifecycle: a directed
//! graph of stages connected by condition-gated transitions, a zone
//! mechanism for field-level visibility scoping, and a runtime tracker
//! holding the current stage, assigned actors, and an append-only audit
//! log.
//!
//! - **Condition evaluation**: a closed, typed predicate set (`number`,
//!   `text`, `boolean`) compiled into an explicit expression tree; no
//!   string-to-code execution anywhere.
//! - **Graph traversal**: outgoing associations are tried in creation
//!   order; the first satisfied condition wins.  No outgoing edges means
//!   the stage is complete; unsatisfied conditions leave the stage
//!   awaiting action.
//! - **Collaboration resolution**: per-stage actors come from a document
//!   field (`in_form`), a fixed employee list (`out_form`), or dynamic
//!   rules over the org hierarchy (`in_workflow`), each with zone-scoped
//!   field permissions.
//! - **Runtime orchestration**: per-runtime serialization of advances,
//!   at-most-one current stage, stale advances rejected as retryable.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use approvalflow::{
//!     parse_config, ConfigFormat, DocumentContext, Engine, FieldSnapshot, InMemoryDirectory,
//! };
//!
//! let config = parse_config(
//!     std::fs::read_to_string("workflow.yaml").unwrap().as_str(),
//!     ConfigFormat::Yaml,
//! )
//! .unwrap();
//!
//! let engine = Engine::new(Arc::new(InMemoryDirectory::new()));
//! let workflow = engine.register_workflow(&config).unwrap();
//!
//! let snapshot = FieldSnapshot::from_json(&serde_json::json!({"amount": 500}));
//! let doc = DocumentContext::new("purchase_order", "po-1", snapshot);
//! let runtime = engine.start(&workflow.id, &doc, "emp-1").unwrap();
//! println!("{:?}", runtime.status);
//! ```

pub mod collab;
pub mod condition;
pub mod document;
pub mod error;
pub mod graph;
pub mod runtime;
pub mod schema;
pub mod zone;

pub use crate::collab::{
    resolve_actors, ActorAssignment, Directory, InMemoryDirectory, Resolution, ResolveContext,
};
pub use crate::condition::{
    parse_condition, BoolOp, ConditionExpr, ConditionParseError, LogicalOperator, NumberOp,
    Predicate, TextOp,
};
pub use crate::document::{DocumentContext, FieldSnapshot, FieldValue};
pub use crate::error::{ConfigWarning, EngineError, WarningCode};
pub use crate::graph::{
    build_definition, Association, Collaboration, EmployeeId, NextStage, Node, NodeKind,
    WorkflowDefinition,
};
pub use crate::runtime::{
    Engine, FakeIdGenerator, FakeTimeProvider, LogKind, PendingTask, Runtime, RuntimeAssignee,
    RuntimeContext, RuntimeLog, RuntimeStage, RuntimeState, RuntimeStatus, WorkflowRegistry,
};
pub use crate::schema::{
    parse_config, validate_config, ConfigFormat, Diagnostic, DiagnosticLevel, ValidationReport,
    WorkflowConfig,
};
pub use crate::zone::{Zone, ZoneCatalog, ZoneScope};
