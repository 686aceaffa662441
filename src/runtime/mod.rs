//! Runtime orchestration: executing instances, audit trail, and the
//! workflow registry.

mod context;
mod orchestrator;
mod registry;
mod types;

pub use context::{
    FakeIdGenerator, FakeTimeProvider, IdGenerator, RealIdGenerator, RealTimeProvider,
    RuntimeContext, TimeProvider,
};
pub use orchestrator::Engine;
pub use registry::WorkflowRegistry;
pub use types::{
    LogKind, PendingTask, Runtime, RuntimeAssignee, RuntimeLog, RuntimeStage, RuntimeState,
    RuntimeStatus,
};
