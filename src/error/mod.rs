//! Error types for the approval engine.

mod engine_error;

pub use engine_error::{ConfigWarning, EngineError, WarningCode};
