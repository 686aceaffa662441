//! Collaboration resolution: who may act at a stage, and what they may see.

mod directory;
mod resolver;

pub use directory::{Directory, InMemoryDirectory};
pub use resolver::{resolve_actors, ActorAssignment, Resolution, ResolveContext};
