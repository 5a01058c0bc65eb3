pub mod manifest;
pub mod target;
pub mod types;

pub use manifest::{AgentDefinition, Manifest};
pub use target::{ParseTargetError, Target};
pub use types::{InjectionResult, InjectionStatus};
