//! Application layer: port trait definitions and use-case orchestration.
//!
//! This module depends only on `crate::domain`, never on `crate::infra`,
//! `crate::commands`, or `crate::output`.

pub mod ports;
pub mod services;

pub use ports::{ConfigStore, ProjectFs, WorkflowCatalog};
pub use services::engine::{InjectionEngine, Injector};
pub use services::strategy::{EjectOptions, InjectOptions, InjectionStrategy};
