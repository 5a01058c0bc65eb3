//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod artifact;
pub mod config;
pub mod error;
pub mod marker;
pub mod ownership;
pub mod shared_doc;
pub mod target;
pub mod validate;

pub use config::{BtwConfig, validate_config_key, validate_config_value};
pub use error::{ConfigError, ErrorKind, INJECTION_FAILED, InjectionError};
pub use marker::MergeMode;
pub use target::{TargetProfile, profile};
