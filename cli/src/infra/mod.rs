//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: project filesystem access,
//! the on-disk workflow library and the config file.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod catalog;
pub mod config;
pub mod fs;
