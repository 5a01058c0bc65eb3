//! Application service: the injection engine.
//!
//! Owns the filesystem port and one strategy per supported target, and
//! dispatches each request to the right one.

use std::collections::BTreeMap;
use std::path::Path;

use btw_common::{InjectionResult, InjectionStatus, Manifest, Target};

use crate::application::ports::ProjectFs;
use crate::application::services::strategy::{EjectOptions, InjectOptions, InjectionStrategy};
use crate::domain::error::InjectionError;

/// The operations the interactive toggle loop needs from an engine.
#[allow(async_fn_in_trait)]
pub trait Injector {
    async fn inject(
        &self,
        manifest: &Manifest,
        target: Target,
        options: &InjectOptions,
    ) -> Result<InjectionResult, InjectionError>;

    async fn eject(&self, target: Target, options: &EjectOptions) -> Result<(), InjectionError>;

    async fn get_status(&self, target: Target, project_root: &Path) -> InjectionStatus;
}

/// Dispatches inject/eject/status/validate to per-target strategies.
pub struct InjectionEngine<F> {
    fs: F,
    strategies: BTreeMap<Target, InjectionStrategy>,
}

impl<F: ProjectFs> InjectionEngine<F> {
    /// Build the engine with a strategy for every known target.
    pub fn new(fs: F) -> Self {
        let strategies = Target::ALL
            .into_iter()
            .map(|target| (target, InjectionStrategy::new(target)))
            .collect();
        Self { fs, strategies }
    }

    /// The filesystem port this engine writes through.
    pub fn fs(&self) -> &F {
        &self.fs
    }

    /// Returns `true` if `name` names a target with a registered strategy.
    pub fn is_target_supported(&self, name: &str) -> bool {
        name.parse::<Target>()
            .is_ok_and(|target| self.strategies.contains_key(&target))
    }

    /// Returns `true` if the manifest declares `target` and a strategy for it
    /// exists.
    pub fn validate_manifest_for_target(&self, manifest: &Manifest, target: Target) -> bool {
        manifest.supports(target) && self.strategies.contains_key(&target)
    }

    /// Parse a user-supplied target name.
    ///
    /// # Errors
    ///
    /// Returns [`InjectionError::UnsupportedTarget`] for unknown names.
    pub fn resolve_target(&self, name: &str) -> Result<Target, InjectionError> {
        if !self.is_target_supported(name) {
            return Err(InjectionError::UnsupportedTarget(name.to_string()));
        }
        name.parse::<Target>()
            .map_err(|_| InjectionError::UnsupportedTarget(name.to_string()))
    }

    /// The strategy registered for `target`.
    ///
    /// # Errors
    ///
    /// Returns [`InjectionError::UnsupportedTarget`] if none is registered.
    pub fn strategy(&self, target: Target) -> Result<&InjectionStrategy, InjectionError> {
        self.strategies
            .get(&target)
            .ok_or_else(|| InjectionError::UnsupportedTarget(target.to_string()))
    }

    /// Check the manifest against the target, then inject.
    ///
    /// # Errors
    ///
    /// Returns [`InjectionError::TargetMismatch`] if the manifest does not
    /// declare `target`, otherwise whatever the strategy raises.
    pub async fn inject(
        &self,
        manifest: &Manifest,
        target: Target,
        options: &InjectOptions,
    ) -> Result<InjectionResult, InjectionError> {
        let strategy = self.strategy(target)?;
        if !manifest.supports(target) {
            return Err(InjectionError::TargetMismatch {
                workflow_id: manifest.id.clone(),
                target,
            });
        }
        strategy.inject(&self.fs, manifest, options).await
    }

    /// # Errors
    ///
    /// Returns whatever the strategy raises.
    pub async fn eject(&self, target: Target, options: &EjectOptions) -> Result<(), InjectionError> {
        self.strategy(target)?.eject(&self.fs, options).await
    }

    /// Never fails; an unknown target reports "not injected".
    pub async fn get_status(&self, target: Target, project_root: &Path) -> InjectionStatus {
        match self.strategy(target) {
            Ok(strategy) => strategy.get_status(&self.fs, project_root).await,
            Err(_) => InjectionStatus::not_injected(),
        }
    }

    /// Never fails; an unknown target is "invalid".
    pub async fn validate(&self, target: Target, project_root: &Path) -> bool {
        match self.strategy(target) {
            Ok(strategy) => strategy.validate(&self.fs, project_root).await,
            Err(_) => false,
        }
    }
}

impl<F: ProjectFs> Injector for InjectionEngine<F> {
    async fn inject(
        &self,
        manifest: &Manifest,
        target: Target,
        options: &InjectOptions,
    ) -> Result<InjectionResult, InjectionError> {
        InjectionEngine::inject(self, manifest, target, options).await
    }

    async fn eject(&self, target: Target, options: &EjectOptions) -> Result<(), InjectionError> {
        InjectionEngine::eject(self, target, options).await
    }

    async fn get_status(&self, target: Target, project_root: &Path) -> InjectionStatus {
        InjectionEngine::get_status(self, target, project_root).await
    }
}
