//! Named plugin factories and chain assembly.

use std::collections::{HashMap, HashSet};

use admission_sdk::AdmissionPlugin;
use tracing::info;

use crate::chain::AdmissionChain;
use crate::config::AdmissionConfig;
use crate::error::{ChainBuildError, RegistryError};
use crate::initializer::PluginInitializer;
use crate::validate::validate;

/// Builds a plugin from its optional configuration.
pub type PluginFactory = Box<
    dyn Fn(Option<&serde_json::Value>) -> anyhow::Result<Box<dyn AdmissionPlugin>> + Send + Sync,
>;

/// Registry of admission plugin factories keyed by plugin name.
#[derive(Default)]
pub struct PluginRegistry {
    factories: HashMap<String, PluginFactory>,
}

impl PluginRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under `name`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Duplicate` if `name` is already taken.
    pub fn register<F>(&mut self, name: &str, factory: F) -> Result<(), RegistryError>
    where
        F: Fn(Option<&serde_json::Value>) -> anyhow::Result<Box<dyn AdmissionPlugin>>
            + Send
            + Sync
            + 'static,
    {
        if self.factories.contains_key(name) {
            return Err(RegistryError::Duplicate(name.to_owned()));
        }
        self.factories.insert(name.to_owned(), Box::new(factory));
        Ok(())
    }

    #[must_use]
    pub fn is_registered(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered plugin names, sorted.
    #[must_use]
    pub fn registered_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Construct a single plugin by name.
    ///
    /// # Errors
    ///
    /// - `UnknownPlugin` if no factory is registered under `name`
    /// - `Construction` if the factory fails
    pub fn build(
        &self,
        name: &str,
        config: Option<&serde_json::Value>,
    ) -> Result<Box<dyn AdmissionPlugin>, ChainBuildError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| ChainBuildError::UnknownPlugin(name.to_owned()))?;
        factory(config).map_err(|reason| ChainBuildError::Construction {
            plugin: name.to_owned(),
            reason,
        })
    }

    /// Build, inject and validate the plugins enabled in `config`, in
    /// `plugin_order`, and return the resulting chain.
    ///
    /// Disabled plugins are skipped. Nothing is returned unless every enabled
    /// plugin was built and the whole list passed validation.
    ///
    /// # Errors
    ///
    /// - `DuplicatePlugin` if a name appears twice in `plugin_order`
    /// - `UnknownPlugin` / `Construction` from [`Self::build`]
    /// - `Validation` carrying the first failing plugin's error
    #[tracing::instrument(skip_all, fields(plugin_order = ?config.plugin_order))]
    pub fn new_from_plugins(
        &self,
        config: &AdmissionConfig,
        initializer: &PluginInitializer,
    ) -> Result<AdmissionChain, ChainBuildError> {
        let mut seen = HashSet::new();
        let mut plugins = Vec::with_capacity(config.plugin_order.len());

        for name in &config.plugin_order {
            if !seen.insert(name.as_str()) {
                return Err(ChainBuildError::DuplicatePlugin(name.clone()));
            }
            if config.is_disabled(name) {
                info!(plugin = %name, "Admission plugin disabled by configuration");
                continue;
            }
            plugins.push(self.build(name, config.plugin_configuration(name))?);
        }

        initializer.initialize(&mut plugins);
        validate(&plugins).map_err(ChainBuildError::Validation)?;

        let chain = AdmissionChain::new(plugins);
        info!(plugins = ?chain.plugin_names(), "Admission chain activated");
        Ok(chain)
    }
}
