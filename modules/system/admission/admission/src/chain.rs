//! The serving admission chain.

use admission_sdk::{AdmissionError, AdmissionPlugin, Attributes, Operation};
use tracing::{debug, warn};

/// Ordered, immutable list of injected and validated plugins.
///
/// Built once at startup (usually via
/// [`PluginRegistry::new_from_plugins`](crate::PluginRegistry::new_from_plugins))
/// and shared across request handlers afterwards.
pub struct AdmissionChain {
    plugins: Vec<Box<dyn AdmissionPlugin>>,
}

impl AdmissionChain {
    /// Wrap an already initialized and validated plugin list.
    #[must_use]
    pub fn new(plugins: Vec<Box<dyn AdmissionPlugin>>) -> Self {
        Self { plugins }
    }

    /// Run the request through every plugin that handles its operation.
    ///
    /// Plugins run in chain order and may mutate `attributes`; the first
    /// rejection stops the chain.
    ///
    /// # Errors
    ///
    /// Returns the rejecting plugin's error unchanged.
    #[tracing::instrument(
        skip_all,
        fields(operation = ?attributes.operation, kind = %attributes.kind, namespace = %attributes.namespace)
    )]
    pub async fn admit(&self, attributes: &mut Attributes) -> Result<(), AdmissionError> {
        for plugin in &self.plugins {
            if !plugin.handles(attributes.operation) {
                continue;
            }
            if let Err(e) = plugin.admit(attributes).await {
                warn!(plugin = plugin.name(), error = %e, "Admission request rejected");
                return Err(e);
            }
            debug!(plugin = plugin.name(), "Admission plugin admitted request");
        }
        Ok(())
    }

    /// Whether any plugin in the chain handles `operation`.
    #[must_use]
    pub fn handles(&self, operation: Operation) -> bool {
        self.plugins.iter().any(|p| p.handles(operation))
    }

    #[must_use]
    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl std::fmt::Debug for AdmissionChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdmissionChain")
            .field("plugins", &self.plugin_names())
            .finish()
    }
}
