//! Collaborator injection for admission plugins.

use std::sync::Arc;

use admission_sdk::{
    AdmissionPlugin, AuthorizationRuleResolver, Authorizer, ClientConfig, ControlPlaneClient,
    ProjectCache,
};
use tracing::debug;

/// One row of the capability catalog: probes a plugin for a single contract
/// and, if implemented, hands it the matching collaborator.
///
/// Returns `true` when the plugin implemented the contract.
#[derive(Clone, Copy)]
pub(crate) struct CapabilityInjector {
    pub(crate) capability: &'static str,
    pub(crate) inject: fn(&PluginInitializer, &mut dyn AdmissionPlugin) -> bool,
}

/// Capability catalog, in injection order.
///
/// Adding a collaborator means one contract trait, one probe on
/// `AdmissionPlugin` and one row here.
pub(crate) const CATALOG: [CapabilityInjector; 5] = [
    CapabilityInjector {
        capability: "client",
        inject: inject_client,
    },
    CapabilityInjector {
        capability: "project_cache",
        inject: inject_project_cache,
    },
    CapabilityInjector {
        capability: "authorizer",
        inject: inject_authorizer,
    },
    CapabilityInjector {
        capability: "rule_resolver",
        inject: inject_rule_resolver,
    },
    CapabilityInjector {
        capability: "client_config",
        inject: inject_client_config,
    },
];

/// Holds the collaborators owned by the hosting server and injects them into
/// admission plugins.
///
/// The initializer shares the collaborators with plugins but never calls or
/// mutates them.
pub struct PluginInitializer {
    client: Arc<dyn ControlPlaneClient>,
    project_cache: Arc<dyn ProjectCache>,
    authorizer: Arc<dyn Authorizer>,
    rule_resolver: Arc<dyn AuthorizationRuleResolver>,
    client_config: ClientConfig,
}

impl PluginInitializer {
    #[must_use]
    pub fn new(
        client: Arc<dyn ControlPlaneClient>,
        project_cache: Arc<dyn ProjectCache>,
        authorizer: Arc<dyn Authorizer>,
        rule_resolver: Arc<dyn AuthorizationRuleResolver>,
        client_config: ClientConfig,
    ) -> Self {
        Self {
            client,
            project_cache,
            authorizer,
            rule_resolver,
            client_config,
        }
    }

    /// Supply every plugin with the collaborators it asks for.
    ///
    /// Plugins are visited in list order and probed for each contract in
    /// catalog order. A plugin that implements no contract is left untouched.
    /// Setters overwrite, so calling this again with the same plugins is a
    /// no-op in effect.
    #[tracing::instrument(skip_all, fields(plugin_count = plugins.len()))]
    pub fn initialize(&self, plugins: &mut [Box<dyn AdmissionPlugin>]) {
        self.initialize_with(plugins, &CATALOG);
    }

    pub(crate) fn initialize_with(
        &self,
        plugins: &mut [Box<dyn AdmissionPlugin>],
        catalog: &[CapabilityInjector],
    ) {
        for plugin in plugins.iter_mut() {
            let plugin: &mut dyn AdmissionPlugin = &mut **plugin;
            for injector in catalog {
                if (injector.inject)(self, plugin) {
                    debug!(
                        plugin = plugin.name(),
                        capability = injector.capability,
                        "Injected collaborator"
                    );
                }
            }
        }
    }
}

fn inject_client(init: &PluginInitializer, plugin: &mut dyn AdmissionPlugin) -> bool {
    let Some(target) = plugin.as_wants_client() else {
        return false;
    };
    target.set_client(Arc::clone(&init.client));
    true
}

fn inject_project_cache(init: &PluginInitializer, plugin: &mut dyn AdmissionPlugin) -> bool {
    let Some(target) = plugin.as_wants_project_cache() else {
        return false;
    };
    target.set_project_cache(Arc::clone(&init.project_cache));
    true
}

fn inject_authorizer(init: &PluginInitializer, plugin: &mut dyn AdmissionPlugin) -> bool {
    let Some(target) = plugin.as_wants_authorizer() else {
        return false;
    };
    target.set_authorizer(Arc::clone(&init.authorizer));
    true
}

fn inject_rule_resolver(init: &PluginInitializer, plugin: &mut dyn AdmissionPlugin) -> bool {
    let Some(target) = plugin.as_wants_rule_resolver() else {
        return false;
    };
    target.set_rule_resolver(Arc::clone(&init.rule_resolver));
    true
}

fn inject_client_config(init: &PluginInitializer, plugin: &mut dyn AdmissionPlugin) -> bool {
    let Some(target) = plugin.as_wants_client_config() else {
        return false;
    };
    target.set_client_config(init.client_config.clone());
    true
}
