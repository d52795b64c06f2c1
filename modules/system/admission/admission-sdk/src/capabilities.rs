//! Capability contracts.
//!
//! Each trait declares a single setter for one shared collaborator. A plugin
//! implements only the contracts it needs and exposes them through the
//! matching probe on [`AdmissionPlugin`](crate::AdmissionPlugin). Setters are
//! expected to overwrite, so repeated injection leaves the plugin unchanged.

use std::sync::Arc;

use crate::api::{AuthorizationRuleResolver, Authorizer, ControlPlaneClient, ProjectCache};
use crate::models::ClientConfig;

/// Plugin wants the control-plane client.
pub trait WantsClient {
    fn set_client(&mut self, client: Arc<dyn ControlPlaneClient>);
}

/// Plugin wants the shared project cache.
pub trait WantsProjectCache {
    fn set_project_cache(&mut self, cache: Arc<dyn ProjectCache>);
}

/// Plugin wants the authorizer.
pub trait WantsAuthorizer {
    fn set_authorizer(&mut self, authorizer: Arc<dyn Authorizer>);
}

/// Plugin wants the authorization rule resolver.
pub trait WantsRuleResolver {
    fn set_rule_resolver(&mut self, resolver: Arc<dyn AuthorizationRuleResolver>);
}

/// Plugin wants the client configuration.
pub trait WantsClientConfig {
    fn set_client_config(&mut self, config: ClientConfig);
}

/// Plugin can check itself once all collaborators have been injected.
///
/// Must not mutate plugin state.
pub trait Validator {
    /// # Errors
    ///
    /// Returns a descriptive error when the plugin is misconfigured or is
    /// missing a collaborator it requires.
    fn validate(&self) -> anyhow::Result<()>;
}
