//! Plugin API trait for admission plugins.

use async_trait::async_trait;

use crate::capabilities::{
    Validator, WantsAuthorizer, WantsClient, WantsClientConfig, WantsProjectCache,
    WantsRuleResolver,
};
use crate::error::AdmissionError;
use crate::models::{Attributes, Operation};

/// Plugin API trait for admission plugins.
///
/// Besides `admit`, the trait carries one probe per capability contract. Each
/// probe returns `None` by default; a plugin overrides only the probes for the
/// contracts it implements, returning `Some(self)`. The initializer uses the
/// probes to decide which collaborators to inject.
#[async_trait]
pub trait AdmissionPlugin: Send + Sync {
    /// Name the plugin is registered and configured under.
    fn name(&self) -> &str;

    /// Whether the plugin wants to see requests for `operation`.
    fn handles(&self, operation: Operation) -> bool;

    /// Admit, mutate or reject a request.
    ///
    /// # Errors
    ///
    /// - `Forbidden` if the request violates the plugin's policy
    /// - `Invalid` if the request is malformed for this plugin
    /// - `Internal` if a collaborator failed
    async fn admit(&self, attributes: &mut Attributes) -> Result<(), AdmissionError>;

    fn as_wants_client(&mut self) -> Option<&mut dyn WantsClient> {
        None
    }

    fn as_wants_project_cache(&mut self) -> Option<&mut dyn WantsProjectCache> {
        None
    }

    fn as_wants_authorizer(&mut self) -> Option<&mut dyn WantsAuthorizer> {
        None
    }

    fn as_wants_rule_resolver(&mut self) -> Option<&mut dyn WantsRuleResolver> {
        None
    }

    fn as_wants_client_config(&mut self) -> Option<&mut dyn WantsClientConfig> {
        None
    }

    fn as_validator(&self) -> Option<&dyn Validator> {
        None
    }
}
