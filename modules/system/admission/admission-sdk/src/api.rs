//! Collaborator APIs handed to admission plugins.
//!
//! These traits are implemented by the hosting server. The admission chain
//! only passes shared handles around; it never calls them itself.

use async_trait::async_trait;

use crate::error::CollaboratorError;
use crate::models::{AuthorizationAttributes, Decision, PolicyRule, Project, UserInfo};

/// Server-side client used by plugins to reach the control plane.
///
/// ```ignore
/// let project = client.get_project(&attrs.namespace).await?;
/// ```
#[async_trait]
pub trait ControlPlaneClient: Send + Sync {
    /// Fetch a project directly from the control plane.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the project does not exist
    /// - `Unavailable` if the control plane cannot be reached
    async fn get_project(&self, name: &str) -> Result<Project, CollaboratorError>;
}

/// Shared read-through cache of project (tenant) metadata.
#[async_trait]
pub trait ProjectCache: Send + Sync {
    /// Look up a project by name.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the project is unknown to the cache and its backing store
    /// - `Unavailable` if the cache has not synced yet
    async fn get_project(&self, name: &str) -> Result<Project, CollaboratorError>;

    /// Whether the cache has completed its initial sync.
    fn running(&self) -> bool;
}

/// Authorization decision function: (subject, action, resource) to allow/deny.
#[async_trait]
pub trait Authorizer: Send + Sync {
    /// Decide whether the subject may perform the verb on the resource.
    ///
    /// A denial is a `Decision` with `allowed == false`, not an error.
    ///
    /// # Errors
    ///
    /// - `Unavailable` / `Internal` on infrastructure failures only
    async fn authorize(
        &self,
        attributes: &AuthorizationAttributes,
    ) -> Result<Decision, CollaboratorError>;
}

/// Lookup of the authorization rules that apply to a subject.
#[async_trait]
pub trait AuthorizationRuleResolver: Send + Sync {
    /// Rules granted to `user` within `namespace`. An empty namespace means
    /// cluster-wide rules only.
    ///
    /// # Errors
    ///
    /// - `Unavailable` / `Internal` when the rule store cannot be read
    async fn rules_for(
        &self,
        user: &UserInfo,
        namespace: &str,
    ) -> Result<Vec<PolicyRule>, CollaboratorError>;
}
