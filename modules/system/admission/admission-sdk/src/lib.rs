#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Admission SDK
//!
//! This crate provides the contracts shared by the admission chain and the
//! plugins that run inside it:
//!
//! - [`AdmissionPlugin`] - The plugin contract (admit + capability probes)
//! - [`WantsClient`], [`WantsProjectCache`], [`WantsAuthorizer`],
//!   [`WantsRuleResolver`], [`WantsClientConfig`] - Capability contracts,
//!   one setter per shared collaborator
//! - [`Validator`] - Post-injection self-check
//! - [`ControlPlaneClient`], [`ProjectCache`], [`Authorizer`],
//!   [`AuthorizationRuleResolver`] - Collaborator APIs implemented by the host
//! - [`Attributes`], [`ClientConfig`], [`PolicyRule`], [`Project`] - Models
//! - [`AdmissionError`], [`CollaboratorError`] - Error types
//!
//! ## Usage
//!
//! A plugin implements only the capability contracts it needs and overrides
//! the matching probe on [`AdmissionPlugin`]:
//!
//! ```ignore
//! use admission_sdk::{AdmissionPlugin, ProjectCache, WantsProjectCache};
//!
//! #[derive(Default)]
//! struct ProjectLifecycle {
//!     cache: Option<Arc<dyn ProjectCache>>,
//! }
//!
//! impl WantsProjectCache for ProjectLifecycle {
//!     fn set_project_cache(&mut self, cache: Arc<dyn ProjectCache>) {
//!         self.cache = Some(cache);
//!     }
//! }
//!
//! #[async_trait]
//! impl AdmissionPlugin for ProjectLifecycle {
//!     fn name(&self) -> &str { "ProjectLifecycle" }
//!     fn handles(&self, op: Operation) -> bool { op == Operation::Create }
//!     async fn admit(&self, attrs: &mut Attributes) -> Result<(), AdmissionError> { /* ... */ }
//!
//!     fn as_wants_project_cache(&mut self) -> Option<&mut dyn WantsProjectCache> {
//!         Some(self)
//!     }
//! }
//! ```

pub mod api;
pub mod capabilities;
pub mod error;
pub mod models;
pub mod plugin_api;

// Re-export main types at crate root
pub use api::{AuthorizationRuleResolver, Authorizer, ControlPlaneClient, ProjectCache};
pub use capabilities::{
    Validator, WantsAuthorizer, WantsClient, WantsClientConfig, WantsProjectCache,
    WantsRuleResolver,
};
pub use error::{AdmissionError, CollaboratorError};
pub use models::{
    Attributes, AuthorizationAttributes, ClientConfig, Decision, Operation, PolicyRule, Project,
    ProjectPhase, UserInfo,
};
pub use plugin_api::AdmissionPlugin;
