//! Domain models for the admission chain.

use std::collections::HashMap;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Wildcard accepted in policy rule verbs, resources and resource names.
const WILDCARD: &str = "*";

/// Kind of change an incoming request makes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    Update,
    Delete,
    Connect,
}

/// The authenticated user behind a request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserInfo {
    pub name: String,
    #[serde(default)]
    pub uid: Uuid,
    #[serde(default)]
    pub groups: Vec<String>,
}

/// Everything a plugin sees about a request under admission.
///
/// Plugins may mutate `object`; later plugins in the chain observe the change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attributes {
    pub operation: Operation,
    /// Kind of the object (e.g. "Project", "Build").
    pub kind: String,
    /// Resource collection (e.g. "projects", "builds").
    pub resource: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subresource: Option<String>,
    /// Project the object lives in. Empty for cluster-scoped objects.
    #[serde(default)]
    pub namespace: String,
    /// Object name. May be empty on create when the name is generated.
    #[serde(default)]
    pub name: String,
    pub user: UserInfo,
    /// The object itself. Absent for deletes and connects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<serde_json::Value>,
}

impl Attributes {
    #[must_use]
    pub fn new(operation: Operation, kind: &str, resource: &str, user: UserInfo) -> Self {
        Self {
            operation,
            kind: kind.to_owned(),
            resource: resource.to_owned(),
            subresource: None,
            namespace: String::new(),
            name: String::new(),
            user,
            object: None,
        }
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: &str) -> Self {
        namespace.clone_into(&mut self.namespace);
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        name.clone_into(&mut self.name);
        self
    }

    #[must_use]
    pub fn with_object(mut self, object: serde_json::Value) -> Self {
        self.object = Some(object);
        self
    }
}

/// Input of an [`Authorizer`](crate::Authorizer) check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationAttributes {
    pub user: UserInfo,
    pub verb: String,
    pub resource: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_name: Option<String>,
}

/// Authorizer outcome.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    /// Human-readable explanation, usually set on denial.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Decision {
    #[must_use]
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    #[must_use]
    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
        }
    }
}

/// A single authorization rule granted to a subject.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PolicyRule {
    pub verbs: Vec<String>,
    pub resources: Vec<String>,
}

impl PolicyRule {
    /// Whether the rule covers `verb` on `resource`, honouring `*`.
    #[must_use]
    pub fn matches(&self, verb: &str, resource: &str) -> bool {
        covers(&self.verbs, verb) && covers(&self.resources, resource)
    }
}

fn covers(allowed: &[String], value: &str) -> bool {
    allowed.iter().any(|a| a == WILDCARD || a == value)
}

/// Lifecycle phase of a project.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProjectPhase {
    #[default]
    Active,
    Terminating,
}

/// Project (tenant) metadata served by the project cache.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub annotations: HashMap<String, String>,
    #[serde(default)]
    pub phase: ProjectPhase,
}

impl Project {
    #[must_use]
    pub fn is_terminating(&self) -> bool {
        self.phase == ProjectPhase::Terminating
    }
}

fn default_host() -> String {
    "https://localhost:8443".to_owned()
}

fn default_qps() -> u32 {
    5
}

fn default_burst() -> u32 {
    10
}

fn default_timeout_secs() -> u64 {
    30
}

/// Connection parameters for the control-plane client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    #[serde(default = "default_host")]
    pub host: String,
    /// Bearer token for the server identity. Read from config but never
    /// serialized; wrapped in `SecretString` so `Debug` redacts it.
    #[serde(default, skip_serializing)]
    pub bearer_token: Option<SecretString>,
    #[serde(default = "default_qps")]
    pub qps: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Skip TLS verification. Development only.
    #[serde(default)]
    pub insecure: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            bearer_token: None,
            qps: default_qps(),
            burst: default_burst(),
            timeout_secs: default_timeout_secs(),
            insecure: false,
        }
    }
}
