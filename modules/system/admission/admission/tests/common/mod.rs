#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

//! Shared fakes for admission chain tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use admission::PluginInitializer;
use admission_sdk::{
    AdmissionError, AdmissionPlugin, Attributes, AuthorizationAttributes,
    AuthorizationRuleResolver, Authorizer, ClientConfig, CollaboratorError, ControlPlaneClient,
    Decision, Operation, PolicyRule, Project, ProjectCache, ProjectPhase, UserInfo, Validator,
    WantsAuthorizer, WantsClient, WantsClientConfig, WantsProjectCache, WantsRuleResolver,
};
use async_trait::async_trait;
use secrecy::SecretString;

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

/// Control-plane client backed by a fixed project list.
pub struct FakeClient {
    projects: Vec<Project>,
}

#[async_trait]
impl ControlPlaneClient for FakeClient {
    async fn get_project(&self, name: &str) -> Result<Project, CollaboratorError> {
        self.projects
            .iter()
            .find(|p| p.name == name)
            .cloned()
            .ok_or_else(|| CollaboratorError::NotFound(name.to_owned()))
    }
}

/// Project cache backed by a map.
pub struct StaticProjectCache {
    projects: HashMap<String, Project>,
}

impl StaticProjectCache {
    pub fn new(projects: impl IntoIterator<Item = Project>) -> Self {
        Self {
            projects: projects.into_iter().map(|p| (p.name.clone(), p)).collect(),
        }
    }
}

#[async_trait]
impl ProjectCache for StaticProjectCache {
    async fn get_project(&self, name: &str) -> Result<Project, CollaboratorError> {
        self.projects
            .get(name)
            .cloned()
            .ok_or_else(|| CollaboratorError::NotFound(name.to_owned()))
    }

    fn running(&self) -> bool {
        true
    }
}

/// Allows everything except the listed verbs.
pub struct VerbDenyingAuthorizer {
    denied_verbs: Vec<String>,
}

#[async_trait]
impl Authorizer for VerbDenyingAuthorizer {
    async fn authorize(
        &self,
        attributes: &AuthorizationAttributes,
    ) -> Result<Decision, CollaboratorError> {
        if self.denied_verbs.contains(&attributes.verb) {
            Ok(Decision::deny(format!("{} is not allowed", attributes.verb)))
        } else {
            Ok(Decision::allow())
        }
    }
}

/// Grants the same rules to every subject.
pub struct StaticRuleResolver {
    rules: Vec<PolicyRule>,
}

#[async_trait]
impl AuthorizationRuleResolver for StaticRuleResolver {
    async fn rules_for(
        &self,
        _user: &UserInfo,
        _namespace: &str,
    ) -> Result<Vec<PolicyRule>, CollaboratorError> {
        Ok(self.rules.clone())
    }
}

pub fn project(name: &str, phase: ProjectPhase) -> Project {
    Project {
        name: name.to_owned(),
        phase,
        ..Project::default()
    }
}

/// The collaborators handed to the initializer, kept for identity checks.
pub struct Collaborators {
    pub client: Arc<dyn ControlPlaneClient>,
    pub cache: Arc<dyn ProjectCache>,
    pub authorizer: Arc<dyn Authorizer>,
    pub resolver: Arc<dyn AuthorizationRuleResolver>,
    pub config: ClientConfig,
}

impl Collaborators {
    pub fn new() -> Self {
        let projects = vec![
            project("alpha", ProjectPhase::Active),
            project("doomed", ProjectPhase::Terminating),
        ];
        Self {
            client: Arc::new(FakeClient {
                projects: projects.clone(),
            }),
            cache: Arc::new(StaticProjectCache::new(projects)),
            authorizer: Arc::new(VerbDenyingAuthorizer {
                denied_verbs: vec!["delete".to_owned()],
            }),
            resolver: Arc::new(StaticRuleResolver {
                rules: vec![PolicyRule {
                    verbs: vec!["create".to_owned()],
                    resources: vec!["builds".to_owned()],
                }],
            }),
            config: ClientConfig {
                host: "https://control-plane.test:6443".to_owned(),
                bearer_token: Some(SecretString::from("server-token".to_owned())),
                ..ClientConfig::default()
            },
        }
    }

    pub fn initializer(&self) -> PluginInitializer {
        PluginInitializer::new(
            Arc::clone(&self.client),
            Arc::clone(&self.cache),
            Arc::clone(&self.authorizer),
            Arc::clone(&self.resolver),
            self.config.clone(),
        )
    }
}

pub fn user(name: &str) -> UserInfo {
    UserInfo {
        name: name.to_owned(),
        ..UserInfo::default()
    }
}

// ---------------------------------------------------------------------------
// Plugins
// ---------------------------------------------------------------------------

/// Which capability contracts a [`ProbePlugin`] claims to implement.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wants {
    pub client: bool,
    pub cache: bool,
    pub authorizer: bool,
    pub resolver: bool,
    pub config: bool,
}

impl Wants {
    pub fn all() -> Self {
        Self {
            client: true,
            cache: true,
            authorizer: true,
            resolver: true,
            config: true,
        }
    }
}

/// What a [`ProbePlugin`] received, observable from the test after the
/// plugin has been boxed.
#[derive(Default)]
pub struct Observed {
    pub client: Option<Arc<dyn ControlPlaneClient>>,
    pub cache: Option<Arc<dyn ProjectCache>>,
    pub authorizer: Option<Arc<dyn Authorizer>>,
    pub resolver: Option<Arc<dyn AuthorizationRuleResolver>>,
    pub config: Option<ClientConfig>,
    pub set_calls: usize,
    pub validate_calls: usize,
    pub admit_calls: usize,
}

pub type Handle = Arc<Mutex<Observed>>;

/// Plugin whose capabilities, validation outcome and verdict are chosen by
/// the test.
pub struct ProbePlugin {
    name: String,
    wants: Wants,
    /// `None` means the plugin does not implement `Validator`.
    validation: Option<Result<(), String>>,
    reject_with: Option<String>,
    observed: Handle,
}

impl ProbePlugin {
    pub fn new(name: &str, wants: Wants) -> Self {
        Self {
            name: name.to_owned(),
            wants,
            validation: None,
            reject_with: None,
            observed: Handle::default(),
        }
    }

    #[must_use]
    pub fn validating(mut self, outcome: Result<(), &str>) -> Self {
        self.validation = Some(outcome.map_err(str::to_owned));
        self
    }

    #[must_use]
    pub fn rejecting(mut self, reason: &str) -> Self {
        self.reject_with = Some(reason.to_owned());
        self
    }

    pub fn boxed(self) -> (Box<dyn AdmissionPlugin>, Handle) {
        let handle = Arc::clone(&self.observed);
        (Box::new(self), handle)
    }
}

impl WantsClient for ProbePlugin {
    fn set_client(&mut self, client: Arc<dyn ControlPlaneClient>) {
        let mut o = self.observed.lock().unwrap();
        o.client = Some(client);
        o.set_calls += 1;
    }
}

impl WantsProjectCache for ProbePlugin {
    fn set_project_cache(&mut self, cache: Arc<dyn ProjectCache>) {
        let mut o = self.observed.lock().unwrap();
        o.cache = Some(cache);
        o.set_calls += 1;
    }
}

impl WantsAuthorizer for ProbePlugin {
    fn set_authorizer(&mut self, authorizer: Arc<dyn Authorizer>) {
        let mut o = self.observed.lock().unwrap();
        o.authorizer = Some(authorizer);
        o.set_calls += 1;
    }
}

impl WantsRuleResolver for ProbePlugin {
    fn set_rule_resolver(&mut self, resolver: Arc<dyn AuthorizationRuleResolver>) {
        let mut o = self.observed.lock().unwrap();
        o.resolver = Some(resolver);
        o.set_calls += 1;
    }
}

impl WantsClientConfig for ProbePlugin {
    fn set_client_config(&mut self, config: ClientConfig) {
        let mut o = self.observed.lock().unwrap();
        o.config = Some(config);
        o.set_calls += 1;
    }
}

impl Validator for ProbePlugin {
    fn validate(&self) -> anyhow::Result<()> {
        self.observed.lock().unwrap().validate_calls += 1;
        match &self.validation {
            Some(Err(msg)) => Err(anyhow::anyhow!("{msg}")),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl AdmissionPlugin for ProbePlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn handles(&self, _operation: Operation) -> bool {
        true
    }

    async fn admit(&self, _attributes: &mut Attributes) -> Result<(), AdmissionError> {
        self.observed.lock().unwrap().admit_calls += 1;
        match &self.reject_with {
            Some(reason) => Err(AdmissionError::forbidden(&self.name, reason.clone())),
            None => Ok(()),
        }
    }

    fn as_wants_client(&mut self) -> Option<&mut dyn WantsClient> {
        if self.wants.client { Some(self) } else { None }
    }

    fn as_wants_project_cache(&mut self) -> Option<&mut dyn WantsProjectCache> {
        if self.wants.cache { Some(self) } else { None }
    }

    fn as_wants_authorizer(&mut self) -> Option<&mut dyn WantsAuthorizer> {
        if self.wants.authorizer { Some(self) } else { None }
    }

    fn as_wants_rule_resolver(&mut self) -> Option<&mut dyn WantsRuleResolver> {
        if self.wants.resolver { Some(self) } else { None }
    }

    fn as_wants_client_config(&mut self) -> Option<&mut dyn WantsClientConfig> {
        if self.wants.config { Some(self) } else { None }
    }

    fn as_validator(&self) -> Option<&dyn Validator> {
        if self.validation.is_some() {
            Some(self)
        } else {
            None
        }
    }
}

/// Plugin that implements no capability contract at all.
pub struct InertPlugin;

#[async_trait]
impl AdmissionPlugin for InertPlugin {
    fn name(&self) -> &str {
        "inert"
    }

    fn handles(&self, _operation: Operation) -> bool {
        false
    }

    async fn admit(&self, _attributes: &mut Attributes) -> Result<(), AdmissionError> {
        Ok(())
    }
}

/// Rejects object creation inside terminating projects. Requires the project
/// cache.
#[derive(Default)]
pub struct ProjectLifecycle {
    cache: Option<Arc<dyn ProjectCache>>,
}

pub const PROJECT_LIFECYCLE: &str = "project_lifecycle";

impl WantsProjectCache for ProjectLifecycle {
    fn set_project_cache(&mut self, cache: Arc<dyn ProjectCache>) {
        self.cache = Some(cache);
    }
}

impl Validator for ProjectLifecycle {
    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.cache.is_some(), "{PROJECT_LIFECYCLE} needs a project cache");
        Ok(())
    }
}

#[async_trait]
impl AdmissionPlugin for ProjectLifecycle {
    fn name(&self) -> &str {
        PROJECT_LIFECYCLE
    }

    fn handles(&self, operation: Operation) -> bool {
        operation == Operation::Create
    }

    async fn admit(&self, attributes: &mut Attributes) -> Result<(), AdmissionError> {
        if attributes.namespace.is_empty() {
            return Ok(());
        }
        let cache = self
            .cache
            .as_ref()
            .ok_or_else(|| AdmissionError::Internal("project cache not injected".to_owned()))?;
        let project = cache.get_project(&attributes.namespace).await?;
        if project.is_terminating() {
            return Err(AdmissionError::forbidden(
                PROJECT_LIFECYCLE,
                format!("project {} is being terminated", project.name),
            ));
        }
        Ok(())
    }

    fn as_wants_project_cache(&mut self) -> Option<&mut dyn WantsProjectCache> {
        Some(self)
    }

    fn as_validator(&self) -> Option<&dyn Validator> {
        Some(self)
    }
}

/// Stamps a label onto created objects and consults the authorizer.
pub struct LabelStamper {
    label: String,
    authorizer: Option<Arc<dyn Authorizer>>,
}

pub const LABEL_STAMPER: &str = "label_stamper";

impl LabelStamper {
    /// Factory-style constructor: reads `label` from the plugin configuration.
    pub fn from_config(config: Option<&serde_json::Value>) -> anyhow::Result<Self> {
        let label = config
            .and_then(|c| c.get("label"))
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| anyhow::anyhow!("{LABEL_STAMPER}: 'label' is required"))?;
        Ok(Self {
            label: label.to_owned(),
            authorizer: None,
        })
    }
}

impl WantsAuthorizer for LabelStamper {
    fn set_authorizer(&mut self, authorizer: Arc<dyn Authorizer>) {
        self.authorizer = Some(authorizer);
    }
}

impl Validator for LabelStamper {
    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.authorizer.is_some(), "{LABEL_STAMPER} needs an authorizer");
        Ok(())
    }
}

#[async_trait]
impl AdmissionPlugin for LabelStamper {
    fn name(&self) -> &str {
        LABEL_STAMPER
    }

    fn handles(&self, operation: Operation) -> bool {
        matches!(operation, Operation::Create | Operation::Delete)
    }

    async fn admit(&self, attributes: &mut Attributes) -> Result<(), AdmissionError> {
        let authorizer = self
            .authorizer
            .as_ref()
            .ok_or_else(|| AdmissionError::Internal("authorizer not injected".to_owned()))?;
        let verb = match attributes.operation {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Connect => "connect",
        };
        let decision = authorizer
            .authorize(&AuthorizationAttributes {
                user: attributes.user.clone(),
                verb: verb.to_owned(),
                resource: attributes.resource.clone(),
                namespace: attributes.namespace.clone(),
                resource_name: None,
            })
            .await?;
        if !decision.allowed {
            return Err(AdmissionError::forbidden(
                LABEL_STAMPER,
                decision.reason.unwrap_or_default(),
            ));
        }
        if let Some(object) = attributes.object.as_mut().and_then(|o| o.as_object_mut()) {
            let labels = object
                .entry("labels")
                .or_insert_with(|| serde_json::json!({}));
            if let Some(labels) = labels.as_object_mut() {
                labels.insert(
                    "stamped-by".to_owned(),
                    serde_json::Value::String(self.label.clone()),
                );
            }
        }
        Ok(())
    }

    fn as_wants_authorizer(&mut self) -> Option<&mut dyn WantsAuthorizer> {
        Some(self)
    }

    fn as_validator(&self) -> Option<&dyn Validator> {
        Some(self)
    }
}
