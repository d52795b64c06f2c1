//! Configuration for the admission chain.

use std::collections::HashMap;
use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Prefix of environment overrides, e.g.
/// `ADMISSION__PLUGIN_CONFIG__PROJECT_REQUEST_LIMIT__DISABLED=true`.
/// Keys are lowercased, so plugin names should be `snake_case`; an override
/// for a mixed-case name is rejected by [`AdmissionConfig::load`].
const ENV_PREFIX: &str = "ADMISSION__";
const ENV_SEPARATOR: &str = "__";

/// Admission chain configuration.
///
/// ```yaml
/// plugin_order:
///   - project_lifecycle
///   - project_request_limit
/// plugin_config:
///   project_request_limit:
///     configuration:
///       max_projects: 5
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdmissionConfig {
    /// Plugin names in chain order.
    pub plugin_order: Vec<String>,

    /// Per-plugin settings keyed by plugin name.
    pub plugin_config: HashMap<String, PluginConfigEntry>,
}

/// Settings for a single plugin.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PluginConfigEntry {
    /// Skip the plugin even though it is listed in `plugin_order`.
    pub disabled: bool,

    /// Opaque configuration handed to the plugin factory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<serde_json::Value>,
}

impl AdmissionConfig {
    /// Load configuration from defaults, an optional YAML file and
    /// `ADMISSION__`-prefixed environment variables, in that order of
    /// precedence (later wins).
    ///
    /// # Errors
    ///
    /// - `ConfigError::MissingFile` if `path` does not exist
    /// - `ConfigError::Load` if the file cannot be parsed or the merged
    ///   values do not match the schema
    /// - `ConfigError::UnlistedPlugin` if `plugin_config` has an entry for a
    ///   name missing from `plugin_order`
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            if !path.is_file() {
                return Err(ConfigError::MissingFile(path.to_path_buf()));
            }
            figment = figment.merge(Yaml::file(path));
        }
        let cfg: Self = figment
            .merge(Env::prefixed(ENV_PREFIX).split(ENV_SEPARATOR))
            .extract()?;
        cfg.check_plugin_config()?;
        Ok(cfg)
    }

    /// Reject `plugin_config` entries that no listed plugin would read.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnlistedPlugin` with the first such name, sorted.
    pub fn check_plugin_config(&self) -> Result<(), ConfigError> {
        let mut unlisted: Vec<&str> = self
            .plugin_config
            .keys()
            .map(String::as_str)
            .filter(|name| !self.plugin_order.iter().any(|p| p == name))
            .collect();
        unlisted.sort_unstable();
        match unlisted.first() {
            Some(name) => Err(ConfigError::UnlistedPlugin((*name).to_owned())),
            None => Ok(()),
        }
    }

    /// Whether `plugin` is explicitly disabled.
    #[must_use]
    pub fn is_disabled(&self, plugin: &str) -> bool {
        self.plugin_config.get(plugin).is_some_and(|e| e.disabled)
    }

    /// Configuration for `plugin`, if any.
    #[must_use]
    pub fn plugin_configuration(&self, plugin: &str) -> Option<&serde_json::Value> {
        self.plugin_config
            .get(plugin)
            .and_then(|e| e.configuration.as_ref())
    }

    /// Names of the plugins that will actually be built, in chain order.
    #[must_use]
    pub fn enabled_plugins(&self) -> Vec<&str> {
        self.plugin_order
            .iter()
            .map(String::as_str)
            .filter(|name| !self.is_disabled(name))
            .collect()
    }
}
