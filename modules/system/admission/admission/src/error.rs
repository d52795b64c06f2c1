//! Errors raised while configuring and assembling the admission chain.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to register a plugin factory.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("admission plugin '{0}' is already registered")]
    Duplicate(String),
}

/// Failure to load [`AdmissionConfig`](crate::AdmissionConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("admission config file '{}' does not exist", .0.display())]
    MissingFile(PathBuf),

    #[error("failed to load admission config: {0}")]
    Load(Box<figment::Error>),

    /// A `plugin_config` entry names no plugin in `plugin_order`. Environment
    /// overrides are lowercased, so this is also what a misspelled or
    /// mixed-case override turns into.
    #[error("admission config has settings for '{0}', which is not in plugin_order")]
    UnlistedPlugin(String),
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        Self::Load(Box::new(e))
    }
}

/// Failure to assemble an [`AdmissionChain`](crate::AdmissionChain).
#[derive(Debug, Error)]
pub enum ChainBuildError {
    #[error("unknown admission plugin '{0}'")]
    UnknownPlugin(String),

    #[error("admission plugin '{0}' is listed more than once")]
    DuplicatePlugin(String),

    #[error("failed to construct admission plugin '{plugin}': {reason:#}")]
    Construction {
        plugin: String,
        reason: anyhow::Error,
    },

    /// A plugin rejected its own configuration; carries the plugin's error
    /// unchanged.
    #[error("admission chain failed validation: {0:#}")]
    Validation(anyhow::Error),
}
