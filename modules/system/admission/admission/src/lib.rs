//! Admission Chain
//!
//! Wires independently-authored admission plugins to the shared collaborators
//! they need and checks the configured chain before it serves traffic.
//!
//! Startup sequence driven by the hosting server:
//! 1. Build plugins by name from a [`PluginRegistry`] using [`AdmissionConfig`]
//! 2. Inject collaborators with [`PluginInitializer::initialize`]
//! 3. Fail fast on misconfiguration with [`validate`]
//! 4. Serve requests through the resulting [`AdmissionChain`]
//!
//! [`PluginRegistry::new_from_plugins`] runs steps 1-3 in one call.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod chain;
pub mod config;
pub mod error;
pub mod initializer;
pub mod registry;
pub mod validate;

pub use chain::AdmissionChain;
pub use config::{AdmissionConfig, PluginConfigEntry};
pub use error::{ChainBuildError, ConfigError, RegistryError};
pub use initializer::PluginInitializer;
pub use registry::{PluginFactory, PluginRegistry};
pub use validate::validate;
