//! Startup self-check of an injected plugin list.

use admission_sdk::AdmissionPlugin;
use tracing::{debug, warn};

/// Run the self-check of every plugin that implements
/// [`Validator`](admission_sdk::Validator), in list order.
///
/// Stops at the first failure; plugins after it are not checked in this call.
/// Takes the plugins by shared reference and never mutates them.
///
/// # Errors
///
/// Returns the first failing plugin's error unchanged.
#[tracing::instrument(skip_all, fields(plugin_count = plugins.len()))]
pub fn validate(plugins: &[Box<dyn AdmissionPlugin>]) -> anyhow::Result<()> {
    for plugin in plugins {
        let Some(validator) = plugin.as_validator() else {
            continue;
        };
        if let Err(e) = validator.validate() {
            warn!(plugin = plugin.name(), error = %e, "Admission plugin failed validation");
            return Err(e);
        }
        debug!(plugin = plugin.name(), "Admission plugin validated");
    }
    Ok(())
}
