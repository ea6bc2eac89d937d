//! Settings resolution with CLI flag overrides.
//!
//! Flags beat `ILO_*` variables, which beat the config file. Credentials
//! are not overridable from the command line; they stay with the resolver.

use std::path::PathBuf;
use std::sync::Arc;

use ilofan_config::{EnvResolver, Settings};
use ilofan_core::{ControllerConfig, FanController};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub fn settings_path(global: &GlobalOpts) -> PathBuf {
    ilofan_config::settings_path(global.config.as_deref())
}

/// Layered settings plus flag overrides.
pub fn load(global: &GlobalOpts) -> Result<Settings, CliError> {
    let mut settings = ilofan_config::load_settings(&settings_path(global))?;

    if let Some(timeout) = global.timeout {
        settings.timeout = timeout;
    }
    if let Some(port) = global.ssh_port {
        settings.ssh_port = port;
    }
    if !global.kex.is_empty() {
        settings.kex.clone_from(&global.kex);
    }
    Ok(settings)
}

pub fn controller_config(global: &GlobalOpts) -> Result<ControllerConfig, CliError> {
    let settings = load(global)?;
    Ok(settings.controller_config()?)
}

/// Facade wired to the environment resolver and the SSH connector.
pub fn controller(global: &GlobalOpts) -> Result<FanController, CliError> {
    let config = controller_config(global)?;
    let resolver = EnvResolver::new(settings_path(global));
    tracing::debug!(config = ?config, "controller configured");
    Ok(FanController::new(config, Arc::new(resolver)))
}
