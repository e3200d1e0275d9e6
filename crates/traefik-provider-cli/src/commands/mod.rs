//! CLI commands

use std::path::PathBuf;

use traefik_provider::{Provider, ProviderConfig};

use crate::display;
use crate::error::{CliError, Result};

pub mod apply;
pub mod destroy;
pub mod import;
pub mod manifest;
pub mod read;
pub mod refresh;
pub mod schema;
pub mod types;
pub mod validate;

/// Flags shared by every command
#[derive(Debug, Clone, Default)]
pub struct Globals {
    pub config: Option<PathBuf>,
    pub kubeconfig: Option<PathBuf>,
    pub context: Option<String>,
    pub offline: bool,
}

impl Globals {
    /// Provider configuration: file first, then flags and environment
    pub fn provider_config(&self) -> Result<ProviderConfig> {
        let loaded = match &self.config {
            Some(path) => ProviderConfig::load_from(path),
            None => ProviderConfig::load(),
        };
        let config = loaded.map_err(|e| {
            CliError::input_with_help(e.to_string(), "check the provider configuration file")
        })?;

        Ok(config.with_overrides(self.kubeconfig.clone(), self.context.clone(), self.offline))
    }

    /// Configured provider, with a Kubernetes client unless offline
    pub async fn provider(&self) -> Result<Provider> {
        let config = self.provider_config()?;
        tracing::debug!(?config, "configuring provider");
        display::report(Provider::configure(config).await)
    }
}
