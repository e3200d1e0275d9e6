//! Provider configuration
//!
//! Read from `~/.config/traefik-provider/config.yaml` (or an explicit file),
//! then overridden by command-line flags and environment variables.

use std::path::{Path, PathBuf};

use kube::Client;
use kube::config::{Config, KubeConfigOptions, Kubeconfig};
use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, Result};

/// Provider-level settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Kubeconfig file; in-cluster or `~/.kube/config` inference when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubeconfig: Option<PathBuf>,

    /// Kubeconfig context, current context when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Never contact a cluster; only manifest data sources work
    #[serde(default)]
    pub offline: bool,
}

impl ProviderConfig {
    /// Load configuration from default location
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Get default configuration path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            ProviderError::InvalidConfig("could not determine config directory".to_string())
        })?;
        Ok(config_dir.join("traefik-provider").join("config.yaml"))
    }

    /// Apply command-line overrides; unset values keep the file's settings
    #[must_use]
    pub fn with_overrides(
        mut self,
        kubeconfig: Option<PathBuf>,
        context: Option<String>,
        offline: bool,
    ) -> Self {
        if kubeconfig.is_some() {
            self.kubeconfig = kubeconfig;
        }
        if context.is_some() {
            self.context = context;
        }
        self.offline |= offline;
        self
    }

    /// Build a Kubernetes client from these settings
    pub async fn client(&self) -> Result<Client> {
        let options = KubeConfigOptions {
            context: self.context.clone(),
            ..Default::default()
        };

        let config = match (&self.kubeconfig, &self.context) {
            (Some(path), _) => {
                tracing::debug!(kubeconfig = %path.display(), "loading kubeconfig");
                let kubeconfig = Kubeconfig::read_from(path).map_err(|e| {
                    ProviderError::ClientConfig(format!("{}: {}", path.display(), e))
                })?;
                Config::from_custom_kubeconfig(kubeconfig, &options)
                    .await
                    .map_err(|e| ProviderError::ClientConfig(e.to_string()))?
            }
            (None, Some(_)) => Config::from_kubeconfig(&options)
                .await
                .map_err(|e| ProviderError::ClientConfig(e.to_string()))?,
            (None, None) => Config::infer()
                .await
                .map_err(|e| ProviderError::ClientConfig(e.to_string()))?,
        };

        Client::try_from(config).map_err(|e| ProviderError::ClientConfig(e.to_string()))
    }
}
