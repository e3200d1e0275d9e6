//! Local state files
//!
//! Each managed object is tracked in its own JSON file holding the type name
//! and the provider state returned by the last successful operation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::error::{CliError, Result};

/// Contents of a state file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateFile {
    /// Resource type name
    #[serde(rename = "type")]
    pub type_name: String,

    pub state: Value,
}

impl StateFile {
    pub fn new(type_name: impl Into<String>, state: Value) -> Self {
        Self {
            type_name: type_name.into(),
            state,
        }
    }

    /// Load a state file, `None` when it does not exist
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        let state = serde_json::from_str(&content).map_err(|e| {
            CliError::state(format!("{} is not a valid state file: {}", path.display(), e))
        })?;
        Ok(Some(state))
    }

    /// Load a state file that must exist and belong to `type_name`
    pub fn load_existing(path: &Path, type_name: &str) -> Result<Self> {
        let state = Self::load(path)?.ok_or_else(|| {
            CliError::state_with_help(
                format!("no state at {}", path.display()),
                "create the object with `apply` or adopt it with `import` first",
            )
        })?;
        state.expect_type(type_name)?;
        Ok(state)
    }

    /// Fail unless this state belongs to `type_name`
    pub fn expect_type(&self, type_name: &str) -> Result<()> {
        if self.type_name != type_name {
            return Err(CliError::state(format!(
                "state holds a {}, not a {}",
                self.type_name, type_name
            )));
        }
        Ok(())
    }

    /// Write the state file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| CliError::internal(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Remove a state file if present
    pub fn remove(path: &Path) -> Result<()> {
        match std::fs::remove_file(path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("state.json");

        assert!(StateFile::load(&path).unwrap().is_none());

        let state = StateFile::new("traefik_io_middleware_v1alpha1", json!({"id": "web/a"}));
        state.save(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains(r#""type": "traefik_io_middleware_v1alpha1""#));

        let loaded = StateFile::load_existing(&path, "traefik_io_middleware_v1alpha1").unwrap();
        assert_eq!(loaded, state);

        StateFile::remove(&path).unwrap();
        StateFile::remove(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_type_mismatch() {
        let state = StateFile::new("traefik_io_middleware_v1alpha1", json!({}));
        let err = state
            .expect_type("traefik_io_traefik_service_v1alpha1")
            .unwrap_err();
        assert!(matches!(err, CliError::State { .. }));
    }

    #[test]
    fn test_missing_and_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");

        let err = StateFile::load_existing(&path, "x").unwrap_err();
        assert!(matches!(err, CliError::State { help: Some(_), .. }));

        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            StateFile::load(&path).unwrap_err(),
            CliError::State { .. }
        ));
    }
}
