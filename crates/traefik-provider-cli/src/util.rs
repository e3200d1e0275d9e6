//! Shared helpers for commands

use serde_json::Value;
use std::path::Path;
use traefik_provider::{ImportId, Provider, TypeName};

use crate::display;
use crate::error::{CliError, Result};

/// Read a YAML (or JSON) configuration file as a JSON document
///
/// Plain Kubernetes manifests of the type's kind are converted.
pub fn read_config(type_name: &str, path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path).map_err(|e| CliError::Io {
        message: format!("{}: {}", path.display(), e),
    })?;
    display::report(Provider::offline().parse_config(type_name, &content))
}

/// Parse a type name, reporting unknown names as diagnostics
pub fn parse_type(type_name: &str) -> Result<TypeName> {
    display::report(type_name.parse::<TypeName>().map_err(Into::into))
}

/// Parse a `namespace/name` identifier, reporting failures as diagnostics
pub fn parse_id(id: &str) -> Result<ImportId> {
    display::report(id.parse::<ImportId>().map_err(Into::into))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MIDDLEWARE: &str = "traefik_io_middleware_v1alpha1";

    #[test]
    fn test_read_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("retry.yaml");
        std::fs::write(
            &path,
            "metadata:\n  name: retry\nspec:\n  retry:\n    attempts: 3\n",
        )
        .unwrap();

        let config = read_config(MIDDLEWARE, &path).unwrap();
        assert_eq!(config["metadata"]["name"], "retry");
        assert_eq!(config["spec"]["retry"]["attempts"], 3);
    }

    #[test]
    fn test_read_config_manifest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("retry.yaml");
        std::fs::write(
            &path,
            "apiVersion: traefik.io/v1alpha1\nkind: Middleware\nmetadata:\n  name: retry\n  namespace: web\nspec:\n  retry:\n    attempts: 3\n",
        )
        .unwrap();

        let config = read_config(MIDDLEWARE, &path).unwrap();
        assert_eq!(config["metadata"]["namespace"], "web");
        assert_eq!(config["field_manager"], "terraform");

        let err = read_config("traefik_io_traefik_service_v1alpha1", &path).unwrap_err();
        assert_eq!(err.exit_code(), crate::exit_codes::VALIDATION_ERROR);
    }

    #[test]
    fn test_read_config_errors() {
        let dir = TempDir::new().unwrap();
        let missing = read_config(MIDDLEWARE, &dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(missing, CliError::Io { .. }));

        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "metadata: [").unwrap();
        assert!(read_config(MIDDLEWARE, &path).unwrap_err().is_reported());
    }

    #[test]
    fn test_parse_id() {
        let id = parse_id("web/retry").unwrap();
        assert_eq!(id.namespace, "web");
        assert!(parse_id("retry").unwrap_err().is_reported());
    }
}
