//! Plain Kubernetes manifests of the Traefik kinds
//!
//! A manifest carries its own `apiVersion` and `kind`; both must match the
//! resource it is decoded into, otherwise a `TraefikService` manifest could
//! silently be read as an empty `Middleware`.

use kube::Resource;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{CrdError, Result};

/// Check `apiVersion` and `kind` of a document against `K`
pub fn check_type_meta<K: Resource<DynamicType = ()>>(document: &Value) -> Result<()> {
    let expected_kind = K::kind(&());
    let found_kind = document.get("kind").and_then(Value::as_str).unwrap_or("");
    if found_kind != expected_kind {
        return Err(CrdError::UnexpectedKind {
            expected: expected_kind.into_owned(),
            found: found_kind.to_string(),
        });
    }

    let expected_api_version = K::api_version(&());
    let found_api_version = document
        .get("apiVersion")
        .and_then(Value::as_str)
        .unwrap_or("");
    if found_api_version != expected_api_version {
        return Err(CrdError::UnexpectedApiVersion {
            expected: expected_api_version.into_owned(),
            found: found_api_version.to_string(),
        });
    }

    Ok(())
}

/// Decode a YAML manifest into `K`
pub fn from_yaml<K>(yaml: &str) -> Result<K>
where
    K: Resource<DynamicType = ()> + DeserializeOwned,
{
    let document: Value = serde_yaml::from_str(yaml)?;
    check_type_meta::<K>(&document)?;
    Ok(serde_json::from_value(document)?)
}

/// True when a document looks like a Kubernetes manifest
pub fn is_manifest(document: &Value) -> bool {
    document.get("apiVersion").is_some()
}
