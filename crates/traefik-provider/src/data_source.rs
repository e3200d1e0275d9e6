//! Data sources: read a live object, or render one as YAML offline

use kube::CustomResourceExt;
use serde::Serialize;

use crate::api::{ObjectApi, describe};
use crate::diagnostics::DiagnosticResult;
use crate::error::ProviderError;
use crate::kind::TraefikKind;
use crate::model::{DataSourceConfig, DataSourceData, ManifestData, object_for};
use crate::resource::spec_from;

/// Read `metadata.namespace/metadata.name` from the cluster
///
/// Unlike a resource read, a missing object is an error.
pub async fn read<K: TraefikKind>(
    api: &dyn ObjectApi,
    config: DataSourceConfig,
) -> DiagnosticResult<DataSourceData<K::Spec>> {
    let resource = K::api_resource();
    let id = config.metadata.id();
    let target = describe(&resource, &id);

    let object = api
        .get(&resource, &id)
        .await?
        .ok_or_else(|| ProviderError::NotFound {
            target: target.clone(),
        })?;

    let mut metadata = config.metadata;
    metadata.refresh_from(&object);

    let spec = match object.get("spec") {
        Some(_) => Some(spec_from(&object, &target)?),
        None => None,
    };

    Ok(DataSourceData {
        id: id.to_string(),
        api_version: K::api_version_str(),
        kind: K::kind_str(),
        metadata,
        spec,
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Manifest<'a> {
    api_version: String,
    kind: String,
    metadata: &'a serde_json::Value,
    spec: &'a serde_json::Value,
}

/// Render the object as a YAML manifest without contacting a cluster
pub fn manifest<K: TraefikKind>(
    mut data: ManifestData<K::Spec>,
) -> DiagnosticResult<ManifestData<K::Spec>> {
    data.validate().into_result()?;

    let id = data.metadata.id();
    let target = describe(&K::api_resource(), &id);
    let spec = serde_json::to_value(&data.spec)
        .map_err(|source| ProviderError::Marshal { target, source })?;
    let object = object_for::<K>(&data.metadata, &spec);

    // Keep the conventional field order instead of the map's sorted keys
    let yaml = serde_yaml::to_string(&Manifest {
        api_version: K::api_version_str(),
        kind: K::kind_str(),
        metadata: &object["metadata"],
        spec: &object["spec"],
    })
    .map_err(ProviderError::from)?;

    data.id = Some(id.to_string());
    data.yaml = Some(yaml);
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockObjectApi;
    use crate::import::ImportId;
    use crate::model::ResourceMetadata;
    use serde_json::json;
    use traefik_crds::{Middleware, MiddlewareSpec, TraefikService, TraefikServiceSpec};

    fn config(namespace: &str, name: &str) -> DataSourceConfig {
        DataSourceConfig {
            metadata: ResourceMetadata::new(namespace, name),
        }
    }

    #[tokio::test]
    async fn test_read() {
        let api = MockObjectApi::new();
        api.insert(
            &Middleware::api_resource(),
            &ImportId::new("web", "retry"),
            json!({
                "apiVersion": "traefik.io/v1alpha1",
                "kind": "Middleware",
                "metadata": {
                    "name": "retry",
                    "namespace": "web",
                    "labels": {"app": "shop"},
                    "uid": "1234"
                },
                "spec": {"retry": {"attempts": 4, "initialInterval": "100ms"}}
            }),
        );

        let data = read::<Middleware>(&api, config("web", "retry")).await.unwrap();
        assert_eq!(data.id, "web/retry");
        assert_eq!(data.api_version, "traefik.io/v1alpha1");
        assert_eq!(data.kind, "Middleware");
        assert_eq!(data.metadata.labels.get("app").map(String::as_str), Some("shop"));

        let retry = data.spec.unwrap().retry.unwrap();
        assert_eq!(retry.attempts, Some(4));
    }

    #[tokio::test]
    async fn test_read_without_spec() {
        let api = MockObjectApi::new();
        api.insert(
            &TraefikService::api_resource(),
            &ImportId::new("web", "empty"),
            json!({"metadata": {"name": "empty", "namespace": "web"}}),
        );

        let data = read::<TraefikService>(&api, config("web", "empty"))
            .await
            .unwrap();
        assert!(data.spec.is_none());
    }

    #[tokio::test]
    async fn test_read_missing_is_an_error() {
        let api = MockObjectApi::new();
        let diagnostics = read::<Middleware>(&api, config("web", "missing"))
            .await
            .unwrap_err();
        let diag = diagnostics.iter().next().unwrap();
        assert_eq!(diag.summary, "Resource not found");
        insta::assert_snapshot!(diag.detail, @"Middleware web/missing not found");
    }

    #[test]
    fn test_manifest() {
        let data: ManifestData<MiddlewareSpec> = serde_json::from_value(json!({
            "metadata": {"name": "strip-api", "namespace": "web"},
            "spec": {"stripPrefix": {"prefixes": ["/api"]}}
        }))
        .unwrap();

        let rendered = manifest::<Middleware>(data).unwrap();
        assert_eq!(rendered.id.as_deref(), Some("web/strip-api"));
        insta::assert_snapshot!(rendered.yaml.unwrap(), @r###"
        apiVersion: traefik.io/v1alpha1
        kind: Middleware
        metadata:
          name: strip-api
          namespace: web
        spec:
          stripPrefix:
            prefixes:
            - /api
        "###);
    }

    #[test]
    fn test_manifest_traefik_service() {
        let data: ManifestData<TraefikServiceSpec> = serde_json::from_value(json!({
            "metadata": {"name": "canary"},
            "spec": {"weighted": {"services": [
                {"name": "app-v1", "port": 80, "weight": 3},
                {"name": "app-v2", "port": "http", "weight": 1}
            ]}}
        }))
        .unwrap();

        let yaml = manifest::<TraefikService>(data).unwrap().yaml.unwrap();
        let parsed: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed["kind"], "TraefikService");
        assert_eq!(parsed["metadata"]["namespace"], "default");
        assert_eq!(parsed["spec"]["weighted"]["services"][0]["port"], 80);
        assert_eq!(parsed["spec"]["weighted"]["services"][1]["port"], "http");
    }

    #[test]
    fn test_manifest_validates() {
        let data: ManifestData<TraefikServiceSpec> = serde_json::from_value(json!({
            "metadata": {"name": "canary"},
            "spec": {
                "weighted": {"services": [{"name": "a"}]},
                "mirroring": {"name": "b"}
            }
        }))
        .unwrap();

        let diagnostics = manifest::<TraefikService>(data).unwrap_err();
        assert_eq!(diagnostics.iter().count(), 1);
        assert_eq!(
            diagnostics.iter().next().unwrap().attribute.as_deref(),
            Some("spec")
        );
    }
}
