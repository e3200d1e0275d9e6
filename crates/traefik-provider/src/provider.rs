//! Provider registry
//!
//! The [`Provider`] owns the configured object API and dispatches untyped
//! JSON configuration and state to the typed handlers of each served kind,
//! so front-ends only deal with type names and JSON documents.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use traefik_crds::{Middleware, TraefikService};

use crate::api::{KubeObjectApi, ObjectApi};
use crate::config::ProviderConfig;
use crate::data_source;
use crate::diagnostics::{DiagnosticResult, Diagnostics};
use crate::error::ProviderError;
use crate::kind::{CrdType, TraefikKind, TypeName};
use crate::model::{DataSourceConfig, ManifestData, ResourceData, resource_from_manifest};
use crate::resource;

fn decode<T: DeserializeOwned>(value: Value) -> DiagnosticResult<T> {
    serde_json::from_value(value).map_err(|e| ProviderError::InvalidConfig(e.to_string()).into())
}

fn encode<T: Serialize>(value: &T) -> DiagnosticResult<Value> {
    serde_json::to_value(value).map_err(|source| {
        ProviderError::Marshal {
            target: "state".to_string(),
            source,
        }
        .into()
    })
}

/// Type-erased handlers of one kind
#[async_trait]
trait KindHandlers: Send + Sync {
    fn from_manifest(&self, yaml: &str) -> DiagnosticResult<Value>;
    fn validate(&self, config: Value) -> Diagnostics;
    fn requires_replace(&self, prior: Value, planned: Value) -> DiagnosticResult<bool>;
    fn manifest(&self, config: Value) -> DiagnosticResult<Value>;
    async fn create(&self, api: &dyn ObjectApi, config: Value) -> DiagnosticResult<Value>;
    async fn update(
        &self,
        api: &dyn ObjectApi,
        prior: Value,
        planned: Value,
    ) -> DiagnosticResult<Value>;
    async fn read(&self, api: &dyn ObjectApi, state: Value) -> DiagnosticResult<Option<Value>>;
    async fn delete(&self, api: &dyn ObjectApi, state: Value) -> DiagnosticResult<()>;
    async fn import(&self, api: &dyn ObjectApi, id: &str) -> DiagnosticResult<Value>;
    async fn read_data_source(
        &self,
        api: &dyn ObjectApi,
        config: Value,
    ) -> DiagnosticResult<Value>;
}

struct Handlers<K>(PhantomData<fn() -> K>);

#[async_trait]
impl<K: TraefikKind> KindHandlers for Handlers<K> {
    fn from_manifest(&self, yaml: &str) -> DiagnosticResult<Value> {
        encode(&resource_from_manifest::<K>(yaml)?)
    }

    fn validate(&self, config: Value) -> Diagnostics {
        match decode::<ResourceData<K::Spec>>(config) {
            Ok(data) => data.validate(),
            Err(diagnostics) => diagnostics,
        }
    }

    fn requires_replace(&self, prior: Value, planned: Value) -> DiagnosticResult<bool> {
        let prior: ResourceData<K::Spec> = decode(prior)?;
        let planned: ResourceData<K::Spec> = decode(planned)?;
        Ok(planned.requires_replace(&prior))
    }

    fn manifest(&self, config: Value) -> DiagnosticResult<Value> {
        let data: ManifestData<K::Spec> = decode(config)?;
        encode(&data_source::manifest::<K>(data)?)
    }

    async fn create(&self, api: &dyn ObjectApi, config: Value) -> DiagnosticResult<Value> {
        let planned = decode(config)?;
        encode(&resource::create::<K>(api, planned).await?)
    }

    async fn update(
        &self,
        api: &dyn ObjectApi,
        prior: Value,
        planned: Value,
    ) -> DiagnosticResult<Value> {
        let prior: ResourceData<K::Spec> = decode(prior)?;
        let planned = decode(planned)?;
        encode(&resource::update::<K>(api, &prior, planned).await?)
    }

    async fn read(&self, api: &dyn ObjectApi, state: Value) -> DiagnosticResult<Option<Value>> {
        let state = decode(state)?;
        match resource::read::<K>(api, state).await? {
            Some(state) => Ok(Some(encode(&state)?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, api: &dyn ObjectApi, state: Value) -> DiagnosticResult<()> {
        let state: ResourceData<K::Spec> = decode(state)?;
        resource::delete::<K>(api, &state).await
    }

    async fn import(&self, api: &dyn ObjectApi, id: &str) -> DiagnosticResult<Value> {
        encode(&resource::import::<K>(api, id).await?)
    }

    async fn read_data_source(
        &self,
        api: &dyn ObjectApi,
        config: Value,
    ) -> DiagnosticResult<Value> {
        let config: DataSourceConfig = decode(config)?;
        encode(&data_source::read::<K>(api, config).await?)
    }
}

fn handlers(crd: CrdType) -> &'static dyn KindHandlers {
    match crd {
        CrdType::Middleware => &Handlers::<Middleware>(PhantomData),
        CrdType::TraefikService => &Handlers::<TraefikService>(PhantomData),
    }
}

/// Configured provider serving every Traefik kind
#[derive(Clone)]
pub struct Provider {
    config: ProviderConfig,
    api: Option<Arc<dyn ObjectApi>>,
}

impl Provider {
    /// Configure the provider; builds a Kubernetes client unless offline
    pub async fn configure(config: ProviderConfig) -> DiagnosticResult<Self> {
        if config.offline {
            tracing::debug!("offline mode, no Kubernetes client");
            return Ok(Self { config, api: None });
        }

        let client = config.client().await?;
        Ok(Self {
            api: Some(Arc::new(KubeObjectApi::new(client))),
            config,
        })
    }

    /// Provider backed by a custom object API
    pub fn with_api(config: ProviderConfig, api: Arc<dyn ObjectApi>) -> Self {
        Self {
            config,
            api: Some(api),
        }
    }

    /// Provider that never contacts a cluster
    pub fn offline() -> Self {
        Self {
            config: ProviderConfig {
                offline: true,
                ..Default::default()
            },
            api: None,
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Type names served as resources
    pub fn resource_types(&self) -> Vec<TypeName> {
        TypeName::resource_types()
    }

    /// Type names served as data sources
    pub fn data_source_types(&self) -> Vec<TypeName> {
        TypeName::data_source_types()
    }

    fn api(&self) -> DiagnosticResult<&dyn ObjectApi> {
        self.api
            .as_deref()
            .ok_or_else(|| ProviderError::Offline.into())
    }

    fn resource_type(type_name: &str) -> DiagnosticResult<CrdType> {
        let parsed: TypeName = type_name.parse().map_err(Diagnostics::from)?;
        if parsed.manifest {
            return Err(ProviderError::UnknownType(format!("{} (data source only)", type_name)).into());
        }
        Ok(parsed.crd)
    }

    /// OpenAPI v3 schema of the CRD behind a type name
    pub fn schema(&self, type_name: &str) -> DiagnosticResult<Value> {
        let parsed: TypeName = type_name.parse().map_err(Diagnostics::from)?;
        let crd = parsed.crd.definition();
        let schema = crd
            .spec
            .versions
            .first()
            .and_then(|version| version.schema.as_ref())
            .and_then(|validation| validation.open_api_v3_schema.as_ref())
            .ok_or_else(|| ProviderError::UnknownType(type_name.to_string()))?;
        encode(schema)
    }

    /// Parse a YAML configuration document
    ///
    /// Plain Kubernetes manifests (documents carrying `apiVersion`) are
    /// accepted too and converted to a configuration with default provider
    /// settings; their kind must match the type.
    pub fn parse_config(&self, type_name: &str, yaml: &str) -> DiagnosticResult<Value> {
        let parsed: TypeName = type_name.parse().map_err(Diagnostics::from)?;
        let document: Value = serde_yaml::from_str(yaml)
            .map_err(|e| ProviderError::InvalidConfig(e.to_string()))?;
        if traefik_crds::is_manifest(&document) {
            return handlers(parsed.crd).from_manifest(yaml);
        }
        Ok(document)
    }

    /// Run every validator against a resource configuration
    pub fn validate(&self, type_name: &str, config: Value) -> Diagnostics {
        match Self::resource_type(type_name) {
            Ok(crd) => handlers(crd).validate(config),
            Err(diagnostics) => diagnostics,
        }
    }

    /// True when moving from `prior` to `planned` needs delete then create
    pub fn requires_replace(
        &self,
        type_name: &str,
        prior: Value,
        planned: Value,
    ) -> DiagnosticResult<bool> {
        handlers(Self::resource_type(type_name)?).requires_replace(prior, planned)
    }

    pub async fn create(&self, type_name: &str, config: Value) -> DiagnosticResult<Value> {
        let crd = Self::resource_type(type_name)?;
        handlers(crd).create(self.api()?, config).await
    }

    pub async fn update(
        &self,
        type_name: &str,
        prior: Value,
        planned: Value,
    ) -> DiagnosticResult<Value> {
        let crd = Self::resource_type(type_name)?;
        handlers(crd).update(self.api()?, prior, planned).await
    }

    /// Refreshed state, `None` when the object is gone
    pub async fn read(&self, type_name: &str, state: Value) -> DiagnosticResult<Option<Value>> {
        let crd = Self::resource_type(type_name)?;
        handlers(crd).read(self.api()?, state).await
    }

    pub async fn delete(&self, type_name: &str, state: Value) -> DiagnosticResult<()> {
        let crd = Self::resource_type(type_name)?;
        handlers(crd).delete(self.api()?, state).await
    }

    /// Import `namespace/name` as a resource of the given type
    pub async fn import(&self, type_name: &str, id: &str) -> DiagnosticResult<Value> {
        let crd = Self::resource_type(type_name)?;
        handlers(crd).import(self.api()?, id).await
    }

    /// Read a data source; `_manifest` types render offline
    pub async fn read_data_source(&self, type_name: &str, config: Value) -> DiagnosticResult<Value> {
        let parsed: TypeName = type_name.parse().map_err(Diagnostics::from)?;
        let handlers = handlers(parsed.crd);
        if parsed.manifest {
            return handlers.manifest(config);
        }
        handlers.read_data_source(self.api()?, config).await
    }
}
