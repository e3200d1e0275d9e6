//! Dynamic Kubernetes object access
//!
//! The provider only ever needs three calls against the API server: GET,
//! server-side apply PATCH and DELETE, all on untyped JSON objects. The
//! [`ObjectApi`] trait captures exactly that so handlers can run against the
//! real dynamic client or the in-memory [`MockObjectApi`](crate::MockObjectApi).

use async_trait::async_trait;
use kube::{
    Client,
    api::{Api, DeleteParams, DynamicObject, Patch, PatchParams},
    core::ApiResource,
};
use serde_json::Value;

use crate::error::{ProviderError, Result};
use crate::import::ImportId;
use crate::model::DeletionPropagation;

/// Server-side apply settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyParams {
    /// Field manager recorded in `managedFields`
    pub field_manager: String,
    /// Take ownership of conflicting fields
    pub force: bool,
}

impl ApplyParams {
    pub fn new(field_manager: impl Into<String>, force: bool) -> Self {
        Self {
            field_manager: field_manager.into(),
            force,
        }
    }
}

/// Generic access to namespaced objects of any kind
///
/// Implementations must be Send + Sync for use across async tasks.
#[async_trait]
pub trait ObjectApi: Send + Sync {
    /// Fetch an object, `None` when it does not exist
    async fn get(&self, resource: &ApiResource, id: &ImportId) -> Result<Option<Value>>;

    /// Server-side apply `object`, returning the object as stored
    async fn apply(
        &self,
        resource: &ApiResource,
        id: &ImportId,
        object: &Value,
        params: &ApplyParams,
    ) -> Result<Value>;

    /// Delete an object, `false` when it was already gone
    async fn delete(
        &self,
        resource: &ApiResource,
        id: &ImportId,
        propagation: DeletionPropagation,
    ) -> Result<bool>;
}

/// Human-readable object reference for logs and error messages
pub fn describe(resource: &ApiResource, id: &ImportId) -> String {
    format!("{} {}", resource.kind, id)
}

/// [`ObjectApi`] backed by the kube dynamic client
#[derive(Clone)]
pub struct KubeObjectApi {
    client: Client,
}

impl KubeObjectApi {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api(&self, resource: &ApiResource, namespace: &str) -> Api<DynamicObject> {
        Api::namespaced_with(self.client.clone(), namespace, resource)
    }
}

#[async_trait]
impl ObjectApi for KubeObjectApi {
    async fn get(&self, resource: &ApiResource, id: &ImportId) -> Result<Option<Value>> {
        let target = describe(resource, id);
        tracing::debug!(%target, "GET");

        let object = self
            .api(resource, &id.namespace)
            .get_opt(&id.name)
            .await
            .map_err(|source| ProviderError::Get {
                target: target.clone(),
                source,
            })?;

        object
            .map(|obj| {
                serde_json::to_value(obj)
                    .map_err(|source| ProviderError::Unmarshal { target, source })
            })
            .transpose()
    }

    async fn apply(
        &self,
        resource: &ApiResource,
        id: &ImportId,
        object: &Value,
        params: &ApplyParams,
    ) -> Result<Value> {
        let target = describe(resource, id);
        tracing::debug!(
            %target,
            field_manager = %params.field_manager,
            force = params.force,
            "server-side apply"
        );

        let mut patch_params = PatchParams::apply(&params.field_manager);
        patch_params.force = params.force;

        let applied = self
            .api(resource, &id.namespace)
            .patch(&id.name, &patch_params, &Patch::Apply(object))
            .await
            .map_err(|source| ProviderError::Patch {
                target: target.clone(),
                source,
            })?;

        serde_json::to_value(applied).map_err(|source| ProviderError::Unmarshal { target, source })
    }

    async fn delete(
        &self,
        resource: &ApiResource,
        id: &ImportId,
        propagation: DeletionPropagation,
    ) -> Result<bool> {
        let target = describe(resource, id);
        tracing::debug!(%target, ?propagation, "DELETE");

        let params = DeleteParams {
            propagation_policy: Some(propagation.into()),
            ..Default::default()
        };

        match self.api(resource, &id.namespace).delete(&id.name, &params).await {
            Ok(_) => Ok(true),
            Err(kube::Error::Api(resp)) if resp.code == 404 => Ok(false),
            Err(source) => Err(ProviderError::Delete { target, source }),
        }
    }
}
