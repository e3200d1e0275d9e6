//! Mock object API for testing
//!
//! This API stores objects in memory, useful for unit tests without
//! requiring a Kubernetes cluster. Server-side apply is approximated by
//! replacing the stored `metadata` labels/annotations and `spec`, and
//! stamping server-owned metadata (`uid`, `resourceVersion`, `generation`).

use async_trait::async_trait;
use kube::core::{ApiResource, ErrorResponse};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::api::{ApplyParams, ObjectApi, describe};
use crate::error::{ProviderError, Result};
use crate::import::ImportId;
use crate::model::DeletionPropagation;

type Key = (String, String, String);

fn key(resource: &ApiResource, id: &ImportId) -> Key {
    (
        resource.plural.clone(),
        id.namespace.clone(),
        id.name.clone(),
    )
}

/// In-memory object API for testing
#[derive(Clone, Default)]
pub struct MockObjectApi {
    /// Storage: (plural, namespace, name) -> object
    store: Arc<RwLock<HashMap<Key, Value>>>,
    /// Track operation counts for assertions
    operations: Arc<RwLock<OperationCounts>>,
    /// Remaining GETs that still report a deleted object as present
    linger: Arc<RwLock<HashMap<Key, usize>>>,
    /// Status code to fail the next PATCH with
    fail_patch: Arc<RwLock<Option<u16>>>,
    /// Last apply parameters received
    last_apply: Arc<RwLock<Option<ApplyParams>>>,
}

/// Counts of operations performed for testing assertions
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OperationCounts {
    pub gets: usize,
    pub applies: usize,
    pub deletes: usize,
}

impl MockObjectApi {
    /// Create a new empty mock API
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an object directly, bypassing apply
    pub fn insert(&self, resource: &ApiResource, id: &ImportId, object: Value) {
        self.store
            .write()
            .unwrap()
            .insert(key(resource, id), object);
    }

    /// Mutate a stored object in place (e.g. to simulate a controller)
    pub fn update<F: FnOnce(&mut Value)>(&self, resource: &ApiResource, id: &ImportId, f: F) {
        if let Some(object) = self.store.write().unwrap().get_mut(&key(resource, id)) {
            f(object);
        }
    }

    /// Stored object, if any
    pub fn object(&self, resource: &ApiResource, id: &ImportId) -> Option<Value> {
        self.store.read().unwrap().get(&key(resource, id)).cloned()
    }

    /// Keep reporting a deleted object for `gets` more GET calls
    pub fn linger_after_delete(&self, resource: &ApiResource, id: &ImportId, gets: usize) {
        self.linger
            .write()
            .unwrap()
            .insert(key(resource, id), gets);
    }

    /// Make the next PATCH fail with the given HTTP status code
    pub fn fail_next_patch(&self, code: u16) {
        *self.fail_patch.write().unwrap() = Some(code);
    }

    /// Parameters of the most recent apply
    pub fn last_apply_params(&self) -> Option<ApplyParams> {
        self.last_apply.read().unwrap().clone()
    }

    /// Get operation counts for assertions
    pub fn operation_counts(&self) -> OperationCounts {
        self.operations.read().unwrap().clone()
    }

    /// Number of stored objects
    pub fn object_count(&self) -> usize {
        self.store.read().unwrap().len()
    }
}

#[async_trait]
impl ObjectApi for MockObjectApi {
    async fn get(&self, resource: &ApiResource, id: &ImportId) -> Result<Option<Value>> {
        self.operations.write().unwrap().gets += 1;
        let key = key(resource, id);

        if let Some(object) = self.store.read().unwrap().get(&key) {
            return Ok(Some(object.clone()));
        }

        let mut linger = self.linger.write().unwrap();
        match linger.get_mut(&key) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                Ok(Some(json!({
                    "apiVersion": resource.api_version,
                    "kind": resource.kind,
                    "metadata": {
                        "name": id.name,
                        "namespace": id.namespace,
                        "deletionTimestamp": "2024-01-01T00:00:00Z"
                    }
                })))
            }
            _ => Ok(None),
        }
    }

    async fn apply(
        &self,
        resource: &ApiResource,
        id: &ImportId,
        object: &Value,
        params: &ApplyParams,
    ) -> Result<Value> {
        self.operations.write().unwrap().applies += 1;
        *self.last_apply.write().unwrap() = Some(params.clone());

        if let Some(code) = self.fail_patch.write().unwrap().take() {
            return Err(ProviderError::Patch {
                target: describe(resource, id),
                source: kube::Error::Api(ErrorResponse {
                    status: "Failure".to_string(),
                    message: format!("Apply failed with {} conflict", params.field_manager),
                    reason: "Conflict".to_string(),
                    code,
                }),
            });
        }

        let mut store = self.store.write().unwrap();
        let key = key(resource, id);
        let generation = store
            .get(&key)
            .and_then(|existing| existing["metadata"]["generation"].as_i64())
            .map_or(1, |g| g + 1);

        let mut stored = object.clone();
        stored["metadata"]["uid"] = json!(format!("uid-{}-{}", id.namespace, id.name));
        stored["metadata"]["generation"] = json!(generation);
        stored["metadata"]["resourceVersion"] = json!(generation.to_string());
        store.insert(key, stored.clone());

        Ok(stored)
    }

    async fn delete(
        &self,
        resource: &ApiResource,
        id: &ImportId,
        _propagation: DeletionPropagation,
    ) -> Result<bool> {
        self.operations.write().unwrap().deletes += 1;
        Ok(self.store.write().unwrap().remove(&key(resource, id)).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::CustomResourceExt;
    use traefik_crds::Middleware;

    fn object() -> Value {
        json!({
            "apiVersion": "traefik.io/v1alpha1",
            "kind": "Middleware",
            "metadata": {"name": "a", "namespace": "web"},
            "spec": {}
        })
    }

    #[tokio::test]
    async fn test_mock_apply_and_get() {
        let api = MockObjectApi::new();
        let ar = Middleware::api_resource();
        let id = ImportId::new("web", "a");

        let stored = api
            .apply(&ar, &id, &object(), &ApplyParams::new("terraform", false))
            .await
            .unwrap();
        assert_eq!(stored["metadata"]["generation"], 1);

        let fetched = api.get(&ar, &id).await.unwrap().unwrap();
        assert_eq!(fetched, stored);

        let again = api
            .apply(&ar, &id, &object(), &ApplyParams::new("terraform", false))
            .await
            .unwrap();
        assert_eq!(again["metadata"]["generation"], 2);

        assert_eq!(
            api.operation_counts(),
            OperationCounts {
                gets: 1,
                applies: 2,
                deletes: 0
            }
        );
    }

    #[tokio::test]
    async fn test_mock_get_not_found() {
        let api = MockObjectApi::new();
        let result = api
            .get(&Middleware::api_resource(), &ImportId::new("web", "missing"))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_mock_delete() {
        let api = MockObjectApi::new();
        let ar = Middleware::api_resource();
        let id = ImportId::new("web", "a");
        api.insert(&ar, &id, object());

        assert!(api.delete(&ar, &id, DeletionPropagation::Background).await.unwrap());
        assert!(!api.delete(&ar, &id, DeletionPropagation::Background).await.unwrap());
        assert_eq!(api.object_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_linger_after_delete() {
        let api = MockObjectApi::new();
        let ar = Middleware::api_resource();
        let id = ImportId::new("web", "a");
        api.insert(&ar, &id, object());
        api.linger_after_delete(&ar, &id, 2);

        api.delete(&ar, &id, DeletionPropagation::Foreground).await.unwrap();
        assert!(api.get(&ar, &id).await.unwrap().is_some());
        assert!(api.get(&ar, &id).await.unwrap().is_some());
        assert!(api.get(&ar, &id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_mock_fail_next_patch() {
        let api = MockObjectApi::new();
        let ar = Middleware::api_resource();
        let id = ImportId::new("web", "a");
        api.fail_next_patch(409);

        let err = api
            .apply(&ar, &id, &object(), &ApplyParams::new("terraform", false))
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        // Only the next PATCH fails
        assert!(
            api.apply(&ar, &id, &object(), &ApplyParams::new("terraform", true))
                .await
                .is_ok()
        );
    }
}
