//! Resource lifecycle: create, read, update, delete and import
//!
//! All handlers are generic over the served kind. The object sent to the API
//! server is always the full desired state (`apiVersion`, `kind`, `metadata`,
//! `spec`) applied server-side under the configured field manager, so create
//! and update share the same code path.

use kube::CustomResourceExt;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::{ApplyParams, ObjectApi, describe};
use crate::diagnostics::{Diagnostic, DiagnosticResult, Diagnostics};
use crate::error::{ProviderError, Result};
use crate::import::ImportId;
use crate::kind::TraefikKind;
use crate::model::{ResourceData, object_for};
use crate::wait::{wait_for_condition, wait_for_deletion};

/// Decode the `spec` of an object returned by the API server
pub(crate) fn spec_from<S: DeserializeOwned + Default>(object: &Value, target: &str) -> Result<S> {
    match object.get("spec") {
        None | Some(Value::Null) => Ok(S::default()),
        Some(spec) => {
            serde_json::from_value(spec.clone()).map_err(|source| ProviderError::Unmarshal {
                target: target.to_string(),
                source,
            })
        }
    }
}

/// Create the object described by `planned`
pub async fn create<K: TraefikKind>(
    api: &dyn ObjectApi,
    planned: ResourceData<K::Spec>,
) -> DiagnosticResult<ResourceData<K::Spec>> {
    planned.validate().into_result()?;
    tracing::info!(kind = %K::kind_str(), id = %planned.metadata.id(), "creating");
    Ok(apply::<K>(api, planned).await?)
}

/// Bring the live object in line with `planned`
///
/// Name and namespace are identity: a change there needs a replacement
/// (delete then create), which the caller must plan for.
pub async fn update<K: TraefikKind>(
    api: &dyn ObjectApi,
    prior: &ResourceData<K::Spec>,
    planned: ResourceData<K::Spec>,
) -> DiagnosticResult<ResourceData<K::Spec>> {
    planned.validate().into_result()?;
    if planned.requires_replace(prior) {
        return Err(Diagnostic::error(
            "Resource requires replacement",
            format!(
                "cannot move {} to {} in place",
                prior.metadata.id(),
                planned.metadata.id()
            ),
        )
        .at("metadata")
        .into());
    }
    tracing::info!(kind = %K::kind_str(), id = %planned.metadata.id(), "updating");
    Ok(apply::<K>(api, planned).await?)
}

async fn apply<K: TraefikKind>(
    api: &dyn ObjectApi,
    mut state: ResourceData<K::Spec>,
) -> Result<ResourceData<K::Spec>> {
    let resource = K::api_resource();
    let id = state.metadata.id();
    let target = describe(&resource, &id);

    let spec = serde_json::to_value(&state.spec).map_err(|source| ProviderError::Marshal {
        target: target.clone(),
        source,
    })?;
    let object = object_for::<K>(&state.metadata, &spec);

    let params = ApplyParams::new(&state.field_manager, state.force_conflicts);
    let returned = match api.apply(&resource, &id, &object, &params).await {
        Ok(returned) => returned,
        Err(err) if err.is_conflict() && !params.force => {
            tracing::warn!(
                %target,
                field_manager = %params.field_manager,
                "fields are owned by another manager, set force_conflicts to take them over"
            );
            return Err(err);
        }
        Err(err) => return Err(err),
    };

    state.spec = spec_from(&returned, &target)?;
    state.set_computed::<K>(Some(&returned));

    for condition in &state.wait_for_upsert {
        wait_for_condition(api, &resource, &id, condition).await?;
    }

    Ok(state)
}

/// Refresh state from the live object, `None` when it no longer exists
pub async fn read<K: TraefikKind>(
    api: &dyn ObjectApi,
    mut state: ResourceData<K::Spec>,
) -> DiagnosticResult<Option<ResourceData<K::Spec>>> {
    let resource = K::api_resource();
    let id = state.metadata.id();

    let Some(object) = api.get(&resource, &id).await? else {
        tracing::info!(kind = %K::kind_str(), %id, "object is gone, dropping from state");
        return Ok(None);
    };

    state.spec = spec_from(&object, &describe(&resource, &id))?;
    state.set_computed::<K>(Some(&object));
    Ok(Some(state))
}

/// Delete the object, waiting for it to disappear when configured
pub async fn delete<K: TraefikKind>(
    api: &dyn ObjectApi,
    state: &ResourceData<K::Spec>,
) -> DiagnosticResult<()> {
    let resource = K::api_resource();
    let id = state.metadata.id();

    let existed = api
        .delete(&resource, &id, state.deletion_propagation)
        .await?;
    if !existed {
        tracing::info!(kind = %K::kind_str(), %id, "already deleted");
        return Ok(());
    }

    if let Some(wait) = &state.wait_for_delete {
        wait_for_deletion(api, &resource, &id, wait).await?;
    }
    Ok(())
}

/// Adopt an existing object by its `namespace/name` identifier
pub async fn import<K: TraefikKind>(
    api: &dyn ObjectApi,
    id: &str,
) -> DiagnosticResult<ResourceData<K::Spec>> {
    let id: ImportId = id.parse().map_err(Diagnostics::from)?;
    let seeded = ResourceData::<K::Spec>::for_import(&id);

    match read::<K>(api, seeded).await? {
        Some(state) => Ok(state),
        None => Err(ProviderError::NotFound {
            target: describe(&K::api_resource(), &id),
        }
        .into()),
    }
}
