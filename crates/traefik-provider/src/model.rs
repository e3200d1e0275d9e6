//! Resource and data source state models
//!
//! The state of a resource is the configuration the user wrote plus the
//! computed attributes (`id`, `api_version`, `kind`). Provider-only settings
//! (field manager, wait conditions, ...) live next to the object fields and
//! are never sent to the API server.

use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::PropagationPolicy;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use traefik_crds::{FieldPath, Validate, ValidationIssue, validate_name, validate_namespace};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{ProviderError, Result};
use crate::import::ImportId;
use crate::kind::TraefikKind;
use crate::wait::{WaitCondition, WaitForDelete};

/// Field manager used for server-side apply unless configured otherwise
pub const DEFAULT_FIELD_MANAGER: &str = "terraform";

/// Namespace used when none is configured
pub const DEFAULT_NAMESPACE: &str = "default";

fn default_field_manager() -> String {
    DEFAULT_FIELD_MANAGER.to_string()
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

/// How dependents are handled when an object is deleted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeletionPropagation {
    Orphan,
    #[default]
    Background,
    Foreground,
}

impl From<DeletionPropagation> for PropagationPolicy {
    fn from(value: DeletionPropagation) -> Self {
        match value {
            DeletionPropagation::Orphan => PropagationPolicy::Orphan,
            DeletionPropagation::Background => PropagationPolicy::Background,
            DeletionPropagation::Foreground => PropagationPolicy::Foreground,
        }
    }
}

/// `metadata` block of resources and manifests
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceMetadata {
    pub name: String,

    #[serde(default = "default_namespace")]
    pub namespace: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

impl ResourceMetadata {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ..Default::default()
        }
    }

    /// Identity and labels of a decoded Kubernetes object
    pub fn from_object_meta(meta: ObjectMeta) -> Self {
        Self {
            name: meta.name.unwrap_or_default(),
            namespace: meta.namespace.unwrap_or_else(default_namespace),
            labels: meta.labels.unwrap_or_default(),
            annotations: meta.annotations.unwrap_or_default(),
        }
    }

    /// `namespace/name`
    pub fn id(&self) -> ImportId {
        ImportId::new(&self.namespace, &self.name)
    }

    fn to_object_meta(&self) -> Value {
        let mut meta = Map::new();
        meta.insert("name".to_string(), json!(self.name));
        meta.insert("namespace".to_string(), json!(self.namespace));
        if !self.labels.is_empty() {
            meta.insert("labels".to_string(), json!(self.labels));
        }
        if !self.annotations.is_empty() {
            meta.insert("annotations".to_string(), json!(self.annotations));
        }
        Value::Object(meta)
    }

    /// Take labels and annotations from an object returned by the server
    pub(crate) fn refresh_from(&mut self, object: &Value) {
        self.labels = string_map(&object["metadata"]["labels"]);
        self.annotations = string_map(&object["metadata"]["annotations"]);
    }
}

impl Validate for ResourceMetadata {
    fn validate(&self, path: &FieldPath, issues: &mut Vec<ValidationIssue>) {
        validate_name(&self.name, path.child("name"), issues);
        validate_namespace(&self.namespace, path.child("namespace"), issues);
    }
}

fn string_map(value: &Value) -> BTreeMap<String, String> {
    value
        .as_object()
        .map(|map| {
            map.iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect()
        })
        .unwrap_or_default()
}

/// Build the JSON object sent to the API server
pub fn object_for<K: TraefikKind>(metadata: &ResourceMetadata, spec: &Value) -> Value {
    json!({
        "apiVersion": K::api_version_str(),
        "kind": K::kind_str(),
        "metadata": metadata.to_object_meta(),
        "spec": spec,
    })
}

/// State of a managed resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceData<S> {
    /// `namespace/name`, computed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Field manager recorded by server-side apply
    #[serde(default = "default_field_manager")]
    pub field_manager: String,

    /// Take ownership of fields managed by someone else
    #[serde(default)]
    pub force_conflicts: bool,

    #[serde(default)]
    pub deletion_propagation: DeletionPropagation,

    /// Conditions checked after every create and update
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub wait_for_upsert: Vec<WaitCondition>,

    /// Wait for the object to disappear after delete
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_for_delete: Option<WaitForDelete>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    pub metadata: ResourceMetadata,

    pub spec: S,
}

impl<S> ResourceData<S> {
    /// Configuration with default provider settings
    pub fn new(metadata: ResourceMetadata, spec: S) -> Self {
        Self {
            id: None,
            field_manager: default_field_manager(),
            force_conflicts: false,
            deletion_propagation: DeletionPropagation::default(),
            wait_for_upsert: Vec::new(),
            wait_for_delete: None,
            api_version: None,
            kind: None,
            metadata,
            spec,
        }
    }
}

impl<S: Default> ResourceData<S> {
    /// State seeded for `import`: defaults everywhere, only the identity set
    pub fn for_import(id: &ImportId) -> Self {
        Self {
            id: Some(id.to_string()),
            ..Self::new(ResourceMetadata::new(&id.namespace, &id.name), S::default())
        }
    }
}

/// Configuration equivalent to a plain Kubernetes manifest of kind `K`
pub fn resource_from_manifest<K: TraefikKind>(yaml: &str) -> Result<ResourceData<K::Spec>> {
    let object: K = traefik_crds::from_yaml(yaml)
        .map_err(|e| ProviderError::InvalidConfig(e.to_string()))?;
    let (meta, spec) = object.into_parts();
    Ok(ResourceData::new(ResourceMetadata::from_object_meta(meta), spec))
}

impl<S: Validate> ResourceData<S> {
    /// Run every validator: metadata, spec and wait settings
    pub fn validate(&self) -> Diagnostics {
        let mut issues = Vec::new();
        self.metadata
            .validate(&FieldPath::root("metadata"), &mut issues);
        self.spec.validate(&FieldPath::root("spec"), &mut issues);
        self.wait_for_upsert
            .validate(&FieldPath::root("wait_for_upsert"), &mut issues);
        self.wait_for_delete
            .validate(&FieldPath::root("wait_for_delete"), &mut issues);

        let mut diagnostics: Diagnostics = issues.into_iter().map(Diagnostic::from).collect();
        if self.field_manager.is_empty() {
            diagnostics.push(
                Diagnostic::error("Invalid configuration", "field manager must not be empty")
                    .at("field_manager"),
            );
        }
        diagnostics
    }
}

impl<S> ResourceData<S> {
    /// Name or namespace changes cannot be applied in place
    pub fn requires_replace(&self, prior: &ResourceData<S>) -> bool {
        self.metadata.name != prior.metadata.name
            || self.metadata.namespace != prior.metadata.namespace
    }

    /// Fill computed attributes after a successful apply or read
    pub(crate) fn set_computed<K: TraefikKind>(&mut self, object: Option<&Value>) {
        self.id = Some(self.metadata.id().to_string());
        self.api_version = Some(K::api_version_str());
        self.kind = Some(K::kind_str());
        if let Some(object) = object {
            self.metadata.refresh_from(object);
        }
    }
}

/// Identity block of a data source: which object to read
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSourceConfig {
    pub metadata: ResourceMetadata,
}

/// State of a data source reading a live object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSourceData<S> {
    pub id: String,
    pub api_version: String,
    pub kind: String,
    pub metadata: ResourceMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<S>,
}

/// State of a manifest data source: the object rendered as YAML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestData<S> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub metadata: ResourceMetadata,

    pub spec: S,

    /// Rendered manifest, computed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yaml: Option<String>,
}

impl<S: Validate> ManifestData<S> {
    pub fn validate(&self) -> Diagnostics {
        let mut issues = Vec::new();
        self.metadata
            .validate(&FieldPath::root("metadata"), &mut issues);
        self.spec.validate(&FieldPath::root("spec"), &mut issues);
        issues.into_iter().map(Diagnostic::from).collect()
    }
}
