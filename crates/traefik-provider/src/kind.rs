//! Served custom resource kinds and their type names
//!
//! Each Traefik kind is exposed under one type name, shared by the resource
//! and the data source that reads it, plus a `_manifest` data source that
//! renders YAML without touching the cluster.

use std::fmt;
use std::str::FromStr;

use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::{CustomResourceExt, Resource};
use serde::Serialize;
use serde::de::DeserializeOwned;
use traefik_crds::{Middleware, MiddlewareSpec, TraefikService, TraefikServiceSpec, Validate};

use crate::error::ProviderError;

const MANIFEST_SUFFIX: &str = "_manifest";

/// A Traefik custom resource served by the provider
///
/// `CustomResourceExt::api_resource` gives the dynamic client its target and
/// `CustomResourceExt::crd` the derived OpenAPI schema.
pub trait TraefikKind:
    Resource<DynamicType = ()> + CustomResourceExt + DeserializeOwned + Send + Sync + 'static
{
    /// Spec struct mirroring the CRD schema
    type Spec: Serialize
        + DeserializeOwned
        + Validate
        + Clone
        + Default
        + PartialEq
        + fmt::Debug
        + Send
        + Sync;

    /// Resource and data source type name
    const TYPE_NAME: &'static str;

    /// `traefik.io/v1alpha1`
    fn api_version_str() -> String {
        Self::api_version(&()).into_owned()
    }

    fn kind_str() -> String {
        Self::kind(&()).into_owned()
    }

    /// Split a decoded object into its metadata and spec
    fn into_parts(self) -> (ObjectMeta, Self::Spec);
}

impl TraefikKind for Middleware {
    type Spec = MiddlewareSpec;
    const TYPE_NAME: &'static str = "traefik_io_middleware_v1alpha1";

    fn into_parts(self) -> (ObjectMeta, MiddlewareSpec) {
        (self.metadata, self.spec)
    }
}

impl TraefikKind for TraefikService {
    type Spec = TraefikServiceSpec;
    const TYPE_NAME: &'static str = "traefik_io_traefik_service_v1alpha1";

    fn into_parts(self) -> (ObjectMeta, TraefikServiceSpec) {
        (self.metadata, self.spec)
    }
}

/// Which CRD a type name refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrdType {
    Middleware,
    TraefikService,
}

impl CrdType {
    pub const ALL: [CrdType; 2] = [CrdType::Middleware, CrdType::TraefikService];

    pub fn type_name(&self) -> &'static str {
        match self {
            CrdType::Middleware => Middleware::TYPE_NAME,
            CrdType::TraefikService => TraefikService::TYPE_NAME,
        }
    }

    pub fn definition(&self) -> CustomResourceDefinition {
        match self {
            CrdType::Middleware => Middleware::crd(),
            CrdType::TraefikService => TraefikService::crd(),
        }
    }
}

/// Parsed resource or data source type name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeName {
    pub crd: CrdType,
    /// `_manifest` variant: offline YAML rendering
    pub manifest: bool,
}

impl TypeName {
    /// Type names served as resources
    pub fn resource_types() -> Vec<TypeName> {
        CrdType::ALL
            .iter()
            .map(|crd| TypeName {
                crd: *crd,
                manifest: false,
            })
            .collect()
    }

    /// Type names served as data sources
    pub fn data_source_types() -> Vec<TypeName> {
        CrdType::ALL
            .iter()
            .flat_map(|crd| {
                [
                    TypeName {
                        crd: *crd,
                        manifest: false,
                    },
                    TypeName {
                        crd: *crd,
                        manifest: true,
                    },
                ]
            })
            .collect()
    }
}

impl FromStr for TypeName {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (base, manifest) = match s.strip_suffix(MANIFEST_SUFFIX) {
            Some(base) => (base, true),
            None => (s, false),
        };
        let crd = CrdType::ALL
            .into_iter()
            .find(|crd| crd.type_name() == base)
            .ok_or_else(|| ProviderError::UnknownType(s.to_string()))?;
        Ok(TypeName { crd, manifest })
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.crd.type_name())?;
        if self.manifest {
            f.write_str(MANIFEST_SUFFIX)?;
        }
        Ok(())
    }
}
