//! Traefik CRDs - typed bindings for Traefik's custom resources
//!
//! This crate mirrors the OpenAPI schemas of the `traefik.io/v1alpha1` group:
//! - `Middleware`: HTTP middleware configuration (rate limiting, headers, auth, ...)
//! - `TraefikService`: weighted round robin and mirroring services
//! - `common`: load-balancer service references shared by both kinds
//! - `validation`: field validators that mirror the CRD constraints
//! - `metadata`: Kubernetes object name and namespace rules
//! - `manifest`: decoding plain YAML manifests with `apiVersion`/`kind` checks
//!
//! Every optional field is skipped on serialization when unset, so a JSON
//! round trip yields exactly the fields that were configured.

pub mod common;
pub mod error;
pub mod manifest;
pub mod metadata;
pub mod middleware;
pub mod traefik_service;
pub mod validation;

pub use common::{
    Cookie, IntOrString, LoadBalancerSpec, ResponseForwarding, SameSite, ServiceKind, Sticky,
};
pub use error::{CrdError, Result};
pub use manifest::{check_type_meta, from_yaml, is_manifest};
pub use metadata::{validate_name, validate_namespace};
pub use middleware::{Middleware, MiddlewareSpec};
pub use traefik_service::{TraefikService, TraefikServiceSpec};
pub use validation::{FieldPath, Validate, ValidationIssue};
