//! Traefik Provider - Traefik custom resources as resources and data sources
//!
//! This crate provides the runtime behind the provider:
//! - Typed handlers for `Middleware` and `TraefikService` (create, read, update, delete, import)
//! - Read and offline `_manifest` data sources
//! - Server-side apply through the kube dynamic client, with field manager and conflict forcing
//! - Wait-for-condition polling driven by kubectl-style JSONPath expressions
//! - Diagnostics with a short summary and the underlying error as detail
//!
//! # Example
//!
//! ```ignore
//! use traefik_provider::{Provider, ProviderConfig};
//!
//! let provider = Provider::configure(ProviderConfig::load()?).await?;
//! let state = provider.create("traefik_io_middleware_v1alpha1", config).await?;
//! ```

pub mod api;
pub mod config;
pub mod data_source;
pub mod diagnostics;
pub mod error;
pub mod import;
pub mod jsonpath;
pub mod kind;
pub mod mock;
pub mod model;
pub mod provider;
pub mod resource;
pub mod wait;

pub use api::{ApplyParams, KubeObjectApi, ObjectApi};
pub use config::ProviderConfig;
pub use diagnostics::{Diagnostic, DiagnosticResult, Diagnostics, Severity};
pub use error::{ProviderError, Result};
pub use import::ImportId;
pub use jsonpath::JsonPath;
pub use kind::{CrdType, TraefikKind, TypeName};
pub use mock::{MockObjectApi, OperationCounts};
pub use model::{
    DataSourceConfig, DataSourceData, DeletionPropagation, ManifestData, ResourceData,
    ResourceMetadata,
};
pub use provider::Provider;
pub use wait::{WaitCondition, WaitForDelete};
