//! Types shared by several Traefik kinds
//!
//! `LoadBalancerSpec` is the Traefik "service" reference: a Kubernetes Service
//! or another TraefikService, plus the load-balancing knobs. It appears in
//! `Middleware.spec.errors.service`, `TraefikService.spec.mirroring` and
//! `TraefikService.spec.weighted.services`.

pub use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::validation::{FieldPath, Validate, ValidationIssue, at_least_zero};

/// Kind of the referenced backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ServiceKind {
    Service,
    TraefikService,
}

/// `SameSite` attribute of the sticky session cookie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    None,
    Lax,
    Strict,
}

/// Reference to a Kubernetes Service or a TraefikService
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancerSpec {
    /// Name of the referenced Kubernetes Service or TraefikService
    pub name: String,

    /// Kind of the referenced resource (defaults to Service server-side)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ServiceKind>,

    /// Namespace of the referenced resource
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Use the Kubernetes Service load-balancer instead of the endpoints
    #[serde(rename = "nativeLB", default, skip_serializing_if = "Option::is_none")]
    pub native_lb: Option<bool>,

    /// Use the nodePort IP address when the Service type is NodePort
    #[serde(rename = "nodePortLB", default, skip_serializing_if = "Option::is_none")]
    pub node_port_lb: Option<bool>,

    /// Forward the client Host header to the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pass_host_header: Option<bool>,

    /// Port of the Kubernetes Service (number or name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<IntOrString>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_forwarding: Option<ResponseForwarding>,

    /// Scheme used to reach the servers (http, https, h2c)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,

    /// Name of the ServersTransport resource to use
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servers_transport: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sticky: Option<Sticky>,

    /// Load-balancing strategy (wrr, p2c)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,

    /// Weight used by the weighted round robin strategy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i64>,
}

impl Validate for LoadBalancerSpec {
    fn validate(&self, path: &FieldPath, issues: &mut Vec<ValidationIssue>) {
        if self.name.is_empty() {
            issues.push(ValidationIssue::new(
                path.child("name"),
                "service name must not be empty",
            ));
        }
        at_least_zero(self.weight, path.child("weight"), issues);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResponseForwarding {
    /// Interval between flushes of the buffered response body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flush_interval: Option<String>,
}

/// Sticky sessions configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sticky {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie: Option<Cookie>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_only: Option<bool>,

    /// Number of seconds until the cookie expires
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_site: Option<SameSite>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
}

/// Reference to a middleware, used by `chain`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MiddlewareRef {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl Validate for MiddlewareRef {
    fn validate(&self, path: &FieldPath, issues: &mut Vec<ValidationIssue>) {
        if self.name.is_empty() {
            issues.push(ValidationIssue::new(
                path.child("name"),
                "middleware name must not be empty",
            ));
        }
    }
}

/// Which client property identifies a request source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SourceCriterion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_strategy: Option<IpStrategy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_header_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_host: Option<bool>,
}

impl Validate for SourceCriterion {
    fn validate(&self, path: &FieldPath, issues: &mut Vec<ValidationIssue>) {
        self.ip_strategy.validate(&path.child("ipStrategy"), issues);
    }
}

/// How the client IP is extracted from `X-Forwarded-For`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IpStrategy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<i64>,

    #[serde(rename = "excludedIPs", default, skip_serializing_if = "Option::is_none")]
    pub excluded_ips: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_subnet: Option<i64>,
}

impl Validate for IpStrategy {
    fn validate(&self, path: &FieldPath, issues: &mut Vec<ValidationIssue>) {
        at_least_zero(self.depth, path.child("depth"), issues);
        crate::validation::within(self.ipv6_subnet, 0, 128, path.child("ipv6Subnet"), issues);
    }
}
