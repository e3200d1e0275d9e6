//! `Middleware` custom resource (traefik.io/v1alpha1)
//!
//! One optional field per HTTP middleware Traefik ships with. A Middleware
//! object normally configures a single one of them.

use std::collections::BTreeMap;

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::common::{IntOrString, LoadBalancerSpec, MiddlewareRef, SourceCriterion};
use crate::validation::{FieldPath, Validate, ValidationIssue, at_least_zero};

/// MiddlewareSpec defines the desired state of a Middleware
#[derive(CustomResource, Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "traefik.io",
    version = "v1alpha1",
    kind = "Middleware",
    plural = "middlewares",
    namespaced,
    derive = "PartialEq",
    doc = "Middleware is the CRD implementation of a Traefik Middleware"
)]
#[serde(rename_all = "camelCase")]
pub struct MiddlewareSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_prefix: Option<AddPrefix>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_auth: Option<BasicAuth>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffering: Option<Buffering>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain: Option<Chain>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circuit_breaker: Option<CircuitBreaker>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compress: Option<Compress>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest_auth: Option<DigestAuth>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<ErrorPage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forward_auth: Option<ForwardAuth>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grpc_web: Option<GrpcWeb>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Headers>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_flight_req: Option<InFlightReq>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_allow_list: Option<IpAllowList>,

    /// Deprecated in favor of `ipAllowList`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_white_list: Option<IpWhiteList>,

    #[serde(
        rename = "passTLSClientCert",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub pass_tls_client_cert: Option<PassTlsClientCert>,

    /// Configuration of middleware plugins, keyed by plugin name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin: Option<BTreeMap<String, serde_json::Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimit>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_regex: Option<RedirectRegex>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_scheme: Option<RedirectScheme>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace_path: Option<ReplacePath>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace_path_regex: Option<ReplacePathRegex>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<Retry>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strip_prefix: Option<StripPrefix>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strip_prefix_regex: Option<StripPrefixRegex>,
}

impl Validate for MiddlewareSpec {
    fn validate(&self, path: &FieldPath, issues: &mut Vec<ValidationIssue>) {
        self.chain.validate(&path.child("chain"), issues);
        self.errors.validate(&path.child("errors"), issues);
        self.in_flight_req.validate(&path.child("inFlightReq"), issues);
        self.ip_allow_list.validate(&path.child("ipAllowList"), issues);
        self.ip_white_list.validate(&path.child("ipWhiteList"), issues);
        self.rate_limit.validate(&path.child("rateLimit"), issues);
        self.retry.validate(&path.child("retry"), issues);
        self.buffering.validate(&path.child("buffering"), issues);

        if self.ip_white_list.is_some() {
            issues.push(ValidationIssue::deprecated(
                path.child("ipWhiteList"),
                "ipWhiteList is deprecated, use ipAllowList instead",
            ));
        }
        if let Some(headers) = &self.headers
            && headers.feature_policy.is_some()
        {
            issues.push(ValidationIssue::deprecated(
                path.child("headers").child("featurePolicy"),
                "featurePolicy is deprecated, use permissionsPolicy instead",
            ));
        }
    }
}

/// Prepends a prefix to the request path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddPrefix {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

/// Restricts access to known users via HTTP basic authentication
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BasicAuth {
    /// Header used to forward the authenticated user to the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_field: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realm: Option<String>,

    /// Remove the Authorization header before forwarding the request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove_header: Option<bool>,

    /// Name of the Kubernetes Secret holding the users
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

/// Limits request and response body sizes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Buffering {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_request_body_bytes: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_response_body_bytes: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mem_request_body_bytes: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mem_response_body_bytes: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_expression: Option<String>,
}

impl Validate for Buffering {
    fn validate(&self, path: &FieldPath, issues: &mut Vec<ValidationIssue>) {
        at_least_zero(
            self.max_request_body_bytes,
            path.child("maxRequestBodyBytes"),
            issues,
        );
        at_least_zero(
            self.max_response_body_bytes,
            path.child("maxResponseBodyBytes"),
            issues,
        );
        at_least_zero(
            self.mem_request_body_bytes,
            path.child("memRequestBodyBytes"),
            issues,
        );
        at_least_zero(
            self.mem_response_body_bytes,
            path.child("memResponseBodyBytes"),
            issues,
        );
    }
}

/// Combines several middlewares into one
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Chain {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middlewares: Option<Vec<MiddlewareRef>>,
}

impl Validate for Chain {
    fn validate(&self, path: &FieldPath, issues: &mut Vec<ValidationIssue>) {
        self.middlewares.validate(&path.child("middlewares"), issues);
    }
}

/// Stops forwarding requests to an unhealthy service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CircuitBreaker {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_period: Option<IntOrString>,

    /// Condition that opens the breaker, e.g. `NetworkErrorRatio() > 0.5`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_duration: Option<IntOrString>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery_duration: Option<IntOrString>,

    /// Status code returned while the breaker is open
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_code: Option<i64>,
}

/// Compresses responses before sending them to the client
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Compress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_encoding: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encodings: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excluded_content_types: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub included_content_types: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_response_body_bytes: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentType {
    /// Let Traefik guess the Content-Type when the backend sets none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_detect: Option<bool>,
}

/// Restricts access to known users via HTTP digest authentication
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DigestAuth {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_field: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realm: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove_header: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

/// Returns custom error pages for a range of status codes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPage {
    /// URL of the error page, `{status}` and `{url}` are substituted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    /// Service serving the error pages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<LoadBalancerSpec>,

    /// Status codes or ranges, e.g. `500-599`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Vec<String>>,

    /// Maps status codes or ranges to the code sent to the client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_rewrites: Option<BTreeMap<String, i64>>,
}

impl Validate for ErrorPage {
    fn validate(&self, path: &FieldPath, issues: &mut Vec<ValidationIssue>) {
        self.service.validate(&path.child("service"), issues);
    }
}

/// Delegates authentication to an external service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForwardAuth {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_auth_cookies_to_response: Option<Vec<String>>,

    /// URL of the authentication server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_request_headers: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_response_headers: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_response_headers_regex: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forward_body: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_field: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_body_size: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preserve_location_header: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<ClientTls>,

    /// Trust all `X-Forwarded-*` headers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trust_forward_header: Option<bool>,
}

/// TLS configuration for the connection to the authentication server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientTls {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_optional: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_secret: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_secret: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure_skip_verify: Option<bool>,
}

/// Converts gRPC-Web requests to HTTP/2 gRPC
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GrpcWeb {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_origins: Option<Vec<String>>,
}

/// Manages request and response headers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Headers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_control_allow_credentials: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_control_allow_headers: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_control_allow_methods: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_control_allow_origin_list: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_control_allow_origin_list_regex: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_control_expose_headers: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_control_max_age: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_vary_header: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_hosts: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_xss_filter: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_security_policy: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_security_policy_report_only: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type_nosniff: Option<bool>,

    #[serde(
        rename = "customBrowserXSSValue",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_browser_xss_value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_frame_options_value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_request_headers: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_response_headers: Option<BTreeMap<String, String>>,

    /// Deprecated in favor of `permissionsPolicy`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_policy: Option<String>,

    #[serde(
        rename = "forceSTSHeader",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub force_sts_header: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_deny: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosts_proxy_headers: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_development: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions_policy: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer_policy: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl_force_host: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl_host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl_proxy_headers: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl_redirect: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl_temporary_redirect: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sts_include_subdomains: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sts_preload: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sts_seconds: Option<i64>,
}

/// Limits the number of simultaneous in-flight requests
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InFlightReq {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_criterion: Option<SourceCriterion>,
}

impl Validate for InFlightReq {
    fn validate(&self, path: &FieldPath, issues: &mut Vec<ValidationIssue>) {
        at_least_zero(self.amount, path.child("amount"), issues);
        self.source_criterion
            .validate(&path.child("sourceCriterion"), issues);
    }
}

/// Accepts or refuses requests based on the client IP
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IpAllowList {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_strategy: Option<crate::common::IpStrategy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reject_status_code: Option<i64>,

    /// Allowed IPs or CIDR ranges
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_range: Option<Vec<String>>,
}

impl Validate for IpAllowList {
    fn validate(&self, path: &FieldPath, issues: &mut Vec<ValidationIssue>) {
        self.ip_strategy.validate(&path.child("ipStrategy"), issues);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IpWhiteList {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_strategy: Option<crate::common::IpStrategy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_range: Option<Vec<String>>,
}

impl Validate for IpWhiteList {
    fn validate(&self, path: &FieldPath, issues: &mut Vec<ValidationIssue>) {
        self.ip_strategy.validate(&path.child("ipStrategy"), issues);
    }
}

/// Adds the client certificate (or parts of it) to a request header
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PassTlsClientCert {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<TlsClientCertificateInfo>,

    /// Pass the escaped PEM in `X-Forwarded-Tls-Client-Cert`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pem: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TlsClientCertificateInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<TlsClientCertificateIssuerDnInfo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_after: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_before: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sans: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<TlsClientCertificateSubjectDnInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TlsClientCertificateIssuerDnInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_name: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_component: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TlsClientCertificateSubjectDnInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_name: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_component: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizational_unit: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<bool>,
}

/// Token-bucket rate limiting
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RateLimit {
    /// Maximum rate, in requests per `period`, allowed from a given source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average: Option<i64>,

    /// Maximum number of requests allowed to go through at the same instant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub burst: Option<i64>,

    /// Period of the rate, e.g. `1s` or `60` (seconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<IntOrString>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_criterion: Option<SourceCriterion>,
}

impl Validate for RateLimit {
    fn validate(&self, path: &FieldPath, issues: &mut Vec<ValidationIssue>) {
        at_least_zero(self.average, path.child("average"), issues);
        at_least_zero(self.burst, path.child("burst"), issues);
        self.source_criterion
            .validate(&path.child("sourceCriterion"), issues);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RedirectRegex {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permanent: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RedirectScheme {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permanent: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplacePath {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplacePathRegex {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
}

/// Reissues requests to the backend on network errors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Retry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempts: Option<i64>,

    /// First wait time of the exponential backoff
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_interval: Option<IntOrString>,
}

impl Validate for Retry {
    fn validate(&self, path: &FieldPath, issues: &mut Vec<ValidationIssue>) {
        at_least_zero(self.attempts, path.child("attempts"), issues);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StripPrefix {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_slash: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefixes: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StripPrefixRegex {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::{CustomResourceExt, Resource};

    fn full_spec() -> MiddlewareSpec {
        MiddlewareSpec {
            rate_limit: Some(RateLimit {
                average: Some(100),
                burst: Some(50),
                period: Some(IntOrString::String("1m".to_string())),
                source_criterion: Some(SourceCriterion {
                    ip_strategy: Some(crate::common::IpStrategy {
                        depth: Some(2),
                        excluded_ips: Some(vec!["127.0.0.1/32".to_string()]),
                        ipv6_subnet: None,
                    }),
                    request_header_name: None,
                    request_host: Some(false),
                }),
            }),
            headers: Some(Headers {
                custom_request_headers: Some(BTreeMap::from([(
                    "X-Script-Name".to_string(),
                    "test".to_string(),
                )])),
                force_sts_header: Some(true),
                custom_browser_xss_value: Some("1; mode=block".to_string()),
                sts_seconds: Some(31536000),
                ..Default::default()
            }),
            chain: Some(Chain {
                middlewares: Some(vec![MiddlewareRef {
                    name: "auth".to_string(),
                    namespace: Some("security".to_string()),
                }]),
            }),
            pass_tls_client_cert: Some(PassTlsClientCert {
                pem: Some(true),
                info: Some(TlsClientCertificateInfo {
                    subject: Some(TlsClientCertificateSubjectDnInfo {
                        organizational_unit: Some(true),
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
            }),
            plugin: Some(BTreeMap::from([(
                "geoblock".to_string(),
                serde_json::json!({"allowedCountries": ["FR", "DE"], "enabled": true}),
            )])),
            errors: Some(ErrorPage {
                query: Some("/{status}.html".to_string()),
                service: Some(LoadBalancerSpec {
                    name: "error-pages".to_string(),
                    port: Some(IntOrString::Int(8080)),
                    ..Default::default()
                }),
                status: Some(vec!["500-599".to_string()]),
                status_rewrites: Some(BTreeMap::from([("418".to_string(), 404)])),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_json_round_trip_preserves_fields() {
        let spec = full_spec();
        let json = serde_json::to_string(&spec).unwrap();
        let parsed: MiddlewareSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, spec);
    }

    #[test]
    fn test_unset_fields_are_omitted() {
        let spec = MiddlewareSpec {
            strip_prefix: Some(StripPrefix {
                prefixes: Some(vec!["/api".to_string()]),
                force_slash: None,
            }),
            ..Default::default()
        };
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json, serde_json::json!({"stripPrefix": {"prefixes": ["/api"]}}));
    }

    #[test]
    fn test_irregular_wire_names() {
        let json = serde_json::to_value(full_spec()).unwrap();
        assert!(json.get("passTLSClientCert").is_some());
        assert_eq!(json["headers"]["forceSTSHeader"], true);
        assert_eq!(json["headers"]["customBrowserXSSValue"], "1; mode=block");
        assert_eq!(
            json["rateLimit"]["sourceCriterion"]["ipStrategy"]["excludedIPs"][0],
            "127.0.0.1/32"
        );
        assert_eq!(json["rateLimit"]["period"], "1m");
    }

    #[test]
    fn test_parse_from_yaml_manifest() {
        let yaml = r#"
apiVersion: traefik.io/v1alpha1
kind: Middleware
metadata:
  name: limit
  namespace: default
spec:
  rateLimit:
    average: 10
    period: 60
"#;
        let mw: Middleware = serde_yaml::from_str(yaml).unwrap();
        let rate_limit = mw.spec.rate_limit.unwrap();
        assert_eq!(rate_limit.average, Some(10));
        assert_eq!(rate_limit.period, Some(IntOrString::Int(60)));
        assert_eq!(mw.metadata.name.as_deref(), Some("limit"));
    }

    #[test]
    fn test_resource_identity() {
        assert_eq!(Middleware::group(&()), "traefik.io");
        assert_eq!(Middleware::version(&()), "v1alpha1");
        assert_eq!(Middleware::kind(&()), "Middleware");
        assert_eq!(Middleware::plural(&()), "middlewares");
        assert_eq!(Middleware::api_version(&()), "traefik.io/v1alpha1");
    }

    #[test]
    fn test_crd_schema_contains_middlewares() {
        let crd = Middleware::crd();
        assert_eq!(crd.spec.group, "traefik.io");
        let schema = serde_json::to_value(&crd.spec.versions[0].schema).unwrap();
        let props = &schema["openAPIV3Schema"]["properties"]["spec"]["properties"];
        assert!(props.get("rateLimit").is_some());
        assert!(props.get("passTLSClientCert").is_some());
    }

    #[test]
    fn test_validation_collects_all_issues() {
        let spec = MiddlewareSpec {
            rate_limit: Some(RateLimit {
                average: Some(-1),
                burst: Some(-2),
                ..Default::default()
            }),
            retry: Some(Retry {
                attempts: Some(-5),
                initial_interval: None,
            }),
            chain: Some(Chain {
                middlewares: Some(vec![MiddlewareRef::default()]),
            }),
            ..Default::default()
        };
        let issues = spec.validation_issues(&FieldPath::root("spec"));
        let paths: Vec<&str> = issues.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "spec.chain.middlewares[0].name",
                "spec.rateLimit.average",
                "spec.rateLimit.burst",
                "spec.retry.attempts",
            ]
        );
    }

    #[test]
    fn test_deprecated_attributes() {
        let spec = MiddlewareSpec {
            ip_white_list: Some(IpWhiteList::default()),
            headers: Some(Headers {
                feature_policy: Some("camera 'none'".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let issues = spec.validation_issues(&FieldPath::root("spec"));
        assert!(issues.iter().all(|i| i.deprecated));
        let paths: Vec<&str> = issues.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["spec.ipWhiteList", "spec.headers.featurePolicy"]);
    }

    #[test]
    fn test_validation_accepts_valid_spec() {
        assert!(full_spec().validation_issues(&FieldPath::root("spec")).is_empty());
    }
}
