//! `TraefikService` custom resource (traefik.io/v1alpha1)
//!
//! A TraefikService is either a weighted round robin over other services or
//! a mirroring service that copies a share of the traffic to mirrors.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::common::{LoadBalancerSpec, Sticky};
use crate::validation::{FieldPath, Validate, ValidationIssue, within};

/// TraefikServiceSpec defines the desired state of a TraefikService
#[derive(CustomResource, Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "traefik.io",
    version = "v1alpha1",
    kind = "TraefikService",
    plural = "traefikservices",
    namespaced,
    derive = "PartialEq",
    doc = "TraefikService is the CRD implementation of a Traefik Service"
)]
#[serde(rename_all = "camelCase")]
pub struct TraefikServiceSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirroring: Option<Mirroring>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weighted: Option<Weighted>,
}

impl Validate for TraefikServiceSpec {
    fn validate(&self, path: &FieldPath, issues: &mut Vec<ValidationIssue>) {
        if self.mirroring.is_some() && self.weighted.is_some() {
            issues.push(ValidationIssue::new(
                path.clone(),
                "only one of mirroring or weighted can be set",
            ));
        }
        self.mirroring.validate(&path.child("mirroring"), issues);
        self.weighted.validate(&path.child("weighted"), issues);
    }
}

/// Mirroring service: the main service plus mirrors receiving a copy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Mirroring {
    #[serde(flatten)]
    pub service: LoadBalancerSpec,

    /// Maximum size of a request body mirrored; -1 disables the limit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_body_size: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirror_body: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirrors: Option<Vec<MirrorService>>,
}

impl Validate for Mirroring {
    fn validate(&self, path: &FieldPath, issues: &mut Vec<ValidationIssue>) {
        self.service.validate(path, issues);
        self.mirrors.validate(&path.child("mirrors"), issues);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MirrorService {
    #[serde(flatten)]
    pub service: LoadBalancerSpec,

    /// Share of the requests mirrored, from 0 to 100
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent: Option<i64>,
}

impl Validate for MirrorService {
    fn validate(&self, path: &FieldPath, issues: &mut Vec<ValidationIssue>) {
        self.service.validate(path, issues);
        within(self.percent, 0, 100, path.child("percent"), issues);
    }
}

/// Weighted round robin over a list of services
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Weighted {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<LoadBalancerSpec>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sticky: Option<Sticky>,
}

impl Validate for Weighted {
    fn validate(&self, path: &FieldPath, issues: &mut Vec<ValidationIssue>) {
        self.services.validate(&path.child("services"), issues);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{Cookie, IntOrString, SameSite, ServiceKind};
    use kube::{CustomResourceExt, Resource};

    fn mirroring_spec() -> TraefikServiceSpec {
        TraefikServiceSpec {
            mirroring: Some(Mirroring {
                service: LoadBalancerSpec {
                    name: "app".to_string(),
                    port: Some(IntOrString::Int(80)),
                    ..Default::default()
                },
                max_body_size: Some(-1),
                mirror_body: Some(true),
                mirrors: Some(vec![MirrorService {
                    service: LoadBalancerSpec {
                        name: "shadow".to_string(),
                        kind: Some(ServiceKind::TraefikService),
                        ..Default::default()
                    },
                    percent: Some(20),
                }]),
            }),
            weighted: None,
        }
    }

    #[test]
    fn test_mirroring_flattens_service_fields() {
        let json = serde_json::to_value(mirroring_spec()).unwrap();
        let mirroring = &json["mirroring"];
        assert_eq!(mirroring["name"], "app");
        assert_eq!(mirroring["port"], 80);
        assert_eq!(mirroring["maxBodySize"], -1);
        assert_eq!(mirroring["mirrors"][0]["name"], "shadow");
        assert_eq!(mirroring["mirrors"][0]["kind"], "TraefikService");
        assert_eq!(mirroring["mirrors"][0]["percent"], 20);
        assert!(mirroring.get("service").is_none());
    }

    #[test]
    fn test_json_round_trip_preserves_fields() {
        let weighted = TraefikServiceSpec {
            mirroring: None,
            weighted: Some(Weighted {
                services: Some(vec![
                    LoadBalancerSpec {
                        name: "v1".to_string(),
                        weight: Some(3),
                        port: Some(IntOrString::String("http".to_string())),
                        ..Default::default()
                    },
                    LoadBalancerSpec {
                        name: "v2".to_string(),
                        weight: Some(1),
                        ..Default::default()
                    },
                ]),
                sticky: Some(Sticky {
                    cookie: Some(Cookie {
                        name: Some("lb".to_string()),
                        same_site: Some(SameSite::Lax),
                        http_only: Some(true),
                        ..Default::default()
                    }),
                }),
            }),
        };

        for spec in [mirroring_spec(), weighted] {
            let json = serde_json::to_string(&spec).unwrap();
            let parsed: TraefikServiceSpec = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, spec);
        }
    }

    #[test]
    fn test_resource_identity() {
        assert_eq!(TraefikService::kind(&()), "TraefikService");
        assert_eq!(TraefikService::plural(&()), "traefikservices");
        assert_eq!(TraefikService::crd().spec.names.kind, "TraefikService");
    }

    #[test]
    fn test_validation_rejects_both_modes() {
        let mut spec = mirroring_spec();
        spec.weighted = Some(Weighted::default());
        let issues = spec.validation_issues(&FieldPath::root("spec"));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path.as_str(), "spec");
    }

    #[test]
    fn test_validation_mirror_percent() {
        let mut spec = mirroring_spec();
        if let Some(mirroring) = spec.mirroring.as_mut() {
            mirroring.mirrors = Some(vec![MirrorService {
                service: LoadBalancerSpec {
                    name: "shadow".to_string(),
                    ..Default::default()
                },
                percent: Some(150),
            }]);
        }
        let issues = spec.validation_issues(&FieldPath::root("spec"));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path.as_str(), "spec.mirroring.mirrors[0].percent");
    }

    #[test]
    fn test_validation_weighted_service_names() {
        let spec = TraefikServiceSpec {
            mirroring: None,
            weighted: Some(Weighted {
                services: Some(vec![LoadBalancerSpec::default()]),
                sticky: None,
            }),
        };
        let issues = spec.validation_issues(&FieldPath::root("spec"));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path.as_str(), "spec.weighted.services[0].name");
    }
}
