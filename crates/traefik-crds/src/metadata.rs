//! Kubernetes object naming rules
//!
//! Names of namespaced custom resources must be DNS-1123 subdomains and
//! namespaces must be DNS-1123 labels. The API server enforces the same rules;
//! checking them locally turns a failed PATCH into a precise diagnostic.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::validation::{FieldPath, ValidationIssue};

const MAX_SUBDOMAIN_LENGTH: usize = 253;
const MAX_LABEL_LENGTH: usize = 63;

static DNS1123_SUBDOMAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$")
        .expect("valid DNS-1123 subdomain regex")
});

static DNS1123_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").expect("valid DNS-1123 label regex")
});

/// Validate `metadata.name`
pub fn validate_name(name: &str, path: FieldPath, issues: &mut Vec<ValidationIssue>) {
    if name.is_empty() {
        issues.push(ValidationIssue::new(path, "name must not be empty"));
    } else if name.len() > MAX_SUBDOMAIN_LENGTH {
        issues.push(ValidationIssue::new(
            path,
            format!("name must be at most {} characters", MAX_SUBDOMAIN_LENGTH),
        ));
    } else if !DNS1123_SUBDOMAIN.is_match(name) {
        issues.push(ValidationIssue::new(
            path,
            format!(
                "'{}' is not a valid DNS-1123 subdomain (lowercase alphanumerics, '-' and '.')",
                name
            ),
        ));
    }
}

/// Validate `metadata.namespace`
pub fn validate_namespace(namespace: &str, path: FieldPath, issues: &mut Vec<ValidationIssue>) {
    if namespace.is_empty() {
        issues.push(ValidationIssue::new(path, "namespace must not be empty"));
    } else if namespace.len() > MAX_LABEL_LENGTH {
        issues.push(ValidationIssue::new(
            path,
            format!("namespace must be at most {} characters", MAX_LABEL_LENGTH),
        ));
    } else if !DNS1123_LABEL.is_match(namespace) {
        issues.push(ValidationIssue::new(
            path,
            format!(
                "'{}' is not a valid DNS-1123 label (lowercase alphanumerics and '-')",
                namespace
            ),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name_issues(name: &str) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        validate_name(name, FieldPath::root("metadata").child("name"), &mut issues);
        issues
    }

    fn namespace_issues(ns: &str) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        validate_namespace(ns, FieldPath::root("metadata").child("namespace"), &mut issues);
        issues
    }

    #[test]
    fn test_valid_names() {
        assert!(name_issues("strip-prefix").is_empty());
        assert!(name_issues("a").is_empty());
        assert!(name_issues("api.v1.rate-limit").is_empty());
    }

    #[test]
    fn test_invalid_names() {
        assert_eq!(name_issues("").len(), 1);
        assert_eq!(name_issues("Upper").len(), 1);
        assert_eq!(name_issues("-leading").len(), 1);
        assert_eq!(name_issues("trailing.").len(), 1);
        assert_eq!(name_issues(&"a".repeat(254)).len(), 1);
    }

    #[test]
    fn test_namespace_rejects_dots() {
        assert!(namespace_issues("traefik-system").is_empty());
        let issues = namespace_issues("traefik.system");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path.as_str(), "metadata.namespace");
    }

    #[test]
    fn test_namespace_length_limit() {
        assert!(namespace_issues(&"n".repeat(63)).is_empty());
        assert_eq!(namespace_issues(&"n".repeat(64)).len(), 1);
    }
}
