//! Field validators
//!
//! Validators walk a configuration and collect every problem they find,
//! each tagged with the attribute path it belongs to (`spec.rateLimit.burst`).
//! Nothing stops at the first issue so that a single run reports all of them.

use std::fmt;

/// Dotted attribute path with list indices, e.g. `spec.chain.middlewares[0].name`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath(String);

impl FieldPath {
    /// Path rooted at a top-level attribute
    pub fn root(name: &str) -> Self {
        Self(name.to_string())
    }

    /// Path of a nested attribute
    #[must_use]
    pub fn child(&self, name: &str) -> Self {
        if self.0.is_empty() {
            Self(name.to_string())
        } else {
            Self(format!("{}.{}", self.0, name))
        }
    }

    /// Path of a list element
    #[must_use]
    pub fn index(&self, i: usize) -> Self {
        Self(format!("{}[{}]", self.0, i))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single validation failure, or a deprecated attribute in use
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub path: FieldPath,
    pub message: String,
    /// Accepted but deprecated; reported as a warning
    pub deprecated: bool,
}

impl ValidationIssue {
    pub fn new(path: FieldPath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
            deprecated: false,
        }
    }

    pub fn deprecated(path: FieldPath, message: impl Into<String>) -> Self {
        Self {
            deprecated: true,
            ..Self::new(path, message)
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Types that can check their own field constraints
pub trait Validate {
    /// Append every constraint violation below `path` to `issues`
    fn validate(&self, path: &FieldPath, issues: &mut Vec<ValidationIssue>);

    /// Convenience wrapper returning the collected issues
    fn validation_issues(&self, path: &FieldPath) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        self.validate(path, &mut issues);
        issues
    }
}

impl<T: Validate> Validate for Option<T> {
    fn validate(&self, path: &FieldPath, issues: &mut Vec<ValidationIssue>) {
        if let Some(inner) = self {
            inner.validate(path, issues);
        }
    }
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self, path: &FieldPath, issues: &mut Vec<ValidationIssue>) {
        for (i, item) in self.iter().enumerate() {
            item.validate(&path.index(i), issues);
        }
    }
}

/// Reject negative values for fields declared with `minimum: 0`
pub fn at_least_zero(value: Option<i64>, path: FieldPath, issues: &mut Vec<ValidationIssue>) {
    if let Some(v) = value
        && v < 0
    {
        issues.push(ValidationIssue::new(
            path,
            format!("value must be at least 0, got {}", v),
        ));
    }
}

/// Reject values outside an inclusive range
pub fn within(
    value: Option<i64>,
    min: i64,
    max: i64,
    path: FieldPath,
    issues: &mut Vec<ValidationIssue>,
) {
    if let Some(v) = value
        && !(min..=max).contains(&v)
    {
        issues.push(ValidationIssue::new(
            path,
            format!("value must be between {} and {}, got {}", min, max, v),
        ));
    }
}
