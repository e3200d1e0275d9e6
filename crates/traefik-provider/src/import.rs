//! Import identifiers
//!
//! Existing objects are adopted with an identifier of the form
//! `namespace/name`. The same string is used as the computed `id` of every
//! resource and data source.

use std::fmt;
use std::str::FromStr;

use crate::error::ProviderError;

/// Parsed `namespace/name` identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImportId {
    pub namespace: String,
    pub name: String,
}

impl ImportId {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl FromStr for ImportId {
    type Err = ProviderError;

    fn from_str(id: &str) -> Result<Self, Self::Err> {
        let invalid = || ProviderError::InvalidImportId { id: id.to_string() };

        let (namespace, name) = id.split_once('/').ok_or_else(invalid)?;
        if namespace.is_empty() || name.is_empty() || name.contains('/') {
            return Err(invalid());
        }

        Ok(Self::new(namespace, name))
    }
}

impl fmt::Display for ImportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let id: ImportId = "traefik/strip-api".parse().unwrap();
        assert_eq!(id.namespace, "traefik");
        assert_eq!(id.name, "strip-api");
        insta::assert_snapshot!(id.to_string(), @"traefik/strip-api");
    }

    #[test]
    fn test_rejects_everything_else() {
        for id in ["", "name", "/name", "namespace/", "/", "a/b/c", "a//b"] {
            let err = id.parse::<ImportId>().unwrap_err();
            assert!(
                matches!(err, ProviderError::InvalidImportId { .. }),
                "'{}' should be rejected",
                id
            );
        }
    }
}
