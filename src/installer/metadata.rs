//! Module bundle metadata
//!
//! Serde model and validation of a bundle's `metadata.yml`.

use serde::Deserialize;

use crate::error::InstallError;

/// Declared dependency of a module: a package name with the version the
/// bundled assets were built against.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Dependency {
    pub(crate) name: String,
    pub(crate) version: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Dependencies {
    #[serde(default)]
    pub(crate) python: Vec<Dependency>,
    #[serde(default)]
    pub(crate) js: Vec<Dependency>,
}

/// `metadata.yml` descriptor of a module bundle.
#[derive(Debug, Deserialize)]
pub(crate) struct ModuleMetadata {
    pub(crate) name: String,
    pub(crate) version: String,
    #[serde(default)]
    pub(crate) min_analyser_version: Option<String>,
    #[serde(default)]
    pub(crate) dependencies: Dependencies,
}

impl ModuleMetadata {
    pub(crate) fn parse(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// Reject names that cannot be used as a directory or URL segment, and
    /// bundles built for a newer analyser.
    pub(crate) fn validate(&self, analyser_version: &str) -> Result<(), InstallError> {
        if self.name.is_empty() {
            return Err(InstallError::Metadata {
                reason: "the \"name\" field is empty".to_string(),
            });
        }
        if !self
            .name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(InstallError::Metadata {
                reason: format!(
                    "\"{}\" is not a valid module name (allowed: letters, digits, '_', '-')",
                    self.name
                ),
            });
        }
        if self.version.is_empty() {
            return Err(InstallError::Metadata {
                reason: "the \"version\" field is empty".to_string(),
            });
        }

        if let Some(required) = &self.min_analyser_version
            && !version_at_least(analyser_version, required)
        {
            return Err(InstallError::VersionTooOld {
                required: required.clone(),
                current: analyser_version.to_string(),
            });
        }

        Ok(())
    }
}

/// Compare dotted numeric versions; missing and non-numeric components count
/// as zero.
pub(crate) fn version_at_least(current: &str, required: &str) -> bool {
    let parse = |v: &str| {
        v.split('.')
            .map(|part| part.trim().parse::<u64>().unwrap_or(0))
            .collect::<Vec<_>>()
    };
    let mut a = parse(current);
    let mut b = parse(required);
    let len = a.len().max(b.len());
    a.resize(len, 0);
    b.resize(len, 0);
    a >= b
}
