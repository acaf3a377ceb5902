//! Display labels.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Fixed strings used in rendered output.
///
/// Loaded from YAML; keys missing from the file keep their English default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub foreword: String,
    pub introduction: String,
    pub normref: String,
    pub bibliography: String,
    pub symbols: String,
    pub appendix: String,
    pub normative: String,
    pub informative: String,
    pub note: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            foreword: "Foreword".to_string(),
            introduction: "Introduction".to_string(),
            normref: "Normative references".to_string(),
            bibliography: "Bibliography".to_string(),
            symbols: "Symbols and abbreviated terms".to_string(),
            appendix: "Appendix".to_string(),
            normative: "normative".to_string(),
            informative: "informative".to_string(),
            note: "NOTE".to_string(),
        }
    }
}

impl Labels {
    /// Parse label overrides.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Load label overrides from a file.
    pub fn load(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "loading labels");
        Self::from_yaml_str(&std::fs::read_to_string(path)?)
    }

    /// Obligation label for an annex heading.
    #[must_use]
    pub fn obligation(&self, obligation: Option<&str>) -> &str {
        match obligation {
            Some("informative") => &self.informative,
            _ => &self.normative,
        }
    }
}
