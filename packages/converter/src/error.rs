//! Error types for the converter.
//!
//! Only conditions that abort a run are errors. Schema non-conformance,
//! content-check findings and substituted defaults are collected as
//! warnings on the [`Conversion`](crate::convert::Conversion) instead.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the converter library.
#[derive(Debug, Error)]
pub enum ConverterError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The input document tree could not be deserialized.
    #[error("Invalid document tree: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// The assembled XML is not well-formed.
    #[error("Assembled XML is not well-formed: {source}")]
    MalformedXml {
        #[source]
        source: roxmltree::Error,
    },

    /// The RELAX NG grammar could not be compiled.
    #[error("Invalid schema grammar: {0}")]
    Grammar(String),

    /// An explicitly configured asset file does not exist.
    #[error("Missing asset for option '{option}': {}", .path.display())]
    MissingAsset { option: String, path: PathBuf },

    /// No handler is registered for an element.
    #[error("No handler for element <{tag_name}>{}", .context.as_ref().map(|c| format!(" in {c}")).unwrap_or_default())]
    UnknownElement {
        tag_name: String,
        context: Option<String>,
    },

    /// An external tool failed.
    #[error("{program} failed: {message}")]
    ExternalTool {
        program: String,
        message: String,
        stderr: String,
    },
}

impl From<roxmltree::Error> for ConverterError {
    fn from(source: roxmltree::Error) -> Self {
        Self::MalformedXml { source }
    }
}

/// Result type alias for converter operations.
pub type Result<T> = std::result::Result<T, ConverterError>;
