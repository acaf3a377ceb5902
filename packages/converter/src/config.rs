//! Configuration constants and front-matter resolution.
//!
//! All defaulting of document metadata happens here, in one place, with a
//! single precedence order per field:
//!
//! 1. the value set explicitly on the document, if present and legal;
//! 2. the built-in default below.
//!
//! Illegal values (an unknown document subtype) are replaced by the default
//! and produce a warning. Missing values never warn.

use std::fmt;
use std::str::FromStr;

use crate::document::FrontMatter;

/// Namespace attached to the `m3d-standard` root element.
pub const M3D_NAMESPACE: &str = "https://open.ribose.com/standards/m3d";

/// Root element name of the output XML.
pub const ROOT_ELEMENT: &str = "m3d-standard";

/// XML prolog of the assembled document.
pub const XML_PROLOG: &str = "<?xml version='1.0' encoding='UTF-8'?>";

/// Organization named as author, publisher and copyright owner.
pub const DEFAULT_ORGANIZATION: &str = "Ribose";

/// ISO 15924 script code used when the document sets none.
pub const DEFAULT_SCRIPT: &str = "Latn";

/// Language used when the document sets none.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Document stage used when the document sets no status.
pub const DEFAULT_STATUS: &str = "published";

/// Language of the document title element.
pub const TITLE_LANGUAGE: &str = "en";

/// Stylesheet selector handed to the XSL-FO processor.
pub const PDF_STYLESHEET: &str = "m3d.report.xsl";

/// Organization logos copied next to the Word output.
pub const WORD_LOGO: &str = "logo.jpg";
pub const HTML_LOGO: &str = "m3-logo.png";

/// M3AAWG document subtypes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DocType {
    Policy,
    BestPractices,
    SupportingDocument,
    #[default]
    Report,
}

impl DocType {
    /// All legal subtypes.
    pub const ALL: [DocType; 4] = [
        Self::Policy,
        Self::BestPractices,
        Self::SupportingDocument,
        Self::Report,
    ];

    /// Get the attribute value used in the XML output.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Policy => "policy",
            Self::BestPractices => "best-practices",
            Self::SupportingDocument => "supporting-document",
            Self::Report => "report",
        }
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Set explicitly on the document.
    Document,
    /// Not set; built-in default used.
    Default,
    /// Set to an illegal value, replaced by the default.
    Substituted { rejected: String },
}

/// A resolved value together with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    pub value: T,
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    fn document(value: T) -> Self {
        Self {
            value,
            source: ValueSource::Document,
        }
    }

    fn default_value(value: T) -> Self {
        Self {
            value,
            source: ValueSource::Default,
        }
    }
}

/// Front matter with every default applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFrontMatter {
    pub title: String,
    pub url: Option<String>,
    pub docidentifier: String,
    pub edition: Option<String>,
    pub revdate: Option<String>,
    pub draft: Option<String>,
    pub doctype: Resolved<DocType>,
    pub status: Resolved<String>,
    pub language: Resolved<String>,
    pub script: Resolved<String>,
    pub copyright_year: Resolved<String>,
    pub organization: String,
    pub committee: Option<Committee>,
    pub ics: Vec<String>,
}

/// Technical committee and its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committee {
    pub name: String,
    pub kind: Option<String>,
}

/// Resolve a document subtype.
///
/// Unknown values fall back to [`DocType::Report`] with a warning.
#[must_use]
pub fn resolve_doctype(raw: Option<&str>) -> (Resolved<DocType>, Option<String>) {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => (Resolved::default_value(DocType::default()), None),
        Some(value) => match value.parse::<DocType>() {
            Ok(doctype) => (Resolved::document(doctype), None),
            Err(rejected) => {
                let fallback = DocType::default();
                let warning =
                    format!("{rejected} is not a legal document type: reverting to '{fallback}'");
                (
                    Resolved {
                        value: fallback,
                        source: ValueSource::Substituted { rejected },
                    },
                    Some(warning),
                )
            }
        },
    }
}

/// Resolve an optional string attribute against a fixed default.
fn resolve_string(raw: Option<&str>, default: &str) -> Resolved<String> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => Resolved::document(value.to_string()),
        None => Resolved::default_value(default.to_string()),
    }
}

fn non_empty(raw: Option<&String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Resolve all front-matter fields.
///
/// `current_year` is the fallback copyright year; passing it in keeps the
/// resolution deterministic under test.
///
/// # Returns
/// The resolved front matter and any warnings raised while resolving.
#[must_use]
pub fn resolve(front: &FrontMatter, current_year: i32) -> (ResolvedFrontMatter, Vec<String>) {
    let mut warnings = Vec::new();

    let (doctype, doctype_warning) = resolve_doctype(front.doctype.as_deref());
    if let Some(warning) = doctype_warning {
        tracing::debug!("{warning}");
        warnings.push(warning);
    }

    let committee = non_empty(front.technical_committee.as_ref()).map(|name| Committee {
        name,
        kind: non_empty(front.technical_committee_type.as_ref()),
    });

    let ics = front
        .library_ics
        .as_deref()
        .map(|codes| {
            codes
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    let resolved = ResolvedFrontMatter {
        title: front.title.clone().unwrap_or_default(),
        url: non_empty(front.url.as_ref()),
        docidentifier: front.docnumber.clone().unwrap_or_default(),
        edition: non_empty(front.edition.as_ref()),
        revdate: non_empty(front.revdate.as_ref()),
        draft: non_empty(front.draft.as_ref()),
        doctype,
        status: resolve_string(front.status.as_deref(), DEFAULT_STATUS),
        language: resolve_string(front.language.as_deref(), DEFAULT_LANGUAGE),
        script: resolve_string(front.script.as_deref(), DEFAULT_SCRIPT),
        copyright_year: resolve_string(
            front.copyright_year.as_deref(),
            &current_year.to_string(),
        ),
        organization: DEFAULT_ORGANIZATION.to_string(),
        committee,
        ics,
    };

    (resolved, warnings)
}
