//! Input document tree.
//!
//! The markup parser is not part of this crate: the host hands over a
//! parsed tree serialized as YAML. These types mirror that tree. They are
//! immutable once loaded and carry no defaults of their own; defaulting
//! happens in [`crate::config::resolve`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::render::RenderOptions;

/// A single input document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Document {
    /// Front-matter attributes.
    pub attributes: FrontMatter,

    /// Foreword and introduction.
    pub preface: Preface,

    /// Main body clauses.
    pub sections: Vec<Clause>,

    /// Annexes, rendered as lettered appendices.
    pub annexes: Vec<Clause>,

    /// Reference lists and bibliography clauses.
    pub bibliography: Vec<Clause>,
}

impl Document {
    /// Parse a document tree from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Load a document tree from a YAML file.
    ///
    /// When the tree does not name its source file, `docfile` is set to
    /// `path` so that output files are named after the input.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let mut document = Self::from_yaml_str(&text)?;
        if document.attributes.docfile.is_none() {
            document.attributes.docfile = Some(path.to_string_lossy().into_owned());
        }
        Ok(document)
    }
}

/// Document attributes as set in the source header.
///
/// Every field is optional: missing values are resolved against the
/// defaults in [`crate::config`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FrontMatter {
    pub title: Option<String>,
    pub url: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub docnumber: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub edition: Option<String>,
    pub revdate: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub draft: Option<String>,
    pub doctype: Option<String>,
    pub status: Option<String>,
    pub language: Option<String>,
    pub script: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub copyright_year: Option<String>,
    pub technical_committee: Option<String>,
    pub technical_committee_type: Option<String>,

    /// Comma-separated ICS classification codes.
    pub library_ics: Option<String>,

    /// Path of the source file; output files are named after it.
    pub docfile: Option<String>,

    /// Suppress writing output files.
    pub nodoc: bool,

    /// Renderer options (fonts, stylesheets, cover pages, ...).
    #[serde(flatten)]
    pub render: RenderOptions,
}

/// Prefatory material.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preface {
    pub foreword: Option<Clause>,
    pub introduction: Option<Clause>,
}

impl Preface {
    /// Whether there is any prefatory content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.foreword.is_none() && self.introduction.is_none()
    }
}

/// Kind of a structural division.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClauseKind {
    #[default]
    Clause,
    Terms,
    Definitions,
    References,
}

impl ClauseKind {
    /// XML element name for this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clause => "clause",
            Self::Terms => "terms",
            Self::Definitions => "definitions",
            Self::References => "references",
        }
    }
}

/// A clause, terms section, definitions section or reference list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Clause {
    pub id: Option<String>,
    pub title: Option<String>,
    pub kind: ClauseKind,
    pub obligation: Option<String>,
    pub inline_header: bool,

    /// Only meaningful for reference lists.
    pub normative: bool,

    pub blocks: Vec<Block>,
    pub clauses: Vec<Clause>,
}

/// Block-level content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Block {
    Paragraph {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        content: Vec<Inline>,
    },
    Literal {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        lines: Vec<String>,
    },
    List {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        ordered: bool,
        #[serde(default)]
        items: Vec<Vec<Inline>>,
    },
    DefinitionList {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        items: Vec<DefinitionItem>,
    },
    Note {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        content: Vec<Inline>,
    },
    Term {
        #[serde(default)]
        id: Option<String>,
        preferred: String,
        #[serde(default)]
        admitted: Vec<String>,
        #[serde(default)]
        definition: Vec<Inline>,
    },
    Bibitem {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        docidentifier: Option<String>,
        title: String,
    },
}

/// One entry of a definition list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefinitionItem {
    pub term: Vec<Inline>,
    pub definition: Vec<Inline>,
}

/// Inline content.
///
/// A plain YAML string is text; a map with `kind` is a quoted span; a map
/// with `target` is a link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Inline {
    Text(String),
    Quoted(QuotedSpan),
    Link(LinkSpan),
}

/// Quoted inline span, as produced by the markup parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotedSpan {
    pub kind: QuotedKind,
    pub text: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Quote type of a span. Anything unrecognized is treated as an
/// unquoted span, whose meaning comes from its role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuotedKind {
    Emphasis,
    Strong,
    Monospaced,
    Double,
    Single,
    Superscript,
    Subscript,
    Asciimath,
    #[serde(other)]
    Unquoted,
}

/// Hyperlink span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkSpan {
    pub target: String,
    #[serde(default)]
    pub text: Option<String>,
}

/// Accept numbers and booleans where a string is expected, so that
/// `docnumber: 1000` and `draft: 3.4` do not need quoting.
fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Str(String),
        Int(i64),
        Float(f64),
        Bool(bool),
    }

    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|scalar| match scalar {
        Scalar::Str(s) => s,
        Scalar::Int(i) => i.to_string(),
        Scalar::Float(f) => f.to_string(),
        Scalar::Bool(b) => b.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_document() {
        let doc = Document::from_yaml_str("attributes:\n  title: Main Title\n").unwrap();
        assert_eq!(doc.attributes.title.as_deref(), Some("Main Title"));
        assert!(doc.sections.is_empty());
        assert!(doc.preface.is_empty());
        assert!(!doc.attributes.nodoc);
    }

    #[test]
    fn test_parse_kebab_case_attributes() {
        let yaml = r#"
attributes:
  copyright-year: "2001"
  technical-committee: TC
  technical-committee-type: A
  body-font: Arial
  nodoc: true
"#;
        let doc = Document::from_yaml_str(yaml).unwrap();
        assert_eq!(doc.attributes.copyright_year.as_deref(), Some("2001"));
        assert_eq!(doc.attributes.technical_committee.as_deref(), Some("TC"));
        assert_eq!(doc.attributes.technical_committee_type.as_deref(), Some("A"));
        assert_eq!(doc.attributes.render.body_font.as_deref(), Some("Arial"));
        assert!(doc.attributes.nodoc);
    }

    #[test]
    fn test_numeric_scalars_become_strings() {
        let doc = Document::from_yaml_str("attributes:\n  docnumber: 1000\n  draft: 3.4\n").unwrap();
        assert_eq!(doc.attributes.docnumber.as_deref(), Some("1000"));
        assert_eq!(doc.attributes.draft.as_deref(), Some("3.4"));
    }

    #[test]
    fn test_parse_inline_variants() {
        let yaml = r#"
sections:
  - title: Scope
    blocks:
      - type: paragraph
        content:
          - "Plain "
          - { kind: strong, text: bold }
          - { kind: unquoted, role: keyword, text: kw }
          - { target: "http://www.m3aawg.org", text: site }
"#;
        let doc = Document::from_yaml_str(yaml).unwrap();
        let Block::Paragraph { content, .. } = &doc.sections[0].blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(content[0], Inline::Text("Plain ".to_string()));
        assert!(matches!(
            &content[1],
            Inline::Quoted(QuotedSpan { kind: QuotedKind::Strong, .. })
        ));
        assert!(matches!(
            &content[2],
            Inline::Quoted(QuotedSpan { kind: QuotedKind::Unquoted, role: Some(r), .. }) if r == "keyword"
        ));
        assert!(matches!(&content[3], Inline::Link(LinkSpan { target, .. }) if target == "http://www.m3aawg.org"));
    }

    #[test]
    fn test_unknown_quoted_kind_is_unquoted() {
        let span: QuotedSpan = serde_yaml_ng::from_str("{ kind: mark, text: x }").unwrap();
        assert_eq!(span.kind, QuotedKind::Unquoted);
    }

    #[test]
    fn test_parse_clause_kinds() {
        let yaml = r#"
bibliography:
  - kind: references
    normative: true
    title: Normative References
"#;
        let doc = Document::from_yaml_str(yaml).unwrap();
        assert_eq!(doc.bibliography[0].kind, ClauseKind::References);
        assert!(doc.bibliography[0].normative);
    }
}
