//! Assembler and validator.
//!
//! Joins the metadata and body fragments into one document, cleans up the
//! text, parses it, removes rendering hints that are not part of the
//! schema, validates, and finally attaches the namespace.

use std::collections::HashSet;

use unicode_normalization::UnicodeNormalization;

use crate::config::{M3D_NAMESPACE, ROOT_ELEMENT, XML_PROLOG};
use crate::error::Result;
use crate::schema::Schema;
use crate::xml::{Element, XmlNode};

/// Output of [`assemble`].
#[derive(Debug)]
pub struct Assembled {
    /// The cleaned, namespaced document tree.
    pub root: Element,

    /// Content and schema findings, in that order.
    pub warnings: Vec<String>,
}

impl Assembled {
    /// Serialize with two-space indentation.
    #[must_use]
    pub fn to_xml(&self) -> String {
        self.root.to_document_string(2)
    }
}

/// Join prolog, root element and fragments, one per line.
#[must_use]
pub fn join_fragments(fragments: &[&str]) -> String {
    let mut parts = Vec::with_capacity(fragments.len() + 2);
    parts.push(format!("{XML_PROLOG}\n<{ROOT_ELEMENT}>"));
    parts.extend(fragments.iter().map(|f| (*f).to_string()));
    parts.push(format!("</{ROOT_ELEMENT}>"));
    parts.join("\n")
}

/// Normalize to NFC, trim trailing whitespace and drop blank lines.
#[must_use]
pub fn text_cleanup(xml: &str) -> String {
    let normalized: String = xml.nfc().collect();
    normalized
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse cleaned XML into an owned tree.
///
/// # Errors
/// Returns [`ConverterError::MalformedXml`](crate::error::ConverterError::MalformedXml)
/// with the parser's diagnostic if the text is not well-formed.
pub fn parse(xml: &str) -> Result<Element> {
    let doc = roxmltree::Document::parse(xml)?;
    Ok(Element::from_roxmltree(doc.root_element()))
}

/// Remove rendering hints and empty containers.
pub fn cleanup(root: &mut Element) {
    root.walk_mut(&mut |e| {
        e.remove_attr("inline-header");
    });
    root.retain_elements(|e| !(e.name == "preface" && e.elements().next().is_none()));
}

/// Check document content that the schema cannot express.
#[must_use]
pub fn content_warnings(root: &Element) -> Vec<String> {
    let mut warnings = Vec::new();

    let bibdata = root.find("bibdata");
    let has_text = |name: &str| {
        bibdata
            .and_then(|b| b.find(name))
            .is_some_and(|e| !e.text_content().trim().is_empty())
    };
    if !has_text("title") {
        warnings.push("Document has no title".to_string());
    }
    if !has_text("docidentifier") {
        warnings.push("Document has no document identifier".to_string());
    }

    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    root.walk(&mut |e| {
        if let Some(id) = e.attr("id") {
            if !seen.insert(id) && reported.insert(id) {
                warnings.push(format!("Duplicate id '{id}'"));
            }
        }
    });

    root.walk(&mut |e| {
        let id = e.attr("id").unwrap_or("(no id)");
        if e.name == "terms" && e.find("term").is_none() {
            warnings.push(format!("Terms section {id} contains no terms"));
        }
        if e.name == "annex" && e.find("title").is_none() {
            warnings.push(format!("Annex {id} has no title"));
        }
    });

    warnings
}

/// Copy of `root` with formatted strings reduced to plain text.
///
/// Elements carrying a `format` attribute, and `stem` elements, may hold
/// markup the grammar does not describe; only their text is validated.
#[must_use]
pub fn formattedstr_strip(root: &Element) -> Element {
    let mut copy = root.clone();
    copy.walk_mut(&mut |e| {
        if e.name == "stem" || e.attr("format").is_some() {
            let text = e.text_content();
            e.children = vec![XmlNode::Text(text)];
        }
    });
    copy
}

/// Run content checks and schema validation.
///
/// Neither pass is fatal: every finding is logged and returned.
#[must_use]
pub fn validate(root: &Element, schema: &Schema) -> Vec<String> {
    let mut warnings = content_warnings(root);
    warnings.extend(
        schema
            .validate(&formattedstr_strip(root))
            .into_iter()
            .map(|e| format!("Schema: {e}")),
    );
    for warning in &warnings {
        tracing::debug!("{warning}");
    }
    warnings
}

/// Set the default namespace on the root element.
pub fn attach_namespace(root: &mut Element) {
    root.set_attr("xmlns", M3D_NAMESPACE);
}

/// Assemble, validate and namespace a document.
///
/// # Errors
/// Fails only if the assembled text is not well-formed XML.
pub fn assemble(bibdata: &str, body: &str, schema: &Schema) -> Result<Assembled> {
    let joined = join_fragments(&[bibdata, body]);
    let cleaned = text_cleanup(&joined);
    tracing::debug!(bytes = cleaned.len(), "assembled document");

    let mut root = parse(&cleaned)?;
    cleanup(&mut root);
    let warnings = validate(&root, schema);
    attach_namespace(&mut root);

    Ok(Assembled { root, warnings })
}
