//! Owned XML tree.
//!
//! `roxmltree` documents are read-only. Cleanup passes need to drop
//! attributes and elements and to attach a namespace, so the parsed
//! document is copied into this small owned representation first.

use roxmltree::Node;

use super::builder::{escape_attr, escape_text};
use crate::config::XML_PROLOG;

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// A child of an [`Element`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(Element),
    Text(String),
}

/// An element with its attributes and children, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl Element {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Copy a parsed element and its subtree.
    ///
    /// Names lose their namespace; attributes in the XML namespace keep
    /// the `xml:` prefix. Comments and processing instructions are dropped.
    #[must_use]
    pub fn from_roxmltree(node: Node<'_, '_>) -> Self {
        let attributes = node
            .attributes()
            .map(|attr| {
                let name = match attr.namespace() {
                    Some(XML_NAMESPACE) => format!("xml:{}", attr.name()),
                    _ => attr.name().to_string(),
                };
                (name, attr.value().to_string())
            })
            .collect();

        let children = node
            .children()
            .filter_map(|child| {
                if child.is_element() {
                    Some(XmlNode::Element(Self::from_roxmltree(child)))
                } else if child.is_text() {
                    child.text().map(|t| XmlNode::Text(t.to_string()))
                } else {
                    None
                }
            })
            .collect();

        Self {
            name: node.tag_name().name().to_string(),
            attributes,
            children,
        }
    }

    /// Get an attribute value.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing any existing value.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    /// Remove an attribute. Returns whether it was present.
    pub fn remove_attr(&mut self, name: &str) -> bool {
        let before = self.attributes.len();
        self.attributes.retain(|(key, _)| key != name);
        self.attributes.len() != before
    }

    /// Iterate over child elements.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    /// Iterate mutably over child elements.
    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|child| match child {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    /// Find the first child element with the given name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == name)
    }

    /// Concatenated text of this element and its descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                XmlNode::Text(t) => out.push_str(t),
                XmlNode::Element(e) => e.collect_text(out),
            }
        }
    }

    /// Whether the element has no children other than whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.children.iter().all(|child| match child {
            XmlNode::Text(t) => t.trim().is_empty(),
            XmlNode::Element(_) => false,
        })
    }

    /// Keep only the child elements matching `keep`. Text is untouched.
    pub fn retain_elements(&mut self, mut keep: impl FnMut(&Element) -> bool) {
        self.children.retain(|child| match child {
            XmlNode::Element(e) => keep(e),
            XmlNode::Text(_) => true,
        });
    }

    /// Visit this element and all descendants, parents first.
    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut Element)) {
        visit(self);
        for child in self.elements_mut() {
            child.walk_mut(visit);
        }
    }

    /// Visit this element and all descendants, parents first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Element)) {
        visit(self);
        for child in self.elements() {
            child.walk(visit);
        }
    }

    /// Serialize without added whitespace.
    #[must_use]
    pub fn to_compact_string(&self) -> String {
        let mut out = String::new();
        self.write_compact(&mut out);
        out
    }

    /// Serialize with `indent` spaces per nesting level.
    ///
    /// Elements holding non-whitespace text are written on one line so
    /// that mixed content is not altered.
    #[must_use]
    pub fn to_pretty_string(&self, indent: usize) -> String {
        let mut out = String::new();
        self.write_pretty(&mut out, 0, indent);
        out
    }

    /// Serialize as a complete document with prolog.
    #[must_use]
    pub fn to_document_string(&self, indent: usize) -> String {
        format!("{XML_PROLOG}\n{}\n", self.to_pretty_string(indent))
    }

    fn write_start(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }
    }

    fn write_compact(&self, out: &mut String) {
        self.write_start(out);
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            match child {
                XmlNode::Text(t) => out.push_str(&escape_text(t)),
                XmlNode::Element(e) => e.write_compact(out),
            }
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }

    fn write_pretty(&self, out: &mut String, depth: usize, indent: usize) {
        let pad = " ".repeat(depth * indent);
        out.push_str(&pad);

        let has_text = self.children.iter().any(|child| match child {
            XmlNode::Text(t) => !t.trim().is_empty(),
            XmlNode::Element(_) => false,
        });
        if has_text {
            self.write_compact(out);
            return;
        }
        if self.elements().next().is_none() {
            self.write_start(out);
            out.push_str("/>");
            return;
        }

        self.write_start(out);
        out.push('>');
        for child in self.elements() {
            out.push('\n');
            child.write_pretty(out, depth + 1, indent);
        }
        out.push('\n');
        out.push_str(&pad);
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}
