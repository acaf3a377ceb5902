//! RELAX NG validation of the assembled document.
//!
//! Supports the subset of the XML syntax the shipped grammar uses. Errors
//! are collected rather than returned: an element that does not fit is
//! reported and skipped, and validation continues with its siblings.

mod grammar;
mod pattern;

use std::rc::Rc;

pub use grammar::Grammar;
pub use pattern::{NameClass, Pattern};

use pattern::{choice, Deriver};

use crate::error::Result;
use crate::xml::{Element, XmlNode};

/// The grammar shipped with the crate.
const M3D_GRAMMAR: &str = include_str!("../../schema/m3d.rng");

/// A compiled schema ready for validation.
#[derive(Debug)]
pub struct Schema {
    grammar: Grammar,
}

impl Schema {
    /// Compile a schema from RELAX NG XML syntax.
    pub fn parse(rng: &str) -> Result<Self> {
        Ok(Self {
            grammar: Grammar::parse(rng)?,
        })
    }

    /// Compile the shipped M3D grammar.
    pub fn m3d() -> Result<Self> {
        Self::parse(M3D_GRAMMAR)
    }

    /// Validate a document tree.
    ///
    /// # Returns
    /// One message per violation, prefixed with the element path. An empty
    /// list means the document is valid.
    #[must_use]
    pub fn validate(&self, root: &Element) -> Vec<String> {
        let mut run = ValidationRun {
            deriver: Deriver::new(&self.grammar.defs),
            errors: Vec::new(),
        };
        let end = run.element(&self.grammar.start, root, "");
        if !run.errors.is_empty() {
            return run.errors;
        }
        if !run.deriver.nullable(&end) {
            run.errors
                .push(format!("/{}: document is incomplete", root.name));
        }
        run.errors
    }
}

struct ValidationRun<'g> {
    deriver: Deriver<'g>,
    errors: Vec<String>,
}

fn is_not_allowed(p: &Pattern) -> bool {
    matches!(p, Pattern::NotAllowed)
}

impl ValidationRun<'_> {
    /// Match one element against `p` and return the pattern for what follows it.
    fn element(&mut self, p: &Rc<Pattern>, element: &Element, parent_path: &str) -> Rc<Pattern> {
        let d = &self.deriver;
        let path = format!("{parent_path}/{}", element.name);

        let opened = d.start_tag_open_deriv(p, &element.name);
        if is_not_allowed(&opened) {
            let expected = d.expected_elements(p);
            let message = if expected.is_empty() {
                format!("{path}: element not allowed here")
            } else {
                format!(
                    "{path}: element not allowed here; expected one of {}",
                    expected.join(", ")
                )
            };
            self.errors.push(message);
            return p.clone();
        }

        let mut current = opened.clone();
        for (name, value) in &element.attributes {
            let next = self.deriver.att_deriv(&current, name, value);
            if is_not_allowed(&next) {
                self.errors
                    .push(format!("{path}: attribute \"{name}\" not allowed or invalid"));
            } else {
                current = next;
            }
        }

        let closed = self.deriver.start_tag_close_deriv(&current);
        if is_not_allowed(&closed) {
            let missing = self.deriver.missing_attributes(&current);
            self.errors.push(format!(
                "{path}: missing required attribute {}",
                missing.join(", ")
            ));
            return self.deriver.after_rest(&opened);
        }

        let content = self.children(closed, element, &path);

        let ended = self.deriver.end_tag_deriv(&content);
        if is_not_allowed(&ended) {
            let expected = self.deriver.expected_elements(&content);
            let message = if expected.is_empty() {
                format!("{path}: incomplete content")
            } else {
                format!("{path}: incomplete content; expected {}", expected.join(", "))
            };
            self.errors.push(message);
            return self.deriver.after_rest(&content);
        }
        ended
    }

    fn children(&mut self, p: Rc<Pattern>, element: &Element, path: &str) -> Rc<Pattern> {
        // Whitespace-only text matters only when it is the sole content.
        if element.is_blank() {
            let text = element.text_content();
            let derived = self.deriver.text_deriv(&p, &text);
            return choice(p, derived);
        }

        let mut current = p;
        for child in &element.children {
            match child {
                XmlNode::Element(e) => current = self.element(&current, e, path),
                XmlNode::Text(t) if t.trim().is_empty() => {}
                XmlNode::Text(t) => {
                    let next = self.deriver.text_deriv(&current, t);
                    if is_not_allowed(&next) {
                        self.errors.push(format!("{path}: text not allowed here"));
                    } else {
                        current = next;
                    }
                }
            }
        }
        current
    }
}
