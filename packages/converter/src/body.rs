//! Body fragment builder.
//!
//! Maps the preface, sections, annexes and bibliography of the input tree
//! to XML. Elements without an id get a generated one of the form
//! `_<element>_<n>`, counted per element name in document order, so the
//! same input always yields the same ids.

use std::collections::HashMap;

use crate::document::{Block, Clause, ClauseKind, DefinitionItem, Document, Inline};
use crate::inline::transcode_all;
use crate::xml::XmlBuilder;

/// Default obligation of a division, by where it occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Part {
    Preface,
    Main,
    Bibliography,
}

impl Part {
    fn obligation(self) -> &'static str {
        match self {
            Self::Main => "normative",
            Self::Preface | Self::Bibliography => "informative",
        }
    }
}

/// Builds the body fragment of one document.
#[derive(Debug, Default)]
pub struct BodyBuilder {
    xml: XmlBuilder,
    counters: HashMap<&'static str, usize>,
}

/// Build the body fragment for `document`.
#[must_use]
pub fn build_body(document: &Document) -> String {
    let mut builder = BodyBuilder::default();
    builder.write_document(document);
    builder.xml.finish()
}

impl BodyBuilder {
    fn id_for(&mut self, element: &'static str, id: Option<&String>) -> String {
        if let Some(id) = id.filter(|id| !id.is_empty()) {
            return id.clone();
        }
        let counter = self.counters.entry(element).or_insert(0);
        *counter += 1;
        format!("_{element}_{counter}")
    }

    fn write_document(&mut self, document: &Document) {
        self.xml.open("preface", &[]).newline();
        if let Some(foreword) = &document.preface.foreword {
            self.write_division("foreword", foreword, Part::Preface);
        }
        if let Some(introduction) = &document.preface.introduction {
            self.write_division("introduction", introduction, Part::Preface);
        }
        self.xml.close("preface").newline();

        self.xml.open("sections", &[]).newline();
        for clause in &document.sections {
            self.write_clause(clause, Part::Main);
        }
        self.xml.close("sections").newline();

        for annex in &document.annexes {
            self.write_division("annex", annex, Part::Main);
        }

        if !document.bibliography.is_empty() {
            self.xml.open("bibliography", &[]).newline();
            for clause in &document.bibliography {
                self.write_clause(clause, Part::Bibliography);
            }
            self.xml.close("bibliography").newline();
        }
    }

    fn write_clause(&mut self, clause: &Clause, part: Part) {
        self.write_division(clause.kind.as_str(), clause, part);
    }

    /// Write a division under the element name `name`.
    fn write_division(&mut self, name: &'static str, clause: &Clause, part: Part) {
        let id = self.id_for(name, clause.id.as_ref());
        let obligation = clause
            .obligation
            .clone()
            .unwrap_or_else(|| part.obligation().to_string());

        let mut attrs: Vec<(&str, &str)> =
            vec![("id", id.as_str()), ("obligation", obligation.as_str())];
        let is_plain_clause = matches!(name, "clause" | "annex");
        if is_plain_clause {
            attrs.push((
                "inline-header",
                if clause.inline_header { "true" } else { "false" },
            ));
        }
        if clause.kind == ClauseKind::References {
            attrs.push(("normative", if clause.normative { "true" } else { "false" }));
        }

        self.xml.open(name, &attrs).newline();
        if let Some(title) = clause.title.as_deref().filter(|t| !t.is_empty()) {
            self.xml.element("title", &[], title).newline();
        }
        for block in &clause.blocks {
            self.write_block(block);
        }
        for child in &clause.clauses {
            self.write_clause(child, part);
        }
        self.xml.close(name).newline();
    }

    fn write_paragraph(&mut self, id: Option<&String>, content: &[Inline]) {
        let id = self.id_for("p", id);
        self.xml
            .open("p", &[("id", id.as_str())])
            .raw(&transcode_all(content))
            .close("p");
    }

    fn write_block(&mut self, block: &Block) {
        match block {
            Block::Paragraph { id, content } => {
                self.write_paragraph(id.as_ref(), content);
            }
            Block::Literal { id, title, lines } => {
                let id = self.id_for("figure", id.as_ref());
                self.xml.open("figure", &[("id", id.as_str())]);
                if let Some(title) = title.as_deref().filter(|t| !t.is_empty()) {
                    self.xml.element("name", &[], title);
                }
                self.xml
                    .open("pre", &[])
                    .preformatted(&lines.join("\n"))
                    .close("pre");
                self.xml.close("figure");
            }
            Block::List { id, ordered, items } => {
                let name = if *ordered { "ol" } else { "ul" };
                let id = self.id_for(name, id.as_ref());
                self.xml.open(name, &[("id", id.as_str())]);
                for item in items {
                    self.xml.open("li", &[]);
                    self.write_paragraph(None, item);
                    self.xml.close("li");
                }
                self.xml.close(name);
            }
            Block::DefinitionList { id, items } => {
                let id = self.id_for("dl", id.as_ref());
                self.xml.open("dl", &[("id", id.as_str())]);
                for DefinitionItem { term, definition } in items {
                    self.xml
                        .open("dt", &[])
                        .raw(&transcode_all(term))
                        .close("dt")
                        .open("dd", &[])
                        .raw(&transcode_all(definition))
                        .close("dd");
                }
                self.xml.close("dl");
            }
            Block::Note { id, content } => {
                let id = self.id_for("note", id.as_ref());
                self.xml.open("note", &[("id", id.as_str())]);
                self.write_paragraph(None, content);
                self.xml.close("note");
            }
            Block::Term {
                id,
                preferred,
                admitted,
                definition,
            } => {
                let id = self.id_for("term", id.as_ref());
                self.xml
                    .open("term", &[("id", id.as_str())])
                    .element("preferred", &[], preferred);
                for alt in admitted {
                    self.xml.element("admitted", &[], alt);
                }
                if !definition.is_empty() {
                    self.xml.open("definition", &[]);
                    self.write_paragraph(None, definition);
                    self.xml.close("definition");
                }
                self.xml.close("term");
            }
            Block::Bibitem {
                id,
                docidentifier,
                title,
            } => {
                let id = self.id_for("bibitem", id.as_ref());
                self.xml
                    .open("bibitem", &[("id", id.as_str())])
                    .element("title", &[("format", "text/plain")], title);
                if let Some(docid) = docidentifier.as_deref().filter(|d| !d.is_empty()) {
                    self.xml.element("docidentifier", &[], docid);
                }
                self.xml.close("bibitem");
            }
        }
        self.xml.newline();
    }
}
