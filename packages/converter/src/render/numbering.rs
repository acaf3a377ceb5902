//! Section numbering.
//!
//! Numbers are assigned once, before rendering, and looked up by element
//! id. Main-body divisions are numbered `1`, `1.1`, `1.1.1`; annexes are
//! lettered `A`, `B`, ... with their clauses numbered `A.1`, `A.1.1`.
//! Terms share the counter of their sibling subdivisions. Preface
//! divisions and informative bibliography sections are unnumbered.

use std::collections::HashMap;

use roxmltree::Node;

use crate::xml::{element_children, find_child, get_tag_name, has_tag, text_at};

/// Elements that take part in subdivision numbering.
const NUMBERED: [&str; 5] = ["clause", "terms", "definitions", "references", "term"];

/// Section numbers keyed by element id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionNumbers {
    numbers: HashMap<String, String>,
}

impl SectionNumbers {
    /// Number every division of a document.
    #[must_use]
    pub fn compute(root: Node<'_, '_>) -> Self {
        let mut numbers = Self::default();

        for (i, division) in main_body_order(root).into_iter().enumerate() {
            numbers.assign(division, (i + 1).to_string());
        }

        for (i, annex) in element_children(root)
            .filter(|n| has_tag(*n, "annex"))
            .enumerate()
        {
            numbers.assign(annex, annex_letter(i));
        }

        tracing::debug!(count = numbers.numbers.len(), "numbered sections");
        numbers
    }

    /// Build from explicit `(id, number)` pairs.
    #[must_use]
    pub fn from_pairs<'s>(pairs: impl IntoIterator<Item = (&'s str, &'s str)>) -> Self {
        Self {
            numbers: pairs
                .into_iter()
                .map(|(id, n)| (id.to_string(), n.to_string()))
                .collect(),
        }
    }

    /// Number of the element with this id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&str> {
        self.numbers.get(id).map(String::as_str)
    }

    /// Record `number` for `node` and number its subdivisions below it.
    fn assign(&mut self, node: Node<'_, '_>, number: String) {
        let mut counter = 0;
        for child in element_children(node) {
            if NUMBERED.contains(&get_tag_name(child)) {
                counter += 1;
                self.assign(child, format!("{number}.{counter}"));
            }
        }
        if let Some(id) = node.attribute("id") {
            self.numbers.insert(id.to_string(), number);
        }
    }
}

/// Whether a division is the scope clause.
fn is_scope(node: Node<'_, '_>) -> bool {
    has_tag(node, "clause")
        && text_at(node, "title").is_some_and(|t| t.eq_ignore_ascii_case("scope"))
}

/// Normative reference lists at the top of the bibliography.
#[must_use]
pub fn normative_references<'a, 'input>(root: Node<'a, 'input>) -> Vec<Node<'a, 'input>> {
    find_child(root, "bibliography")
        .map(|bib| {
            element_children(bib)
                .filter(|n| has_tag(*n, "references") && n.attribute("normative") == Some("true"))
                .collect()
        })
        .unwrap_or_default()
}

/// Top-level divisions of the main body in display order.
///
/// The scope clause comes first, then the normative references, then the
/// remaining sections in document order.
#[must_use]
pub fn main_body_order<'a, 'input>(root: Node<'a, 'input>) -> Vec<Node<'a, 'input>> {
    let sections: Vec<_> = find_child(root, "sections")
        .map(|s| element_children(s).collect())
        .unwrap_or_default();

    let scope = sections.iter().copied().find(|n| is_scope(*n));
    let mut order: Vec<_> = scope.into_iter().collect();
    order.extend(normative_references(root));
    order.extend(sections.into_iter().filter(|n| Some(*n) != scope));
    order
}

/// Letter for the annex at `index`: `A`..`Z`, then `AA`, `AB`, ...
#[must_use]
pub fn annex_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }
    letters.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    const DOC: &str = r#"<m3d-standard>
<sections>
  <clause id="intro"><title>General</title></clause>
  <terms id="T"><title>Terms</title>
    <term id="t1"/><term id="t2"/>
    <terms id="T2"><term id="t3"/></terms>
  </terms>
  <clause id="S"><title>Scope</title></clause>
  <clause id="C"><title>Body</title>
    <clause id="C1"><clause id="C11"/></clause>
  </clause>
</sections>
<annex id="X"><clause id="X1"><clause id="X11"/></clause></annex>
<annex id="Y"/>
<bibliography>
  <references id="N" normative="true"><title>Normative References</title></references>
  <clause id="B"><title>Bibliography</title><references id="B1" normative="false"/></clause>
</bibliography>
</m3d-standard>"#;

    fn numbers() -> SectionNumbers {
        let doc = Document::parse(DOC).unwrap();
        SectionNumbers::compute(doc.root_element())
    }

    #[test]
    fn test_main_body_order() {
        let doc = Document::parse(DOC).unwrap();
        let ids: Vec<_> = main_body_order(doc.root_element())
            .into_iter()
            .filter_map(|n| n.attribute("id"))
            .collect();
        assert_eq!(ids, vec!["S", "N", "intro", "T", "C"]);
    }

    #[test]
    fn test_top_level_numbers() {
        let numbers = numbers();
        assert_eq!(numbers.get("S"), Some("1"));
        assert_eq!(numbers.get("N"), Some("2"));
        assert_eq!(numbers.get("intro"), Some("3"));
        assert_eq!(numbers.get("T"), Some("4"));
        assert_eq!(numbers.get("C"), Some("5"));
    }

    #[test]
    fn test_nested_numbers() {
        let numbers = numbers();
        assert_eq!(numbers.get("C1"), Some("5.1"));
        assert_eq!(numbers.get("C11"), Some("5.1.1"));
    }

    #[test]
    fn test_terms_share_counter_with_subdivisions() {
        let numbers = numbers();
        assert_eq!(numbers.get("t1"), Some("4.1"));
        assert_eq!(numbers.get("t2"), Some("4.2"));
        assert_eq!(numbers.get("T2"), Some("4.3"));
        assert_eq!(numbers.get("t3"), Some("4.3.1"));
    }

    #[test]
    fn test_annex_numbers() {
        let numbers = numbers();
        assert_eq!(numbers.get("X"), Some("A"));
        assert_eq!(numbers.get("X1"), Some("A.1"));
        assert_eq!(numbers.get("X11"), Some("A.1.1"));
        assert_eq!(numbers.get("Y"), Some("B"));
    }

    #[test]
    fn test_informative_bibliography_unnumbered() {
        let numbers = numbers();
        assert_eq!(numbers.get("B"), None);
        assert_eq!(numbers.get("B1"), None);
    }

    #[test]
    fn test_annex_letter() {
        assert_eq!(annex_letter(0), "A");
        assert_eq!(annex_letter(25), "Z");
        assert_eq!(annex_letter(26), "AA");
        assert_eq!(annex_letter(27), "AB");
        assert_eq!(annex_letter(52), "BA");
    }
}
