//! Compiler from RELAX NG XML syntax to [`Pattern`]s.

use std::collections::HashMap;
use std::rc::Rc;

use roxmltree::Node;

use super::pattern::{
    choice, empty, group, interleave, not_allowed, one_or_more, optional, text, zero_or_more,
    NameClass, Pattern,
};
use crate::error::{ConverterError, Result};
use crate::xml::{element_children, get_tag_name};

/// A compiled grammar: start pattern plus named definitions.
#[derive(Debug)]
pub struct Grammar {
    pub start: Rc<Pattern>,
    pub defs: Vec<Rc<Pattern>>,
}

/// How a `define` or `start` with the same name merges with earlier ones.
fn combine(
    existing: Option<Rc<Pattern>>,
    next: Rc<Pattern>,
    method: Option<&str>,
) -> Result<Rc<Pattern>> {
    match (existing, method) {
        (None, _) => Ok(next),
        (Some(prev), Some("choice")) => Ok(choice(prev, next)),
        (Some(prev), Some("interleave")) => Ok(interleave(prev, next)),
        (Some(_), _) => Err(ConverterError::Grammar(
            "duplicate definition without combine attribute".to_string(),
        )),
    }
}

struct Compiler {
    names: HashMap<String, usize>,
}

impl Compiler {
    fn grammar_error(node: Node<'_, '_>, message: &str) -> ConverterError {
        ConverterError::Grammar(format!("<{}>: {message}", get_tag_name(node)))
    }

    /// Compile a sequence of pattern elements as a group.
    fn sequence<'a, 'input: 'a>(
        &self,
        nodes: impl Iterator<Item = Node<'a, 'input>>,
    ) -> Result<Rc<Pattern>> {
        let mut result = empty();
        for node in nodes {
            result = group(result, self.pattern(node)?);
        }
        Ok(result)
    }

    fn name_class(&self, node: Node<'_, '_>) -> Result<NameClass> {
        match get_tag_name(node) {
            "name" => Ok(NameClass::Name(
                node.text().map(str::trim).unwrap_or_default().to_string(),
            )),
            "anyName" => Ok(NameClass::AnyName),
            "choice" => {
                let mut classes = element_children(node).map(|n| self.name_class(n));
                let first = classes
                    .next()
                    .ok_or_else(|| Self::grammar_error(node, "empty name class choice"))??;
                classes.try_fold(first, |acc, next| -> Result<NameClass> {
                    Ok(NameClass::Choice(Box::new(acc), Box::new(next?)))
                })
            }
            other => Err(Self::grammar_error(
                node,
                &format!("unsupported name class '{other}'"),
            )),
        }
    }

    /// Name class and remaining content children of `element`/`attribute`.
    fn named<'a, 'input>(
        &self,
        node: Node<'a, 'input>,
    ) -> Result<(NameClass, Vec<Node<'a, 'input>>)> {
        let mut children: Vec<_> = element_children(node).collect();
        if let Some(name) = node.attribute("name") {
            return Ok((NameClass::Name(name.trim().to_string()), children));
        }
        if children.is_empty() {
            return Err(Self::grammar_error(node, "missing name"));
        }
        let class = self.name_class(children.remove(0))?;
        Ok((class, children))
    }

    fn pattern(&self, node: Node<'_, '_>) -> Result<Rc<Pattern>> {
        let children = || element_children(node);
        match get_tag_name(node) {
            "element" => {
                let (class, content) = self.named(node)?;
                let content = self.sequence(content.into_iter())?;
                Ok(Rc::new(Pattern::Element(Rc::new(class), content)))
            }
            "attribute" => {
                let (class, content) = self.named(node)?;
                let content = if content.is_empty() {
                    text()
                } else {
                    self.sequence(content.into_iter())?
                };
                Ok(Rc::new(Pattern::Attribute(Rc::new(class), content)))
            }
            "group" => self.sequence(children()),
            "interleave" => {
                let mut result = empty();
                for child in children() {
                    result = interleave(result, self.pattern(child)?);
                }
                Ok(result)
            }
            "choice" => {
                let mut result = not_allowed();
                for child in children() {
                    result = choice(result, self.pattern(child)?);
                }
                Ok(result)
            }
            "optional" => Ok(optional(self.sequence(children())?)),
            "zeroOrMore" => Ok(zero_or_more(self.sequence(children())?)),
            "oneOrMore" => Ok(one_or_more(self.sequence(children())?)),
            "mixed" => Ok(interleave(text(), self.sequence(children())?)),
            "ref" => {
                let name = node
                    .attribute("name")
                    .ok_or_else(|| Self::grammar_error(node, "missing name"))?;
                let index = self.names.get(name).ok_or_else(|| {
                    Self::grammar_error(node, &format!("undefined reference '{name}'"))
                })?;
                Ok(Rc::new(Pattern::Ref(*index)))
            }
            "text" | "data" | "list" => Ok(text()),
            "empty" => Ok(empty()),
            "notAllowed" => Ok(not_allowed()),
            "value" => Ok(Rc::new(Pattern::Value(
                node.text().unwrap_or_default().to_string(),
            ))),
            other => Err(Self::grammar_error(
                node,
                &format!("unsupported pattern '{other}'"),
            )),
        }
    }
}

/// Collect the `start` and `define` children of `grammar`, descending into `div`.
fn components<'a, 'input>(grammar: Node<'a, 'input>, out: &mut Vec<Node<'a, 'input>>) {
    for child in element_children(grammar) {
        match get_tag_name(child) {
            "div" => components(child, out),
            _ => out.push(child),
        }
    }
}

impl Grammar {
    /// Compile a grammar from RELAX NG XML syntax.
    ///
    /// # Errors
    /// Returns [`ConverterError::Grammar`] for unsupported constructs,
    /// undefined references or a missing start pattern.
    pub fn parse(rng: &str) -> Result<Self> {
        let doc = roxmltree::Document::parse(rng)
            .map_err(|e| ConverterError::Grammar(e.to_string()))?;
        let root = doc.root_element();
        if get_tag_name(root) != "grammar" {
            let start = Compiler {
                names: HashMap::new(),
            }
            .pattern(root)?;
            return Ok(Self {
                start,
                defs: Vec::new(),
            });
        }

        let mut parts = Vec::new();
        components(root, &mut parts);

        let mut names = HashMap::new();
        for part in parts.iter().filter(|n| get_tag_name(**n) == "define") {
            let name = part
                .attribute("name")
                .ok_or_else(|| Compiler::grammar_error(*part, "missing name"))?;
            let next = names.len();
            names.entry(name.to_string()).or_insert(next);
        }

        let compiler = Compiler { names };
        let mut defs: Vec<Option<Rc<Pattern>>> = vec![None; compiler.names.len()];
        let mut start = None;

        for part in parts {
            let body = compiler.sequence(element_children(part))?;
            let method = part.attribute("combine");
            match get_tag_name(part) {
                "start" => start = Some(combine(start, body, method)?),
                "define" => {
                    let index = part
                        .attribute("name")
                        .and_then(|name| compiler.names.get(name).copied())
                        .ok_or_else(|| Compiler::grammar_error(part, "missing name"))?;
                    defs[index] = Some(combine(defs[index].take(), body, method)?);
                }
                other => {
                    return Err(ConverterError::Grammar(format!(
                        "unsupported grammar component '{other}'"
                    )))
                }
            }
        }

        let start = start.ok_or_else(|| ConverterError::Grammar("missing start".to_string()))?;
        let defs = defs
            .into_iter()
            .map(|d| d.unwrap_or_else(not_allowed))
            .collect();

        tracing::debug!(definitions = compiler.names.len(), "compiled schema grammar");
        Ok(Self { start, defs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_grammar() {
        let rng = r#"
<grammar xmlns="http://relaxng.org/ns/structure/1.0">
  <start><ref name="doc"/></start>
  <define name="doc">
    <element name="doc">
      <optional><attribute name="id"/></optional>
      <zeroOrMore><ref name="p"/></zeroOrMore>
    </element>
  </define>
  <define name="p"><element name="p"><text/></element></define>
</grammar>"#;
        let grammar = Grammar::parse(rng).unwrap();
        assert_eq!(grammar.defs.len(), 2);
        assert_eq!(*grammar.start, Pattern::Ref(0));
    }

    #[test]
    fn test_combine_choice() {
        let rng = r#"
<grammar xmlns="http://relaxng.org/ns/structure/1.0">
  <start><ref name="block"/></start>
  <define name="block"><element name="p"><text/></element></define>
  <define name="block" combine="choice"><element name="pre"><text/></element></define>
</grammar>"#;
        let grammar = Grammar::parse(rng).unwrap();
        assert!(matches!(*grammar.defs[0], Pattern::Choice(..)));
    }

    #[test]
    fn test_undefined_reference_is_error() {
        let rng = r#"<grammar><start><ref name="missing"/></start></grammar>"#;
        let err = Grammar::parse(rng).unwrap_err();
        assert!(err.to_string().contains("undefined reference 'missing'"));
    }

    #[test]
    fn test_missing_start_is_error() {
        let rng = r#"<grammar><define name="a"><empty/></define></grammar>"#;
        assert!(matches!(Grammar::parse(rng), Err(ConverterError::Grammar(_))));
    }

    #[test]
    fn test_unsupported_pattern_is_error() {
        let rng = r#"<grammar><start><externalRef href="x.rng"/></start></grammar>"#;
        assert!(Grammar::parse(rng).is_err());
    }

    #[test]
    fn test_name_class_choice() {
        let rng = r#"<element><choice><name>a</name><name>b</name></choice><empty/></element>"#;
        let grammar = Grammar::parse(rng).unwrap();
        let Pattern::Element(class, _) = &*grammar.start else {
            panic!("expected element");
        };
        assert!(class.contains("a"));
        assert!(class.contains("b"));
        assert!(!class.contains("c"));
    }
}
