//! Element handler trait definition.

use roxmltree::Node;

use super::types::{RenderContext, RenderResult};
use crate::xml::escape_text;

/// Function type for recursive processing of child elements.
pub type RecurseFn<'a, 'input> =
    dyn Fn(Node<'a, 'input>, &mut RenderContext<'_>) -> RenderResult + 'a;

/// Trait for element handlers.
///
/// Handlers are responsible for rendering a specific type of XML element
/// to markup. They receive a `recurse` function to render child elements.
pub trait ElementHandler: Send + Sync {
    /// Check if this handler can process the given element.
    ///
    /// Default implementation always returns true.
    fn can_handle(&self, _node: Node<'_, '_>, _context: &RenderContext<'_>) -> bool {
        true
    }

    /// Render the element.
    ///
    /// # Arguments
    /// * `node` - The XML element to render
    /// * `context` - Current render context
    /// * `recurse` - Function to call for recursive child rendering
    fn handle<'a, 'input>(
        &self,
        node: Node<'a, 'input>,
        context: &mut RenderContext<'_>,
        recurse: &RecurseFn<'a, 'input>,
    ) -> RenderResult;
}

/// Render mixed content: escaped text and child elements in document order.
pub fn render_children<'a, 'input>(
    node: Node<'a, 'input>,
    context: &mut RenderContext<'_>,
    recurse: &RecurseFn<'a, 'input>,
) -> String {
    let mut out = String::new();
    for child in node.children() {
        if child.is_element() {
            out.push_str(&recurse(child, context).html);
        } else if let Some(text) = child.text() {
            out.push_str(&escape_text(text));
        }
    }
    out
}

/// Render element children only, one per line.
///
/// Used for block containers, where text between children is layout
/// whitespace.
pub fn render_elements<'a, 'input>(
    node: Node<'a, 'input>,
    context: &mut RenderContext<'_>,
    recurse: &RecurseFn<'a, 'input>,
) -> String {
    let mut parts = Vec::new();
    for child in node.children().filter(Node::is_element) {
        let result = recurse(child, context);
        if !result.html.is_empty() {
            parts.push(result.html);
        }
    }
    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Flavor;
    use crate::render::i18n::Labels;
    use crate::render::numbering::SectionNumbers;

    struct TestHandler;

    impl ElementHandler for TestHandler {
        fn handle<'a, 'input>(
            &self,
            _node: Node<'a, 'input>,
            _context: &mut RenderContext<'_>,
            _recurse: &RecurseFn<'a, 'input>,
        ) -> RenderResult {
            RenderResult::new("test")
        }
    }

    #[test]
    fn test_handler_trait() {
        let handler = TestHandler;
        let doc = roxmltree::Document::parse("<test/>").unwrap();
        let numbers = SectionNumbers::default();
        let labels = Labels::default();
        let mut context = RenderContext::new(Flavor::Html, &numbers, &labels);

        let recurse = |_: Node<'_, '_>, _: &mut RenderContext<'_>| RenderResult::empty();
        let result = handler.handle(doc.root_element(), &mut context, &recurse);

        assert_eq!(result.html, "test");
    }

    #[test]
    fn test_render_children_escapes_text() {
        let doc = roxmltree::Document::parse("<p>a &amp; <x/> b</p>").unwrap();
        let numbers = SectionNumbers::default();
        let labels = Labels::default();
        let mut context = RenderContext::new(Flavor::Html, &numbers, &labels);

        let recurse = |_: Node<'_, '_>, _: &mut RenderContext<'_>| RenderResult::new("<i>x</i>");
        let html = render_children(doc.root_element(), &mut context, &recurse);

        assert_eq!(html, "a &amp; <i>x</i> b");
    }

    #[test]
    fn test_render_elements_drops_layout_text() {
        let doc = roxmltree::Document::parse("<div>\n  <a/>\n  <b/>\n</div>").unwrap();
        let numbers = SectionNumbers::default();
        let labels = Labels::default();
        let mut context = RenderContext::new(Flavor::Html, &numbers, &labels);

        let recurse = |n: Node<'_, '_>, _: &mut RenderContext<'_>| {
            RenderResult::new(format!("[{}]", n.tag_name().name()))
        };
        let html = render_elements(doc.root_element(), &mut context, &recurse);

        assert_eq!(html, "[a]\n[b]");
    }
}
