//! Render engine that orchestrates element rendering using the registry.

use roxmltree::Node;

use super::core::ElementRegistry;
use super::types::{RenderContext, RenderResult};
use crate::error::{ConverterError, Result};
use crate::xml::get_tag_name;

/// Engine that orchestrates element rendering using the registry.
///
/// The engine walks the XML tree and dispatches elements to their
/// registered handlers. It raises `UnknownElement` error for any element
/// that has no handler and is not marked as skip.
pub struct RenderEngine {
    registry: ElementRegistry,
}

impl RenderEngine {
    /// Create a new engine with the given registry.
    #[must_use]
    pub fn new(registry: ElementRegistry) -> Self {
        Self { registry }
    }

    /// Get a reference to the underlying registry.
    #[must_use]
    pub fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    /// Render an element tree recursively.
    ///
    /// Children without a handler are logged and left out; only the
    /// element passed in here can fail.
    ///
    /// # Errors
    /// Returns `UnknownElement` error if the element has no handler and is not skipped.
    pub fn render(
        &self,
        node: Node<'_, '_>,
        context: &mut RenderContext<'_>,
    ) -> Result<RenderResult> {
        let tag_name = get_tag_name(node);

        if self.registry.should_skip(tag_name) {
            return Ok(RenderResult::empty());
        }

        if let Some(handler) = self.registry.get_handler(node, context) {
            let recurse = |child: Node<'_, '_>, ctx: &mut RenderContext<'_>| -> RenderResult {
                self.render(child, ctx).unwrap_or_else(|err| {
                    tracing::warn!(
                        error = %err,
                        tag = %get_tag_name(child),
                        "Error rendering child element, skipping"
                    );
                    RenderResult::empty()
                })
            };

            return Ok(handler.handle(node, context, &recurse));
        }

        let parent_context = node
            .parent_element()
            .map(|p| format!("<{}>", get_tag_name(p)));
        Err(ConverterError::UnknownElement {
            tag_name: tag_name.to_string(),
            context: parent_context,
        })
    }

    /// Render each node in turn, joined by newlines.
    ///
    /// # Errors
    /// Returns the first error from [`render`](Self::render).
    pub fn render_all<'a, 'input: 'a>(
        &self,
        nodes: impl IntoIterator<Item = Node<'a, 'input>>,
        context: &mut RenderContext<'_>,
    ) -> Result<String> {
        let mut parts = Vec::new();
        for node in nodes {
            let result = self.render(node, context)?;
            if !result.html.is_empty() {
                parts.push(result.html);
            }
        }
        Ok(parts.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::handler::{render_children, ElementHandler, RecurseFn};
    use crate::registry::Flavor;
    use crate::render::i18n::Labels;
    use crate::render::numbering::SectionNumbers;
    use roxmltree::Document;

    struct WrapHandler;

    impl ElementHandler for WrapHandler {
        fn handle<'a, 'input>(
            &self,
            node: Node<'a, 'input>,
            context: &mut RenderContext<'_>,
            recurse: &RecurseFn<'a, 'input>,
        ) -> RenderResult {
            RenderResult::new(format!("<p>{}</p>", render_children(node, context, recurse)))
        }
    }

    fn engine() -> RenderEngine {
        let mut registry = ElementRegistry::new();
        registry.register("p", WrapHandler);
        registry.skip(["bibdata"]);
        RenderEngine::new(registry)
    }

    fn render(xml: &str) -> Result<RenderResult> {
        let doc = Document::parse(xml).unwrap();
        let numbers = SectionNumbers::default();
        let labels = Labels::default();
        let mut context = RenderContext::new(Flavor::Html, &numbers, &labels);
        engine().render(doc.root_element(), &mut context)
    }

    #[test]
    fn test_engine_render_with_handler() {
        assert_eq!(render("<p>a<p>b</p></p>").unwrap().html, "<p>a<p>b</p></p>");
    }

    #[test]
    fn test_engine_render_skip() {
        assert_eq!(render("<bibdata><title>x</title></bibdata>").unwrap().html, "");
    }

    #[test]
    fn test_engine_render_unknown() {
        assert!(matches!(
            render("<table/>"),
            Err(ConverterError::UnknownElement { .. })
        ));
    }

    #[test]
    fn test_engine_unknown_child_is_dropped() {
        assert_eq!(render("<p>a<table/>b</p>").unwrap().html, "<p>ab</p>");
    }
}
