//! Element registry for mapping tag names to handlers.

use std::collections::{HashMap, HashSet};

use roxmltree::Node;

use super::handler::ElementHandler;
use super::types::RenderContext;
use crate::xml::get_tag_name;

/// Registry mapping element names to handlers.
///
/// The registry allows registering handlers for specific tag names,
/// as well as marking tags whose content is rendered by their parent's
/// handler and must not be rendered again.
pub struct ElementRegistry {
    handlers: HashMap<String, Box<dyn ElementHandler>>,
    skip_tags: HashSet<String>,
}

impl ElementRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            skip_tags: HashSet::new(),
        }
    }

    /// Register a handler for a specific tag name.
    pub fn register(
        &mut self,
        tag_name: impl Into<String>,
        handler: impl ElementHandler + 'static,
    ) {
        self.handlers.insert(tag_name.into(), Box::new(handler));
    }

    /// Mark tags as skip (don't render, return empty).
    pub fn skip(&mut self, tag_names: impl IntoIterator<Item = impl Into<String>>) {
        for tag in tag_names {
            self.skip_tags.insert(tag.into());
        }
    }

    /// Get the appropriate handler for an element.
    ///
    /// Returns `None` if the element should be skipped or has no handler.
    pub fn get_handler(
        &self,
        node: Node<'_, '_>,
        context: &RenderContext<'_>,
    ) -> Option<&dyn ElementHandler> {
        let tag_name = get_tag_name(node);

        if self.skip_tags.contains(tag_name) {
            return None;
        }

        self.handlers
            .get(tag_name)
            .filter(|h| h.can_handle(node, context))
            .map(|h| h.as_ref())
    }

    /// Check if a tag should be skipped.
    #[must_use]
    pub fn should_skip(&self, tag_name: &str) -> bool {
        self.skip_tags.contains(tag_name)
    }

}

impl Default for ElementRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Flavor, RecurseFn, RenderResult};
    use crate::render::i18n::Labels;
    use crate::render::numbering::SectionNumbers;
    use roxmltree::Document;

    struct DummyHandler;

    impl ElementHandler for DummyHandler {
        fn handle<'a, 'input>(
            &self,
            _node: Node<'a, 'input>,
            _context: &mut RenderContext<'_>,
            _recurse: &RecurseFn<'a, 'input>,
        ) -> RenderResult {
            RenderResult::new("dummy")
        }
    }

    #[test]
    fn test_registry_register_and_get() {
        let mut registry = ElementRegistry::new();
        registry.register("test", DummyHandler);

        let doc = Document::parse("<test><missing/></test>").unwrap();
        let numbers = SectionNumbers::default();
        let labels = Labels::default();
        let context = RenderContext::new(Flavor::Html, &numbers, &labels);

        let root = doc.root_element();
        assert!(registry.get_handler(root, &context).is_some());
        let missing = root.first_element_child().unwrap();
        assert!(registry.get_handler(missing, &context).is_none());
    }

    #[test]
    fn test_registry_skip() {
        let mut registry = ElementRegistry::new();
        registry.skip(["bibdata", "title"]);

        assert!(registry.should_skip("bibdata"));
        assert!(registry.should_skip("title"));
        assert!(!registry.should_skip("clause"));
    }
}
