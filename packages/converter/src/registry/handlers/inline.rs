//! Inline element handlers for text-level elements.
//!
//! These handlers render elements that appear inline within text, such
//! as emphasis, keywords, formulas and links.

use roxmltree::Node;

use crate::registry::handler::{render_children, ElementHandler, RecurseFn};
use crate::registry::types::{RenderContext, RenderResult};
use crate::xml::{escape_attr, escape_text, text_content};

/// Handler that wraps its content in a fixed HTML tag.
///
/// Covers `em` → `i`, `strong` → `b`, `strike` → `s` and the elements
/// whose name is the same in both vocabularies (`sup`, `sub`, `tt`).
pub struct WrapHandler {
    tag: &'static str,
}

impl WrapHandler {
    #[must_use]
    pub fn new(tag: &'static str) -> Self {
        Self { tag }
    }
}

impl ElementHandler for WrapHandler {
    fn handle<'a, 'input>(
        &self,
        node: Node<'a, 'input>,
        context: &mut RenderContext<'_>,
        recurse: &RecurseFn<'a, 'input>,
    ) -> RenderResult {
        let content = render_children(node, context, recurse);
        RenderResult::new(format!("<{tag}>{content}</{tag}>", tag = self.tag))
    }
}

/// Handler for elements rendered as a styled `<span>`.
///
/// `keyword` gets a class, `smallcap` an inline style.
pub struct SpanHandler {
    attribute: &'static str,
}

impl SpanHandler {
    /// Span carrying the given attribute text, e.g. `class="keyword"`.
    #[must_use]
    pub fn new(attribute: &'static str) -> Self {
        Self { attribute }
    }
}

impl ElementHandler for SpanHandler {
    fn handle<'a, 'input>(
        &self,
        node: Node<'a, 'input>,
        context: &mut RenderContext<'_>,
        recurse: &RecurseFn<'a, 'input>,
    ) -> RenderResult {
        let content = render_children(node, context, recurse);
        RenderResult::new(format!("<span {}>{content}</span>", self.attribute))
    }
}

/// Handler for `<stem>` (formula) elements.
///
/// AsciiMath is left for client-side typesetting, delimited by `(#(` and `)#)`.
pub struct StemHandler;

impl ElementHandler for StemHandler {
    fn handle<'a, 'input>(
        &self,
        node: Node<'a, 'input>,
        _context: &mut RenderContext<'_>,
        _recurse: &RecurseFn<'a, 'input>,
    ) -> RenderResult {
        let text = escape_text(&text_content(node));
        RenderResult::new(format!(r#"<span class="stem">(#({text})#)</span>"#))
    }
}

/// Handler for `<link>` elements.
///
/// A link without text shows its target.
pub struct LinkHandler;

impl ElementHandler for LinkHandler {
    fn handle<'a, 'input>(
        &self,
        node: Node<'a, 'input>,
        context: &mut RenderContext<'_>,
        recurse: &RecurseFn<'a, 'input>,
    ) -> RenderResult {
        let target = node.attribute("target").unwrap_or_default();
        let mut text = render_children(node, context, recurse);
        if text.trim().is_empty() {
            text = escape_text(target);
        }
        RenderResult::new(format!(r#"<a href="{}">{text}</a>"#, escape_attr(target)))
    }
}
