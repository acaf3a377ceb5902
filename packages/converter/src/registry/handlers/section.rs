//! Section handlers: preface divisions, numbered clauses, annexes and the
//! bibliography.
//!
//! Heading numbers come from the precomputed
//! [`SectionNumbers`](crate::render::numbering::SectionNumbers); a division
//! without an entry there is rendered with an unnumbered heading.

use roxmltree::Node;

use super::block::id_attr;
use crate::registry::handler::{render_children, render_elements, ElementHandler, RecurseFn};
use crate::registry::types::{RenderContext, RenderResult};
use crate::xml::{escape_text, find_ancestor, find_child, get_tag_name, has_tag};

/// Page break before a top-level division.
fn page_break(context: &RenderContext<'_>) -> &'static str {
    if context.is_word() {
        r#"<br clear="all" style="mso-special-character:line-break;page-break-before:always"/>"#
    } else {
        "<br/>"
    }
}

/// Render a heading, with its number if it has one.
///
/// Word gets a tab span between number and title, HTML a non-breaking space.
pub(crate) fn heading(
    context: &RenderContext<'_>,
    number: Option<&str>,
    title: &str,
    class: Option<&str>,
) -> String {
    let h = context.level.clamp(1, 6);
    let class = class
        .map(|c| format!(r#" class="{c}""#))
        .unwrap_or_default();
    let label = match number {
        Some(n) if context.is_word() => {
            format!(r#"{n}.<span style="mso-tab-count:1">&#160; </span>"#)
        }
        Some(n) => format!("{n}.&#160; "),
        None => String::new(),
    };
    format!("<h{h}{class}>{label}{title}</h{h}>")
}

/// Rendered `<title>` child of a division, if present.
fn title_html<'a, 'input>(
    node: Node<'a, 'input>,
    context: &mut RenderContext<'_>,
    recurse: &RecurseFn<'a, 'input>,
) -> Option<String> {
    find_child(node, "title")
        .map(|t| render_children(t, context, recurse))
        .filter(|t| !t.trim().is_empty())
}

/// Render the body of a division one heading level down.
fn nested_body<'a, 'input>(
    node: Node<'a, 'input>,
    context: &mut RenderContext<'_>,
    recurse: &RecurseFn<'a, 'input>,
) -> String {
    let level = context.level;
    context.level = level + 1;
    let body = render_elements(node, context, recurse);
    context.level = level;
    body
}

/// Whether `node` is a normative reference list.
pub(crate) fn is_normative_references(node: Node<'_, '_>) -> bool {
    has_tag(node, "references") && node.attribute("normative") == Some("true")
}

/// Handler for `<foreword>`.
pub struct ForewordHandler;

impl ElementHandler for ForewordHandler {
    fn handle<'a, 'input>(
        &self,
        node: Node<'a, 'input>,
        context: &mut RenderContext<'_>,
        recurse: &RecurseFn<'a, 'input>,
    ) -> RenderResult {
        let title = title_html(node, context, recurse)
            .unwrap_or_else(|| escape_text(&context.labels.foreword));
        let body = nested_body(node, context, recurse);
        RenderResult::new(format!(
            r#"{}<div{}><h1 class="ForewordTitle">{title}</h1>{body}</div>"#,
            page_break(context),
            id_attr(node)
        ))
    }
}

/// Handler for `<introduction>`.
pub struct IntroductionHandler;

impl ElementHandler for IntroductionHandler {
    fn handle<'a, 'input>(
        &self,
        node: Node<'a, 'input>,
        context: &mut RenderContext<'_>,
        recurse: &RecurseFn<'a, 'input>,
    ) -> RenderResult {
        let title = title_html(node, context, recurse)
            .unwrap_or_else(|| escape_text(&context.labels.introduction));
        let body = nested_body(node, context, recurse);
        RenderResult::new(format!(
            r#"{}<div class="Section3"{}><h1 class="IntroTitle">{title}</h1>{body}</div>"#,
            page_break(context),
            id_attr(node)
        ))
    }
}

/// Handler for `<clause>`, `<terms>`, `<definitions>` and `<references>`.
///
/// Default titles: a normative reference list is always titled with the
/// normative references label, a definitions section without a title gets
/// the symbols label. Divisions inside the bibliography use the
/// `Section3` heading class, and start on a new page at the top level.
pub struct DivisionHandler;

impl ElementHandler for DivisionHandler {
    fn handle<'a, 'input>(
        &self,
        node: Node<'a, 'input>,
        context: &mut RenderContext<'_>,
        recurse: &RecurseFn<'a, 'input>,
    ) -> RenderResult {
        let tag = get_tag_name(node);
        let normative = is_normative_references(node);
        let in_bibliography = !normative && find_ancestor(node, "bibliography").is_some();

        let title = if normative {
            escape_text(&context.labels.normref)
        } else {
            title_html(node, context, recurse).unwrap_or_else(|| match tag {
                "definitions" => escape_text(&context.labels.symbols),
                "references" if context.level == 1 => escape_text(&context.labels.bibliography),
                _ => String::new(),
            })
        };

        let number = node.attribute("id").and_then(|id| context.numbers.get(id));
        let class = in_bibliography.then_some("Section3");
        let head = heading(context, number, &title, class);

        let mut html = String::new();
        if in_bibliography && context.level == 1 {
            html.push_str(page_break(context));
        }
        let div_class = if tag == "definitions" && context.level == 1 {
            r#" class="Symbols""#
        } else {
            ""
        };
        html.push_str(&format!("<div{}{div_class}>", id_attr(node)));
        html.push_str(&head);
        html.push_str(&nested_body(node, context, recurse));
        html.push_str("</div>");
        RenderResult::new(html)
    }
}

/// Handler for `<annex>`.
///
/// The heading shows the annex letter, its obligation and its title on
/// separate lines.
pub struct AnnexHandler;

impl ElementHandler for AnnexHandler {
    fn handle<'a, 'input>(
        &self,
        node: Node<'a, 'input>,
        context: &mut RenderContext<'_>,
        recurse: &RecurseFn<'a, 'input>,
    ) -> RenderResult {
        let (numbers, labels) = (context.numbers, context.labels);
        let letter = node
            .attribute("id")
            .and_then(|id| numbers.get(id))
            .unwrap_or_default();
        let title = title_html(node, context, recurse).unwrap_or_default();
        let head = format!(
            r#"<h1 class="Annex"><b>{} {letter}</b><br/>({}) <br/><b>{title}</b></h1>"#,
            escape_text(&labels.appendix),
            escape_text(labels.obligation(node.attribute("obligation"))),
        );
        let body = nested_body(node, context, recurse);
        RenderResult::new(format!(
            r#"{}<div{} class="Section3">{head}{body}</div>"#,
            page_break(context),
            id_attr(node)
        ))
    }
}
