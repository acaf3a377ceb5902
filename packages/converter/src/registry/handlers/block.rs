//! Block element handlers: paragraphs, figures, lists, notes, terms and
//! bibliography entries.

use roxmltree::Node;

use crate::registry::handler::{render_children, render_elements, ElementHandler, RecurseFn};
use crate::registry::types::{ListKind, RenderContext, RenderResult};
use crate::xml::{escape_attr, escape_text, find_child, find_children, has_tag, text_content};

/// ` id="..."` for elements that carry an id, empty otherwise.
pub(crate) fn id_attr(node: Node<'_, '_>) -> String {
    node.attribute("id")
        .map(|id| format!(r#" id="{}""#, escape_attr(id)))
        .unwrap_or_default()
}

/// Handler for `<p>` elements.
pub struct ParagraphHandler;

impl ElementHandler for ParagraphHandler {
    fn handle<'a, 'input>(
        &self,
        node: Node<'a, 'input>,
        context: &mut RenderContext<'_>,
        recurse: &RecurseFn<'a, 'input>,
    ) -> RenderResult {
        let content = render_children(node, context, recurse);
        RenderResult::new(format!("<p{}>{content}</p>", id_attr(node)))
    }
}

/// Handler for `<figure>` elements.
///
/// The figure name, if any, is rendered as a caption below the content.
pub struct FigureHandler;

impl ElementHandler for FigureHandler {
    fn handle<'a, 'input>(
        &self,
        node: Node<'a, 'input>,
        context: &mut RenderContext<'_>,
        recurse: &RecurseFn<'a, 'input>,
    ) -> RenderResult {
        let mut html = format!(r#"<div{} class="figure">"#, id_attr(node));
        html.push_str(&render_elements(node, context, recurse));
        if let Some(name) = find_child(node, "name") {
            html.push_str(&format!(
                r#"<p class="FigureTitle" style="text-align:center;">{}</p>"#,
                escape_text(&text_content(name))
            ));
        }
        html.push_str("</div>");
        RenderResult::new(html)
    }
}

/// Handler for `<pre>` elements. Whitespace is kept verbatim.
pub struct PreHandler;

impl ElementHandler for PreHandler {
    fn handle<'a, 'input>(
        &self,
        node: Node<'a, 'input>,
        context: &mut RenderContext<'_>,
        recurse: &RecurseFn<'a, 'input>,
    ) -> RenderResult {
        RenderResult::new(format!(
            "<pre>{}</pre>",
            render_children(node, context, recurse)
        ))
    }
}

/// Handler for `<ul>` and `<ol>` elements.
pub struct ListHandler {
    kind: ListKind,
}

impl ListHandler {
    #[must_use]
    pub fn new(kind: ListKind) -> Self {
        Self { kind }
    }
}

impl ElementHandler for ListHandler {
    fn handle<'a, 'input>(
        &self,
        node: Node<'a, 'input>,
        context: &mut RenderContext<'_>,
        recurse: &RecurseFn<'a, 'input>,
    ) -> RenderResult {
        let tag = match self.kind {
            ListKind::Unordered => "ul",
            ListKind::Ordered => "ol",
        };
        context.lists.push(self.kind);
        let items = render_elements(node, context, recurse);
        context.lists.pop();
        RenderResult::new(format!("<{tag}{}>{items}</{tag}>", id_attr(node)))
    }
}

/// Handler for `<li>` elements.
///
/// In Word output each item carries the list style configured for its
/// list kind, at the current nesting depth.
pub struct ListItemHandler;

impl ElementHandler for ListItemHandler {
    fn handle<'a, 'input>(
        &self,
        node: Node<'a, 'input>,
        context: &mut RenderContext<'_>,
        recurse: &RecurseFn<'a, 'input>,
    ) -> RenderResult {
        let open = if context.is_word() {
            let style = match context.lists.last() {
                Some(ListKind::Ordered) => &context.ol_style,
                _ => &context.ul_style,
            };
            format!(
                r#"<li style="mso-list:{style} level{} lfo1;">"#,
                context.lists.len().max(1)
            )
        } else {
            "<li>".to_string()
        };
        let content = render_elements(node, context, recurse);
        RenderResult::new(format!("{open}{content}</li>"))
    }
}

/// Handler for `<dl>` elements.
pub struct DefinitionListHandler;

impl ElementHandler for DefinitionListHandler {
    fn handle<'a, 'input>(
        &self,
        node: Node<'a, 'input>,
        context: &mut RenderContext<'_>,
        recurse: &RecurseFn<'a, 'input>,
    ) -> RenderResult {
        let items = render_elements(node, context, recurse);
        RenderResult::new(format!("<dl{}>{items}</dl>", id_attr(node)))
    }
}

/// Handler for `<dt>` and `<dd>` elements.
///
/// The defined symbol is wrapped in a paragraph, the definition is not.
pub struct DefinitionItemHandler {
    tag: &'static str,
}

impl DefinitionItemHandler {
    #[must_use]
    pub fn term() -> Self {
        Self { tag: "dt" }
    }

    #[must_use]
    pub fn definition() -> Self {
        Self { tag: "dd" }
    }
}

impl ElementHandler for DefinitionItemHandler {
    fn handle<'a, 'input>(
        &self,
        node: Node<'a, 'input>,
        context: &mut RenderContext<'_>,
        recurse: &RecurseFn<'a, 'input>,
    ) -> RenderResult {
        let content = render_children(node, context, recurse);
        let html = if self.tag == "dt" {
            format!("<dt><p>{content}</p></dt>")
        } else {
            format!("<dd>{content}</dd>")
        };
        RenderResult::new(html)
    }
}

/// Handler for `<note>` elements.
///
/// The note label is inserted at the start of the first paragraph.
pub struct NoteHandler;

impl ElementHandler for NoteHandler {
    fn handle<'a, 'input>(
        &self,
        node: Node<'a, 'input>,
        context: &mut RenderContext<'_>,
        recurse: &RecurseFn<'a, 'input>,
    ) -> RenderResult {
        let label = format!(
            r#"<span class="note_label">{}</span>&#160; "#,
            escape_text(&context.labels.note)
        );
        let mut paragraphs = Vec::new();
        for (i, p) in find_children(node, "p").enumerate() {
            let content = render_children(p, context, recurse);
            let prefix = if i == 0 { label.as_str() } else { "" };
            paragraphs.push(format!("<p{}>{prefix}{content}</p>", id_attr(p)));
        }
        if paragraphs.is_empty() {
            paragraphs.push(format!("<p>{label}</p>"));
        }
        RenderResult::new(format!(
            r#"<div{} class="Note">{}</div>"#,
            id_attr(node),
            paragraphs.join("")
        ))
    }
}

/// Handler for `<term>` elements.
///
/// Renders the term number, the preferred term, admitted synonyms, then
/// the definition.
pub struct TermHandler;

impl ElementHandler for TermHandler {
    fn handle<'a, 'input>(
        &self,
        node: Node<'a, 'input>,
        context: &mut RenderContext<'_>,
        recurse: &RecurseFn<'a, 'input>,
    ) -> RenderResult {
        let number = node
            .attribute("id")
            .and_then(|id| context.numbers.get(id))
            .map(|n| format!("{n}."))
            .unwrap_or_default();
        let mut html = format!(r#"<p class="TermNum"{}>{number}</p>"#, id_attr(node));

        for child in node.children().filter(Node::is_element) {
            if has_tag(child, "preferred") {
                html.push_str(&format!(
                    r#"<p class="Terms" style="text-align:left;">{}</p>"#,
                    render_children(child, context, recurse)
                ));
            } else if has_tag(child, "admitted") {
                html.push_str(&format!(
                    r#"<p class="AltTerms" style="text-align:left;">{}</p>"#,
                    render_children(child, context, recurse)
                ));
            } else {
                html.push_str(&recurse(child, context).html);
            }
        }
        RenderResult::new(html)
    }
}

/// Handler for `<bibitem>` elements.
///
/// Entries of a normative reference list get class `NormRef`, all others
/// `Biblio`.
pub struct BibitemHandler;

impl ElementHandler for BibitemHandler {
    fn handle<'a, 'input>(
        &self,
        node: Node<'a, 'input>,
        _context: &mut RenderContext<'_>,
        _recurse: &RecurseFn<'a, 'input>,
    ) -> RenderResult {
        let normative = node
            .parent_element()
            .is_some_and(|p| has_tag(p, "references") && p.attribute("normative") == Some("true"));
        let class = if normative { "NormRef" } else { "Biblio" };

        let title = find_child(node, "title")
            .map(|t| format!("<i>{}</i>", escape_text(&text_content(t))))
            .unwrap_or_default();
        let content = match find_child(node, "docidentifier").map(text_content) {
            Some(docid) if !docid.is_empty() => format!("{}, {title}", escape_text(&docid)),
            _ => title,
        };
        RenderResult::new(format!(
            r#"<p{} class="{class}">{content}</p>"#,
            id_attr(node)
        ))
    }
}

/// Handler for containers that only group their children.
pub struct PassthroughHandler;

impl ElementHandler for PassthroughHandler {
    fn handle<'a, 'input>(
        &self,
        node: Node<'a, 'input>,
        context: &mut RenderContext<'_>,
        recurse: &RecurseFn<'a, 'input>,
    ) -> RenderResult {
        RenderResult::new(render_elements(node, context, recurse))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{create_render_registry, Flavor, RenderEngine};
    use crate::render::i18n::Labels;
    use crate::render::numbering::SectionNumbers;
    use pretty_assertions::assert_eq;

    fn render_with(xml: &str, flavor: Flavor, numbers: &SectionNumbers) -> String {
        let doc = roxmltree::Document::parse(xml).unwrap();
        let labels = Labels::default();
        let mut ctx = RenderContext::new(flavor, numbers, &labels);
        RenderEngine::new(create_render_registry())
            .render(doc.root_element(), &mut ctx)
            .unwrap()
            .html
    }

    fn render(xml: &str) -> String {
        render_with(xml, Flavor::Html, &SectionNumbers::default())
    }

    #[test]
    fn test_paragraph_with_inline() {
        assert_eq!(
            render(r#"<p id="a">x <em>y</em> &amp; z</p>"#),
            r#"<p id="a">x <i>y</i> &amp; z</p>"#
        );
    }

    #[test]
    fn test_figure_with_name() {
        assert_eq!(
            render(r#"<figure id="L"><name>Listing</name><pre>a &lt; b
  c</pre></figure>"#),
            "<div id=\"L\" class=\"figure\"><pre>a &lt; b\n  c</pre>\
<p class=\"FigureTitle\" style=\"text-align:center;\">Listing</p></div>"
        );
    }

    #[test]
    fn test_lists() {
        assert_eq!(
            render("<ul><li><p>a</p></li><li><p>b</p></li></ul>"),
            "<ul><li><p>a</p></li>\n<li><p>b</p></li></ul>"
        );
    }

    #[test]
    fn test_word_list_styles() {
        let html = render_with(
            "<ol><li><p>a</p><ul><li><p>b</p></li></ul></li></ol>",
            Flavor::Word,
            &SectionNumbers::default(),
        );
        assert!(html.contains(r#"<li style="mso-list:l2 level1 lfo1;">"#));
        assert!(html.contains(r#"<li style="mso-list:l3 level2 lfo1;">"#));
    }

    #[test]
    fn test_definition_list() {
        assert_eq!(
            render("<dl><dt>Symbol</dt><dd>Definition</dd></dl>"),
            "<dl><dt><p>Symbol</p></dt>\n<dd>Definition</dd></dl>"
        );
    }

    #[test]
    fn test_note() {
        assert_eq!(
            render(r#"<note id="n"><p>One</p><p>Two</p></note>"#),
            r#"<div id="n" class="Note"><p><span class="note_label">NOTE</span>&#160; One</p><p>Two</p></div>"#
        );
    }

    #[test]
    fn test_term_numbered() {
        let numbers = SectionNumbers::from_pairs([("t1", "3.1.1")]);
        let html = render_with(
            r#"<term id="t1"><preferred>Term2</preferred><admitted>Alt</admitted><definition><p>Def</p></definition></term>"#,
            Flavor::Html,
            &numbers,
        );
        assert_eq!(
            html,
            r#"<p class="TermNum" id="t1">3.1.1.</p><p class="Terms" style="text-align:left;">Term2</p><p class="AltTerms" style="text-align:left;">Alt</p><p>Def</p>"#
        );
    }

    #[test]
    fn test_bibitem_classes() {
        let html = render(
            r#"<references normative="true"><bibitem id="b"><title format="text/plain">SMTP</title><docidentifier>RFC 5321</docidentifier></bibitem></references>"#,
        );
        assert!(html.contains(r#"<p id="b" class="NormRef">RFC 5321, <i>SMTP</i></p>"#));

        let html = render(r#"<references><bibitem id="c"><title>Other</title></bibitem></references>"#);
        assert!(html.contains(r#"<p id="c" class="Biblio"><i>Other</i></p>"#));
    }
}
