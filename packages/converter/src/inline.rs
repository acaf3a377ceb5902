//! Inline markup transcoder.
//!
//! Maps quoted spans and links from the input tree to their XML elements.
//! The mapping is closed: anything unrecognized passes through as escaped
//! text, so transcoding never fails.

use crate::document::{Inline, LinkSpan, QuotedKind, QuotedSpan};
use crate::xml::XmlBuilder;

/// Element name for a span role, when the role is recognized.
fn role_element(role: &str) -> Option<&'static str> {
    match role {
        "strike" => Some("strike"),
        "smallcap" => Some("smallcap"),
        "keyword" => Some("keyword"),
        _ => None,
    }
}

/// Transcode one quoted span.
///
/// The quote kind decides the element; only spans without a recognized
/// kind fall back to their role.
pub fn transcode_quoted(span: &QuotedSpan) -> String {
    let mut xml = XmlBuilder::new();
    let text = span.text.as_str();

    match span.kind {
        QuotedKind::Emphasis => xml.element("em", &[], text),
        QuotedKind::Strong => xml.element("strong", &[], text),
        QuotedKind::Monospaced => xml.element("tt", &[], text),
        QuotedKind::Double => xml.text(&format!("\"{text}\"")),
        QuotedKind::Single => xml.text(&format!("'{text}'")),
        QuotedKind::Superscript => xml.element("sup", &[], text),
        QuotedKind::Subscript => xml.element("sub", &[], text),
        QuotedKind::Asciimath => xml.element("stem", &[("type", "AsciiMath")], text),
        QuotedKind::Unquoted => match span.role.as_deref().and_then(role_element) {
            Some(name) => xml.element(name, &[], text),
            None => xml.text(text),
        },
    };

    xml.finish()
}

/// Transcode a hyperlink.
pub fn transcode_link(link: &LinkSpan) -> String {
    let mut xml = XmlBuilder::new();
    let attrs = [("target", link.target.as_str())];
    match link.text.as_deref().filter(|t| !t.is_empty()) {
        Some(text) => xml.element("link", &attrs, text),
        None => xml.empty("link", &attrs),
    };
    xml.finish()
}

/// Transcode one inline node.
pub fn transcode(inline: &Inline) -> String {
    match inline {
        Inline::Text(text) => crate::xml::escape_text(text),
        Inline::Quoted(span) => transcode_quoted(span),
        Inline::Link(link) => transcode_link(link),
    }
}

/// Transcode a run of inline content.
pub fn transcode_all(content: &[Inline]) -> String {
    content.iter().map(transcode).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(kind: QuotedKind, text: &str, role: Option<&str>) -> String {
        transcode_quoted(&QuotedSpan {
            kind,
            text: text.to_string(),
            role: role.map(String::from),
        })
    }

    #[test]
    fn test_element_kinds() {
        assert_eq!(span(QuotedKind::Emphasis, "x", None), "<em>x</em>");
        assert_eq!(span(QuotedKind::Strong, "x", None), "<strong>x</strong>");
        assert_eq!(span(QuotedKind::Monospaced, "x", None), "<tt>x</tt>");
        assert_eq!(span(QuotedKind::Superscript, "2", None), "<sup>2</sup>");
        assert_eq!(span(QuotedKind::Subscript, "2", None), "<sub>2</sub>");
    }

    #[test]
    fn test_quote_kinds_wrap_in_quotes() {
        assert_eq!(span(QuotedKind::Double, "hi", None), "\"hi\"");
        assert_eq!(span(QuotedKind::Single, "hi", None), "'hi'");
    }

    #[test]
    fn test_asciimath_becomes_stem() {
        assert_eq!(
            span(QuotedKind::Asciimath, "x < y", None),
            r#"<stem type="AsciiMath">x &lt; y</stem>"#
        );
    }

    #[test]
    fn test_roles() {
        assert_eq!(span(QuotedKind::Unquoted, "a", Some("strike")), "<strike>a</strike>");
        assert_eq!(span(QuotedKind::Unquoted, "a", Some("smallcap")), "<smallcap>a</smallcap>");
        assert_eq!(span(QuotedKind::Unquoted, "a", Some("keyword")), "<keyword>a</keyword>");
    }

    #[test]
    fn test_unknown_role_is_plain_text() {
        assert_eq!(span(QuotedKind::Unquoted, "A & B", Some("highlight")), "A &amp; B");
        assert_eq!(span(QuotedKind::Unquoted, "plain", None), "plain");
    }

    #[test]
    fn test_kind_wins_over_role() {
        assert_eq!(span(QuotedKind::Strong, "x", Some("keyword")), "<strong>x</strong>");
    }

    #[test]
    fn test_links() {
        let with_text = LinkSpan {
            target: "http://www.m3aawg.org".to_string(),
            text: Some("M3AAWG".to_string()),
        };
        assert_eq!(
            transcode_link(&with_text),
            r#"<link target="http://www.m3aawg.org">M3AAWG</link>"#
        );

        let bare = LinkSpan {
            target: "http://a.b/?x=1&y=2".to_string(),
            text: None,
        };
        assert_eq!(transcode_link(&bare), r#"<link target="http://a.b/?x=1&amp;y=2"/>"#);
    }

    #[test]
    fn test_transcode_all() {
        let content = vec![
            Inline::Text("See ".to_string()),
            Inline::Quoted(QuotedSpan {
                kind: QuotedKind::Emphasis,
                text: "this".to_string(),
                role: None,
            }),
            Inline::Text(" now".to_string()),
        ];
        assert_eq!(transcode_all(&content), "See <em>this</em> now");
    }
}
