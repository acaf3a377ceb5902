//! XML utility functions for navigating and extracting data from DOM trees.

use roxmltree::Node;

/// Get the tag name without namespace prefix.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use m3d_converter::xml::get_tag_name;
///
/// let xml = r#"<m3d-standard xmlns="https://open.ribose.com/standards/m3d"><bibdata/></m3d-standard>"#;
/// let doc = Document::parse(xml).unwrap();
/// let bibdata = doc.root_element().first_element_child().unwrap();
/// assert_eq!(get_tag_name(bibdata), "bibdata");
/// ```
pub fn get_tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Find the first child element with the given tag name.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use m3d_converter::xml::find_child;
///
/// let xml = r#"<bibdata><title/><docidentifier/></bibdata>"#;
/// let doc = Document::parse(xml).unwrap();
/// let root = doc.root_element();
///
/// assert!(find_child(root, "title").is_some());
/// assert!(find_child(root, "missing").is_none());
/// ```
pub fn find_child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && get_tag_name(*child) == tag)
}

/// Find all child elements with the given tag name.
pub fn find_children<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |child| child.is_element() && get_tag_name(*child) == tag)
}

/// Find a descendant element matching a path of tag names.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use m3d_converter::xml::find_by_path;
///
/// let xml = r#"<bibdata><version><draft>3.4</draft></version></bibdata>"#;
/// let doc = Document::parse(xml).unwrap();
///
/// let draft = find_by_path(doc.root_element(), "version/draft");
/// assert_eq!(draft.and_then(|n| n.text()), Some("3.4"));
/// ```
pub fn find_by_path<'a, 'input>(node: Node<'a, 'input>, path: &str) -> Option<Node<'a, 'input>> {
    let mut current = node;

    for part in path.split('/') {
        current = find_child(current, part)?;
    }

    Some(current)
}

/// Get the concatenated text of a node and all its descendants, trimmed.
pub fn text_content(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Get the trimmed text at `path` below `node`, if present and non-empty.
pub fn text_at(node: Node<'_, '_>, path: &str) -> Option<String> {
    find_by_path(node, path)
        .map(text_content)
        .filter(|s| !s.is_empty())
}

/// Check if a node has a specific tag name.
pub fn has_tag(node: Node<'_, '_>, tag: &str) -> bool {
    node.is_element() && get_tag_name(node) == tag
}

/// Get all element children of a node.
///
/// Excludes text nodes, comments and processing instructions.
pub fn element_children<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|child| child.is_element())
}

/// Find the nearest ancestor element with the given tag name.
pub fn find_ancestor<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.ancestors().skip(1).find(|a| has_tag(*a, tag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    #[test]
    fn test_get_tag_name_with_namespace() {
        let xml = r#"<ns:root xmlns:ns="http://example.com"><ns:child/></ns:root>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(get_tag_name(doc.root_element()), "root");
    }

    #[test]
    fn test_find_children() {
        let xml = r#"<root><item>1</item><other/><item>2</item></root>"#;
        let doc = Document::parse(xml).unwrap();
        let items: Vec<_> = find_children(doc.root_element(), "item").collect();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_find_by_path_missing() {
        let xml = r#"<root><level1><target>found</target></level1></root>"#;
        let doc = Document::parse(xml).unwrap();
        let root = doc.root_element();

        assert_eq!(text_at(root, "level1/target").as_deref(), Some("found"));
        assert!(find_by_path(root, "missing/path").is_none());
    }

    #[test]
    fn test_text_content_is_deep() {
        let xml = r#"<p> Hello <em>big</em> world </p>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(text_content(doc.root_element()), "Hello big world");
    }

    #[test]
    fn test_text_at() {
        let xml = r#"<bibdata><status><stage>working-draft</stage></status><edition> </edition></bibdata>"#;
        let doc = Document::parse(xml).unwrap();
        let root = doc.root_element();
        assert_eq!(text_at(root, "status/stage").as_deref(), Some("working-draft"));
        assert_eq!(text_at(root, "edition"), None);
    }

    #[test]
    fn test_element_children() {
        let xml = r#"<root>text<child1/>more<child2/></root>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(element_children(doc.root_element()).count(), 2);
    }

    #[test]
    fn test_find_ancestor() {
        let xml = r#"<annex><clause><clause id="x"/></clause></annex>"#;
        let doc = Document::parse(xml).unwrap();
        let inner = doc
            .descendants()
            .find(|n| n.attribute("id") == Some("x"))
            .unwrap();
        assert!(find_ancestor(inner, "annex").is_some());
        assert!(find_ancestor(inner, "sections").is_none());
        assert!(has_tag(inner, "clause"));
    }
}
