//! Registry configuration for M3D documents.

use super::core::ElementRegistry;
use super::handlers::{
    AnnexHandler, BibitemHandler, DefinitionItemHandler, DefinitionListHandler, DivisionHandler,
    FigureHandler, ForewordHandler, IntroductionHandler, LinkHandler, ListHandler,
    ListItemHandler, NoteHandler, ParagraphHandler, PassthroughHandler, PreHandler, SpanHandler,
    StemHandler, TermHandler, WrapHandler,
};
use super::types::ListKind;

/// Create a render registry for M3D XML.
///
/// The same registry serves HTML and Word output; handlers check the
/// context flavor where the two differ.
#[must_use]
pub fn create_render_registry() -> ElementRegistry {
    let mut registry = ElementRegistry::new();

    // Inline handlers
    registry.register("em", WrapHandler::new("i"));
    registry.register("strong", WrapHandler::new("b"));
    registry.register("strike", WrapHandler::new("s"));
    registry.register("sup", WrapHandler::new("sup"));
    registry.register("sub", WrapHandler::new("sub"));
    registry.register("tt", WrapHandler::new("tt"));
    registry.register("keyword", SpanHandler::new(r#"class="keyword""#));
    registry.register("smallcap", SpanHandler::new(r#"style="font-variant:small-caps;""#));
    registry.register("stem", StemHandler);
    registry.register("link", LinkHandler);

    // Block handlers
    registry.register("p", ParagraphHandler);
    registry.register("figure", FigureHandler);
    registry.register("pre", PreHandler);
    registry.register("ul", ListHandler::new(ListKind::Unordered));
    registry.register("ol", ListHandler::new(ListKind::Ordered));
    registry.register("li", ListItemHandler);
    registry.register("dl", DefinitionListHandler);
    registry.register("dt", DefinitionItemHandler::term());
    registry.register("dd", DefinitionItemHandler::definition());
    registry.register("note", NoteHandler);
    registry.register("term", TermHandler);
    registry.register("bibitem", BibitemHandler);
    registry.register("definition", PassthroughHandler);

    // Section handlers
    registry.register("foreword", ForewordHandler);
    registry.register("introduction", IntroductionHandler);
    registry.register("clause", DivisionHandler);
    registry.register("terms", DivisionHandler);
    registry.register("definitions", DivisionHandler);
    registry.register("references", DivisionHandler);
    registry.register("annex", AnnexHandler);

    // Skip tags - rendered by their parent's handler or not rendered at all
    //   - bibdata: metadata, shown through document info placeholders
    //   - title, name: division headings and figure captions
    //   - preferred, admitted: term designations
    //   - docidentifier: bibliography entry identifiers
    registry.skip([
        "bibdata",
        "title",
        "name",
        "preferred",
        "admitted",
        "docidentifier",
    ]);

    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Flavor, RenderContext};
    use crate::render::i18n::Labels;
    use crate::render::numbering::SectionNumbers;

    #[test]
    fn test_create_render_registry() {
        let registry = create_render_registry();
        let doc = roxmltree::Document::parse(
            "<r><em/><keyword/><link/><p/><term/><annex/><bibdata/><title/></r>",
        )
        .unwrap();
        let numbers = SectionNumbers::default();
        let labels = Labels::default();
        let context = RenderContext::new(Flavor::Html, &numbers, &labels);

        for node in doc.root_element().children().filter(roxmltree::Node::is_element) {
            let tag = node.tag_name().name();
            let skipped = registry.should_skip(tag);
            assert_eq!(skipped, matches!(tag, "bibdata" | "title"), "{tag}");
            assert_eq!(registry.get_handler(node, &context).is_some(), !skipped, "{tag}");
        }
    }
}
