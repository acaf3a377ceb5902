//! Types for the element registry system.

use std::fmt;

use crate::render::i18n::Labels;
use crate::render::numbering::SectionNumbers;

/// Output flavor of a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    Html,
    Word,
}

/// Kind of the list currently being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Unordered,
    Ordered,
}

/// Result from rendering an element.
#[derive(Debug, Clone, Default)]
pub struct RenderResult {
    /// The rendered markup.
    pub html: String,
}

impl RenderResult {
    /// Create a new render result with markup.
    #[must_use]
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    /// Create an empty render result.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            html: String::new(),
        }
    }
}

/// Context passed through rendering operations.
pub struct RenderContext<'a> {
    /// HTML or Word output.
    pub flavor: Flavor,

    /// Section numbers keyed by element id.
    pub numbers: &'a SectionNumbers,

    /// Display labels.
    pub labels: &'a Labels,

    /// Heading level of the division being rendered, starting at 1.
    pub level: usize,

    /// Word list style for bulleted lists (`l3`).
    pub ul_style: String,

    /// Word list style for numbered lists (`l2`).
    pub ol_style: String,

    /// Enclosing lists, innermost last.
    pub lists: Vec<ListKind>,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context at heading level 1.
    #[must_use]
    pub fn new(flavor: Flavor, numbers: &'a SectionNumbers, labels: &'a Labels) -> Self {
        Self {
            flavor,
            numbers,
            labels,
            level: 1,
            ul_style: "l3".to_string(),
            ol_style: "l2".to_string(),
            lists: Vec::new(),
        }
    }

    /// Set the Word list styles.
    #[must_use]
    pub fn with_list_styles(mut self, ul_style: impl Into<String>, ol_style: impl Into<String>) -> Self {
        self.ul_style = ul_style.into();
        self.ol_style = ol_style.into();
        self
    }

    /// Whether this pass renders for Word.
    #[must_use]
    pub fn is_word(&self) -> bool {
        self.flavor == Flavor::Word
    }
}

impl fmt::Debug for RenderContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext")
            .field("flavor", &self.flavor)
            .field("level", &self.level)
            .field("ul_style", &self.ul_style)
            .field("ol_style", &self.ol_style)
            .field("lists", &self.lists)
            .finish_non_exhaustive()
    }
}
