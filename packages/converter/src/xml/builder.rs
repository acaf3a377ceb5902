//! String builder for XML fragments.

/// Escape character data.
///
/// Quotes are left alone so that quoted inline spans survive as written.
pub fn escape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape an attribute value for use inside double quotes.
pub fn escape_attr(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}

/// Append-only XML writer.
///
/// Produces compact markup; indentation is applied once the assembled
/// document has been parsed. Callers are responsible for balancing
/// [`open`](Self::open) and [`close`](Self::close).
#[derive(Debug, Default)]
pub struct XmlBuilder {
    buf: String,
}

impl XmlBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn start_tag(&mut self, name: &str, attrs: &[(&str, &str)]) {
        self.buf.push('<');
        self.buf.push_str(name);
        for (key, value) in attrs {
            self.buf.push(' ');
            self.buf.push_str(key);
            self.buf.push_str("=\"");
            self.buf.push_str(&escape_attr(value));
            self.buf.push('"');
        }
    }

    /// Write a start tag.
    pub fn open(&mut self, name: &str, attrs: &[(&str, &str)]) -> &mut Self {
        self.start_tag(name, attrs);
        self.buf.push('>');
        self
    }

    /// Write an end tag.
    pub fn close(&mut self, name: &str) -> &mut Self {
        self.buf.push_str("</");
        self.buf.push_str(name);
        self.buf.push('>');
        self
    }

    /// Write a self-closing element.
    pub fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> &mut Self {
        self.start_tag(name, attrs);
        self.buf.push_str("/>");
        self
    }

    /// Write an element holding escaped text.
    pub fn element(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> &mut Self {
        self.open(name, attrs).text(text).close(name)
    }

    /// Write escaped character data.
    pub fn text(&mut self, text: &str) -> &mut Self {
        self.buf.push_str(&escape_text(text));
        self
    }

    /// Write escaped character data with line breaks as `&#10;`.
    ///
    /// Keeps blank lines and trailing spaces through the line-based text
    /// cleanup of the assembled document.
    pub fn preformatted(&mut self, text: &str) -> &mut Self {
        self.buf.push_str(&escape_text(text).replace('\n', "&#10;"));
        self
    }

    /// Write markup that is already well-formed.
    pub fn raw(&mut self, markup: &str) -> &mut Self {
        self.buf.push_str(markup);
        self
    }

    /// Write a newline.
    pub fn newline(&mut self) -> &mut Self {
        self.buf.push('\n');
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[must_use]
    pub fn finish(self) -> String {
        self.buf
    }
}
