//! Format renderers.
//!
//! Each renderer reads the assembled XML and writes one output file next
//! to it. HTML and Word share the element handlers in
//! [`crate::registry`]; PDF is delegated to an external XSL-FO processor.

pub mod html;
pub mod i18n;
pub mod info;
pub mod numbering;
pub mod options;
pub mod pdf;
pub mod template;
pub mod word;

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

pub use html::HtmlRenderer;
pub use info::DocumentInfo;
pub use options::{Fonts, RenderOptions, ResolvedOptions};
pub use pdf::{CommandFoProcessor, FoProcessor, PdfRenderer};
pub use word::WordRenderer;

use crate::error::Result;
use crate::temp::TempFiles;
use crate::xml::escape_text;

/// Organization logo shown on HTML cover pages.
pub(crate) const HTML_LOGO_BYTES: &[u8] = include_bytes!("../../assets/m3-logo.png");
/// Organization logo shown on Word cover pages.
pub(crate) const WORD_LOGO_BYTES: &[u8] = include_bytes!("../../assets/logo.jpg");

/// Colophon closing every HTML rendering.
pub(crate) const COLOPHON: &str = r#"<div class="colophon">
<p>As with all M3AAWG documents that we publish, please check the M3AAWG website
(<a href="http://www.m3aawg.org">www.m3aawg.org</a>) for updates to this paper.</p>
<p>&#169; {{ docyear }} copyright by the Messaging, Malware and Mobile Anti-Abuse Working Group (M3AAWG)</p>
</div>"#;

/// Output formats, in the order they are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Html,
    Word,
    Pdf,
}

impl OutputFormat {
    /// File extension of the output.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Word => "doc",
            Self::Pdf => "pdf",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Html => "HTML",
            Self::Word => "Word",
            Self::Pdf => "PDF",
        })
    }
}

/// Everything a renderer needs for one document.
pub struct RenderJob<'a> {
    /// The assembled, namespaced XML.
    pub xml: &'a str,

    /// Where that XML was written.
    pub xml_path: &'a Path,

    /// Directory receiving the output files.
    pub out_dir: &'a Path,

    /// Output file name without extension.
    pub basename: &'a str,

    pub info: &'a DocumentInfo,
    pub options: &'a ResolvedOptions,

    /// Files to remove once the run ends.
    pub temp: &'a mut TempFiles,
}

impl RenderJob<'_> {
    /// Path of the output file for `format`.
    #[must_use]
    pub fn output_path(&self, format: OutputFormat) -> PathBuf {
        self.out_dir
            .join(format!("{}.{}", self.basename, format.extension()))
    }
}

/// A renderer for one output format.
pub trait Renderer {
    /// The format this renderer produces.
    fn format(&self) -> OutputFormat;

    /// Render and write the output file.
    ///
    /// # Returns
    /// The path of the written file.
    fn render(&self, job: &mut RenderJob<'_>) -> Result<PathBuf>;
}

/// Placeholder values with markup escaped.
pub(crate) fn placeholder_values(info: &DocumentInfo) -> BTreeMap<&'static str, String> {
    info.to_map()
        .into_iter()
        .map(|(k, v)| (k, escape_text(&v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path() {
        let info = DocumentInfo::default();
        let options =
            ResolvedOptions::resolve(&RenderOptions::default(), "Latn", Path::new(".")).unwrap();
        let mut temp = TempFiles::new();
        let job = RenderJob {
            xml: "",
            xml_path: Path::new("out/test.xml"),
            out_dir: Path::new("out"),
            basename: "test",
            info: &info,
            options: &options,
            temp: &mut temp,
        };
        assert_eq!(job.output_path(OutputFormat::Word), PathBuf::from("out/test.doc"));
        assert_eq!(job.output_path(OutputFormat::Html), PathBuf::from("out/test.html"));
    }

    #[test]
    fn test_placeholder_values_are_escaped() {
        let info = DocumentInfo {
            doctitle: "A & B".to_string(),
            ..DocumentInfo::default()
        };
        assert_eq!(placeholder_values(&info)["doctitle"], "A &amp; B");
    }
}
