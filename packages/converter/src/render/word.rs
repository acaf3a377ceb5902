//! Word renderer.
//!
//! Word opens MIME HTML ("single file web page") saved as `.doc`. The
//! package holds the HTML part followed by the logos as base64 parts, so
//! the document needs no files next to it.

use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use roxmltree::Node;
use sha2::{Digest, Sha256};

use super::html::render_parts;
use super::info::DocumentInfo;
use super::options::ResolvedOptions;
use super::template::substitute;
use super::{placeholder_values, OutputFormat, RenderJob, Renderer, HTML_LOGO_BYTES, WORD_LOGO_BYTES};
use crate::config::{HTML_LOGO, WORD_LOGO};
use crate::error::Result;
use crate::registry::Flavor;

/// Section break between the Word sections.
const SECTION_BREAK: &str =
    r#"<p class="MsoNormal"><br clear="all" class="section"/></p>"#;

/// Render the HTML part of the Word package.
///
/// The cover page goes in `WordSection1`, intro page and preface in
/// `WordSection2`, the numbered body in `WordSection3`.
///
/// # Errors
/// Returns an error if a top-level division has no handler.
pub fn render_word_html(
    root: Node<'_, '_>,
    info: &DocumentInfo,
    options: &ResolvedOptions,
) -> Result<String> {
    let parts = render_parts(root, Flavor::Word, options)?;

    let mut html = String::from(
        r#"<html xmlns:v="urn:schemas-microsoft-com:vml" xmlns:o="urn:schemas-microsoft-com:office:office" xmlns:w="urn:schemas-microsoft-com:office:word" xmlns:m="http://schemas.microsoft.com/office/2004/12/omml" lang="en">
<head>
<meta http-equiv="Content-Type" content="text/html; charset=utf-8"/>
<title>{{ doctitle }}</title>
<!--[if gte mso 9]><xml><w:WordDocument><w:View>Print</w:View><w:Zoom>100</w:Zoom><w:DoNotOptimizeForBrowser/></w:WordDocument></xml><![endif]-->
"#,
    );
    html.push_str(&format!("<style>\n{}\n</style>\n", options.word_stylesheet));
    html.push_str("</head>\n");
    html.push_str(r##"<body lang="EN-US" link="blue" vlink="#954F72">"##);
    html.push('\n');
    html.push_str(&format!(
        "<div class=\"WordSection1\">\n{}\n</div>\n{SECTION_BREAK}\n",
        options.word_coverpage
    ));
    html.push_str(&format!(
        "<div class=\"WordSection2\">\n{}\n{}\n</div>\n{SECTION_BREAK}\n",
        options.word_intropage, parts.preface
    ));
    html.push_str(&format!(
        "<div class=\"WordSection3\">\n{}\n</div>\n",
        parts.main
    ));
    html.push_str("</body>\n</html>\n");

    Ok(substitute(&html, &placeholder_values(info)))
}

/// Base64 with lines of at most 76 characters.
fn base64_lines(data: &[u8]) -> String {
    let encoded = STANDARD.encode(data);
    encoded
        .as_bytes()
        .chunks(76)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Base of the `Content-Location` of every part. Relative references in
/// the HTML part, such as `<img src="logo.jpg">`, resolve against it.
const PART_LOCATION: &str = "file:///C:/Doc/";

/// Package HTML and attachments as `multipart/related` MIME.
///
/// The boundary is derived from a SHA-256 of the HTML, so it cannot occur
/// in the HTML part and is stable for identical input.
#[must_use]
pub fn package_mime(basename: &str, html: &str, attachments: &[(&str, &str, &[u8])]) -> String {
    let digest = hex::encode(Sha256::digest(html.as_bytes()));
    let boundary = format!("----=_NextPart_{}", &digest[..32]);

    let mut out = format!(
        "MIME-Version: 1.0\nContent-Type: multipart/related; boundary=\"{boundary}\"\n\n"
    );
    out.push_str(&format!(
        "--{boundary}\nContent-ID: <{basename}.htm>\nContent-Location: {PART_LOCATION}{basename}.htm\n\
         Content-Disposition: inline; filename=\"{basename}.htm\"\n\
         Content-Type: text/html; charset=\"utf-8\"\n\n{html}\n\n"
    ));
    for (name, content_type, data) in attachments {
        out.push_str(&format!(
            "--{boundary}\nContent-ID: <{name}>\nContent-Location: {PART_LOCATION}{name}\n\
             Content-Disposition: inline; filename=\"{name}\"\n\
             Content-Transfer-Encoding: base64\nContent-Type: {content_type}\n\n{}\n\n",
            base64_lines(data),
        ));
    }
    out.push_str(&format!("--{boundary}--\n"));
    out
}

/// Writes `<basename>.doc`.
///
/// The logos are copied into the output directory first and tracked as
/// temporary files; the package is built from those copies. Logo files
/// already present there are used as they are.
#[derive(Debug, Default)]
pub struct WordRenderer;

impl Renderer for WordRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Word
    }

    fn render(&self, job: &mut RenderJob<'_>) -> Result<PathBuf> {
        let doc = roxmltree::Document::parse(job.xml)?;
        let html = render_word_html(doc.root_element(), job.info, job.options)?;

        let word_logo = job.out_dir.join(WORD_LOGO);
        let html_logo = job.out_dir.join(HTML_LOGO);
        job.temp.write(&word_logo, WORD_LOGO_BYTES)?;
        job.temp.write(&html_logo, HTML_LOGO_BYTES)?;
        let word_logo_bytes = std::fs::read(&word_logo)?;
        let html_logo_bytes = std::fs::read(&html_logo)?;

        let mut attachments: Vec<(&str, &str, &[u8])> = vec![
            (WORD_LOGO, "image/jpeg", word_logo_bytes.as_slice()),
            (HTML_LOGO, "image/png", html_logo_bytes.as_slice()),
        ];
        if !job.options.header.is_empty() {
            attachments.push(("header.html", "text/html", job.options.header.as_bytes()));
        }

        let package = package_mime(job.basename, &html, &attachments);
        let path = job.output_path(OutputFormat::Word);
        std::fs::write(&path, package)?;
        tracing::info!(path = %path.display(), "wrote Word document");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::options::RenderOptions;
    use std::path::Path;

    const DOC: &str = r#"<m3d-standard>
<bibdata type="report"><title>Main Title</title></bibdata>
<preface><foreword id="F"><p>Hi</p></foreword></preface>
<sections><clause id="S"><title>Scope</title><ul><li><p>a</p></li></ul></clause></sections>
</m3d-standard>"#;

    fn options() -> ResolvedOptions {
        let options = RenderOptions {
            ulstyle: Some("l7".to_string()),
            ..RenderOptions::default()
        };
        ResolvedOptions::resolve(&options, "Latn", Path::new(".")).unwrap()
    }

    #[test]
    fn test_word_sections() {
        let doc = roxmltree::Document::parse(DOC).unwrap();
        let info = DocumentInfo::from_xml(doc.root_element());
        let html = render_word_html(doc.root_element(), &info, &options()).unwrap();

        let s1 = html.find(r#"<div class="WordSection1">"#).unwrap();
        let s2 = html.find(r#"<div class="WordSection2">"#).unwrap();
        let s3 = html.find(r#"<div class="WordSection3">"#).unwrap();
        assert!(s1 < s2 && s2 < s3);

        let foreword = html.find("ForewordTitle").unwrap();
        assert!(s2 < foreword && foreword < s3);
        assert!(html.contains(r#"<h1>1.<span style="mso-tab-count:1">&#160; </span>Scope</h1>"#));
        assert!(html.contains(r#"<li style="mso-list:l7 level1 lfo1;">"#));
        assert!(html.contains("page-break-before:always"));
    }

    #[test]
    fn test_package_mime() {
        let package = package_mime("test", "<html/>", &[("logo.jpg", "image/jpeg", &b"abc"[..])]);
        let digest = hex::encode(Sha256::digest(b"<html/>"));
        let boundary = format!("----=_NextPart_{}", &digest[..32]);

        assert!(package.starts_with("MIME-Version: 1.0\n"));
        assert!(package.contains(&format!("boundary=\"{boundary}\"")));
        assert!(package.contains("Content-ID: <test.htm>"));
        assert!(package.contains("Content-Location: file:///C:/Doc/test.htm\n"));
        assert!(package.contains("Content-Location: file:///C:/Doc/logo.jpg\n"));
        assert!(package.contains("Content-Type: image/jpeg\n\nYWJj\n"));
        assert!(package.ends_with(&format!("--{boundary}--\n")));
    }

    #[test]
    fn test_base64_lines_wrap() {
        let lines = base64_lines(&[0u8; 120]);
        assert!(lines.lines().all(|l| l.len() <= 76));
        assert_eq!(lines.lines().count(), 3);
    }
}
