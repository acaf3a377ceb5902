//! Pipeline driver.
//!
//! Runs a document tree through the whole pipeline:
//!
//! ```text
//! front matter ─ resolve ─ build_bibdata ─┐
//!                                         ├─ assemble ─ <name>.xml ─ renderers
//! body ───────────────────── build_body ──┘
//! ```
//!
//! Output files are named after the source file and written next to it
//! unless an output directory is given.

use std::path::{Path, PathBuf};

use chrono::Datelike;

use crate::assemble::{assemble, parse, validate};
use crate::body::build_body;
use crate::config::resolve;
use crate::document::Document;
use crate::error::Result;
use crate::metadata::build_bibdata;
use crate::render::{
    DocumentInfo, HtmlRenderer, PdfRenderer, RenderJob, Renderer, ResolvedOptions,
    WordRenderer,
};
use crate::schema::Schema;
use crate::temp::TempFiles;

/// Per-run settings that do not come from the document.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Directory for output files; defaults to the source file's directory.
    pub out_dir: Option<PathBuf>,

    /// Produce the XML in memory only.
    pub nodoc: bool,

    /// Also render PDF through the XSL-FO processor.
    pub pdf: bool,

    /// Year used when the document sets no copyright year; the current
    /// year if unset.
    pub current_year: Option<i32>,
}

/// Result of a conversion.
#[derive(Debug, Clone, Default)]
pub struct Conversion {
    /// The assembled, namespaced XML.
    pub xml: String,

    /// Written files, XML first.
    pub outputs: Vec<PathBuf>,

    /// Every warning raised on the way, in pipeline order.
    pub warnings: Vec<String>,
}

/// Where output files go.
#[derive(Debug, Clone, PartialEq, Eq)]
struct OutputTarget {
    out_dir: PathBuf,
    basename: String,
    base_dir: PathBuf,
}

impl OutputTarget {
    /// Derive the target from the source file path.
    ///
    /// Returns `None` when the path has no file name to name outputs after.
    fn new(docfile: &str, out_dir: Option<&Path>) -> Option<Self> {
        let source = Path::new(docfile);
        let basename = source.file_stem()?.to_string_lossy().into_owned();
        let base_dir = match source.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Some(Self {
            out_dir: out_dir.map_or_else(|| base_dir.clone(), Path::to_path_buf),
            basename,
            base_dir,
        })
    }

    fn path(&self, extension: &str) -> PathBuf {
        self.out_dir.join(format!("{}.{extension}", self.basename))
    }
}

/// Renderers for a run, in output order.
#[must_use]
pub fn default_renderers(pdf: bool) -> Vec<Box<dyn Renderer>> {
    let mut renderers: Vec<Box<dyn Renderer>> =
        vec![Box::new(HtmlRenderer), Box::new(WordRenderer)];
    if pdf {
        renderers.push(Box::new(PdfRenderer::from_env()));
    }
    renderers
}

/// Convert a document with the default renderers.
///
/// # Errors
/// See [`convert_with`].
pub fn convert(document: &Document, options: &ConvertOptions) -> Result<Conversion> {
    convert_with(document, options, &default_renderers(options.pdf))
}

/// Convert a document, rendering with `renderers`.
///
/// Schema and content findings are warnings. Temporary files created by
/// the renderers are removed before this returns, on success and on error.
///
/// # Errors
/// Returns an error if the assembled XML is not well-formed, the grammar
/// does not compile, an explicitly configured asset is missing, a file
/// cannot be written or a renderer fails.
pub fn convert_with(
    document: &Document,
    options: &ConvertOptions,
    renderers: &[Box<dyn Renderer>],
) -> Result<Conversion> {
    let year = options
        .current_year
        .unwrap_or_else(|| chrono::Local::now().year());
    let (front, mut warnings) = resolve(&document.attributes, year);

    let bibdata = build_bibdata(&front);
    let body = build_body(document);
    tracing::debug!(
        bibdata = bibdata.len(),
        body = body.len(),
        "built document fragments"
    );

    let mut temp = TempFiles::new();
    let target = document
        .attributes
        .docfile
        .as_deref()
        .filter(|_| !options.nodoc && !document.attributes.nodoc)
        .and_then(|docfile| OutputTarget::new(docfile, options.out_dir.as_deref()));

    let mut conversion = emit(
        &bibdata,
        &body,
        document,
        &front.script.value,
        target.as_ref(),
        renderers,
        &mut temp,
    )?;
    warnings.append(&mut conversion.warnings);
    conversion.warnings = warnings;
    Ok(conversion)
}

/// Assemble the fragments and, with a target, write every output.
fn emit(
    bibdata: &str,
    body: &str,
    document: &Document,
    script: &str,
    target: Option<&OutputTarget>,
    renderers: &[Box<dyn Renderer>],
    temp: &mut TempFiles,
) -> Result<Conversion> {
    let schema = Schema::m3d()?;
    let assembled = assemble(bibdata, body, &schema)?;
    let xml = assembled.to_xml();

    let mut conversion = Conversion {
        xml,
        outputs: Vec::new(),
        warnings: assembled.warnings,
    };

    let Some(target) = target else {
        tracing::debug!("no output requested");
        return Ok(conversion);
    };

    let render = &document.attributes.render;
    let options = ResolvedOptions::resolve(render, script, &target.base_dir)?;
    conversion.warnings.extend(options.warnings.iter().cloned());

    std::fs::create_dir_all(&target.out_dir)?;
    let xml_path = target.path("xml");
    std::fs::write(&xml_path, &conversion.xml)?;
    tracing::info!(path = %xml_path.display(), "wrote XML");
    conversion.outputs.push(xml_path.clone());

    let info = DocumentInfo::from_xml_str(&conversion.xml)?.with_scope(options.scope.clone());

    for renderer in renderers {
        tracing::debug!(format = %renderer.format(), "rendering");
        let mut job = RenderJob {
            xml: &conversion.xml,
            xml_path: &xml_path,
            out_dir: &target.out_dir,
            basename: &target.basename,
            info: &info,
            options: &options,
            temp: &mut *temp,
        };
        let path = renderer.render(&mut job)?;
        conversion.outputs.push(path);
    }

    temp.release();
    Ok(conversion)
}

/// Run content checks and schema validation on existing XML.
///
/// # Errors
/// Returns an error if the text is not well-formed or the grammar does not
/// compile. Findings are returned, never raised.
pub fn validate_xml(xml: &str) -> Result<Vec<String>> {
    let root = parse(xml)?;
    let schema = Schema::m3d()?;
    Ok(validate(&root, &schema))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConverterError;
    use tempfile::TempDir;

    #[test]
    fn test_output_target_from_docfile() {
        let target = OutputTarget::new("docs/report.adoc", None).unwrap();
        assert_eq!(target.basename, "report");
        assert_eq!(target.out_dir, PathBuf::from("docs"));
        assert_eq!(target.path("xml"), PathBuf::from("docs/report.xml"));
    }

    #[test]
    fn test_output_target_bare_file_name() {
        let target = OutputTarget::new("report.adoc", Some(Path::new("out"))).unwrap();
        assert_eq!(target.base_dir, PathBuf::from("."));
        assert_eq!(target.path("doc"), PathBuf::from("out/report.doc"));
    }

    #[test]
    fn test_nodoc_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut document = Document::default();
        document.attributes.title = Some("T".to_string());
        document.attributes.docfile =
            Some(dir.path().join("t.adoc").to_string_lossy().into_owned());
        let options = ConvertOptions {
            nodoc: true,
            current_year: Some(2020),
            ..ConvertOptions::default()
        };

        let conversion = convert(&document, &options).unwrap();
        assert!(conversion.outputs.is_empty());
        assert!(conversion.xml.contains("<from>2020</from>"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_malformed_fragment_is_fatal() {
        let mut temp = TempFiles::new();
        let err = emit(
            "<bibdata/>",
            "<sections><p></sections>",
            &Document::default(),
            "Latn",
            None,
            &[],
            &mut temp,
        )
        .unwrap_err();
        assert!(matches!(err, ConverterError::MalformedXml { .. }));
    }

    #[test]
    fn test_validate_xml_reports_missing_title() {
        let warnings = validate_xml("<m3d-standard><bibdata type=\"report\"/></m3d-standard>")
            .unwrap();
        assert!(warnings.iter().any(|w| w == "Document has no title"));
    }
}
