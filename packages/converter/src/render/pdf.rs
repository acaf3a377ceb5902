//! PDF renderer.
//!
//! Page layout belongs to an XSL-FO processor. This module only hands it
//! the XML, the `m3d.report.xsl` stylesheet and the target path.

use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::{OutputFormat, RenderJob, Renderer, HTML_LOGO_BYTES, WORD_LOGO_BYTES};
use crate::config::{HTML_LOGO, PDF_STYLESHEET, WORD_LOGO};
use crate::error::{ConverterError, Result};

/// Turns XML plus an XSL-FO stylesheet into a PDF.
pub trait FoProcessor {
    /// Write `pdf` from `xml` transformed by `stylesheet`.
    fn process(&self, xml: &Path, stylesheet: &Path, pdf: &Path) -> Result<()>;
}

/// Runs an external XSL-FO command line tool.
///
/// Invoked as `<program> -xml <xml> -xsl <stylesheet> -pdf <pdf>`, the
/// Apache FOP calling convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFoProcessor {
    pub program: String,

    /// Directory holding the stylesheets; the working directory if unset.
    pub xsl_dir: Option<PathBuf>,
}

impl CommandFoProcessor {
    /// Create a processor for `program`.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            xsl_dir: None,
        }
    }

    /// Configure from the environment.
    ///
    /// - `M3D_FO_PROCESSOR`: program to run (default `fop`)
    /// - `M3D_XSL_DIR`: directory containing `m3d.report.xsl`
    #[must_use]
    pub fn from_env() -> Self {
        let program = env::var("M3D_FO_PROCESSOR")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| "fop".into());
        let xsl_dir = env::var("M3D_XSL_DIR")
            .ok()
            .filter(|d| !d.trim().is_empty())
            .map(PathBuf::from);
        Self { program, xsl_dir }
    }

    /// Path of the report stylesheet.
    #[must_use]
    pub fn stylesheet(&self) -> PathBuf {
        match &self.xsl_dir {
            Some(dir) => dir.join(PDF_STYLESHEET),
            None => PathBuf::from(PDF_STYLESHEET),
        }
    }
}

impl FoProcessor for CommandFoProcessor {
    fn process(&self, xml: &Path, stylesheet: &Path, pdf: &Path) -> Result<()> {
        let args: [&OsStr; 6] = [
            OsStr::new("-xml"),
            xml.as_os_str(),
            OsStr::new("-xsl"),
            stylesheet.as_os_str(),
            OsStr::new("-pdf"),
            pdf.as_os_str(),
        ];
        tracing::debug!(program = %self.program, args = ?args, "running XSL-FO processor");

        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|e| ConverterError::ExternalTool {
                program: self.program.clone(),
                message: format!("failed to execute: {e}"),
                stderr: String::new(),
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            return Err(ConverterError::ExternalTool {
                program: self.program.clone(),
                message: format!("exit code {:?}", output.status.code()),
                stderr,
            });
        }

        if !stderr.is_empty() {
            tracing::debug!(stderr = %stderr, "XSL-FO processor stderr (non-fatal)");
        }

        Ok(())
    }
}

/// Writes `<basename>.pdf` through an [`FoProcessor`].
pub struct PdfRenderer {
    processor: Box<dyn FoProcessor>,
    stylesheet: PathBuf,
}

impl PdfRenderer {
    /// Renderer using `processor` with the given stylesheet.
    #[must_use]
    pub fn new(processor: Box<dyn FoProcessor>, stylesheet: PathBuf) -> Self {
        Self {
            processor,
            stylesheet,
        }
    }

    /// Renderer running the command configured in the environment.
    #[must_use]
    pub fn from_env() -> Self {
        let processor = CommandFoProcessor::from_env();
        let stylesheet = processor.stylesheet();
        Self::new(Box::new(processor), stylesheet)
    }
}

impl Renderer for PdfRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Pdf
    }

    fn render(&self, job: &mut RenderJob<'_>) -> Result<PathBuf> {
        // The stylesheet loads the logos from next to the XML.
        job.temp.write(&job.out_dir.join(WORD_LOGO), WORD_LOGO_BYTES)?;
        job.temp.write(&job.out_dir.join(HTML_LOGO), HTML_LOGO_BYTES)?;

        let path = job.output_path(OutputFormat::Pdf);
        self.processor.process(job.xml_path, &self.stylesheet, &path)?;
        tracing::info!(path = %path.display(), "wrote PDF");
        Ok(path)
    }
}
