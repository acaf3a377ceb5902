//! Command-line interface for the converter.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use textwrap::{fill, Options};

use crate::convert::{convert, validate_xml, ConvertOptions};
use crate::document::Document;
use crate::error::{ConverterError, Result};
use crate::render::DocumentInfo;

/// Width at which warnings are wrapped.
const WARNING_WIDTH: usize = 100;

/// M3D converter - Render M3AAWG technical standards to XML, HTML, Word and PDF.
#[derive(Parser)]
#[command(name = "m3d-convert")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a document tree to XML, HTML and Word (and optionally PDF).
    Convert {
        /// Document tree as YAML
        input: PathBuf,

        /// Output directory (default: next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only build and check the XML, write nothing
        #[arg(long)]
        nodoc: bool,

        /// Also render PDF with the XSL-FO processor
        #[arg(long)]
        pdf: bool,
    },

    /// Check an M3D XML file against the content rules and the schema.
    Validate {
        /// M3D XML file
        file: PathBuf,
    },

    /// Print the document information derived from an M3D XML file.
    Info {
        /// M3D XML file
        file: PathBuf,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            output,
            nodoc,
            pdf,
        } => convert_command(&input, output, nodoc, pdf),
        Commands::Validate { file } => validate_command(&file),
        Commands::Info { file } => info_command(&file),
    }
}

/// Print warnings, one wrapped block each.
fn print_warnings(warnings: &[String]) {
    if warnings.is_empty() {
        return;
    }
    println!();
    println!("{}", style(format!("Warnings ({}):", warnings.len())).yellow().bold());
    let options = Options::new(WARNING_WIDTH)
        .initial_indent("  - ")
        .subsequent_indent("    ");
    for warning in warnings {
        println!("{}", fill(warning, &options));
    }
}

/// Execute the convert command.
fn convert_command(input: &Path, output: Option<PathBuf>, nodoc: bool, pdf: bool) -> Result<()> {
    if let Some(out_dir) = &output {
        if out_dir.exists() && !out_dir.is_dir() {
            return Err(ConverterError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Output path is not a directory: {}", out_dir.display()),
            )));
        }
    }

    println!("{} {}", style("Converting").bold(), style(input.display()).cyan());

    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message("Reading document tree...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let document = match Document::from_yaml_file(input) {
        Ok(document) => document,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };

    pb.set_message("Assembling and rendering...");
    let options = ConvertOptions {
        out_dir: output,
        nodoc,
        pdf,
        current_year: None,
    };
    let conversion = match convert(&document, &options) {
        Ok(conversion) => conversion,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };
    pb.finish_and_clear();

    if let Some(title) = &document.attributes.title {
        println!("  Title: {}", style(title).green());
    }
    if conversion.outputs.is_empty() {
        println!("  No files written");
    }
    for path in &conversion.outputs {
        println!("  {} {}", style("Wrote").green().bold(), path.display());
    }
    print_warnings(&conversion.warnings);

    Ok(())
}

/// Execute the validate command.
///
/// Findings never fail the command.
fn validate_command(file: &Path) -> Result<()> {
    let xml = std::fs::read_to_string(file)?;
    let warnings = validate_xml(&xml)?;

    if warnings.is_empty() {
        println!("{} {}", style("Valid:").green().bold(), file.display());
    } else {
        println!("{} {}", style("Checked:").bold(), file.display());
        print_warnings(&warnings);
    }
    Ok(())
}

/// Execute the info command.
fn info_command(file: &Path) -> Result<()> {
    let xml = std::fs::read_to_string(file)?;
    let info = DocumentInfo::from_xml_str(&xml)?;
    print!("{}", serde_yaml_ng::to_string(&info)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_convert() {
        let cli = Cli::parse_from(["m3d-convert", "convert", "doc.yaml"]);

        let Commands::Convert {
            input,
            output,
            nodoc,
            pdf,
        } = cli.command
        else {
            unreachable!("expected convert");
        };
        assert_eq!(input, PathBuf::from("doc.yaml"));
        assert!(output.is_none());
        assert!(!nodoc);
        assert!(!pdf);
    }

    #[test]
    fn test_cli_parse_convert_with_flags() {
        let cli = Cli::parse_from([
            "m3d-convert",
            "convert",
            "doc.yaml",
            "-o",
            "out",
            "--nodoc",
            "--pdf",
        ]);

        let Commands::Convert {
            output, nodoc, pdf, ..
        } = cli.command
        else {
            unreachable!("expected convert");
        };
        assert_eq!(output, Some(PathBuf::from("out")));
        assert!(nodoc);
        assert!(pdf);
    }

    #[test]
    fn test_cli_parse_info() {
        let cli = Cli::parse_from(["m3d-convert", "info", "doc.xml"]);
        assert!(matches!(cli.command, Commands::Info { file } if file == Path::new("doc.xml")));
    }
}
