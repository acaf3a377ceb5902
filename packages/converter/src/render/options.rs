//! Renderer options and their resolution.
//!
//! Every option is resolved with the same precedence:
//!
//! 1. the value set explicitly on the document;
//! 2. the renderer default for the document's script (fonts only);
//! 3. the built-in constant or embedded asset.
//!
//! File options name files relative to the document's directory. A file
//! that was asked for but does not exist is an error; nothing falls back
//! silently to the embedded asset.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::i18n::Labels;
use crate::error::{ConverterError, Result};

/// Default HTML stylesheet.
const HTML_STYLESHEET: &str = include_str!("../../assets/htmlstyle.css");
/// Default HTML cover page.
const HTML_COVERPAGE: &str = include_str!("../../assets/html_m3d_titlepage.html");
/// Default HTML intro page.
const HTML_INTROPAGE: &str = include_str!("../../assets/html_m3d_intro.html");
/// Default Word stylesheet.
const WORD_STYLESHEET: &str = include_str!("../../assets/wordstyle.css");
/// Default Word cover page.
const WORD_COVERPAGE: &str = include_str!("../../assets/word_m3d_titlepage.html");
/// Default Word intro page.
const WORD_INTROPAGE: &str = include_str!("../../assets/word_m3d_intro.html");

/// Word list styles when none is configured.
const DEFAULT_UL_STYLE: &str = "l3";
const DEFAULT_OL_STYLE: &str = "l2";

#[allow(clippy::expect_used)]
static LIST_STYLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^l\d+$").expect("valid regex"));

/// Renderer options as set on the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RenderOptions {
    pub body_font: Option<String>,
    pub header_font: Option<String>,
    pub monospace_font: Option<String>,
    pub title_font: Option<String>,

    /// YAML file of label overrides.
    pub i18nyaml: Option<String>,

    pub scope: Option<String>,
    pub htmlstylesheet: Option<String>,
    pub htmlcoverpage: Option<String>,
    pub htmlintropage: Option<String>,

    /// HTML fragment appended to the HTML body.
    pub scripts: Option<String>,

    /// Scripts for the PDF pipeline. Checked for existence only: the
    /// XSL-FO backend does not take them.
    pub scripts_pdf: Option<String>,

    pub wordstylesheet: Option<String>,
    pub standardstylesheet: Option<String>,

    /// HTML fragment holding Word page headers and footers.
    pub header: Option<String>,

    pub wordcoverpage: Option<String>,
    pub wordintropage: Option<String>,
    pub ulstyle: Option<String>,
    pub olstyle: Option<String>,
}

/// Font families, as CSS `font-family` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fonts {
    pub body: String,
    pub header: String,
    pub monospace: String,
    pub title: String,
}

impl Fonts {
    /// Resolve fonts for a script, explicit options first.
    #[must_use]
    pub fn resolve(options: &RenderOptions, script: &str) -> Self {
        let (body, header) = if script == "Hans" {
            (r#""SimSun",serif"#, r#""SimHei",sans-serif"#)
        } else {
            (r#""Overpass",sans-serif"#, r#""Overpass",sans-serif"#)
        };
        let header = options.header_font.clone().unwrap_or_else(|| header.to_string());
        Self {
            body: options.body_font.clone().unwrap_or_else(|| body.to_string()),
            monospace: options
                .monospace_font
                .clone()
                .unwrap_or_else(|| r#""Space Mono",monospace"#.to_string()),
            title: options.title_font.clone().unwrap_or_else(|| header.clone()),
            header,
        }
    }

    /// Substitute `$bodyfont`, `$headerfont`, `$monospacefont` and
    /// `$titlefont` in a stylesheet.
    #[must_use]
    pub fn apply(&self, css: &str) -> String {
        css.replace("$bodyfont", &self.body)
            .replace("$headerfont", &self.header)
            .replace("$monospacefont", &self.monospace)
            .replace("$titlefont", &self.title)
    }
}

/// Options with every default applied and every file read.
#[derive(Debug, Clone)]
pub struct ResolvedOptions {
    pub fonts: Fonts,
    pub labels: Labels,
    pub scope: Option<String>,

    /// HTML stylesheet with fonts substituted.
    pub html_stylesheet: String,
    pub html_coverpage: String,
    pub html_intropage: String,
    pub scripts: String,

    /// Word stylesheet followed by the standard stylesheet, fonts substituted.
    pub word_stylesheet: String,
    pub header: String,
    pub word_coverpage: String,
    pub word_intropage: String,
    pub ul_style: String,
    pub ol_style: String,

    /// Values that were replaced by a default.
    pub warnings: Vec<String>,
}

/// Reads file options relative to a base directory.
struct AssetLoader<'a> {
    base_dir: &'a Path,
}

impl AssetLoader<'_> {
    fn path(&self, option: &str, value: &str) -> Result<PathBuf> {
        let path = self.base_dir.join(value);
        if path.is_file() {
            Ok(path)
        } else {
            Err(ConverterError::MissingAsset {
                option: option.to_string(),
                path,
            })
        }
    }

    /// Content of the configured file, or `default` if none is configured.
    fn read(&self, option: &str, value: Option<&String>, default: &str) -> Result<String> {
        match value {
            Some(value) => {
                let path = self.path(option, value)?;
                tracing::debug!(option, path = %path.display(), "reading asset");
                Ok(std::fs::read_to_string(path)?)
            }
            None => Ok(default.to_string()),
        }
    }
}

/// The configured list style, or `default` with a warning if it is not of
/// the form `l<n>`.
fn list_style(
    option: &str,
    value: Option<&String>,
    default: &str,
    warnings: &mut Vec<String>,
) -> String {
    match value {
        Some(value) if LIST_STYLE.is_match(value) => value.clone(),
        Some(value) => {
            let warning =
                format!("Invalid value '{value}' for option '{option}', using '{default}'");
            tracing::debug!("{warning}");
            warnings.push(warning);
            default.to_string()
        }
        None => default.to_string(),
    }
}

impl ResolvedOptions {
    /// Resolve options for a document written in `script`, with file
    /// options relative to `base_dir`.
    ///
    /// # Errors
    /// - [`ConverterError::MissingAsset`] if a configured file does not exist
    /// - [`ConverterError::Yaml`] if the label file cannot be parsed
    pub fn resolve(options: &RenderOptions, script: &str, base_dir: &Path) -> Result<Self> {
        let loader = AssetLoader { base_dir };
        let fonts = Fonts::resolve(options, script);
        let mut warnings = Vec::new();
        let ul_style = list_style(
            "ulstyle",
            options.ulstyle.as_ref(),
            DEFAULT_UL_STYLE,
            &mut warnings,
        );
        let ol_style = list_style(
            "olstyle",
            options.olstyle.as_ref(),
            DEFAULT_OL_STYLE,
            &mut warnings,
        );

        let labels = match &options.i18nyaml {
            Some(value) => Labels::load(&loader.path("i18nyaml", value)?)?,
            None => Labels::default(),
        };

        if let Some(value) = &options.scripts_pdf {
            loader.path("scripts-pdf", value)?;
        }

        let html_stylesheet = fonts.apply(&loader.read(
            "htmlstylesheet",
            options.htmlstylesheet.as_ref(),
            HTML_STYLESHEET,
        )?);
        let mut word_stylesheet = loader.read(
            "wordstylesheet",
            options.wordstylesheet.as_ref(),
            WORD_STYLESHEET,
        )?;
        let standard = loader.read("standardstylesheet", options.standardstylesheet.as_ref(), "")?;
        if !standard.is_empty() {
            word_stylesheet.push('\n');
            word_stylesheet.push_str(&standard);
        }

        Ok(Self {
            labels,
            scope: options.scope.clone(),
            html_stylesheet,
            html_coverpage: loader.read(
                "htmlcoverpage",
                options.htmlcoverpage.as_ref(),
                HTML_COVERPAGE,
            )?,
            html_intropage: loader.read(
                "htmlintropage",
                options.htmlintropage.as_ref(),
                HTML_INTROPAGE,
            )?,
            scripts: loader.read("scripts", options.scripts.as_ref(), "")?,
            word_stylesheet: fonts.apply(&word_stylesheet),
            header: loader.read("header", options.header.as_ref(), "")?,
            word_coverpage: loader.read(
                "wordcoverpage",
                options.wordcoverpage.as_ref(),
                WORD_COVERPAGE,
            )?,
            word_intropage: loader.read(
                "wordintropage",
                options.wordintropage.as_ref(),
                WORD_INTROPAGE,
            )?,
            ul_style,
            ol_style,
            fonts,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_fonts_latin() {
        let fonts = Fonts::resolve(&RenderOptions::default(), "Latn");
        assert_eq!(fonts.body, r#""Overpass",sans-serif"#);
        assert_eq!(fonts.header, r#""Overpass",sans-serif"#);
        assert_eq!(fonts.monospace, r#""Space Mono",monospace"#);
        assert_eq!(fonts.title, fonts.header);
    }

    #[test]
    fn test_default_fonts_simplified_chinese() {
        let fonts = Fonts::resolve(&RenderOptions::default(), "Hans");
        assert_eq!(fonts.body, r#""SimSun",serif"#);
        assert_eq!(fonts.header, r#""SimHei",sans-serif"#);
    }

    #[test]
    fn test_explicit_fonts_win() {
        let options = RenderOptions {
            body_font: Some("Arial".to_string()),
            header_font: Some("Helvetica".to_string()),
            ..RenderOptions::default()
        };
        let fonts = Fonts::resolve(&options, "Hans");
        assert_eq!(fonts.body, "Arial");
        assert_eq!(fonts.header, "Helvetica");
        assert_eq!(fonts.title, "Helvetica");
    }

    #[test]
    fn test_apply_fonts() {
        let fonts = Fonts::resolve(&RenderOptions::default(), "Latn");
        assert_eq!(
            fonts.apply("p { font-family: $bodyfont; } pre { font-family: $monospacefont; }"),
            r#"p { font-family: "Overpass",sans-serif; } pre { font-family: "Space Mono",monospace; }"#
        );
    }

    #[test]
    fn test_resolve_defaults_use_embedded_assets() {
        let dir = TempDir::new().unwrap();
        let resolved = ResolvedOptions::resolve(&RenderOptions::default(), "Latn", dir.path()).unwrap();
        assert!(resolved.html_coverpage.contains("{{ doctitle }}"));
        assert!(!resolved.html_stylesheet.contains("$bodyfont"));
        assert_eq!(resolved.ul_style, "l3");
        assert_eq!(resolved.ol_style, "l2");
        assert_eq!(resolved.labels, Labels::default());
        assert!(resolved.scripts.is_empty());
    }

    #[test]
    fn test_resolve_explicit_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("cover.html"), "<div>custom</div>").unwrap();
        std::fs::write(dir.path().join("labels.yaml"), "foreword: Avant-propos\n").unwrap();
        let options = RenderOptions {
            htmlcoverpage: Some("cover.html".to_string()),
            i18nyaml: Some("labels.yaml".to_string()),
            ..RenderOptions::default()
        };
        let resolved = ResolvedOptions::resolve(&options, "Latn", dir.path()).unwrap();
        assert_eq!(resolved.html_coverpage, "<div>custom</div>");
        assert_eq!(resolved.labels.foreword, "Avant-propos");
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let options = RenderOptions {
            wordcoverpage: Some("nope.html".to_string()),
            ..RenderOptions::default()
        };
        let err = ResolvedOptions::resolve(&options, "Latn", dir.path()).unwrap_err();
        assert!(matches!(
            err,
            ConverterError::MissingAsset { ref option, .. } if option == "wordcoverpage"
        ));
    }

    #[test]
    fn test_invalid_list_style_falls_back_with_warning() {
        let dir = TempDir::new().unwrap();
        let options = RenderOptions {
            ulstyle: Some("disc".to_string()),
            olstyle: Some("l7".to_string()),
            ..RenderOptions::default()
        };
        let resolved = ResolvedOptions::resolve(&options, "Latn", dir.path()).unwrap();
        assert_eq!(resolved.ul_style, "l3");
        assert_eq!(resolved.ol_style, "l7");
        assert_eq!(
            resolved.warnings,
            vec!["Invalid value 'disc' for option 'ulstyle', using 'l3'"]
        );
    }
}
