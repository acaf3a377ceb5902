//! HTML renderer.

use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use roxmltree::Node;

use super::info::DocumentInfo;
use super::numbering::{main_body_order, SectionNumbers};
use super::options::ResolvedOptions;
use super::template::substitute;
use super::{placeholder_values, OutputFormat, RenderJob, Renderer, COLOPHON, HTML_LOGO_BYTES};
use crate::error::Result;
use crate::registry::handlers::is_normative_references;
use crate::registry::{create_render_registry, Flavor, RenderContext, RenderEngine};
use crate::xml::{element_children, find_child, has_tag};

/// Scripts, fonts and icon sets loaded by every HTML rendering.
const HTML_HEAD: &str = r#"<title>{{ doctitle }}</title>
<script type="text/javascript" src="https://ajax.googleapis.com/ajax/libs/jquery/3.3.1/jquery.min.js"></script>

<!--TOC script import-->
<script type="text/javascript" src="https://cdn.rawgit.com/jgallen23/toc/0.3.2/dist/toc.min.js"></script>

<!--Google fonts-->
<link href="https://fonts.googleapis.com/css?family=Open+Sans:300,300i,400,400i,600,600i|Space+Mono:400,700" rel="stylesheet"/>
<link href="https://fonts.googleapis.com/css?family=Overpass:300,300i,600,900" rel="stylesheet"/>
<!--Font awesome import for the link icon-->
<link rel="stylesheet" href="https://use.fontawesome.com/releases/v5.0.8/css/solid.css" integrity="sha384-v2Tw72dyUXeU3y4aM2Y0tBJQkGfplr39mxZqlTBDUZAb9BGoC40+rdFCG0m10lXk" crossorigin="anonymous"/>
<link rel="stylesheet" href="https://use.fontawesome.com/releases/v5.0.8/css/fontawesome.css" integrity="sha384-q3jl8XQu1OpdLgGFvNRnPdj5VIlCvgsDQTQB6owSOHWlAurxul7f+JpUOVdAiJ5P" crossorigin="anonymous"/>
<style class="anchorjs"></style>
"#;

/// Rendered document body, split where HTML and Word lay it out differently.
#[derive(Debug, Default)]
pub(crate) struct Parts {
    /// Foreword and introduction.
    pub preface: String,

    /// Title line, numbered sections, annexes and bibliography.
    pub main: String,
}

/// Render the document body with the shared element handlers.
pub(crate) fn render_parts(
    root: Node<'_, '_>,
    flavor: Flavor,
    options: &ResolvedOptions,
) -> Result<Parts> {
    let numbers = SectionNumbers::compute(root);
    let engine = RenderEngine::new(create_render_registry());
    let mut ctx = RenderContext::new(flavor, &numbers, &options.labels)
        .with_list_styles(options.ul_style.as_str(), options.ol_style.as_str());

    let preface = match find_child(root, "preface") {
        Some(preface) => engine.render_all(element_children(preface), &mut ctx)?,
        None => String::new(),
    };

    let bibliography: Vec<_> = find_child(root, "bibliography")
        .map(|b| {
            element_children(b)
                .filter(|n| !is_normative_references(*n))
                .collect()
        })
        .unwrap_or_default();

    let mut main = vec![r#"<p class="zzSTDTitle1">{{ doctitle }}</p>"#.to_string()];
    main.push(engine.render_all(main_body_order(root), &mut ctx)?);
    main.push(engine.render_all(
        element_children(root).filter(|n| has_tag(*n, "annex")),
        &mut ctx,
    )?);
    main.push(engine.render_all(bibliography, &mut ctx)?);
    main.retain(|part| !part.is_empty());

    Ok(Parts {
        preface,
        main: main.join("\n"),
    })
}

/// Render a complete HTML document.
///
/// The organization logo is inlined as a data URI so the file stands alone.
///
/// # Errors
/// Returns an error if a top-level division has no handler.
pub fn render_html(
    root: Node<'_, '_>,
    info: &DocumentInfo,
    options: &ResolvedOptions,
) -> Result<String> {
    let parts = render_parts(root, Flavor::Html, options)?;

    let mut html = String::from(
        "<!DOCTYPE html>\n<html xmlns:epub=\"http://www.idpf.org/2007/ops\" lang=\"en\">\n<head>\n\
         <meta charset=\"UTF-8\"/>\n",
    );
    html.push_str(HTML_HEAD);
    html.push_str(&format!("<style>\n{}\n</style>\n", options.html_stylesheet));
    html.push_str("</head>\n");
    html.push_str(
        r##"<body lang="EN-US" link="blue" vlink="#954F72" xml:lang="EN-US" class="container">"##,
    );
    html.push('\n');
    html.push_str(&format!(
        "<div class=\"title-section\">\n{}\n</div>\n<br/>\n",
        options.html_coverpage
    ));
    html.push_str(&format!(
        "<div class=\"prefatory-section\">\n{}\n</div>\n<br/>\n",
        options.html_intropage
    ));
    html.push_str("<main class=\"main-section\">\n");
    if !parts.preface.is_empty() {
        html.push_str(&parts.preface);
        html.push('\n');
    }
    html.push_str(&parts.main);
    html.push_str("\n</main>\n");
    html.push_str(COLOPHON);
    html.push('\n');
    if !options.scripts.is_empty() {
        html.push_str(&options.scripts);
        html.push('\n');
    }
    html.push_str("</body>\n</html>\n");

    let mut values = placeholder_values(info);
    values.insert(
        "logo_html",
        format!("data:image/png;base64,{}", STANDARD.encode(HTML_LOGO_BYTES)),
    );
    Ok(substitute(&html, &values))
}

/// Writes `<basename>.html`.
#[derive(Debug, Default)]
pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Html
    }

    fn render(&self, job: &mut RenderJob<'_>) -> Result<PathBuf> {
        let doc = roxmltree::Document::parse(job.xml)?;
        let html = render_html(doc.root_element(), job.info, job.options)?;
        let path = job.output_path(OutputFormat::Html);
        std::fs::write(&path, html)?;
        tracing::info!(path = %path.display(), "wrote HTML");
        Ok(path)
    }
}
