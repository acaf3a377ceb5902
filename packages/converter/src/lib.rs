//! M3D converter - Render M3AAWG technical standards.
//!
//! This crate takes a parsed document tree (serialized as YAML), builds
//! M3D XML from it, checks that XML, and renders HTML, Word and PDF.
//!
//! # Example
//!
//! ```
//! use m3d_converter::{convert, ConvertOptions, Document};
//!
//! let document = Document::from_yaml_str("attributes:\n  title: Spam Filtering\n").unwrap();
//! let options = ConvertOptions {
//!     current_year: Some(2024),
//!     ..ConvertOptions::default()
//! };
//! let conversion = convert(&document, &options).unwrap();
//! assert!(conversion.xml.contains(">Spam Filtering</title>"));
//! assert!(conversion.outputs.is_empty());
//! ```
//!
//! # Architecture
//!
//! The converter is organized into several modules:
//!
//! - [`document`]: Input document tree
//! - [`config`]: Configuration constants and front-matter resolution
//! - [`metadata`]: Bibliographic metadata fragment
//! - [`body`]: Body fragment builder
//! - [`inline`]: Inline markup transcoder
//! - [`assemble`]: Assembly, cleanup and validation
//! - [`schema`]: RELAX NG validator
//! - [`xml`]: XML utilities
//! - [`registry`]: Element handlers shared by the HTML and Word renderers
//! - [`render`]: Format renderers
//! - [`temp`]: Temporary file handle
//! - [`convert`]: Pipeline driver
//! - [`error`]: Error types and Result alias
//! - [`cli`]: Command-line interface

pub mod assemble;
pub mod body;
pub mod cli;
pub mod config;
pub mod convert;
pub mod document;
pub mod error;
pub mod inline;
pub mod metadata;
pub mod registry;
pub mod render;
pub mod schema;
pub mod temp;
pub mod xml;

// Re-export main functions
pub use convert::{convert, convert_with, validate_xml, Conversion, ConvertOptions};

// Re-export commonly used items
pub use document::Document;
pub use error::{ConverterError, Result};
pub use render::{DocumentInfo, OutputFormat, RenderOptions, Renderer};
