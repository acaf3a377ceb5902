//! Element registry system for rendering M3D XML.
//!
//! This module provides a registry-based approach to rendering the
//! assembled document as HTML. Element handlers are registered for
//! specific tag names, which keeps each rendering rule small and testable.
//! The Word renderer uses the same handlers in [`Flavor::Word`].

mod config;
mod core;
mod engine;
mod handler;
pub mod handlers;
mod types;

pub use config::create_render_registry;
pub use core::ElementRegistry;
pub use engine::RenderEngine;
pub use handler::{render_children, render_elements, ElementHandler, RecurseFn};
pub use types::{Flavor, ListKind, RenderContext, RenderResult};
