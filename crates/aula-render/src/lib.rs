//! Rendering stage of the lesson compiler.
//!
//! Walks the AST built by `aula-parser` and emits one complete HTML
//! document per topic. Dispatch goes through a component-render
//! registry built once at startup; registration stays open so new
//! components can be added without touching the dispatcher.

mod error;
pub mod registry;
pub mod renderers;
pub mod templates;

pub use error::RenderError;
pub use registry::{render_nodes, ComponentRegistry, RenderContext, RenderFn};
pub use renderers::{encode_uri, escape_attr, random_id, render_topic, ID_ALPHABET, ID_LENGTH};
pub use templates::TemplateManager;
