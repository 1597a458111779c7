//! Lesson page compiler.
//!
//! Turns marker-annotated HTML (as produced from word-processor
//! documents) into a set of styled, navigable topic pages. Parsing
//! lives in `aula-parser`, rendering in `aula-render`; this crate wires
//! the two into the batch pipeline used by the surrounding service.

pub mod pipeline;

pub use aula_parser::{
    parse_document, ContentNode, Diagnostic, DiagnosticKind, LessonDocument, Section, Topic,
};
pub use aula_render::{ComponentRegistry, RenderContext, RenderError, TemplateManager};
pub use pipeline::{LessonCompiler, LessonOutput};
