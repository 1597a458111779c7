//! Parsing stage of the lesson compiler.
//!
//! Takes flat, marker-delimited HTML (as produced by word-processor
//! conversion) and turns it into a nested AST of topics, sections and
//! content components. The companion crate `aula-render` walks the
//! resulting tree and emits the final pages.

pub mod ast;
pub mod diagnostics;
pub mod html;
pub mod markers;
pub mod parser;

pub use ast::{ContentNode, LessonDocument, Section, Topic};
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use parser::{parse_document, ParseOutput, ParserError};
