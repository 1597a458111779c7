//! Batch conversion pipeline: raw HTML in, rendered pages and display
//! titles out, index-aligned 1:1.

use anyhow::{Context, Result};
use serde::Serialize;

use aula_parser::{parse_document, Diagnostic};
use aula_render::{render_topic, ComponentRegistry, RenderContext, TemplateManager};

/// Result of one conversion. `pages[i]` is the standalone HTML
/// document for the topic whose display title is `titles[i]`;
/// diagnostics carry every non-fatal parse report.
#[derive(Clone, Debug, Serialize)]
pub struct LessonOutput {
    pub pages: Vec<String>,
    pub titles: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// The compiler holds the process-wide read-only state: the component
/// registry and the template manager. Build it once and share it;
/// every call to [`process`] allocates its own AST, so conversions can
/// run in parallel.
///
/// [`process`]: LessonCompiler::process
pub struct LessonCompiler {
    registry: ComponentRegistry,
    templates: TemplateManager,
}

impl LessonCompiler {
    pub fn new() -> Result<Self> {
        Ok(LessonCompiler {
            registry: ComponentRegistry::with_builtins(),
            templates: TemplateManager::new().context("loading built-in templates")?,
        })
    }

    /// Open registration point for additional component renderers.
    /// Intended for startup, before the compiler is shared.
    pub fn registry_mut(&mut self) -> &mut ComponentRegistry {
        &mut self.registry
    }

    /// Converts one document. Malformed authoring degrades into
    /// diagnostics and placeholder output; an error here means a
    /// template or renderer failure, not bad content.
    pub fn process(&self, html: &str) -> Result<LessonOutput> {
        let parsed = parse_document(html);
        let ctx = RenderContext {
            registry: &self.registry,
            templates: &self.templates,
        };

        let mut pages = Vec::with_capacity(parsed.document.len());
        let mut titles = Vec::with_capacity(parsed.document.len());
        for (index, topic) in parsed.document.iter() {
            let page = render_topic(topic, &ctx)
                .with_context(|| format!("rendering topic {}", index))?;
            pages.push(page);
            titles.push(topic.display_title(index));
        }

        Ok(LessonOutput {
            pages,
            titles,
            diagnostics: parsed.diagnostics,
        })
    }
}
