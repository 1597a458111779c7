//! The component-render table.
//!
//! Built once at startup and passed by reference into every render
//! call; conversions never mutate it, so one registry can back any
//! number of parallel conversions. Registration stays open: a renderer
//! registered under a marker name picks up `Unknown` nodes carrying
//! that tag, which is how not-yet-implemented components get adopted
//! without touching the dispatcher.

use std::collections::HashMap;

use aula_parser::ContentNode;

use crate::error::RenderError;
use crate::templates::TemplateManager;

pub type RenderFn =
    Box<dyn Fn(&ContentNode, &RenderContext) -> Result<String, RenderError> + Send + Sync>;

/// Everything a render function needs, borrowed for the duration of
/// one conversion.
pub struct RenderContext<'a> {
    pub registry: &'a ComponentRegistry,
    pub templates: &'a TemplateManager,
}

#[derive(Default)]
pub struct ComponentRegistry {
    renderers: HashMap<String, RenderFn>,
}

impl ComponentRegistry {
    /// An empty table. Most callers want [`with_builtins`] instead.
    ///
    /// [`with_builtins`]: ComponentRegistry::with_builtins
    pub fn new() -> Self {
        Self::default()
    }

    /// The table with every built-in node renderer registered.
    pub fn with_builtins() -> Self {
        crate::renderers::builtins()
    }

    pub fn register<S, F>(&mut self, name: S, f: F)
    where
        S: Into<String>,
        F: Fn(&ContentNode, &RenderContext) -> Result<String, RenderError> + Send + Sync + 'static,
    {
        self.renderers.insert(name.into(), Box::new(f));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.renderers.contains_key(name)
    }

    /// Dispatches a node to its renderer. `Unknown` nodes first try a
    /// renderer registered under their original tag, then fall back to
    /// the `desconhecida` placeholder.
    pub fn render(&self, node: &ContentNode, ctx: &RenderContext) -> Result<String, RenderError> {
        let name = match node {
            ContentNode::Unknown { tag, .. } if self.renderers.contains_key(tag.as_str()) => {
                tag.as_str()
            }
            _ => node.type_name(),
        };
        let f = self
            .renderers
            .get(name)
            .ok_or_else(|| RenderError::MissingRenderer { name: name.into() })?;
        f(node, ctx)
    }
}

/// Renders a node list in order, concatenating the results.
pub fn render_nodes(nodes: &[ContentNode], ctx: &RenderContext) -> Result<String, RenderError> {
    let mut out = String::new();
    for node in nodes {
        out.push_str(&ctx.registry.render(node, ctx)?);
    }
    Ok(out)
}
