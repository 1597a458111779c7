//! Embedded Tera templates for the fixed page chrome and the
//! template-driven components.
//!
//! Autoescaping is on for the `.html` names, so free text interpolated
//! into titles and attributes is entity-escaped by the engine; trusted
//! inner HTML is passed through explicitly with `| safe`.

use tera::{Context, Tera};

use crate::error::RenderError;

#[derive(Debug, Clone)]
pub struct TemplateManager {
    tera: Tera,
}

impl TemplateManager {
    pub fn new() -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("head.html", include_str!("../templates/head.html")),
            ("header.html", include_str!("../templates/header.html")),
            (
                "body_section.html",
                include_str!("../templates/body_section.html"),
            ),
            ("footer.html", include_str!("../templates/footer.html")),
            ("scripts.html", include_str!("../templates/scripts.html")),
            ("modal.html", include_str!("../templates/modal.html")),
            ("destaque.html", include_str!("../templates/destaque.html")),
            (
                "referencias.html",
                include_str!("../templates/referencias.html"),
            ),
            (
                "carrossel.html",
                include_str!("../templates/carrossel.html"),
            ),
        ])?;
        Ok(TemplateManager { tera })
    }

    pub fn render(&self, name: &str, context: &Context) -> Result<String, RenderError> {
        Ok(self.tera.render(name, context)?)
    }
}
