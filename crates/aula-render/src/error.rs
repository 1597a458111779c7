use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    /// A dispatch for a name nobody registered. This is a programming
    /// error: authored content always lands on a built-in renderer
    /// (unknown markers go through `desconhecida`).
    #[error("no renderer registered for component '{name}'")]
    MissingRenderer { name: String },
    #[error("template error")]
    Template(#[from] tera::Error),
}
