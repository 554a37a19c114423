//! Template engine seam for [`html_template`](crate::html_template).
//!
//! This crate does not ship a template language. Hosts plug in whichever
//! engine they already use (Tera, Handlebars, a directory of files) by
//! implementing [`TemplateEngine`]; both resolving a template name and
//! rendering it against data may fail, and either failure is reported before
//! the response sink is touched.

use serde_json::Value;
use thiserror::Error;

/// Errors produced while resolving or rendering a template.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template {name:?} not found")]
    NotFound { name: String },

    #[error("failed to render template {name:?}: {message}")]
    Render { name: String, message: String },
}

/// Resolves named templates and renders them against structured data.
///
/// The data arrives pre-serialized as a [`serde_json::Value`] so the trait
/// stays object-safe; [`html_template`](crate::html_template) performs the
/// conversion from any `T: Serialize` before calling in.
pub trait TemplateEngine {
    /// Renders the template identified by `name` against `data` into an
    /// in-memory string.
    ///
    /// # Errors
    ///
    /// [`TemplateError::NotFound`] if `name` does not resolve to a template,
    /// [`TemplateError::Render`] if rendering against `data` fails.
    fn render(&self, name: &str, data: &Value) -> Result<String, TemplateError>;
}
