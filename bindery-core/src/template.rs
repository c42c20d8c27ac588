//! Template rendering contract.

use crate::metadata::FileMetadata;
use crate::navigation::NavigationItem;
use std::fmt;
use thiserror::Error;

/// The three page shapes a publication is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateName {
    /// Ordinary document
    Page,
    /// Document that declares itself the navigation document
    Nav,
    /// Synthesized table of contents
    Toc,
}

impl TemplateName {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateName::Page => "page",
            TemplateName::Nav => "nav",
            TemplateName::Toc => "toc",
        }
    }
}

impl fmt::Display for TemplateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data handed to a template
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub meta: &'a FileMetadata,
    /// Navigation collected so far; the full sequence for the toc template
    pub toc: &'a [NavigationItem],
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Template {template} failed: {message}")]
    Failed {
        template: TemplateName,
        message: String,
    },

    #[error("Template {template} requires {key:?}")]
    MissingKey {
        template: TemplateName,
        key: &'static str,
    },
}

/// Turns a metadata mapping into page markup
pub trait TemplateEngine {
    /// Render `name`, appending the markup (without XML declaration) to `out`
    fn render(
        &self,
        name: TemplateName,
        ctx: &RenderContext<'_>,
        out: &mut String,
    ) -> Result<(), RenderError>;
}
