//! Askama template definitions.

use askama::Template;
use bindery_core::metadata::{CONTENT_KEY, LANG_KEY, STYLESHEET_KEY, TITLE_KEY};
use bindery_core::{
    FileMetadata, NavigationItem, RenderContext, RenderError, TemplateEngine, TemplateName,
};

/// Ordinary chapter page
#[derive(Template)]
#[template(path = "page.xhtml", escape = "html")]
pub struct PageTemplate<'a> {
    pub lang: &'a str,
    pub title: &'a str,
    pub stylesheet: Option<&'a str>,
    /// Extra class on `<body>`, from the `class` front-matter key
    pub class: Option<&'a str>,
    /// Canonical markup, inserted unescaped
    pub content: &'a str,
}

/// Author-supplied navigation document
#[derive(Template)]
#[template(path = "nav.xhtml", escape = "html")]
pub struct NavTemplate<'a> {
    pub lang: &'a str,
    pub title: &'a str,
    pub stylesheet: Option<&'a str>,
    pub class: Option<&'a str>,
    pub content: &'a str,
}

/// One line of the synthesized table of contents
#[derive(Debug, Clone)]
pub struct TocEntry<'a> {
    pub href: String,
    pub title: &'a str,
    pub subtitle: Option<&'a str>,
    pub level: u32,
}

impl<'a> From<&'a NavigationItem> for TocEntry<'a> {
    fn from(item: &'a NavigationItem) -> Self {
        Self {
            href: item.href(),
            title: &item.title,
            subtitle: Some(item.subtitle.as_str()).filter(|s| !s.is_empty()),
            level: item.level,
        }
    }
}

/// Synthesized table of contents
#[derive(Template)]
#[template(path = "toc.xhtml", escape = "html")]
pub struct TocTemplate<'a> {
    pub lang: &'a str,
    pub title: &'a str,
    pub stylesheet: Option<&'a str>,
    pub entries: Vec<TocEntry<'a>>,
}

/// The stock template set
#[derive(Debug, Clone, Copy, Default)]
pub struct Templates;

impl Templates {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateEngine for Templates {
    fn render(
        &self,
        name: TemplateName,
        ctx: &RenderContext<'_>,
        out: &mut String,
    ) -> Result<(), RenderError> {
        let meta = ctx.meta;
        let lang = required(meta, name, LANG_KEY)?;
        let title = required(meta, name, TITLE_KEY)?;
        let stylesheet = meta.text(STYLESHEET_KEY);
        let content = meta
            .get(CONTENT_KEY)
            .and_then(|value| value.as_str())
            .unwrap_or_default();

        let rendered = match name {
            TemplateName::Page => PageTemplate {
                lang,
                title,
                stylesheet,
                class: meta.text("class"),
                content,
            }
            .render_into(out),
            TemplateName::Nav => NavTemplate {
                lang,
                title,
                stylesheet,
                class: meta.text("class"),
                content,
            }
            .render_into(out),
            TemplateName::Toc => TocTemplate {
                lang,
                title,
                stylesheet,
                entries: ctx.toc.iter().map(TocEntry::from).collect(),
            }
            .render_into(out),
        };

        rendered.map_err(|e| RenderError::Failed {
            template: name,
            message: e.to_string(),
        })
    }
}

fn required<'m>(
    meta: &'m FileMetadata,
    template: TemplateName,
    key: &'static str,
) -> Result<&'m str, RenderError> {
    meta.text(key)
        .ok_or(RenderError::MissingKey { template, key })
}
