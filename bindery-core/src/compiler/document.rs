use super::{Compiler, XML_HEADER};
use crate::archive::{ArchiveWriter, ContentType};
use crate::error::{CompileError, Result};
use crate::frontmatter::parse_frontmatter;
use crate::metadata::{CONTENT_KEY, LANG_KEY, STYLESHEET_KEY, TITLE_KEY};
use crate::navigation::{NavState, NavigationItem};
use crate::normalize::normalize_into;
use crate::paths::{output_name, relative_to, to_slash};
use crate::template::{RenderContext, TemplateName};
use std::path::Path;
use tracing::{debug, warn};

/// Title of a document that declares none
pub const UNTITLED: &str = "* * *";

const NAV_PROPERTY: &str = "nav";

impl<A: ArchiveWriter> Compiler<'_, A> {
    /// Compile one document and register it in the navigation
    pub(super) fn add_document(&mut self, path: &Path) -> Result<()> {
        let source = self.root.join(path);
        let text = std::fs::read_to_string(&source).map_err(|source| CompileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let (mut meta, body) =
            parse_frontmatter(&text).map_err(|source| CompileError::Frontmatter {
                path: path.to_path_buf(),
                source,
            })?;

        let lang = meta.text(LANG_KEY).unwrap_or(&self.lang).to_string();
        meta.insert(LANG_KEY, lang);
        let title = meta.text(TITLE_KEY).unwrap_or(UNTITLED).to_string();
        meta.insert(TITLE_KEY, title.as_str());

        let content_type = if meta.flag("hidden") {
            ContentType::Auxiliary
        } else {
            ContentType::Primary
        };

        if let Some(stylesheet) = &self.stylesheet {
            let dir = path.parent().unwrap_or_else(|| Path::new(""));
            let href = relative_to(dir, stylesheet).map_err(|source| CompileError::Stylesheet {
                path: path.to_path_buf(),
                source,
            })?;
            meta.insert(STYLESHEET_KEY, to_slash(&href));
        }

        {
            let mut html = self.buffers.checkout();
            self.markdown.convert(body, &mut html);
            let mut canonical = self.buffers.checkout();
            normalize_into(&html, &mut canonical);
            meta.insert(CONTENT_KEY, canonical.as_str());
        }

        let mut template = TemplateName::Page;
        let mut properties = meta.list("properties");
        for property in properties.iter_mut() {
            match property.as_str() {
                NAV_PROPERTY => {
                    if self.navigation.state() == NavState::Satisfied {
                        warn!("{:?} declares a second navigation document", path);
                    }
                    template = TemplateName::Nav;
                    self.navigation.mark_declared();
                }
                // `cover-image` belongs to media entries
                "cover-image" => *property = "cover".to_string(),
                _ => {}
            }
        }

        let mut page = self.buffers.checkout();
        page.push_str(XML_HEADER);
        let ctx = RenderContext {
            meta: &meta,
            toc: self.navigation.items(),
        };
        self.templates
            .render(template, &ctx, &mut page)
            .map_err(|source| CompileError::Render {
                path: path.to_path_buf(),
                source,
            })?;

        let level = meta.int("level");
        let level = u32::try_from(level).unwrap_or_else(|_| {
            let clamped = if level < 0 { 0 } else { u32::MAX };
            warn!("{:?} has level {} out of range, using {}", path, level, clamped);
            clamped
        });

        let filename = output_name(path);
        self.navigation.push(NavigationItem {
            title,
            subtitle: meta.text("subtitle").unwrap_or_default().to_string(),
            level,
            filename: filename.clone(),
            content_type,
        });

        debug!(
            "Adding document {:?} as {} ({}, template {})",
            path,
            filename,
            content_type.as_str(),
            template
        );
        self.archive
            .add(&filename, content_type, page.as_bytes(), &properties)
            .map_err(|source| CompileError::Archive {
                path: path.to_path_buf(),
                source,
            })
    }
}
