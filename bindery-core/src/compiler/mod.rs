//! Compiles a source tree into a publication archive.
//!
//! One [`Compiler`] lives for exactly one traversal. Entries are visited depth
//! first in file-name order, classified, and handed to the document or media
//! pipeline. After the walk a table of contents is synthesized when no
//! document declared the navigation role. The archive is closed on every
//! exit path.

mod document;
mod media;

pub use document::UNTITLED;

use crate::archive::{ArchiveWriter, ContentType, EpubWriter};
use crate::classify::{Class, Classifier};
use crate::config::Config;
use crate::error::{CompileError, Result};
use crate::markdown::MarkdownConverter;
use crate::metadata::{FileMetadata, LANG_KEY, STYLESHEET_KEY, TITLE_KEY};
use crate::navigation::{Navigation, NavigationBuilder, OneShot, TOC_FILENAME, TOC_TITLE};
use crate::paths::to_slash;
use crate::pool::BufferPool;
use crate::publication::{PublicationError, PublicationMetadata};
use crate::template::{RenderContext, TemplateEngine, TemplateName};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Declaration prefixed to every rendered page
pub const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Summary of a successful compile
#[derive(Debug, Clone, Serialize)]
pub struct CompileReport {
    pub navigation: Navigation,
    pub documents: usize,
    pub media: usize,
    /// Archive name of the entry marked as cover image
    pub cover: Option<String>,
    pub synthesized_toc: bool,
}

/// Outcome of visiting one tree entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    Continue,
    /// The entry itself is ignored; a directory is still descended into
    SkipEntry,
    SkipSubtree,
}

/// Compile `source` into an EPUB file at `output`
pub fn compile(
    source: &Path,
    output: &Path,
    config: &Config,
    templates: &dyn TemplateEngine,
) -> Result<CompileReport> {
    let publication = load_publication(source, config)?;
    let archive = EpubWriter::create(output).map_err(CompileError::Open)?;
    info!("Compiling {:?} into {:?}", source, output);
    Compiler::new(source, config, templates, publication, archive)?.run()
}

/// Compile `source` into any archive writer
pub fn compile_into<A: ArchiveWriter>(
    source: &Path,
    archive: A,
    config: &Config,
    templates: &dyn TemplateEngine,
) -> Result<CompileReport> {
    let publication = load_publication(source, config)?;
    Compiler::new(source, config, templates, publication, archive)?.run()
}

fn load_publication(source: &Path, config: &Config) -> Result<PublicationMetadata> {
    if !source.is_dir() {
        return Err(CompileError::SourceNotDirectory(source.to_path_buf()));
    }
    Ok(PublicationMetadata::load(&source.join(&config.metadata))?)
}

/// State of one compile
pub struct Compiler<'a, A: ArchiveWriter> {
    /// Working context: every relative path resolves against it
    root: &'a Path,
    config: &'a Config,
    templates: &'a dyn TemplateEngine,
    classifier: Classifier<'a>,
    markdown: MarkdownConverter,
    buffers: BufferPool,
    archive: A,
    /// Global stylesheet relative to the root, when the file exists
    stylesheet: Option<PathBuf>,
    lang: String,
    cover: OneShot,
    cover_name: Option<String>,
    navigation: NavigationBuilder,
    documents: usize,
    media: usize,
}

impl<'a, A: ArchiveWriter> Compiler<'a, A> {
    pub fn new(
        root: &'a Path,
        config: &'a Config,
        templates: &'a dyn TemplateEngine,
        publication: PublicationMetadata,
        mut archive: A,
    ) -> Result<Self> {
        let lang = publication
            .primary_language()
            .ok_or(PublicationError::MissingLanguage)?
            .to_string();
        archive.set_metadata(publication);

        let stylesheet = config
            .stylesheet
            .as_ref()
            .filter(|path| root.join(path).is_file())
            .cloned();
        match &stylesheet {
            Some(path) => debug!("Using stylesheet {:?}", path),
            None => debug!("No global stylesheet"),
        }

        Ok(Self {
            root,
            config,
            templates,
            classifier: Classifier::new(config, root),
            markdown: MarkdownConverter::new(),
            buffers: BufferPool::default(),
            archive,
            stylesheet,
            lang,
            cover: OneShot::default(),
            cover_name: None,
            navigation: NavigationBuilder::new(),
            documents: 0,
            media: 0,
        })
    }

    /// Traverse, write the fallback table of contents if needed, and close
    pub fn run(mut self) -> Result<CompileReport> {
        let result = self.traverse().and_then(|()| self.write_fallback_toc());

        let Compiler {
            archive,
            navigation,
            cover_name,
            documents,
            media,
            ..
        } = self;

        let synthesized_toc = match result {
            Ok(synthesized) => synthesized,
            Err(err) => {
                if let Err(close_err) = archive.close() {
                    warn!("Failed to close archive after aborted compile: {}", close_err);
                }
                return Err(err);
            }
        };
        archive.close().map_err(CompileError::Close)?;

        let navigation = navigation.finish();
        info!(
            "Compiled {} documents and {} media files ({} navigation entries)",
            documents,
            media,
            navigation.len()
        );
        Ok(CompileReport {
            navigation,
            documents,
            media,
            cover: cover_name,
            synthesized_toc,
        })
    }

    fn traverse(&mut self) -> Result<()> {
        let mut walker = WalkDir::new(self.root).sort_by_file_name().into_iter();

        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("Skipping unreadable entry: {}", err);
                    continue;
                }
            };
            if entry.depth() == 0 {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(self.root) else {
                continue;
            };

            match self.visit(relative, entry.file_type().is_dir())? {
                Visit::Continue | Visit::SkipEntry => {}
                Visit::SkipSubtree => walker.skip_current_dir(),
            }
        }

        Ok(())
    }

    fn visit(&mut self, path: &Path, is_dir: bool) -> Result<Visit> {
        match self.classifier.classify(path, is_dir) {
            Class::SkipSubtree => {
                debug!("Skipping directory {:?}", path);
                Ok(Visit::SkipSubtree)
            }
            Class::Skip => {
                if !is_dir {
                    debug!("Skipping {:?}", path);
                }
                Ok(Visit::SkipEntry)
            }
            Class::Document => {
                self.add_document(path)?;
                self.documents += 1;
                Ok(Visit::Continue)
            }
            Class::Media => {
                self.add_media(path)?;
                self.media += 1;
                Ok(Visit::Continue)
            }
        }
    }

    /// Render the synthesized table of contents unless a document declared one
    fn write_fallback_toc(&mut self) -> Result<bool> {
        if !self.navigation.needs_fallback() {
            debug!("Navigation document declared by the source");
            return Ok(false);
        }

        let mut meta = FileMetadata::new();
        meta.insert(LANG_KEY, self.lang.as_str());
        meta.insert(TITLE_KEY, TOC_TITLE);
        // The table of contents sits at the root, next to the stylesheet's base
        if let Some(stylesheet) = &self.stylesheet {
            meta.insert(STYLESHEET_KEY, to_slash(stylesheet));
        }

        let mut page = self.buffers.checkout();
        page.push_str(XML_HEADER);
        let ctx = RenderContext {
            meta: &meta,
            toc: self.navigation.items(),
        };
        self.templates
            .render(TemplateName::Toc, &ctx, &mut page)
            .map_err(|source| CompileError::Render {
                path: PathBuf::from(TOC_FILENAME),
                source,
            })?;

        self.archive
            .add(
                TOC_FILENAME,
                ContentType::Auxiliary,
                page.as_bytes(),
                &["nav".to_string()],
            )
            .map_err(|source| CompileError::Archive {
                path: PathBuf::from(TOC_FILENAME),
                source,
            })?;
        info!(
            "Synthesized table of contents with {} entries",
            self.navigation.items().len()
        );
        Ok(true)
    }
}
