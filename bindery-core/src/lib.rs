//! # bindery-core
//!
//! Core library for the bindery e-book compiler.
//!
//! This crate walks a source tree of markdown chapters and media assets and
//! compiles it into an EPUB 3 publication: classification, markup
//! normalization, navigation and the archive writer.

pub mod archive;
pub mod classify;
pub mod compiler;
pub mod config;
pub mod error;
pub mod frontmatter;
pub mod markdown;
pub mod metadata;
pub mod navigation;
pub mod normalize;
pub mod paths;
pub mod pool;
pub mod publication;
pub mod template;

pub use archive::{ArchiveEntry, ArchiveError, ArchiveWriter, ContentType, EpubWriter, MemoryArchive};
pub use classify::{Class, Classifier};
pub use compiler::{compile, compile_into, CompileReport, Compiler, UNTITLED, XML_HEADER};
pub use config::Config;
pub use error::CompileError;
pub use metadata::FileMetadata;
pub use navigation::{Navigation, NavigationItem, TOC_FILENAME, TOC_TITLE};
pub use normalize::normalize;
pub use publication::PublicationMetadata;
pub use template::{RenderContext, RenderError, TemplateEngine, TemplateName};
