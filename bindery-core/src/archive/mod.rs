//! Output archive: the writer contract and its implementations.

mod epub;
mod media_type;

pub use epub::EpubWriter;
pub use media_type::media_type_for;

use crate::publication::PublicationMetadata;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Failed to write package document: {0}")]
    Xml(std::io::Error),

    #[error("Duplicate archive entry: {0}")]
    DuplicateEntry(String),

    #[error("Publication metadata must be set before adding {0}")]
    MissingMetadata(String),
}

/// How an entry takes part in the publication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Document in the linear reading order
    Primary,
    /// Document attached to the package but outside linear reading
    Auxiliary,
    /// Non-document asset
    Media,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Primary => "primary",
            ContentType::Auxiliary => "auxiliary",
            ContentType::Media => "media",
        }
    }

    pub fn is_document(&self) -> bool {
        !matches!(self, ContentType::Media)
    }
}

/// Sink for the compiled entries of a publication
///
/// `set_metadata` is called once before the first `add`. `close` is called
/// exactly once, after the last entry, whether or not the compile succeeded.
pub trait ArchiveWriter {
    fn set_metadata(&mut self, metadata: PublicationMetadata);

    /// Add an in-memory entry under `name`
    fn add(
        &mut self,
        name: &str,
        content_type: ContentType,
        data: &[u8],
        properties: &[String],
    ) -> Result<(), ArchiveError>;

    /// Copy the file at `source` unchanged into the archive under `name`
    fn add_file(
        &mut self,
        source: &Path,
        name: &str,
        content_type: ContentType,
        properties: &[String],
    ) -> Result<(), ArchiveError>;

    fn close(self) -> Result<(), ArchiveError>
    where
        Self: Sized;
}

/// One entry recorded by [`MemoryArchive`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveEntry {
    pub name: String,
    pub content_type: ContentType,
    pub properties: Vec<String>,
    #[serde(skip)]
    pub data: Vec<u8>,
    pub size: usize,
}

impl ArchiveEntry {
    pub fn text(&self) -> &str {
        std::str::from_utf8(&self.data).unwrap_or_default()
    }
}

/// Archive writer that keeps every entry in memory
///
/// Used for dry runs and tests. Closing it is a no-op; entries stay readable.
#[derive(Debug, Default)]
pub struct MemoryArchive {
    metadata: Option<PublicationMetadata>,
    entries: Vec<ArchiveEntry>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metadata(&self) -> Option<&PublicationMetadata> {
        self.metadata.as_ref()
    }

    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    pub fn entry(&self, name: &str) -> Option<&ArchiveEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    fn push(
        &mut self,
        name: &str,
        content_type: ContentType,
        data: Vec<u8>,
        properties: &[String],
    ) -> Result<(), ArchiveError> {
        if self.metadata.is_none() {
            return Err(ArchiveError::MissingMetadata(name.to_string()));
        }
        if self.entry(name).is_some() {
            return Err(ArchiveError::DuplicateEntry(name.to_string()));
        }
        self.entries.push(ArchiveEntry {
            name: name.to_string(),
            content_type,
            properties: properties.to_vec(),
            size: data.len(),
            data,
        });
        Ok(())
    }
}

impl ArchiveWriter for MemoryArchive {
    fn set_metadata(&mut self, metadata: PublicationMetadata) {
        self.metadata = Some(metadata);
    }

    fn add(
        &mut self,
        name: &str,
        content_type: ContentType,
        data: &[u8],
        properties: &[String],
    ) -> Result<(), ArchiveError> {
        self.push(name, content_type, data.to_vec(), properties)
    }

    fn add_file(
        &mut self,
        source: &Path,
        name: &str,
        content_type: ContentType,
        properties: &[String],
    ) -> Result<(), ArchiveError> {
        let data = std::fs::read(source).map_err(|e| ArchiveError::Io {
            path: source.to_path_buf(),
            source: e,
        })?;
        self.push(name, content_type, data, properties)
    }

    fn close(self) -> Result<(), ArchiveError> {
        Ok(())
    }
}

/// `&mut MemoryArchive` can be handed to the compiler and inspected afterwards.
impl ArchiveWriter for &mut MemoryArchive {
    fn set_metadata(&mut self, metadata: PublicationMetadata) {
        (**self).set_metadata(metadata)
    }

    fn add(
        &mut self,
        name: &str,
        content_type: ContentType,
        data: &[u8],
        properties: &[String],
    ) -> Result<(), ArchiveError> {
        (**self).add(name, content_type, data, properties)
    }

    fn add_file(
        &mut self,
        source: &Path,
        name: &str,
        content_type: ContentType,
        properties: &[String],
    ) -> Result<(), ArchiveError> {
        (**self).add_file(source, name, content_type, properties)
    }

    fn close(self) -> Result<(), ArchiveError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> PublicationMetadata {
        PublicationMetadata {
            title: "Test".into(),
            language: vec!["en".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_memory_archive_requires_metadata() {
        let mut archive = MemoryArchive::new();
        let err = archive
            .add("a.xhtml", ContentType::Primary, b"x", &[])
            .unwrap_err();
        assert!(matches!(err, ArchiveError::MissingMetadata(_)));
    }

    #[test]
    fn test_memory_archive_rejects_duplicates() {
        let mut archive = MemoryArchive::new();
        archive.set_metadata(metadata());
        archive
            .add("a.xhtml", ContentType::Primary, b"x", &[])
            .unwrap();
        let err = archive
            .add("a.xhtml", ContentType::Auxiliary, b"y", &[])
            .unwrap_err();
        assert!(matches!(err, ArchiveError::DuplicateEntry(name) if name == "a.xhtml"));
    }

    #[test]
    fn test_memory_archive_keeps_order_and_properties() {
        let mut archive = MemoryArchive::new();
        archive.set_metadata(metadata());
        archive
            .add("b.xhtml", ContentType::Primary, b"<p/>", &["nav".into()])
            .unwrap();
        archive
            .add("a.css", ContentType::Media, b"p{}", &[])
            .unwrap();
        let names: Vec<_> = archive.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b.xhtml", "a.css"]);
        assert_eq!(archive.entry("b.xhtml").unwrap().properties, vec!["nav"]);
        assert_eq!(archive.entry("a.css").unwrap().text(), "p{}");
    }
}
