//! EPUB 3 container writer.

use super::{media_type_for, ArchiveError, ArchiveWriter, ContentType};
use crate::navigation::encode_href;
use crate::publication::PublicationMetadata;
use chrono::{DateTime, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, Seek, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const CONTENT_DIR: &str = "OEBPS";
const PACKAGE_PATH: &str = "OEBPS/content.opf";
const PACKAGE_ID: &str = "pub-id";

const CONTAINER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>
"#;

/// Properties allowed on a manifest `<item>`
const MANIFEST_PROPERTIES: &[&str] = &[
    "cover-image",
    "mathml",
    "nav",
    "remote-resources",
    "scripted",
    "svg",
    "switch",
];

/// Properties allowed on a spine `<itemref>` without a `rendition:` prefix
const SPINE_PROPERTIES: &[&str] = &["page-spread-left", "page-spread-right"];

/// Document property that registers the entry as the guide's cover page
const COVER_PAGE_PROPERTY: &str = "cover";

#[derive(Debug)]
struct ManifestItem {
    id: String,
    name: String,
    media_type: &'static str,
    content_type: ContentType,
    properties: Vec<String>,
}

impl ManifestItem {
    fn has_property(&self, property: &str) -> bool {
        self.properties.iter().any(|p| p == property)
    }

    fn manifest_properties(&self) -> String {
        self.joined(|p| MANIFEST_PROPERTIES.contains(&p))
    }

    fn spine_properties(&self) -> String {
        self.joined(|p| SPINE_PROPERTIES.contains(&p) || p.starts_with("rendition:"))
    }

    fn joined(&self, keep: impl Fn(&str) -> bool) -> String {
        self.properties
            .iter()
            .map(String::as_str)
            .filter(|p| keep(p))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Writes entries into an EPUB 3 zip container
///
/// The `mimetype` entry and `META-INF/container.xml` are written on creation;
/// the package document is written on [`close`](ArchiveWriter::close).
pub struct EpubWriter<W: Write + Seek = File> {
    zip: ZipWriter<W>,
    metadata: Option<PublicationMetadata>,
    items: Vec<ManifestItem>,
    names: HashSet<String>,
    modified: DateTime<Utc>,
}

impl EpubWriter<File> {
    /// Create the output file and start the container
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, ArchiveError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| ArchiveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(file)
    }
}

impl<W: Write + Seek> EpubWriter<W> {
    pub fn new(writer: W) -> Result<Self, ArchiveError> {
        let mut zip = ZipWriter::new(writer);

        // mimetype must be the first entry, stored uncompressed
        zip.start_file(
            "mimetype",
            SimpleFileOptions::default().compression_method(CompressionMethod::Stored),
        )?;
        zip.write_all(b"application/epub+zip").map_err(zip_io)?;

        zip.start_file("META-INF/container.xml", deflated())?;
        zip.write_all(CONTAINER_XML.as_bytes()).map_err(zip_io)?;

        Ok(Self {
            zip,
            metadata: None,
            items: Vec::new(),
            names: HashSet::new(),
            modified: Utc::now(),
        })
    }

    /// Override the `dcterms:modified` timestamp
    pub fn with_modified(mut self, modified: DateTime<Utc>) -> Self {
        self.modified = modified;
        self
    }

    /// Write the package document, finish the zip and return the underlying writer
    pub fn finish(mut self) -> Result<W, ArchiveError> {
        let package = self.package_document().map_err(ArchiveError::Xml)?;
        self.zip.start_file(PACKAGE_PATH, deflated())?;
        self.zip.write_all(&package).map_err(zip_io)?;
        let inner = self.zip.finish()?;
        tracing::debug!("Closed EPUB container with {} entries", self.items.len());
        Ok(inner)
    }

    fn start_entry(
        &mut self,
        name: &str,
        content_type: ContentType,
        properties: &[String],
    ) -> Result<(), ArchiveError> {
        if self.metadata.is_none() {
            return Err(ArchiveError::MissingMetadata(name.to_string()));
        }
        if !self.names.insert(name.to_string()) {
            return Err(ArchiveError::DuplicateEntry(name.to_string()));
        }
        self.zip
            .start_file(format!("{}/{}", CONTENT_DIR, name), deflated())?;
        self.items.push(ManifestItem {
            id: format!("item-{}", self.items.len() + 1),
            name: name.to_string(),
            media_type: media_type_for(name),
            content_type,
            properties: properties.to_vec(),
        });
        Ok(())
    }

    fn package_document(&self) -> io::Result<Vec<u8>> {
        let fallback = PublicationMetadata::default();
        let metadata = self.metadata.as_ref().unwrap_or(&fallback);
        let lang = metadata.primary_language().unwrap_or("und");
        let modified = self.modified.format("%Y-%m-%dT%H:%M:%SZ").to_string();

        let mut w = Writer::new_with_indent(Vec::new(), b' ', 2);
        w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        w.write_event(Event::Start(BytesStart::new("package").with_attributes([
            ("xmlns", "http://www.idpf.org/2007/opf"),
            ("version", "3.0"),
            ("unique-identifier", PACKAGE_ID),
            ("xml:lang", lang),
        ])))?;

        w.write_event(Event::Start(
            BytesStart::new("metadata")
                .with_attributes([("xmlns:dc", "http://purl.org/dc/elements/1.1/")]),
        ))?;
        text_element(
            &mut w,
            "dc:identifier",
            &[("id", PACKAGE_ID)],
            &metadata.identifier_or_default(),
        )?;
        text_element(&mut w, "dc:title", &[], &metadata.title)?;
        for language in &metadata.language {
            text_element(&mut w, "dc:language", &[], language)?;
        }
        for creator in &metadata.creator {
            text_element(&mut w, "dc:creator", &[], creator)?;
        }
        let optional = [
            ("dc:publisher", &metadata.publisher),
            ("dc:description", &metadata.description),
            ("dc:rights", &metadata.rights),
            ("dc:date", &metadata.date),
        ];
        for (tag, value) in optional {
            if let Some(value) = value {
                text_element(&mut w, tag, &[], value)?;
            }
        }
        for subject in &metadata.subject {
            text_element(&mut w, "dc:subject", &[], subject)?;
        }
        text_element(
            &mut w,
            "meta",
            &[("property", "dcterms:modified")],
            &modified,
        )?;
        // EPUB 2 reading systems locate the cover through this meta
        if let Some(cover) = self.items.iter().find(|i| i.has_property("cover-image")) {
            w.write_event(Event::Empty(
                BytesStart::new("meta")
                    .with_attributes([("name", "cover"), ("content", cover.id.as_str())]),
            ))?;
        }
        w.write_event(Event::End(BytesEnd::new("metadata")))?;

        w.write_event(Event::Start(BytesStart::new("manifest")))?;
        for item in &self.items {
            let href = encode_href(&item.name);
            let mut element = BytesStart::new("item").with_attributes([
                ("id", item.id.as_str()),
                ("href", href.as_str()),
                ("media-type", item.media_type),
            ]);
            let properties = item.manifest_properties();
            if !properties.is_empty() {
                element.push_attribute(("properties", properties.as_str()));
            }
            w.write_event(Event::Empty(element))?;
        }
        w.write_event(Event::End(BytesEnd::new("manifest")))?;

        w.write_event(Event::Start(BytesStart::new("spine")))?;
        for item in self.items.iter().filter(|i| i.content_type.is_document()) {
            let mut element = BytesStart::new("itemref").with_attributes([("idref", item.id.as_str())]);
            if item.content_type == ContentType::Auxiliary {
                element.push_attribute(("linear", "no"));
            }
            let properties = item.spine_properties();
            if !properties.is_empty() {
                element.push_attribute(("properties", properties.as_str()));
            }
            w.write_event(Event::Empty(element))?;
        }
        w.write_event(Event::End(BytesEnd::new("spine")))?;

        let cover_page = self
            .items
            .iter()
            .find(|i| i.content_type.is_document() && i.has_property(COVER_PAGE_PROPERTY));
        if let Some(page) = cover_page {
            let href = encode_href(&page.name);
            w.write_event(Event::Start(BytesStart::new("guide")))?;
            w.write_event(Event::Empty(BytesStart::new("reference").with_attributes([
                ("type", "cover"),
                ("title", "Cover"),
                ("href", href.as_str()),
            ])))?;
            w.write_event(Event::End(BytesEnd::new("guide")))?;
        }

        w.write_event(Event::End(BytesEnd::new("package")))?;
        Ok(w.into_inner())
    }
}

impl<W: Write + Seek> ArchiveWriter for EpubWriter<W> {
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
        self.start_entry(name, content_type, properties)?;
        self.zip.write_all(data).map_err(zip_io)
    }

    fn add_file(
        &mut self,
        source: &Path,
        name: &str,
        content_type: ContentType,
        properties: &[String],
    ) -> Result<(), ArchiveError> {
        let mut file = File::open(source).map_err(|e| io_error(source, e))?;
        self.start_entry(name, content_type, properties)?;
        io::copy(&mut file, &mut self.zip).map_err(|e| io_error(source, e))?;
        Ok(())
    }

    fn close(self) -> Result<(), ArchiveError> {
        self.finish().map(|_| ())
    }
}

fn text_element<W: Write>(
    w: &mut Writer<W>,
    tag: &str,
    attributes: &[(&str, &str)],
    text: &str,
) -> io::Result<()> {
    let start = BytesStart::new(tag).with_attributes(attributes.iter().copied());
    w.write_event(Event::Start(start))?;
    w.write_event(Event::Text(BytesText::new(text)))?;
    w.write_event(Event::End(BytesEnd::new(tag)))
}

fn deflated() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}

fn zip_io(source: io::Error) -> ArchiveError {
    ArchiveError::Zip(zip::result::ZipError::Io(source))
}

fn io_error(path: &Path, source: io::Error) -> ArchiveError {
    ArchiveError::Io {
        path: PathBuf::from(path),
        source,
    }
}
