//! Dry-run compile: report what a build would write.

use super::{load_config, source_root};
use anyhow::{Context, Result};
use bindery_core::archive::ArchiveEntry;
use bindery_core::{compile_into, CompileReport, MemoryArchive, PublicationMetadata};
use bindery_render::Templates;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct CheckSummary<'a> {
    publication: Option<&'a PublicationMetadata>,
    entries: &'a [ArchiveEntry],
    report: &'a CompileReport,
}

/// Compile into memory and list the planned archive entries
pub fn check_book(source: Option<&Path>, config_path: Option<&Path>, json: bool) -> Result<()> {
    let root = source_root(source);
    let config = load_config(&root, config_path)?;

    let mut archive = MemoryArchive::new();
    let report = compile_into(&root, &mut archive, &config, &Templates::new())
        .with_context(|| format!("Failed to compile {:?}", root))?;

    let summary = CheckSummary {
        publication: archive.metadata(),
        entries: archive.entries(),
        report: &report,
    };

    if json {
        let payload = serde_json::to_string_pretty(&summary)?;
        println!("{}", payload);
        return Ok(());
    }

    if let Some(publication) = summary.publication {
        println!("{} [{}]", publication.title, publication.language.join(", "));
    }
    for entry in summary.entries {
        let properties = if entry.properties.is_empty() {
            String::new()
        } else {
            format!(" ({})", entry.properties.join(" "))
        };
        println!(
            "  {:<9} {:>8}  {}{}",
            entry.content_type.as_str(),
            entry.size,
            entry.name,
            properties
        );
    }
    println!(
        "Check complete: {} documents, {} media files, {} navigation entries",
        report.documents,
        report.media,
        report.navigation.len()
    );
    Ok(())
}
