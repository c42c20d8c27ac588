//! Init command implementation.

use anyhow::{Context, Result};
use bindery_core::config::CONFIG_FILENAME;
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# Extensions of files compiled as chapters
markdown: [".md", ".markdown", ".mdown", ".mkd"]

# Base-name patterns; the first matching media file becomes the cover image
covers: ["cover.*"]

# Publication metadata, relative to this directory
metadata: metadata.yaml

# Stylesheet linked from every page (set to null to disable)
stylesheet: style.css
"#;

const DEFAULT_METADATA: &str = r#"title: Untitled Book
language: en
creator: Anonymous
"#;

const DEFAULT_STYLESHEET: &str = r#"body {
  font-family: serif;
  line-height: 1.5;
}

h1, h2, h3 {
  page-break-after: avoid;
}
"#;

const SAMPLE_CHAPTER: &str = r#"---
title: Chapter One
level: 0
---

# Chapter One

This is the first chapter. Every markdown file in this directory becomes a
page of the book, in file-name order.

Add `properties: [nav]` to a chapter's front matter to supply your own table
of contents; otherwise one is generated.
"#;

/// Initialize a new book source tree
pub fn init_project(path: Option<&Path>) -> Result<()> {
    let root = path.unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(root).with_context(|| format!("Failed to create {:?}", root))?;

    write_if_missing(&root.join(CONFIG_FILENAME), DEFAULT_CONFIG)?;
    write_if_missing(&root.join("metadata.yaml"), DEFAULT_METADATA)?;
    write_if_missing(&root.join("style.css"), DEFAULT_STYLESHEET)?;
    write_if_missing(&root.join("chapter-01.md"), SAMPLE_CHAPTER)?;

    println!("✓ bindery initialized in {:?}", root);
    println!("  - Edit metadata.yaml to describe the publication");
    println!("  - Write chapters as markdown files, then run `bindery build`");
    Ok(())
}

fn write_if_missing(path: &Path, contents: &str) -> Result<()> {
    if path.exists() {
        println!("{:?} already exists", path);
        return Ok(());
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {:?}", path))?;
    println!("Created {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bindery_core::{Config, PublicationMetadata};

    #[test]
    fn test_scaffold_parses() {
        let config = Config::from_yaml(DEFAULT_CONFIG).unwrap();
        assert!(config.is_cover("cover.png"));
        assert_eq!(config.stylesheet.as_deref(), Some(Path::new("style.css")));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.yaml");
        fs::write(&path, DEFAULT_METADATA).unwrap();
        let metadata = PublicationMetadata::load(&path).unwrap();
        assert_eq!(metadata.primary_language(), Some("en"));
    }

    #[test]
    fn test_existing_files_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("style.css"), "mine").unwrap();
        init_project(Some(dir.path())).unwrap();

        assert_eq!(fs::read_to_string(dir.path().join("style.css")).unwrap(), "mine");
        assert!(dir.path().join("chapter-01.md").exists());
        assert!(dir.path().join(CONFIG_FILENAME).exists());
    }
}
