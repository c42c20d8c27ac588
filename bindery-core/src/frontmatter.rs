//! Frontmatter parsing from document files.

use crate::metadata::FileMetadata;
use regex::Regex;
use serde_yaml::Value;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("Invalid YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Front matter must be a mapping of keys to values")]
    NotAMapping,
}

static FRONTMATTER_REGEX: OnceLock<Regex> = OnceLock::new();

fn frontmatter_regex() -> &'static Regex {
    FRONTMATTER_REGEX.get_or_init(|| {
        Regex::new(r"(?s)^\u{feff}?---[ \t]*\r?\n(?:(.*?)\r?\n)??---[ \t]*(?:\r?\n(.*))?$").unwrap()
    })
}

/// Split a document into its front matter and markdown body
///
/// Returns a tuple of (metadata, body). Text without a leading `---` block
/// yields empty metadata and the whole text as body.
///
/// # Example
///
/// ```
/// use bindery_core::frontmatter::parse_frontmatter;
///
/// let content = "---\ntitle: Chapter One\nlevel: 1\n---\n# It begins\n";
///
/// let (meta, body) = parse_frontmatter(content).unwrap();
/// assert_eq!(meta.text("title"), Some("Chapter One"));
/// assert_eq!(meta.int("level"), 1);
/// assert!(body.trim().starts_with("# It begins"));
/// ```
pub fn parse_frontmatter(content: &str) -> Result<(FileMetadata, &str), FrontmatterError> {
    let re = frontmatter_regex();

    let Some(captures) = re.captures(content) else {
        return Ok((FileMetadata::new(), content));
    };

    let yaml = captures.get(1).map_or("", |m| m.as_str());
    let body = captures.get(2).map_or("", |m| m.as_str());

    let metadata = match serde_yaml::from_str::<Value>(yaml)? {
        Value::Mapping(mapping) => FileMetadata::from_mapping(mapping),
        // Blank lines or a block of comments
        Value::Null => FileMetadata::new(),
        _ => return Err(FrontmatterError::NotAMapping),
    };

    Ok((metadata, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_frontmatter() {
        let content = r#"---
title: Test Chapter
subtitle: A test
lang: en
level: 1
---

# Hello World

This is the content."#;

        let (meta, body) = parse_frontmatter(content).unwrap();
        assert_eq!(meta.text("title"), Some("Test Chapter"));
        assert_eq!(meta.text("subtitle"), Some("A test"));
        assert_eq!(meta.text("lang"), Some("en"));
        assert_eq!(meta.int("level"), 1);
        assert!(body.contains("# Hello World"));
        assert!(body.contains("This is the content."));
    }

    #[test]
    fn test_parse_frontmatter_with_properties() {
        let content = r#"---
title: Contents
properties:
  - nav
  - cover-image
---

Content."#;

        let (meta, _) = parse_frontmatter(content).unwrap();
        assert_eq!(meta.list("properties"), vec!["nav", "cover-image"]);
    }

    #[test]
    fn test_parse_no_frontmatter() {
        let content = "# Just Content\n\nNo frontmatter here.";
        let (meta, body) = parse_frontmatter(content).unwrap();
        assert!(meta.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_parse_empty_frontmatter() {
        let (meta, body) = parse_frontmatter("---\n\n---\nBody").unwrap();
        assert!(meta.is_empty());
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_parse_adjacent_delimiters() {
        let (meta, body) = parse_frontmatter("---\n---\nBody").unwrap();
        assert!(meta.is_empty());
        assert_eq!(body, "Body");

        let (meta, body) = parse_frontmatter("---\r\n---\r\n# Title").unwrap();
        assert!(meta.is_empty());
        assert_eq!(body, "# Title");
    }

    #[test]
    fn test_frontmatter_without_body() {
        let (meta, body) = parse_frontmatter("---\ntitle: Only\n---").unwrap();
        assert_eq!(meta.text("title"), Some("Only"));
        assert_eq!(body, "");
    }

    #[test]
    fn test_parse_frontmatter_with_hidden() {
        let content = "---\nhidden: true\n---\n\nBack matter.";
        let (meta, _) = parse_frontmatter(content).unwrap();
        assert!(meta.flag("hidden"));
    }

    #[test]
    fn test_invalid_yaml() {
        let content = r#"---
title: Test
invalid yaml: [unclosed
---

Content."#;

        assert!(parse_frontmatter(content).is_err());
    }

    #[test]
    fn test_sequence_is_not_a_mapping() {
        let result = parse_frontmatter("---\n- a\n- b\n---\nBody");
        assert!(matches!(result, Err(FrontmatterError::NotAMapping)));
    }
}
