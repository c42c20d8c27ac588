//! Publication-wide metadata loaded from the source tree's metadata file.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PublicationError {
    #[error("Failed to read publication metadata {path:?}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse publication metadata {path:?}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Publication metadata declares no language")]
    MissingLanguage,

    #[error("Publication metadata declares no title")]
    MissingTitle,
}

/// Dublin Core style description of the whole publication
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublicationMetadata {
    pub title: String,

    #[serde(default, alias = "lang", deserialize_with = "one_or_many")]
    pub language: Vec<String>,

    #[serde(default, alias = "author", deserialize_with = "one_or_many")]
    pub creator: Vec<String>,

    #[serde(default)]
    pub identifier: Option<String>,

    #[serde(default)]
    pub publisher: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub rights: Option<String>,

    #[serde(default, alias = "tags", deserialize_with = "one_or_many")]
    pub subject: Vec<String>,

    #[serde(default)]
    pub date: Option<String>,
}

impl PublicationMetadata {
    /// Load and validate the metadata file
    pub fn load(path: &Path) -> Result<Self, PublicationError> {
        let contents = std::fs::read_to_string(path).map_err(|source| PublicationError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let metadata: PublicationMetadata =
            serde_yaml::from_str(&contents).map_err(|source| PublicationError::ParseError {
                path: path.to_path_buf(),
                source,
            })?;
        metadata.validate()?;
        Ok(metadata)
    }

    fn validate(&self) -> Result<(), PublicationError> {
        if self.title.trim().is_empty() {
            return Err(PublicationError::MissingTitle);
        }
        if self.primary_language().is_none() {
            return Err(PublicationError::MissingLanguage);
        }
        Ok(())
    }

    /// Language of the publication: the first declared language
    pub fn primary_language(&self) -> Option<&str> {
        self.language
            .iter()
            .map(|l| l.trim())
            .find(|l| !l.is_empty())
    }

    /// Declared identifier, or one derived from the title
    pub fn identifier_or_default(&self) -> String {
        if let Some(id) = self.identifier.as_deref().filter(|id| !id.trim().is_empty()) {
            return id.trim().to_string();
        }
        let mut slug = String::with_capacity(self.title.len());
        for ch in self.title.trim().chars().flat_map(char::to_lowercase) {
            if ch.is_alphanumeric() {
                slug.push(ch);
            } else if !slug.ends_with('-') {
                slug.push('-');
            }
        }
        format!("urn:bindery:{}", slug.trim_matches('-'))
    }
}

/// Accept either `key: value` or `key: [a, b]`
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(value)) => vec![value],
        Some(OneOrMany::Many(values)) => values,
        None => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> PublicationMetadata {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_language_list_and_scalar() {
        let many = parse("title: T\nlanguage: [ru, en]\n");
        assert_eq!(many.primary_language(), Some("ru"));

        let one = parse("title: T\nlang: en\n");
        assert_eq!(one.primary_language(), Some("en"));
    }

    #[test]
    fn test_missing_language_is_rejected() {
        let metadata = parse("title: Untitled\n");
        assert!(matches!(
            metadata.validate(),
            Err(PublicationError::MissingLanguage)
        ));
    }

    #[test]
    fn test_missing_title_is_rejected() {
        let metadata = parse("title: \"\"\nlanguage: en\n");
        assert!(matches!(
            metadata.validate(),
            Err(PublicationError::MissingTitle)
        ));
    }

    #[test]
    fn test_identifier_derived_from_title() {
        let metadata = parse("title: War and Peace, Vol. 1\nlanguage: en\n");
        assert_eq!(
            metadata.identifier_or_default(),
            "urn:bindery:war-and-peace-vol-1"
        );

        let explicit = parse("title: T\nlanguage: en\nidentifier: isbn:123\n");
        assert_eq!(explicit.identifier_or_default(), "isbn:123");
    }

    #[test]
    fn test_load_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = PublicationMetadata::load(&dir.path().join("metadata.yaml")).unwrap_err();
        assert!(matches!(err, PublicationError::ReadError { .. }));
    }
}
