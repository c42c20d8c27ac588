//! Configuration parsing and management.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the optional configuration file at the root of a source tree.
pub const CONFIG_FILENAME: &str = "bindery.yml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Invalid cover pattern '{pattern}': {source}")]
    PatternError {
        pattern: String,
        source: regex::Error,
    },
}

/// Build configuration matching the bindery.yml schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Extensions (with leading dot) of files compiled as documents
    #[serde(default = "default_markdown")]
    pub markdown: Vec<String>,

    /// Glob patterns matched against media base names to find the cover
    #[serde(default = "default_covers")]
    pub covers: Vec<String>,

    /// Publication metadata file, relative to the source root
    #[serde(default = "default_metadata")]
    pub metadata: PathBuf,

    /// Global stylesheet, relative to the source root
    #[serde(default = "default_stylesheet")]
    pub stylesheet: Option<PathBuf>,

    #[serde(skip)]
    cover_patterns: Vec<Regex>,

    // Internal: path to config file, skipped during traversal
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

fn default_markdown() -> Vec<String> {
    [".md", ".markdown", ".mdown", ".mkd"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_covers() -> Vec<String> {
    vec![String::from("cover.*")]
}

fn default_metadata() -> PathBuf {
    PathBuf::from("metadata.yaml")
}

fn default_stylesheet() -> Option<PathBuf> {
    Some(PathBuf::from("style.css"))
}

impl Default for Config {
    fn default() -> Self {
        let mut config = Self {
            markdown: default_markdown(),
            covers: default_covers(),
            metadata: default_metadata(),
            stylesheet: default_stylesheet(),
            cover_patterns: Vec::new(),
            config_path: None,
        };
        // The stock patterns are known to compile
        if let Ok(patterns) = compile_patterns(&config.covers) {
            config.cover_patterns = patterns;
        }
        config
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_yaml(&contents)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        // An empty file deserializes to unit, not to a mapping
        let mut config: Config = if contents.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(contents)?
        };
        config.cover_patterns = compile_patterns(&config.covers)?;
        Ok(config)
    }

    /// Load `bindery.yml` from the source root, or fall back to defaults
    pub fn load(source_root: &Path) -> Result<Self, ConfigError> {
        let path = source_root.join(CONFIG_FILENAME);
        if path.is_file() {
            tracing::debug!("Loading config from {:?}", path);
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Path of the file this config was loaded from, if any
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Whether the extension of `path` selects the document pipeline
    pub fn is_document(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.markdown.iter().any(|candidate| {
            candidate
                .trim_start_matches('.')
                .eq_ignore_ascii_case(ext)
        })
    }

    /// Whether a media base name matches one of the cover patterns
    pub fn is_cover(&self, base_name: &str) -> bool {
        self.cover_patterns.iter().any(|re| re.is_match(base_name))
    }
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            RegexBuilder::new(&glob_to_regex(pattern))
                .case_insensitive(true)
                .build()
                .map_err(|source| ConfigError::PatternError {
                    pattern: pattern.clone(),
                    source,
                })
        })
        .collect()
}

/// Translate a shell glob (`*`, `?`) into an anchored regex
fn glob_to_regex(glob: &str) -> String {
    let mut re = String::with_capacity(glob.len() + 8);
    re.push('^');
    for ch in glob.chars() {
        match ch {
            '*' => re.push_str("[^/]*"),
            '?' => re.push_str("[^/]"),
            other => re.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    re.push('$');
    re
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.metadata, PathBuf::from("metadata.yaml"));
        assert_eq!(config.stylesheet, Some(PathBuf::from("style.css")));
        assert!(config.markdown.contains(&".md".to_string()));
        assert!(config.is_cover("cover.jpg"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml("covers: [\"front.*\", \"jacket.png\"]\n").unwrap();
        assert!(config.is_cover("front.svg"));
        assert!(config.is_cover("Jacket.PNG"));
        assert!(!config.is_cover("cover.jpg"));
        assert_eq!(config.metadata, PathBuf::from("metadata.yaml"));
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = Config::from_yaml("").unwrap();
        assert_eq!(config.covers, vec!["cover.*".to_string()]);
    }

    #[test]
    fn test_document_extension_is_case_insensitive() {
        let config = Config::default();
        assert!(config.is_document(Path::new("chapter.md")));
        assert!(config.is_document(Path::new("part/Chapter.MARKDOWN")));
        assert!(!config.is_document(Path::new("cover.jpg")));
        assert!(!config.is_document(Path::new("README")));
    }

    #[test]
    fn test_glob_question_mark_and_literals() {
        let config = Config::from_yaml("covers: [\"cover?.png\", \"a+b.jpg\"]").unwrap();
        assert!(config.is_cover("cover1.png"));
        assert!(!config.is_cover("cover10.png"));
        assert!(config.is_cover("a+b.jpg"));
        assert!(!config.is_cover("aab.jpg"));
    }

    #[test]
    fn test_stylesheet_can_be_disabled() {
        let config = Config::from_yaml("stylesheet: null").unwrap();
        assert!(config.stylesheet.is_none());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert!(config.config_path().is_none());
    }
}
