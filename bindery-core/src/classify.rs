//! Sorting source tree entries into the document and media pipelines.

use crate::config::{Config, CONFIG_FILENAME};
use std::path::{Path, PathBuf};

/// What the compiler does with one tree entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    /// Hidden directory: nothing below it is visited
    SkipSubtree,
    Skip,
    Document,
    Media,
}

/// Naming-convention classifier over paths relative to the source root
#[derive(Debug, Clone)]
pub struct Classifier<'a> {
    config: &'a Config,
    reserved: Vec<PathBuf>,
}

impl<'a> Classifier<'a> {
    /// Reserve the metadata file and the build configuration under `root`
    pub fn new(config: &'a Config, root: &Path) -> Self {
        let mut reserved = vec![config.metadata.clone(), PathBuf::from(CONFIG_FILENAME)];
        if let Some(path) = config.config_path() {
            if let Ok(relative) = path.strip_prefix(root) {
                reserved.push(relative.to_path_buf());
            }
        }
        Self { config, reserved }
    }

    pub fn classify(&self, path: &Path, is_dir: bool) -> Class {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if is_dir {
            return if name.starts_with('.') && name.len() > 1 {
                Class::SkipSubtree
            } else {
                Class::Skip
            };
        }
        if name.starts_with('.') || name.starts_with('~') {
            return Class::Skip;
        }
        if self.reserved.iter().any(|reserved| reserved == path) {
            return Class::Skip;
        }
        if self.config.is_document(path) {
            Class::Document
        } else {
            Class::Media
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(path: &str, is_dir: bool) -> Class {
        let config = Config::default();
        Classifier::new(&config, Path::new("/book")).classify(Path::new(path), is_dir)
    }

    #[test]
    fn test_hidden_directories_prune_subtree() {
        assert_eq!(classify(".draft", true), Class::SkipSubtree);
        assert_eq!(classify("part/.git", true), Class::SkipSubtree);
        assert_eq!(classify("part", true), Class::Skip);
        assert_eq!(classify("~old", true), Class::Skip);
    }

    #[test]
    fn test_hidden_and_backup_files_skipped() {
        assert_eq!(classify(".DS_Store", false), Class::Skip);
        assert_eq!(classify("text/~chapter.md", false), Class::Skip);
        assert_eq!(classify("text/.chapter.md.swp", false), Class::Skip);
    }

    #[test]
    fn test_reserved_files_skipped() {
        assert_eq!(classify("metadata.yaml", false), Class::Skip);
        assert_eq!(classify("bindery.yml", false), Class::Skip);
        // Only at the root
        assert_eq!(classify("notes/metadata.yaml", false), Class::Media);
    }

    #[test]
    fn test_documents_by_extension() {
        assert_eq!(classify("index.md", false), Class::Document);
        assert_eq!(classify("part/Chapter.MARKDOWN", false), Class::Document);
        assert_eq!(classify("cover.jpg", false), Class::Media);
        assert_eq!(classify("README", false), Class::Media);
    }

    #[test]
    fn test_custom_config_file_reserved() {
        let config = Config::from_yaml("metadata: book.yaml\n").unwrap();
        let classifier = Classifier::new(&config, Path::new("/book"));
        assert_eq!(classifier.classify(Path::new("book.yaml"), false), Class::Skip);
        assert_eq!(classifier.classify(Path::new("metadata.yaml"), false), Class::Media);
    }
}
