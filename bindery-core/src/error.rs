use crate::archive::ArchiveError;
use crate::config::ConfigError;
use crate::frontmatter::FrontmatterError;
use crate::paths::PathError;
use crate::publication::PublicationError;
use crate::template::RenderError;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal compile failure
///
/// Processing variants carry the source-relative path of the entry that
/// failed. Recoverable traversal errors never surface here.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Source {0:?} is not a directory")]
    SourceNotDirectory(PathBuf),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Publication(#[from] PublicationError),

    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid front matter in {path:?}: {source}")]
    Frontmatter {
        path: PathBuf,
        source: FrontmatterError,
    },

    #[error("Stylesheet link for {path:?}: {source}")]
    Stylesheet { path: PathBuf, source: PathError },

    #[error("Rendering {path:?}: {source}")]
    Render { path: PathBuf, source: RenderError },

    #[error("Writing {path:?} to the archive: {source}")]
    Archive {
        path: PathBuf,
        source: ArchiveError,
    },

    #[error("Opening archive: {0}")]
    Open(#[source] ArchiveError),

    #[error("Closing archive: {0}")]
    Close(#[source] ArchiveError),
}

pub type Result<T, E = CompileError> = std::result::Result<T, E>;
