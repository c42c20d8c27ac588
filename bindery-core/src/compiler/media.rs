use super::Compiler;
use crate::archive::{ArchiveWriter, ContentType};
use crate::error::{CompileError, Result};
use crate::paths::to_slash;
use std::path::Path;
use tracing::debug;

const COVER_PROPERTY: &str = "cover-image";

impl<A: ArchiveWriter> Compiler<'_, A> {
    /// Copy one media file into the archive, marking the first cover match
    pub(super) fn add_media(&mut self, path: &Path) -> Result<()> {
        let name = to_slash(path);
        let base_name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        let mut properties = Vec::new();
        if self.config.is_cover(&base_name) && self.cover.try_claim() {
            debug!("Using {} as cover image", name);
            properties.push(COVER_PROPERTY.to_string());
            self.cover_name = Some(name.clone());
        }

        debug!("Adding media {}", name);
        self.archive
            .add_file(&self.root.join(path), &name, ContentType::Media, &properties)
            .map_err(|source| CompileError::Archive {
                path: path.to_path_buf(),
                source,
            })
    }
}
