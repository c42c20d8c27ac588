//! Build command implementation.

use super::{load_config, source_root};
use anyhow::{Context, Result};
use bindery_core::compile;
use bindery_render::Templates;
use std::path::{Path, PathBuf};

/// Compile the source tree into an EPUB file
pub fn build_book(
    source: Option<&Path>,
    output: Option<&Path>,
    config_path: Option<&Path>,
) -> Result<()> {
    let root = source_root(source);
    let config = load_config(&root, config_path)?;
    let output = match output {
        Some(path) => path.to_path_buf(),
        None => default_output(&root)?,
    };

    let report = compile(&root, &output, &config, &Templates::new())
        .with_context(|| format!("Failed to compile {:?}", root))?;

    println!(
        "✓ Wrote {:?}: {} documents, {} media files",
        output, report.documents, report.media
    );
    match &report.cover {
        Some(cover) => println!("  - Cover image: {}", cover),
        None => println!("  - No cover image"),
    }
    if report.synthesized_toc {
        println!(
            "  - Synthesized table of contents with {} entries",
            report.navigation.len()
        );
    }
    Ok(())
}

/// `<source-dir-name>.epub`, next to the source directory
fn default_output(root: &Path) -> Result<PathBuf> {
    let absolute = root
        .canonicalize()
        .with_context(|| format!("Failed to resolve {:?}", root))?;
    let name = absolute
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("book"));
    let parent = absolute.parent().unwrap_or(&absolute);
    Ok(parent.join(format!("{}.epub", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_sits_next_to_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("my-book");
        std::fs::create_dir(&source).unwrap();

        let output = default_output(&source).unwrap();
        assert_eq!(output.file_name().unwrap(), "my-book.epub");
        assert_eq!(output.parent().unwrap(), dir.path().canonicalize().unwrap());
    }
}
