//! Relative path arithmetic for archive names and stylesheet links.

use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Extension of every compiled document
pub const OUTPUT_EXTENSION: &str = "xhtml";

#[derive(Error, Debug)]
pub enum PathError {
    #[error("Cannot express {target:?} relative to {base:?}")]
    NotRelative { base: PathBuf, target: PathBuf },
}

/// Path of `target` as seen from the directory `base`
///
/// Both paths must be relative to the same root and free of `..` components.
pub fn relative_to(base: &Path, target: &Path) -> Result<PathBuf, PathError> {
    let error = || PathError::NotRelative {
        base: base.to_path_buf(),
        target: target.to_path_buf(),
    };

    let base = plain_components(base).ok_or_else(error)?;
    let target = plain_components(target).ok_or_else(error)?;

    let common = base
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base.len() {
        relative.push("..");
    }
    for component in &target[common..] {
        relative.push(component);
    }
    Ok(relative)
}

/// Normal components of a relative path, `.` dropped; `None` for anything else
fn plain_components(path: &Path) -> Option<Vec<&std::ffi::OsStr>> {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .map(|c| match c {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect()
}

/// Forward-slash form of a relative path; `.` components are dropped
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            Component::ParentDir => Some("..".into()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Archive name of the document compiled from `source`
pub fn output_name(source: &Path) -> String {
    to_slash(&source.with_extension(OUTPUT_EXTENSION))
}
