#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use glob::glob;
use which::which;

/// Finds and returns the path to the jupytext binary
pub fn jupytext_path() -> Result<OsString> {
    which("jupytext")
        .map(PathBuf::into_os_string)
        .context("Cannot find jupytext on path (jupytext)")
}

/// Returns all files with the given extension directly inside `dir`, sorted
/// by path so conversion runs in a stable order.
///
/// * `dir`: the directory to look in (not recursed into)
/// * `extension`: the file extension to find paths for
pub fn sorted_files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let pattern = dir.join(format!("*.{extension}"));
    let pattern = pattern
        .to_str()
        .context("Could not convert directory to string")?
        .to_string();

    let mut files: Vec<PathBuf> = glob(&pattern)
        .context("Could not create glob")?
        .filter_map(Result::ok)
        .collect();
    files.sort();
    Ok(files)
}
