#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Replaces the served documentation with a fresh sphinx build, keeping a
//! backup of the previous publication.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, ensure};
use bon::Builder;
use tracing::info;

use crate::constants::{CNAME_FILE, DOCS_BACKUP_DIR, DOCS_DIR, NOJEKYLL_MARKER, SPHINX_BUILD_DIR};

/// Directory configuration for a publish run, relative to a repository
/// root.
#[derive(Debug, Clone, Builder)]
pub struct PublishLayout {
    /// Repository root the other paths are resolved against.
    #[builder(into)]
    root:            PathBuf,
    /// Served documentation directory.
    #[builder(default = PathBuf::from(DOCS_DIR), into)]
    docs_dir:        PathBuf,
    /// Fresh build directory.
    #[builder(default = PathBuf::from(SPHINX_BUILD_DIR), into)]
    build_dir:       PathBuf,
    /// Where the previous publication is moved.
    #[builder(default = PathBuf::from(DOCS_BACKUP_DIR), into)]
    backup_dir:      PathBuf,
    /// Pages marker file the build must carry.
    #[builder(default = NOJEKYLL_MARKER.to_string(), into)]
    nojekyll_marker: String,
    /// Custom-domain file carried from the docs into the build.
    #[builder(default = CNAME_FILE.to_string(), into)]
    cname_file:      String,
}

impl PublishLayout {
    /// Publishes the build: backs up the current docs directory, copies the
    /// build in its place, and verifies the Pages marker files.
    ///
    /// Every precondition failure aborts before the step it guards mutates
    /// anything; there is no retry or rollback.
    pub fn publish(&self) -> Result<()> {
        let docs = self.root.join(&self.docs_dir);
        let build = self.root.join(&self.build_dir);
        let backup = self.root.join(&self.backup_dir);

        ensure!(docs.is_dir(), "{} is not a directory", docs.display());
        ensure!(build.is_dir(), "{} is not a directory", build.display());

        fs::copy(docs.join(&self.cname_file), build.join(&self.cname_file)).with_context(|| {
            format!("Could not copy {} into {}", self.cname_file, build.display())
        })?;
        ensure!(
            build.join(&self.nojekyll_marker).is_file(),
            "{} is missing from {}",
            self.nojekyll_marker,
            build.display()
        );

        if backup.is_dir() {
            fs::remove_dir_all(&backup)
                .with_context(|| format!("Could not delete {}", backup.display()))?;
        }
        info!("backing up {} to {}", docs.display(), backup.display());
        fs::rename(&docs, &backup).with_context(|| {
            format!("Could not move {} to {}", docs.display(), backup.display())
        })?;
        copy_dir_recursive(&build, &docs)?;

        ensure!(
            docs.join(&self.nojekyll_marker).is_file(),
            "{} is missing from {}",
            self.nojekyll_marker,
            docs.display()
        );
        ensure!(
            docs.join(&self.cname_file).is_file(),
            "{} is missing from {}",
            self.cname_file,
            docs.display()
        );
        info!("published {} to {}", build.display(), docs.display());
        Ok(())
    }
}

/// Publishes with the standard directory names under `root`.
pub fn publish_build(root: &Path) -> Result<()> {
    PublishLayout::builder().root(root).build().publish()
}

/// Copies `src` into `dst` recursively, creating `dst`.
fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst).with_context(|| format!("Could not create {}", dst.display()))?;
    for entry in
        fs::read_dir(src).with_context(|| format!("Could not read {}", src.display()))?
    {
        let entry = entry.context("Could not read directory entry")?;
        let target = dst.join(entry.file_name());
        if entry
            .file_type()
            .context("Could not stat directory entry")?
            .is_dir()
        {
            copy_dir_recursive(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)
                .with_context(|| format!("Could not copy {}", entry.path().display()))?;
        }
    }
    Ok(())
}
