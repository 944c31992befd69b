#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Conversion of course source documents between notebook and markdown,
//! driven by a converter the callers inject.

use std::{
    collections::HashSet,
    ffi::OsString,
    fmt::{self, Display},
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{Context, Result, bail, ensure};
use bon::Builder;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    constants::DEFAULT_SOURCE_DIRS,
    process::run_collect,
    util::{jupytext_path, sorted_files_with_extension},
};

/// Document formats jupytext converts between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    /// Jupytext-flavored markdown (`.md`).
    Markdown,
    /// Jupyter notebook (`.ipynb`).
    Notebook,
}

impl Format {
    /// File extension for documents in this format.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Markdown => "md",
            Format::Notebook => "ipynb",
        }
    }

    /// Name jupytext's `--to` flag expects.
    pub fn jupytext_arg(self) -> &'static str {
        match self {
            Format::Markdown => "markdown",
            Format::Notebook => "notebook",
        }
    }

    /// The format a conversion into `self` reads from.
    pub fn counterpart(self) -> Self {
        match self {
            Format::Markdown => Format::Notebook,
            Format::Notebook => Format::Markdown,
        }
    }
}

impl Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.jupytext_arg())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(Format::Markdown),
            "notebook" | "ipynb" => Ok(Format::Notebook),
            other => Err(format!(
                "unknown format `{other}`; expected markdown or notebook"
            )),
        }
    }
}

/// In-place document conversion, abstracted so the batch functions can be
/// exercised without jupytext installed.
#[allow(async_fn_in_trait)]
pub trait Converter {
    /// Converts `file` in place into `target` format.
    async fn convert(&self, file: &Path, target: Format) -> Result<()>;

    /// Version string reported by the underlying tool.
    async fn version(&self) -> Result<String>;
}

/// Runs the real jupytext binary. Only its exit status is inspected.
#[derive(Debug, Clone)]
pub struct JupytextConverter {
    /// Resolved path of the jupytext binary.
    binary: OsString,
}

impl JupytextConverter {
    /// Locates jupytext on the path.
    pub fn discover() -> Result<Self> {
        Ok(Self {
            binary: jupytext_path()?,
        })
    }

    /// Uses an explicit binary instead of searching the path.
    pub fn with_binary(binary: impl Into<OsString>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Converter for JupytextConverter {
    async fn convert(&self, file: &Path, target: Format) -> Result<()> {
        let args = vec![
            OsString::from("--to"),
            OsString::from(target.jupytext_arg()),
            file.as_os_str().to_os_string(),
        ];
        let collected = run_collect(&self.binary, &args, None).await?;
        ensure!(
            collected.status.success(),
            "jupytext failed on {}: {}",
            file.display(),
            collected.stderr_utf8()
        );
        Ok(())
    }

    async fn version(&self) -> Result<String> {
        let collected = run_collect(&self.binary, &[OsString::from("--version")], None).await?;
        ensure!(
            collected.status.success(),
            "jupytext --version failed: {}",
            collected.stderr_utf8()
        );
        Ok(collected.stdout_utf8().trim().to_string())
    }
}

/// Where convertible course material lives. Passed explicitly to the batch
/// functions; nothing here is ambient state.
#[derive(Debug, Clone, Builder)]
pub struct SourceLayout {
    /// Top-level directory containing the course modules.
    #[builder(into)]
    root:           PathBuf,
    /// Module directories, relative to the root.
    #[builder(default = default_source_dirs())]
    source_dirs:    Vec<PathBuf>,
    /// File names (not paths) skipped during conversion.
    #[builder(default)]
    excluded_files: HashSet<String>,
}

/// The standard course module directories.
fn default_source_dirs() -> Vec<PathBuf> {
    DEFAULT_SOURCE_DIRS.iter().map(PathBuf::from).collect()
}

impl SourceLayout {
    /// Layout with the standard module directories under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::builder().root(root).build()
    }

    /// Root directory of the course material.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves the source directories against the root, insisting that the
    /// root and every module directory exist.
    fn resolved_dirs(&self) -> Result<Vec<PathBuf>> {
        ensure!(
            self.root.is_dir(),
            "{} is not a directory",
            self.root.display()
        );

        let dirs: Vec<PathBuf> = self
            .source_dirs
            .iter()
            .map(|dir| self.root.join(dir))
            .collect();
        let missing: Vec<String> = dirs
            .iter()
            .filter(|dir| !dir.is_dir())
            .map(|dir| dir.display().to_string())
            .collect();
        if !missing.is_empty() {
            bail!("{} are not directories", missing.iter().join(", "));
        }
        Ok(dirs)
    }

    /// Per-directory sorted listings of files with the given extension,
    /// minus the excluded names.
    pub fn files_with_extension(&self, extension: &str) -> Result<Vec<(PathBuf, Vec<PathBuf>)>> {
        let mut listings = Vec::new();
        for dir in self.resolved_dirs()? {
            let files: Vec<PathBuf> = sorted_files_with_extension(&dir, extension)?
                .into_iter()
                .filter(|file| {
                    file.file_name()
                        .and_then(|name| name.to_str())
                        .is_none_or(|name| !self.excluded_files.contains(name))
                })
                .collect();
            listings.push((dir, files));
        }
        Ok(listings)
    }
}

/// Converts every file in the layout whose format is the counterpart of
/// `target`, returning how many files were converted.
pub async fn convert_all<C: Converter>(
    converter: &C,
    layout: &SourceLayout,
    target: Format,
) -> Result<usize> {
    let version = converter.version().await?;
    info!("using jupytext version: {version}");

    let mut converted = 0;
    for (dir, files) in layout.files_with_extension(target.counterpart().extension())? {
        info!("processing directory: {}", dir.display());
        for file in files {
            converter
                .convert(&file, target)
                .await
                .with_context(|| format!("Could not convert {}", file.display()))?;
            converted += 1;
        }
    }
    Ok(converted)
}

/// Converts all course markdown sources into notebooks.
pub async fn convert_markdown_to_notebook<C: Converter>(
    converter: &C,
    layout: &SourceLayout,
) -> Result<usize> {
    convert_all(converter, layout, Format::Notebook).await
}

/// Converts all course notebooks into markdown sources.
pub async fn convert_notebook_to_markdown<C: Converter>(
    converter: &C,
    layout: &SourceLayout,
) -> Result<usize> {
    convert_all(converter, layout, Format::Markdown).await
}

/// Converts every counterpart-format file directly inside one directory.
pub async fn convert_dir<C: Converter>(
    converter: &C,
    dir: &Path,
    target: Format,
) -> Result<usize> {
    ensure!(dir.is_dir(), "{} is not a directory", dir.display());

    let files = sorted_files_with_extension(dir, target.counterpart().extension())?;
    for file in &files {
        if let Some(name) = file.file_name() {
            info!("converting {}", name.to_string_lossy());
        }
        converter
            .convert(file, target)
            .await
            .with_context(|| format!("Could not convert {}", file.display()))?;
    }
    Ok(files.len())
}
