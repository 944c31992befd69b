//! Tests for the conversion pipeline, run against an injected fake
//! converter so jupytext is never required.

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::bail;
use plymi::{
    constants::DEFAULT_SOURCE_DIRS,
    convert::{self, Converter, Format, JupytextConverter, SourceLayout},
};
use uuid::Uuid;

/// Records conversion requests instead of invoking a subprocess.
#[derive(Default)]
struct FakeConverter {
    calls: Mutex<Vec<(PathBuf, Format)>>,
}

impl FakeConverter {
    fn calls(&self) -> Vec<(PathBuf, Format)> {
        self.calls.lock().expect("lock").clone()
    }
}

impl Converter for FakeConverter {
    async fn convert(&self, file: &Path, target: Format) -> anyhow::Result<()> {
        self.calls
            .lock()
            .expect("lock")
            .push((file.to_path_buf(), target));
        Ok(())
    }

    async fn version(&self) -> anyhow::Result<String> {
        Ok("fake-jupytext 1.0".to_string())
    }
}

/// A converter whose conversions always fail.
struct BrokenConverter;

impl Converter for BrokenConverter {
    async fn convert(&self, _file: &Path, _target: Format) -> anyhow::Result<()> {
        bail!("conversion backend unavailable")
    }

    async fn version(&self) -> anyhow::Result<String> {
        Ok("broken 0.0".to_string())
    }
}

fn scratch_course() -> PathBuf {
    let root = std::env::temp_dir().join(format!("plymi-convert-{}", Uuid::new_v4()));
    for dir in DEFAULT_SOURCE_DIRS {
        fs::create_dir_all(root.join(dir)).expect("create module dir");
    }
    root
}

#[tokio::test]
async fn converts_every_notebook_in_sorted_order() {
    let root = scratch_course();
    fs::write(root.join("Module1_GettingStartedWithPython/b_notebook.ipynb"), "{}").unwrap();
    fs::write(root.join("Module1_GettingStartedWithPython/a_notebook.ipynb"), "{}").unwrap();
    fs::write(root.join("Module4_OOP/classes.ipynb"), "{}").unwrap();
    // A markdown file must be ignored when converting notebooks.
    fs::write(root.join("Module4_OOP/notes.md"), "# notes").unwrap();

    let converter = FakeConverter::default();
    let layout = SourceLayout::new(&root);
    let count = convert::convert_notebook_to_markdown(&converter, &layout)
        .await
        .expect("conversion runs");

    assert_eq!(count, 3);
    let calls = converter.calls();
    assert_eq!(calls.len(), 3);
    assert!(calls.iter().all(|(_, target)| *target == Format::Markdown));
    // Within Module1, files come back sorted.
    assert!(calls[0].0.ends_with("a_notebook.ipynb"));
    assert!(calls[1].0.ends_with("b_notebook.ipynb"));

    let _ = fs::remove_dir_all(root);
}

#[tokio::test]
async fn excluded_file_names_are_skipped() {
    let root = scratch_course();
    fs::write(root.join("Module2_EssentialsOfPython/keep.md"), "# keep").unwrap();
    fs::write(root.join("Module2_EssentialsOfPython/skip.md"), "# skip").unwrap();

    let converter = FakeConverter::default();
    let layout = SourceLayout::builder()
        .root(&root)
        .excluded_files(HashSet::from(["skip.md".to_string()]))
        .build();
    let count = convert::convert_markdown_to_notebook(&converter, &layout)
        .await
        .expect("conversion runs");

    assert_eq!(count, 1);
    let calls = converter.calls();
    assert!(calls[0].0.ends_with("keep.md"));
    assert_eq!(calls[0].1, Format::Notebook);

    let _ = fs::remove_dir_all(root);
}

#[tokio::test]
async fn missing_module_directories_are_reported_together() {
    let root = scratch_course();
    fs::remove_dir_all(root.join("Module4_OOP")).unwrap();
    fs::remove_dir_all(root.join("Module5_OddsAndEnds")).unwrap();

    let converter = FakeConverter::default();
    let layout = SourceLayout::new(&root);
    let err = convert::convert_notebook_to_markdown(&converter, &layout)
        .await
        .expect_err("missing dirs");

    let message = err.to_string();
    assert!(message.contains("Module4_OOP"), "{message}");
    assert!(message.contains("Module5_OddsAndEnds"), "{message}");
    assert!(message.contains("are not directories"), "{message}");
    assert!(converter.calls().is_empty(), "nothing should be converted");

    let _ = fs::remove_dir_all(root);
}

#[tokio::test]
async fn custom_source_dirs_override_the_course_layout() {
    let root = std::env::temp_dir().join(format!("plymi-custom-{}", Uuid::new_v4()));
    fs::create_dir_all(root.join("drafts")).unwrap();
    fs::write(root.join("drafts/one.md"), "# one").unwrap();

    let converter = FakeConverter::default();
    let layout = SourceLayout::builder()
        .root(&root)
        .source_dirs(vec![PathBuf::from("drafts")])
        .build();
    let count = convert::convert_markdown_to_notebook(&converter, &layout)
        .await
        .expect("conversion runs");

    assert_eq!(count, 1);

    let _ = fs::remove_dir_all(root);
}

#[tokio::test]
async fn convert_dir_handles_a_single_directory() {
    let root = std::env::temp_dir().join(format!("plymi-dir-{}", Uuid::new_v4()));
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("first.md"), "# 1").unwrap();
    fs::write(root.join("second.md"), "# 2").unwrap();
    fs::write(root.join("unrelated.txt"), "text").unwrap();

    let converter = FakeConverter::default();
    let count = convert::convert_dir(&converter, &root, Format::Notebook)
        .await
        .expect("conversion runs");

    assert_eq!(count, 2);
    let calls = converter.calls();
    assert!(calls[0].0.ends_with("first.md"));
    assert!(calls[1].0.ends_with("second.md"));

    let _ = fs::remove_dir_all(root);
}

#[tokio::test]
async fn convert_dir_rejects_a_missing_directory() {
    let root = std::env::temp_dir().join(format!("plymi-missing-{}", Uuid::new_v4()));

    let converter = FakeConverter::default();
    let err = convert::convert_dir(&converter, &root, Format::Markdown)
        .await
        .expect_err("missing dir");
    assert!(err.to_string().contains("is not a directory"), "{err}");
}

#[tokio::test]
async fn backend_failures_name_the_offending_file() {
    let root = std::env::temp_dir().join(format!("plymi-broken-{}", Uuid::new_v4()));
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("doomed.md"), "# doomed").unwrap();

    let err = convert::convert_dir(&BrokenConverter, &root, Format::Notebook)
        .await
        .expect_err("backend fails");
    let chain = format!("{err:#}");
    assert!(chain.contains("doomed.md"), "{chain}");
    assert!(chain.contains("conversion backend unavailable"), "{chain}");

    let _ = fs::remove_dir_all(root);
}

#[tokio::test]
async fn an_explicit_binary_bypasses_path_discovery() {
    // The path is never searched, so the failure is the spawn itself.
    let converter = JupytextConverter::with_binary("/nonexistent/jupytext");
    let err = converter.version().await.expect_err("binary cannot spawn");
    assert!(format!("{err:#}").contains("failed to spawn process"), "{err:#}");
}

#[test]
fn layouts_expose_their_root() {
    let layout = SourceLayout::new("/course/material");
    assert_eq!(layout.root(), Path::new("/course/material"));
}

#[test]
fn format_parsing_and_helpers() {
    assert_eq!("markdown".parse::<Format>().unwrap(), Format::Markdown);
    assert_eq!("md".parse::<Format>().unwrap(), Format::Markdown);
    assert_eq!("notebook".parse::<Format>().unwrap(), Format::Notebook);
    assert_eq!("IPYNB".parse::<Format>().unwrap(), Format::Notebook);
    assert!("rst".parse::<Format>().is_err());

    assert_eq!(Format::Markdown.extension(), "md");
    assert_eq!(Format::Notebook.extension(), "ipynb");
    assert_eq!(Format::Markdown.counterpart(), Format::Notebook);
    assert_eq!(Format::Notebook.jupytext_arg(), "notebook");
    assert_eq!(Format::Markdown.to_string(), "markdown");
}
