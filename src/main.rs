#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # plymi
//!
//! Command line tool for maintaining the "Python Like You Mean It" course
//! material: listing the indexing exercise problems, converting source
//! documents between notebook and markdown via jupytext, and publishing a
//! fresh documentation build.

use std::path::PathBuf;

use anyhow::Result;
use bpaf::*;
use plymi::{
    convert::{self, Format, JupytextConverter, SourceLayout},
    grade::ProblemSet,
    publish::publish_build,
};
use tabled::{Table, settings::Style};
use tracing::{Level, metadata::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Top-level CLI commands.
#[derive(Debug, Clone)]
enum Cmd {
    /// List the indexing exercise problems
    Problems {
        /// Print as JSON instead of a table
        json: bool,
    },
    /// Convert all course notebooks to markdown
    ToMarkdown(PathBuf),
    /// Convert all course markdown sources to notebooks
    ToNotebook(PathBuf),
    /// Convert a single directory
    ConvertDir {
        /// Target format
        to:  Format,
        /// Directory holding the files to convert
        dir: PathBuf,
    },
    /// Replace the published docs with a fresh build
    Publish(PathBuf),
}

/// Parse the command line arguments and return a `Cmd` enum
fn options() -> Cmd {
    /// parses the course material root directory
    fn root() -> impl Parser<PathBuf> {
        positional("ROOT").help("Path to the course material root")
    }

    let json = long("json")
        .help("Print the problem list as JSON")
        .switch();
    let problems = construct!(Cmd::Problems { json })
        .to_options()
        .command("problems")
        .help("List the indexing exercise problems");

    let to_markdown = construct!(Cmd::ToMarkdown(root()))
        .to_options()
        .command("to-markdown")
        .help("Convert all course notebooks to markdown");

    let to_notebook = construct!(Cmd::ToNotebook(root()))
        .to_options()
        .command("to-notebook")
        .help("Convert all course markdown sources to notebooks");

    let to = long("to")
        .help("Target format: markdown or notebook")
        .argument::<Format>("FORMAT");
    let dir = positional::<PathBuf>("DIR")
        .help("Directory in which files will be found/converted");
    let convert_dir = construct!(Cmd::ConvertDir { to, dir })
        .to_options()
        .command("convert")
        .help("Convert the files in a single directory");

    let publish = construct!(Cmd::Publish(root()))
        .to_options()
        .command("publish")
        .help("Back up docs/ and replace it with the fresh sphinx build");

    let cmd = construct!([problems, to_markdown, to_notebook, convert_dir, publish]);

    cmd.to_options()
        .descr("Course material tool for Python Like You Mean It")
        .run()
}

#[tokio::main]
async fn main() -> Result<()> {
    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false);
    let filter_layer = LevelFilter::from_level(Level::INFO);
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();

    match options() {
        Cmd::Problems { json } => {
            let summaries = ProblemSet::indexing_3d().summaries();
            if json {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else {
                println!("{}", Table::new(&summaries).with(Style::modern()));
            }
        }
        Cmd::ToMarkdown(root) => {
            let converter = JupytextConverter::discover()?;
            let layout = SourceLayout::new(root);
            let count = convert::convert_notebook_to_markdown(&converter, &layout).await?;
            println!("Converted {count} notebook(s) to markdown");
        }
        Cmd::ToNotebook(root) => {
            let converter = JupytextConverter::discover()?;
            let layout = SourceLayout::new(root);
            let count = convert::convert_markdown_to_notebook(&converter, &layout).await?;
            println!("Converted {count} markdown file(s) to notebooks");
        }
        Cmd::ConvertDir { to, dir } => {
            let converter = JupytextConverter::discover()?;
            let count = convert::convert_dir(&converter, &dir, to).await?;
            println!("Converted {count} file(s) to {to}");
        }
        Cmd::Publish(root) => {
            publish_build(&root)?;
            println!("Published build to docs/ (previous docs moved to docs_backup/)");
        }
    };

    Ok(())
}
