//! # plymi
//!
//! Tooling for the "Python Like You Mean It" course material: a grader for
//! the NumPy-style 3-D indexing exercises, utilities for converting source
//! material between notebook and markdown formats via jupytext, and a
//! publishing step for built documentation.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// A module defining a bunch of constant values to be used throughout
pub mod constants;
/// Notebook/markdown conversion over the course source layout
pub mod convert;
/// For all things related to grading the indexing exercises
pub mod grade;
/// Subprocess spawning and output collection
pub mod process;
/// For backing up and replacing the published documentation
pub mod publish;
/// Utility functions for convenience
pub mod util;

pub use convert::{Converter, Format, JupytextConverter, SourceLayout};
pub use grade::{Answer, CheckFailure, IndexGrader, ProblemSet, grade_indexing};
pub use publish::publish_build;
