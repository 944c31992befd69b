#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// The check pipeline and the student-facing grading entry point.
pub mod indexing;
/// Indexing expressions and the fixed problem set.
pub mod problems;
/// The canonical reference array.
pub mod reference;
/// Shared grade result types.
pub mod results;

pub use indexing::{Answer, CheckFailure, IndexGrader, StudentFn, grade_indexing};
pub use problems::{IndexStep, Problem, ProblemSet, ProblemSummary, ResultKind};
pub use reference::reference_array;
pub use results::{Grade, GradeResult, show_results};
