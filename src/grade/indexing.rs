#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! The grading pipeline for the 3-D indexing exercises.

use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
};

use anyhow::Result;
use approx::AbsDiffEq;
use bon::Builder;
use colored::Colorize;
use ndarray::{Array, Array3, ArrayView, ArrayView3, ArrayViewD, CowArray, Dimension, IxDyn};
use thiserror::Error;

use super::{
    problems::{Problem, ProblemSet, ResultKind},
    reference::reference_array,
    results::{Grade, GradeResult},
};
use crate::constants::PROVENANCE_SENTINEL;

/// Absolute tolerance for allclose-style value comparison.
const VALUE_EPSILON: f64 = 1e-8;

/// Value a student's indexing function hands back to the grader.
#[derive(Debug)]
pub enum Answer<'a> {
    /// A single element extracted with a full index.
    Item(f64),
    /// A sub-array. A slice of the input borrows its storage; a
    /// disconnected copy owns it, and fails the provenance check on
    /// view-producing problems.
    Subarray(CowArray<'a, f64, IxDyn>),
}

impl Answer<'_> {
    /// Classification of this answer, for comparison against the problem's
    /// expected result kind.
    fn kind(&self) -> ResultKind {
        match self {
            Answer::Item(_) => ResultKind::Item,
            Answer::Subarray(_) => ResultKind::Subarray,
        }
    }
}

impl<'a> From<f64> for Answer<'a> {
    fn from(value: f64) -> Self {
        Answer::Item(value)
    }
}

impl<'a, D: Dimension> From<ArrayView<'a, f64, D>> for Answer<'a> {
    fn from(view: ArrayView<'a, f64, D>) -> Self {
        Answer::Subarray(view.into_dyn().into())
    }
}

impl<'a, D: Dimension> From<Array<f64, D>> for Answer<'a> {
    fn from(array: Array<f64, D>) -> Self {
        Answer::Subarray(CowArray::from(array.into_dyn()))
    }
}

/// Shape a student solution must take: given a view of the reference array,
/// return an answer, or `None` the way a Python function with no `return`
/// statement would.
pub trait StudentFn: for<'a> Fn(ArrayView3<'a, f64>) -> Option<Answer<'a>> {}

impl<F> StudentFn for F where F: for<'a> Fn(ArrayView3<'a, f64>) -> Option<Answer<'a>> {}

/// A failed grading check.
///
/// There is one uniform failure category; variants exist only to carry the
/// message shown to the student, matching the course handout wording.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckFailure {
    /// The student's function panicked when invoked.
    #[error("TEST FAILED: Your code raised the following error:\n\t{0}")]
    Raised(String),
    /// The student's function returned no value at all.
    #[error(
        "TEST FAILED: Your function returned `None`.\nMake sure that you have included a \
         `return` statement in your function."
    )]
    ReturnedNone,
    /// An item came back where a sub-array was expected, or vice versa.
    #[error(
        "TEST FAILED:\nYour function returned an object with the data \
         type:\n{observed}\n\nGrader expected the data type:\n{expected}"
    )]
    WrongKind {
        /// Data type the student's function returned.
        observed: String,
        /// Data type the grader expected.
        expected: String,
    },
    /// A sub-array was returned but it does not alias the input's buffer.
    #[error("TEST FAILED: The array you returned did not come from the original array.")]
    NotFromOriginal,
    /// Re-invoking on a tainted copy did not surface the sentinel, so the
    /// returned item was not read from the input.
    #[error("TEST FAILED: The item you returned did not come from input array")]
    HardcodedItem,
    /// Values (or shapes) do not match the expected result.
    #[error("TEST FAILED:\n\nYour function returned:\n{observed}\n\nGrader expected:\n{expected}")]
    WrongValue {
        /// Rendering of the student's result.
        observed: String,
        /// Rendering of the expected result.
        expected: String,
    },
}

/// Grades one student function against one indexing problem.
#[derive(Debug, Clone, Builder)]
#[builder(on(String, into))]
pub struct IndexGrader {
    /// The problem being graded.
    problem:  Problem,
    /// Requirement name for reporting; defaults to `Problem N`.
    req_name: Option<String>,
    /// Total points available.
    #[builder(default = 1.0)]
    out_of:   f64,
}

impl IndexGrader {
    /// Builds a grader for problem `number` from the standard problem set.
    pub fn for_problem(number: usize) -> Result<Self> {
        let problem = ProblemSet::indexing_3d().get(number)?.clone();
        Ok(Self::builder().problem(problem).build())
    }

    /// The problem this grader checks.
    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    /// Name under which the result is reported.
    fn requirement(&self) -> String {
        self.req_name
            .clone()
            .unwrap_or_else(|| format!("Problem {}", self.problem.number()))
    }

    /// Runs every check against a fresh reference array, short-circuiting
    /// on the first failure, and folds the outcome into a [`GradeResult`].
    pub fn run<F: StudentFn>(&self, student: &F) -> Result<GradeResult> {
        let reference = reference_array();
        let info = self.problem.slice_info()?;
        let expected: ArrayViewD<'_, f64> = reference.view().into_dyn().slice_move(info);

        let (grade, reason) = match self.run_checks(student, &reference, &expected) {
            Ok(()) => (
                Grade::new(self.out_of, self.out_of),
                "All tests passed".to_string(),
            ),
            Err(failure) => (Grade::new(0.0, self.out_of), failure.to_string()),
        };

        Ok(GradeResult::builder()
            .requirement(self.requirement())
            .grade(grade)
            .reason(reason)
            .build())
    }

    /// The check pipeline: invoke, null check, kind check, provenance
    /// check, value check. Stops at the first failure.
    fn run_checks<F: StudentFn>(
        &self,
        student: &F,
        reference: &Array3<f64>,
        expected: &ArrayViewD<'_, f64>,
    ) -> Result<(), CheckFailure> {
        let answer = invoke(student, reference.view())?;
        let answer = answer.ok_or(CheckFailure::ReturnedNone)?;

        match (answer, self.problem.item_index()) {
            (Answer::Item(value), Some(position)) => {
                // Overwrite the expected element in a copy and re-invoke; a
                // hardcoded answer cannot produce the sentinel.
                let mut tainted = reference.clone();
                tainted[position] = PROVENANCE_SENTINEL;
                let reply = invoke(student, tainted.view())?;
                let came_from_input = matches!(
                    reply,
                    Some(Answer::Item(item)) if (item - PROVENANCE_SENTINEL).abs() < f64::EPSILON
                );
                if !came_from_input {
                    return Err(CheckFailure::HardcodedItem);
                }

                let want = reference[position];
                if (value - want).abs() > VALUE_EPSILON {
                    return Err(CheckFailure::WrongValue {
                        observed: value.to_string(),
                        expected: want.to_string(),
                    });
                }
                Ok(())
            }
            (Answer::Subarray(out), None) => {
                if !shares_memory(&out, reference) {
                    return Err(CheckFailure::NotFromOriginal);
                }

                if out.shape() != expected.shape()
                    || !out.view().abs_diff_eq(&expected.view(), VALUE_EPSILON)
                {
                    return Err(CheckFailure::WrongValue {
                        observed: format!("{out}"),
                        expected: format!("{expected}"),
                    });
                }
                Ok(())
            }
            (answer, _) => Err(CheckFailure::WrongKind {
                observed: answer.kind().datatype().to_string(),
                expected: self.problem.kind().datatype().to_string(),
            }),
        }
    }
}

/// Calls the student's function, converting a panic into a check failure.
///
/// The panic hook is silenced for the duration of the call so a panicking
/// solution cannot interleave its backtrace with grader diagnostics, and is
/// restored unconditionally afterwards.
fn invoke<'a, F: StudentFn>(
    student: &F,
    input: ArrayView3<'a, f64>,
) -> Result<Option<Answer<'a>>, CheckFailure> {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| student(input)));
    panic::set_hook(previous);

    outcome.map_err(|payload| CheckFailure::Raised(panic_text(payload.as_ref())))
}

/// Best-effort extraction of a panic payload's message.
fn panic_text(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "unknown error".to_string()
    }
}

/// Whether `view` reads from `base`'s allocation, decided by pointer-range
/// containment of the view's first element.
fn shares_memory(view: &CowArray<'_, f64, IxDyn>, base: &Array3<f64>) -> bool {
    if view.is_empty() {
        return false;
    }
    let start = base.as_ptr() as usize;
    let end = start + base.len() * std::mem::size_of::<f64>();
    let ptr = view.as_ptr() as usize;
    (start..end).contains(&ptr)
}

/// Grades `student` against problem `problem_number`, printing either a
/// success banner or the first failing check's message.
///
/// Check failures are printed, never returned: the `Err` path is reserved
/// for configuration problems such as an unknown problem number.
pub fn grade_indexing<F: StudentFn>(student: &F, problem_number: usize) -> Result<()> {
    println!("Grading problem #{problem_number}...\n");

    let grader = IndexGrader::for_problem(problem_number)?;
    let result = grader.run(student)?;
    if result.passed() {
        println!("{}", "All tests passed!".bright_green().bold());
    } else {
        println!("{}", result.reason().red());
    }
    Ok(())
}
