#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! The indexing problems, held as data so the grader can classify each one
//! up front instead of sniffing result types at check time.

use std::fmt::{self, Display};

use anyhow::{Context, Result};
use itertools::Itertools;
use ndarray::{IxDyn, SliceInfo, SliceInfoElem};
use serde::Serialize;
use tabled::Tabled;

use crate::constants::REFERENCE_RANK;

/// One component of an indexing expression over the reference array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IndexStep {
    /// Select a single position along the axis, dropping the axis.
    At(usize),
    /// Keep the axis, selecting a (possibly strided) range over it.
    Span {
        /// First selected position; the start of the axis when absent.
        start: Option<isize>,
        /// One past the last selected position; the end of the axis when
        /// absent.
        end:   Option<isize>,
        /// Stride through the selected range; negative reverses it.
        step:  isize,
    },
}

impl IndexStep {
    /// The whole axis, `:` in NumPy notation.
    pub fn full() -> Self {
        IndexStep::Span {
            start: None,
            end:   None,
            step:  1,
        }
    }

    /// Everything before `end`, `:end` in NumPy notation.
    pub fn to(end: isize) -> Self {
        IndexStep::Span {
            start: None,
            end:   Some(end),
            step:  1,
        }
    }

    /// Everything from `start` on, `start:` in NumPy notation.
    pub fn from(start: isize) -> Self {
        IndexStep::Span {
            start: Some(start),
            end:   None,
            step:  1,
        }
    }

    /// The whole axis with a stride, `::step` in NumPy notation.
    pub fn stepped(step: isize) -> Self {
        IndexStep::Span {
            start: None,
            end:   None,
            step,
        }
    }

    /// The whole axis reversed, `::-1` in NumPy notation.
    pub fn reversed() -> Self {
        Self::stepped(-1)
    }

    /// Whether this step keeps its axis in the result.
    fn is_span(&self) -> bool {
        matches!(self, IndexStep::Span { .. })
    }
}

impl Display for IndexStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexStep::At(position) => write!(f, "{position}"),
            IndexStep::Span { start, end, step } => {
                if let Some(start) = start {
                    write!(f, "{start}")?;
                }
                write!(f, ":")?;
                if let Some(end) = end {
                    write!(f, "{end}")?;
                }
                if *step != 1 {
                    write!(f, ":{step}")?;
                }
                Ok(())
            }
        }
    }
}

/// What shape of result an indexing expression produces, classified once
/// when the problem is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResultKind {
    /// A single element, extracted by indexing every axis.
    Item,
    /// A sub-array that views the input's storage.
    Subarray,
}

impl ResultKind {
    /// Student-facing description of the data type this kind produces.
    pub fn datatype(&self) -> &'static str {
        match self {
            ResultKind::Item => "a single array element (scalar)",
            ResultKind::Subarray => "an n-dimensional array",
        }
    }
}

/// One graded indexing problem: a course-facing number plus the indexing
/// expression that produces the expected answer.
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    /// Course-facing 1-based problem number.
    number: usize,
    /// Components of the indexing expression. May be shorter than the
    /// array's rank; trailing axes are implicitly kept whole.
    steps:  Vec<IndexStep>,
    /// Classification of the expected result, derived from `steps`.
    kind:   ResultKind,
}

impl Problem {
    /// Builds a problem, classifying its result kind: an expression keeps a
    /// sub-array view alive if any component is a span or if it indexes
    /// fewer axes than the array has.
    pub fn new(number: usize, steps: Vec<IndexStep>) -> Self {
        let kind = if steps.len() < REFERENCE_RANK || steps.iter().any(IndexStep::is_span) {
            ResultKind::Subarray
        } else {
            ResultKind::Item
        };
        Self {
            number,
            steps,
            kind,
        }
    }

    /// Course-facing problem number.
    pub fn number(&self) -> usize {
        self.number
    }

    /// Classification of the expected result.
    pub fn kind(&self) -> ResultKind {
        self.kind
    }

    /// The expression in NumPy notation, e.g. `x[0, :2, 1:]`.
    pub fn expression(&self) -> String {
        format!("x[{}]", self.steps.iter().map(ToString::to_string).join(", "))
    }

    /// The full index of the extracted element, when this problem extracts
    /// a single item.
    pub fn item_index(&self) -> Option<[usize; REFERENCE_RANK]> {
        if self.kind != ResultKind::Item {
            return None;
        }
        let mut index = [0usize; REFERENCE_RANK];
        for (slot, step) in index.iter_mut().zip(&self.steps) {
            match step {
                IndexStep::At(position) => *slot = *position,
                IndexStep::Span { .. } => return None,
            }
        }
        Some(index)
    }

    /// Builds the dynamic-dimensional slice specification applying this
    /// expression, with omitted trailing axes kept whole.
    pub fn slice_info(&self) -> Result<SliceInfo<Vec<SliceInfoElem>, IxDyn, IxDyn>> {
        let mut elems: Vec<SliceInfoElem> = Vec::with_capacity(REFERENCE_RANK);
        for step in &self.steps {
            elems.push(match *step {
                IndexStep::At(position) => SliceInfoElem::Index(position as isize),
                IndexStep::Span { start, end, step } => SliceInfoElem::Slice {
                    start: start.unwrap_or(0),
                    end,
                    step,
                },
            });
        }
        while elems.len() < REFERENCE_RANK {
            elems.push(SliceInfoElem::Slice {
                start: 0,
                end:   None,
                step:  1,
            });
        }
        SliceInfo::try_from(elems).with_context(|| {
            format!(
                "Problem {} does not index a rank-{REFERENCE_RANK} array",
                self.number
            )
        })
    }
}

/// Row describing one problem in listings.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct ProblemSummary {
    /// Course-facing problem number.
    #[tabled(rename = "Problem")]
    number:     usize,
    /// The expression in NumPy notation.
    #[tabled(rename = "Expression")]
    expression: String,
    /// What shape of result the expression produces.
    #[tabled(rename = "Result")]
    result:     String,
}

/// The fixed set of problems a grading call looks its problem up in.
#[derive(Debug, Clone)]
pub struct ProblemSet {
    /// The problems, in course order.
    problems: Vec<Problem>,
}

impl ProblemSet {
    /// The six 3-D indexing problems from the NumPy module exercises.
    pub fn indexing_3d() -> Self {
        use IndexStep::At;

        Self {
            problems: vec![
                // x[0, :, :]
                Problem::new(1, vec![At(0), IndexStep::full(), IndexStep::full()]),
                // x[:, :, 0]
                Problem::new(2, vec![IndexStep::full(), IndexStep::full(), At(0)]),
                // x[0, :2, 1:]
                Problem::new(3, vec![At(0), IndexStep::to(2), IndexStep::from(1)]),
                // x[::-1]
                Problem::new(4, vec![IndexStep::reversed()]),
                // x[::2, 0, :]
                Problem::new(5, vec![IndexStep::stepped(2), At(0), IndexStep::full()]),
                // x[1, 2, 2]
                Problem::new(6, vec![At(1), At(2), At(2)]),
            ],
        }
    }

    /// Looks up a problem by its course-facing number.
    pub fn get(&self, number: usize) -> Result<&Problem> {
        self.problems
            .iter()
            .find(|problem| problem.number() == number)
            .with_context(|| {
                format!(
                    "No such problem #{number}; this set covers problems 1..={}",
                    self.problems.len()
                )
            })
    }

    /// The problems in course order.
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    /// Number of problems in the set.
    pub fn len(&self) -> usize {
        self.problems.len()
    }

    /// Whether the set holds no problems.
    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    /// Listing rows for every problem, for the CLI table and JSON output.
    pub fn summaries(&self) -> Vec<ProblemSummary> {
        self.problems
            .iter()
            .map(|problem| ProblemSummary {
                number:     problem.number(),
                expression: problem.expression(),
                result:     match problem.kind() {
                    ResultKind::Item => "single element".to_string(),
                    ResultKind::Subarray => "sub-array view".to_string(),
                },
            })
            .collect()
    }
}
