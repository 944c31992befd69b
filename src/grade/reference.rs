#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! The canonical input array every indexing problem is posed against.

use ndarray::Array3;

use crate::constants::REFERENCE_SIDE;

/// Builds the canonical 3x3x3 reference array holding `0..27` in row-major
/// order, the equivalent of `np.arange(27).reshape(3, 3, 3)`.
///
/// A fresh array is built for every grading call so a student function that
/// mutates its input cannot corrupt later checks.
pub fn reference_array() -> Array3<f64> {
    Array3::from_shape_fn((REFERENCE_SIDE, REFERENCE_SIDE, REFERENCE_SIDE), |(i, j, k)| {
        ((i * REFERENCE_SIDE + j) * REFERENCE_SIDE + k) as f64
    })
}
