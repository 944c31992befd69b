//! Tests for the indexing problem set: classification, rendering, lookup,
//! and the expected values each expression produces.

use ndarray::array;
use plymi::grade::{IndexStep, Problem, ProblemSet, ResultKind, reference_array};

#[test]
fn reference_array_is_sequential_row_major() {
    let x = reference_array();
    assert_eq!(x.shape(), &[3, 3, 3]);
    assert_eq!(x[[0, 0, 0]], 0.0);
    assert_eq!(x[[1, 2, 2]], 17.0);
    assert_eq!(x[[2, 2, 2]], 26.0);
}

#[test]
fn kinds_are_classified_once_per_problem() {
    let set = ProblemSet::indexing_3d();
    for number in 1..=5 {
        assert_eq!(
            set.get(number).expect("known problem").kind(),
            ResultKind::Subarray,
            "problem {number}"
        );
    }
    assert_eq!(set.get(6).expect("known problem").kind(), ResultKind::Item);
}

#[test]
fn expressions_render_in_numpy_notation() {
    let set = ProblemSet::indexing_3d();
    let rendered: Vec<String> = set.problems().iter().map(Problem::expression).collect();
    assert_eq!(
        rendered,
        vec![
            "x[0, :, :]",
            "x[:, :, 0]",
            "x[0, :2, 1:]",
            "x[::-1]",
            "x[::2, 0, :]",
            "x[1, 2, 2]",
        ]
    );
}

#[test]
fn item_index_exists_only_for_full_indexes() {
    let set = ProblemSet::indexing_3d();
    assert_eq!(set.get(6).expect("known problem").item_index(), Some([1, 2, 2]));
    assert_eq!(set.get(1).expect("known problem").item_index(), None);
    assert_eq!(set.get(4).expect("known problem").item_index(), None);
}

#[test]
fn short_expressions_produce_subarrays_even_without_spans() {
    use IndexStep::At;

    // Indexing two of three axes leaves a view over the last axis.
    let partial = Problem::new(9, vec![At(0), At(1)]);
    assert_eq!(partial.kind(), ResultKind::Subarray);

    let full = Problem::new(9, vec![At(0), At(1), At(2)]);
    assert_eq!(full.kind(), ResultKind::Item);
    assert_eq!(full.item_index(), Some([0, 1, 2]));
}

#[test]
fn lookup_rejects_out_of_range_numbers() {
    let set = ProblemSet::indexing_3d();
    assert_eq!(set.len(), 6);
    assert!(!set.is_empty());
    for number in [0usize, 7, 100] {
        let err = set.get(number).expect_err("out of range");
        assert!(err.to_string().contains("1..=6"), "{err}");
    }
}

#[test]
fn slice_info_reproduces_the_expected_values() {
    let set = ProblemSet::indexing_3d();
    let x = reference_array();

    // Problem 3: x[0, :2, 1:] == [[1, 2], [4, 5]]
    let info = set.get(3).expect("known problem").slice_info().expect("valid expression");
    let sliced = x.view().into_dyn().slice_move(info);
    assert_eq!(sliced, array![[1.0, 2.0], [4.0, 5.0]].into_dyn());

    // Problem 4: x[::-1] reverses the leading axis.
    let info = set.get(4).expect("known problem").slice_info().expect("valid expression");
    let sliced = x.view().into_dyn().slice_move(info);
    assert_eq!(sliced.shape(), &[3, 3, 3]);
    assert_eq!(sliced[[0, 0, 0]], 18.0);
    assert_eq!(sliced[[2, 2, 2]], 8.0);

    // Problem 5: x[::2, 0, :] picks the first row of the outer slabs.
    let info = set.get(5).expect("known problem").slice_info().expect("valid expression");
    let sliced = x.view().into_dyn().slice_move(info);
    assert_eq!(sliced, array![[0.0, 1.0, 2.0], [18.0, 19.0, 20.0]].into_dyn());

    // Problem 6: a full index leaves a 0-d result holding 17.
    let info = set.get(6).expect("known problem").slice_info().expect("valid expression");
    let sliced = x.view().into_dyn().slice_move(info);
    assert_eq!(sliced.ndim(), 0);
    assert_eq!(sliced.iter().copied().next(), Some(17.0));
}

#[test]
fn summaries_serialize_for_the_cli_listing() {
    let summaries = ProblemSet::indexing_3d().summaries();
    assert_eq!(summaries.len(), 6);

    let json = serde_json::to_value(&summaries).expect("serializable");
    assert_eq!(json[0]["expression"], "x[0, :, :]");
    assert_eq!(json[0]["result"], "sub-array view");
    assert_eq!(json[5]["expression"], "x[1, 2, 2]");
    assert_eq!(json[5]["result"], "single element");
}
