//! Shape and shape-inference tests.

use proptest::prelude::*;
use smallvec::smallvec;
use test_case::test_case;

use crate::dtype::ElementType;
use crate::error::Error;
use crate::infer;
use crate::op::DotDims;
use crate::shape::Shape;

fn f32_shape(dims: &[usize]) -> Shape {
    Shape::new(ElementType::F32, dims.iter().copied())
}

#[test]
fn elements_is_extent_product() {
    assert_eq!(f32_shape(&[4, 3, 2]).elements(), 24);
    assert_eq!(f32_shape(&[]).elements(), 1);
    assert_eq!(f32_shape(&[7, 0, 2]).elements(), 0);
}

#[test]
fn with_dim_narrows_one_extent() {
    let shape = f32_shape(&[4096, 4096]);
    let narrowed = shape.with_dim(0, 32);
    assert_eq!(narrowed.dims(), &[32, 4096]);
    assert_eq!(shape.dims(), &[4096, 4096]);
}

#[test]
fn dot_output_is_free_dims_in_operand_order() {
    let lhs = f32_shape(&[2, 3, 5]);
    let rhs = f32_shape(&[5, 7]);
    let out = infer::dot(&lhs, &rhs, &DotDims::new([2], [0])).unwrap();
    assert_eq!(out.dims(), &[2, 3, 7]);
}

#[test]
fn dot_rejects_extent_mismatch() {
    let lhs = f32_shape(&[2, 3]);
    let rhs = f32_shape(&[4, 5]);
    let result = infer::dot(&lhs, &rhs, &DotDims::new([1], [0]));
    assert!(matches!(
        result,
        Err(Error::ContractionExtentMismatch { lhs_dim: 1, lhs_extent: 3, rhs_dim: 0, rhs_extent: 4 })
    ));
}

#[test]
fn dot_rejects_element_type_mismatch() {
    let lhs = f32_shape(&[2, 3]);
    let rhs = Shape::new(ElementType::F64, [3, 4]);
    assert!(matches!(infer::dot(&lhs, &rhs, &DotDims::matmul(2)), Err(Error::ElementTypeMismatch { .. })));
}

#[test_case(&[1, 0], &[3, 2]; "swap")]
#[test_case(&[0, 1], &[2, 3]; "identity")]
fn transpose_permutes_extents(permutation: &[usize], expected: &[usize]) {
    let out = infer::transpose(&f32_shape(&[2, 3]), permutation).unwrap();
    assert_eq!(out.dims(), expected);
}

#[test_case(&[0]; "too short")]
#[test_case(&[0, 0]; "duplicate")]
#[test_case(&[0, 2]; "out of range")]
fn transpose_rejects_bad_permutation(permutation: &[usize]) {
    assert!(matches!(
        infer::transpose(&f32_shape(&[2, 3]), permutation),
        Err(Error::InvalidPermutation { .. })
    ));
}

#[test]
fn slice_narrows_dimensions() {
    let out = infer::slice(&f32_shape(&[8, 6]), &smallvec![2, 0], &smallvec![6, 6], &smallvec![1, 1]).unwrap();
    assert_eq!(out.dims(), &[4, 6]);
}

#[test]
fn slice_rejects_out_of_bounds() {
    let result = infer::slice(&f32_shape(&[8]), &smallvec![4], &smallvec![9], &smallvec![1]);
    assert!(matches!(result, Err(Error::SliceOutOfBounds { dim: 0, start: 4, limit: 9, extent: 8 })));
}

#[test]
fn concatenate_sums_joined_dimension() {
    let parts = [f32_shape(&[2, 3]), f32_shape(&[5, 3]), f32_shape(&[1, 3])];
    let refs: Vec<&Shape> = parts.iter().collect();
    let out = infer::concatenate(&refs, 0).unwrap();
    assert_eq!(out.dims(), &[8, 3]);
}

#[test]
fn concatenate_rejects_other_dim_mismatch() {
    let parts = [f32_shape(&[2, 3]), f32_shape(&[2, 4])];
    let refs: Vec<&Shape> = parts.iter().collect();
    assert!(matches!(infer::concatenate(&refs, 0), Err(Error::ConcatenateShapeMismatch { dim: 0, .. })));
}

fn shape_and_permutation() -> impl Strategy<Value = (Vec<usize>, Vec<usize>)> {
    prop::collection::vec(0usize..6, 1..5).prop_flat_map(|dims| {
        let permutation = Just((0..dims.len()).collect::<Vec<usize>>()).prop_shuffle();
        (Just(dims), permutation)
    })
}

proptest! {
    #[test]
    fn transpose_permutes_without_resizing((dims, permutation) in shape_and_permutation()) {
        let shape = f32_shape(&dims);
        let out = infer::transpose(&shape, &permutation).unwrap();
        prop_assert_eq!(out.elements(), shape.elements());
        let mut sorted = out.dims().to_vec();
        sorted.sort_unstable();
        let mut expected = dims.clone();
        expected.sort_unstable();
        prop_assert_eq!(sorted, expected);
    }
}
