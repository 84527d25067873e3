//! Splittability predicates over small graphs.

use smallvec::smallvec;
use tessel_ir::{BinaryKind, Computation, DotDims, UnaryKind};

use crate::analysis::{can_split, should_split};
use crate::test::helpers::{budgets, f32_shape};

#[test]
fn should_split_compares_strictly_against_the_maximum() {
    let mut comp = Computation::new("main");
    let p = comp.parameter(0, f32_shape(&[10, 10]), "p").unwrap();
    assert!(!should_split(&comp, p, &budgets(100, 50)));
    assert!(should_split(&comp, p, &budgets(99, 50)));
}

#[test]
fn can_split_accepts_unary_and_transpose_chains_over_a_contraction() {
    let mut comp = Computation::new("main");
    let a = comp.parameter(0, f32_shape(&[4, 8]), "a").unwrap();
    let b = comp.parameter(1, f32_shape(&[8, 4]), "b").unwrap();
    let dot = comp.dot(a, b, DotDims::matmul(2)).unwrap();
    let neg = comp.unary(UnaryKind::Neg, dot).unwrap();
    let t = comp.transpose(dot, [1, 0]).unwrap();
    let neg_t = comp.unary(UnaryKind::Abs, t).unwrap();

    assert!(can_split(&comp, dot));
    assert!(can_split(&comp, neg));
    assert!(can_split(&comp, t));
    assert!(can_split(&comp, neg_t));
}

#[test]
fn can_split_rejects_everything_outside_the_chain_grammar() {
    let mut comp = Computation::new("main");
    let a = comp.parameter(0, f32_shape(&[4, 8]), "a").unwrap();
    let b = comp.parameter(1, f32_shape(&[8, 4]), "b").unwrap();
    let dot = comp.dot(a, b, DotDims::matmul(2)).unwrap();
    let sum = comp.binary(BinaryKind::Add, dot, dot).unwrap();
    let sl = comp.slice(dot, smallvec![0, 0], smallvec![2, 4], smallvec![1, 1]).unwrap();

    // Leaves are not recomputable chains.
    assert!(!can_split(&comp, a));
    // Binary operators and slices are not part of the chain grammar, even
    // when a contraction sits below them.
    assert!(!can_split(&comp, sum));
    assert!(!can_split(&comp, sl));
}
