//! Interpreter sanity tests against hand-computed results.

use smallvec::smallvec;

use crate::dtype::ElementType;
use crate::eval::evaluate;
use crate::graph::{Computation, Module};
use crate::literal::Literal;
use crate::op::{BinaryKind, DotDims, UnaryKind};
use crate::shape::Shape;

fn f32_shape(dims: &[usize]) -> Shape {
    Shape::new(ElementType::F32, dims.iter().copied())
}

fn literal(dims: &[usize], values: &[f64]) -> Literal {
    Literal::new(f32_shape(dims), values.to_vec()).unwrap()
}

#[test]
fn dot_matches_matrix_multiply() {
    let mut module = Module::new("test");
    let mut main = Computation::new("main");
    let a = main.parameter(0, f32_shape(&[2, 3]), "a").unwrap();
    let b = main.parameter(1, f32_shape(&[3, 2]), "b").unwrap();
    let dot = main.dot(a, b, DotDims::matmul(2)).unwrap();
    main.set_root(dot);
    module.add_entry_computation(main);

    let lhs = literal(&[2, 3], &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let rhs = literal(&[3, 2], &[7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);
    let out = evaluate(&module, &[lhs, rhs]).unwrap();
    assert_eq!(out.values(), &[58.0, 64.0, 139.0, 154.0]);
}

#[test]
fn dot_contracts_arbitrary_dimension_pairs() {
    // Contract dimension 0 of both operands: out[i][j] = sum_k a[k][i] * b[k][j].
    let mut module = Module::new("test");
    let mut main = Computation::new("main");
    let a = main.parameter(0, f32_shape(&[2, 2]), "a").unwrap();
    let b = main.parameter(1, f32_shape(&[2, 2]), "b").unwrap();
    let dot = main.dot(a, b, DotDims::new([0], [0])).unwrap();
    main.set_root(dot);
    module.add_entry_computation(main);

    let lhs = literal(&[2, 2], &[1.0, 2.0, 3.0, 4.0]);
    let rhs = literal(&[2, 2], &[5.0, 6.0, 7.0, 8.0]);
    let out = evaluate(&module, &[lhs, rhs]).unwrap();
    assert_eq!(out.values(), &[26.0, 30.0, 38.0, 44.0]);
}

#[test]
fn transpose_slice_and_unary_chain() {
    let mut module = Module::new("test");
    let mut main = Computation::new("main");
    let a = main.parameter(0, f32_shape(&[2, 3]), "a").unwrap();
    let t = main.transpose(a, [1, 0]).unwrap();
    let s = main.slice(t, smallvec![1, 0], smallvec![3, 2], smallvec![1, 1]).unwrap();
    let n = main.unary(UnaryKind::Neg, s).unwrap();
    main.set_root(n);
    module.add_entry_computation(main);

    let input = literal(&[2, 3], &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let out = evaluate(&module, &[input]).unwrap();
    // Transposed: [[1,4],[2,5],[3,6]]; rows 1..3: [[2,5],[3,6]]; negated.
    assert_eq!(out.shape().dims(), &[2, 2]);
    assert_eq!(out.values(), &[-2.0, -5.0, -3.0, -6.0]);
}

#[test]
fn concatenate_joins_along_dimension() {
    let mut module = Module::new("test");
    let mut main = Computation::new("main");
    let a = main.parameter(0, f32_shape(&[1, 2]), "a").unwrap();
    let b = main.parameter(1, f32_shape(&[2, 2]), "b").unwrap();
    let cat = main.concatenate(&[a, b], 0).unwrap();
    main.set_root(cat);
    module.add_entry_computation(main);

    let out = evaluate(&module, &[literal(&[1, 2], &[1.0, 2.0]), literal(&[2, 2], &[3.0, 4.0, 5.0, 6.0])]).unwrap();
    assert_eq!(out.shape().dims(), &[3, 2]);
    assert_eq!(out.values(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
}

#[test]
fn call_evaluates_target_computation() {
    let mut module = Module::new("test");

    let mut sub = Computation::new("sub");
    let x = sub.parameter(0, f32_shape(&[2]), "x").unwrap();
    let y = sub.parameter(1, f32_shape(&[2]), "y").unwrap();
    let sum = sub.binary(BinaryKind::Add, x, y).unwrap();
    sub.set_root(sum);
    let sub_id = module.add_computation(sub);

    let mut main = Computation::new("main");
    let a = main.parameter(0, f32_shape(&[2]), "a").unwrap();
    let b = main.parameter(1, f32_shape(&[2]), "b").unwrap();
    main.set_root(a);
    let main_id = module.add_entry_computation(main);
    let call = module.add_call(main_id, sub_id, &[a, b]).unwrap();
    module.computation_mut(main_id).set_root(call);

    let out = evaluate(&module, &[literal(&[2], &[1.0, 2.0]), literal(&[2], &[10.0, 20.0])]).unwrap();
    assert_eq!(out.values(), &[11.0, 22.0]);
}
