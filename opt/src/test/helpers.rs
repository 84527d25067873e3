//! Shared fixtures for the pass tests.

use tessel_ir::{ElementType, Literal, Shape};

use crate::config::SplitConfig;

pub fn f32_shape(dims: &[usize]) -> Shape {
    Shape::new(ElementType::F32, dims.iter().copied())
}

/// Budgets with an explicit hard maximum and soft target.
pub fn budgets(max: usize, target: usize) -> SplitConfig {
    SplitConfig { max_intermediate_elements: max, target_intermediate_elements: target }
}

/// Deterministic test data: 1.0, 2.0, 3.0, ... in row-major order.
pub fn ramp(dims: &[usize]) -> Literal {
    let mut next = 0.0;
    Literal::from_fn(f32_shape(dims), move |_| {
        next += 1.0;
        next
    })
}
