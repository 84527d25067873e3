//! Dense host-side tensor values.

use smallvec::SmallVec;
use snafu::ensure;

use crate::error::{LiteralSizeMismatchSnafu, Result};
use crate::shape::Shape;

/// Row-major strides for the given extents.
pub fn strides(dims: &[usize]) -> SmallVec<[usize; 4]> {
    let mut out: SmallVec<[usize; 4]> = SmallVec::with_capacity(dims.len());
    let mut acc = 1;
    for &d in dims.iter().rev() {
        out.push(acc);
        acc *= d;
    }
    out.reverse();
    out
}

/// Visit every multi-index of `dims` in row-major order.
pub fn for_each_index(dims: &[usize], mut f: impl FnMut(&[usize])) {
    if dims.iter().any(|&d| d == 0) {
        return;
    }
    let mut index: SmallVec<[usize; 4]> = SmallVec::from_elem(0, dims.len());
    loop {
        f(&index);
        // Odometer increment from the innermost dimension.
        let mut dim = dims.len();
        loop {
            if dim == 0 {
                return;
            }
            dim -= 1;
            index[dim] += 1;
            if index[dim] < dims[dim] {
                break;
            }
            index[dim] = 0;
        }
    }
}

/// A shaped, row-major tensor value.
///
/// All elements are stored as `f64` regardless of the declared element type;
/// this is a reference representation for constants and interpretation, not a
/// runtime buffer format.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    shape: Shape,
    values: Vec<f64>,
}

impl Literal {
    pub fn new(shape: Shape, values: Vec<f64>) -> Result<Self> {
        ensure!(
            values.len() == shape.elements(),
            LiteralSizeMismatchSnafu { expected: shape.elements(), actual: values.len(), shape: shape.clone() }
        );
        Ok(Self { shape, values })
    }

    pub fn zeros(shape: Shape) -> Self {
        let values = vec![0.0; shape.elements()];
        Self { shape, values }
    }

    /// Build a literal by evaluating `f` at every multi-index.
    pub fn from_fn(shape: Shape, mut f: impl FnMut(&[usize]) -> f64) -> Self {
        let mut out = Self::zeros(shape);
        let dims: SmallVec<[usize; 4]> = out.shape.dims().into();
        let mut linear = 0;
        for_each_index(&dims, |index| {
            out.values[linear] = f(index);
            linear += 1;
        });
        out
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    fn linear(&self, index: &[usize]) -> usize {
        debug_assert_eq!(index.len(), self.shape.rank());
        strides(self.shape.dims()).iter().zip(index).map(|(s, i)| s * i).sum()
    }

    /// Element at a multi-index.
    pub fn at(&self, index: &[usize]) -> f64 {
        self.values[self.linear(index)]
    }

    pub fn set(&mut self, index: &[usize], value: f64) {
        let linear = self.linear(index);
        self.values[linear] = value;
    }
}
