//! Shape inference rules, one per operation kind.
//!
//! Every constructor in [`crate::graph`] routes through these functions, so a
//! node's stored shape is always consistent with its operands by the time it
//! enters the arena.

use snafu::ensure;

use crate::error::*;
use crate::op::{BinaryKind, DotDims};
use crate::shape::{Dims, Shape};

pub fn unary(operand: &Shape) -> Shape {
    operand.clone()
}

pub fn binary(op: BinaryKind, lhs: &Shape, rhs: &Shape) -> Result<Shape> {
    ensure!(
        lhs.element_type() == rhs.element_type(),
        ElementTypeMismatchSnafu { lhs: lhs.clone(), rhs: rhs.clone() }
    );
    ensure!(lhs == rhs, BinaryShapeMismatchSnafu { op, lhs: lhs.clone(), rhs: rhs.clone() });
    Ok(lhs.clone())
}

pub fn transpose(operand: &Shape, permutation: &[usize]) -> Result<Shape> {
    let rank = operand.rank();
    let mut seen = vec![false; rank];
    let valid = permutation.len() == rank
        && permutation.iter().all(|&p| p < rank && !std::mem::replace(&mut seen[p], true));
    ensure!(valid, InvalidPermutationSnafu { permutation: permutation.to_vec(), rank });
    Ok(Shape::new(operand.element_type(), permutation.iter().map(|&p| operand.dim(p))))
}

/// Contraction output shape: lhs non-contracted dimensions followed by rhs
/// non-contracted dimensions, in operand order.
pub fn dot(lhs: &Shape, rhs: &Shape, dims: &DotDims) -> Result<Shape> {
    ensure!(
        lhs.element_type() == rhs.element_type(),
        ElementTypeMismatchSnafu { lhs: lhs.clone(), rhs: rhs.clone() }
    );
    ensure!(
        dims.lhs_contracting.len() == dims.rhs_contracting.len(),
        ContractionCountMismatchSnafu { lhs_count: dims.lhs_contracting.len(), rhs_count: dims.rhs_contracting.len() }
    );
    for (&ld, &rd) in dims.lhs_contracting.iter().zip(&dims.rhs_contracting) {
        ensure!(ld < lhs.rank(), ContractionDimOutOfRangeSnafu { dim: ld, rank: lhs.rank() });
        ensure!(rd < rhs.rank(), ContractionDimOutOfRangeSnafu { dim: rd, rank: rhs.rank() });
        ensure!(
            lhs.dim(ld) == rhs.dim(rd),
            ContractionExtentMismatchSnafu { lhs_dim: ld, lhs_extent: lhs.dim(ld), rhs_dim: rd, rhs_extent: rhs.dim(rd) }
        );
    }

    let free = |shape: &Shape, contracting: &[usize]| {
        (0..shape.rank()).filter(|d| !contracting.contains(d)).map(|d| shape.dim(d)).collect::<Vec<_>>()
    };
    let mut out: Vec<usize> = free(lhs, &dims.lhs_contracting);
    out.extend(free(rhs, &dims.rhs_contracting));
    Ok(Shape::new(lhs.element_type(), out))
}

pub fn slice(operand: &Shape, starts: &Dims, limits: &Dims, strides: &Dims) -> Result<Shape> {
    let rank = operand.rank();
    for spec in [starts, limits, strides] {
        ensure!(spec.len() == rank, SliceRankMismatchSnafu { spec_dims: spec.len(), rank });
    }
    let mut out = Vec::with_capacity(rank);
    for dim in 0..rank {
        let (start, limit, stride) = (starts[dim], limits[dim], strides[dim]);
        ensure!(stride >= 1, SliceZeroStrideSnafu { dim });
        ensure!(
            start <= limit && limit <= operand.dim(dim),
            SliceOutOfBoundsSnafu { dim, start, limit, extent: operand.dim(dim) }
        );
        out.push((limit - start).div_ceil(stride));
    }
    Ok(Shape::new(operand.element_type(), out))
}

pub fn concatenate(operands: &[&Shape], dim: usize) -> Result<Shape> {
    let first = *operands.first().ok_or(Error::ConcatenateEmpty)?;
    ensure!(dim < first.rank(), ConcatenateDimOutOfRangeSnafu { dim, rank: first.rank() });
    let mut joined = 0;
    for shape in operands {
        let compatible = shape.rank() == first.rank()
            && shape.element_type() == first.element_type()
            && (0..first.rank()).all(|d| d == dim || shape.dim(d) == first.dim(d));
        ensure!(
            compatible,
            ConcatenateShapeMismatchSnafu { dim, lhs: first.clone(), rhs: (*shape).clone() }
        );
        joined += shape.dim(dim);
    }
    Ok(first.with_dim(dim, joined))
}
