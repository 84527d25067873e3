//! Operation enum and implementation.
//!
//! The [`Op`] enum defines all operations the IR understands. Operand *edges*
//! live on the node (see [`crate::graph::Node`]); the enum carries only the
//! operator-specific attributes, so an op value can be cloned onto new
//! operands without touching the graph it came from.

use smallvec::SmallVec;

use crate::graph::ComputationId;
use crate::literal::Literal;
use crate::shape::Dims;

/// Elementwise unary operator kinds. All are side-effect free and applied
/// independently per element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryKind {
    Neg,
    Abs,
    Exp,
    Log,
    Tanh,
    Sqrt,
    Floor,
}

/// Elementwise binary operator kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryKind {
    Add,
    Sub,
    Mul,
    Max,
}

/// Which dimensions of each contraction operand are summed over.
///
/// The lists are paired positionally: `lhs_contracting[i]` contracts against
/// `rhs_contracting[i]` and their extents must match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DotDims {
    pub lhs_contracting: SmallVec<[usize; 2]>,
    pub rhs_contracting: SmallVec<[usize; 2]>,
}

impl DotDims {
    pub fn new(
        lhs_contracting: impl IntoIterator<Item = usize>,
        rhs_contracting: impl IntoIterator<Item = usize>,
    ) -> Self {
        Self {
            lhs_contracting: lhs_contracting.into_iter().collect(),
            rhs_contracting: rhs_contracting.into_iter().collect(),
        }
    }

    /// Standard matrix multiply: contract the last lhs dimension against the
    /// first rhs dimension.
    pub fn matmul(lhs_rank: usize) -> Self {
        Self::new([lhs_rank - 1], [0])
    }
}

/// Operation kind with operator-specific attributes.
///
/// Operand arity is fixed per variant (checked when nodes are built):
/// `Parameter`/`Constant` take none, `Unary`/`Transpose`/`Slice` take one,
/// `Binary`/`Dot` take two, `Concatenate`/`Call` are variadic.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    /// Indexed, named input of the owning computation.
    Parameter { index: usize, name: String },
    /// Embedded host-side tensor value.
    Constant(Literal),
    /// Elementwise unary operator.
    Unary(UnaryKind),
    /// Elementwise binary operator.
    Binary(BinaryKind),
    /// Dimension permutation: output dimension `d` takes its extent (and
    /// data) from input dimension `permutation[d]`.
    Transpose { permutation: Dims },
    /// Tensor contraction ("dot"): sums products over the paired contracting
    /// dimensions of its two operands.
    Dot(DotDims),
    /// Strided sub-tensor: per dimension `[start, limit)` with `stride`.
    Slice { starts: Dims, limits: Dims, strides: Dims },
    /// Joins operands along `dim`; all other dimensions must agree.
    Concatenate { dim: usize },
    /// Invokes another computation of the owning module on the operand list.
    Call { target: ComputationId },
}

impl Op {
    /// Short name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Op::Parameter { .. } => "parameter",
            Op::Constant(_) => "constant",
            Op::Unary(_) => "unary",
            Op::Binary(_) => "binary",
            Op::Transpose { .. } => "transpose",
            Op::Dot(_) => "dot",
            Op::Slice { .. } => "slice",
            Op::Concatenate { .. } => "concatenate",
            Op::Call { .. } => "call",
        }
    }

    /// Whether this operator is applied independently per element.
    pub fn is_elementwise(&self) -> bool {
        matches!(self, Op::Unary(_) | Op::Binary(_))
    }

    /// Whether evaluating this operator has observable side effects.
    ///
    /// Always false for the current op set; the query exists because the
    /// pointwise-unary matcher must rule side effects out.
    pub fn has_side_effect(&self) -> bool {
        false
    }
}
