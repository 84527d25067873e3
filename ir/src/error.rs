use snafu::Snafu;

use crate::op::BinaryKind;
use crate::shape::Shape;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Element type mismatch between operands.
    #[snafu(display("element type mismatch: {lhs} vs {rhs}"))]
    ElementTypeMismatch { lhs: Shape, rhs: Shape },

    /// Shape mismatch in elementwise binary operation.
    #[snafu(display("shape mismatch in {op:?}: {lhs} vs {rhs}"))]
    BinaryShapeMismatch { op: BinaryKind, lhs: Shape, rhs: Shape },

    /// Transpose permutation is not a permutation of the operand's dimensions.
    #[snafu(display("invalid permutation {permutation:?}: expected permutation of 0..{rank}"))]
    InvalidPermutation { permutation: Vec<usize>, rank: usize },

    /// Contraction dimension lists have different lengths.
    #[snafu(display("contraction dimension count mismatch: lhs has {lhs_count}, rhs has {rhs_count}"))]
    ContractionCountMismatch { lhs_count: usize, rhs_count: usize },

    /// Contraction dimension index out of range for the operand.
    #[snafu(display("contraction dimension {dim} out of range for rank-{rank} operand"))]
    ContractionDimOutOfRange { dim: usize, rank: usize },

    /// Paired contraction dimensions have different extents.
    #[snafu(display(
        "contraction extent mismatch: lhs dimension {lhs_dim} has extent {lhs_extent}, \
         rhs dimension {rhs_dim} has extent {rhs_extent}"
    ))]
    ContractionExtentMismatch { lhs_dim: usize, lhs_extent: usize, rhs_dim: usize, rhs_extent: usize },

    /// Slice bounds violation.
    #[snafu(display("slice out of bounds: dimension {dim} has range [{start}, {limit}) but extent is {extent}"))]
    SliceOutOfBounds { dim: usize, start: usize, limit: usize, extent: usize },

    /// Slice stride must be at least 1.
    #[snafu(display("slice stride for dimension {dim} must be >= 1"))]
    SliceZeroStride { dim: usize },

    /// Slice specification has the wrong number of dimensions.
    #[snafu(display("slice specification has {spec_dims} dimensions but operand has rank {rank}"))]
    SliceRankMismatch { spec_dims: usize, rank: usize },

    /// Concatenate requires at least one operand.
    #[snafu(display("concatenate requires at least one operand"))]
    ConcatenateEmpty,

    /// Concatenate dimension out of range.
    #[snafu(display("concatenate dimension {dim} out of range for rank-{rank} operands"))]
    ConcatenateDimOutOfRange { dim: usize, rank: usize },

    /// Concatenate operands disagree on a non-joined dimension.
    #[snafu(display("concatenate operand shapes differ outside dimension {dim}: {lhs} vs {rhs}"))]
    ConcatenateShapeMismatch { dim: usize, lhs: Shape, rhs: Shape },

    /// Parameters must be declared in index order.
    #[snafu(display("parameter index {actual} out of order: expected {expected}"))]
    ParameterIndexMismatch { expected: usize, actual: usize },

    /// Call argument count does not match the target's parameter count.
    #[snafu(display("call to '{target}' has {actual} arguments but the target takes {expected}"))]
    CallArityMismatch { target: String, expected: usize, actual: usize },

    /// Call argument shape does not match the target parameter.
    #[snafu(display("call argument {index} has shape {actual} but parameter expects {expected}"))]
    CallArgumentShape { index: usize, expected: Shape, actual: Shape },

    /// Operation built with the wrong number of operands.
    #[snafu(display("operation {op} takes {expected} operands, got {actual}"))]
    OperandCount { op: &'static str, expected: usize, actual: usize },

    /// Node id does not belong to this computation.
    #[snafu(display("node id {id} out of range for computation '{computation}'"))]
    UnknownNode { id: usize, computation: String },

    /// Computation id does not belong to this module.
    #[snafu(display("computation id {id} out of range"))]
    UnknownComputation { id: usize },

    /// Module has no entry computation.
    #[snafu(display("module has no entry computation"))]
    EntryNotSet,

    /// Computation has no root set.
    #[snafu(display("computation '{computation}' has no root"))]
    RootNotSet { computation: String },

    /// Literal value count does not match its shape.
    #[snafu(display("literal has {actual} values but shape {shape} holds {expected}"))]
    LiteralSizeMismatch { shape: Shape, expected: usize, actual: usize },

    /// Evaluation was given the wrong number of inputs.
    #[snafu(display("evaluation of '{computation}' needs {expected} inputs, got {actual}"))]
    EvalArityMismatch { computation: String, expected: usize, actual: usize },
}
