//! Reconstruction of a splittable chain as a reusable sub-computation.
//!
//! The chain is rebuilt parametrized on one chunk of the split operand and
//! one unchanged join operand; the per-chunk slices stay in the host
//! computation and become the actual arguments of the future call sites.
//!
//! The recursion here and [`crate::analysis::can_split`] walk the same closed
//! grammar {contraction, pointwise unary, transpose}. Anything else reaching
//! this builder means the two went out of lock-step, which is reported as a
//! fatal error rather than patched over.

use smallvec::{SmallVec, smallvec};
use tessel_ir::shape::Dims;
use tessel_ir::{Computation, DotDims, NodeId, Op, Shape};

use crate::error::{Result, UnsupportedChainNodeSnafu};

/// Build state threaded through the chain reconstruction: the sub-computation
/// under construction and one growing operand-binding list per future call
/// site, indexed by chunk number.
pub(crate) struct ChunkContext {
    pub sub: Computation,
    pub chunk_args: Vec<Vec<NodeId>>,
}

/// Rebuild the chain rooted at `node` inside `ctx.sub`, splitting `split_dim`
/// (an index into `node`'s own shape) into chunks of `chunk_extent`.
///
/// Returns the root of the rebuilt chain; the caller installs it as the
/// sub-computation's root. Slice nodes over the split operand are emitted
/// into `host` and recorded in `ctx.chunk_args` together with the join
/// operand, pre-split so each list can be used verbatim as call arguments.
pub(crate) fn build_chunked_chain(
    host: &mut Computation,
    node: NodeId,
    split_dim: usize,
    chunk_extent: usize,
    ctx: &mut ChunkContext,
) -> Result<NodeId> {
    let current = host.node(node);
    let op = current.op().clone();
    let operands: SmallVec<[NodeId; 2]> = current.operands().iter().copied().collect();

    match op {
        Op::Dot(dims) => build_dot_base(host, node, &dims, split_dim, chunk_extent, ctx),
        Op::Unary(kind) => {
            // Pointwise operators are dimension-preserving and commute with
            // slicing: recurse with the index unchanged and clone on top.
            let inner = build_chunked_chain(host, operands[0], split_dim, chunk_extent, ctx)?;
            let shape = ctx.sub.node(inner).shape().clone();
            Ok(ctx.sub.clone_with_operands(Op::Unary(kind), &[inner], shape)?)
        }
        Op::Transpose { permutation } => {
            // The transpose may move the split dimension: output dimension d
            // reads input dimension permutation[d], so follow the index
            // through the permutation before recursing. Extents are
            // untouched, so the chunk size carries over.
            let inner_dim = permutation[split_dim];
            let inner = build_chunked_chain(host, operands[0], inner_dim, chunk_extent, ctx)?;
            let inner_shape = ctx.sub.node(inner).shape().clone();
            let shape = Shape::new(
                inner_shape.element_type(),
                permutation.iter().map(|&p| inner_shape.dim(p)),
            );
            Ok(ctx.sub.clone_with_operands(Op::Transpose { permutation }, &[inner], shape)?)
        }
        // Listed explicitly so that a new op kind forces a decision here.
        op @ (Op::Parameter { .. }
        | Op::Constant(_)
        | Op::Binary(_)
        | Op::Slice { .. }
        | Op::Concatenate { .. }
        | Op::Call { .. }) => {
            UnsupportedChainNodeSnafu { op: op.name(), node: node.index() }.fail()
        }
    }
}

/// Base case: the contraction at the bottom of the chain. Slices the operand
/// holding the split dimension, binds the other operand unchanged, and clones
/// the contraction over two fresh parameters.
fn build_dot_base(
    host: &mut Computation,
    node: NodeId,
    dims: &DotDims,
    split_dim: usize,
    chunk_extent: usize,
    ctx: &mut ChunkContext,
) -> Result<NodeId> {
    let (lhs, rhs) = {
        let n = host.node(node);
        (n.operands()[0], n.operands()[1])
    };
    let lhs_free = host.node(lhs).shape().rank() - dims.lhs_contracting.len();

    // The contraction's output is lhs free dims followed by rhs free dims;
    // the incoming index tells us which operand holds the split dimension.
    let (split_is_lhs, split_operand, join_operand, free_dim, contracting) = if split_dim < lhs_free {
        (true, lhs, rhs, split_dim, &dims.lhs_contracting)
    } else {
        (false, rhs, lhs, split_dim - lhs_free, &dims.rhs_contracting)
    };

    // Remap the free-dimension index into the operand's own coordinate space
    // by shifting past every contracting dimension at or below it, in
    // ascending order.
    let mut sorted_contracting: SmallVec<[usize; 2]> = contracting.clone();
    sorted_contracting.sort_unstable();
    let mut operand_dim = free_dim;
    for &c in &sorted_contracting {
        if operand_dim >= c {
            operand_dim += 1;
        }
    }

    let operand_shape = host.node(split_operand).shape().clone();
    let extent = operand_shape.dim(operand_dim);
    debug_assert_eq!(extent % chunk_extent, 0, "chunk extent must divide the split extent");
    debug_assert_eq!(extent / chunk_extent, ctx.chunk_args.len());

    let sliced_shape = operand_shape.with_dim(operand_dim, chunk_extent);
    let rank = operand_shape.rank();
    for (chunk, args) in ctx.chunk_args.iter_mut().enumerate() {
        let mut starts: Dims = smallvec![0; rank];
        let mut limits: Dims = operand_shape.dims().iter().copied().collect();
        starts[operand_dim] = chunk * chunk_extent;
        limits[operand_dim] = (chunk + 1) * chunk_extent;
        let slice = host.slice(split_operand, starts, limits, smallvec![1; rank])?;
        args.push(slice);
        args.push(join_operand);
    }

    // One parameter shaped like a single chunk of the split operand, one
    // shaped like the unsliced join operand, matching the argument order
    // recorded above.
    let join_shape = host.node(join_operand).shape().clone();
    let next = ctx.sub.parameters().len();
    let split_param = ctx.sub.parameter(next, sliced_shape, "split_chunk")?;
    let join_param = ctx.sub.parameter(next + 1, join_shape, "join_operand")?;
    let (new_lhs, new_rhs) = if split_is_lhs { (split_param, join_param) } else { (join_param, split_param) };

    // Same contraction, with the split dimension narrowed in the output.
    let part_shape = host.node(node).shape().with_dim(split_dim, chunk_extent);
    Ok(ctx.sub.clone_with_operands(Op::Dot(dims.clone()), &[new_lhs, new_rhs], part_shape)?)
}
