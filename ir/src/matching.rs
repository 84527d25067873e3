//! Structural matchers used by rewrite passes.
//!
//! Small helpers over the node arena that test an operator shape and capture
//! the matched operands. They answer exactly the questions rewrite passes
//! ask: "is this a binary contraction", "is this a transpose of something",
//! "is this a side-effect-free pointwise unary".

use crate::graph::{Computation, NodeId};
use crate::op::Op;

/// Match a binary contraction, capturing `(lhs, rhs)`.
pub fn match_dot(computation: &Computation, id: NodeId) -> Option<(NodeId, NodeId)> {
    let node = computation.node(id);
    match node.op() {
        Op::Dot(_) => Some((node.operands()[0], node.operands()[1])),
        _ => None,
    }
}

/// Match a transpose, capturing its operand.
pub fn match_transpose(computation: &Computation, id: NodeId) -> Option<NodeId> {
    let node = computation.node(id);
    match node.op() {
        Op::Transpose { .. } => Some(node.operands()[0]),
        _ => None,
    }
}

/// Match any pointwise unary operator with no side effects, capturing its
/// operand.
pub fn match_pointwise_unary(computation: &Computation, id: NodeId) -> Option<NodeId> {
    let node = computation.node(id);
    if node.op().is_elementwise() && !node.op().has_side_effect() && node.operands().len() == 1 {
        Some(node.operands()[0])
    } else {
        None
    }
}
