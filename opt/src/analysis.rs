//! Splittability analysis: is an operand worth splitting, and can the graph
//! feeding it be recomputed chunk by chunk?

use tessel_ir::matching::{match_dot, match_pointwise_unary, match_transpose};
use tessel_ir::{Computation, NodeId};

use crate::config::SplitConfig;

/// Whether `node` is large enough that splitting it pays off: its element
/// count exceeds the hard intermediate-size budget. Pure predicate.
pub fn should_split(computation: &Computation, node: NodeId, config: &SplitConfig) -> bool {
    computation.node(node).shape().elements() > config.max_intermediate_elements
}

/// Whether the graph producing `node` is a splittable chain: zero or more
/// side-effect-free pointwise unary operators and transposes wrapping a
/// binary contraction.
///
/// This grammar and the builder's recursion in [`crate::builder`] must stay
/// in lock-step; the builder treats any node this function would reject as a
/// fatal internal error.
pub fn can_split(computation: &Computation, node: NodeId) -> bool {
    if match_dot(computation, node).is_some() {
        // Base case: a contraction produces this large intermediate.
        return true;
    }
    if let Some(operand) = match_pointwise_unary(computation, node) {
        return can_split(computation, operand);
    }
    if let Some(operand) = match_transpose(computation, node) {
        return can_split(computation, operand);
    }
    false
}
