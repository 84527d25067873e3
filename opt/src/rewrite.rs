//! The dot-splitting pass: per-contraction rewrite and module-level driver.

use tessel_ir::matching::match_dot;
use tessel_ir::{Computation, ComputationId, Module, NodeId, Op};
use tracing::debug;

use crate::analysis::{can_split, should_split};
use crate::builder::{ChunkContext, build_chunked_chain};
use crate::chunking::{best_chunk_size, best_split_dim};
use crate::config::SplitConfig;
use crate::error::Result;

/// Rewrites contractions whose operands exceed the configured size budget to
/// compute the operand chunk by chunk through a shared sub-computation,
/// concatenating the partial results.
///
/// Each computation is processed over a single snapshot of its node order:
/// every contraction present at the start is visited once, and nodes created
/// by a rewrite are never revisited.
#[derive(Debug, Clone)]
pub struct DotSplitter {
    config: SplitConfig,
}

impl Default for DotSplitter {
    fn default() -> Self {
        Self::new(SplitConfig::default())
    }
}

impl DotSplitter {
    pub fn new(config: SplitConfig) -> Self {
        Self { config }
    }

    /// Run the pass over every computation in the module. Returns whether any
    /// contraction was rewritten.
    pub fn run(&self, module: &mut Module) -> Result<bool> {
        let mut changed = false;
        for comp_id in module.computation_ids() {
            let order = module.computation(comp_id).post_order();
            for node_id in order {
                if matches!(module.computation(comp_id).node(node_id).op(), Op::Dot(_)) {
                    changed |= self.rewrite_dot(module, comp_id, node_id)?;
                }
            }
        }
        Ok(changed)
    }

    /// Attempt to split one contraction. Returns `Ok(false)` when the node is
    /// left untouched: neither operand qualifies, or no dimension of the
    /// chosen operand divides into chunks that fit the budget.
    fn rewrite_dot(&self, module: &mut Module, comp_id: ComputationId, dot: NodeId) -> Result<bool> {
        let comp = module.computation(comp_id);
        let Some((lhs, rhs)) = match_dot(comp, dot) else { return Ok(false) };
        let Op::Dot(dims) = comp.node(dot).op().clone() else { return Ok(false) };

        let split_lhs = should_split(comp, lhs, &self.config) && can_split(comp, lhs);
        let split_rhs = should_split(comp, rhs, &self.config) && can_split(comp, rhs);
        if !split_lhs && !split_rhs {
            // The common outcome: both operands fit, or neither is a
            // recomputable chain.
            return Ok(false);
        }

        // When both sides qualify, prefer the lhs.
        let (split_root, contracting) = if split_lhs {
            (lhs, &dims.lhs_contracting)
        } else {
            (rhs, &dims.rhs_contracting)
        };

        // The chosen operand's contracting dimensions cannot be split: each
        // chunk of the contraction needs all of them.
        let split_shape = comp.node(split_root).shape().clone();
        let Some(split_dim) = best_split_dim(&split_shape, contracting, &self.config) else {
            debug!(computation = %comp.name(), dot = dot.index(), "no dimension admits a valid chunk size");
            return Ok(false);
        };
        let Some(chunk_extent) = best_chunk_size(&split_shape, split_dim, &self.config) else {
            unreachable!("dimension {split_dim} was selected without a valid chunk size")
        };
        let chunk_count = split_shape.dim(split_dim) / chunk_extent;

        debug!(
            computation = %comp.name(),
            dot = dot.index(),
            split_lhs,
            split_dim,
            chunk_extent,
            chunk_count,
            "splitting oversized contraction operand"
        );

        let mut ctx = ChunkContext {
            sub: Computation::new(format!("{}.dot_split.{}", comp.name(), module.computations().len())),
            chunk_args: vec![Vec::new(); chunk_count],
        };
        let sub_root =
            build_chunked_chain(module.computation_mut(comp_id), split_root, split_dim, chunk_extent, &mut ctx)?;
        ctx.sub.set_root(sub_root);
        let chunk_args = ctx.chunk_args;
        let sub_id = module.add_computation(ctx.sub);

        // Where the split dimension lands in the contraction's output: its
        // own contracting dimensions below it disappear, and rhs free
        // dimensions come after all lhs free dimensions.
        let mut output_dim = split_dim - contracting.iter().filter(|&&c| c < split_dim).count();
        if !split_lhs {
            let comp = module.computation(comp_id);
            output_dim += comp.node(lhs).shape().rank() - dims.lhs_contracting.len();
        }

        let part_shape = module.computation(comp_id).node(dot).shape().with_dim(output_dim, chunk_extent);
        let mut parts = Vec::with_capacity(chunk_count);
        for args in &chunk_args {
            let call = module.add_call(comp_id, sub_id, args)?;
            let operands = if split_lhs { [call, rhs] } else { [lhs, call] };
            let part = module
                .computation_mut(comp_id)
                .clone_with_operands(Op::Dot(dims.clone()), &operands, part_shape.clone())?;
            parts.push(part);
        }

        let host = module.computation_mut(comp_id);
        let concat = host.concatenate(&parts, output_dim)?;
        host.replace_all_uses(dot, concat)?;
        Ok(true)
    }
}
