//! Nodes, computations, and the owning module.
//!
//! A [`Computation`] is a single-rooted DAG of [`Node`]s held in an arena and
//! addressed by [`NodeId`]. A [`Module`] owns all computations of a program:
//! one entry computation plus any auxiliaries created by optimization passes.
//!
//! Nodes are immutable once inserted; passes transform the graph by adding
//! nodes and rewiring consumers with [`Computation::replace_all_uses`]. Nodes
//! left without consumers simply stay unreferenced in the arena.

use smallvec::SmallVec;
use snafu::ensure;
use tracing::trace;

use crate::error::*;
use crate::infer;
use crate::literal::Literal;
use crate::op::{BinaryKind, DotDims, Op, UnaryKind};
use crate::shape::{Dims, Shape};

/// Arena index of a node within its computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Index of a computation within its module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComputationId(usize);

impl ComputationId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One operation in the dataflow graph: its kind, inferred output shape, and
/// ordered operand edges.
#[derive(Debug, Clone)]
pub struct Node {
    op: Op,
    shape: Shape,
    operands: SmallVec<[NodeId; 2]>,
}

impl Node {
    pub fn op(&self) -> &Op {
        &self.op
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn operands(&self) -> &[NodeId] {
        &self.operands
    }
}

/// An ordered, single-rooted subgraph: parameter nodes, internal nodes, and
/// one root whose shape is the computation's output shape.
#[derive(Debug, Clone)]
pub struct Computation {
    name: String,
    nodes: Vec<Node>,
    parameters: Vec<NodeId>,
    root: Option<NodeId>,
}

impl Computation {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), nodes: Vec::new(), parameters: Vec::new(), root: None }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node lookup. Ids are only minted by this arena, so direct indexing is
    /// the normal access path; use [`Computation::get`] for foreign ids.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Parameter nodes in index order.
    pub fn parameters(&self) -> &[NodeId] {
        &self.parameters
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
    }

    fn push(&mut self, op: Op, shape: Shape, operands: SmallVec<[NodeId; 2]>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node { op, shape, operands });
        id
    }

    fn check_operand(&self, id: NodeId) -> Result<()> {
        ensure!(id.0 < self.nodes.len(), UnknownNodeSnafu { id: id.0, computation: self.name.clone() });
        Ok(())
    }

    // --- validated constructors -------------------------------------------

    /// Declare the next parameter. Parameters must be added in index order.
    pub fn parameter(&mut self, index: usize, shape: Shape, name: impl Into<String>) -> Result<NodeId> {
        ensure!(index == self.parameters.len(), ParameterIndexMismatchSnafu { expected: self.parameters.len(), actual: index });
        let id = self.push(Op::Parameter { index, name: name.into() }, shape, SmallVec::new());
        self.parameters.push(id);
        Ok(id)
    }

    pub fn constant(&mut self, literal: Literal) -> NodeId {
        let shape = literal.shape().clone();
        self.push(Op::Constant(literal), shape, SmallVec::new())
    }

    pub fn unary(&mut self, kind: UnaryKind, operand: NodeId) -> Result<NodeId> {
        self.check_operand(operand)?;
        let shape = infer::unary(self.node(operand).shape());
        Ok(self.push(Op::Unary(kind), shape, [operand].into_iter().collect()))
    }

    pub fn binary(&mut self, kind: BinaryKind, lhs: NodeId, rhs: NodeId) -> Result<NodeId> {
        self.check_operand(lhs)?;
        self.check_operand(rhs)?;
        let shape = infer::binary(kind, self.node(lhs).shape(), self.node(rhs).shape())?;
        Ok(self.push(Op::Binary(kind), shape, [lhs, rhs].into_iter().collect()))
    }

    pub fn transpose(&mut self, operand: NodeId, permutation: impl IntoIterator<Item = usize>) -> Result<NodeId> {
        self.check_operand(operand)?;
        let permutation: Dims = permutation.into_iter().collect();
        let shape = infer::transpose(self.node(operand).shape(), &permutation)?;
        Ok(self.push(Op::Transpose { permutation }, shape, [operand].into_iter().collect()))
    }

    pub fn dot(&mut self, lhs: NodeId, rhs: NodeId, dims: DotDims) -> Result<NodeId> {
        self.check_operand(lhs)?;
        self.check_operand(rhs)?;
        let shape = infer::dot(self.node(lhs).shape(), self.node(rhs).shape(), &dims)?;
        Ok(self.push(Op::Dot(dims), shape, [lhs, rhs].into_iter().collect()))
    }

    pub fn slice(&mut self, operand: NodeId, starts: Dims, limits: Dims, strides: Dims) -> Result<NodeId> {
        self.check_operand(operand)?;
        let shape = infer::slice(self.node(operand).shape(), &starts, &limits, &strides)?;
        Ok(self.push(Op::Slice { starts, limits, strides }, shape, [operand].into_iter().collect()))
    }

    pub fn concatenate(&mut self, operands: &[NodeId], dim: usize) -> Result<NodeId> {
        for &id in operands {
            self.check_operand(id)?;
        }
        let shapes: Vec<&Shape> = operands.iter().map(|&id| self.node(id).shape()).collect();
        let shape = infer::concatenate(&shapes, dim)?;
        Ok(self.push(Op::Concatenate { dim }, shape, operands.iter().copied().collect()))
    }

    /// Rebuild an existing operator kind over new operands with an explicitly
    /// chosen output shape. Used by rewrite passes to clone nodes across
    /// computation boundaries.
    pub fn clone_with_operands(&mut self, op: Op, operands: &[NodeId], shape: Shape) -> Result<NodeId> {
        for &id in operands {
            self.check_operand(id)?;
        }
        let expected = match &op {
            Op::Parameter { .. } | Op::Constant(_) => Some(0),
            Op::Unary(_) | Op::Transpose { .. } | Op::Slice { .. } => Some(1),
            Op::Binary(_) | Op::Dot(_) => Some(2),
            Op::Concatenate { .. } | Op::Call { .. } => None,
        };
        if let Some(expected) = expected {
            ensure!(
                operands.len() == expected,
                OperandCountSnafu { op: op.name(), expected, actual: operands.len() }
            );
        }
        Ok(self.push(op, shape, operands.iter().copied().collect()))
    }

    // --- graph surgery ----------------------------------------------------

    /// Rewire every consumer of `old` to consume `new` instead, atomically.
    /// If `old` is the root, `new` becomes the root.
    pub fn replace_all_uses(&mut self, old: NodeId, new: NodeId) -> Result<()> {
        self.check_operand(old)?;
        self.check_operand(new)?;
        let mut rewired = 0usize;
        for node in &mut self.nodes {
            for operand in &mut node.operands {
                if *operand == old {
                    *operand = new;
                    rewired += 1;
                }
            }
        }
        if self.root == Some(old) {
            self.root = Some(new);
        }
        trace!(computation = %self.name, old = old.0, new = new.0, rewired, "replaced node uses");
        Ok(())
    }

    /// Nodes reachable from the root, operands before consumers. Empty if no
    /// root is set.
    pub fn post_order(&self) -> Vec<NodeId> {
        let Some(root) = self.root else { return Vec::new() };
        let mut visited = vec![false; self.nodes.len()];
        let mut order = Vec::new();
        let mut stack = vec![(root, false)];
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                order.push(id);
                continue;
            }
            if std::mem::replace(&mut visited[id.0], true) {
                continue;
            }
            stack.push((id, true));
            for &operand in self.node(id).operands().iter().rev() {
                if !visited[operand.0] {
                    stack.push((operand, false));
                }
            }
        }
        order
    }
}

/// Owns all computations of a program: the entry computation plus any
/// auxiliaries added by passes.
#[derive(Debug, Clone, Default)]
pub struct Module {
    name: String,
    computations: Vec<Computation>,
    entry: Option<ComputationId>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), computations: Vec::new(), entry: None }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add an auxiliary computation, returning a handle usable as a call target.
    pub fn add_computation(&mut self, computation: Computation) -> ComputationId {
        let id = ComputationId(self.computations.len());
        self.computations.push(computation);
        id
    }

    /// Add a computation and mark it as the module's entry point.
    pub fn add_entry_computation(&mut self, computation: Computation) -> ComputationId {
        let id = self.add_computation(computation);
        self.entry = Some(id);
        id
    }

    pub fn entry(&self) -> Option<ComputationId> {
        self.entry
    }

    pub fn computation(&self, id: ComputationId) -> &Computation {
        &self.computations[id.0]
    }

    pub fn computation_mut(&mut self, id: ComputationId) -> &mut Computation {
        &mut self.computations[id.0]
    }

    pub fn computations(&self) -> &[Computation] {
        &self.computations
    }

    /// Ids of all computations currently in the module, in insertion order.
    pub fn computation_ids(&self) -> Vec<ComputationId> {
        (0..self.computations.len()).map(ComputationId).collect()
    }

    /// Emit a call node in `caller` invoking `target` on `args`.
    ///
    /// Validates the argument list against the target's parameters; the call's
    /// shape is the target root's shape.
    pub fn add_call(&mut self, caller: ComputationId, target: ComputationId, args: &[NodeId]) -> Result<NodeId> {
        ensure!(target.0 < self.computations.len(), UnknownComputationSnafu { id: target.0 });
        ensure!(caller.0 < self.computations.len(), UnknownComputationSnafu { id: caller.0 });
        let callee = &self.computations[target.0];
        let root = callee.root().ok_or_else(|| {
            RootNotSetSnafu { computation: callee.name().to_owned() }.build()
        })?;
        ensure!(
            args.len() == callee.parameters().len(),
            CallArityMismatchSnafu {
                target: callee.name().to_owned(),
                expected: callee.parameters().len(),
                actual: args.len(),
            }
        );
        let param_shapes: Vec<Shape> =
            callee.parameters().iter().map(|&p| callee.node(p).shape().clone()).collect();
        let result_shape = callee.node(root).shape().clone();

        let caller = &mut self.computations[caller.0];
        for (index, (&arg, expected)) in args.iter().zip(&param_shapes).enumerate() {
            caller.check_operand(arg)?;
            let actual = caller.node(arg).shape();
            ensure!(
                *actual == *expected,
                CallArgumentShapeSnafu { index, expected: expected.clone(), actual: actual.clone() }
            );
        }
        Ok(caller.push(Op::Call { target }, result_shape, args.iter().copied().collect()))
    }
}
