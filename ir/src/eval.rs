//! Reference interpreter over literals.
//!
//! Evaluates a module on host-side [`Literal`] inputs. This is a correctness
//! oracle for graph transformations, not an execution backend: everything is
//! computed element by element in `f64`.

use smallvec::SmallVec;
use snafu::ensure;

use crate::error::*;
use crate::graph::{Computation, ComputationId, Module, NodeId};
use crate::literal::{Literal, for_each_index};
use crate::op::{BinaryKind, DotDims, Op, UnaryKind};

/// Evaluate the module's entry computation on positionally bound inputs.
pub fn evaluate(module: &Module, inputs: &[Literal]) -> Result<Literal> {
    let entry = module.entry().ok_or(Error::EntryNotSet)?;
    evaluate_computation(module, entry, inputs)
}

/// Evaluate one computation of the module on positionally bound arguments.
pub fn evaluate_computation(module: &Module, id: ComputationId, args: &[Literal]) -> Result<Literal> {
    let computation = module.computation(id);
    ensure!(
        args.len() == computation.parameters().len(),
        EvalArityMismatchSnafu {
            computation: computation.name().to_owned(),
            expected: computation.parameters().len(),
            actual: args.len(),
        }
    );
    let root = computation.root().ok_or_else(|| {
        RootNotSetSnafu { computation: computation.name().to_owned() }.build()
    })?;

    let mut values: Vec<Option<Literal>> = vec![None; computation.len()];
    for node_id in computation.post_order() {
        let value = eval_node(module, computation, node_id, args, &values)?;
        values[node_id.index()] = Some(value);
    }
    Ok(values[root.index()].take().expect("root evaluated by post-order walk"))
}

fn eval_node(
    module: &Module,
    computation: &Computation,
    id: NodeId,
    args: &[Literal],
    values: &[Option<Literal>],
) -> Result<Literal> {
    let node = computation.node(id);
    let operand = |n: usize| -> &Literal {
        values[node.operands()[n].index()].as_ref().expect("operand evaluated before consumer")
    };

    let value = match node.op() {
        Op::Parameter { index, .. } => args[*index].clone(),
        Op::Constant(literal) => literal.clone(),
        Op::Unary(kind) => {
            let input = operand(0);
            let values = input.values().iter().map(|&x| eval_unary(*kind, x)).collect();
            Literal::new(input.shape().clone(), values)?
        }
        Op::Binary(kind) => {
            let (lhs, rhs) = (operand(0), operand(1));
            let values = lhs.values().iter().zip(rhs.values()).map(|(&a, &b)| eval_binary(*kind, a, b)).collect();
            Literal::new(lhs.shape().clone(), values)?
        }
        Op::Transpose { permutation } => {
            let input = operand(0);
            let mut out = Literal::zeros(node.shape().clone());
            let mut source: SmallVec<[usize; 4]> = SmallVec::from_elem(0, permutation.len());
            for_each_index(node.shape().dims(), |index| {
                for (d, &p) in permutation.iter().enumerate() {
                    source[p] = index[d];
                }
                out.set(index, input.at(&source));
            });
            out
        }
        Op::Dot(dims) => eval_dot(operand(0), operand(1), dims, node.shape().dims()),
        Op::Slice { starts, strides, .. } => {
            let input = operand(0);
            let mut out = Literal::zeros(node.shape().clone());
            let mut source: SmallVec<[usize; 4]> = SmallVec::from_elem(0, starts.len());
            for_each_index(node.shape().dims(), |index| {
                for d in 0..starts.len() {
                    source[d] = starts[d] + index[d] * strides[d];
                }
                out.set(index, input.at(&source));
            });
            out
        }
        Op::Concatenate { dim } => {
            let mut out = Literal::zeros(node.shape().clone());
            let mut offset = 0;
            let mut target: SmallVec<[usize; 4]> = SmallVec::from_elem(0, node.shape().rank());
            for n in 0..node.operands().len() {
                let part = operand(n);
                for_each_index(part.shape().dims(), |index| {
                    target.copy_from_slice(index);
                    target[*dim] += offset;
                    out.set(&target, part.at(index));
                });
                offset += part.shape().dim(*dim);
            }
            out
        }
        Op::Call { target } => {
            let call_args: Vec<Literal> = (0..node.operands().len()).map(|n| operand(n).clone()).collect();
            evaluate_computation(module, *target, &call_args)?
        }
    };
    Ok(value)
}

fn eval_dot(lhs: &Literal, rhs: &Literal, dims: &DotDims, out_dims: &[usize]) -> Literal {
    let free = |rank: usize, contracting: &[usize]| {
        (0..rank).filter(|d| !contracting.contains(d)).collect::<SmallVec<[usize; 4]>>()
    };
    let lhs_free = free(lhs.shape().rank(), &dims.lhs_contracting);
    let rhs_free = free(rhs.shape().rank(), &dims.rhs_contracting);
    let contracted: SmallVec<[usize; 4]> =
        dims.lhs_contracting.iter().map(|&d| lhs.shape().dim(d)).collect();

    let mut out = Literal::zeros(crate::shape::Shape::new(lhs.shape().element_type(), out_dims.iter().copied()));
    let mut lhs_index: SmallVec<[usize; 4]> = SmallVec::from_elem(0, lhs.shape().rank());
    let mut rhs_index: SmallVec<[usize; 4]> = SmallVec::from_elem(0, rhs.shape().rank());
    for_each_index(out_dims, |out_index| {
        let mut acc = 0.0;
        for_each_index(&contracted, |k| {
            for (pos, &d) in lhs_free.iter().enumerate() {
                lhs_index[d] = out_index[pos];
            }
            for (pos, &d) in dims.lhs_contracting.iter().enumerate() {
                lhs_index[d] = k[pos];
            }
            for (pos, &d) in rhs_free.iter().enumerate() {
                rhs_index[d] = out_index[lhs_free.len() + pos];
            }
            for (pos, &d) in dims.rhs_contracting.iter().enumerate() {
                rhs_index[d] = k[pos];
            }
            acc += lhs.at(&lhs_index) * rhs.at(&rhs_index);
        });
        out.set(out_index, acc);
    });
    out
}

fn eval_unary(kind: UnaryKind, x: f64) -> f64 {
    match kind {
        UnaryKind::Neg => -x,
        UnaryKind::Abs => x.abs(),
        UnaryKind::Exp => x.exp(),
        UnaryKind::Log => x.ln(),
        UnaryKind::Tanh => x.tanh(),
        UnaryKind::Sqrt => x.sqrt(),
        UnaryKind::Floor => x.floor(),
    }
}

fn eval_binary(kind: BinaryKind, a: f64, b: f64) -> f64 {
    match kind {
        BinaryKind::Add => a + b,
        BinaryKind::Sub => a - b,
        BinaryKind::Mul => a * b,
        BinaryKind::Max => a.max(b),
    }
}
