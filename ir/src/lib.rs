//! Intermediate representation for the tessel compiler.
//!
//! This crate defines the dataflow-graph substrate the optimization passes
//! operate on: typed shapes, an operation enum, computations (single-rooted
//! DAGs of nodes held in an arena), and the module that owns them.
//!
//! # Module Organization
//!
//! - [`dtype`] - Element type definitions
//! - [`shape`] - Shape (element type + dimension extents)
//! - [`literal`] - Dense host-side tensor values
//! - [`op`] - Operation enum defining all IR operations
//! - [`graph`] - Nodes, computations, and the owning module
//! - [`infer`] - Shape inference rules per operation kind
//! - [`matching`] - Structural matchers used by rewrite passes
//! - [`eval`] - Reference interpreter over literals
//! - [`error`] - Error types and result handling

pub mod dtype;
pub mod error;
pub mod eval;
pub mod graph;
pub mod infer;
pub mod literal;
pub mod matching;
pub mod op;
pub mod shape;

#[cfg(test)]
pub mod test;

// Re-exports for the common working set.
pub use dtype::ElementType;
pub use error::{Error, Result};
pub use eval::evaluate;
pub use graph::{Computation, ComputationId, Module, Node, NodeId};
pub use literal::Literal;
pub use op::{BinaryKind, DotDims, Op, UnaryKind};
pub use shape::Shape;
