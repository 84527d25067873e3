//! Graph optimization passes for the tessel compiler.
//!
//! The centerpiece is the dot-splitting pass: contractions whose operands are
//! too large to materialize are recomputed chunk by chunk along one dimension
//! and the partial results concatenated back, bounding peak intermediate
//! memory without changing results.
//!
//! # Module Organization
//!
//! - [`config`] - Size-budget configuration
//! - [`analysis`] - Which operands are worth and safe to split
//! - [`chunking`] - Split-dimension selection and chunk-size factorization
//! - [`builder`] - Reconstruction of a splittable chain as a sub-computation
//! - [`rewrite`] - The per-contraction rewrite and the pass entry point
//! - [`error`] - Error types and result handling

pub mod analysis;
pub mod builder;
pub mod chunking;
pub mod config;
pub mod error;
pub mod rewrite;

#[cfg(test)]
pub mod test;

pub use config::SplitConfig;
pub use error::{Error, Result};
pub use rewrite::DotSplitter;
