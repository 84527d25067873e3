//! Split-dimension selection and chunk-size factorization.
//!
//! A chunk size is only ever built by removing prime factors from the
//! dimension's extent, so it always divides the extent exactly: the rewrite
//! never needs remainder chunks or overlap.

use tessel_ir::Shape;
use tracing::trace;

use crate::config::SplitConfig;

/// First 64 primes. Extents whose factors all fall in this table (anything
/// not divisible by a prime above 311) factor completely; residual larger
/// factors are simply never divided out.
const PRIMES: [usize; 64] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97, 101, 103, 107,
    109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193, 197, 199, 211, 223, 227, 229,
    233, 239, 241, 251, 257, 263, 269, 271, 277, 281, 283, 293, 307, 311,
];

/// Largest divisor of dimension `dim`'s extent whose projected per-chunk
/// working set fits the budgets, or `None` if no divisor keeps the working
/// set within the hard maximum.
///
/// Greedy in ascending prime order: repeatedly divide out the smallest
/// remaining prime factor while the projected size `chunk × other_elements`
/// still exceeds the soft target. The result is the largest factor-respecting
/// size meeting the target when one exists; otherwise the smallest reachable
/// size is still accepted as long as it fits the hard maximum.
pub fn best_chunk_size(shape: &Shape, dim: usize, config: &SplitConfig) -> Option<usize> {
    let extent = shape.dim(dim);
    if extent == 0 {
        return None;
    }
    // Product of all other dimensions, held constant by the split.
    let other_elements = shape.elements() / extent;

    let mut multiplicity = [0u32; PRIMES.len()];
    let mut rest = extent;
    for (slot, &prime) in multiplicity.iter_mut().zip(&PRIMES) {
        while rest % prime == 0 {
            *slot += 1;
            rest /= prime;
        }
    }

    let mut chunk = extent;
    for (slot, &prime) in multiplicity.iter_mut().zip(&PRIMES) {
        while chunk * other_elements > config.target_intermediate_elements && *slot > 0 {
            chunk /= prime;
            *slot -= 1;
        }
    }

    (chunk * other_elements <= config.max_intermediate_elements).then_some(chunk)
}

/// Best dimension of `shape` to split on, ignoring `excluded` (the
/// contraction's own dimensions): the largest-extent dimension that admits a
/// valid chunk size. Ties keep the first dimension seen. `None` when no
/// dimension qualifies.
pub fn best_split_dim(shape: &Shape, excluded: &[usize], config: &SplitConfig) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for dim in 0..shape.rank() {
        if excluded.contains(&dim) {
            continue;
        }
        let extent = shape.dim(dim);
        if best.is_none_or(|(_, best_extent)| extent > best_extent)
            && best_chunk_size(shape, dim, config).is_some()
        {
            best = Some((dim, extent));
        }
    }
    trace!(shape = %shape, ?excluded, ?best, "split dimension search");
    best.map(|(dim, _)| dim)
}
