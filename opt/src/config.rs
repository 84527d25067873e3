//! Size-budget configuration for the dot-splitting pass.

/// Element-count budgets steering the dot-splitting pass.
///
/// Both are element counts, not bytes. `max_intermediate_elements` is the
/// hard line: operands above it are split, and no chosen chunk may project a
/// working set above it. `target_intermediate_elements` is the soft goal the
/// chunk-size search aims for; it may be missed when the dimension's integer
/// factors don't reach it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitConfig {
    pub max_intermediate_elements: usize,
    pub target_intermediate_elements: usize,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self { max_intermediate_elements: 1_000_000, target_intermediate_elements: 200_000 }
    }
}
