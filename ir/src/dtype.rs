//! Element type definitions.

/// Scalar element type of a tensor.
///
/// The interpreter stores every element as `f64` regardless of the declared
/// type; the type still participates in shape equality so that mixed-type
/// graphs are rejected at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    F32,
    F64,
    I32,
    I64,
}

impl ElementType {
    /// Size of one element in bytes.
    pub const fn size_of(self) -> usize {
        match self {
            ElementType::F32 | ElementType::I32 => 4,
            ElementType::F64 | ElementType::I64 => 8,
        }
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ElementType::F32 => "f32",
            ElementType::F64 => "f64",
            ElementType::I32 => "i32",
            ElementType::I64 => "i64",
        };
        f.write_str(name)
    }
}
