//! Shape type: element type plus ordered dimension extents.

use smallvec::SmallVec;

use crate::dtype::ElementType;

/// Dimension extents. Inline capacity of 4 avoids heap allocation for the
/// common tensor ranks (1D-4D).
pub type Dims = SmallVec<[usize; 4]>;

/// Shape of a tensor: element type and ordered dimension extents.
///
/// Immutable once constructed; derive new shapes through [`Shape::with_dim`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    element_type: ElementType,
    dims: Dims,
}

impl Shape {
    pub fn new(element_type: ElementType, dims: impl IntoIterator<Item = usize>) -> Self {
        Self { element_type, dims: dims.into_iter().collect() }
    }

    /// Rank-0 shape holding a single element.
    pub fn scalar(element_type: ElementType) -> Self {
        Self { element_type, dims: Dims::new() }
    }

    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Extent of dimension `dim`.
    ///
    /// # Panics
    ///
    /// Panics if `dim >= rank()`; callers validate indices at construction.
    pub fn dim(&self, dim: usize) -> usize {
        self.dims[dim]
    }

    /// Total element count: the product of all extents (1 for scalars).
    pub fn elements(&self) -> usize {
        self.dims.iter().product()
    }

    /// Copy of this shape with dimension `dim` narrowed (or widened) to `extent`.
    pub fn with_dim(&self, dim: usize, extent: usize) -> Self {
        let mut dims = self.dims.clone();
        dims[dim] = extent;
        Self { element_type: self.element_type, dims }
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[", self.element_type)?;
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{d}")?;
        }
        write!(f, "]")
    }
}
