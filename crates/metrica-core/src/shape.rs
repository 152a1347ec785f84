use std::fmt;

// Shape: ordered per-axis extents of a tensor
//
//   - Scalar: Shape([])          -> 0 axes, 1 element
//   - Vector: Shape([5])         -> 1 axis, 5 elements
//   - Matrix: Shape([3, 4])      -> 2 axes, 12 elements
//   - Cube:   Shape([2, 3, 4])   -> 3 axes, 24 elements
//
// An extent of 0 is legal and yields an empty tensor. The shape alone fixes
// the element count and the row-major strides; there is no broadcasting.

/// N-dimensional shape of a tensor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Shape(Vec<usize>);

impl Shape {
    /// Create a new shape from a vector of dimension sizes.
    pub fn new(dims: Vec<usize>) -> Self {
        Shape(dims)
    }

    /// The scalar (rank 0) shape.
    pub fn scalar() -> Self {
        Shape(Vec::new())
    }

    /// The dimension sizes as a slice.
    pub fn dims(&self) -> &[usize] {
        &self.0
    }

    /// Number of axes (0 for scalar, 1 for vector, 2 for matrix, etc.).
    pub fn rank(&self) -> usize {
        self.0.len()
    }

    /// Total number of elements (product of all extents).
    /// The empty product is 1, so the scalar shape holds one element.
    pub fn elem_count(&self) -> usize {
        self.0.iter().product()
    }

    /// Compute the row-major (C-order) strides for this shape.
    ///
    /// For shape [2, 3, 4], strides are [12, 4, 1]: the last axis is
    /// contiguous and each earlier axis jumps over everything after it.
    pub fn stride_contiguous(&self) -> Vec<usize> {
        let mut strides = vec![0usize; self.rank()];
        if self.rank() > 0 {
            strides[self.rank() - 1] = 1;
            for i in (0..self.rank() - 1).rev() {
                strides[i] = strides[i + 1] * self.0[i + 1];
            }
        }
        strides
    }

    /// Size of a specific axis.
    pub fn dim(&self, axis: usize) -> crate::Result<usize> {
        self.0.get(axis).copied().ok_or(crate::Error::InvalidAxis {
            axis,
            rank: self.rank(),
        })
    }

    /// Decompose a flat row-major offset into one index per axis.
    ///
    /// Walks from the last axis backward with a modulo/division chain, so
    /// `unravel_index(23)` on [2, 3, 4] gives [1, 2, 3]. The offset is not
    /// range-checked; callers pass offsets below `elem_count()`.
    pub fn unravel_index(&self, offset: usize) -> Vec<usize> {
        let mut indices = vec![0usize; self.rank()];
        let mut remaining = offset;
        for axis in (0..self.rank()).rev() {
            let extent = self.0[axis];
            if extent == 0 {
                continue;
            }
            indices[axis] = remaining % extent;
            remaining /= extent;
        }
        indices
    }

    /// The shape with the listed axes removed, keeping the order of the rest.
    pub fn without_axes(&self, axes: &[usize]) -> Shape {
        Shape(
            self.0
                .iter()
                .enumerate()
                .filter(|(i, _)| !axes.contains(i))
                .map(|(_, &d)| d)
                .collect(),
        )
    }

    /// Whether this is a rank-2 `[n, n]` shape.
    pub fn is_square(&self) -> bool {
        self.rank() == 2 && self.0[0] == self.0[1]
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", d)?;
        }
        write!(f, "]")
    }
}

// Convenient From implementations
// These let you write: Shape::from((3, 4)) instead of Shape::new(vec![3, 4])

impl From<()> for Shape {
    /// Scalar shape (0 axes).
    fn from(_: ()) -> Self {
        Shape(vec![])
    }
}

impl From<usize> for Shape {
    /// 1-D shape.
    fn from(d: usize) -> Self {
        Shape(vec![d])
    }
}

impl From<(usize,)> for Shape {
    fn from((d0,): (usize,)) -> Self {
        Shape(vec![d0])
    }
}

impl From<(usize, usize)> for Shape {
    fn from((d0, d1): (usize, usize)) -> Self {
        Shape(vec![d0, d1])
    }
}

impl From<(usize, usize, usize)> for Shape {
    fn from((d0, d1, d2): (usize, usize, usize)) -> Self {
        Shape(vec![d0, d1, d2])
    }
}

impl From<(usize, usize, usize, usize)> for Shape {
    fn from((d0, d1, d2, d3): (usize, usize, usize, usize)) -> Self {
        Shape(vec![d0, d1, d2, d3])
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(dims: [usize; N]) -> Self {
        Shape(dims.to_vec())
    }
}

impl From<Vec<usize>> for Shape {
    fn from(v: Vec<usize>) -> Self {
        Shape(v)
    }
}

impl From<&[usize]> for Shape {
    fn from(s: &[usize]) -> Self {
        Shape(s.to_vec())
    }
}

impl From<&Shape> for Shape {
    fn from(s: &Shape) -> Self {
        s.clone()
    }
}
