use crate::error::{Error, Result};
use crate::shape::Shape;

// Layout: shape + row-major strides
//
// Every tensor owns a contiguous buffer, so the layout is always the
// row-major derivation of its shape: there are no offsets and no views.
// Keeping shape and strides in one value means they can only change
// together, which is how the strides stay in sync after a reshape.
//
//   flat offset = Σ index[d] * stride[d]
//
// For a [2, 3] matrix the strides are [3, 1]: row 1 starts at offset 3 and
// consecutive columns are 1 apart.

/// Layout describes how a tensor's logical shape maps to flat storage.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Layout {
    shape: Shape,
    strides: Vec<usize>,
}

impl Layout {
    /// Create a contiguous row-major layout for the given shape.
    pub fn contiguous(shape: Shape) -> Self {
        let strides = shape.stride_contiguous();
        Layout { shape, strides }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    pub fn dims(&self) -> &[usize] {
        self.shape.dims()
    }

    pub fn elem_count(&self) -> usize {
        self.shape.elem_count()
    }

    /// Compute the flat offset for a multi-index, validating it first.
    ///
    /// Fails with `IndexArity` when the index has the wrong number of
    /// components and with `IndexOutOfRange` when a component is past the
    /// end of its axis. Never clamps or wraps.
    pub fn flat_index(&self, index: &[usize]) -> Result<usize> {
        if index.len() != self.rank() {
            return Err(Error::IndexArity {
                expected: self.rank(),
                got: index.len(),
            });
        }
        let mut flat = 0;
        for (axis, (&idx, &size)) in index.iter().zip(self.dims()).enumerate() {
            if idx >= size {
                return Err(Error::IndexOutOfRange {
                    axis,
                    index: idx,
                    size,
                });
            }
            flat += idx * self.strides[axis];
        }
        Ok(flat)
    }

    /// Flat offset of a multi-index already known to be in range.
    pub(crate) fn offset_of(&self, index: &[usize]) -> usize {
        index
            .iter()
            .zip(&self.strides)
            .map(|(&idx, &stride)| idx * stride)
            .sum()
    }

    /// Inverse of `flat_index`: the multi-index stored at a flat offset.
    pub fn unravel(&self, offset: usize) -> Vec<usize> {
        self.shape.unravel_index(offset)
    }

    /// Iterator over every multi-index of this layout, in row-major order
    /// (the same order as the flat buffer).
    pub fn indices(&self) -> IndexIter {
        IndexIter::new(self.dims())
    }
}

// IndexIter: walks all multi-indices of a shape in row-major order
//
// The last axis varies fastest, so the n-th item is exactly
// `shape.unravel_index(n)`. Operations that need logical positions (slice,
// permute, products, contractions, printing) use this instead of decoding
// every offset with a division chain.

/// Iterator yielding each multi-index of a shape, last axis fastest.
#[derive(Debug, Clone)]
pub struct IndexIter {
    /// Current multi-index (e.g., [0, 0, 0]).
    current: Vec<usize>,
    /// The shape dimensions.
    dims: Vec<usize>,
    /// Total items remaining.
    remaining: usize,
    /// Whether we've started yet.
    started: bool,
}

impl IndexIter {
    pub fn new(dims: &[usize]) -> Self {
        IndexIter {
            current: vec![0; dims.len()],
            dims: dims.to_vec(),
            remaining: dims.iter().product(),
            started: false,
        }
    }

    /// Advance the multi-index by one (rightmost axis first).
    fn advance(&mut self) {
        for i in (0..self.dims.len()).rev() {
            self.current[i] += 1;
            if self.current[i] < self.dims[i] {
                return;
            }
            self.current[i] = 0;
        }
    }
}

impl Iterator for IndexIter {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.remaining == 0 {
            return None;
        }
        if self.started {
            self.advance();
        }
        self.started = true;
        self.remaining -= 1;
        Some(self.current.clone())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for IndexIter {}
