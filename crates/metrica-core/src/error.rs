use crate::shape::Shape;

/// All errors that can occur within metrica.
///
/// Every variant is a precondition violation detected before any result is
/// handed back, so a failed operation never leaves a half-written tensor
/// behind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Elementwise operation on tensors of differing shape (e.g. [2,3] + [3,2]).
    #[error("shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: Shape, got: Shape },

    /// Multi-index with the wrong number of components.
    #[error("index arity mismatch: tensor has {expected} axes, got {got} indices")]
    IndexArity { expected: usize, got: usize },

    /// Multi-index component past the end of its axis.
    #[error("index out of range: index {index} on axis {axis} of size {size}")]
    IndexOutOfRange {
        axis: usize,
        index: usize,
        size: usize,
    },

    /// Explicit value sequence does not fill the declared shape.
    #[error("element count mismatch: shape {shape} requires {expected} elements, got {got}")]
    ElementCountMismatch {
        shape: Shape,
        expected: usize,
        got: usize,
    },

    /// Cannot reshape because element counts differ.
    #[error(
        "cannot reshape: source has {src} elements, target shape {dst_shape} has {dst} elements"
    )]
    ReshapeSizeMismatch {
        src: usize,
        dst: usize,
        dst_shape: Shape,
    },

    /// Slice entry with an invalid axis, an empty/inverted range, or a range
    /// running past the axis extent.
    #[error("invalid slice range: axis {axis}, [{start}, {end}) on tensor of rank {rank} (axis size {size})")]
    InvalidSliceRange {
        axis: usize,
        start: usize,
        end: usize,
        rank: usize,
        size: usize,
    },

    /// Axis index out of range for the tensor's rank.
    #[error("invalid axis: axis {axis} for tensor with {rank} axes")]
    InvalidAxis { axis: usize, rank: usize },

    /// Self-contraction of an axis with itself.
    #[error("cannot contract axis {axis} with itself")]
    SameAxis { axis: usize },

    /// Self-contraction over axes of different extent.
    #[error("cannot contract axis {axis1} (size {size1}) with axis {axis2} (size {size2})")]
    AxisSizeMismatch {
        axis1: usize,
        size1: usize,
        axis2: usize,
        size2: usize,
    },

    /// Cross-tensor contraction over axes of different extent.
    #[error(
        "contraction dimension mismatch: lhs axis {lhs_axis} has size {lhs_size}, rhs axis {rhs_axis} has size {rhs_size}"
    )]
    ContractionDimensionMismatch {
        lhs_axis: usize,
        lhs_size: usize,
        rhs_axis: usize,
        rhs_size: usize,
    },

    /// Metric extent does not match the axis it weights.
    #[error("metric shape mismatch: expected [{expected}, {expected}], got {got}")]
    MetricShapeMismatch { expected: usize, got: Shape },

    /// Attached metric is not a square rank-2 tensor.
    #[error("metric must be a square rank-2 tensor, got shape {shape}")]
    MetricNotSquare { shape: Shape },

    /// Permutation order length differs from the tensor's rank.
    #[error("permutation arity mismatch: tensor has {expected} axes, order has {got}")]
    PermutationArity { expected: usize, got: usize },

    /// Permutation order is not a bijection of `0..rank`.
    #[error("invalid permutation {order:?}: every axis must appear exactly once")]
    InvalidPermutation { order: Vec<usize> },

    /// Metric-weighted norm on a tensor that is not vector-shaped.
    #[error("not a vector: pseudo-norm with a metric needs shape [n] or [n, 1, ...], got {shape}")]
    NotAVector { shape: Shape },

    /// An element's `Display` impl failed while rendering a tensor.
    #[error("failed to format tensor")]
    Format(#[from] std::fmt::Error),
}

/// Convenience Result type used throughout metrica.
pub type Result<T> = std::result::Result<T, Error>;
