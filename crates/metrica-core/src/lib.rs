//! # metrica-core
//!
//! Dense N-dimensional tensors with shape algebra and metric-weighted
//! contractions.
//!
//! This crate provides:
//! - [`Tensor`]: flat row-major array with an optional attached metric
//! - [`Shape`] / [`Layout`]: extents, strides and index mapping
//! - [`Element`]: the capability trait for stored values
//! - [`PrintOptions`]: configuration for textual dumps
//! - [`Error`] / [`Result`]: the crate-wide error type
// - Shape: ordered per-axis extents
// - Layout: shape + row-major strides, checked index mapping
// - Element: +, *, default, clone, display; zero() and one()
// - Tensor: storage, elementwise ops, reshape/slice/permute,
//   Kronecker product, contractions, pseudo-norm
// - display: Display impl, render/describe/print

pub mod display;
pub mod element;
pub mod error;
pub mod layout;
pub mod shape;
pub mod tensor;

pub use display::PrintOptions;
pub use element::Element;
pub use error::{Error, Result};
pub use layout::{IndexIter, Layout};
pub use shape::Shape;
pub use tensor::Tensor;
