//! # metrica
//!
//! Dense N-dimensional tensors with shape algebra, Kronecker products and
//! metric-weighted contractions.
//!
//! This is the facade crate that re-exports everything you need.
//!
//! ## Usage
//!
//! ```rust
//! use metrica::prelude::*;
//!
//! let v = Tensor::from_vec(vec![1.0, 2.0, 3.0], 3)?;
//! assert_eq!(v.pseudo_norm()?, 14.0);
//!
//! let mut g = Tensor::<f64>::eye(3);
//! g[[1, 1]] = -1.0;
//! g[[2, 2]] = -1.0;
//! let v = v.with_metric(g)?;
//! assert_eq!(v.pseudo_norm()?, -12.0);
//! # Ok::<(), metrica::Error>(())
//! ```
//!
//! ## Architecture
//!
//! | Crate | Purpose |
//! |-------|---------|
//! | `metrica-core` | Tensor, Shape, Layout, Element, Error, printing |
//! | `metrica` | Re-exports and prelude |

/// Re-export core types.
pub use metrica_core::{
    display::PrintOptions,
    layout::{IndexIter, Layout},
    Element, Error, Result, Shape, Tensor,
};

/// Prelude: import this for the most common types.
pub mod prelude {
    pub use crate::{Element, Error, PrintOptions, Result, Shape, Tensor};
}
