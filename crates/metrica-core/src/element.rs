use std::fmt;
use std::ops::{Add, Mul};

// Element: the capability contract for values stored in a tensor
//
// A tensor only ever needs to: default-construct a value, copy it, add two
// values, multiply two values and print a value. Nothing else is assumed:
// no commutativity, no inverses, not even that `zero() + x == x`. That is
// enough for every numeric primitive and also for purely symbolic element
// types (e.g. expression strings that concatenate under `+` and `*`).
//
// `zero()` seeds accumulations (sum, contractions). `one()` is the diagonal
// of the implicit identity metric.

/// Trait implemented by types that can be stored in a [`Tensor`](crate::Tensor).
pub trait Element:
    Clone + Default + Add<Output = Self> + Mul<Output = Self> + fmt::Display + fmt::Debug
{
    /// The additive identity. Defaults to `Self::default()`.
    fn zero() -> Self {
        Self::default()
    }

    /// The multiplicative identity (the Kronecker delta's `1`).
    fn one() -> Self;
}

macro_rules! impl_numeric_element {
    ($($t:ty),* $(,)?) => {
        $(
            impl Element for $t {
                fn zero() -> Self {
                    <$t as num_traits::Zero>::zero()
                }

                fn one() -> Self {
                    <$t as num_traits::One>::one()
                }
            }
        )*
    };
}

impl_numeric_element!(
    f32,
    f64,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    half::f16,
    half::bf16,
);
