use std::ops::{Index, IndexMut, Mul};

use rand::distributions::{Distribution, Standard};
use rand::Rng;

use crate::element::Element;
use crate::error::{Error, Result};
use crate::layout::{IndexIter, Layout};
use crate::shape::Shape;

// Tensor: dense N-dimensional array with an optional metric
//
// A Tensor is a flat row-major buffer plus the Layout (shape + strides) that
// gives it an N-dimensional reading. It may also carry a metric: a square
// rank-2 tensor used as the weighting matrix of inner products
// (`contract_with`, `contract_with_metric`, `pseudo_norm`).
//
// MEMORY MODEL:
//
//   The tensor exclusively owns its buffer and its metric. Clone is a deep
//   copy of both; a move hands both over; dropping the tensor drops both.
//   No two tensors ever share storage, so every shape transform (slice,
//   permute, product, contraction) materializes a fresh tensor.
//
// INVARIANTS:
//
//   1. data.len() == layout.elem_count()
//   2. layout strides are the row-major strides of the shape
//   3. an attached metric is rank-2 and square; its extent is checked
//      against the contracted axis only when it is used

/// A dense n-dimensional array of `T` with an optional attached metric.
///
/// # Example
/// ```
/// use metrica_core::Tensor;
///
/// let a = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], (2, 2))?;
/// let b = Tensor::full((2, 2), 1.0);
/// let c = a.add(&b)?;
/// assert_eq!(c[[1, 1]], 5.0);
/// # Ok::<(), metrica_core::Error>(())
/// ```
#[derive(Clone)]
pub struct Tensor<T: Element> {
    /// Row-major element buffer.
    data: Vec<T>,
    /// Shape + strides.
    layout: Layout,
    /// Inner-product weighting matrix, owned by this tensor.
    metric: Option<Box<Tensor<T>>>,
}

impl<T: Element> std::fmt::Debug for Tensor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", self.shape())
            .field("data", &self.data)
            .field("metric", &self.metric)
            .finish()
    }
}

impl<T: Element + PartialEq> PartialEq for Tensor<T> {
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape() && self.data == other.data && self.metric == other.metric
    }
}

impl<T: Element> Default for Tensor<T> {
    /// A 0-D tensor holding `T::default()`. This is what `std::mem::take`
    /// leaves behind.
    fn default() -> Self {
        Self::scalar(T::default())
    }
}

impl<T: Element> Tensor<T> {
    // Construction

    fn from_parts(data: Vec<T>, shape: Shape) -> Self {
        debug_assert_eq!(data.len(), shape.elem_count());
        Tensor {
            data,
            layout: Layout::contiguous(shape),
            metric: None,
        }
    }

    /// Create a tensor filled with `T::default()`.
    pub fn new(shape: impl Into<Shape>) -> Self {
        Self::full(shape, T::default())
    }

    /// Create a tensor filled with `T::zero()`.
    pub fn zeros(shape: impl Into<Shape>) -> Self {
        Self::full(shape, T::zero())
    }

    /// Create a tensor with every element set to `value`.
    pub fn full(shape: impl Into<Shape>, value: T) -> Self {
        let shape = shape.into();
        let data = vec![value; shape.elem_count()];
        Self::from_parts(data, shape)
    }

    /// Create a tensor from a flat row-major buffer.
    ///
    /// Fails with `ElementCountMismatch` when `data.len()` is not the
    /// product of the shape.
    pub fn from_vec(data: Vec<T>, shape: impl Into<Shape>) -> Result<Self> {
        let shape = shape.into();
        let expected = shape.elem_count();
        if data.len() != expected {
            return Err(Error::ElementCountMismatch {
                shape,
                expected,
                got: data.len(),
            });
        }
        Ok(Self::from_parts(data, shape))
    }

    /// Like `from_vec`, copying from a slice.
    pub fn from_slice(data: &[T], shape: impl Into<Shape>) -> Result<Self> {
        Self::from_vec(data.to_vec(), shape)
    }

    /// A 0-D tensor holding a single value.
    pub fn scalar(value: T) -> Self {
        Self::from_parts(vec![value], Shape::scalar())
    }

    /// The `n × n` identity: `one()` on the diagonal, `zero()` elsewhere.
    pub fn eye(n: usize) -> Self {
        let mut data = vec![T::zero(); n * n];
        for i in 0..n {
            data[i * n + i] = T::one();
        }
        Self::from_parts(data, Shape::from((n, n)))
    }

    /// Tensor of values drawn from the `Standard` distribution using the
    /// thread-local generator (uniform in [0, 1) for floats).
    pub fn rand(shape: impl Into<Shape>) -> Self
    where
        Standard: Distribution<T>,
    {
        Self::rand_with(shape, &mut rand::thread_rng())
    }

    /// Tensor of values drawn from the `Standard` distribution using `rng`.
    pub fn rand_with<R: Rng + ?Sized>(shape: impl Into<Shape>, rng: &mut R) -> Self
    where
        Standard: Distribution<T>,
    {
        let shape = shape.into();
        let data = (0..shape.elem_count()).map(|_| rng.gen()).collect();
        Self::from_parts(data, shape)
    }

    // Accessors

    /// The shape of this tensor.
    pub fn shape(&self) -> &Shape {
        self.layout.shape()
    }

    /// The dimensions as a slice (shortcut for shape().dims()).
    pub fn dims(&self) -> &[usize] {
        self.layout.dims()
    }

    /// Number of axes.
    pub fn rank(&self) -> usize {
        self.layout.rank()
    }

    /// Alias of `rank`.
    pub fn ndim(&self) -> usize {
        self.rank()
    }

    /// Total number of elements.
    pub fn elem_count(&self) -> usize {
        self.data.len()
    }

    /// Alias of `elem_count`.
    pub fn size(&self) -> usize {
        self.elem_count()
    }

    /// Row-major strides of the current shape.
    pub fn strides(&self) -> &[usize] {
        self.layout.strides()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The flat row-major buffer.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Mutable access to the flat buffer. Its length cannot change.
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the tensor and return its buffer (the metric is dropped).
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Iterator over every multi-index, in buffer order.
    pub fn indices(&self) -> IndexIter {
        self.layout.indices()
    }

    // Element access

    /// Element at a multi-index.
    pub fn get(&self, index: &[usize]) -> Result<&T> {
        let offset = self.layout.flat_index(index)?;
        Ok(&self.data[offset])
    }

    /// Mutable element at a multi-index.
    pub fn get_mut(&mut self, index: &[usize]) -> Result<&mut T> {
        let offset = self.layout.flat_index(index)?;
        Ok(&mut self.data[offset])
    }

    /// Overwrite the element at a multi-index.
    pub fn set(&mut self, index: &[usize], value: T) -> Result<()> {
        *self.get_mut(index)? = value;
        Ok(())
    }

    // Metric

    /// Attach a metric, replacing any previous one.
    ///
    /// The metric must be a square rank-2 tensor. Whether its extent matches
    /// a particular axis is checked when it is used.
    pub fn set_metric(&mut self, metric: Tensor<T>) -> Result<()> {
        if !metric.shape().is_square() {
            return Err(Error::MetricNotSquare {
                shape: metric.shape().clone(),
            });
        }
        log::debug!(
            "attaching {} metric to tensor of shape {}",
            metric.shape(),
            self.shape()
        );
        self.metric = Some(Box::new(metric));
        Ok(())
    }

    /// Builder form of `set_metric`.
    pub fn with_metric(mut self, metric: Tensor<T>) -> Result<Self> {
        self.set_metric(metric)?;
        Ok(self)
    }

    /// The attached metric, if any.
    pub fn metric(&self) -> Option<&Tensor<T>> {
        self.metric.as_deref()
    }

    /// Detach and return the metric.
    pub fn clear_metric(&mut self) -> Option<Tensor<T>> {
        let metric = self.metric.take().map(|m| *m);
        if metric.is_some() {
            log::debug!("detached metric from tensor of shape {}", self.shape());
        }
        metric
    }

    /// The metric's `[n, n]` buffer, or an error if its extent isn't `n`.
    fn metric_for(&self, n: usize) -> Result<Option<&[T]>> {
        match self.metric.as_deref() {
            None => Ok(None),
            Some(m) if m.dims() == [n, n] => Ok(Some(m.data())),
            Some(m) => Err(Error::MetricShapeMismatch {
                expected: n,
                got: m.shape().clone(),
            }),
        }
    }

    // Elementwise arithmetic

    fn zip_with(&self, rhs: &Self, f: impl Fn(T, T) -> T) -> Result<Self> {
        if self.shape() != rhs.shape() {
            return Err(Error::ShapeMismatch {
                expected: self.shape().clone(),
                got: rhs.shape().clone(),
            });
        }
        // Equal shapes mean equal strides, so equal offsets pair up.
        let data = self
            .data
            .iter()
            .zip(&rhs.data)
            .map(|(a, b)| f(a.clone(), b.clone()))
            .collect();
        Ok(Self::from_parts(data, self.shape().clone()))
    }

    /// Elementwise sum. Shapes must be identical.
    pub fn add(&self, rhs: &Self) -> Result<Self> {
        self.zip_with(rhs, |a, b| a + b)
    }

    /// Elementwise (Hadamard) product. Shapes must be identical.
    pub fn mul_elementwise(&self, rhs: &Self) -> Result<Self> {
        self.zip_with(rhs, |a, b| a * b)
    }

    /// Multiply every element by a scalar convertible into `T`.
    ///
    /// Also available as `&t * s` and, for primitive scalars, `s * &t`.
    pub fn scale<S: Into<T>>(&self, scalar: S) -> Self {
        let s: T = scalar.into();
        self.map(|v| v.clone() * s.clone())
    }

    /// Apply `f` to every element, producing a tensor of the same shape.
    pub fn map<U: Element>(&self, f: impl FnMut(&T) -> U) -> Tensor<U> {
        let data = self.data.iter().map(f).collect();
        Tensor::from_parts(data, self.shape().clone())
    }

    /// Sum of all elements, seeded with `T::default()`.
    pub fn sum(&self) -> T {
        self.data
            .iter()
            .cloned()
            .fold(T::default(), |acc, v| acc + v)
    }

    /// Overwrite every element with `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    // Shape transforms

    /// Relabel the buffer under a new shape with the same element count.
    /// The data order is untouched; the strides are recomputed.
    pub fn reshape(&mut self, new_shape: impl Into<Shape>) -> Result<()> {
        let new_shape = new_shape.into();
        let dst = new_shape.elem_count();
        if dst != self.data.len() {
            return Err(Error::ReshapeSizeMismatch {
                src: self.data.len(),
                dst,
                dst_shape: new_shape,
            });
        }
        self.layout = Layout::contiguous(new_shape);
        Ok(())
    }

    /// Copying form of `reshape`.
    pub fn reshaped(&self, new_shape: impl Into<Shape>) -> Result<Self> {
        let mut out = self.clone();
        out.reshape(new_shape)?;
        Ok(out)
    }

    /// The buffer as a rank-1 `[size]` tensor.
    pub fn flatten(&self) -> Self {
        Self::from_parts(self.data.clone(), Shape::from(self.data.len()))
    }

    /// Extract the hyper-rectangle `[start, end)` along each listed axis.
    ///
    /// Each entry is `(axis, start, end)`; axes not listed keep their full
    /// extent. Fails with `InvalidSliceRange` if an axis is out of range,
    /// the range is empty or inverted, or `end` is past the axis extent.
    ///
    /// ```
    /// use metrica_core::Tensor;
    ///
    /// let t = Tensor::from_vec((0..9).collect::<Vec<i32>>(), (1, 9))?;
    /// let s = t.slice(&[(1, 3, 6)])?;
    /// assert_eq!(s.dims(), &[1, 3]);
    /// assert_eq!(s.data(), &[3, 4, 5]);
    /// # Ok::<(), metrica_core::Error>(())
    /// ```
    pub fn slice(&self, ranges: &[(usize, usize, usize)]) -> Result<Self> {
        let rank = self.rank();
        let mut bounds: Vec<(usize, usize)> = self.dims().iter().map(|&d| (0, d)).collect();
        for &(axis, start, end) in ranges {
            let size = self.dims().get(axis).copied().unwrap_or(0);
            if axis >= rank || start >= end || end > size {
                return Err(Error::InvalidSliceRange {
                    axis,
                    start,
                    end,
                    rank,
                    size,
                });
            }
            bounds[axis] = (start, end);
        }
        let new_dims: Vec<usize> = bounds.iter().map(|&(start, end)| end - start).collect();

        // Positions inside the box come out of a row-major walk in the box's
        // own row-major order, so they can be appended directly.
        let mut data = Vec::with_capacity(new_dims.iter().product());
        for (idx, value) in self.indices().zip(&self.data) {
            let inside = idx
                .iter()
                .zip(&bounds)
                .all(|(&i, &(start, end))| i >= start && i < end);
            if inside {
                data.push(value.clone());
            }
        }
        Ok(Self::from_parts(data, Shape::new(new_dims)))
    }

    /// Reorder axes: axis `i` of the result is axis `order[i]` of `self`.
    ///
    /// permute(&[2, 0, 1]) on [A, B, C] → [C, A, B]
    ///
    /// `order` must be a permutation of `0..rank`.
    pub fn permute(&self, order: &[usize]) -> Result<Self> {
        let rank = self.rank();
        if order.len() != rank {
            return Err(Error::PermutationArity {
                expected: rank,
                got: order.len(),
            });
        }
        // Check for duplicates and out-of-range
        let mut seen = vec![false; rank];
        for &d in order {
            if d >= rank || seen[d] {
                return Err(Error::InvalidPermutation {
                    order: order.to_vec(),
                });
            }
            seen[d] = true;
        }

        let old_dims = self.dims();
        let new_shape = Shape::new(order.iter().map(|&d| old_dims[d]).collect());
        let new_layout = Layout::contiguous(new_shape);
        let mut data = vec![T::default(); self.data.len()];
        let mut new_idx = vec![0usize; rank];
        for (old_idx, value) in self.indices().zip(&self.data) {
            for (j, &src) in order.iter().enumerate() {
                new_idx[j] = old_idx[src];
            }
            data[new_layout.offset_of(&new_idx)] = value.clone();
        }
        Ok(Tensor {
            data,
            layout: new_layout,
            metric: None,
        })
    }

    // Product / contraction family

    /// Kronecker product.
    ///
    /// The result has rank `max(rank_a, rank_b)`; a missing trailing axis on
    /// either side counts as extent 1. Along axis `k` the result has extent
    /// `a_k * b_k` and element `(i_k * b_k + j_k)` is `a[i] * b[j]`.
    pub fn tensor_product(&self, other: &Self) -> Self {
        let rank = self.rank().max(other.rank());
        let pad = |dims: &[usize]| -> Vec<usize> {
            (0..rank).map(|k| dims.get(k).copied().unwrap_or(1)).collect()
        };
        let dims_a = pad(self.dims());
        let dims_b = pad(other.dims());
        let new_shape = Shape::new(dims_a.iter().zip(&dims_b).map(|(a, b)| a * b).collect());
        log::trace!(
            "tensor_product: {} (x) {} -> {}",
            self.shape(),
            other.shape(),
            new_shape
        );

        let layout = Layout::contiguous(new_shape);
        let mut data = vec![T::default(); layout.elem_count()];
        let mut new_idx = vec![0usize; rank];
        for (idx_a, a) in self.indices().zip(&self.data) {
            for (idx_b, b) in other.indices().zip(&other.data) {
                for k in 0..rank {
                    let ia = idx_a.get(k).copied().unwrap_or(0);
                    let ib = idx_b.get(k).copied().unwrap_or(0);
                    new_idx[k] = ia * dims_b[k] + ib;
                }
                data[layout.offset_of(&new_idx)] = a.clone() * b.clone();
            }
        }
        Tensor {
            data,
            layout,
            metric: None,
        }
    }

    /// Validate a pair of axes of `self` for self-contraction and return
    /// their common extent.
    fn check_axis_pair(&self, axis1: usize, axis2: usize) -> Result<usize> {
        let rank = self.rank();
        for axis in [axis1, axis2] {
            if axis >= rank {
                return Err(Error::InvalidAxis { axis, rank });
            }
        }
        if axis1 == axis2 {
            return Err(Error::SameAxis { axis: axis1 });
        }
        let (size1, size2) = (self.dims()[axis1], self.dims()[axis2]);
        if size1 != size2 {
            return Err(Error::AxisSizeMismatch {
                axis1,
                size1,
                axis2,
                size2,
            });
        }
        Ok(size1)
    }

    /// Trace over two axes: Σ_i T[.., i, .., i, ..].
    ///
    /// Both axes are removed from the result. Contracting the two axes of an
    /// `n × n` matrix gives its trace as a 0-D tensor.
    pub fn contract(&self, axis1: usize, axis2: usize) -> Result<Self> {
        self.check_axis_pair(axis1, axis2)?;
        let result_layout = Layout::contiguous(self.shape().without_axes(&[axis1, axis2]));
        log::trace!(
            "contract: {} axes ({}, {}) -> {}",
            self.shape(),
            axis1,
            axis2,
            result_layout.shape()
        );
        let mut data = vec![T::zero(); result_layout.elem_count()];
        let mut reduced = Vec::with_capacity(result_layout.rank());
        for (idx, value) in self.indices().zip(&self.data) {
            if idx[axis1] != idx[axis2] {
                continue;
            }
            reduced.clear();
            reduced.extend(
                idx.iter()
                    .enumerate()
                    .filter(|&(d, _)| d != axis1 && d != axis2)
                    .map(|(_, &i)| i),
            );
            let slot = &mut data[result_layout.offset_of(&reduced)];
            *slot = std::mem::take(slot) + value.clone();
        }
        Ok(Tensor {
            data,
            layout: result_layout,
            metric: None,
        })
    }

    /// Contract axis `axis_self` of `self` against axis `axis_other` of
    /// `other`, weighting the pair `(k, l)` by `self`'s metric `M(k, l)`
    /// (the Kronecker delta when no metric is attached).
    ///
    /// The result's axes are `self`'s remaining axes followed by `other`'s.
    /// Without a metric, contracting axis 1 of an `m × n` with axis 0 of an
    /// `n × p` is the ordinary matrix product.
    pub fn contract_with(&self, other: &Self, axis_self: usize, axis_other: usize) -> Result<Self> {
        if axis_self >= self.rank() {
            return Err(Error::InvalidAxis {
                axis: axis_self,
                rank: self.rank(),
            });
        }
        if axis_other >= other.rank() {
            return Err(Error::InvalidAxis {
                axis: axis_other,
                rank: other.rank(),
            });
        }
        let dim = self.dims()[axis_self];
        if dim != other.dims()[axis_other] {
            return Err(Error::ContractionDimensionMismatch {
                lhs_axis: axis_self,
                lhs_size: dim,
                rhs_axis: axis_other,
                rhs_size: other.dims()[axis_other],
            });
        }
        let metric = self.metric_for(dim)?;

        let kept_a = kept_axes(self.rank(), &[axis_self]);
        let kept_b = kept_axes(other.rank(), &[axis_other]);
        let mut new_dims: Vec<usize> = kept_a.iter().map(|&d| self.dims()[d]).collect();
        new_dims.extend(kept_b.iter().map(|&d| other.dims()[d]));
        let new_shape = Shape::new(new_dims);
        log::trace!(
            "contract_with: {} axis {} . {} axis {} -> {} (metric: {})",
            self.shape(),
            axis_self,
            other.shape(),
            axis_other,
            new_shape,
            metric.is_some()
        );

        let stride_a = self.strides()[axis_self];
        let stride_b = other.strides()[axis_other];
        let mut data = Vec::with_capacity(new_shape.elem_count());
        for idx in IndexIter::new(new_shape.dims()) {
            let (idx_a, idx_b) = idx.split_at(kept_a.len());
            let base_a = partial_offset(self.strides(), &kept_a, idx_a);
            let base_b = partial_offset(other.strides(), &kept_b, idx_b);

            let mut acc = T::zero();
            for k in 0..dim {
                let a = &self.data[base_a + k * stride_a];
                for l in 0..dim {
                    let weight = match metric {
                        Some(m) => m[k * dim + l].clone(),
                        None if k == l => T::one(),
                        None => T::zero(),
                    };
                    let b = &other.data[base_b + l * stride_b];
                    acc = acc + a.clone() * weight * b.clone();
                }
            }
            data.push(acc);
        }
        Ok(Self::from_parts(data, new_shape))
    }

    /// Contract two axes of `self` through its metric:
    /// Σ_k Σ_l T[.., k, .., l, ..] * g(k, l).
    ///
    /// Uses the attached metric (which must be `[n, n]`) or the identity.
    /// Unlike `contract`, off-diagonal pairs contribute through `g`.
    pub fn contract_with_metric(&self, axis1: usize, axis2: usize) -> Result<Self> {
        let n = self.check_axis_pair(axis1, axis2)?;
        let identity;
        let g = match self.metric_for(n)? {
            Some(m) => m,
            None => {
                identity = Tensor::<T>::eye(n);
                identity.data()
            }
        };

        let kept = kept_axes(self.rank(), &[axis1, axis2]);
        let new_shape = self.shape().without_axes(&[axis1, axis2]);
        log::trace!(
            "contract_with_metric: {} axes ({}, {}) -> {}",
            self.shape(),
            axis1,
            axis2,
            new_shape
        );

        let (stride1, stride2) = (self.strides()[axis1], self.strides()[axis2]);
        let mut data = Vec::with_capacity(new_shape.elem_count());
        for idx in IndexIter::new(new_shape.dims()) {
            let base = partial_offset(self.strides(), &kept, &idx);
            let mut acc = T::zero();
            for k in 0..n {
                for l in 0..n {
                    let value = self.data[base + k * stride1 + l * stride2].clone();
                    acc = acc + value * g[k * n + l].clone();
                }
            }
            data.push(acc);
        }
        Ok(Self::from_parts(data, new_shape))
    }

    /// Squared (pseudo-)norm.
    ///
    /// Without a metric: Σ_i x_i². With a metric `M`: Σ_i Σ_j x_i M(i,j) x_j,
    /// which requires a vector-shaped tensor (`[n]`, or `[n, 1, ...]`) and an
    /// `[n, n]` metric.
    pub fn pseudo_norm(&self) -> Result<T> {
        let metric = match self.metric.as_deref() {
            Some(metric) => metric,
            None => {
                return Ok(self
                    .data
                    .iter()
                    .fold(T::zero(), |acc, v| acc + v.clone() * v.clone()))
            }
        };
        let n = self.data.len();
        if self.dims().first() != Some(&n) {
            return Err(Error::NotAVector {
                shape: self.shape().clone(),
            });
        }
        if metric.dims() != [n, n] {
            return Err(Error::MetricShapeMismatch {
                expected: n,
                got: metric.shape().clone(),
            });
        }
        let m = metric.data();
        let mut acc = T::zero();
        for i in 0..n {
            for j in 0..n {
                acc = acc + self.data[i].clone() * m[i * n + j].clone() * self.data[j].clone();
            }
        }
        Ok(acc)
    }
}

/// Axes `0..rank` without the ones in `skip`, in order.
fn kept_axes(rank: usize, skip: &[usize]) -> Vec<usize> {
    (0..rank).filter(|d| !skip.contains(d)).collect()
}

/// Offset contributed by the kept axes of a full index.
fn partial_offset(strides: &[usize], axes: &[usize], idx: &[usize]) -> usize {
    axes.iter().zip(idx).map(|(&d, &i)| i * strides[d]).sum()
}

// Indexing sugar
//
// `t[[i, j]]` panics on a bad index, like slice indexing. Use `get`/`get_mut`
// for the fallible form.

impl<T: Element, const N: usize> Index<[usize; N]> for Tensor<T> {
    type Output = T;

    fn index(&self, index: [usize; N]) -> &T {
        match self.get(&index) {
            Ok(v) => v,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<T: Element, const N: usize> IndexMut<[usize; N]> for Tensor<T> {
    fn index_mut(&mut self, index: [usize; N]) -> &mut T {
        match self.get_mut(&index) {
            Ok(v) => v,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<T: Element> Index<&[usize]> for Tensor<T> {
    type Output = T;

    fn index(&self, index: &[usize]) -> &T {
        match self.get(index) {
            Ok(v) => v,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<T: Element> IndexMut<&[usize]> for Tensor<T> {
    fn index_mut(&mut self, index: &[usize]) -> &mut T {
        match self.get_mut(index) {
            Ok(v) => v,
            Err(e) => panic!("{}", e),
        }
    }
}

// Scalar multiplication operators

impl<T: Element, S: Into<T>> Mul<S> for &Tensor<T> {
    type Output = Tensor<T>;

    fn mul(self, scalar: S) -> Tensor<T> {
        self.scale(scalar)
    }
}

impl<T: Element, S: Into<T>> Mul<S> for Tensor<T> {
    type Output = Tensor<T>;

    fn mul(self, scalar: S) -> Tensor<T> {
        self.scale(scalar)
    }
}

macro_rules! impl_scalar_lhs_mul {
    ($($s:ty),* $(,)?) => {
        $(
            impl<T: Element> Mul<&Tensor<T>> for $s
            where
                $s: Into<T>,
            {
                type Output = Tensor<T>;

                fn mul(self, tensor: &Tensor<T>) -> Tensor<T> {
                    tensor.scale(self)
                }
            }

            impl<T: Element> Mul<Tensor<T>> for $s
            where
                $s: Into<T>,
            {
                type Output = Tensor<T>;

                fn mul(self, tensor: Tensor<T>) -> Tensor<T> {
                    tensor.scale(self)
                }
            }
        )*
    };
}

impl_scalar_lhs_mul!(f32, f64, i8, i16, i32, i64, u8, u16, u32, u64);

#[cfg(test)]
mod tests {
    use super::*;

    fn mat(data: &[f64], rows: usize, cols: usize) -> Tensor<f64> {
        Tensor::from_slice(data, (rows, cols)).unwrap()
    }

    #[test]
    fn test_construction() {
        let t = Tensor::<f64>::new((3, 3));
        assert_eq!(t.dims(), &[3, 3]);
        assert_eq!(t.strides(), &[3, 1]);
        assert_eq!(t.size(), 9);
        assert!(t.data().iter().all(|&v| v == 0.0));

        let t = Tensor::full((2, 2), 1.5);
        assert_eq!(t.sum(), 6.0);
    }

    #[test]
    fn test_from_vec_size_mismatch() {
        let err = Tensor::from_vec(vec![1.0, 2.0, 3.0], (2, 2)).unwrap_err();
        assert_eq!(
            err,
            Error::ElementCountMismatch {
                shape: Shape::from((2, 2)),
                expected: 4,
                got: 3
            }
        );
    }

    #[test]
    fn test_scalar_tensor() {
        let t = Tensor::scalar(7i64);
        assert_eq!(t.rank(), 0);
        assert_eq!(t.size(), 1);
        assert_eq!(*t.get(&[]).unwrap(), 7);
    }

    #[test]
    fn test_element_access() {
        let mut t = Tensor::<f64>::new((3, 3));
        t[[0, 1]] = 2.0;
        t.set(&[2, 2], 9.0).unwrap();
        *t.get_mut(&[1, 0]).unwrap() = 4.0;
        assert_eq!(t.data()[1], 2.0);
        assert_eq!(t.data()[3], 4.0);
        assert_eq!(t[[2, 2]], 9.0);
        assert!(matches!(
            t.get(&[3, 0]),
            Err(Error::IndexOutOfRange { axis: 0, index: 3, size: 3 })
        ));
        assert!(matches!(t.get(&[0]), Err(Error::IndexArity { .. })));
    }

    #[test]
    #[should_panic(expected = "index out of range")]
    fn test_index_panics_out_of_range() {
        let t = Tensor::<f64>::new((3, 3));
        let _v = t[[3, 0]];
    }

    #[test]
    fn test_add_and_mul() {
        let a = mat(&[1.0, 2.0, 3.0, 4.0], 2, 2);
        let b = mat(&[10.0, 20.0, 30.0, 40.0], 2, 2);
        assert_eq!(a.add(&b).unwrap().data(), &[11.0, 22.0, 33.0, 44.0]);
        assert_eq!(a.mul_elementwise(&b).unwrap().data(), &[10.0, 40.0, 90.0, 160.0]);
    }

    #[test]
    fn test_add_shape_mismatch() {
        let a = Tensor::<f64>::new((2, 3));
        let b = Tensor::<f64>::new((3, 2));
        assert!(matches!(a.add(&b), Err(Error::ShapeMismatch { .. })));
        assert!(matches!(
            a.mul_elementwise(&b),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_scale_both_sides() {
        let a = mat(&[1.0, 2.0, 3.0, 4.0], 2, 2);
        assert_eq!((&a * 2.5).data(), &[2.5, 5.0, 7.5, 10.0]);
        assert_eq!((2.5f64 * &a).data(), &[2.5, 5.0, 7.5, 10.0]);
        // i32 scalar converted into f64
        assert_eq!((3i32 * &a).data(), &[3.0, 6.0, 9.0, 12.0]);
    }

    #[test]
    fn test_fill() {
        let mut t = Tensor::<i32>::new((2, 3));
        t.fill(4);
        assert_eq!(t.dims(), &[2, 3]);
        assert_eq!(t.sum(), 24);
    }

    #[test]
    fn test_reshape() {
        let mut t = Tensor::from_vec((1..=9).map(|v| v as f64).collect(), (3, 3)).unwrap();
        t.reshape((1, 9)).unwrap();
        assert_eq!(t.dims(), &[1, 9]);
        assert_eq!(t.strides(), &[9, 1]);
        assert_eq!(t[[0, 4]], 5.0);

        let err = t.reshape((2, 4)).unwrap_err();
        assert!(matches!(err, Error::ReshapeSizeMismatch { src: 9, dst: 8, .. }));
        // A failed reshape leaves the tensor untouched.
        assert_eq!(t.dims(), &[1, 9]);
    }

    #[test]
    fn test_flatten() {
        let t = mat(&[1.0, 2.0, 3.0, 4.0], 2, 2);
        let f = t.flatten();
        assert_eq!(f.dims(), &[4]);
        assert_eq!(f.data(), t.data());
    }

    #[test]
    fn test_slice_2d() {
        let t = Tensor::from_vec((0..12).collect::<Vec<i32>>(), (3, 4)).unwrap();
        let s = t.slice(&[(0, 1, 3), (1, 1, 3)]).unwrap();
        assert_eq!(s.dims(), &[2, 2]);
        assert_eq!(s.data(), &[5, 6, 9, 10]);
    }

    #[test]
    fn test_slice_invalid_ranges() {
        let t = Tensor::<f64>::new((3, 4));
        for bad in [(2, 0, 1), (0, 2, 2), (0, 2, 1), (1, 0, 5)] {
            assert!(matches!(
                t.slice(&[bad]),
                Err(Error::InvalidSliceRange { .. })
            ));
        }
    }

    #[test]
    fn test_permute() {
        let t = Tensor::from_vec((1..=8).map(|v| v as f64).collect(), (2, 2, 2)).unwrap();
        let p = t.permute(&[0, 2, 1]).unwrap();
        assert_eq!(p.data(), &[1.0, 3.0, 2.0, 4.0, 5.0, 7.0, 6.0, 8.0]);

        let t = Tensor::from_vec((0..6).collect::<Vec<i32>>(), (2, 3)).unwrap();
        let p = t.permute(&[1, 0]).unwrap();
        assert_eq!(p.dims(), &[3, 2]);
        assert_eq!(p.data(), &[0, 3, 1, 4, 2, 5]);
    }

    #[test]
    fn test_permute_validation() {
        let t = Tensor::<f64>::new((2, 3, 4));
        assert_eq!(
            t.permute(&[0, 1]).unwrap_err(),
            Error::PermutationArity {
                expected: 3,
                got: 2
            }
        );
        assert!(matches!(
            t.permute(&[0, 0, 1]),
            Err(Error::InvalidPermutation { .. })
        ));
        assert!(matches!(
            t.permute(&[0, 1, 3]),
            Err(Error::InvalidPermutation { .. })
        ));
    }

    #[test]
    fn test_tensor_product() {
        let a = Tensor::from_vec(vec![1, 2, 3, 4], (2, 2)).unwrap();
        let b = Tensor::from_vec(vec![5, 6, 3, 7, 8, 9], (2, 3)).unwrap();
        let c = a.tensor_product(&b);
        assert_eq!(c.dims(), &[4, 6]);
        assert_eq!(c.size(), 24);
        // Top-left block is 1 * B, top-right block is 2 * B.
        assert_eq!(c[[0, 0]], 5);
        assert_eq!(c[[1, 2]], 9);
        assert_eq!(c[[0, 3]], 10);
        assert_eq!(c[[3, 5]], 36);
    }

    #[test]
    fn test_tensor_product_mixed_rank() {
        let v = Tensor::from_vec(vec![1, 2], 2).unwrap();
        let m = Tensor::from_vec(vec![1, 10, 100, 1000], (2, 2)).unwrap();
        // [2] is padded to [2, 1]; result is [4, 2].
        let c = v.tensor_product(&m);
        assert_eq!(c.dims(), &[4, 2]);
        assert_eq!(c.data(), &[1, 10, 100, 1000, 2, 20, 200, 2000]);
    }

    #[test]
    fn test_contract_trace() {
        let m = mat(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0], 3, 3);
        let tr = m.contract(0, 1).unwrap();
        assert_eq!(tr.rank(), 0);
        assert_eq!(tr.data(), &[15.0]);
    }

    #[test]
    fn test_contract_3d() {
        let t = Tensor::from_vec((1..=8).map(|v| v as f64).collect(), (2, 2, 2)).unwrap();
        let c = t.contract(0, 1).unwrap();
        // c[k] = t[0,0,k] + t[1,1,k]
        assert_eq!(c.dims(), &[2]);
        assert_eq!(c.data(), &[1.0 + 7.0, 2.0 + 8.0]);
    }

    #[test]
    fn test_contract_errors() {
        let t = Tensor::<f64>::new((2, 3));
        assert_eq!(
            t.contract(0, 2).unwrap_err(),
            Error::InvalidAxis { axis: 2, rank: 2 }
        );
        assert_eq!(t.contract(1, 1).unwrap_err(), Error::SameAxis { axis: 1 });
        assert!(matches!(
            t.contract(0, 1),
            Err(Error::AxisSizeMismatch { size1: 2, size2: 3, .. })
        ));
    }

    #[test]
    fn test_contract_with_is_matmul() {
        let a = mat(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3);
        let b = mat(&[7.0, 8.0, 9.0, 10.0, 11.0, 12.0], 3, 2);
        let c = a.contract_with(&b, 1, 0).unwrap();
        assert_eq!(c.dims(), &[2, 2]);
        assert_eq!(c.data(), &[58.0, 64.0, 139.0, 154.0]);
    }

    #[test]
    fn test_contract_with_metric_weighting() {
        let v = Tensor::from_vec(vec![1.0, 2.0, 3.0], 3).unwrap();
        let g = Tensor::from_vec(
            vec![1.0, 0.0, 0.0, 0.0, -1.0, 0.0, 0.0, 0.0, -1.0],
            (3, 3),
        )
        .unwrap();
        let weighted = v.clone().with_metric(g).unwrap();
        let c = weighted.contract_with(&v, 0, 0).unwrap();
        assert_eq!(c.rank(), 0);
        assert_eq!(c.data(), &[-12.0]);

        let plain = v.contract_with(&v, 0, 0).unwrap();
        assert_eq!(plain.data(), &[14.0]);
    }

    #[test]
    fn test_contract_with_errors() {
        let a = Tensor::<f64>::new((2, 3));
        let b = Tensor::<f64>::new((2, 2));
        assert!(matches!(
            a.contract_with(&b, 1, 0),
            Err(Error::ContractionDimensionMismatch { lhs_size: 3, rhs_size: 2, .. })
        ));
        assert!(matches!(
            a.contract_with(&b, 0, 2),
            Err(Error::InvalidAxis { axis: 2, rank: 2 })
        ));

        let a = a.with_metric(Tensor::eye(2)).unwrap();
        let c = Tensor::<f64>::new((3, 1));
        assert_eq!(
            a.contract_with(&c, 1, 0).unwrap_err(),
            Error::MetricShapeMismatch {
                expected: 3,
                got: Shape::from((2, 2))
            }
        );
    }

    #[test]
    fn test_contract_with_metric() {
        let m = mat(&[1.0, 2.0, 3.0, 4.0], 2, 2);
        // Identity metric: plain trace.
        assert_eq!(m.contract_with_metric(0, 1).unwrap().data(), &[5.0]);

        // g = [[0, 1], [1, 0]] picks the off-diagonal: 2 + 3.
        let g = mat(&[0.0, 1.0, 1.0, 0.0], 2, 2);
        let m = m.with_metric(g).unwrap();
        let c = m.contract_with_metric(0, 1).unwrap();
        assert_eq!(c.rank(), 0);
        assert_eq!(c.data(), &[5.0]);
    }

    #[test]
    fn test_contract_with_metric_keeps_other_axes() {
        let t = Tensor::from_vec((1..=8).map(|v| v as f64).collect(), (2, 2, 2)).unwrap();
        let c = t.contract_with_metric(1, 2).unwrap();
        // Identity metric on axes 1, 2: c[i] = t[i,0,0] + t[i,1,1].
        assert_eq!(c.dims(), &[2]);
        assert_eq!(c.data(), &[1.0 + 4.0, 5.0 + 8.0]);
        assert_eq!(c, t.contract(1, 2).unwrap());
    }

    #[test]
    fn test_contract_with_metric_asymmetric() {
        // g = [[0, 1], [0, 0]] only weights the pair (k, l) = (0, 1).
        let g = mat(&[0.0, 1.0, 0.0, 0.0], 2, 2);
        let t = mat(&[1.0, 2.0, 3.0, 4.0], 2, 2).with_metric(g).unwrap();
        assert_eq!(t.contract_with_metric(0, 1).unwrap().data(), &[2.0]);
        assert_eq!(t.contract_with_metric(1, 0).unwrap().data(), &[3.0]);
    }

    #[test]
    fn test_contract_with_asymmetric_metric() {
        // Σ_k Σ_l a_k M(k, l) b_l with M = [[1, 2], [0, 3]]
        let m = mat(&[1.0, 2.0, 0.0, 3.0], 2, 2);
        let a = Tensor::from_vec(vec![1.0, 2.0], 2).unwrap().with_metric(m).unwrap();
        let b = Tensor::from_vec(vec![3.0, 5.0], 2).unwrap();
        let c = a.contract_with(&b, 0, 0).unwrap();
        assert_eq!(c.data(), &[1.0 * 1.0 * 3.0 + 1.0 * 2.0 * 5.0 + 2.0 * 3.0 * 5.0]);
    }

    #[test]
    fn test_contract_with_metric_errors() {
        let t = Tensor::<f64>::new((2, 3));
        assert_eq!(
            t.contract_with_metric(0, 2).unwrap_err(),
            Error::InvalidAxis { axis: 2, rank: 2 }
        );
        assert_eq!(
            t.contract_with_metric(1, 1).unwrap_err(),
            Error::SameAxis { axis: 1 }
        );
        assert_eq!(
            t.contract_with_metric(0, 1).unwrap_err(),
            Error::AxisSizeMismatch {
                axis1: 0,
                size1: 2,
                axis2: 1,
                size2: 3
            }
        );
    }

    #[test]
    fn test_contract_with_metric_rank3_asymmetric() {
        // t[k, j, l] = 1 + 4k + 2j + l; contract axes 0 and 2 through
        // g = [[1, 2], [0, 3]], keeping axis 1.
        let g = mat(&[1.0, 2.0, 0.0, 3.0], 2, 2);
        let t = Tensor::from_vec((1..=8).map(|v| v as f64).collect(), (2, 2, 2))
            .unwrap()
            .with_metric(g)
            .unwrap();
        let c = t.contract_with_metric(0, 2).unwrap();
        assert_eq!(c.dims(), &[2]);
        // j = 0: 1*1 + 2*2 + 6*3; j = 1: 3*1 + 4*2 + 8*3
        assert_eq!(c.data(), &[23.0, 35.0]);
    }

    #[test]
    fn test_pseudo_norm_asymmetric_metric() {
        // x M x with M = [[1, 2], [0, 3]] and x = [1, 2]: 1 + 2*2 + 3*4
        let m = mat(&[1.0, 2.0, 0.0, 3.0], 2, 2);
        let x = Tensor::from_vec(vec![1.0, 2.0], 2).unwrap().with_metric(m).unwrap();
        assert_eq!(x.pseudo_norm().unwrap(), 17.0);
    }

    #[test]
    fn test_pseudo_norm() {
        let v = Tensor::from_vec(vec![1.0, 2.0, 3.0], 3).unwrap();
        assert_eq!(v.pseudo_norm().unwrap(), 14.0);

        let mut g = Tensor::<f64>::zeros((3, 3));
        g[[0, 0]] = 1.0;
        g[[1, 1]] = -1.0;
        g[[2, 2]] = -1.0;
        let v = v.with_metric(g.clone()).unwrap();
        assert_eq!(v.pseudo_norm().unwrap(), -12.0);

        // A [3, 1] column counts as a vector.
        let col = Tensor::from_vec(vec![1.0, 2.0, 3.0], (3, 1))
            .unwrap()
            .with_metric(g)
            .unwrap();
        assert_eq!(col.pseudo_norm().unwrap(), -12.0);
    }

    #[test]
    fn test_pseudo_norm_rejects_non_vectors() {
        let t = Tensor::<f64>::full((2, 2), 1.0)
            .with_metric(Tensor::eye(4))
            .unwrap();
        assert!(matches!(t.pseudo_norm(), Err(Error::NotAVector { .. })));

        let v = Tensor::<f64>::full(2, 1.0).with_metric(Tensor::eye(3)).unwrap();
        assert!(matches!(
            v.pseudo_norm(),
            Err(Error::MetricShapeMismatch { expected: 2, .. })
        ));
    }

    #[test]
    fn test_set_metric_requires_square() {
        let mut t = Tensor::<f64>::new(3);
        assert_eq!(
            t.set_metric(Tensor::new((3, 2))).unwrap_err(),
            Error::MetricNotSquare {
                shape: Shape::from((3, 2))
            }
        );
        assert_eq!(
            t.set_metric(Tensor::new((3, 3, 3))).unwrap_err(),
            Error::MetricNotSquare {
                shape: Shape::from((3, 3, 3))
            }
        );
        assert_eq!(
            t.set_metric(Tensor::scalar(1.0)).unwrap_err(),
            Error::MetricNotSquare {
                shape: Shape::scalar()
            }
        );
        assert!(t.metric().is_none());
        t.set_metric(Tensor::eye(3)).unwrap();
        assert_eq!(t.metric().unwrap().dims(), &[3, 3]);
        assert_eq!(t.clear_metric().unwrap(), Tensor::eye(3));
        assert!(t.metric().is_none());
    }

    #[test]
    fn test_clone_is_deep() {
        let a = Tensor::<f64>::new(2).with_metric(Tensor::eye(2)).unwrap();
        let mut b = a.clone();
        b[[0]] = 5.0;
        b.clear_metric();
        assert_eq!(a[[0]], 0.0);
        assert!(a.metric().is_some());
    }

    #[test]
    fn test_take_leaves_default() {
        let mut a = Tensor::<f64>::full(3, 2.0).with_metric(Tensor::eye(3)).unwrap();
        let b = std::mem::take(&mut a);
        assert_eq!(b.size(), 3);
        assert!(b.metric().is_some());
        assert_eq!(a.rank(), 0);
        assert!(a.metric().is_none());
    }

    #[test]
    fn test_rand_with_seeded_rng() {
        use rand::SeedableRng;
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let t = Tensor::<f64>::rand_with((4, 5), &mut rng);
        assert_eq!(t.size(), 20);
        assert!(t.data().iter().all(|&v| (0.0..1.0).contains(&v)));

        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        assert_eq!(t, Tensor::rand_with((4, 5), &mut rng));
    }

    #[test]
    fn test_eye() {
        let i = Tensor::<i32>::eye(3);
        assert_eq!(i.data(), &[1, 0, 0, 0, 1, 0, 0, 0, 1]);
    }

    #[test]
    fn test_half_elements() {
        use half::f16;
        let v = Tensor::from_vec(vec![f16::from_f32(1.0), f16::from_f32(2.0)], 2).unwrap();
        assert_eq!(v.pseudo_norm().unwrap().to_f32(), 5.0);
    }
}
