//! Data
//!
//! Feature containers a tree can be evaluated against: single rows, either
//! dense or sparse, and a column major matrix for batches of rows.
use crate::errors::TreeError;
use std::fmt::{self, Display};

/// Indexed lookup of feature values.
///
/// `value` returns `None` only when `index` is outside the container.
/// Sparse containers return `Some(0.0)` for indices that are in range but unset.
pub trait Features {
    /// Number of feature slots.
    fn len(&self) -> usize;
    /// Value at `index`, if the index is in range.
    fn value(&self, index: usize) -> Option<f64>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at `index`, or `FeatureIndexOutOfBounds`.
    fn get_value(&self, index: usize) -> Result<f64, TreeError> {
        self.value(index)
            .ok_or_else(|| TreeError::FeatureIndexOutOfBounds(index, self.len()))
    }
}

impl Features for [f64] {
    fn len(&self) -> usize {
        <[f64]>::len(self)
    }
    fn value(&self, index: usize) -> Option<f64> {
        self.get(index).copied()
    }
}

impl Features for Vec<f64> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }
    fn value(&self, index: usize) -> Option<f64> {
        self.as_slice().get(index).copied()
    }
}

impl<const N: usize> Features for [f64; N] {
    fn len(&self) -> usize {
        N
    }
    fn value(&self, index: usize) -> Option<f64> {
        self.as_slice().get(index).copied()
    }
}

/// Sparse feature vector, storing only the explicitly set entries.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseVector {
    size: usize,
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl SparseVector {
    /// Create a new sparse vector.
    ///
    /// * `size` - The logical length of the vector.
    /// * `indices` - Strictly increasing indices of the set entries.
    /// * `values` - Values matching `indices`.
    pub fn new(size: usize, indices: Vec<usize>, values: Vec<f64>) -> Result<Self, TreeError> {
        if indices.len() != values.len() {
            return Err(TreeError::InvalidSparseVector(format!(
                "{} indices but {} values",
                indices.len(),
                values.len()
            )));
        }
        if let Some(w) = indices.windows(2).find(|w| w[0] >= w[1]) {
            return Err(TreeError::InvalidSparseVector(format!(
                "indices must be strictly increasing, found {} followed by {}",
                w[0], w[1]
            )));
        }
        if let Some(last) = indices.last() {
            if *last >= size {
                return Err(TreeError::InvalidSparseVector(format!(
                    "index {} is out of bounds for size {}",
                    last, size
                )));
            }
        }
        Ok(SparseVector { size, indices, values })
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Expand into a dense vector.
    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.size];
        for (i, v) in self.indices.iter().zip(self.values.iter()) {
            dense[*i] = *v;
        }
        dense
    }
}

impl Features for SparseVector {
    fn len(&self) -> usize {
        self.size
    }
    fn value(&self, index: usize) -> Option<f64> {
        if index >= self.size {
            return None;
        }
        match self.indices.binary_search(&index) {
            Ok(pos) => Some(self.values[pos]),
            Err(_) => Some(0.0),
        }
    }
}

/// A single feature row, dense or sparse.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureVector {
    Dense(Vec<f64>),
    Sparse(SparseVector),
}

impl FeatureVector {
    pub fn dense(values: Vec<f64>) -> Self {
        FeatureVector::Dense(values)
    }

    pub fn sparse(size: usize, indices: Vec<usize>, values: Vec<f64>) -> Result<Self, TreeError> {
        SparseVector::new(size, indices, values).map(FeatureVector::Sparse)
    }
}

impl Features for FeatureVector {
    fn len(&self) -> usize {
        match self {
            FeatureVector::Dense(v) => v.as_slice().len(),
            FeatureVector::Sparse(s) => Features::len(s),
        }
    }
    fn value(&self, index: usize) -> Option<f64> {
        match self {
            FeatureVector::Dense(v) => v.as_slice().get(index).copied(),
            FeatureVector::Sparse(s) => s.value(index),
        }
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        FeatureVector::Dense(values)
    }
}

impl From<SparseVector> for FeatureVector {
    fn from(vector: SparseVector) -> Self {
        FeatureVector::Sparse(vector)
    }
}

/// Contiguous Column Major Matrix data container.
///
/// Holds a dense matrix of values in a single contiguous memory block, in
/// column-major order (Fortran-style), borrowed from the caller.
pub struct Matrix<'a, T> {
    /// The raw data stored in a single slice.
    pub data: &'a [T],
    /// Indices into the data row-wise.
    pub index: Vec<usize>,
    /// Number of rows in the matrix.
    pub rows: usize,
    /// Number of columns in the matrix.
    pub cols: usize,
}

impl<'a, T> Matrix<'a, T> {
    /// Create a new Matrix.
    pub fn new(data: &'a [T], rows: usize, cols: usize) -> Self {
        Matrix {
            data,
            index: (0..rows).collect(),
            rows,
            cols,
        }
    }

    /// Get a single reference to an item in the matrix.
    ///
    /// * `i` - The ith row of the data to get.
    /// * `j` - the jth column of the data to get.
    pub fn get(&self, i: usize, j: usize) -> &T {
        &self.data[j * self.rows + i]
    }

    /// Get access to a row of the data, as an iterator.
    pub fn get_row_iter(&self, row: usize) -> std::iter::StepBy<std::iter::Skip<std::slice::Iter<'a, T>>> {
        self.data.iter().skip(row).step_by(self.rows)
    }

    /// Get an entire column in the matrix.
    pub fn get_col(&self, col: usize) -> &[T] {
        &self.data[col * self.rows..(col + 1) * self.rows]
    }
}

impl<'a, T> Matrix<'a, T>
where
    T: Copy,
{
    /// Get a row of the data as a vector.
    pub fn get_row(&self, row: usize) -> Vec<T> {
        self.get_row_iter(row).copied().collect()
    }
}

impl<'a, T> Display for Matrix<'a, T>
where
    T: Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut r = String::new();
        for i in 0..self.rows {
            let row = (0..self.cols)
                .map(|j| self.get(i, j).to_string())
                .collect::<Vec<String>>()
                .join(" ");
            r += format!("{}\n", row).as_str();
        }
        write!(f, "{}", r)
    }
}
