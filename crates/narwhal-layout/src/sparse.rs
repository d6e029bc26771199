//! Symmetric, loop-free sparse matrices in CSR form.
//!
//! An entry `(i, j, w)` records a target distance (or weight) between nodes `i` and `j`. A missing
//! entry means "no direct constraint", never "distance 0".

use crate::bitarray::BitArray;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct SparseSymmetricMatrix {
    n: usize,
    /// Row `i` occupies `cols[row_ptr[i]..row_ptr[i + 1]]`.
    row_ptr: Vec<usize>,
    cols: Vec<usize>,
    values: Vec<f64>,
}

impl SparseSymmetricMatrix {
    /// A matrix over `n` nodes with no constraints.
    pub fn empty(n: usize) -> Self {
        Self {
            n,
            row_ptr: vec![0; n + 1],
            cols: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Builds a matrix from undirected pairs; each pair is stored in both directions.
    pub fn from_pairs(
        n: usize,
        pairs: impl IntoIterator<Item = (usize, usize, f64)>,
    ) -> Result<Self> {
        let mut builder = SparseBuilder::new(n);
        for (i, j, w) in pairs {
            builder.push(i, j, w)?;
        }
        Ok(builder.build())
    }

    pub fn n(&self) -> usize {
        self.n
    }

    /// Number of stored entries (each undirected pair counts twice).
    pub fn nnz(&self) -> usize {
        self.cols.len()
    }

    /// `true` when the matrix has no rows at all.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn row(&self, i: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let range = self.row_range(i);
        self.cols[range.clone()]
            .iter()
            .copied()
            .zip(self.values[range].iter().copied())
    }

    pub(crate) fn row_range(&self, i: usize) -> std::ops::Range<usize> {
        self.row_ptr[i]..self.row_ptr[i + 1]
    }

    pub(crate) fn cols(&self) -> &[usize] {
        &self.cols
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i >= self.n || j >= self.n {
            return None;
        }
        let range = self.row_range(i);
        let cols = &self.cols[range.clone()];
        cols.binary_search(&j)
            .ok()
            .map(|k| self.values[range.start + k])
    }

    /// Number of constrained neighbours of node `i`.
    pub fn row_len(&self, i: usize) -> usize {
        self.row_ptr[i + 1] - self.row_ptr[i]
    }

    /// Sum of the values incident to node `i`.
    pub fn row_degree(&self, i: usize) -> f64 {
        self.values[self.row_range(i)].iter().sum()
    }

    /// All row degrees, computed in one pass over the entries.
    pub fn degrees(&self) -> Vec<f64> {
        (0..self.n).map(|i| self.row_degree(i)).collect()
    }

    /// Same sparsity pattern, every value replaced by `f(value)`.
    pub fn map_values(&self, mut f: impl FnMut(f64) -> f64) -> Self {
        Self {
            n: self.n,
            row_ptr: self.row_ptr.clone(),
            cols: self.cols.clone(),
            values: self.values.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Whether every node can reach every other node through stored entries.
    pub fn is_connected(&self) -> Result<bool> {
        if self.n <= 1 {
            return Ok(true);
        }
        let mut seen = BitArray::with_len(self.n)?;
        let mut stack = vec![0usize];
        seen.set(0, true);
        let mut reached = 1usize;
        while let Some(v) = stack.pop() {
            for &u in &self.cols[self.row_range(v)] {
                if !seen.get(u) {
                    seen.set(u, true);
                    reached += 1;
                    stack.push(u);
                }
            }
        }
        Ok(reached == self.n)
    }
}

/// Collects undirected entries and produces a [`SparseSymmetricMatrix`].
///
/// Repeated pairs collapse to the smallest value.
#[derive(Debug, Clone)]
pub struct SparseBuilder {
    n: usize,
    triples: Vec<(usize, usize, f64)>,
}

impl SparseBuilder {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            triples: Vec::new(),
        }
    }

    pub fn push(&mut self, i: usize, j: usize, value: f64) -> Result<()> {
        if i >= self.n || j >= self.n {
            return Err(Error::IndexOutOfRange {
                row: i,
                col: j,
                n: self.n,
            });
        }
        if i == j {
            return Err(Error::DiagonalEntry { index: i });
        }
        if !value.is_finite() {
            return Err(Error::NonFiniteValue {
                row: i,
                col: j,
                value,
            });
        }
        self.triples.try_reserve(2)?;
        self.triples.push((i, j, value));
        self.triples.push((j, i, value));
        Ok(())
    }

    pub fn build(mut self) -> SparseSymmetricMatrix {
        self.triples
            .sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)).then(a.2.total_cmp(&b.2)));
        // Sorted by value within equal (row, col), so the first of a run is the minimum.
        self.triples.dedup_by(|next, kept| next.0 == kept.0 && next.1 == kept.1);

        let mut row_ptr = vec![0usize; self.n + 1];
        for &(i, _, _) in &self.triples {
            row_ptr[i + 1] += 1;
        }
        for i in 0..self.n {
            row_ptr[i + 1] += row_ptr[i];
        }

        let (cols, values) = self.triples.into_iter().map(|(_, j, w)| (j, w)).unzip();
        SparseSymmetricMatrix {
            n: self.n,
            row_ptr,
            cols,
            values,
        }
    }
}
