//! Adjacency and Laplacian matrices.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::SimpleGraph;

/// Error type for matrix operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatrixError {
    /// Row/column index out of range.
    #[error("Index {index} out of range for {size}x{size} matrix")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Matrix dimension.
        size: usize,
    },
    /// Permutation length does not match the matrix.
    #[error("Permutation of length {found} does not fit {size}x{size} matrix")]
    PermutationSize {
        /// Permutation length.
        found: usize,
        /// Matrix dimension.
        size: usize,
    },
    /// Rows of unequal length, or not as many columns as rows.
    #[error("{rows} rows do not form a square matrix")]
    NotSquare {
        /// Number of rows given.
        rows: usize,
    },
    /// An adjacency list names a vertex as its own neighbor.
    #[error("Self-loop at vertex {0}")]
    SelfLoop(usize),
}

/// Square integer matrix, row-major. Serialized as a list of rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<i64>>", into = "Vec<Vec<i64>>")]
pub struct IntMatrix {
    size: usize,
    data: Vec<i64>,
}

impl IntMatrix {
    /// Zero matrix of dimension `size`.
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            data: vec![0; size * size],
        }
    }

    /// Build from rows. Returns `None` unless every row has `rows.len()` entries.
    pub fn from_rows(rows: &[Vec<i64>]) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|row| row.len() != size) {
            return None;
        }
        Some(Self {
            size,
            data: rows.iter().flatten().copied().collect(),
        })
    }

    /// Dimension.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Entry at `(i, j)`.
    pub fn get(&self, i: usize, j: usize) -> i64 {
        self.data[i * self.size + j]
    }

    fn set(&mut self, i: usize, j: usize, value: i64) {
        self.data[i * self.size + j] = value;
    }

    /// Rows as vectors.
    pub fn rows(&self) -> Vec<Vec<i64>> {
        self.data.chunks(self.size.max(1)).map(<[i64]>::to_vec).take(self.size).collect()
    }

    /// Delete row `k` and column `k`.
    pub fn minor(&self, k: usize) -> Result<IntMatrix, MatrixError> {
        if k >= self.size {
            return Err(MatrixError::IndexOutOfRange {
                index: k,
                size: self.size,
            });
        }
        let keep: Vec<usize> = (0..self.size).filter(|&i| i != k).collect();
        let mut minor = IntMatrix::zeros(keep.len());
        for (a, &i) in keep.iter().enumerate() {
            for (b, &j) in keep.iter().enumerate() {
                minor.set(a, b, self.get(i, j));
            }
        }
        Ok(minor)
    }

    /// `P M P^T`, i.e. entry `(i, j)` of the result is `M[perm[i]][perm[j]]`.
    pub fn permute_by_conjugation(&self, perm: &[usize]) -> Result<IntMatrix, MatrixError> {
        if perm.len() != self.size {
            return Err(MatrixError::PermutationSize {
                found: perm.len(),
                size: self.size,
            });
        }
        if let Some(&index) = perm.iter().find(|&&p| p >= self.size) {
            return Err(MatrixError::IndexOutOfRange {
                index,
                size: self.size,
            });
        }
        let mut out = IntMatrix::zeros(self.size);
        for i in 0..self.size {
            for j in 0..self.size {
                out.set(i, j, self.get(perm[i], perm[j]));
            }
        }
        Ok(out)
    }

    /// Whether `M == M^T`.
    pub fn is_symmetric(&self) -> bool {
        (0..self.size).all(|i| (0..i).all(|j| self.get(i, j) == self.get(j, i)))
    }

    /// Whether `P M P^T == M` without materializing the product.
    pub fn is_fixed_by(&self, perm: &[usize]) -> bool {
        perm.len() == self.size
            && (0..self.size).all(|i| (0..self.size).all(|j| self.get(perm[i], perm[j]) == self.get(i, j)))
    }
}

impl TryFrom<Vec<Vec<i64>>> for IntMatrix {
    type Error = MatrixError;

    fn try_from(rows: Vec<Vec<i64>>) -> Result<Self, Self::Error> {
        Self::from_rows(&rows).ok_or(MatrixError::NotSquare { rows: rows.len() })
    }
}

impl From<IntMatrix> for Vec<Vec<i64>> {
    fn from(matrix: IntMatrix) -> Self {
        matrix.rows()
    }
}

impl fmt::Display for IntMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let cells: Vec<String> = row.iter().map(|v| format!("{v:>3}")).collect();
            writeln!(f, "[{}]", cells.join(""))?;
        }
        Ok(())
    }
}

/// Adjacency matrix `A`, symmetric with zero diagonal.
pub fn adjacency_matrix(graph: &SimpleGraph) -> IntMatrix {
    let mut a = IntMatrix::zeros(graph.vertex_count());
    for edge in graph.edges() {
        a.set(edge.u, edge.v, 1);
        a.set(edge.v, edge.u, 1);
    }
    a
}

/// Laplacian `L = D - A`.
pub fn laplacian(graph: &SimpleGraph) -> IntMatrix {
    let mut l = IntMatrix::zeros(graph.vertex_count());
    for v in 0..graph.vertex_count() {
        l.set(v, v, graph.degree(v) as i64);
    }
    for edge in graph.edges() {
        l.set(edge.u, edge.v, -1);
        l.set(edge.v, edge.u, -1);
    }
    l
}

/// Laplacian read straight off an adjacency list, without symmetrizing.
///
/// `L[i][i]` counts the distinct neighbors listed for `i`, and `L[i][j] = -1`
/// for each of them. If `i` lists `j` but `j` omits `i`, `L` is asymmetric and
/// its symmetry group can differ from that of the symmetrized graph.
pub fn laplacian_from_list(list: &[Vec<usize>]) -> Result<IntMatrix, MatrixError> {
    let size = list.len();
    let mut l = IntMatrix::zeros(size);
    for (i, neighbors) in list.iter().enumerate() {
        for &j in neighbors {
            if j >= size {
                return Err(MatrixError::IndexOutOfRange { index: j, size });
            }
            if j == i {
                return Err(MatrixError::SelfLoop(i));
            }
            if l.get(i, j) == 0 {
                l.set(i, j, -1);
                l.set(i, i, l.get(i, i) + 1);
            }
        }
    }
    Ok(l)
}
