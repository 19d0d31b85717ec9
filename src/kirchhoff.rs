//! Spanning-tree counts via Kirchhoff's Matrix-Tree Theorem.
//!
//! Any cofactor of the Laplacian (determinant after deleting one matching row
//! and column) equals the number of spanning trees.
//!
//! ## Determinant strategies
//!
//! - `Exact`: Gaussian elimination over `BigRational`. Always integral.
//! - `Float`: f64 elimination with partial pivoting, rounded to the nearest
//!   integer. The result is rejected unless it lies within
//!   `tolerance * max(1, |det|)` of that integer.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

use crate::laplacian::{laplacian, IntMatrix, MatrixError};
use crate::types::SimpleGraph;

/// Default relative tolerance for the floating-point strategy.
pub const DEFAULT_FLOAT_TOLERANCE: f64 = 1e-6;

/// Error type for spanning-tree counting.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KirchhoffError {
    /// The graph has no vertices, so there is no cofactor.
    #[error("Graph has no vertices")]
    EmptyGraph,
    /// Deleted row/column is out of range.
    #[error(transparent)]
    Matrix(#[from] MatrixError),
    /// Floating determinant is too far from an integer.
    #[error("Determinant {determinant} is not within tolerance {tolerance} of an integer")]
    NonIntegral {
        /// Computed determinant.
        determinant: f64,
        /// Relative tolerance applied.
        tolerance: f64,
    },
    /// A Laplacian cofactor came out negative.
    #[error("Negative cofactor {0}")]
    Negative(String),
    /// The count does not fit in 128 bits.
    #[error("Spanning tree count {0} does not fit in u128")]
    Overflow(String),
    /// Cofactors for different deleted indices disagree.
    #[error("Kirchhoff cofactors disagree: {counts:?}")]
    CofactorMismatch {
        /// (deleted index, count) pairs.
        counts: Vec<(usize, u128)>,
    },
}

/// How to evaluate cofactor determinants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeterminantStrategy {
    /// Exact rational arithmetic.
    Exact,
    /// Floating point with a relative rounding tolerance.
    Float {
        /// Relative tolerance.
        tolerance: f64,
    },
}

impl DeterminantStrategy {
    /// Floating-point strategy with [`DEFAULT_FLOAT_TOLERANCE`].
    pub fn float() -> Self {
        Self::Float {
            tolerance: DEFAULT_FLOAT_TOLERANCE,
        }
    }
}

impl Default for DeterminantStrategy {
    fn default() -> Self {
        Self::Exact
    }
}

/// Exact determinant over the rationals.
pub fn exact_determinant(matrix: &IntMatrix) -> BigInt {
    let n = matrix.size();
    let mut a: Vec<Vec<BigRational>> = matrix
        .rows()
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|v| BigRational::from_integer(BigInt::from(v)))
                .collect()
        })
        .collect();

    let mut det = BigRational::one();
    for col in 0..n {
        let Some(pivot) = (col..n).find(|&r| !a[r][col].is_zero()) else {
            return BigInt::zero();
        };
        if pivot != col {
            a.swap(pivot, col);
            det = -det;
        }
        let pivot_value = a[col][col].clone();
        det = det * &pivot_value;
        for r in (col + 1)..n {
            if a[r][col].is_zero() {
                continue;
            }
            let factor = &a[r][col] / &pivot_value;
            for c in col..n {
                let delta = &factor * &a[col][c];
                a[r][c] -= delta;
            }
        }
    }
    det.to_integer()
}

/// Floating-point determinant with partial pivoting.
pub fn float_determinant(matrix: &IntMatrix) -> f64 {
    let n = matrix.size();
    let mut a: Vec<Vec<f64>> = matrix
        .rows()
        .into_iter()
        .map(|row| row.into_iter().map(|v| v as f64).collect())
        .collect();

    let mut det = 1.0;
    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&x, &y| a[x][col].abs().total_cmp(&a[y][col].abs()))
            .unwrap_or(col);
        if a[pivot][col] == 0.0 {
            return 0.0;
        }
        if pivot != col {
            a.swap(pivot, col);
            det = -det;
        }
        det *= a[col][col];
        for r in (col + 1)..n {
            let factor = a[r][col] / a[col][col];
            for c in col..n {
                a[r][c] -= factor * a[col][c];
            }
        }
    }
    det
}

/// Determinant of `matrix` as an exact integer, under `strategy`.
pub fn integer_determinant(
    matrix: &IntMatrix,
    strategy: DeterminantStrategy,
) -> Result<BigInt, KirchhoffError> {
    match strategy {
        DeterminantStrategy::Exact => Ok(exact_determinant(matrix)),
        DeterminantStrategy::Float { tolerance } => {
            let determinant = float_determinant(matrix);
            let rounded = determinant.round();
            if (determinant - rounded).abs() > tolerance * determinant.abs().max(1.0) {
                return Err(KirchhoffError::NonIntegral {
                    determinant,
                    tolerance,
                });
            }
            // Integral f64 values convert exactly
            Ok(BigInt::from(rounded as i128))
        }
    }
}

/// Number of spanning trees, from the cofactor that deletes `delete_idx`.
pub fn spanning_tree_count(
    graph: &SimpleGraph,
    delete_idx: usize,
    strategy: DeterminantStrategy,
) -> Result<u128, KirchhoffError> {
    if graph.vertex_count() == 0 {
        return Err(KirchhoffError::EmptyGraph);
    }
    let minor = laplacian(graph).minor(delete_idx)?;
    let det = integer_determinant(&minor, strategy)?;
    if det.is_negative() {
        return Err(KirchhoffError::Negative(det.to_string()));
    }
    let count = det.to_u128().ok_or_else(|| KirchhoffError::Overflow(det.to_string()))?;
    tracing::debug!(delete_idx, count = %count, "laplacian cofactor");
    Ok(count)
}

/// Spanning-tree counts for several deleted indices.
pub fn cofactor_counts(
    graph: &SimpleGraph,
    indices: &[usize],
    strategy: DeterminantStrategy,
) -> Result<Vec<(usize, u128)>, KirchhoffError> {
    indices
        .iter()
        .map(|&k| spanning_tree_count(graph, k, strategy).map(|count| (k, count)))
        .collect()
}

/// Spanning-tree count checked against the first `checks` cofactors
/// (at least one, at most one per vertex).
pub fn verified_tree_count(
    graph: &SimpleGraph,
    checks: usize,
    strategy: DeterminantStrategy,
) -> Result<u128, KirchhoffError> {
    let n = checks.clamp(1, graph.vertex_count().max(1));
    let indices: Vec<usize> = (0..n).collect();
    let counts = cofactor_counts(graph, &indices, strategy)?;
    let first = match counts.first() {
        Some(&(_, count)) => count,
        None => return Err(KirchhoffError::EmptyGraph),
    };
    if counts.iter().any(|&(_, c)| c != first) {
        return Err(KirchhoffError::CofactorMismatch { counts });
    }
    Ok(first)
}
