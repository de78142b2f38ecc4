//! Linear algebra utilities.

use crate::error::{MathError, MathResult};
use nalgebra::{DMatrix, DVector};

fn require_square(matrix: &DMatrix<f64>) -> MathResult<usize> {
    let n = matrix.nrows();
    if n != matrix.ncols() {
        return Err(MathError::invalid_input(format!(
            "matrix must be square, got {}x{}",
            n,
            matrix.ncols()
        )));
    }
    Ok(n)
}

/// Inverts a square matrix with an LU decomposition.
///
/// # Errors
///
/// Returns `MathError::SingularMatrix` if the matrix cannot be inverted.
pub fn invert(matrix: &DMatrix<f64>) -> MathResult<DMatrix<f64>> {
    require_square(matrix)?;
    matrix.clone().lu().try_inverse().ok_or(MathError::SingularMatrix)
}

/// Solves a linear system Ax = b using LU decomposition.
pub fn solve_linear_system(a: &DMatrix<f64>, b: &DVector<f64>) -> MathResult<DVector<f64>> {
    let n = require_square(a)?;
    if n != b.len() {
        return Err(MathError::DimensionMismatch {
            rows1: n,
            cols1: n,
            rows2: b.len(),
            cols2: 1,
        });
    }
    a.clone().lu().solve(b).ok_or(MathError::SingularMatrix)
}
