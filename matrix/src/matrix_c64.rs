use crate::{Dot, Matrix, MatrixError};
use dwconsts::*;

use nalgebra::DMatrix;
use types::c64;

impl Matrix<c64> {
    pub fn identity(n: usize) -> Matrix<c64> {
        let mut mat = Matrix::<c64>::new(n, n);

        for i in 0..n {
            mat[[i, i]] = ONE_C64;
        }

        mat
    }

    pub fn adjoint(&self) -> Matrix<c64> {
        let mut mat = Matrix::<c64>::new(self.ncol, self.nrow);

        for j in 0..self.ncol {
            for i in 0..self.nrow {
                mat[[j, i]] = self[[i, j]].conj();
            }
        }

        mat
    }

    /// S = A^H A, the overlap of the columns of A.
    pub fn overlap(&self) -> Matrix<c64> {
        self.adjoint().dot(self)
    }

    /// Inverse square root of a Hermitian positive definite matrix,
    /// S^(-1/2) = U diag(1/sqrt(w)) U^H.
    pub fn hermitian_inv_sqrt(&self) -> Result<Matrix<c64>, MatrixError> {
        if self.nrow != self.ncol {
            return Err(MatrixError::NotSquare {
                nrow: self.nrow,
                ncol: self.ncol,
            });
        }

        let n = self.nrow;

        let mat = DMatrix::<c64>::from_column_slice(n, n, self.as_slice());
        let eig = mat.symmetric_eigen();

        let wmin = eig.eigenvalues.iter().cloned().fold(f64::INFINITY, f64::min);

        if n > 0 && wmin <= EPS10 {
            return Err(MatrixError::NotPositiveDefinite(wmin));
        }

        let u = &eig.eigenvectors;

        let mut out = Matrix::<c64>::new(n, n);

        for j in 0..n {
            for i in 0..n {
                let mut s = ZERO_C64;

                for (k, w) in eig.eigenvalues.iter().enumerate() {
                    s += u[(i, k)] * u[(j, k)].conj() / w.sqrt();
                }

                out[[i, j]] = s;
            }
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_inv_sqrt_of_diagonal() {
        let mut s = Matrix::<c64>::identity(2);
        s[[0, 0]] = c64::new(4.0, 0.0);
        s[[1, 1]] = c64::new(0.25, 0.0);

        let x = s.hermitian_inv_sqrt().unwrap();

        assert_abs_diff_eq!(x[[0, 0]], c64::new(0.5, 0.0), epsilon = 1E-12);
        assert_abs_diff_eq!(x[[1, 1]], c64::new(2.0, 0.0), epsilon = 1E-12);
        assert_abs_diff_eq!(x[[0, 1]], ZERO_C64, epsilon = 1E-12);
    }

    #[test]
    fn test_inv_sqrt_orthonormalizes_columns() {
        let a = Matrix::<c64>::from_row_slice(
            3,
            2,
            &[
                c64::new(1.0, 0.0),
                c64::new(0.3, 0.1),
                c64::new(0.0, 0.0),
                c64::new(1.0, 0.0),
                c64::new(0.2, -0.4),
                c64::new(0.5, 0.0),
            ],
        );

        let x = a.overlap().hermitian_inv_sqrt().unwrap();
        let b = a.dot(&x);
        let s = b.overlap();

        for i in 0..2 {
            for j in 0..2 {
                let expected = if i == j { ONE_C64 } else { ZERO_C64 };
                assert_abs_diff_eq!(s[[i, j]], expected, epsilon = 1E-10);
            }
        }
    }

    #[test]
    fn test_inv_sqrt_rejects_singular() {
        let a = Matrix::<c64>::from_row_slice(2, 2, &[ONE_C64, ONE_C64, ONE_C64, ONE_C64]);

        assert!(matches!(
            a.hermitian_inv_sqrt(),
            Err(MatrixError::NotPositiveDefinite(_))
        ));
    }
}
